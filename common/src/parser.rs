//! Parser das respostas do serviço de inferência
//!
//! A resposta é validada contra um esquema estrito; qualquer divergência
//! vira `Error::Parse` em vez de ser aceita como veio.

use crate::error::{Error, Result};
use crate::types::AnalysisResult;

/// Extrai o objeto JSON da resposta
///
/// Ordem de busca:
/// 1. bloco ```json ... ```
/// 2. do primeiro `{` ao último `}`
///
/// # Examples
/// ```
/// use checklist_common::extract_json_object;
///
/// let response = "Resultado: {\"diagnostico\": \"x\"}";
/// let json = extract_json_object(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json_object(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSON não encontrado na resposta".into()))
}

/// Converte a resposta da análise completa em `AnalysisResult`
///
/// Campos obrigatórios: diagnostico (texto), risco (texto), acoes (lista de textos).
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json_object(response)?;
    let result: AnalysisResult = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("resposta de análise inválida: {}", e)))?;
    if result.diagnostico.trim().is_empty() {
        return Err(Error::Parse("diagnóstico vazio".into()));
    }
    Ok(result)
}

/// Normaliza o texto do diagnóstico rápido (espaços nas pontas)
pub fn clean_quick_diagnosis(response: &str) -> String {
    response.trim().to_string()
}
