//! Prompts do analisador de problemas mecânicos

use serde_json::{json, Value};

/// Prompt da análise completa (diagnóstico, risco e ações)
pub const ANALYSIS_PROMPT: &str = "Você é um mecânico experiente e um especialista em veículos de emergência, especificamente ambulâncias. Seu objetivo é fornecer uma análise clara, concisa e acionável para um condutor de ambulância que não é um mecânico. Com base na descrição e/ou imagem fornecida, faça o seguinte:
1.  **Diagnóstico Preliminar:** Qual é o problema mais provável?
2.  **Nível de Risco:** Classifique o risco como Baixo, Médio ou Alto. (Ex: Alto - Risco de segurança imediato, não opere o veículo. Médio - Requer atenção em breve. Baixo - Monitorar, mas não crítico).
3.  **Ações Recomendadas:** O que o condutor deve fazer agora? (Ex: 'Notificar imediatamente o supervisor de frota', 'Verificar o nível do fluido de arrefecimento', 'Não dirigir o veículo').
Analise a seguinte informação e retorne sua resposta em formato JSON.";

/// Prompt do diagnóstico rápido (1-2 frases)
pub const QUICK_DIAGNOSIS_PROMPT: &str = "Você é um assistente de mecânico. Com base na seguinte descrição de um problema em um veículo, forneça um diagnóstico preliminar muito breve (máximo de 1-2 frases). Não sugira ações ou níveis de risco. Apenas indique qual poderia ser o problema. Seja direto e conciso.

Descrição do problema:";

pub fn build_analysis_prompt(description: &str) -> String {
    format!("{}\n\nDescrição do problema: {}", ANALYSIS_PROMPT, description)
}

pub fn build_quick_prompt(description: &str) -> String {
    format!("{} {}", QUICK_DIAGNOSIS_PROMPT, description)
}

/// Esquema de resposta enviado junto da análise completa
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "diagnostico": {
                "type": "STRING",
                "description": "Diagnóstico preliminar do problema."
            },
            "risco": {
                "type": "STRING",
                "description": "Nível de risco (Baixo, Médio, Alto)."
            },
            "acoes": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Lista de ações recomendadas para o condutor."
            }
        },
        "required": ["diagnostico", "risco", "acoes"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_appends_description() {
        let prompt = build_analysis_prompt("barulho no motor");
        assert!(prompt.starts_with("Você é um mecânico experiente"));
        assert!(prompt.ends_with("Descrição do problema: barulho no motor"));
    }

    #[test]
    fn test_quick_prompt() {
        let prompt = build_quick_prompt("freio rangendo");
        assert!(prompt.ends_with("Descrição do problema: freio rangendo"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = analysis_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, vec!["diagnostico", "risco", "acoes"]);
    }
}
