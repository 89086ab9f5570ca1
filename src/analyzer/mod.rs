//! Analisador de problemas mecânicos
//!
//! - Diagnóstico rápido: texto curto, melhor esforço, falhas silenciosas
//! - Análise completa: diagnóstico + risco + ações, falha visível ao usuário

pub mod debounce;
pub mod gemini;

pub use debounce::{QuickDiagnosisDebouncer, QUICK_DIAGNOSIS_MIN_CHARS};
pub use gemini::GeminiClient;

use crate::app::{encode_image_file, mime_type_for};
use crate::error::{ChecklistError, Result};
use async_trait::async_trait;
use checklist_common::data_url::{extract_base64_from_data_url, extract_mime_type_from_data_url};
use checklist_common::AnalysisResult;
use std::path::Path;
use tracing::error;

pub const MISSING_INPUT_MESSAGE: &str = "Por favor, forneça uma descrição ou uma imagem do problema.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Não foi possível analisar o problema. Tente novamente.";

/// Imagem enviada junto da descrição
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    /// Conteúdo em base64 (sem o prefixo "data:")
    pub data: String,
}

impl ImageAttachment {
    pub fn from_data_url(data_url: &str) -> Option<Self> {
        let data = extract_base64_from_data_url(data_url)?;
        Some(Self {
            mime_type: extract_mime_type_from_data_url(data_url).to_string(),
            data: data.to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data_url = encode_image_file(path)?;
        Self::from_data_url(&data_url).ok_or_else(|| {
            ChecklistError::ImageLoad(format!("{} ({})", path.display(), mime_type_for(path)))
        })
    }
}

/// Serviço de inferência externo
#[async_trait]
pub trait DiagnosisService: Send + Sync {
    /// Diagnóstico curto; string vazia em qualquer falha
    async fn quick_diagnosis(&self, description: &str) -> String;

    async fn analyze_problem(
        &self,
        description: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<AnalysisResult>;
}

/// Análise completa com validação de entrada
///
/// Erros do serviço viram a mensagem genérica para o usuário; a causa fica no log.
pub async fn submit_analysis(
    service: &dyn DiagnosisService,
    description: &str,
    image: Option<&ImageAttachment>,
) -> Result<AnalysisResult> {
    if description.is_empty() && image.is_none() {
        return Err(ChecklistError::Validation(MISSING_INPUT_MESSAGE.into()));
    }
    match service.analyze_problem(description, image).await {
        Ok(result) => Ok(result),
        Err(ChecklistError::MissingApiKey) => Err(ChecklistError::MissingApiKey),
        Err(e) => {
            error!(error = %e, "falha na análise do problema");
            Err(ChecklistError::ApiCall(ANALYSIS_FAILED_MESSAGE.into()))
        }
    }
}
