//! Cliente da API Gemini (generateContent)

use super::{DiagnosisService, ImageAttachment};
use crate::config::Config;
use crate::error::{ChecklistError, Result};
use async_trait::async_trait;
use checklist_common::parser::clean_quick_diagnosis;
use checklist_common::prompts::{analysis_response_schema, build_analysis_prompt, build_quick_prompt};
use checklist_common::{parse_analysis_response, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Serialize)]
pub(crate) struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Requisição do diagnóstico rápido (só texto)
pub(crate) fn quick_request(description: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::Text {
                text: build_quick_prompt(description),
            }],
        }],
        generation_config: None,
    }
}

/// Requisição da análise completa: imagem antes do texto, resposta em JSON
pub(crate) fn analysis_request(description: &str, image: Option<&ImageAttachment>) -> GeminiRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = image {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        });
    }
    parts.push(Part::Text {
        text: build_analysis_prompt(description),
    });

    GeminiRequest {
        contents: vec![Content { parts }],
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json".into(),
            response_schema: analysis_response_schema(),
        }),
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ChecklistError::ApiCall(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key(),
            model: config.model.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }

    /// POST generateContent; devolve o texto do primeiro candidato
    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(ChecklistError::MissingApiKey)?;
        let started = Instant::now();

        let response = self
            .http
            .post(format!("{}?key={}", self.endpoint(), api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| ChecklistError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChecklistError::ApiCall(format!("status {}: {}", status, body)));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ChecklistError::ApiParse(e.to_string()))?;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, model = %self.model, "resposta Gemini");

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ChecklistError::ApiParse("resposta vazia".into()))
    }
}

#[async_trait]
impl DiagnosisService for GeminiClient {
    async fn quick_diagnosis(&self, description: &str) -> String {
        if self.api_key.is_none() {
            error!("chave da API Gemini não configurada");
            return String::new();
        }
        match self.generate(&quick_request(description)).await {
            Ok(text) => clean_quick_diagnosis(&text),
            Err(e) => {
                warn!(error = %e, "diagnóstico rápido falhou");
                String::new()
            }
        }
    }

    async fn analyze_problem(
        &self,
        description: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<AnalysisResult> {
        let text = self.generate(&analysis_request(description, image)).await?;
        Ok(parse_analysis_response(&text)?)
    }
}
