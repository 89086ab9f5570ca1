use crate::error::{ChecklistError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    /// Diretório dos dados gravados (None = padrão do sistema)
    pub data_dir: Option<PathBuf>,
    pub timeout_seconds: u64,
    /// Atraso do diagnóstico rápido
    pub debounce_ms: u64,
    /// Largura máxima das imagens anexadas ao PDF (px)
    pub pdf_image_max_width: u32,
    /// Qualidade JPEG das imagens no PDF (0-100)
    pub pdf_jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            data_dir: None,
            timeout_seconds: 120,
            debounce_ms: 1000,
            pdf_image_max_width: 800,
            pdf_jpeg_quality: 75,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ChecklistError::Config("Diretório home não encontrado".into()))?;
        Ok(home.join(".config").join("vtr-checklist").join("config.json"))
    }

    /// Diretório de dados: configurado ou ~/.local/share/vtr-checklist
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir()
            .ok_or_else(|| ChecklistError::Config("Diretório de dados não encontrado".into()))?;
        Ok(base.join("vtr-checklist"))
    }

    /// Variável de ambiente tem prioridade sobre a chave gravada
    pub fn api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
