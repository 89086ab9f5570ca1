//! Tipos compartilhados
//!
//! - ItemStatus / ItemState: resultado da vistoria de um item
//! - AnalysisResult / RiskLevel: resposta estruturada do analisador de problemas
//! - User / Role: diretório local de usuários

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resultado da vistoria de um item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ok,
    Defect,
}

impl ItemStatus {
    /// Rótulo usado no relatório
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Ok => "OK",
            ItemStatus::Defect => "Defeito",
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(ItemStatus::Ok),
            "defect" | "defeito" => Ok(ItemStatus::Defect),
            _ => Err(format!("Status desconhecido: {}. Use ok ou defect", s)),
        }
    }
}

/// Estado de um item inspecionado
///
/// A ausência de entrada significa "não verificado", que é diferente de OK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    pub status: ItemStatus,

    /// Só tem significado quando status = Defect
    #[serde(default)]
    pub description: String,

    /// Data URL ("data:image/jpeg;base64,...")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ItemState {
    pub fn new(status: ItemStatus) -> Self {
        Self {
            status,
            description: String::new(),
            image: None,
        }
    }
}

/// Nível de risco informado pelo serviço de inferência
///
/// Valores fora de Baixo/Médio/Alto são mantidos como vieram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Baixo,
    Medio,
    Alto,
    Other(String),
}

impl RiskLevel {
    /// Nome do estilo visual (cor do selo)
    pub fn style(&self) -> &'static str {
        match self {
            RiskLevel::Alto => "red",
            RiskLevel::Medio => "yellow",
            RiskLevel::Baixo => "green",
            RiskLevel::Other(_) => "unknown",
        }
    }
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.trim() {
            "Baixo" => RiskLevel::Baixo,
            "Médio" => RiskLevel::Medio,
            "Alto" => RiskLevel::Alto,
            _ => RiskLevel::Other(value),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(value: RiskLevel) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Baixo => write!(f, "Baixo"),
            RiskLevel::Medio => write!(f, "Médio"),
            RiskLevel::Alto => write!(f, "Alto"),
            RiskLevel::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Análise completa de um problema mecânico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub diagnostico: String,
    pub risco: RiskLevel,
    pub acoes: Vec<String>,
}

/// Perfil de acesso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Qualquer valor diferente de "admin" vira usuário comum
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim() == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::User => "Condutor",
        }
    }
}

/// Usuário do diretório local (cpf é o identificador único)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub cpf: String,
    #[serde(default)]
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_state_roundtrip_field_names() {
        let state = ItemState {
            status: ItemStatus::Defect,
            description: "pneu furado".into(),
            image: None,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"status":"defect","description":"pneu furado"}"#);
    }

    #[test]
    fn test_item_state_missing_description() {
        let state: ItemState = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(state.status, ItemStatus::Ok);
        assert!(state.description.is_empty());
        assert!(state.image.is_none());
    }

    #[test]
    fn test_risk_level_passthrough() {
        let risk: RiskLevel = serde_json::from_str(r#""Médio""#).unwrap();
        assert_eq!(risk, RiskLevel::Medio);
        assert_eq!(risk.style(), "yellow");

        let odd: RiskLevel = serde_json::from_str(r#""Crítico""#).unwrap();
        assert_eq!(odd, RiskLevel::Other("Crítico".into()));
        assert_eq!(odd.style(), "unknown");
        assert_eq!(serde_json::to_string(&odd).unwrap(), r#""Crítico""#);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("OK".parse::<ItemStatus>().unwrap(), ItemStatus::Ok);
        assert_eq!("defeito".parse::<ItemStatus>().unwrap(), ItemStatus::Defect);
        assert!("maybe".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_role_lenient() {
        assert_eq!(Role::parse_lenient("admin"), Role::Admin);
        assert_eq!(Role::parse_lenient("supervisor"), Role::User);
        let user: User =
            serde_json::from_str(r#"{"name":"A","email":"a@b","cpf":"1"}"#).unwrap();
        assert_eq!(user.role, Role::User);
    }
}
