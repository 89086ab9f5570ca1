//! Tipos de erro

use thiserror::Error;

/// Erro comum
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Mensagem destinada ao usuário, sem alteração de estado
    #[error("{0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Alias de Result
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_validation_is_shown_verbatim() {
        let error = Error::Validation("Preencha todos os campos.".to_string());
        assert_eq!(format!("{}", error), "Preencha todos os campos.");
    }
}
