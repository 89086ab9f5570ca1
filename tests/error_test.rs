//! Mensagens de erro exibidas ao usuário

use checklist_common::Error as CommonError;
use vtr_checklist::error::ChecklistError;

#[test]
fn test_validation_message_is_verbatim() {
    let err = ChecklistError::Validation("Por favor, preencha todos os campos.".into());
    assert_eq!(err.to_string(), "Por favor, preencha todos os campos.");
}

#[test]
fn test_common_validation_maps_to_validation() {
    let err: ChecklistError = CommonError::Validation("faltou a VTR".into()).into();
    assert!(matches!(err, ChecklistError::Validation(ref m) if m == "faltou a VTR"));
}

#[test]
fn test_common_parse_maps_to_api_parse() {
    let err: ChecklistError = CommonError::Parse("sem JSON".into()).into();
    assert!(matches!(err, ChecklistError::ApiParse(_)));
}

#[test]
fn test_missing_api_key_mentions_env_var() {
    let msg = ChecklistError::MissingApiKey.to_string();
    assert!(msg.contains("GEMINI_API_KEY"));
}

#[test]
fn test_json_error_converts() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ChecklistError = json_err.into();
    assert!(matches!(err, ChecklistError::JsonParse(_)));
}
