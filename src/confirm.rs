//! Confirmação de ações destrutivas (sim/não síncrono)

use dialoguer::Confirm as DialoguerConfirm;

pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Pergunta no terminal; erro de terminal conta como "não"
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        DialoguerConfirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Resposta fixa (`--yes` e testes)
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}
