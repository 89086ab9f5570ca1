//! Sessão da aplicação
//!
//! Dono da sessão de trabalho, do histórico e do repositório. Toda mutação
//! é gravada imediatamente (write-through, documento inteiro).

use crate::confirm::Confirm;
use crate::error::{ChecklistError, Result};
use crate::storage::{ChecklistRepository, KeyValueStore};
use base64::Engine;
use checklist_common::data_url::to_data_url;
use checklist_common::{
    HeaderField, HistoryLog, HistoryRecord, ItemStatus, WorkingSession, CHECKLIST_ITEMS,
};
use chrono::{NaiveDate, Utc};
use std::path::Path;
use tracing::{debug, info};

pub const RESET_AFTER_COMMIT_PROMPT: &str =
    "Checklist salvo no histórico com sucesso! Deseja limpar o formulário para um novo checklist?";
pub const DELETE_RECORD_PROMPT: &str = "Tem certeza que deseja excluir este registro do histórico?";
pub const CLEAR_FORM_PROMPT: &str = "Tem certeza que deseja limpar todo o checklist atual?";

/// Resultado de salvar no histórico
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub record_id: String,
    pub defects_count: usize,
    /// true se o formulário foi limpo após salvar
    pub reset: bool,
}

pub struct ChecklistApp<S: KeyValueStore> {
    session: WorkingSession,
    history: HistoryLog,
    repo: ChecklistRepository<S>,
}

impl<S: KeyValueStore> ChecklistApp<S> {
    /// Hidrata a partir do armazenamento (vazio se não houver dados)
    pub fn open(store: S) -> Self {
        let repo = ChecklistRepository::new(store);
        let (session, history) = repo.load();
        Self { session, history, repo }
    }

    pub fn session(&self) -> &WorkingSession {
        &self.session
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn repository(&self) -> &ChecklistRepository<S> {
        &self.repo
    }

    pub fn set_status(&mut self, item_id: u32, status: ItemStatus) -> Result<()> {
        ensure_catalog_item(item_id)?;
        self.update_session(|s| s.item_states.set_status(item_id, status))?;
        Ok(())
    }

    /// Devolve false se o item não estiver com defeito (nada muda)
    pub fn set_description(&mut self, item_id: u32, text: &str) -> Result<bool> {
        ensure_catalog_item(item_id)?;
        self.update_session(|s| s.item_states.set_description(item_id, text))
    }

    /// Devolve false se o item não tiver entrada (nada muda)
    pub fn set_image(&mut self, item_id: u32, data_url: Option<String>) -> Result<bool> {
        ensure_catalog_item(item_id)?;
        self.update_session(move |s| s.item_states.set_image(item_id, data_url))
    }

    /// Lê o arquivo, codifica como data URL e anexa ao item
    pub fn attach_image_file(&mut self, item_id: u32, path: &Path) -> Result<bool> {
        let data_url = encode_image_file(path)?;
        self.set_image(item_id, Some(data_url))
    }

    /// A data precisa estar no formato AAAA-MM-DD
    pub fn set_header(&mut self, field: HeaderField, value: &str) -> Result<()> {
        if field == HeaderField::Date {
            validate_date(value)?;
        }
        self.update_session(|s| s.header.set(field, value))?;
        Ok(())
    }

    /// Limpa itens, turno e VTR após confirmação; devolve se limpou
    pub fn clear_form(&mut self, confirm: &dyn Confirm) -> Result<bool> {
        if !confirm.confirm(CLEAR_FORM_PROMPT) {
            return Ok(false);
        }
        self.update_session(|s| {
            s.clear_form();
            true
        })?;
        Ok(true)
    }

    /// Salva a sessão no histórico e pergunta se o formulário deve ser limpo
    ///
    /// Falha de validação ou de gravação deixa o histórico como estava.
    pub fn commit_to_history(&mut self, confirm: &dyn Confirm) -> Result<CommitOutcome> {
        let mut history = self.history.clone();
        let record = history.commit(&self.session, Utc::now())?;
        let record_id = record.id.clone();
        let defects_count = record.defects_count;
        self.repo.save_history(&history)?;
        self.history = history;
        info!(id = %record_id, defects = defects_count, "checklist salvo no histórico");

        let reset = confirm.confirm(RESET_AFTER_COMMIT_PROMPT);
        if reset {
            self.update_session(|s| {
                s.reset_after_commit();
                true
            })?;
        }
        Ok(CommitOutcome {
            record_id,
            defects_count,
            reset,
        })
    }

    /// Exclui após confirmação; Ok(false) se cancelado ou id inexistente
    pub fn delete_history_record(&mut self, record_id: &str, confirm: &dyn Confirm) -> Result<bool> {
        if !confirm.confirm(DELETE_RECORD_PROMPT) {
            return Ok(false);
        }
        let mut history = self.history.clone();
        if !history.delete(record_id) {
            debug!(id = record_id, "registro inexistente, nada a excluir");
            return Ok(false);
        }
        self.repo.save_history(&history)?;
        self.history = history;
        Ok(true)
    }

    pub fn history_record(&self, record_id: &str) -> Result<&HistoryRecord> {
        self.history
            .get(record_id)
            .ok_or_else(|| ChecklistError::RecordNotFound(record_id.to_string()))
    }

    /// Aplica a mudança numa cópia; a sessão só é trocada depois de gravada
    fn update_session(&mut self, change: impl FnOnce(&mut WorkingSession) -> bool) -> Result<bool> {
        let mut next = self.session.clone();
        if !change(&mut next) {
            return Ok(false);
        }
        self.repo.save(&next)?;
        self.session = next;
        Ok(true)
    }
}

fn validate_date(value: &str) -> Result<()> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ChecklistError::Validation(format!("Data inválida: {}. Use AAAA-MM-DD", value)))
}

fn ensure_catalog_item(item_id: u32) -> Result<()> {
    if checklist_common::catalog::find(item_id).is_none() {
        return Err(ChecklistError::Validation(format!(
            "Item {} não existe no checklist (1-{})",
            item_id,
            CHECKLIST_ITEMS.len()
        )));
    }
    Ok(())
}

/// MIME type pela extensão do arquivo
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Arquivo → data URL base64
pub fn encode_image_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ChecklistError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(to_data_url(mime_type_for(path), &encoded))
}
