//! Sessão de trabalho (checklist em preenchimento)

use crate::catalog::CHECKLIST_ITEMS;
use crate::state::{completion_percentage, ItemStates};
use serde::{Deserialize, Serialize};

/// Data de hoje no formato ISO (AAAA-MM-DD)
pub fn today_iso() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Cabeçalho da vistoria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderData {
    pub condutor: String,
    /// Data ISO; o nome gravado é "data"
    #[serde(rename = "data")]
    pub date: String,
    pub turno: String,
    pub vtr: String,
}

impl Default for HeaderData {
    fn default() -> Self {
        Self {
            condutor: String::new(),
            date: today_iso(),
            turno: String::new(),
            vtr: String::new(),
        }
    }
}

/// Campo editável do cabeçalho
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Condutor,
    Date,
    Turno,
    Vtr,
}

impl HeaderData {
    pub fn set(&mut self, field: HeaderField, value: &str) -> bool {
        let slot = match field {
            HeaderField::Condutor => &mut self.condutor,
            HeaderField::Date => &mut self.date,
            HeaderField::Turno => &mut self.turno,
            HeaderField::Vtr => &mut self.vtr,
        };
        if slot == value {
            return false;
        }
        *slot = value.to_string();
        true
    }
}

/// Visão somente leitura compartilhada por sessão e registro de histórico
pub trait Snapshot {
    fn header(&self) -> &HeaderData;
    fn item_states(&self) -> &ItemStates;

    fn completion_percentage(&self) -> u32 {
        completion_percentage(self.item_states(), CHECKLIST_ITEMS.len())
    }
}

/// Checklist em preenchimento
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkingSession {
    pub item_states: ItemStates,
    #[serde(rename = "headerData")]
    pub header: HeaderData,
}

impl WorkingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data vazia volta a ser a de hoje (dado gravado incompleto)
    pub fn normalize(&mut self) {
        if self.header.date.trim().is_empty() {
            self.header.date = today_iso();
        }
    }

    /// Reinício após salvar no histórico: mantém condutor, turno e data
    pub fn reset_after_commit(&mut self) {
        self.item_states.clear();
        self.header.vtr.clear();
    }

    /// Limpeza do formulário: mantém condutor e data
    pub fn clear_form(&mut self) {
        self.item_states.clear();
        self.header.turno.clear();
        self.header.vtr.clear();
    }
}

impl Snapshot for WorkingSession {
    fn header(&self) -> &HeaderData {
        &self.header
    }

    fn item_states(&self) -> &ItemStates {
        &self.item_states
    }
}
