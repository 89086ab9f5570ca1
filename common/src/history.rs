//! Histórico de checklists finalizados
//!
//! Registros são cópias congeladas da sessão; não há operação de edição.
//! Ordem: mais recente primeiro.

use crate::error::{Error, Result};
use crate::session::{HeaderData, Snapshot, WorkingSession};
use crate::state::ItemStates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const COMMIT_VALIDATION_MESSAGE: &str =
    "Por favor, preencha o nome do condutor e o número da VTR para salvar no histórico.";

/// Registro imutável do histórico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub header: HeaderData,
    #[serde(default)]
    pub item_states: ItemStates,
    #[serde(default)]
    pub defects_count: usize,
}

impl Snapshot for HistoryRecord {
    fn header(&self) -> &HeaderData {
        &self.header
    }

    fn item_states(&self) -> &ItemStates {
        &self.item_states
    }
}

/// Lista de registros, mais recente primeiro
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Congela a sessão em um novo registro no topo da lista
    ///
    /// Exige condutor e VTR preenchidos; em caso de erro nada muda.
    pub fn commit(&mut self, session: &WorkingSession, now: DateTime<Utc>) -> Result<&HistoryRecord> {
        let header = &session.header;
        if header.condutor.trim().is_empty() || header.vtr.trim().is_empty() {
            return Err(Error::Validation(COMMIT_VALIDATION_MESSAGE.into()));
        }

        let record = HistoryRecord {
            id: self.next_id(now),
            saved_at: now,
            header: header.clone(),
            item_states: session.item_states.clone(),
            defects_count: session.item_states.defects_count(),
        };
        self.records.insert(0, record);
        Ok(&self.records[0])
    }

    /// Remove o registro com o id dado; devolve false se não existir
    pub fn delete(&mut self, id: &str) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Milissegundos desde a época; incrementa até ser único no histórico
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}
