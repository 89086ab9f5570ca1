//! Adaptador de persistência
//!
//! Três chaves independentes: sessão de trabalho, histórico e usuários.
//! Leitura nunca falha: dado ausente ou ilegível vira o valor padrão e o
//! problema vai só para o log.

use super::KeyValueStore;
use crate::error::Result;
use checklist_common::{HistoryLog, User, WorkingSession};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub const DATA_KEY: &str = "ambulanceChecklistData";
pub const HISTORY_KEY: &str = "ambulanceChecklistHistory";
pub const USERS_KEY: &str = "ambulanceUsers";

pub struct ChecklistRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ChecklistRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Sessão e histórico; cada chave falha de forma independente
    pub fn load(&self) -> (WorkingSession, HistoryLog) {
        let mut session: WorkingSession = self.read_or_default(DATA_KEY);
        session.normalize();
        let history: HistoryLog = self.read_or_default(HISTORY_KEY);
        debug!(
            items = session.item_states.len(),
            records = history.len(),
            "dados carregados"
        );
        (session, history)
    }

    pub fn save(&mut self, session: &WorkingSession) -> Result<()> {
        self.write(DATA_KEY, session)
    }

    pub fn save_history(&mut self, history: &HistoryLog) -> Result<()> {
        self.write(HISTORY_KEY, history)
    }

    pub fn load_users(&self) -> Vec<User> {
        self.read_or_default(USERS_KEY)
    }

    pub fn save_users(&mut self, users: &[User]) -> Result<()> {
        self.write(USERS_KEY, users)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "falha ao ler dados gravados");
                return T::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "dados gravados ilegíveis, usando valores vazios");
                T::default()
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use checklist_common::ItemStatus;

    #[test]
    fn test_missing_keys_yield_empty() {
        let repo = ChecklistRepository::new(MemoryStore::new());
        let (session, history) = repo.load();
        assert!(session.item_states.is_empty());
        assert!(!session.header.date.is_empty());
        assert!(history.is_empty());
        assert!(repo.load_users().is_empty());
    }

    #[test]
    fn test_malformed_bytes_fail_open() {
        let mut store = MemoryStore::new();
        store.set(DATA_KEY, "{not json").unwrap();
        store.set(HISTORY_KEY, "[{\"broken\"").unwrap();
        store.set(USERS_KEY, "42").unwrap();
        let repo = ChecklistRepository::new(store);

        let (session, history) = repo.load();
        assert!(session.item_states.is_empty());
        assert!(history.is_empty());
        assert!(repo.load_users().is_empty());
    }

    #[test]
    fn test_keys_fail_independently() {
        let mut repo = ChecklistRepository::new(MemoryStore::new());
        let mut session = WorkingSession::new();
        session.header.condutor = "Rita".into();
        session.header.vtr = "USA-03".into();
        session.item_states.set_status(4, ItemStatus::Ok);
        repo.save(&session).unwrap();

        let mut store = repo.into_inner();
        store.set(HISTORY_KEY, "garbage").unwrap();
        let repo = ChecklistRepository::new(store);

        let (loaded, history) = repo.load();
        assert_eq!(loaded, session);
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_whole_value() {
        let mut repo = ChecklistRepository::new(MemoryStore::new());
        let mut session = WorkingSession::new();
        session.item_states.set_status(1, ItemStatus::Defect);
        repo.save(&session).unwrap();
        session.item_states.set_status(1, ItemStatus::Defect);
        repo.save(&session).unwrap();

        let raw = repo.store().get(DATA_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["itemStates"], serde_json::json!({}));
        assert_eq!(repo.store().writes(), 2);
    }
}
