//! Armazenamento do estado dos itens
//!
//! Cada mutador devolve `true` quando o mapa mudou; quem possui o mapa
//! decide se grava.

use crate::types::{ItemState, ItemStatus};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Estado por item, indexado pelo id do catálogo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemStates(BTreeMap<u32, ItemState>);

impl ItemStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define o status; repetir o status atual remove a entrada
    ///
    /// Descrição e imagem existentes são preservadas na troca de status.
    pub fn set_status(&mut self, id: u32, status: ItemStatus) -> bool {
        let current = self.0.get(&id).map(|s| s.status);
        match current {
            Some(existing) if existing == status => {
                self.0.remove(&id);
            }
            Some(_) => {
                if let Some(state) = self.0.get_mut(&id) {
                    state.status = status;
                }
            }
            None => {
                self.0.insert(id, ItemState::new(status));
            }
        }
        true
    }

    /// Sobrescreve a descrição; ignorado se o item não estiver com defeito
    pub fn set_description(&mut self, id: u32, text: &str) -> bool {
        match self.0.get_mut(&id) {
            Some(state) if state.status == ItemStatus::Defect => {
                if state.description == text {
                    return false;
                }
                state.description = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Anexa (Some) ou remove (None) a imagem
    ///
    /// Item sem entrada não recebe imagem. Tolera a entrada ter sumido entre
    /// a seleção do arquivo e a aplicação do resultado.
    pub fn set_image(&mut self, id: u32, image: Option<String>) -> bool {
        let Some(state) = self.0.get_mut(&id) else {
            return false;
        };
        match image {
            Some(data) => {
                state.image = Some(data);
                true
            }
            None => state.image.take().is_some(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&ItemState> {
        self.0.get(&id)
    }

    pub fn status(&self, id: u32) -> Option<ItemStatus> {
        self.0.get(&id).map(|s| s.status)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, u32, ItemState> {
        self.0.iter()
    }

    /// Quantidade de itens inspecionados
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn defects_count(&self) -> usize {
        self.0
            .values()
            .filter(|s| s.status == ItemStatus::Defect)
            .count()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Percentual de conclusão: round(100 * inspecionados / itens do catálogo)
///
/// Catálogo vazio resulta em 0%.
pub fn completion_percentage(states: &ItemStates, catalog_len: usize) -> u32 {
    if catalog_len == 0 {
        return 0;
    }
    (100.0 * states.len() as f64 / catalog_len as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defect_with(states: &mut ItemStates, id: u32, text: &str) {
        states.set_status(id, ItemStatus::Defect);
        states.set_description(id, text);
    }

    #[test]
    fn test_toggle_same_status_twice_restores() {
        for status in [ItemStatus::Ok, ItemStatus::Defect] {
            let mut states = ItemStates::new();
            states.set_status(3, status);
            assert_eq!(states.status(3), Some(status));
            states.set_status(3, status);
            assert_eq!(states, ItemStates::new());
        }
    }

    #[test]
    fn test_toggle_pair_on_existing_ok_entry() {
        let mut states = ItemStates::new();
        states.set_status(1, ItemStatus::Ok);
        let before = states.clone();

        states.set_status(1, ItemStatus::Ok);
        assert!(states.get(1).is_none());
        states.set_status(1, ItemStatus::Ok);
        assert_eq!(states, before);
    }

    #[test]
    fn test_switch_status_preserves_description_and_image() {
        let mut states = ItemStates::new();
        defect_with(&mut states, 5, "vazamento");
        states.set_image(5, Some("data:image/png;base64,AAAA".into()));

        states.set_status(5, ItemStatus::Ok);
        let state = states.get(5).unwrap();
        assert_eq!(state.status, ItemStatus::Ok);
        assert_eq!(state.description, "vazamento");
        assert!(state.image.is_some());
    }

    #[test]
    fn test_description_ignored_unless_defect() {
        let mut states = ItemStates::new();
        states.set_status(2, ItemStatus::Ok);
        assert!(!states.set_description(2, "x"));
        assert_eq!(states.get(2).unwrap().description, "");

        assert!(!states.set_description(7, "sem entrada"));
        assert!(states.get(7).is_none());

        defect_with(&mut states, 8, "farol queimado");
        assert_eq!(states.get(8).unwrap().description, "farol queimado");
    }

    #[test]
    fn test_image_requires_entry() {
        let mut states = ItemStates::new();
        assert!(!states.set_image(4, Some("data:image/jpeg;base64,/9j/".into())));
        assert!(states.is_empty());

        // remoção sem entrada também é no-op
        assert!(!states.set_image(4, None));
    }

    #[test]
    fn test_image_after_entry_removed() {
        let mut states = ItemStates::new();
        states.set_status(6, ItemStatus::Defect);
        states.set_status(6, ItemStatus::Defect);
        assert!(!states.set_image(6, Some("data:image/jpeg;base64,/9j/".into())));
        assert!(states.get(6).is_none());
    }

    #[test]
    fn test_image_remove() {
        let mut states = ItemStates::new();
        states.set_status(6, ItemStatus::Defect);
        states.set_image(6, Some("data:image/jpeg;base64,/9j/".into()));
        assert!(states.set_image(6, None));
        assert!(states.get(6).unwrap().image.is_none());
        assert!(!states.set_image(6, None));
    }

    #[test]
    fn test_defects_count() {
        let mut states = ItemStates::new();
        states.set_status(1, ItemStatus::Ok);
        states.set_status(2, ItemStatus::Defect);
        states.set_status(3, ItemStatus::Defect);
        assert_eq!(states.defects_count(), 2);
        assert_eq!(states.len(), 3);
    }

    #[test]
    fn test_completion_percentage() {
        let mut states = ItemStates::new();
        assert_eq!(completion_percentage(&states, 22), 0);

        for id in 1..=11 {
            let status = if id % 2 == 0 { ItemStatus::Ok } else { ItemStatus::Defect };
            states.set_status(id, status);
        }
        assert_eq!(completion_percentage(&states, 22), 50);

        for id in 12..=22 {
            states.set_status(id, ItemStatus::Ok);
        }
        assert_eq!(completion_percentage(&states, 22), 100);
    }

    #[test]
    fn test_completion_rounding_and_empty_catalog() {
        let mut states = ItemStates::new();
        states.set_status(1, ItemStatus::Ok);
        // 100 / 22 = 4.545...
        assert_eq!(completion_percentage(&states, 22), 5);
        assert_eq!(completion_percentage(&states, 0), 0);
    }

    #[test]
    fn test_serialized_keys_are_item_ids() {
        let mut states = ItemStates::new();
        states.set_status(12, ItemStatus::Ok);
        let json = serde_json::to_string(&states).unwrap();
        assert_eq!(json, r#"{"12":{"status":"ok","description":""}}"#);

        let back: ItemStates = serde_json::from_str(&json).unwrap();
        assert_eq!(back, states);
    }
}
