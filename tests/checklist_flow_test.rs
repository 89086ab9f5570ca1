//! Sessão de trabalho + histórico sobre armazenamento real (arquivos)

use checklist_common::{HeaderField, ItemStatus, Snapshot};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::tempdir;
use vtr_checklist::app::ChecklistApp;
use vtr_checklist::confirm::FixedAnswer;
use vtr_checklist::error::{ChecklistError, Result};
use vtr_checklist::storage::repository::{DATA_KEY, HISTORY_KEY};
use vtr_checklist::storage::{FileStore, KeyValueStore, MemoryStore};

/// Recusa gravar `key` enquanto `failing` estiver ligado
struct FailingStore {
    inner: MemoryStore,
    key: &'static str,
    failing: Rc<Cell<bool>>,
}

impl FailingStore {
    fn new(key: &'static str) -> (Self, Rc<Cell<bool>>) {
        let failing = Rc::new(Cell::new(false));
        let store = Self {
            inner: MemoryStore::new(),
            key,
            failing: Rc::clone(&failing),
        };
        (store, failing)
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key == self.key && self.failing.get() {
            return Err(ChecklistError::Storage("disco cheio".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        self.inner.remove(key)
    }
}

fn filled_app<S: KeyValueStore>(store: S) -> ChecklistApp<S> {
    let mut app = ChecklistApp::open(store);
    app.set_header(HeaderField::Condutor, "João").unwrap();
    app.set_header(HeaderField::Vtr, "VTR-01").unwrap();
    app.set_header(HeaderField::Turno, "Diurno").unwrap();
    app
}

#[test]
fn test_session_survives_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");

    {
        let mut app = ChecklistApp::open(FileStore::new(dir.path()));
        app.set_status(1, ItemStatus::Defect).unwrap();
        app.set_description(1, "Pneu careca").unwrap();
        app.set_status(2, ItemStatus::Ok).unwrap();
        app.set_header(HeaderField::Vtr, "VTR-07").unwrap();
    }

    let app = ChecklistApp::open(FileStore::new(dir.path()));
    let states = app.session().item_states();
    assert_eq!(states.status(1), Some(ItemStatus::Defect));
    assert_eq!(states.get(1).unwrap().description, "Pneu careca");
    assert_eq!(states.status(2), Some(ItemStatus::Ok));
    assert_eq!(app.session().header().vtr, "VTR-07");
}

#[test]
fn test_toggle_same_status_unmarks_item() {
    let mut app = ChecklistApp::open(MemoryStore::new());
    app.set_status(5, ItemStatus::Ok).unwrap();
    app.set_status(5, ItemStatus::Ok).unwrap();
    assert_eq!(app.session().item_states().status(5), None);
    assert_eq!(app.session().completion_percentage(), 0);
}

#[test]
fn test_unknown_item_is_rejected() {
    let mut app = ChecklistApp::open(MemoryStore::new());
    let err = app.set_status(99, ItemStatus::Ok).unwrap_err();
    assert!(matches!(err, ChecklistError::Validation(_)));
    assert_eq!(app.repository().store().writes(), 0);
}

#[test]
fn test_description_ignored_for_ok_item() {
    let mut app = ChecklistApp::open(MemoryStore::new());
    app.set_status(3, ItemStatus::Ok).unwrap();
    assert!(!app.set_description(3, "nada").unwrap());
    assert_eq!(app.session().item_states().get(3).unwrap().description, "");
}

#[test]
fn test_commit_without_condutor_writes_nothing() {
    let mut app = ChecklistApp::open(MemoryStore::new());
    app.set_header(HeaderField::Vtr, "VTR-01").unwrap();
    app.set_status(1, ItemStatus::Ok).unwrap();
    let writes_before = app.repository().store().writes();

    let err = app.commit_to_history(&FixedAnswer(true)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Por favor, preencha o nome do condutor e o número da VTR para salvar no histórico."
    );
    assert!(app.history().is_empty());
    assert_eq!(app.repository().store().writes(), writes_before);
}

#[test]
fn test_commit_is_deep_copy() {
    let mut app = filled_app(MemoryStore::new());
    app.set_status(1, ItemStatus::Defect).unwrap();
    app.set_description(1, "Farol queimado").unwrap();

    let outcome = app.commit_to_history(&FixedAnswer(false)).unwrap();
    assert!(!outcome.reset);
    assert_eq!(outcome.defects_count, 1);

    // edições posteriores não alteram o registro salvo
    app.set_description(1, "Farol trocado").unwrap();
    app.set_status(2, ItemStatus::Ok).unwrap();

    let record = app.history_record(&outcome.record_id).unwrap();
    assert_eq!(record.item_states().get(1).unwrap().description, "Farol queimado");
    assert_eq!(record.item_states().status(2), None);
    assert_eq!(record.header().condutor, "João");
}

#[test]
fn test_commit_with_reset_keeps_condutor() {
    let mut app = filled_app(MemoryStore::new());
    app.set_status(1, ItemStatus::Ok).unwrap();

    let outcome = app.commit_to_history(&FixedAnswer(true)).unwrap();
    assert!(outcome.reset);
    assert!(app.session().item_states().is_empty());
    assert_eq!(app.session().header().vtr, "");
    assert_eq!(app.session().header().condutor, "João");
    assert_eq!(app.history().len(), 1);
}

#[test]
fn test_history_newest_first_and_delete() {
    let mut app = filled_app(MemoryStore::new());
    let first = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;
    let second = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;
    let third = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;

    let ids: Vec<_> = app.history().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![third.clone(), second.clone(), first.clone()]);

    // cancelado: nada muda
    assert!(!app.delete_history_record(&second, &FixedAnswer(false)).unwrap());
    assert_eq!(app.history().len(), 3);

    assert!(app.delete_history_record(&second, &FixedAnswer(true)).unwrap());
    let ids: Vec<_> = app.history().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![third, first]);

    // id inexistente
    assert!(!app.delete_history_record("nope", &FixedAnswer(true)).unwrap());
    assert!(matches!(
        app.history_record("nope"),
        Err(ChecklistError::RecordNotFound(_))
    ));
}

#[test]
fn test_clear_form_requires_confirmation() {
    let mut app = filled_app(MemoryStore::new());
    app.set_status(1, ItemStatus::Ok).unwrap();

    assert!(!app.clear_form(&FixedAnswer(false)).unwrap());
    assert_eq!(app.session().item_states().len(), 1);

    assert!(app.clear_form(&FixedAnswer(true)).unwrap());
    assert!(app.session().item_states().is_empty());
    assert_eq!(app.session().header().turno, "");
    assert_eq!(app.session().header().vtr, "");
    assert_eq!(app.session().header().condutor, "João");
}

#[test]
fn test_malformed_storage_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path());
    store.set(DATA_KEY, "{not json").unwrap();
    store.set(HISTORY_KEY, "[]").unwrap();

    let app = ChecklistApp::open(store);
    assert!(app.session().item_states().is_empty());
    assert!(!app.session().header().date.is_empty());
    assert!(app.history().is_empty());
}

#[test]
fn test_attach_image_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image_path = dir.path().join("defeito.png");
    std::fs::write(&image_path, [0x89, b'P', b'N', b'G']).unwrap();

    let mut app = ChecklistApp::open(MemoryStore::new());

    // sem status: nada é anexado
    assert!(!app.attach_image_file(4, &image_path).unwrap());

    app.set_status(4, ItemStatus::Defect).unwrap();
    assert!(app.attach_image_file(4, &image_path).unwrap());
    let image = app.session().item_states().get(4).unwrap().image.clone().unwrap();
    assert!(image.starts_with("data:image/png;base64,"));

    // trocar o status preserva a imagem
    app.set_status(4, ItemStatus::Ok).unwrap();
    assert!(app.session().item_states().get(4).unwrap().image.is_some());

    assert!(app.set_image(4, None).unwrap());
    assert!(app.session().item_states().get(4).unwrap().image.is_none());

    let missing = app.attach_image_file(4, &dir.path().join("nao-existe.jpg"));
    assert!(matches!(missing, Err(ChecklistError::FileNotFound(_))));
}

#[test]
fn test_history_survives_reopen_after_delete() {
    let dir = tempdir().expect("Failed to create temp dir");

    let (first, third) = {
        let mut app = filled_app(FileStore::new(dir.path()));
        let first = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;
        let second = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;
        let third = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;
        assert!(app.delete_history_record(&second, &FixedAnswer(true)).unwrap());
        (first, third)
    };

    let app = ChecklistApp::open(FileStore::new(dir.path()));
    let ids: Vec<_> = app.history().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![third, first]);
}

#[test]
fn test_failed_history_write_keeps_history() {
    let (store, failing) = FailingStore::new(HISTORY_KEY);
    let mut app = filled_app(store);
    app.set_status(1, ItemStatus::Ok).unwrap();
    let kept = app.commit_to_history(&FixedAnswer(false)).unwrap().record_id;

    failing.set(true);
    let err = app.commit_to_history(&FixedAnswer(true)).unwrap_err();
    assert!(matches!(err, ChecklistError::Storage(_)));
    assert_eq!(app.history().len(), 1);
    // sem registro novo, o formulário não é limpo
    assert_eq!(app.session().item_states().len(), 1);

    let err = app.delete_history_record(&kept, &FixedAnswer(true)).unwrap_err();
    assert!(matches!(err, ChecklistError::Storage(_)));
    assert!(app.history_record(&kept).is_ok());
}

#[test]
fn test_failed_session_write_keeps_session() {
    let (store, failing) = FailingStore::new(DATA_KEY);
    let mut app = ChecklistApp::open(store);
    app.set_status(1, ItemStatus::Defect).unwrap();

    failing.set(true);
    assert!(app.set_status(1, ItemStatus::Ok).is_err());
    assert!(app.set_description(1, "Pneu furado").is_err());
    assert!(app.set_header(HeaderField::Vtr, "VTR-02").is_err());

    let states = app.session().item_states();
    assert_eq!(states.status(1), Some(ItemStatus::Defect));
    assert_eq!(states.get(1).unwrap().description, "");
    assert_eq!(app.session().header().vtr, "");
}

#[test]
fn test_header_date_must_be_iso() {
    let mut app = ChecklistApp::open(MemoryStore::new());
    let today = app.session().header().date.clone();

    for bad in ["01/05/2024", "2024-13-01", "ontem", ""] {
        let err = app.set_header(HeaderField::Date, bad).unwrap_err();
        assert!(matches!(err, ChecklistError::Validation(_)), "{}", bad);
    }
    assert_eq!(app.session().header().date, today);
    assert_eq!(app.repository().store().writes(), 0);

    app.set_header(HeaderField::Date, "2024-05-01").unwrap();
    assert_eq!(app.session().header().date, "2024-05-01");
}
