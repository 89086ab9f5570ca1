//! Checklist de viatura: biblioteca comum
//!
//! Tipos e regras sem I/O compartilhados pela CLI:
//! catálogo, estado dos itens, sessão de trabalho, histórico,
//! parser das respostas de IA e modelo do relatório.

pub mod catalog;
pub mod data_url;
pub mod error;
pub mod export;
pub mod history;
pub mod layout;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod state;
pub mod types;

pub use catalog::{group_by_category, ChecklistItemDefinition, CHECKLIST_ITEMS};
pub use error::{Error, Result};
pub use export::report_core::{build_report, report_file_name, ReportModel, ReportRow};
pub use history::{HistoryLog, HistoryRecord};
pub use parser::{extract_json_object, parse_analysis_response};
pub use session::{HeaderData, HeaderField, Snapshot, WorkingSession};
pub use state::{completion_percentage, ItemStates};
pub use types::{AnalysisResult, ItemState, ItemStatus, RiskLevel, Role, User};
