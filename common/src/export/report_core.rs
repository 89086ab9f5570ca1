//! Modelo do relatório de vistoria
//!
//! Monta cabeçalho, tabela agrupada por categoria e lista de anexos a partir
//! de qualquer `Snapshot` (sessão atual ou registro do histórico). O
//! desenho fica a cargo do gerador de PDF.

use crate::catalog::{group_by_category, ChecklistItemDefinition};
use crate::session::Snapshot;
use crate::state::completion_percentage;
use crate::types::ItemStatus;

pub const REPORT_TITLE: &str = "Relatório de Vistoria de Ambulância";
pub const TABLE_HEAD: [&str; 3] = ["Item de Verificação", "Status", "Observações"];
pub const NOT_INSPECTED_LABEL: &str = "Não verificado";
pub const SUPERVISOR_LABEL: &str = "Supervisor Responsável";
pub const APPENDIX_TITLE: &str = "Anexos: Imagens de Defeitos";
pub const IMAGE_ERROR_TEXT: &str = "Erro ao carregar imagem.";

/// Linha da tabela
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRow {
    Category(String),
    Item {
        label: String,
        status: Option<ItemStatus>,
        description: String,
    },
}

impl ReportRow {
    /// Rótulo de status exibido na segunda coluna
    pub fn status_label(&self) -> &'static str {
        match self {
            ReportRow::Category(_) => "",
            ReportRow::Item { status: Some(s), .. } => s.label(),
            ReportRow::Item { status: None, .. } => NOT_INSPECTED_LABEL,
        }
    }
}

/// Imagem anexada a um item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAttachment {
    pub item_id: u32,
    pub label: String,
    pub data_url: String,
}

/// Conteúdo completo do relatório
#[derive(Debug, Clone)]
pub struct ReportModel {
    pub title: &'static str,
    /// Coluna esquerda: condutor, data
    pub header_left: [String; 2],
    /// Coluna direita: turno, VTR
    pub header_right: [String; 2],
    pub progress_line: String,
    pub rows: Vec<ReportRow>,
    pub signature_name: String,
    pub attachments: Vec<ReportAttachment>,
    pub file_name: String,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Separadores de caminho e caracteres proibidos em nomes de arquivo viram '-'
fn file_name_part(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

/// Nome do arquivo: relatorio-vtr-<vtr|desconhecida>-<data>.pdf
pub fn report_file_name(vtr: &str, date: &str) -> String {
    format!(
        "relatorio-vtr-{}-{}.pdf",
        file_name_part(&or_placeholder(vtr, "desconhecida")),
        file_name_part(date)
    )
}

/// Monta o relatório para o snapshot e catálogo dados
pub fn build_report<S: Snapshot + ?Sized>(
    snapshot: &S,
    catalog: &[ChecklistItemDefinition],
) -> ReportModel {
    let header = snapshot.header();
    let states = snapshot.item_states();

    let mut rows = Vec::with_capacity(catalog.len() + 4);
    for (category, items) in group_by_category(catalog) {
        rows.push(ReportRow::Category(category.to_string()));
        for item in items {
            let state = states.get(item.id);
            let description = match state {
                Some(s) if s.status == ItemStatus::Defect => s.description.clone(),
                _ => String::new(),
            };
            rows.push(ReportRow::Item {
                label: item.label.to_string(),
                status: state.map(|s| s.status),
                description,
            });
        }
    }

    let attachments = catalog
        .iter()
        .filter_map(|item| {
            let image = states.get(item.id)?.image.as_ref()?;
            Some(ReportAttachment {
                item_id: item.id,
                label: item.label.to_string(),
                data_url: image.clone(),
            })
        })
        .collect();

    ReportModel {
        title: REPORT_TITLE,
        header_left: [
            format!("Condutor: {}", or_placeholder(&header.condutor, "Não informado")),
            format!("Data: {}", header.date),
        ],
        header_right: [
            format!("Turno: {}", or_placeholder(&header.turno, "Não informado")),
            format!("Nº VTR: {}", or_placeholder(&header.vtr, "Não informada")),
        ],
        progress_line: format!(
            "Progresso do Checklist: {}%",
            completion_percentage(states, catalog.len())
        ),
        rows,
        signature_name: format!("Condutor: {}", header.condutor),
        attachments,
        file_name: report_file_name(&header.vtr, &header.date),
    }
}

/// Quebra o texto em linhas de até `max_chars` caracteres
///
/// Palavras maiores que a linha são cortadas. Texto vazio gera uma linha vazia.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
