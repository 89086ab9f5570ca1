pub mod pdf;

use crate::error::Result;
use checklist_common::{build_report, Snapshot, CHECKLIST_ITEMS};
use pdf::ImageQuality;
use std::path::{Path, PathBuf};

/// Diretório (ou caminho sem extensão) recebe o nome padrão do relatório
fn output_path_for(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

/// Gera o PDF do snapshot (sessão atual ou registro do histórico)
pub fn export_report<S: Snapshot + ?Sized>(
    snapshot: &S,
    output: &Path,
    quality: &ImageQuality,
) -> Result<PathBuf> {
    let model = build_report(snapshot, CHECKLIST_ITEMS);
    let output_path = output_path_for(output, &model.file_name);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let bytes = pdf::render_report(&model, quality)?;
    std::fs::write(&output_path, bytes)?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path_for(dir.path(), "relatorio-vtr-A-2024-01-01.pdf");
        assert_eq!(path, dir.path().join("relatorio-vtr-A-2024-01-01.pdf"));

        let explicit = dir.path().join("saida.pdf");
        assert_eq!(output_path_for(&explicit, "x.pdf"), explicit);
    }
}
