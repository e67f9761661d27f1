use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use histogram_logging::hist_info;
use tempfile::NamedTempFile;

pub const DEFAULT_EXPORT_FILENAME: &str = "histogram_data.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid export file name {0:?}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the output directory exists and is a directory; create it if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ExportError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))
}

/// Write `csv` to `{output_dir}/{filename}`, replacing any earlier export.
/// Writes through a temp file in the same directory, then renames it over the target.
pub fn write_csv_export(
    output_dir: &Path,
    filename: &str,
    csv: &str,
) -> Result<PathBuf, ExportError> {
    if filename.is_empty() || filename.contains(&['/', '\\'][..]) || filename == ".." {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    ensure_output_dir(output_dir)?;

    let target = output_dir.join(filename);
    let mut tmp = NamedTempFile::new_in(output_dir)?;
    tmp.write_all(csv.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;

    hist_info!("Exported {} bytes to {:?}", csv.len(), target);
    Ok(target)
}
