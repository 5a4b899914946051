use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::LabelError, export, models::ExportDocument};

/// Writes the export document to `path`, creating parent directories as needed.
pub fn write_export(doc: &ExportDocument, path: &Path) -> Result<PathBuf, LabelError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| LabelError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }

    let content = export::to_json(doc)?;
    fs::write(path, content).map_err(|source| LabelError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(path.to_path_buf())
}
