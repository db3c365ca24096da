//! Dataset output files.
//!
//! An output file is a JSON object mapping dataset names to datasets. Several single dataset
//! files can be merged into one with [`join_dataset_files`].
use crate::error::{IoError, Result};
use dmsviz_core::Dataset;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `{ name: dataset }` to `path`.
///
/// The document is serialized completely before the file is created, so a failure never leaves
/// a partial file behind.
pub fn write_dataset(path: &Path, name: &str, dataset: &Dataset) -> Result<()> {
    let mut document = Map::new();
    document.insert(name.to_string(), serde_json::to_value(dataset)?);
    write_json(path, &Value::Object(document))
}

pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let buffer = serde_json::to_vec(value)?;
    fs::write(path, buffer)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

pub fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path)?;
    match serde_json::from_str(&text)? {
        Value::Object(map) => Ok(map),
        _ => Err(IoError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Merge dataset files by top-level key; later files replace datasets of the same name.
pub fn join_dataset_files(paths: &[PathBuf]) -> Result<Map<String, Value>> {
    let mut joined = Map::new();
    for path in paths {
        for (name, dataset) in read_json_object(path)? {
            if joined.contains_key(&name) {
                tracing::warn!("dataset '{name}' from {} replaces an earlier one", path.display());
            }
            joined.insert(name, dataset);
        }
    }
    Ok(joined)
}
