use anyhow::{Context, Result};
use dmsviz_io::{join_dataset_files, write_json};
use serde_json::Value;
use std::path::PathBuf;

pub fn execute(input: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    let joined = join_dataset_files(&input).context("failed to join dataset files")?;
    tracing::info!("joined {} dataset(s) from {} file(s)", joined.len(), input.len());
    write_json(&output, &Value::Object(joined))
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}
