//! CSV ingestion.
//!
//! Every column is read as text (schema inference is disabled) so site labels like `214a`
//! and numeric-looking identifiers reach the validators unchanged. The usual missing-value
//! markers (`NA`, `N/A`, `null`, ...) are read as empty cells.
use crate::error::Result;
use dmsviz_core::Table;
use polars::prelude::*;
use std::path::Path;

/// Cell values read as missing, the same set pandas uses by default.
pub const NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|parse_options| {
            parse_options.with_null_values(Some(NullValues::AllColumns(
                NULL_VALUES.iter().map(|value| (*value).into()).collect(),
            )))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    let table = frame_to_table(&df)?;
    tracing::debug!(
        "read {} rows x {} columns from {}",
        table.n_rows(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

pub fn read_tables<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Table>> {
    paths.iter().map(read_table).collect()
}

fn frame_to_table(df: &DataFrame) -> Result<Table> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(columns.len()); df.height()];
    for column in df.get_columns() {
        let series = column.as_materialized_series().cast(&DataType::String)?;
        for (row, value) in rows.iter_mut().zip(series.str()?) {
            row.push(value.filter(|v| !v.is_empty()).map(str::to_string));
        }
    }
    Ok(Table::new(columns, rows))
}
