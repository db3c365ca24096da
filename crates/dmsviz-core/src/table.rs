//! Table
//!
//! A small row-major table of optional string cells. Every input is kept as text so that
//! site labels such as `214a` survive joins untouched; numeric interpretation happens only
//! where a column is required to be numeric and when serializing.
//!
//! Serializing a [`Table`] yields a list of records (one JSON object per row). A column whose
//! non-empty cells all parse as numbers is written as JSON numbers, empty cells as `null`.
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};

pub type Row = Vec<Option<String>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Table { columns, rows }
    }

    /// Build a table from string literals; empty strings become missing cells.
    pub fn from_strs(columns: &[&str], rows: &[&[&str]]) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect()
            })
            .collect();
        Table::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the cells of a column. Missing cells are `None`.
    pub fn values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = Option<&'a str>> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_deref()))
    }

    /// Iterate over the cells of a column, with missing cells read as `""`.
    pub fn text_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        Some(self.values(name)?.map(Option::unwrap_or_default))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    /// Rename a column in place. Returns `false` if `from` is not a column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    pub fn drop_columns(&mut self, names: &[String]) {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i]))
            .collect();
        *self = self.take_columns(&keep);
    }

    /// Append a column. `values` must have one entry per row.
    pub fn push_column(&mut self, name: &str, values: Vec<Option<String>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Subset to the named columns in the given order. Repeated and unknown names are skipped.
    pub fn select(&self, names: &[String]) -> Table {
        let mut keep: Vec<usize> = Vec::with_capacity(names.len());
        for name in names {
            if let Some(idx) = self.column_index(name) {
                if !keep.contains(&idx) {
                    keep.push(idx);
                }
            }
        }
        self.take_columns(&keep)
    }

    fn take_columns(&self, indices: &[usize]) -> Table {
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    /// Per-column flag: every non-empty cell parses as a number.
    fn numeric_columns(&self) -> Vec<bool> {
        (0..self.columns.len())
            .map(|idx| {
                all_numeric(self.rows.iter().filter_map(|row| row[idx].as_deref()))
            })
            .collect()
    }
}

// Numeric helpers -----------------------------------------------------------------------------

/// `true` when the value can be coerced to a float.
pub fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Convert a numeric cell into a JSON number, preferring integers.
pub fn json_number(value: &str) -> Value {
    let trimmed = value.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(float_number)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// `true` when every non-empty value is numeric, i.e. the column is written as numbers.
pub fn all_numeric<'a>(values: impl IntoIterator<Item = &'a str>) -> bool {
    values.into_iter().filter(|v| !v.is_empty()).all(is_numeric)
}

/// The JSON value of a cell in a column that is (or is not) written as numbers.
pub fn cell_value(cell: Option<&str>, numeric: bool) -> Value {
    match cell {
        None | Some("") => Value::Null,
        Some(text) if numeric => json_number(text),
        Some(text) => Value::String(text.to_string()),
    }
}

/// Integral floats serialize as integers; non-finite values have no JSON representation.
pub(crate) fn float_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

// Serialization -------------------------------------------------------------------------------

struct Record<'a> {
    columns: &'a [String],
    numeric: &'a [bool],
    row: &'a Row,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for ((name, cell), &numeric) in self.columns.iter().zip(self.row).zip(self.numeric) {
            map.serialize_entry(name, &cell_value(cell.as_deref(), numeric))?;
        }
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let numeric = self.numeric_columns();
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                numeric: &numeric,
                row,
            })?;
        }
        seq.end()
    }
}
