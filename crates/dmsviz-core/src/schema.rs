//! Schema contracts
//!
//! Each input table is checked once, at ingestion, against a declarative [`TableSchema`]:
//! the columns it must carry, whether a `site` column stands in for `reference_site`, and
//! which columns hold residues that must belong to the [`Alphabet`].
//!
//! ```ignore
//! let table = TableSchema::new("mutation data")
//!     .with_site_alias()
//!     .require(&["wildtype", "mutant", "escape", "condition"])
//!     .residues(&alphabet, &["wildtype", "mutant"])
//!     .validate(table)?;
//! ```
use crate::alphabet::Alphabet;
use crate::error::{examples, Result, ValidationError};
use crate::table::Table;
use itertools::Itertools;

pub const REFERENCE_SITE: &str = "reference_site";
pub const SITE: &str = "site";
pub const WILDTYPE: &str = "wildtype";
pub const MUTANT: &str = "mutant";
pub const SEQUENTIAL_SITE: &str = "sequential_site";
pub const PROTEIN_SITE: &str = "protein_site";

#[derive(Debug, Clone)]
pub struct TableSchema<'a> {
    table: &'a str,
    site_alias: bool,
    required: Vec<&'a str>,
    residue_columns: Vec<&'a str>,
    alphabet: Option<&'a Alphabet>,
}

impl<'a> TableSchema<'a> {
    /// `table` names the input in error messages, e.g. "sitemap".
    pub fn new(table: &'a str) -> Self {
        TableSchema {
            table,
            site_alias: false,
            required: Vec::new(),
            residue_columns: Vec::new(),
            alphabet: None,
        }
    }

    /// Require `reference_site`, accepting a `site` column in its place.
    pub fn with_site_alias(mut self) -> Self {
        self.site_alias = true;
        self
    }

    pub fn require(mut self, columns: &[&'a str]) -> Self {
        for column in columns {
            if !self.required.contains(column) {
                self.required.push(*column);
            }
        }
        self
    }

    /// Require `columns` and constrain their values to symbols of `alphabet`.
    pub fn residues(mut self, alphabet: &'a Alphabet, columns: &[&'a str]) -> Self {
        self = self.require(columns);
        self.alphabet = Some(alphabet);
        self.residue_columns.extend_from_slice(columns);
        self
    }

    pub fn validate(&self, mut table: Table) -> Result<Table> {
        if self.site_alias && !table.has_column(REFERENCE_SITE) {
            if !table.rename_column(SITE, REFERENCE_SITE) {
                return Err(ValidationError::Schema {
                    table: self.table.to_string(),
                    columns: vec![format!("{REFERENCE_SITE} (or {SITE})")],
                });
            }
        }

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|column| !table.has_column(column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::Schema {
                table: self.table.to_string(),
                columns: missing,
            });
        }

        if let Some(alphabet) = self.alphabet {
            let invalid: Vec<&str> = self
                .residue_columns
                .iter()
                .filter_map(|column| table.text_values(column))
                .flatten()
                .filter(|residue| !alphabet.contains(residue))
                .unique()
                .collect();
            if !invalid.is_empty() {
                return Err(ValidationError::Alphabet {
                    table: self.table.to_string(),
                    alphabet: alphabet.to_string(),
                    values: examples(invalid),
                });
            }
        }

        Ok(table)
    }
}
