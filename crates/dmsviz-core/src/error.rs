//! Errors
//!
//! Every validation failure is fatal. Variants carry the offending column names
//! or up to [`MAX_EXAMPLES`] example values so the message is actionable on its own.
use itertools::Itertools;
use thiserror::Error;

/// Upper bound on the example values reported by a single error.
pub const MAX_EXAMPLES: usize = 10;

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("the {table} is missing the following column(s): {}", .columns.join(", "))]
    Schema { table: String, columns: Vec<String> },

    #[error("the {table} contains residue(s) not in the alphabet '{alphabet}': {}", quoted(.values))]
    Alphabet {
        table: String,
        alphabet: String,
        values: Vec<String>,
    },

    #[error("invalid alphabet '{alphabet}': {reason}")]
    InvalidAlphabet { alphabet: String, reason: String },

    #[error("{count} reference site(s) in the mutation data are missing from the sitemap, e.g. {}", .examples.join(", "))]
    ReferenceSiteMismatch { count: usize, examples: Vec<String> },

    #[error("the sitemap lists {count} reference site(s) more than once, e.g. {}", .examples.join(", "))]
    DuplicateReferenceSite { count: usize, examples: Vec<String> },

    #[error("the '{column}' column contains {count} value(s) that cannot be coerced to a number, e.g. {}", quoted(.examples))]
    NumericCoercion {
        column: String,
        count: usize,
        examples: Vec<String>,
    },

    #[error("the protein_site column of the sitemap contains invalid values (expected a number or an empty value), e.g. {}", quoted(.examples))]
    InvalidProteinSite { examples: Vec<String> },

    #[error("the {table} has {count} duplicated (reference_site, wildtype, mutant) key(s), e.g. {}", .examples.join(", "))]
    DuplicateJoinKey {
        table: String,
        count: usize,
        examples: Vec<String>,
    },

    #[error("the filter column '{column}' is not numeric, e.g. {}", quoted(.examples))]
    NonNumericFilter {
        column: String,
        examples: Vec<String>,
    },

    #[error("invalid column name '{column}': {reason}")]
    InvalidColumnName { column: String, reason: String },

    #[error("there are {conditions} conditions, but only {colors} {kind} specified; please specify more colors")]
    TooManyConditions {
        conditions: usize,
        colors: usize,
        kind: String,
    },

    #[error("invalid filter limits for '{column}': {reason}")]
    InvalidFilterLimits { column: String, reason: String },

    #[error("the chain(s) {} are not present in the PDB structure (available: {})", .missing.join(", "), .available.join(", "))]
    ChainMismatch {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("failed to download {id} from the RCSB database, status code: {status}")]
    StructureFetch { id: String, status: u16 },

    #[error("invalid structure input '{input}': provide a 4-character PDB ID or a path to a local .pdb/.cif file")]
    InvalidStructureInput { input: String },
}

fn quoted(values: &[String]) -> String {
    values.iter().map(|v| format!("'{v}'")).join(", ")
}

/// Collect up to [`MAX_EXAMPLES`] distinct values, keeping first-seen order.
pub(crate) fn examples<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .unique()
        .take(MAX_EXAMPLES)
        .collect()
}
