//! Mutation metric data
//!
//! Validates the primary table of mutation-level measurements. After validation the table
//! is guaranteed to carry `reference_site, wildtype, mutant, <metric>, <condition>` and every
//! residue belongs to the configured alphabet. Metric values are never touched.
use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::schema::{TableSchema, MUTANT, WILDTYPE};
use crate::table::Table;

pub const MUTATION_TABLE: &str = "mutation metric data";

/// Check the schema of the metric table, renaming `site` to `reference_site` when needed.
pub fn validate_mutation_table(
    table: Table,
    metric_col: &str,
    condition_col: &str,
    alphabet: &Alphabet,
) -> Result<Table> {
    TableSchema::new(MUTATION_TABLE)
        .with_site_alias()
        .require(&[WILDTYPE, MUTANT, metric_col, condition_col])
        .residues(alphabet, &[WILDTYPE, MUTANT])
        .validate(table)
}
