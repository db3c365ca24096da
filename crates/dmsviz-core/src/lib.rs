//! # dmsviz-core
//!
//! Validation and reconciliation of deep mutational scanning data for visualization.
//!
//! __dmsviz-core__ provides functionality for:
//! * Validating mutation-level metric tables against a residue alphabet
//! * Reconciling reference, sequential and protein site numbering through a sitemap
//! * Left-joining auxiliary per-mutation data
//! * Cross-checking chains and wildtype residues against a protein structure
//!
//! The main entry point is the [`DatasetAssembler`], configured with [`FormatOptions`], which
//! turns the input [`Table`]s into a serializable [`Dataset`]. Reading files and fetching
//! structures is left to `dmsviz-io`.
//!
mod alphabet;
mod dataset;
mod error;
mod join;
mod mutations;
mod options;
mod schema;
mod sitemap;
mod structure;
mod table;

pub use self::alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use self::dataset::{Dataset, DatasetAssembler, Reconciled};
pub use self::error::{Result, ValidationError, MAX_EXAMPLES};
pub use self::join::{join_additional_data, JOIN_KEYS};
pub use self::mutations::{validate_mutation_table, MUTATION_TABLE};
pub use self::options::{
    default_colors, FormatOptions, OrderedMap, DEFAULT_COLORS, DEFAULT_CONDITION_COL,
    DEFAULT_EXCLUDED_CHAINS, DEFAULT_INCLUDED_CHAINS,
};
pub use self::schema::{
    TableSchema, MUTANT, PROTEIN_SITE, REFERENCE_SITE, SEQUENTIAL_SITE, SITE, WILDTYPE,
};
pub use self::sitemap::{reconcile_sitemap, SiteMap, SiteMapEntry, SITEMAP_TABLE};
pub use self::structure::{aa3to1, check_chains, check_wildtype_residues, Chain, Structure};
pub use self::table::{is_numeric, json_number, Row, Table};
