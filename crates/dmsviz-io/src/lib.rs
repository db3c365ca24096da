//! # dmsviz-io
//!
//! File and network access for `dmsviz-core`: CSV tables in, structures from disk or the RCSB,
//! dataset JSON out.
//!
mod csv;
mod error;
mod output;
mod structure;

pub use self::csv::{read_table, read_tables};
pub use self::error::{IoError, Result};
pub use self::output::{join_dataset_files, read_json_object, write_dataset, write_json};
pub use self::structure::{
    fetch_rcsb, open_structure, StructureFormat, StructureInput, RCSB_DOWNLOAD_URL,
};
