//! dmsviz-test-data
//!
//! A module to provide test files embedded in the crate for use in testing.
//!
//! The fixtures describe a ten residue fragment of a receptor binding domain (chain `E`,
//! sites 331-340) with escape measurements for two conditions, a sitemap covering every
//! measured site plus one insertion site, and an auxiliary join table.
//!
//! The test files are represented as `TestFile` objects which package the raw data
//! and create temporary files for programs to operate on.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use dmsviz_test_data::TestFile;
/// let (metric_file, _temp) = TestFile::dummy_metric().create_temp().unwrap();
/// let (pdb_file, _temp) = TestFile::dummy_structure().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Mutation-level escape data: `site, wildtype, mutant, mutation, mut_escape, condition, times_seen`.
    pub fn dummy_metric() -> Self {
        Self {
            filebinary: include_bytes!("../data/dummy.csv"),
            suffix: "csv",
        }
    }
    /// Sitemap for the dummy data. Site `340a` is an insertion without a protein site.
    pub fn dummy_sitemap() -> Self {
        Self {
            filebinary: include_bytes!("../data/dummymap.csv"),
            suffix: "csv",
        }
    }
    /// One row per mutation with `additional_col` and a colliding `times_seen` column.
    pub fn dummy_join() -> Self {
        Self {
            filebinary: include_bytes!("../data/dummyjoin.csv"),
            suffix: "csv",
        }
    }
    /// Backbone atoms of chain E, residues 331-340.
    pub fn dummy_structure() -> Self {
        Self {
            filebinary: include_bytes!("../data/dummy.pdb"),
            suffix: "pdb",
        }
    }

    /// The raw text of the fixture.
    pub fn contents(&self) -> &'static str {
        std::str::from_utf8(self.filebinary).unwrap_or_default()
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
