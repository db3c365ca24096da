//! Structure
//!
//! A read-only view of a protein structure: chain identifiers and, per chain, the one-letter
//! residue identity at each residue number. Built from a parsed [`pdbtbx::PDB`]; resolving the
//! structure from a file or the RCSB lives in `dmsviz-io`.
//!
//! Two diagnostics cross-check the data against the structure:
//!
//! - [`check_chains`] fails when a declared chain is not in the structure.
//! - [`check_wildtype_residues`] reports how often the declared wildtype matches the
//!   structure. It is advisory: engineered or unresolved positions legitimately differ.
use crate::error::{Result, ValidationError};
use crate::schema::{REFERENCE_SITE, WILDTYPE};
use crate::sitemap::SiteMap;
use crate::table::Table;
use itertools::Itertools;
use pdbtbx::PDB;
use std::collections::BTreeMap;

#[rustfmt::skip]
pub fn aa3to1(aa: &str) -> Option<char> {
    let code = match aa {
        "ALA" => 'A', "CYS" => 'C', "ASP" => 'D',
        "GLU" => 'E', "PHE" => 'F', "GLY" => 'G',
        "HIS" => 'H', "ILE" => 'I', "LYS" => 'K',
        "LEU" => 'L', "MET" => 'M', "ASN" => 'N',
        "PRO" => 'P', "GLN" => 'Q', "ARG" => 'R',
        "SER" => 'S', "THR" => 'T', "VAL" => 'V',
        "TRP" => 'W', "TYR" => 'Y', _     => return None,
    };
    Some(code)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    id: String,
    residues: BTreeMap<isize, char>,
}

impl Chain {
    pub fn new(id: impl Into<String>, residues: impl IntoIterator<Item = (isize, char)>) -> Self {
        Chain {
            id: id.into(),
            residues: residues.into_iter().collect(),
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    /// One-letter code of the amino acid at `number`, if resolved.
    pub fn residue(&self, number: isize) -> Option<char> {
        self.residues.get(&number).copied()
    }
    pub fn len(&self) -> usize {
        self.residues.len()
    }
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    chains: Vec<Chain>,
}

impl Structure {
    pub fn new(chains: Vec<Chain>) -> Self {
        Structure { chains }
    }
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }
    pub fn chain_ids(&self) -> Vec<&str> {
        self.chains.iter().map(Chain::id).collect()
    }
    /// The chains data is compared on: `included` (every chain if `None`) minus `excluded`.
    pub fn select_chains(
        &self,
        included: Option<&[String]>,
        excluded: Option<&[String]>,
    ) -> Vec<String> {
        let candidates: Vec<String> = match included {
            Some(ids) => ids.to_vec(),
            None => self.chain_ids().into_iter().map(str::to_string).collect(),
        };
        candidates
            .into_iter()
            .filter(|id| excluded.map_or(true, |excluded| !excluded.contains(id)))
            .collect()
    }
}

impl From<&PDB> for Structure {
    // Only standard amino acids without insertion codes are kept; those are
    // the residues a numeric protein site can refer to.
    fn from(pdb: &PDB) -> Self {
        let mut chains: Vec<Chain> = Vec::new();
        for chain in pdb.chains() {
            let residues = chain.residues().filter_map(|residue| {
                let (number, insertion_code) = residue.id();
                if insertion_code.is_some() {
                    return None;
                }
                let code = aa3to1(residue.name().unwrap_or_default())?;
                Some((number, code))
            });
            // a chain id may be split around heteroatoms; merge the pieces
            match chains.iter_mut().find(|c| c.id == chain.id()) {
                Some(existing) => existing.residues.extend(residues),
                None => chains.push(Chain::new(chain.id(), residues)),
            }
        }
        Structure { chains }
    }
}

/// Fail with [`ValidationError::ChainMismatch`] listing every expected chain absent from the structure.
pub fn check_chains<S: AsRef<str>>(structure: &Structure, expected: &[S]) -> Result<()> {
    let available = structure.chain_ids();
    let missing: Vec<String> = expected
        .iter()
        .map(|chain| chain.as_ref())
        .filter(|chain| !available.contains(chain))
        .unique()
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ChainMismatch {
            missing,
            available: available.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Compare declared wildtype residues to the structure.
///
/// Each distinct `(reference_site, wildtype)` pair of the mutation data is mapped through the
/// sitemap to a protein site and compared on every chain (or only `chains`, if given) that
/// resolves that residue. Returns `(match_fraction, total_compared)`; the fraction is `0.0`
/// when nothing could be compared.
pub fn check_wildtype_residues(
    structure: &Structure,
    mutations: &Table,
    sitemap: &SiteMap,
    chains: Option<&[String]>,
) -> (f64, usize) {
    let selected: Vec<&Chain> = structure
        .chains()
        .iter()
        .filter(|chain| chains.map_or(true, |ids| ids.iter().any(|id| id == chain.id())))
        .collect();

    let pairs = match (mutations.text_values(REFERENCE_SITE), mutations.text_values(WILDTYPE)) {
        (Some(sites), Some(wildtypes)) => sites.zip(wildtypes).unique().collect::<Vec<_>>(),
        _ => Vec::new(),
    };

    let (mut matched, mut total) = (0usize, 0usize);
    for (site, wildtype) in pairs {
        let Some(number) = sitemap.get(site).and_then(|entry| entry.protein_residue()) else {
            continue;
        };
        for chain in &selected {
            if let Some(code) = chain.residue(number) {
                total += 1;
                if wildtype.len() == 1 && wildtype.starts_with(code) {
                    matched += 1;
                }
            }
        }
    }

    if total == 0 {
        (0.0, 0)
    } else {
        (matched as f64 / total as f64, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::mutations::validate_mutation_table;
    use crate::sitemap::reconcile_sitemap;
    use dmsviz_test_data::TestFile;

    // fixtures are plain comma separated text without quoting
    fn fixture_table(file: TestFile) -> Table {
        let mut lines = file.contents().lines();
        let columns: Vec<&str> = lines.next().unwrap_or_default().split(',').collect();
        let rows: Vec<Vec<&str>> = lines.map(|line| line.split(',').collect()).collect();
        let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
        Table::from_strs(&columns, &rows)
    }

    fn fixture_data() -> (Structure, Table, SiteMap) {
        let (pdb_file, _temp) = TestFile::dummy_structure().create_temp().unwrap();
        let (pdb, _errors) = pdbtbx::open(pdb_file).unwrap();
        let mutations = validate_mutation_table(
            fixture_table(TestFile::dummy_metric()),
            "mut_escape",
            "condition",
            &Alphabet::default(),
        )
        .unwrap();
        let sitemap =
            reconcile_sitemap(fixture_table(TestFile::dummy_sitemap()), &mutations, "E").unwrap();
        (Structure::from(&pdb), mutations, sitemap)
    }

    fn structure() -> Structure {
        Structure::new(vec![
            Chain::new("A", [(1, 'M'), (2, 'K'), (3, 'T')]),
            Chain::new("B", [(1, 'M'), (2, 'R')]),
        ])
    }

    fn data() -> (Table, SiteMap) {
        let mutations = Table::from_strs(
            &["reference_site", "wildtype", "mutant"],
            &[&["1", "M", "A"], &["1", "M", "G"], &["2", "K", "A"], &["3", "T", "A"], &["3a", "G", "A"]],
        );
        let sitemap = Table::from_strs(
            &["reference_site", "sequential_site", "protein_site"],
            &[&["1", "1", "1"], &["2", "2", "2"], &["3", "3", "3"], &["3a", "4", ""]],
        );
        let sitemap = reconcile_sitemap(sitemap, &mutations, "polymer").unwrap();
        (mutations, sitemap)
    }

    #[test]
    fn test_check_chains() {
        assert!(check_chains(&structure(), &["A", "B"]).is_ok());
        let err = check_chains(&structure(), &["A", "Z", "Y"]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ChainMismatch {
                missing: vec!["Z".into(), "Y".into()],
                available: vec!["A".into(), "B".into()],
            }
        );
    }

    #[test]
    fn test_wildtype_residues_all_chains() {
        let (mutations, sitemap) = data();
        // pairs: (1,M) x2 chains, (2,K) x2 chains (B mismatches), (3,T) chain A only
        let (fraction, total) = check_wildtype_residues(&structure(), &mutations, &sitemap, None);
        assert_eq!(total, 5);
        assert!((fraction - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_wildtype_residues_chain_filter() {
        let (mutations, sitemap) = data();
        let chains = vec!["A".to_string()];
        let (fraction, total) =
            check_wildtype_residues(&structure(), &mutations, &sitemap, Some(&chains));
        assert_eq!(total, 3);
        assert_eq!(fraction, 1.0);
    }

    #[test]
    fn test_select_chains() {
        let excluded = vec!["B".to_string()];
        assert_eq!(structure().select_chains(None, None), vec!["A", "B"]);
        assert_eq!(structure().select_chains(None, Some(&excluded)), vec!["A"]);
        let included = vec!["A".to_string(), "B".to_string()];
        assert_eq!(
            structure().select_chains(Some(&included), Some(&excluded)),
            vec!["A"]
        );

        // excluded chains no longer count toward the match rate
        let (mutations, sitemap) = data();
        let chains = structure().select_chains(None, Some(&excluded));
        let (fraction, total) =
            check_wildtype_residues(&structure(), &mutations, &sitemap, Some(&chains));
        assert_eq!(total, 3);
        assert_eq!(fraction, 1.0);
    }

    #[test]
    fn test_fixture_wildtypes_match() {
        let (structure, mutations, sitemap) = fixture_data();
        let chains = vec!["E".to_string()];
        let (fraction, total) =
            check_wildtype_residues(&structure, &mutations, &sitemap, Some(&chains));
        assert_eq!(total, 10);
        assert_eq!(fraction, 1.0);
    }

    #[test]
    fn test_fixture_wildtypes_mismatch() {
        let (structure, mutations, sitemap) = fixture_data();
        // no residue of the fixture fragment is an alanine
        let wildtype = mutations.column_index(WILDTYPE).unwrap();
        let rows = mutations
            .rows()
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[wildtype] = Some("A".to_string());
                row
            })
            .collect();
        let mutations = Table::new(mutations.columns().to_vec(), rows);

        let (fraction, total) = check_wildtype_residues(&structure, &mutations, &sitemap, None);
        assert_eq!(total, 10);
        assert_eq!(fraction, 0.0);
    }

    #[test]
    fn test_structure_from_pdb() {
        let (pdb_file, _temp) = TestFile::dummy_structure().create_temp().unwrap();
        let (pdb, _errors) = pdbtbx::open(pdb_file).unwrap();
        let structure = Structure::from(&pdb);
        assert_eq!(structure.chain_ids(), vec!["E"]);
        let chain = &structure.chains()[0];
        assert_eq!(chain.len(), 10);
        assert_eq!(chain.residue(331), Some('N'));
        assert_eq!(chain.residue(340), Some('E'));
        assert_eq!(chain.residue(341), None);
    }
}
