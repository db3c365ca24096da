//! Sitemap
//!
//! Reconciles the three site numbering schemes of an experiment:
//!
//! - `reference_site`: the experimental numbering, used as the join key.
//! - `sequential_site`: the left-to-right plotting order. Must be numeric.
//! - `protein_site`: the numbering of the physical structure. Empty for sites that are not
//!   resolved in the structure (e.g. insertions relative to it).
//!
//! The sitemap is a closed world: every reference site measured in the mutation data must
//! have an entry.
use crate::error::{examples, Result, ValidationError};
use crate::schema::{TableSchema, PROTEIN_SITE, REFERENCE_SITE, SEQUENTIAL_SITE};
use crate::table::{float_number, is_numeric, Table};
use itertools::Itertools;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const SITEMAP_TABLE: &str = "sitemap";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteMapEntry {
    #[serde(skip)]
    pub reference_site: String,
    #[serde(serialize_with = "serialize_site_order")]
    pub sequential_site: f64,
    pub protein_site: String,
    /// Chains the site is drawn on; empty when the site has no protein site.
    pub chains: String,
}

impl SiteMapEntry {
    /// The structure residue number for this site, if it has one.
    pub fn protein_residue(&self) -> Option<isize> {
        let value = self.protein_site.trim().parse::<f64>().ok()?;
        (value.fract() == 0.0).then_some(value as isize)
    }
}

fn serialize_site_order<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match float_number(*value) {
        Some(number) => number.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Normalized sitemap, keyed by reference site in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteMap {
    entries: Vec<SiteMapEntry>,
    index: HashMap<String, usize>,
}

impl SiteMap {
    pub fn new(entries: Vec<SiteMapEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.reference_site.clone(), i))
            .collect();
        SiteMap { entries, index }
    }
    pub fn entries(&self) -> &[SiteMapEntry] {
        &self.entries
    }
    pub fn get(&self, reference_site: &str) -> Option<&SiteMapEntry> {
        self.index.get(reference_site).map(|&i| &self.entries[i])
    }
    pub fn contains(&self, reference_site: &str) -> bool {
        self.index.contains_key(reference_site)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SiteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.reference_site, entry)?;
        }
        map.end()
    }
}

/// Validate and normalize the sitemap against already-validated mutation data.
///
/// `included_chains` is assigned to every site with a numeric protein site.
pub fn reconcile_sitemap(
    sitemap: Table,
    mutations: &Table,
    included_chains: &str,
) -> Result<SiteMap> {
    let sitemap = TableSchema::new(SITEMAP_TABLE)
        .require(&[SEQUENTIAL_SITE, REFERENCE_SITE])
        .validate(sitemap)?;

    let reference_sites: Vec<&str> = sitemap
        .text_values(REFERENCE_SITE)
        .map(|values| values.collect())
        .unwrap_or_default();

    // Keyed output: a reference site may only appear once.
    let duplicated: Vec<&str> = reference_sites.iter().copied().duplicates().collect();
    if !duplicated.is_empty() {
        return Err(ValidationError::DuplicateReferenceSite {
            count: duplicated.len(),
            examples: examples(duplicated),
        });
    }

    // Closed world: every measured site is mapped.
    let known: HashSet<&str> = reference_sites.iter().copied().collect();
    let missing: Vec<&str> = mutations
        .text_values(REFERENCE_SITE)
        .into_iter()
        .flatten()
        .filter(|site| !known.contains(site))
        .unique()
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::ReferenceSiteMismatch {
            count: missing.len(),
            examples: examples(missing),
        });
    }

    let sequential_sites = coerce_sequential_sites(&sitemap)?;
    let protein_sites = protein_sites(&sitemap, &reference_sites)?;

    let entries = reference_sites
        .iter()
        .zip(sequential_sites)
        .zip(protein_sites)
        .map(|((reference_site, sequential_site), protein_site)| {
            let chains = if is_numeric(&protein_site) {
                included_chains.to_string()
            } else {
                String::new()
            };
            SiteMapEntry {
                reference_site: reference_site.to_string(),
                sequential_site,
                protein_site,
                chains,
            }
        })
        .collect();

    Ok(SiteMap::new(entries))
}

fn coerce_sequential_sites(sitemap: &Table) -> Result<Vec<f64>> {
    let values: Vec<&str> = sitemap
        .text_values(SEQUENTIAL_SITE)
        .map(|values| values.collect())
        .unwrap_or_default();
    let invalid: Vec<&str> = values.iter().copied().filter(|v| !is_numeric(v)).collect();
    if !invalid.is_empty() {
        return Err(ValidationError::NumericCoercion {
            column: SEQUENTIAL_SITE.to_string(),
            count: invalid.len(),
            examples: examples(invalid),
        });
    }
    Ok(values
        .iter()
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .collect())
}

fn protein_sites(sitemap: &Table, reference_sites: &[&str]) -> Result<Vec<String>> {
    match sitemap.text_values(PROTEIN_SITE) {
        None => {
            tracing::warn!(
                "the sitemap has no protein_site column; assuming protein sites equal numeric reference sites"
            );
            Ok(reference_sites
                .iter()
                .map(|site| {
                    if is_numeric(site) {
                        site.to_string()
                    } else {
                        String::new()
                    }
                })
                .collect())
        }
        Some(values) => {
            let values: Vec<&str> = values.collect();
            let invalid: Vec<&str> = values
                .iter()
                .copied()
                .filter(|v| !v.is_empty() && !is_numeric(v))
                .collect();
            if !invalid.is_empty() {
                return Err(ValidationError::InvalidProteinSite {
                    examples: examples(invalid),
                });
            }
            Ok(values.iter().map(|v| v.to_string()).collect())
        }
    }
}
