//! Options
//!
//! Everything that shapes a dataset besides the input tables themselves.
//!
//! ```ignore
//! let options = FormatOptions::builder()
//!     .metric_col("mut_escape")
//!     .included_chains("E")
//!     .build();
//! ```
use crate::alphabet::Alphabet;
use bon::Builder;
use indexmap::IndexMap;

/// Colorblind-safe defaults, one per condition.
pub const DEFAULT_COLORS: [&str; 4] = ["#0072B2", "#CC79A7", "#4C3549", "#009E73"];
pub const DEFAULT_INCLUDED_CHAINS: &str = "polymer";
pub const DEFAULT_EXCLUDED_CHAINS: &str = "none";
pub const DEFAULT_CONDITION_COL: &str = "condition";

pub fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

/// Column (or condition) keyed map that keeps insertion order, serialized as a JSON object.
pub type OrderedMap<V> = IndexMap<String, V>;

#[derive(Builder, Debug, Clone)]
pub struct FormatOptions {
    /// Column holding the value to visualize.
    #[builder(into)]
    pub metric_col: String,
    /// Column grouping mutations into conditions (epitopes, sera, ...).
    #[builder(into, default = String::from(DEFAULT_CONDITION_COL))]
    pub condition_col: String,
    #[builder(default)]
    pub alphabet: Alphabet,
    #[builder(default = default_colors())]
    pub colors: Vec<String>,
    /// Colors for negative metric values, paired with conditions like `colors`.
    pub negative_colors: Option<Vec<String>>,
    /// Space separated chain ids the data is drawn on.
    #[builder(into, default = String::from(DEFAULT_INCLUDED_CHAINS))]
    pub included_chains: String,
    /// Space separated chain ids hidden in the structure view.
    #[builder(into, default = String::from(DEFAULT_EXCLUDED_CHAINS))]
    pub excluded_chains: String,
    /// Numeric columns offered as filters: column -> display label.
    pub filter_cols: Option<OrderedMap<String>>,
    /// Filter column -> `[min, max]` or `[min, max, default]`.
    pub filter_limits: Option<OrderedMap<Vec<f64>>>,
    /// Columns shown in tooltips: column -> display label.
    pub tooltip_cols: Option<OrderedMap<String>>,
    #[builder(into)]
    pub metric_name: Option<String>,
    #[builder(into)]
    pub condition_name: Option<String>,
    /// Residues hidden from the heatmap.
    pub exclude_amino_acids: Option<Vec<String>>,
    #[builder(into)]
    pub title: Option<String>,
    #[builder(into)]
    pub description: Option<String>,
}

impl FormatOptions {
    pub fn included_chain_ids(&self) -> Vec<String> {
        split_chains(&self.included_chains)
    }
    pub fn excluded_chain_ids(&self) -> Vec<String> {
        split_chains(&self.excluded_chains)
    }
    /// The chains named explicitly, `None` for the `polymer` keyword.
    pub fn explicit_included_chains(&self) -> Option<Vec<String>> {
        (self.included_chains.trim() != DEFAULT_INCLUDED_CHAINS)
            .then(|| self.included_chain_ids())
    }
    /// The chains named explicitly, `None` for the `none` keyword.
    pub fn explicit_excluded_chains(&self) -> Option<Vec<String>> {
        (self.excluded_chains.trim() != DEFAULT_EXCLUDED_CHAINS)
            .then(|| self.excluded_chain_ids())
    }
}

fn split_chains(chains: &str) -> Vec<String> {
    chains.split_whitespace().map(str::to_string).collect()
}
