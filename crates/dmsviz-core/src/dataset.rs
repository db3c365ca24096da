//! Dataset
//!
//! [`DatasetAssembler`] runs the table pipeline and produces the [`Dataset`] record the
//! visualization reads:
//!
//! 1. [`DatasetAssembler::reconcile`] validates the mutation data, reconciles the sitemap and
//!    joins auxiliary tables.
//! 2. The caller resolves the structure (and may run the structure diagnostics).
//! 3. [`DatasetAssembler::assemble`] checks the filter and tooltip columns, trims the mutation
//!    data to the columns the front end needs and assigns colors to conditions.
use crate::error::{examples, Result, ValidationError};
use crate::join::join_additional_data;
use crate::mutations::{validate_mutation_table, MUTATION_TABLE};
use crate::options::{FormatOptions, OrderedMap};
use crate::schema::{MUTANT, REFERENCE_SITE, WILDTYPE};
use crate::sitemap::{reconcile_sitemap, SiteMap};
use crate::table::{all_numeric, cell_value, is_numeric, Table};
use itertools::Itertools;
use serde::{Serialize, Serializer};

/// One visualization dataset, serialized under its name in the output file.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    #[serde(rename = "mut_metric_df")]
    pub mutations: Table,
    pub metric_col: String,
    pub condition_col: String,
    /// Typed like the condition cells of `mutations`.
    #[serde(serialize_with = "serialize_conditions")]
    pub conditions: Vec<String>,
    pub condition_colors: OrderedMap<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_condition_colors: Option<OrderedMap<String>>,
    pub alphabet: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_amino_acids: Option<Vec<String>>,
    /// Structure file contents, or an identifier resolved by the front end.
    pub pdb: String,
    #[serde(rename = "dataChains")]
    pub included_chains: Vec<String>,
    #[serde(rename = "excludeChains")]
    pub excluded_chains: Vec<String>,
    pub sitemap: SiteMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_cols: Option<OrderedMap<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_limits: Option<OrderedMap<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip_cols: Option<OrderedMap<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn serialize_conditions<S: Serializer>(
    conditions: &[String],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let numeric = all_numeric(conditions.iter().map(String::as_str));
    serializer.collect_seq(conditions.iter().map(|c| cell_value(Some(c.as_str()), numeric)))
}

/// Mutation data and sitemap after validation, reconciliation and joins.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub mutations: Table,
    pub sitemap: SiteMap,
}

#[derive(Debug, Clone)]
pub struct DatasetAssembler {
    options: FormatOptions,
}

impl DatasetAssembler {
    pub fn new(options: FormatOptions) -> Self {
        DatasetAssembler { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn reconcile(
        &self,
        mutations: Table,
        sitemap: Table,
        join_tables: Vec<Table>,
    ) -> Result<Reconciled> {
        let options = &self.options;
        let mutations = validate_mutation_table(
            mutations,
            &options.metric_col,
            &options.condition_col,
            &options.alphabet,
        )?;
        let sitemap = reconcile_sitemap(sitemap, &mutations, &options.included_chains)?;
        let mutations = join_additional_data(mutations, join_tables, &options.alphabet)?;
        Ok(Reconciled { mutations, sitemap })
    }

    /// Build the dataset from reconciled tables and the resolved structure payload.
    pub fn assemble(&self, reconciled: Reconciled, pdb: String) -> Result<Dataset> {
        let options = &self.options;
        let Reconciled { mutations, sitemap } = reconciled;

        if let Some(filter_cols) = &options.filter_cols {
            check_filter_columns(&mutations, filter_cols)?;
            if let Some(limits) = &options.filter_limits {
                check_filter_limits(filter_cols, limits)?;
            }
        } else if let Some(limits) = &options.filter_limits {
            if let Some(column) = limits.keys().next() {
                return Err(ValidationError::InvalidFilterLimits {
                    column: column.to_string(),
                    reason: "no filter columns were specified".to_string(),
                });
            }
        }
        if let Some(tooltip_cols) = &options.tooltip_cols {
            check_present(&mutations, tooltip_cols.keys().map(String::as_str))?;
        }

        let mut mutations = mutations.select(&self.output_columns());

        let conditions: Vec<String> = mutations
            .text_values(&options.condition_col)
            .into_iter()
            .flatten()
            .unique()
            .map(str::to_string)
            .collect();
        let condition_colors = assign_colors(&conditions, &options.colors, "color(s)")?;
        let negative_condition_colors = options
            .negative_colors
            .as_ref()
            .map(|colors| assign_colors(&conditions, colors, "negative color(s)"))
            .transpose()?;

        if let Some(excluded) = &options.exclude_amino_acids {
            let invalid: Vec<&String> = excluded
                .iter()
                .filter(|residue| !options.alphabet.contains(residue))
                .collect();
            if !invalid.is_empty() {
                return Err(ValidationError::Alphabet {
                    table: "excluded amino acids".to_string(),
                    alphabet: options.alphabet.to_string(),
                    values: examples(invalid.into_iter().cloned()),
                });
            }
        }

        let metric_col = rename(&mut mutations, &options.metric_col, options.metric_name.as_deref())?;
        let condition_col = rename(
            &mut mutations,
            &options.condition_col,
            options.condition_name.as_deref(),
        )?;

        Ok(Dataset {
            mutations,
            metric_col,
            condition_col,
            conditions,
            condition_colors,
            negative_condition_colors,
            alphabet: options.alphabet.to_strings(),
            excluded_amino_acids: options.exclude_amino_acids.clone(),
            pdb,
            included_chains: options.included_chain_ids(),
            excluded_chains: options.excluded_chain_ids(),
            sitemap,
            filter_cols: options.filter_cols.clone(),
            filter_limits: options.filter_limits.clone(),
            tooltip_cols: options.tooltip_cols.clone(),
            title: options.title.clone(),
            description: options.description.clone(),
        })
    }

    /// The columns kept in `mut_metric_df`, before display renames.
    pub fn output_columns(&self) -> Vec<String> {
        let options = &self.options;
        let mut columns: Vec<String> = [
            REFERENCE_SITE,
            WILDTYPE,
            MUTANT,
            options.metric_col.as_str(),
            options.condition_col.as_str(),
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        for extra in [&options.filter_cols, &options.tooltip_cols].into_iter().flatten() {
            columns.extend(extra.keys().cloned());
        }
        columns.into_iter().unique().collect()
    }
}

fn check_present<'a>(table: &Table, columns: impl Iterator<Item = &'a str>) -> Result<()> {
    let missing: Vec<String> = columns
        .filter(|column| !table.has_column(column))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Schema {
            table: MUTATION_TABLE.to_string(),
            columns: missing,
        })
    }
}

fn check_filter_columns(table: &Table, filter_cols: &OrderedMap<String>) -> Result<()> {
    if let Some(column) = filter_cols.keys().find(|column| column.contains(' ')) {
        return Err(ValidationError::InvalidColumnName {
            column: column.to_string(),
            reason: "filter column names must not contain spaces".to_string(),
        });
    }
    check_present(table, filter_cols.keys().map(String::as_str))?;
    for column in filter_cols.keys() {
        let invalid: Vec<&str> = table
            .values(column)
            .into_iter()
            .flatten()
            .flatten()
            .filter(|value| !is_numeric(value))
            .collect();
        if !invalid.is_empty() {
            return Err(ValidationError::NonNumericFilter {
                column: column.to_string(),
                examples: examples(invalid),
            });
        }
    }
    Ok(())
}

fn check_filter_limits(
    filter_cols: &OrderedMap<String>,
    limits: &OrderedMap<Vec<f64>>,
) -> Result<()> {
    for (column, values) in limits.iter() {
        let invalid = |reason: &str| ValidationError::InvalidFilterLimits {
            column: column.to_string(),
            reason: reason.to_string(),
        };
        if !filter_cols.contains_key(column) {
            return Err(invalid("not a filter column"));
        }
        match values.as_slice() {
            [min, max] | [min, max, _] if min <= max => {}
            [_, _] | [_, _, _] => return Err(invalid("the minimum exceeds the maximum")),
            _ => return Err(invalid("expected [min, max] or [min, max, default]")),
        }
    }
    Ok(())
}

fn assign_colors(
    conditions: &[String],
    colors: &[String],
    kind: &str,
) -> Result<OrderedMap<String>> {
    if conditions.len() > colors.len() {
        return Err(ValidationError::TooManyConditions {
            conditions: conditions.len(),
            colors: colors.len(),
            kind: kind.to_string(),
        });
    }
    Ok(conditions.iter().cloned().zip(colors.iter().cloned()).collect())
}

/// Rename `column` to its display name, if one is given. Returns the resulting column name.
fn rename(table: &mut Table, column: &str, display: Option<&str>) -> Result<String> {
    let Some(display) = display.filter(|display| *display != column) else {
        return Ok(column.to_string());
    };
    if table.has_column(display) {
        return Err(ValidationError::InvalidColumnName {
            column: display.to_string(),
            reason: "the display name is already a column of the output data".to_string(),
        });
    }
    table.rename_column(column, display);
    Ok(display.to_string())
}
