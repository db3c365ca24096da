use crate::cli::FormatArgs;
use anyhow::{anyhow, bail, Context, Result};
use dmsviz_core::{
    check_chains, check_wildtype_residues, Dataset, DatasetAssembler, FormatOptions, OrderedMap,
};
use dmsviz_io::{read_table, read_tables, write_dataset, StructureInput};
use itertools::Itertools;
use serde_json::{Map, Value};

pub fn execute(args: FormatArgs) -> Result<()> {
    let options = format_options(&args)?;
    let structure = StructureInput::classify(&args.structure)?;
    let assembler = DatasetAssembler::new(options);

    let mutations = read_table(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sitemap = read_table(&args.sitemap)
        .with_context(|| format!("failed to read {}", args.sitemap.display()))?;
    let join_tables = read_tables(&args.join_data).context("failed to read join data")?;

    let reconciled = assembler.reconcile(mutations, sitemap, join_tables)?;
    let payload = structure
        .payload()
        .with_context(|| format!("failed to read structure {}", args.structure))?;
    let dataset = assembler.assemble(reconciled, payload)?;

    if args.skip_structure_check {
        tracing::info!("skipping structure checks");
    } else {
        check_structure(&structure, assembler.options(), &dataset)?;
    }

    tracing::info!(
        "dataset '{}': {} mutations, conditions: {}",
        args.name,
        dataset.mutations.n_rows(),
        dataset.conditions.iter().join(", ")
    );
    write_dataset(&args.output, &args.name, &dataset)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn format_options(args: &FormatArgs) -> Result<FormatOptions> {
    let filter_cols = args
        .filter_cols
        .as_deref()
        .map(|text| column_labels(text, "--filter-cols"))
        .transpose()?;
    let filter_limits = args
        .filter_limits
        .as_deref()
        .map(filter_limits)
        .transpose()?;
    let tooltip_cols = args
        .tooltip_cols
        .as_deref()
        .map(|text| column_labels(text, "--tooltip-cols"))
        .transpose()?;

    Ok(FormatOptions::builder()
        .metric_col(args.metric.as_str())
        .condition_col(args.condition.as_str())
        .alphabet(args.alphabet.clone())
        .colors(args.colors.clone())
        .maybe_negative_colors(args.negative_colors.clone())
        .included_chains(args.included_chains.as_str())
        .excluded_chains(args.excluded_chains.as_str())
        .maybe_filter_cols(filter_cols)
        .maybe_filter_limits(filter_limits)
        .maybe_tooltip_cols(tooltip_cols)
        .maybe_metric_name(args.metric_name.clone())
        .maybe_condition_name(args.condition_name.clone())
        .maybe_exclude_amino_acids(args.exclude_amino_acids.clone())
        .maybe_title(args.title.clone())
        .maybe_description(args.description.clone())
        .build())
}

/// Parse a JSON object, also accepting single quoted (Python dict style) strings.
fn parse_mapping(text: &str, flag: &str) -> Result<Map<String, Value>> {
    let parsed = serde_json::from_str::<Value>(text)
        .or_else(|_| serde_json::from_str::<Value>(&text.replace('\'', "\"")));
    match parsed {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => bail!("{flag} must be a mapping, got '{text}'"),
        Err(e) => Err(anyhow!("could not parse {flag} '{text}': {e}")),
    }
}

fn column_labels(text: &str, flag: &str) -> Result<OrderedMap<String>> {
    parse_mapping(text, flag)?
        .into_iter()
        .map(|(column, label)| match label {
            Value::String(label) => Ok((column, label)),
            other => bail!("{flag}: the label of '{column}' must be a string, got {other}"),
        })
        .collect()
}

fn filter_limits(text: &str) -> Result<OrderedMap<Vec<f64>>> {
    parse_mapping(text, "--filter-limits")?
        .into_iter()
        .map(|(column, limits)| {
            let values = limits
                .as_array()
                .and_then(|values| values.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>())
                .ok_or_else(|| {
                    anyhow!("--filter-limits: the limits of '{column}' must be a list of numbers")
                })?;
            Ok((column, values))
        })
        .collect()
}

fn check_structure(input: &StructureInput, options: &FormatOptions, dataset: &Dataset) -> Result<()> {
    let structure = input.load().context("failed to load the structure")?;
    let included = options.explicit_included_chains();
    let excluded = options.explicit_excluded_chains();
    if let Some(chains) = &included {
        check_chains(&structure, chains)?;
    }
    if let Some(chains) = &excluded {
        check_chains(&structure, chains)?;
    }

    let compared = structure.select_chains(included.as_deref(), excluded.as_deref());
    let (fraction, total) = check_wildtype_residues(
        &structure,
        &dataset.mutations,
        &dataset.sitemap,
        Some(&compared),
    );
    if total == 0 {
        tracing::warn!("no wildtype residues could be compared with the structure");
    } else if fraction < 1.0 {
        tracing::warn!(
            "{:.1}% of {total} wildtype residues match the structure",
            fraction * 100.0
        );
    } else {
        tracing::info!("all {total} wildtype residues match the structure");
    }
    Ok(())
}
