use super::commands;
use clap::{Args, Parser, Subcommand};
use dmsviz_core::{default_colors, Alphabet, DEFAULT_ALPHABET};
use std::path::PathBuf;

/// Configure deep mutational scanning data for dms-viz.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter, e.g. `info`, `debug` or `dmsviz_io=debug`.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the input tables and write a dataset JSON file.
    Format(FormatArgs),
    /// Merge several dataset JSON files into one.
    Join {
        /// Comma separated dataset files; later files replace datasets of the same name.
        #[arg(short, long, value_delimiter = ',', required = true)]
        input: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Mutation-level metric CSV.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Sitemap CSV with reference_site, sequential_site and optionally protein_site.
    #[arg(short, long)]
    pub sitemap: PathBuf,

    /// Name of the metric column.
    #[arg(short, long)]
    pub metric: String,

    /// A 4 character PDB ID or a path to a local .pdb/.cif file.
    #[arg(short = 'p', long)]
    pub structure: String,

    /// Name of the dataset in the output file.
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub output: PathBuf,

    /// Column grouping mutations into conditions.
    #[arg(long, alias = "epitope", default_value = "condition")]
    pub condition: String,

    /// Comma separated CSVs left-joined onto the metric data.
    #[arg(long, value_delimiter = ',')]
    pub join_data: Vec<PathBuf>,

    /// Filter columns as a mapping, e.g. "{'times_seen': 'Times Seen'}".
    #[arg(long)]
    pub filter_cols: Option<String>,

    /// Filter limits as a mapping, e.g. "{'times_seen': [1, 10, 2]}".
    #[arg(long)]
    pub filter_limits: Option<String>,

    /// Tooltip columns as a mapping, e.g. "{'note': 'Note'}".
    #[arg(long)]
    pub tooltip_cols: Option<String>,

    #[arg(long)]
    pub metric_name: Option<String>,

    #[arg(long)]
    pub condition_name: Option<String>,

    /// Space separated chains the data is drawn on.
    #[arg(long, default_value = "polymer")]
    pub included_chains: String,

    /// Space separated chains hidden in the structure view.
    #[arg(long, default_value = "none")]
    pub excluded_chains: String,

    #[arg(long, default_value = DEFAULT_ALPHABET)]
    pub alphabet: Alphabet,

    /// Comma separated residues hidden from the heatmap.
    #[arg(long, value_delimiter = ',')]
    pub exclude_amino_acids: Option<Vec<String>>,

    /// Comma separated condition colors.
    #[arg(long, value_delimiter = ',', default_values_t = default_colors())]
    pub colors: Vec<String>,

    /// Comma separated condition colors for negative metric values.
    #[arg(long, value_delimiter = ',')]
    pub negative_colors: Option<Vec<String>>,

    #[arg(long)]
    pub title: Option<String>,

    /// Description shown alongside the dataset.
    #[arg(long)]
    pub description: Option<String>,

    /// Skip the chain and wildtype residue checks against the structure.
    #[arg(long)]
    pub skip_structure_check: bool,
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Format(args) => commands::format::execute(args),
            Commands::Join { input, output } => commands::join::execute(input, output),
        }
    }
}
