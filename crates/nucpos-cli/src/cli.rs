use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Nucpos Developers",
    version,
    about = "nucpos - nucleosome positioning probability and energy landscapes from mechanical DNA models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute landscapes for a literal sequence or every record of a FASTA file.
    Landscape(LandscapeArgs),
    /// Splice a barcoded insertion into the genome and compute its landscape.
    Insert(InsertArgs),
}

/// Options shared by every subcommand that evaluates a mechanical model.
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Markov order of the model (1, 2 or 3).
    #[arg(long, default_value_t = 2, value_name = "INT")]
    pub order: u8,

    /// Mechanical model as 'model@temperature' (e.g., 'crick@310').
    #[arg(short, long, required = true, value_name = "MODEL@TEMP")]
    pub model: String,

    /// Override the thermal energy kT used for the energy landscape.
    #[arg(long, value_name = "FLOAT")]
    pub kt: Option<f64>,

    /// Override the data directory holding `mechanical_models/`.
    #[arg(long, value_name = "PATH")]
    pub data_root: Option<PathBuf>,

    /// Write the report here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `landscape` subcommand.
#[derive(Args, Debug)]
pub struct LandscapeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub input: SequenceInput,
}

/// Exactly one sequence source.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SequenceInput {
    /// A literal nucleotide sequence.
    #[arg(short, long, value_name = "SEQ")]
    pub sequence: Option<String>,

    /// A FASTA file; every record is evaluated.
    #[arg(short, long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,
}

/// Arguments for the `insert` subcommand.
#[derive(Args, Debug)]
pub struct InsertArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Name of the insertion, resolved as `{sequences-root}/{name}.seq`.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub insertion: String,

    /// Barcode written into the insertion's placeholder run.
    #[arg(short, long, required = true, value_name = "SEQ")]
    pub barcode: String,

    /// Insertion site as 'chromosome:cut-site' (e.g., 'chr2L:1000000').
    #[arg(long, required = true, value_name = "CHR:POS")]
    pub site: String,

    /// Override the number of genomic bases kept left of the cut site.
    #[arg(long, value_name = "INT")]
    pub left: Option<u64>,

    /// Override the number of genomic bases kept right of the cut site.
    #[arg(long, value_name = "INT")]
    pub right: Option<u64>,

    /// Override the genome FASTA file.
    #[arg(short, long, value_name = "PATH")]
    pub genome: Option<PathBuf>,

    /// Override the directory holding insertion `.seq` files.
    #[arg(long, value_name = "PATH")]
    pub sequences_root: Option<PathBuf>,
}
