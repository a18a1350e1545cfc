use crate::utils::parser::{self, ParseError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "bilap - build the bi-Laplacian Hamiltonian H = L + Σ w_p·H_p on a periodic grid, diagonalize it, and attribute each mode's energy to its analytic and prime parts.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel sweeps.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diagonalize one Hamiltonian and report its low spectrum and one mode in detail.
    Spectrum(SpectrumArgs),
    /// Run parameter sweeps and print (optionally export) their result tables.
    Experiment(ExperimentArgs),
}

/// Operator parameters shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct HamiltonianArgs {
    /// Number of grid points N (at least 2).
    #[arg(short = 'n', long, value_name = "INT")]
    pub grid_size: Option<usize>,

    /// Comma-separated prime moduli, each smaller than N.
    #[arg(short, long, value_delimiter = ',', value_name = "P,...")]
    pub primes: Option<Vec<u64>>,

    /// Comma-separated non-negative weights, one per prime.
    #[arg(short, long, value_delimiter = ',', value_name = "W,...")]
    pub weights: Option<Vec<f64>>,

    /// Fixed half-period T, overriding the default T = ln(N).
    #[arg(short = 'T', long, value_name = "FLOAT")]
    pub period: Option<f64>,
}

/// Arguments for the `spectrum` subcommand.
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    #[command(flatten)]
    pub hamiltonian: HamiltonianArgs,

    /// Number of lowest eigenvalues to print.
    #[arg(short = 'k', long, value_name = "INT")]
    pub count: Option<usize>,

    /// Mode index to decompose and test for shift invariance.
    #[arg(short, long, value_name = "INT")]
    pub mode: Option<usize>,

    /// Set a specific configuration value, overriding flags and the config file.
    /// Can be used multiple times. Example: -S spectrum.count=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentKind {
    /// Energy decomposition of the lowest modes.
    Modes,
    /// Shift invariance of the lowest modes under every configured prime.
    Invariance,
    /// Low spectrum as the grid is refined.
    Scaling,
    /// Channel split of one mode for several prime sets.
    Primes,
    /// All of the above.
    All,
}

/// Arguments for the `experiment` subcommand.
#[derive(Args, Debug)]
pub struct ExperimentArgs {
    /// Which sweep to run.
    #[arg(value_enum)]
    pub kind: ExperimentKind,

    #[command(flatten)]
    pub hamiltonian: HamiltonianArgs,

    /// Number of lowest modes covered by the mode and invariance sweeps.
    #[arg(long, value_name = "INT")]
    pub modes: Option<usize>,

    /// Comma-separated grid sizes for the scaling sweep.
    #[arg(long, value_delimiter = ',', value_name = "N,...")]
    pub grid_sizes: Option<Vec<usize>>,

    /// Semicolon-separated prime sets for the prime-set sweep, e.g. "2;2,3;2,3,5".
    #[arg(
        long,
        value_delimiter = ';',
        value_parser = parse_prime_set,
        value_name = "P,...;P,..."
    )]
    pub prime_sets: Option<Vec<Vec<u64>>>,

    /// Mode index analyzed by the prime-set sweep.
    #[arg(short, long, value_name = "INT")]
    pub mode: Option<usize>,

    /// Directory receiving one CSV file per sweep. Nothing is written without it.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding flags and the config file.
    /// Can be used multiple times. Example: -S experiments.prime-sets="2,3;2,3,5"
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

fn parse_prime_set(group: &str) -> Result<Vec<u64>, ParseError> {
    parser::parse_list("prime-sets", group, "integer")
}
