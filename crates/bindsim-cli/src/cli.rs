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
    author = "bindsim contributors",
    version,
    about = "bindsim CLI - Headless driver for a 2D stochastic simulation of proteins competitively binding two ligand species.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the binding simulation for a fixed number of ticks and report bound counts.
    Run(RunArgs),
    /// Print the effective configuration after merging defaults, file and overrides.
    Config(ConfigArgs),
}

/// Where settings come from besides built-in defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigSource {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S kinetics.k-off=0.05
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Flags that override individual settings. They take precedence over everything else.
#[derive(Args, Debug, Default, Clone)]
pub struct CliOverrides {
    // --- Run Control ---
    /// Number of simulation steps to execute.
    #[arg(short = 'n', long, value_name = "INT")]
    pub ticks: Option<usize>,

    /// Seed for the random number generator, for reproducible runs.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Write the bound-count time series to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Population ---
    /// Override the number of proteins.
    #[arg(long, value_name = "INT")]
    pub proteins: Option<usize>,

    /// Override the number of normal ligands.
    #[arg(long, value_name = "INT")]
    pub ligands: Option<usize>,

    /// Override the number of competitor ligands.
    #[arg(long, value_name = "INT")]
    pub competitors: Option<usize>,

    // --- Kinetics ---
    /// Override the temperature scaling Brownian motion.
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Override the binding rate constant of normal ligands.
    #[arg(long, value_name = "FLOAT")]
    pub k_on: Option<f64>,

    /// Override the binding rate constant of competitor ligands.
    #[arg(long, value_name = "FLOAT")]
    pub k_on_competitor: Option<f64>,

    /// Override the unbinding rate constant.
    #[arg(long, value_name = "FLOAT")]
    pub k_off: Option<f64>,

    /// Override the capture distance beyond the protein surface.
    #[arg(long, value_name = "FLOAT")]
    pub binding_radius: Option<f64>,

    /// Override the timestep.
    #[arg(long, value_name = "FLOAT")]
    pub dt: Option<f64>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Arguments for the `config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}
