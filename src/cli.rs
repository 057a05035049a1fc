//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "solar-design")]
#[command(author, version, about = "Residential solar production simulator and system designer")]
#[command(
    long_about = "Simulates a typical year of PV production at monthly resolution and searches\n\
    an equipment catalog for the best-scoring residential system.\n\
    \nExamples:\n  \
    solar-design simulate --system system.toml --financial\n  \
    solar-design design --request request.toml --json\n  \
    solar-design catalog --catalog ./catalog"
)]
pub struct Cli {
    /// Engine configuration file (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Simulate annual production of one system
    Simulate(SimulateArgs),

    /// Design and rank systems for a household
    Design(DesignArgs),

    /// List the equipment catalog
    Catalog(CatalogArgs),
}

/// Weather source shared by `simulate` and `design`.
#[derive(Debug, Args)]
pub struct WeatherArgs {
    /// Monthly weather CSV (12 rows); synthetic weather when omitted
    #[arg(long)]
    pub weather: Option<PathBuf>,

    /// Seed for synthetic weather noise
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Relative standard deviation of synthetic monthly GHI noise
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// System file (TOML) with [location] and [system] tables
    #[arg(long)]
    pub system: PathBuf,

    #[command(flatten)]
    pub weather: WeatherArgs,

    /// Include the financial analysis
    #[arg(long, default_value_t = false)]
    pub financial: bool,

    /// Print JSON instead of the text report
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write monthly production to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DesignArgs {
    /// Design request file (TOML)
    #[arg(long)]
    pub request: PathBuf,

    #[command(flatten)]
    pub weather: WeatherArgs,

    /// Directory with panels.csv, inverters.csv and optional batteries.csv
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print JSON instead of the text report
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write the ranked variants to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Directory with panels.csv, inverters.csv and optional batteries.csv
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
