//! `solar-design` entry point: argument parsing, input loading and report output.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use solar_design_engine::cli::{CatalogArgs, Cli, Commands, DesignArgs, SimulateArgs, WeatherArgs};
use solar_design_engine::config::{ConfigError, EngineConfig};
use solar_design_engine::design::{DesignRequirements, SystemDesigner};
use solar_design_engine::equipment::{CatalogError, InMemoryCatalog};
use solar_design_engine::io::{RequestError, SimulationRequest, export_monthly_csv, export_variants_csv};
use solar_design_engine::sim::ProductionSimulator;
use solar_design_engine::sim::types::Location;
use solar_design_engine::weather::{
    CsvWeather, SyntheticWeather, WeatherError, WeatherMonth, WeatherProvider,
};
use solar_design_engine::{DesignError, ValidationError};

#[derive(Debug, Error)]
enum AppError {
    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid input: {0} ({field})", field = .0.field)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Design(#[from] DesignError),

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write \"{path}\": {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, AppError> {
    let config = match path {
        Some(p) => EngineConfig::from_toml_file(p).map_err(|e| AppError::Config(vec![e]))?,
        None => EngineConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(AppError::Config(errors));
    }
    Ok(config)
}

fn load_weather(args: &WeatherArgs, location: &Location) -> Result<Vec<WeatherMonth>, AppError> {
    let months = match &args.weather {
        Some(path) => CsvWeather::new(path).monthly_weather(location)?,
        None => SyntheticWeather {
            noise_std: args.noise,
            ..SyntheticWeather::with_seed(args.seed)
        }
        .monthly_weather(location)?,
    };
    Ok(months)
}

fn load_catalog(dir: Option<&Path>) -> Result<InMemoryCatalog, AppError> {
    match dir {
        Some(d) => Ok(InMemoryCatalog::from_csv_dir(d)?),
        None => Ok(InMemoryCatalog::builtin()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn simulate(args: &SimulateArgs, config: &EngineConfig) -> Result<(), AppError> {
    let request = SimulationRequest::from_toml_file(&args.system)?;
    let weather = load_weather(&args.weather, &request.location)?;

    let financial = match (&request.financial, args.financial) {
        (Some(opts), _) => Some(opts.clone()),
        (None, true) => Some(config.financial.clone()),
        (None, false) => None,
    };

    let simulator = ProductionSimulator::new(config.simulation.clone());
    let result = simulator.simulate(
        &request.location,
        &request.system,
        &weather,
        financial.as_ref(),
    )?;
    info!(
        annual_kwh = result.annual_production,
        capacity_factor = result.capacity_factor,
        "simulation complete"
    );

    if args.json {
        print_json(&result)?;
    } else {
        println!("{result}");
    }

    if let Some(path) = &args.csv {
        export_monthly_csv(&result, path).map_err(|source| AppError::Export {
            path: path.display().to_string(),
            source,
        })?;
        eprintln!("Monthly production written to {}", path.display());
    }
    Ok(())
}

fn design(args: &DesignArgs, config: &EngineConfig) -> Result<(), AppError> {
    let request = DesignRequirements::from_toml_file(&args.request)?;
    let weather = load_weather(&args.weather, &request.location)?;
    let catalog = load_catalog(args.catalog.as_deref())?;

    let designer = SystemDesigner::with_config(&catalog, config);
    let result = designer.design(&request, &weather)?;

    if args.json {
        print_json(&result)?;
    } else {
        println!("{result}");
    }

    if let Some(path) = &args.csv {
        export_variants_csv(&result, path).map_err(|source| AppError::Export {
            path: path.display().to_string(),
            source,
        })?;
        eprintln!("Ranked variants written to {}", path.display());
    }
    Ok(())
}

fn list_catalog(args: &CatalogArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;

    println!("=== Panels ===");
    for p in catalog.all_panels() {
        println!(
            "  {:<10} {:<12} {:<16} {:>5.0} W {:>5.1}%  ${:.2}/W  tier {}  {}y{}",
            p.model,
            p.manufacturer,
            p.module_type,
            p.wattage,
            p.efficiency,
            p.price_per_watt,
            p.tier,
            p.warranty_years,
            if p.in_stock { "" } else { "  (out of stock)" }
        );
    }
    println!("\n=== Inverters ===");
    for i in catalog.all_inverters() {
        println!(
            "  {:<10} {:<12} {:<16} {:>5.2} kW {:>5.1}%  ${:.2}/W  {}y{}",
            i.model,
            i.manufacturer,
            i.inverter_type,
            i.capacity_kw,
            i.efficiency,
            i.price_per_watt,
            i.warranty_years,
            if i.in_stock { "" } else { "  (out of stock)" }
        );
    }
    println!("\n=== Batteries ===");
    for b in catalog.all_batteries() {
        println!(
            "  {:<10} {:<12} {:>5.1} kWh {:>5.1}%  ${:.0}/kWh  {}y{}",
            b.model,
            b.manufacturer,
            b.capacity_kwh,
            b.efficiency,
            b.price_per_kwh,
            b.warranty_years,
            if b.in_stock { "" } else { "  (out of stock)" }
        );
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Simulate(args) => simulate(args, &config),
        Commands::Design(args) => design(args, &config),
        Commands::Catalog(args) => list_catalog(args),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("solar_design_engine=info,solar_design=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
