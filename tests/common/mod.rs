//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use solar_design_engine::design::DesignRequirements;
use solar_design_engine::sim::types::{
    InverterType, Location, ModuleType, ProductionResult, SystemSpecification, TrackingType,
};
use solar_design_engine::sim::ProductionSimulator;
use solar_design_engine::weather::{SyntheticWeather, WeatherMonth};
use solar_design_engine::ValidationError;

pub const SF_LATITUDE: f64 = 37.7749;
pub const SF_LONGITUDE: f64 = -122.4194;

/// San Francisco.
pub fn sf_location() -> Location {
    Location::new(SF_LATITUDE, SF_LONGITUDE)
}

/// 10 kW monocrystalline, 30° tilt, south-facing, 96% inverter, 14% losses.
pub fn sf_spec() -> SystemSpecification {
    SystemSpecification {
        dc_capacity_kw: 10.0,
        module_efficiency: 18.0,
        inverter_efficiency: 96.0,
        system_losses: 14.0,
        tilt: 30.0,
        azimuth: 180.0,
        module_type: ModuleType::Monocrystalline,
        tracking_type: TrackingType::Fixed,
        inverter_type: InverterType::String,
    }
}

/// Synthetic year centred on 5.0 ± 1.5 kWh/m²/day GHI.
pub fn synthetic_weather(latitude: f64) -> Vec<WeatherMonth> {
    SyntheticWeather::default().year(latitude)
}

pub fn sf_weather() -> Vec<WeatherMonth> {
    synthetic_weather(SF_LATITUDE)
}

/// Simulates `spec` in San Francisco without a financial block.
pub fn simulate_sf(spec: &SystemSpecification) -> Result<ProductionResult, ValidationError> {
    ProductionSimulator::default().simulate(&sf_location(), spec, &sf_weather(), None)
}

/// Annual production of `spec` in San Francisco, 0 on failure.
pub fn annual_sf(spec: &SystemSpecification) -> f64 {
    simulate_sf(spec)
        .map(|r| r.annual_production)
        .unwrap_or_default()
}

/// Household using 700 kWh every month, default preferences.
pub fn sf_request() -> DesignRequirements {
    DesignRequirements::new(sf_location(), [700.0; 12])
}

/// Path of a file under the crate's `data/` directory.
pub fn data_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(name)
}
