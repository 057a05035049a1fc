//! TOML-based engine configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::financial::FinancialOptions;

/// Top-level engine configuration parsed from TOML.
///
/// All sections have defaults matching the documented model constants. Load
/// from TOML with [`EngineConfig::from_toml_file`] or use
/// [`EngineConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Physical model constants.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Financial defaults applied when a request does not override them.
    #[serde(default)]
    pub financial: FinancialOptions,
    /// Sizing, selection and scoring parameters.
    #[serde(default)]
    pub designer: DesignerConfig,
}

/// Physical model constants of the production simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Nominal operating cell temperature (°C).
    pub noct: f64,
    /// Ground reflectance (0.0–1.0).
    pub ground_albedo: f64,
    /// Module efficiency at which the nameplate rating applies (%).
    pub reference_module_efficiency: f64,
    /// Wiring loss (fraction).
    pub wiring_loss: f64,
    /// Soiling loss (fraction).
    pub soiling_loss: f64,
    /// Module mismatch loss (fraction).
    pub mismatch_loss: f64,
    /// Availability/downtime loss (fraction).
    pub availability_loss: f64,
    /// Floor of the system derate chain.
    pub min_system_derate: f64,
    /// Floor of the temperature derate.
    pub min_temperature_derate: f64,
    /// Grid emission factor (kg CO₂/kWh).
    pub grid_emission_factor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            noct: 45.0,
            ground_albedo: 0.2,
            reference_module_efficiency: 20.0,
            wiring_loss: 0.02,
            soiling_loss: 0.02,
            mismatch_loss: 0.02,
            availability_loss: 0.03,
            min_system_derate: 0.5,
            min_temperature_derate: 0.5,
            grid_emission_factor: 0.4,
        }
    }
}

/// Relative weight of each score axis in the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub cost: f64,
    pub performance: f64,
    pub aesthetics: f64,
    pub reliability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cost: 0.30,
            performance: 0.40,
            aesthetics: 0.10,
            reliability: 0.20,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.cost + self.performance + self.aesthetics + self.reliability
    }
}

/// Parameters of the design optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignerConfig {
    /// Assumed annual yield used for target sizing (kWh/kW/yr).
    pub production_per_kw: f64,
    /// Smallest system ever proposed (kW).
    pub min_system_kw: f64,
    /// Installation labour and overhead on equipment cost (fraction).
    pub installation_markup: f64,
    /// System losses before shading (%).
    pub base_system_losses: f64,
    /// Cap on system losses after shading (%).
    pub max_system_losses: f64,
    /// Target AC/DC ratio for string and optimizer inverters.
    pub inverter_sizing_ratio: f64,
    /// Battery sizing in days of average usage.
    pub battery_autonomy_days: f64,
    /// Installed cost assumption behind the default budget ($/W).
    pub reference_cost_per_watt: f64,
    /// Default budget as a multiple of the reference cost.
    pub budget_multiplier: f64,
    /// Loan interest rate (% per year).
    pub loan_rate: f64,
    /// Loan term (years).
    pub loan_term_years: u32,
    /// Clearance between panel rows (m).
    pub row_spacing_m: f64,
    /// Gap between adjacent panels in a row (m).
    pub panel_spacing_m: f64,
    /// Number of runner-up designs returned.
    pub alternatives: usize,
    pub weights: ScoreWeights,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            production_per_kw: 1400.0,
            min_system_kw: 1.0,
            installation_markup: 0.30,
            base_system_losses: 14.0,
            max_system_losses: 25.0,
            inverter_sizing_ratio: 0.90,
            battery_autonomy_days: 1.5,
            reference_cost_per_watt: 3.00,
            budget_multiplier: 1.5,
            loan_rate: 7.0,
            loan_term_years: 20,
            row_spacing_m: 1.5,
            panel_spacing_m: 0.02,
            alternatives: 3,
            weights: ScoreWeights::default(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"designer.production_per_kw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.noct <= 20.0 {
            errors.push(ConfigError::new("simulation.noct", "must be > 20"));
        }
        if !(0.0..=1.0).contains(&s.ground_albedo) {
            errors.push(ConfigError::new(
                "simulation.ground_albedo",
                "must be in [0.0, 1.0]",
            ));
        }
        if s.reference_module_efficiency <= 0.0 || s.reference_module_efficiency > 50.0 {
            errors.push(ConfigError::new(
                "simulation.reference_module_efficiency",
                "must be in (0, 50]",
            ));
        }
        for (field, value) in [
            ("simulation.wiring_loss", s.wiring_loss),
            ("simulation.soiling_loss", s.soiling_loss),
            ("simulation.mismatch_loss", s.mismatch_loss),
            ("simulation.availability_loss", s.availability_loss),
            ("simulation.min_system_derate", s.min_system_derate),
            ("simulation.min_temperature_derate", s.min_temperature_derate),
        ] {
            if !(0.0..1.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0)"));
            }
        }
        if s.grid_emission_factor < 0.0 {
            errors.push(ConfigError::new(
                "simulation.grid_emission_factor",
                "must be >= 0",
            ));
        }

        let f = &self.financial;
        if f.electricity_rate < 0.0 {
            errors.push(ConfigError::new("financial.electricity_rate", "must be >= 0"));
        }
        if f.cost_per_watt <= 0.0 {
            errors.push(ConfigError::new("financial.cost_per_watt", "must be > 0"));
        }
        if f.system_lifetime == 0 {
            errors.push(ConfigError::new("financial.system_lifetime", "must be > 0"));
        }
        if f.discount_rate <= -1.0 {
            errors.push(ConfigError::new("financial.discount_rate", "must be > -1"));
        }

        let d = &self.designer;
        if d.production_per_kw <= 0.0 {
            errors.push(ConfigError::new("designer.production_per_kw", "must be > 0"));
        }
        if d.min_system_kw <= 0.0 {
            errors.push(ConfigError::new("designer.min_system_kw", "must be > 0"));
        }
        if d.installation_markup < 0.0 {
            errors.push(ConfigError::new("designer.installation_markup", "must be >= 0"));
        }
        if d.base_system_losses < 0.0 || d.base_system_losses > d.max_system_losses {
            errors.push(ConfigError::new(
                "designer.base_system_losses",
                "must be in [0, designer.max_system_losses]",
            ));
        }
        if d.max_system_losses > 100.0 {
            errors.push(ConfigError::new("designer.max_system_losses", "must be <= 100"));
        }
        if d.inverter_sizing_ratio <= 0.0 {
            errors.push(ConfigError::new(
                "designer.inverter_sizing_ratio",
                "must be > 0",
            ));
        }
        if d.battery_autonomy_days <= 0.0 {
            errors.push(ConfigError::new(
                "designer.battery_autonomy_days",
                "must be > 0",
            ));
        }
        if d.loan_term_years == 0 {
            errors.push(ConfigError::new("designer.loan_term_years", "must be > 0"));
        }
        if d.row_spacing_m < 0.0 || d.panel_spacing_m < 0.0 {
            errors.push(ConfigError::new(
                "designer.row_spacing_m",
                "spacings must be >= 0",
            ));
        }
        if (d.weights.sum() - 1.0).abs() > 1e-6 {
            errors.push(ConfigError {
                field: "designer.weights".into(),
                message: format!("must sum to 1.0, got {:.3}", d.weights.sum()),
            });
        }

        errors
    }
}
