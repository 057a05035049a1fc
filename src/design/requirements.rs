//! Design request records and their validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::sim::types::{InverterType, Location, ModuleType};

/// What the design should prioritize when selecting a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationGoal {
    /// Highest module efficiency.
    MaximizeEfficiency,
    /// Lowest price per watt.
    MinimizeCost,
    /// Best efficiency per dollar.
    #[default]
    Balanced,
}

/// Acceptable total installed cost ($).
///
/// Only `max` feeds the cost score. `min` is checked against `max` and
/// otherwise carried for the caller; it neither filters nor ranks variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Budget {
    /// Lower end of the customer's range.
    #[serde(default)]
    pub min: Option<f64>,
    /// Reference for the cost score; defaults to a multiple of the array size.
    #[serde(default)]
    pub max: Option<f64>,
}

/// Physical limits of the mounting surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoofConstraints {
    /// Usable roof area (m², > 0).
    pub available_area_m2: f64,
    /// Usable roof width along the ridge (m); defaults to a square roof.
    #[serde(default)]
    pub roof_width_m: Option<f64>,
    /// Roof pitch (degrees, 0 to 90); the array is mounted flush.
    #[serde(default)]
    pub tilt: Option<f64>,
    /// Roof orientation (degrees, 0 to 360).
    #[serde(default)]
    pub azimuth: Option<f64>,
    /// Annual fraction of irradiance lost to shading (0 to 1).
    #[serde(default)]
    pub shading_factor: f64,
}

/// Performance goals of the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignGoals {
    pub goal: OptimizationGoal,
    /// Share of annual usage the system should cover (%, 0 to 200).
    pub offset_percentage: f64,
}

impl Default for DesignGoals {
    fn default() -> Self {
        Self {
            goal: OptimizationGoal::Balanced,
            offset_percentage: 100.0,
        }
    }
}

/// Equipment and site preferences. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignPreferences {
    /// Restrict variants to one module technology.
    pub panel_type: Option<ModuleType>,
    /// Restrict variants to one inverter topology.
    pub inverter_type: Option<InverterType>,
    pub include_storage: bool,
    /// Requested storage (kWh); defaults to the autonomy-based estimate.
    pub battery_capacity_kwh: Option<f64>,
    pub roof: Option<RoofConstraints>,
    pub goals: DesignGoals,
}

/// Tariff inputs used for the financing comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UtilityRates {
    /// Retail electricity price ($/kWh).
    pub electricity_rate: f64,
    #[serde(default)]
    pub net_metering_rate: Option<f64>,
    /// Yearly escalation (fraction per year).
    #[serde(default)]
    pub annual_rate_increase: Option<f64>,
}

/// A complete design request.
///
/// # Examples
///
/// ```
/// use solar_design_engine::design::DesignRequirements;
/// use solar_design_engine::sim::Location;
///
/// let req = DesignRequirements::new(Location::new(37.77, -122.42), [700.0; 12]);
/// assert!((req.annual_usage() - 8_400.0).abs() < 1e-9);
/// assert!(req.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignRequirements {
    pub location: Location,
    /// Household consumption per calendar month (kWh).
    pub monthly_usage: [f64; 12],
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub preferences: DesignPreferences,
    #[serde(default)]
    pub utility_rates: Option<UtilityRates>,
}

impl DesignRequirements {
    /// A request with default preferences and no budget or tariff.
    pub fn new(location: Location, monthly_usage: [f64; 12]) -> Self {
        Self {
            location,
            monthly_usage,
            budget: None,
            preferences: DesignPreferences::default(),
            utility_rates: None,
        }
    }

    /// Total yearly consumption (kWh).
    pub fn annual_usage(&self) -> f64 {
        self.monthly_usage.iter().sum()
    }

    /// Average consumption per day (kWh).
    pub fn average_daily_usage(&self) -> f64 {
        self.annual_usage() / 365.0
    }

    /// Checks the request fields the designer depends on.
    ///
    /// Location bounds are checked by the simulator validation.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, usage) in self.monthly_usage.iter().enumerate() {
            if !usage.is_finite() || *usage < 0.0 {
                return Err(ValidationError::new(
                    format!("monthly_usage[{i}]"),
                    format!("Monthly usage must be a non-negative number, got {usage}"),
                ));
            }
        }
        if self.annual_usage() <= 0.0 {
            return Err(ValidationError::new(
                "monthly_usage",
                "Annual usage must be greater than 0",
            ));
        }

        if let Some(budget) = &self.budget {
            for (field, value) in [("budget.min", budget.min), ("budget.max", budget.max)] {
                if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                    return Err(ValidationError::new(field, "Budget must be non-negative"));
                }
            }
            if let (Some(min), Some(max)) = (budget.min, budget.max) {
                if min > max {
                    return Err(ValidationError::new(
                        "budget",
                        format!("Budget minimum {min} exceeds maximum {max}"),
                    ));
                }
            }
        }

        let prefs = &self.preferences;
        let offset = prefs.goals.offset_percentage;
        if !offset.is_finite() || offset <= 0.0 || offset > 200.0 {
            return Err(ValidationError::new(
                "preferences.goals.offset_percentage",
                format!("Offset percentage must be between 0 and 200%, got {offset}"),
            ));
        }
        if let Some(kwh) = prefs.battery_capacity_kwh.filter(|k| !k.is_finite() || *k <= 0.0) {
            return Err(ValidationError::new(
                "preferences.battery_capacity_kwh",
                format!("Battery capacity must be greater than 0, got {kwh}"),
            ));
        }
        if let Some(roof) = &prefs.roof {
            validate_roof(roof)?;
        }

        if self
            .utility_rates
            .as_ref()
            .is_some_and(|r| !r.electricity_rate.is_finite() || r.electricity_rate < 0.0)
        {
            return Err(ValidationError::new(
                "utility_rates.electricity_rate",
                "Electricity rate must be non-negative",
            ));
        }
        Ok(())
    }
}

fn validate_roof(roof: &RoofConstraints) -> Result<(), ValidationError> {
    if !roof.available_area_m2.is_finite() || roof.available_area_m2 <= 0.0 {
        return Err(ValidationError::new(
            "preferences.roof.available_area_m2",
            "Roof area must be greater than 0",
        ));
    }
    if roof
        .roof_width_m
        .is_some_and(|w| !w.is_finite() || w <= 0.0)
    {
        return Err(ValidationError::new(
            "preferences.roof.roof_width_m",
            "Roof width must be greater than 0",
        ));
    }
    if roof.tilt.is_some_and(|t| !(0.0..=90.0).contains(&t)) {
        return Err(ValidationError::new(
            "preferences.roof.tilt",
            "Roof tilt must be between 0 and 90 degrees",
        ));
    }
    if roof.azimuth.is_some_and(|a| !(0.0..=360.0).contains(&a)) {
        return Err(ValidationError::new(
            "preferences.roof.azimuth",
            "Roof azimuth must be between 0 and 360 degrees",
        ));
    }
    if !(0.0..=1.0).contains(&roof.shading_factor) {
        return Err(ValidationError::new(
            "preferences.roof.shading_factor",
            format!(
                "Shading factor must be between 0 and 1, got {}",
                roof.shading_factor
            ),
        ));
    }
    Ok(())
}
