//! Production simulator orchestrating geometry, transposition, thermal and loss models.

use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::ValidationError;
use crate::weather::{WeatherMonth, validate_weather};

use super::financial::{FinancialAnalysis, FinancialOptions};
use super::geometry::{SunPosition, days_in_month};
use super::irradiance::plane_of_array;
use super::losses::system_derate;
use super::metrics::AnnualMetrics;
use super::thermal::{cell_temperature, mean_daytime_irradiance, temperature_derate};
use super::types::{
    EfficiencyBreakdown, Location, MonthlyProduction, ProductionResult, SystemSpecification,
};

/// Irradiance at standard test conditions (kW/m²).
const STC_IRRADIANCE_KW_M2: f64 = 1.0;

/// Stateless monthly-resolution PV production simulator.
///
/// Holds only model constants; every call to [`ProductionSimulator::simulate`]
/// is a pure function of its arguments.
#[derive(Debug, Clone, Default)]
pub struct ProductionSimulator {
    config: SimulationConfig,
}

impl ProductionSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Returns the model constants in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates a typical year of production.
    ///
    /// # Arguments
    ///
    /// * `location` - Site coordinates
    /// * `spec` - System specification
    /// * `weather` - Exactly 12 monthly weather records ordered 1 to 12
    /// * `financial` - Financial assumptions; `None` skips the analysis
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the first out-of-range field. All
    /// inputs are validated before any computation.
    pub fn simulate(
        &self,
        location: &Location,
        spec: &SystemSpecification,
        weather: &[WeatherMonth],
        financial: Option<&FinancialOptions>,
    ) -> Result<ProductionResult, ValidationError> {
        validate_location(location)?;
        validate_specification(spec)?;
        validate_weather(weather)?;

        let derate = system_derate(spec.system_losses, &self.config);
        let module_factor = module_efficiency_factor(
            spec.module_efficiency,
            self.config.reference_module_efficiency,
        );
        let inverter = spec.inverter_efficiency / 100.0;

        let mut monthly = Vec::with_capacity(12);
        let mut ideal_dc = 0.0;
        let mut pre_thermal_dc = 0.0;
        let mut thermal_dc = 0.0;

        for w in weather {
            let sun = SunPosition::at_noon(location.latitude, w.month);
            let poa = plane_of_array(
                w,
                &sun,
                spec.tilt,
                spec.azimuth,
                spec.tracking_type,
                self.config.ground_albedo,
            )
            .total();

            let irradiance = mean_daytime_irradiance(poa, sun.daylight_hours);
            let t_cell = cell_temperature(w.temperature, irradiance, w.wind_speed, self.config.noct);
            let t_derate =
                temperature_derate(spec.module_type, t_cell, self.config.min_temperature_derate);

            let days = days_in_month(w.month);
            let ideal = poa / STC_IRRADIANCE_KW_M2 * spec.dc_capacity_kw * f64::from(days);
            let unclipped = ideal * module_factor * t_derate;
            // Mean daytime output never exceeds nameplate.
            let rated = spec.dc_capacity_kw * sun.daylight_hours.max(1.0) * f64::from(days);
            let dc = unclipped.min(rated);
            let ac = dc * derate * inverter;

            debug!(
                month = w.month,
                poa, t_cell, t_derate, ac_kwh = ac, "simulated month"
            );

            ideal_dc += ideal;
            pre_thermal_dc += ideal * module_factor;
            thermal_dc += unclipped;

            monthly.push(MonthlyProduction {
                month: w.month,
                days,
                production_kwh: ac,
                poa_irradiance: poa,
                ambient_temperature: w.temperature,
                cell_temperature: t_cell,
                peak_sun_hours: w.ghi,
                temperature_derate: t_derate,
            });
        }

        let metrics = AnnualMetrics::from_months(
            &monthly,
            spec.dc_capacity_kw,
            self.config.grid_emission_factor,
        );

        let temperature_losses = if pre_thermal_dc > 0.0 {
            (1.0 - thermal_dc / pre_thermal_dc) * 100.0
        } else {
            0.0
        };
        let overall_derate = if ideal_dc > 0.0 {
            metrics.annual_production / ideal_dc
        } else {
            0.0
        };

        let financial = financial.map(|opts| {
            FinancialAnalysis::evaluate(spec.dc_capacity_kw, metrics.annual_production, opts)
        });

        Ok(ProductionResult {
            monthly,
            annual_production: metrics.annual_production,
            capacity_factor: metrics.capacity_factor,
            specific_yield: metrics.specific_yield,
            performance_ratio: metrics.performance_ratio,
            peak_sun_hours: metrics.peak_sun_hours,
            co2_savings: metrics.co2_savings,
            efficiency: EfficiencyBreakdown {
                module_efficiency: spec.module_efficiency,
                inverter_efficiency: spec.inverter_efficiency,
                temperature_losses,
                system_losses: (1.0 - derate) * 100.0,
                overall_derate,
            },
            financial,
        })
    }
}

/// Output multiplier of a module relative to the reference efficiency.
///
/// Each point of efficiency above the reference adds 1 % of output.
pub fn module_efficiency_factor(efficiency: f64, reference: f64) -> f64 {
    1.0 + (efficiency - reference) / 100.0
}

/// Checks coordinate bounds.
///
/// # Errors
///
/// Returns a `ValidationError` for latitude beyond ±90 or longitude beyond ±180.
pub fn validate_location(location: &Location) -> Result<(), ValidationError> {
    if !location.latitude.is_finite() || location.latitude.abs() > 90.0 {
        return Err(ValidationError::new(
            "location.latitude",
            format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                location.latitude
            ),
        ));
    }
    if !location.longitude.is_finite() || location.longitude.abs() > 180.0 {
        return Err(ValidationError::new(
            "location.longitude",
            format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                location.longitude
            ),
        ));
    }
    Ok(())
}

/// Checks every bounded field of a system specification.
///
/// # Errors
///
/// Returns a `ValidationError` for the first field out of range.
pub fn validate_specification(spec: &SystemSpecification) -> Result<(), ValidationError> {
    // NaN fails every comparison below, so check finiteness first.
    let fields = [
        ("spec.dc_capacity_kw", spec.dc_capacity_kw),
        ("spec.module_efficiency", spec.module_efficiency),
        ("spec.inverter_efficiency", spec.inverter_efficiency),
        ("spec.system_losses", spec.system_losses),
        ("spec.tilt", spec.tilt),
        ("spec.azimuth", spec.azimuth),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError::new(*field, format!("{field} must be finite")));
    }

    if spec.dc_capacity_kw <= 0.0 {
        return Err(ValidationError::new(
            "spec.dc_capacity_kw",
            "DC capacity must be greater than 0",
        ));
    }
    if spec.module_efficiency <= 0.0 || spec.module_efficiency > 50.0 {
        return Err(ValidationError::new(
            "spec.module_efficiency",
            format!(
                "Module efficiency must be between 0 and 50%, got {}",
                spec.module_efficiency
            ),
        ));
    }
    if spec.inverter_efficiency <= 0.0 || spec.inverter_efficiency > 100.0 {
        return Err(ValidationError::new(
            "spec.inverter_efficiency",
            format!(
                "Inverter efficiency must be between 0 and 100%, got {}",
                spec.inverter_efficiency
            ),
        ));
    }
    if !(0.0..=100.0).contains(&spec.system_losses) {
        return Err(ValidationError::new(
            "spec.system_losses",
            format!(
                "System losses must be between 0 and 100%, got {}",
                spec.system_losses
            ),
        ));
    }
    if !(0.0..=90.0).contains(&spec.tilt) {
        return Err(ValidationError::new(
            "spec.tilt",
            format!("Tilt angle must be between 0 and 90 degrees, got {}", spec.tilt),
        ));
    }
    if !(0.0..=360.0).contains(&spec.azimuth) {
        return Err(ValidationError::new(
            "spec.azimuth",
            format!(
                "Azimuth angle must be between 0 and 360 degrees, got {}",
                spec.azimuth
            ),
        ));
    }
    Ok(())
}
