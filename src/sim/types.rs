//! Core simulation types: site, system specification, and production records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::financial::FinancialAnalysis;

/// Geographic site of a candidate installation.
///
/// # Examples
///
/// ```
/// use solar_design_engine::sim::types::Location;
///
/// let sf = Location::new(37.7749, -122.4194);
/// assert_eq!(sf.elevation_m, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90, north positive).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180, east positive).
    pub longitude: f64,
    /// Elevation above sea level (m).
    #[serde(default)]
    pub elevation_m: Option<f64>,
    /// IANA timezone name, informational only.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation_m: None,
            timezone: None,
        }
    }
}

/// Photovoltaic module technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleType {
    Monocrystalline,
    Polycrystalline,
    ThinFilm,
}

impl ModuleType {
    pub const ALL: [Self; 3] = [Self::Monocrystalline, Self::Polycrystalline, Self::ThinFilm];

    /// Power temperature coefficient (fraction per °C, negative).
    pub fn temperature_coefficient(self) -> f64 {
        match self {
            Self::Monocrystalline => -0.0040,
            Self::Polycrystalline => -0.0045,
            Self::ThinFilm => -0.0025,
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Monocrystalline => "monocrystalline",
            Self::Polycrystalline => "polycrystalline",
            Self::ThinFilm => "thin-film",
        })
    }
}

/// Array mounting and sun-tracking mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackingType {
    #[default]
    Fixed,
    /// Azimuth tracking: the array keeps its tilt and turns to face the sun.
    SingleAxis,
    /// Full tracking: the array stays normal to the beam.
    DualAxis,
}

impl fmt::Display for TrackingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Fixed => "fixed",
            Self::SingleAxis => "single-axis",
            Self::DualAxis => "dual-axis",
        })
    }
}

/// Power conversion topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InverterType {
    String,
    PowerOptimizer,
    Micro,
}

impl InverterType {
    pub const ALL: [Self; 3] = [Self::String, Self::PowerOptimizer, Self::Micro];
}

impl fmt::Display for InverterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::String => "string",
            Self::PowerOptimizer => "power-optimizer",
            Self::Micro => "micro",
        })
    }
}

/// Physical description of a PV system to simulate.
///
/// Percentages are expressed in percent (e.g. `96.0`), not fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSpecification {
    /// Nameplate DC capacity (kW, > 0).
    pub dc_capacity_kw: f64,
    /// Module conversion efficiency (%, 0 to 50).
    pub module_efficiency: f64,
    /// Inverter conversion efficiency (%, 0 to 100).
    pub inverter_efficiency: f64,
    /// Additional user-declared system losses (%, 0 to 100).
    pub system_losses: f64,
    /// Array tilt from horizontal (degrees, 0 to 90).
    pub tilt: f64,
    /// Array azimuth (degrees, 0 to 360; 180 = south).
    pub azimuth: f64,
    pub module_type: ModuleType,
    #[serde(default)]
    pub tracking_type: TrackingType,
    pub inverter_type: InverterType,
}

/// Simulated output for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProduction {
    /// Calendar month (1 to 12).
    pub month: u32,
    /// Days in the month.
    pub days: u32,
    /// AC energy delivered (kWh).
    pub production_kwh: f64,
    /// Plane-of-array irradiation (kWh/m²/day).
    pub poa_irradiance: f64,
    /// Mean ambient temperature (°C).
    pub ambient_temperature: f64,
    /// Estimated daytime cell temperature (°C).
    pub cell_temperature: f64,
    /// Peak sun hours (h/day, equal to daily GHI in kWh/m²).
    pub peak_sun_hours: f64,
    /// Temperature derate factor applied to DC output.
    pub temperature_derate: f64,
}

/// How the nameplate rating is eroded on the way to AC output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyBreakdown {
    /// Module efficiency from the specification (%).
    pub module_efficiency: f64,
    /// Inverter efficiency from the specification (%).
    pub inverter_efficiency: f64,
    /// Energy-weighted loss from cell heating (%; negative when cold gains).
    pub temperature_losses: f64,
    /// Combined user and default balance-of-system losses (%).
    pub system_losses: f64,
    /// AC output divided by the ideal DC yield at the reference module.
    pub overall_derate: f64,
}

/// Complete output of one production simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionResult {
    pub monthly: Vec<MonthlyProduction>,
    /// Annual AC energy (kWh).
    pub annual_production: f64,
    /// Annual energy over continuous rated output (%).
    pub capacity_factor: f64,
    /// Annual energy per installed kW (kWh/kW/yr).
    pub specific_yield: f64,
    /// Specific yield over the GHI reference yield (dimensionless).
    pub performance_ratio: f64,
    /// Mean daily GHI across the year (h/day).
    pub peak_sun_hours: f64,
    /// Avoided grid emissions (kg CO₂/yr).
    pub co2_savings: f64,
    pub efficiency: EfficiencyBreakdown,
    #[serde(default)]
    pub financial: Option<FinancialAnalysis>,
}

impl fmt::Display for MonthlyProduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month={:>2} | {:>8.1} kWh | POA={:.2} kWh/m²/d  PSH={:.2} h | \
             T_amb={:>5.1}°C  T_cell={:>5.1}°C  derate={:.3}",
            self.month,
            self.production_kwh,
            self.poa_irradiance,
            self.peak_sun_hours,
            self.ambient_temperature,
            self.cell_temperature,
            self.temperature_derate,
        )
    }
}

impl fmt::Display for ProductionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Production Report ---")?;
        writeln!(f, "Annual production:     {:.0} kWh", self.annual_production)?;
        writeln!(f, "Capacity factor:       {:.1}%", self.capacity_factor)?;
        writeln!(f, "Specific yield:        {:.0} kWh/kW/yr", self.specific_yield)?;
        writeln!(f, "Performance ratio:     {:.3}", self.performance_ratio)?;
        writeln!(f, "Peak sun hours:        {:.2} h/day", self.peak_sun_hours)?;
        write!(f, "CO2 savings:           {:.0} kg/yr", self.co2_savings)?;
        if let Some(fin) = &self.financial {
            write!(f, "\n{fin}")?;
        }
        Ok(())
    }
}
