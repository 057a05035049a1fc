//! Catalog records for panels, inverters and batteries.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::sim::types::{InverterType, ModuleType};

/// Default module length when the datasheet omits it (m).
pub const DEFAULT_PANEL_LENGTH_M: f64 = 1.7;
/// Default module width when the datasheet omits it (m).
pub const DEFAULT_PANEL_WIDTH_M: f64 = 1.0;

/// Highest module efficiency the simulator accepts (%).
pub const MAX_PANEL_EFFICIENCY: f64 = 50.0;

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("{field} must be greater than 0, got {value}"),
        ))
    }
}

fn percentage(field: &str, value: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("{field} must be between 0 and {max}%, got {value}"),
        ))
    }
}

fn default_true() -> bool {
    true
}

fn default_length() -> f64 {
    DEFAULT_PANEL_LENGTH_M
}

fn default_width() -> f64 {
    DEFAULT_PANEL_WIDTH_M
}

/// A PV module model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub model: String,
    pub manufacturer: String,
    pub module_type: ModuleType,
    /// STC rating (W).
    pub wattage: f64,
    /// Conversion efficiency (%).
    pub efficiency: f64,
    /// Equipment price ($/W).
    pub price_per_watt: f64,
    /// Bankability tier (1 = best).
    pub tier: u8,
    /// Product/performance warranty (years).
    pub warranty_years: u32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default = "default_length")]
    pub length_m: f64,
    #[serde(default = "default_width")]
    pub width_m: f64,
}

impl Panel {
    /// Module footprint (m²).
    pub fn area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }

    /// Price of one module ($).
    pub fn unit_price(&self) -> f64 {
        self.wattage * self.price_per_watt
    }

    /// Checks that the record can be priced and simulated.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("wattage", self.wattage)?;
        percentage("efficiency", self.efficiency, MAX_PANEL_EFFICIENCY)?;
        positive("price_per_watt", self.price_per_watt)?;
        positive("length_m", self.length_m)?;
        positive("width_m", self.width_m)
    }
}

/// An inverter model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inverter {
    pub model: String,
    pub manufacturer: String,
    pub inverter_type: InverterType,
    /// Rated AC output of one unit (kW).
    pub capacity_kw: f64,
    /// Weighted conversion efficiency (%).
    pub efficiency: f64,
    /// Equipment price ($/W AC).
    pub price_per_watt: f64,
    pub tier: u8,
    pub warranty_years: u32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

impl Inverter {
    /// Price of one unit ($).
    pub fn unit_price(&self) -> f64 {
        self.capacity_kw * 1000.0 * self.price_per_watt
    }

    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("capacity_kw", self.capacity_kw)?;
        percentage("efficiency", self.efficiency, 100.0)?;
        positive("price_per_watt", self.price_per_watt)
    }
}

/// A stationary battery model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub model: String,
    pub manufacturer: String,
    /// Usable energy of one unit (kWh).
    pub capacity_kwh: f64,
    /// Round-trip efficiency (%).
    pub efficiency: f64,
    /// Equipment price ($/kWh).
    pub price_per_kwh: f64,
    pub tier: u8,
    pub warranty_years: u32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

impl Battery {
    /// Price of one unit ($).
    pub fn unit_price(&self) -> f64 {
        self.capacity_kwh * self.price_per_kwh
    }

    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("capacity_kwh", self.capacity_kwh)?;
        percentage("efficiency", self.efficiency, 100.0)?;
        positive("price_per_kwh", self.price_per_kwh)
    }
}
