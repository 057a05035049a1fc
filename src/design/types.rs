//! Design variant and result records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::equipment::{Battery, Inverter, Panel};
use crate::sim::types::{ProductionResult, SystemSpecification};

use super::financing::FinancingOptions;
use super::layout::RoofLayout;
use super::scoring::Score;

/// A catalog item together with the number of units installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component<T> {
    pub item: T,
    pub quantity: u32,
}

impl<T> Component<T> {
    pub fn new(item: T, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

impl Component<Panel> {
    /// Array nameplate rating (kW DC).
    pub fn capacity_kw(&self) -> f64 {
        f64::from(self.quantity) * self.item.wattage / 1000.0
    }

    pub fn cost(&self) -> f64 {
        f64::from(self.quantity) * self.item.unit_price()
    }
}

impl Component<Inverter> {
    /// Combined AC rating (kW).
    pub fn capacity_kw(&self) -> f64 {
        f64::from(self.quantity) * self.item.capacity_kw
    }

    pub fn cost(&self) -> f64 {
        f64::from(self.quantity) * self.item.unit_price()
    }
}

impl Component<Battery> {
    /// Combined usable storage (kWh).
    pub fn capacity_kwh(&self) -> f64 {
        f64::from(self.quantity) * self.item.capacity_kwh
    }

    pub fn cost(&self) -> f64 {
        f64::from(self.quantity) * self.item.unit_price()
    }
}

/// The equipment bill of one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignComponents {
    pub panels: Component<Panel>,
    pub inverters: Component<Inverter>,
    #[serde(default)]
    pub batteries: Option<Component<Battery>>,
}

/// Installed cost of one variant ($).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub panels: f64,
    pub inverters: f64,
    pub batteries: f64,
    /// Sum of the equipment lines.
    pub equipment: f64,
    /// Labour and balance of system.
    pub installation: f64,
    /// Equipment plus installation.
    pub total: f64,
    /// Tax credits and rebates.
    pub incentives: f64,
    /// Total less incentives.
    pub net: f64,
}

/// Production against consumption for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub month: u32,
    /// kWh
    pub production: f64,
    /// kWh
    pub usage: f64,
    /// Production minus usage (kWh); negative means grid import.
    pub net: f64,
}

/// How well a variant covers the household's consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAnalysis {
    /// kWh/yr
    pub annual_production: f64,
    /// kWh/yr
    pub annual_usage: f64,
    /// Share of usage covered by production (%, capped at 100).
    pub offset_percentage: f64,
    pub monthly: Vec<MonthlyBalance>,
}

/// One fully evaluated equipment combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignVariant {
    pub components: DesignComponents,
    pub system_specs: SystemSpecification,
    pub production: ProductionResult,
    pub cost: CostBreakdown,
    pub energy_analysis: EnergyAnalysis,
    pub score: Score,
}

/// The ranked outcome of one design request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    /// Highest-ranked variant.
    pub design: DesignVariant,
    /// Present when roof constraints were supplied.
    #[serde(default)]
    pub layout: Option<RoofLayout>,
    /// Present when utility rates were supplied.
    #[serde(default)]
    pub financing: Option<FinancingOptions>,
    /// Runners-up in rank order.
    pub alternative_designs: Vec<DesignVariant>,
}

impl fmt::Display for DesignVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.components;
        writeln!(
            f,
            "  Panels:         {} x {} {} ({:.0} W, {:.1}%)",
            c.panels.quantity,
            c.panels.item.manufacturer,
            c.panels.item.model,
            c.panels.item.wattage,
            c.panels.item.efficiency
        )?;
        writeln!(
            f,
            "  Inverters:      {} x {} {} ({}, {:.2} kW)",
            c.inverters.quantity,
            c.inverters.item.manufacturer,
            c.inverters.item.model,
            c.inverters.item.inverter_type,
            c.inverters.item.capacity_kw
        )?;
        if let Some(b) = &c.batteries {
            writeln!(
                f,
                "  Batteries:      {} x {} {} ({:.1} kWh)",
                b.quantity, b.item.manufacturer, b.item.model, b.item.capacity_kwh
            )?;
        }
        writeln!(
            f,
            "  System size:    {:.2} kW DC, tilt {:.1}°, azimuth {:.0}°",
            self.system_specs.dc_capacity_kw, self.system_specs.tilt, self.system_specs.azimuth
        )?;
        writeln!(
            f,
            "  Production:     {:.0} kWh/yr ({:.1}% offset)",
            self.energy_analysis.annual_production, self.energy_analysis.offset_percentage
        )?;
        writeln!(
            f,
            "  Cost:           ${:.0} total, ${:.0} net",
            self.cost.total, self.cost.net
        )?;
        write!(f, "  Score:          {}", self.score)
    }
}

impl fmt::Display for DesignResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Recommended Design ===")?;
        writeln!(f, "{}", self.design)?;
        if let Some(layout) = &self.layout {
            writeln!(f)?;
            writeln!(f, "=== Roof Layout ===")?;
            writeln!(f, "{layout}")?;
        }
        if let Some(financing) = &self.financing {
            writeln!(f)?;
            writeln!(f, "=== Financing ===")?;
            writeln!(f, "{financing}")?;
        }
        for (i, alt) in self.alternative_designs.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "=== Alternative {} ===", i + 1)?;
            writeln!(f, "{alt}")?;
        }
        Ok(())
    }
}
