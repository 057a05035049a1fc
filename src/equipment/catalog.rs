//! Equipment catalog lookups and the in-memory catalog implementation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::types::{Battery, Inverter, Panel};
use crate::error::ValidationError;
use crate::sim::types::{InverterType, ModuleType};

/// Inclusive numeric range; open ends are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|lo| value >= lo) && self.max.is_none_or(|hi| value <= hi)
    }
}

/// Panel lookup criteria. Empty criteria match every panel.
#[derive(Debug, Clone, Default)]
pub struct PanelFilter {
    pub module_type: Option<ModuleType>,
    pub wattage: Range,
    /// Worst acceptable tier (1 keeps only tier-1).
    pub max_tier: Option<u8>,
    pub in_stock_only: bool,
}

impl PanelFilter {
    pub fn matches(&self, p: &Panel) -> bool {
        self.module_type.is_none_or(|t| p.module_type == t)
            && self.wattage.contains(p.wattage)
            && self.max_tier.is_none_or(|t| p.tier <= t)
            && (!self.in_stock_only || p.in_stock)
    }
}

/// Inverter lookup criteria.
#[derive(Debug, Clone, Default)]
pub struct InverterFilter {
    pub inverter_type: Option<InverterType>,
    pub capacity_kw: Range,
    pub max_tier: Option<u8>,
    pub in_stock_only: bool,
}

impl InverterFilter {
    pub fn matches(&self, i: &Inverter) -> bool {
        self.inverter_type.is_none_or(|t| i.inverter_type == t)
            && self.capacity_kw.contains(i.capacity_kw)
            && self.max_tier.is_none_or(|t| i.tier <= t)
            && (!self.in_stock_only || i.in_stock)
    }
}

/// Battery lookup criteria.
#[derive(Debug, Clone, Default)]
pub struct BatteryFilter {
    pub capacity_kwh: Range,
    pub max_tier: Option<u8>,
    pub in_stock_only: bool,
}

impl BatteryFilter {
    pub fn matches(&self, b: &Battery) -> bool {
        self.capacity_kwh.contains(b.capacity_kwh)
            && self.max_tier.is_none_or(|t| b.tier <= t)
            && (!self.in_stock_only || b.in_stock)
    }
}

/// Read-only, filterable source of equipment.
///
/// Result order carries no meaning. Implementations must be shareable across
/// concurrent design calls.
pub trait EquipmentCatalog: Send + Sync {
    fn panels(&self, filter: &PanelFilter) -> Vec<Panel>;
    fn inverters(&self, filter: &InverterFilter) -> Vec<Inverter>;
    fn batteries(&self, filter: &BatteryFilter) -> Vec<Battery>;
}

/// Failure to load a catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog file \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid catalog record {row} (\"{model}\"): {source}")]
    InvalidRecord {
        /// One-based data row, excluding the header.
        row: usize,
        model: String,
        #[source]
        source: ValidationError,
    },
}

/// A row type stored in a catalog file.
pub trait CatalogRecord: DeserializeOwned {
    fn model(&self) -> &str;
    fn check(&self) -> Result<(), ValidationError>;
}

impl CatalogRecord for Panel {
    fn model(&self) -> &str {
        &self.model
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl CatalogRecord for Inverter {
    fn model(&self) -> &str {
        &self.model
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

impl CatalogRecord for Battery {
    fn model(&self) -> &str {
        &self.model
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    panels: Vec<Panel>,
    inverters: Vec<Inverter>,
    batteries: Vec<Battery>,
}

impl InMemoryCatalog {
    pub fn new(panels: Vec<Panel>, inverters: Vec<Inverter>, batteries: Vec<Battery>) -> Self {
        Self {
            panels,
            inverters,
            batteries,
        }
    }

    /// Loads `panels.csv`, `inverters.csv` and `batteries.csv` from `dir`.
    ///
    /// A missing `batteries.csv` yields an empty battery list; the other two
    /// files are required.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if a required file is missing or malformed, or
    /// if any record fails its range checks.
    pub fn from_csv_dir(dir: &Path) -> Result<Self, CatalogError> {
        let panels = read_csv_file(&dir.join("panels.csv"))?;
        let inverters = read_csv_file(&dir.join("inverters.csv"))?;
        let battery_path = dir.join("batteries.csv");
        let batteries = if battery_path.exists() {
            read_csv_file(&battery_path)?
        } else {
            Vec::new()
        };
        debug!(
            panels = panels.len(),
            inverters = inverters.len(),
            batteries = batteries.len(),
            dir = %dir.display(),
            "loaded catalog"
        );
        Ok(Self::new(panels, inverters, batteries))
    }

    /// All panels, regardless of availability.
    pub fn all_panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn all_inverters(&self) -> &[Inverter] {
        &self.inverters
    }

    pub fn all_batteries(&self) -> &[Battery] {
        &self.batteries
    }

    /// A small built-in residential catalog.
    pub fn builtin() -> Self {
        use InverterType::{Micro, PowerOptimizer, String as Str};
        use ModuleType::{Monocrystalline, Polycrystalline, ThinFilm};

        let panels = vec![
            builtin_panel("NS-400M", "Northstar", Monocrystalline, 400.0, 21.0, 0.55, 1, 25),
            builtin_panel("SF-430M", "Sunfield", Monocrystalline, 430.0, 22.1, 0.62, 1, 30),
            builtin_panel("BW-370M", "Brightwave", Monocrystalline, 370.0, 19.8, 0.45, 2, 25),
            builtin_panel("BW-330P", "Brightwave", Polycrystalline, 330.0, 17.0, 0.38, 2, 12),
            builtin_panel("TL-345P", "Terralite", Polycrystalline, 345.0, 18.0, 0.42, 1, 25),
            builtin_panel("TL-150T", "Terralite", ThinFilm, 150.0, 12.5, 0.40, 1, 25),
            Panel {
                in_stock: false,
                ..builtin_panel("TL-165T", "Terralite", ThinFilm, 165.0, 13.2, 0.44, 1, 25)
            },
        ];
        let inverters = vec![
            builtin_inverter("GW-3800", "Gridway", Str, 3.8, 97.5, 0.30, 12),
            builtin_inverter("GW-5000", "Gridway", Str, 5.0, 97.0, 0.28, 10),
            builtin_inverter("GW-7600", "Gridway", Str, 7.6, 97.5, 0.25, 12),
            builtin_inverter("GW-10K", "Gridway", Str, 10.0, 98.0, 0.22, 12),
            builtin_inverter("OP-6000", "Optima", PowerOptimizer, 6.0, 99.0, 0.40, 25),
            builtin_inverter("OP-10K", "Optima", PowerOptimizer, 10.0, 99.0, 0.35, 25),
            builtin_inverter("MC-290", "Microcell", Micro, 0.29, 96.5, 0.70, 25),
            builtin_inverter("MC-380", "Microcell", Micro, 0.38, 97.0, 0.65, 25),
        ];
        let batteries = vec![
            builtin_battery("VS-5", 5.0, 95.0, 900.0),
            builtin_battery("VS-10", 10.0, 92.0, 750.0),
            builtin_battery("VS-13.5", 13.5, 90.0, 800.0),
        ];

        Self::new(panels, inverters, batteries)
    }
}

#[expect(clippy::too_many_arguments)]
fn builtin_panel(
    model: &str,
    manufacturer: &str,
    module_type: ModuleType,
    wattage: f64,
    efficiency: f64,
    price_per_watt: f64,
    tier: u8,
    warranty_years: u32,
) -> Panel {
    // Residential crystalline format vs. small thin-film laminate.
    let (length_m, width_m) = if wattage > 200.0 { (1.72, 1.13) } else { (1.2, 0.6) };
    Panel {
        model: model.to_string(),
        manufacturer: manufacturer.to_string(),
        module_type,
        wattage,
        efficiency,
        price_per_watt,
        tier,
        warranty_years,
        in_stock: true,
        length_m,
        width_m,
    }
}

fn builtin_inverter(
    model: &str,
    manufacturer: &str,
    inverter_type: InverterType,
    capacity_kw: f64,
    efficiency: f64,
    price_per_watt: f64,
    warranty_years: u32,
) -> Inverter {
    Inverter {
        model: model.to_string(),
        manufacturer: manufacturer.to_string(),
        inverter_type,
        capacity_kw,
        efficiency,
        price_per_watt,
        tier: 1,
        warranty_years,
        in_stock: true,
    }
}

fn builtin_battery(model: &str, capacity_kwh: f64, efficiency: f64, price_per_kwh: f64) -> Battery {
    Battery {
        model: model.to_string(),
        manufacturer: "Voltstack".to_string(),
        capacity_kwh,
        efficiency,
        price_per_kwh,
        tier: 1,
        warranty_years: 10,
        in_stock: true,
    }
}

fn read_csv_file<T: CatalogRecord>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Deserializes catalog records from CSV text with a header row.
///
/// # Errors
///
/// Returns a `CatalogError` on malformed rows or on the first record whose
/// values are out of range.
pub fn read_csv<T: CatalogRecord>(reader: impl Read) -> Result<Vec<T>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let rows = rdr.deserialize().collect::<Result<Vec<T>, _>>()?;
    for (i, record) in rows.iter().enumerate() {
        record.check().map_err(|source| CatalogError::InvalidRecord {
            row: i + 1,
            model: record.model().to_string(),
            source,
        })?;
    }
    Ok(rows)
}

impl EquipmentCatalog for InMemoryCatalog {
    fn panels(&self, filter: &PanelFilter) -> Vec<Panel> {
        self.panels
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    fn inverters(&self, filter: &InverterFilter) -> Vec<Inverter> {
        self.inverters
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect()
    }

    fn batteries(&self, filter: &BatteryFilter) -> Vec<Battery> {
        self.batteries
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect()
    }
}
