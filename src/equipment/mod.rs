pub mod catalog;
/// Panel, inverter and battery records.
pub mod types;

pub use catalog::{
    BatteryFilter, CatalogError, CatalogRecord, EquipmentCatalog, InMemoryCatalog,
    InverterFilter, PanelFilter, Range,
};
pub use types::{Battery, Inverter, Panel};
