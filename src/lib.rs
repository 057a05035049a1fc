//! Residential solar production simulator and system designer.
//!
//! [`sim::ProductionSimulator`] turns a site, a system specification and a
//! typical-year weather series into monthly production and annual metrics.
//! [`design::SystemDesigner`] searches an [`equipment::EquipmentCatalog`] for
//! panel, inverter and battery combinations and ranks them by a weighted score.

pub mod cli;
pub mod config;
pub mod design;
pub mod equipment;
pub mod error;
pub mod io;
/// Production simulation: geometry, irradiance, thermal and loss models.
pub mod sim;
pub mod weather;

pub use error::{DesignError, InfeasibleDesignError, ValidationError};
