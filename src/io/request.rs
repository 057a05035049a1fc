//! TOML request files for the command-line front end.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::design::DesignRequirements;
use crate::sim::financial::FinancialOptions;
use crate::sim::types::{Location, SystemSpecification};

/// A single system to simulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationRequest {
    pub location: Location,
    pub system: SystemSpecification,
    /// Per-request financial assumptions; implies a financial analysis.
    #[serde(default)]
    pub financial: Option<FinancialOptions>,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid request \"{path}\": {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl SimulationRequest {
    /// # Errors
    ///
    /// Returns a `RequestError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, RequestError> {
        read_toml(path)
    }
}

impl DesignRequirements {
    /// # Errors
    ///
    /// Returns a `RequestError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, RequestError> {
        read_toml(path)
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, RequestError> {
    let content = fs::read_to_string(path).map_err(|source| RequestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| RequestError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::{ModuleType, TrackingType};

    #[test]
    fn simulation_request_parses() {
        let toml = r#"
[location]
latitude = 37.7749
longitude = -122.4194

[system]
dc_capacity_kw = 10.0
module_efficiency = 18.0
inverter_efficiency = 96.0
system_losses = 14.0
tilt = 30.0
azimuth = 180.0
module_type = "monocrystalline"
inverter_type = "string"

[financial]
electricity_rate = 0.25
"#;
        let req: Result<SimulationRequest, _> = toml::from_str(toml);
        assert!(req.is_ok(), "request should parse: {:?}", req.err());
        let Ok(req) = req else { return };
        assert_eq!(req.system.module_type, ModuleType::Monocrystalline);
        assert_eq!(req.system.tracking_type, TrackingType::Fixed);
        let fin = req.financial.as_ref();
        assert_eq!(fin.map(|f| f.electricity_rate), Some(0.25));
        assert_eq!(fin.map(|f| f.system_lifetime), Some(25));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SimulationRequest::from_toml_file(Path::new("/nonexistent/system.toml"));
        let msg = err.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("/nonexistent/system.toml"));
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
monthly_usage = [700, 700, 700, 700, 700, 700, 700, 700, 700, 700, 700, 700]
colour = "blue"

[location]
latitude = 40.0
longitude = -105.0
"#;
        let req: Result<DesignRequirements, _> = toml::from_str(toml);
        assert!(req.is_err());
    }
}
