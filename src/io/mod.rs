/// CSV export of results.
pub mod export;
pub mod request;

pub use export::{export_monthly_csv, export_variants_csv, write_monthly_csv, write_variants_csv};
pub use request::{RequestError, SimulationRequest};
