/// Production simulator entry point and input validation.
pub mod engine;
pub mod financial;
/// Solar-noon geometry.
pub mod geometry;
pub mod irradiance;
pub mod losses;
pub mod metrics;
/// Cell temperature and temperature derating.
pub mod thermal;
pub mod types;

pub use engine::ProductionSimulator;
pub use financial::{FinancialAnalysis, FinancialOptions};
pub use types::{
    EfficiencyBreakdown, InverterType, Location, ModuleType, MonthlyProduction, ProductionResult,
    SystemSpecification, TrackingType,
};
