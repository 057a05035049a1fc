/// Cash and loan comparison.
pub mod financing;
/// Roof packing.
pub mod layout;
pub mod optimizer;
pub mod requirements;
pub mod scoring;
pub mod selection;
pub mod types;

pub use financing::{CashOption, FinancingOptions, LoanOption};
pub use layout::RoofLayout;
pub use optimizer::{SystemDesigner, rank_variants};
pub use requirements::{
    Budget, DesignGoals, DesignPreferences, DesignRequirements, OptimizationGoal, RoofConstraints,
    UtilityRates,
};
pub use scoring::Score;
pub use types::{
    Component, CostBreakdown, DesignComponents, DesignResult, DesignVariant, EnergyAnalysis,
    MonthlyBalance,
};
