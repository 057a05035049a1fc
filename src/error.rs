//! Error types shared by the simulator and the designer.

use thiserror::Error;

/// Malformed or out-of-range input, naming the offending field.
///
/// Raised before any computation starts; no partial results exist when a
/// caller receives one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Dotted field path (e.g., `"spec.dc_capacity_kw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// No equipment combination produced a usable design variant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("no viable design: {reason}")]
pub struct InfeasibleDesignError {
    /// Which constraint could not be satisfied.
    pub reason: String,
}

impl InfeasibleDesignError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure modes of [`crate::design::SystemDesigner::design`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Infeasible(#[from] InfeasibleDesignError),
}
