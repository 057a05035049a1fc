//! Balance-of-system derate chain.

use crate::config::SimulationConfig;

/// Combined multiplier for user-declared and default system losses.
///
/// The chain is `(100 - user) / 100` times one `(1 - loss)` term per default
/// loss factor (wiring, soiling, mismatch, availability), floored at
/// `config.min_system_derate`.
///
/// # Arguments
///
/// * `user_losses_pct` - Declared system losses (%, 0 to 100)
/// * `config` - Default loss factors and the derate floor
pub fn system_derate(user_losses_pct: f64, config: &SimulationConfig) -> f64 {
    let user = (100.0 - user_losses_pct) / 100.0;
    let defaults = [
        config.wiring_loss,
        config.soiling_loss,
        config.mismatch_loss,
        config.availability_loss,
    ]
    .iter()
    .fold(1.0, |acc, loss| acc * (1.0 - loss));

    (user * defaults).max(config.min_system_derate)
}
