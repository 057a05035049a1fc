//! Four-axis scoring of design variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoreWeights;
use crate::equipment::{Inverter, Panel};

/// Variant score; every axis is in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub overall: f64,
    pub cost: f64,
    pub performance: f64,
    pub aesthetics: f64,
    pub reliability: f64,
}

/// Everything the scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    /// Installed cost of the variant ($).
    pub total_cost: f64,
    /// Budget ceiling the cost is measured against ($, > 0).
    pub budget: f64,
    /// Achieved offset (%).
    pub offset_percentage: f64,
    /// Requested offset (%, > 0).
    pub offset_goal: f64,
    pub panel: &'a Panel,
    pub inverter: &'a Inverter,
}

impl Score {
    pub fn evaluate(inputs: &ScoreInputs<'_>, weights: &ScoreWeights) -> Self {
        let cost = if inputs.budget > 0.0 {
            (100.0 * (1.0 - inputs.total_cost / inputs.budget)).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let performance = if inputs.offset_goal > 0.0 {
            (inputs.offset_percentage / inputs.offset_goal * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let aesthetics = (inputs.panel.efficiency * 4.0).clamp(0.0, 100.0);
        let reliability = reliability_score(inputs.panel, inputs.inverter);

        let overall = weights.cost * cost
            + weights.performance * performance
            + weights.aesthetics * aesthetics
            + weights.reliability * reliability;

        Self {
            overall: overall.clamp(0.0, 100.0),
            cost,
            performance,
            aesthetics,
            reliability,
        }
    }
}

fn reliability_score(panel: &Panel, inverter: &Inverter) -> f64 {
    let mut score = 50.0;
    if panel.tier == 1 {
        score += 20.0;
    }
    if panel.warranty_years >= 25 {
        score += 15.0;
    }
    if inverter.warranty_years >= 20 {
        score += 10.0;
    }
    if inverter.efficiency >= 97.0 {
        score += 5.0;
    }
    score
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} (cost {:.0}, performance {:.0}, aesthetics {:.0}, reliability {:.0})",
            self.overall, self.cost, self.performance, self.aesthetics, self.reliability
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::{InverterType, ModuleType};

    fn panel(tier: u8, warranty_years: u32, efficiency: f64) -> Panel {
        Panel {
            model: "P".into(),
            manufacturer: "M".into(),
            module_type: ModuleType::Monocrystalline,
            wattage: 400.0,
            efficiency,
            price_per_watt: 0.5,
            tier,
            warranty_years,
            in_stock: true,
            length_m: 1.7,
            width_m: 1.0,
        }
    }

    fn inverter(warranty_years: u32, efficiency: f64) -> Inverter {
        Inverter {
            model: "I".into(),
            manufacturer: "M".into(),
            inverter_type: InverterType::String,
            capacity_kw: 5.0,
            efficiency,
            price_per_watt: 0.3,
            tier: 1,
            warranty_years,
            in_stock: true,
        }
    }

    #[test]
    fn reliability_bonuses_stack() {
        assert_eq!(reliability_score(&panel(2, 10, 20.0), &inverter(10, 96.0)), 50.0);
        assert_eq!(reliability_score(&panel(1, 25, 20.0), &inverter(25, 97.0)), 100.0);
        assert_eq!(reliability_score(&panel(1, 12, 20.0), &inverter(12, 97.5)), 75.0);
    }

    #[test]
    fn weighted_overall() {
        let p = panel(1, 25, 20.0);
        let i = inverter(25, 97.0);
        let s = Score::evaluate(
            &ScoreInputs {
                total_cost: 10_000.0,
                budget: 20_000.0,
                offset_percentage: 90.0,
                offset_goal: 100.0,
                panel: &p,
                inverter: &i,
            },
            &ScoreWeights::default(),
        );
        assert!((s.cost - 50.0).abs() < 1e-9);
        assert!((s.performance - 90.0).abs() < 1e-9);
        assert!((s.aesthetics - 80.0).abs() < 1e-9);
        // 0.3*50 + 0.4*90 + 0.1*80 + 0.2*100
        assert!((s.overall - 79.0).abs() < 1e-9);
    }

    #[test]
    fn over_budget_scores_zero_cost() {
        let p = panel(1, 25, 30.0);
        let i = inverter(10, 96.0);
        let s = Score::evaluate(
            &ScoreInputs {
                total_cost: 40_000.0,
                budget: 20_000.0,
                offset_percentage: 150.0,
                offset_goal: 100.0,
                panel: &p,
                inverter: &i,
            },
            &ScoreWeights::default(),
        );
        assert_eq!(s.cost, 0.0);
        assert_eq!(s.performance, 100.0);
        assert_eq!(s.aesthetics, 100.0);
    }
}
