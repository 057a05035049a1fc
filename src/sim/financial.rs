//! Simple-payback, NPV and LCOE analysis of a simulated system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-call financial assumptions.
///
/// Every field has a default; override any of them per call or through the
/// `[financial]` section of the engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinancialOptions {
    /// Retail electricity price ($/kWh).
    pub electricity_rate: f64,
    /// Credit for produced energy ($/kWh); falls back to `electricity_rate`.
    pub net_metering_rate: Option<f64>,
    /// Installed cost assumption ($/W DC).
    pub cost_per_watt: f64,
    /// Federal tax credit (% of system cost).
    pub federal_tax_credit: f64,
    /// State incentive (% of system cost).
    pub state_incentive: f64,
    /// Analysis horizon (years, > 0).
    pub system_lifetime: u32,
    /// Discount rate for NPV (fraction per year).
    pub discount_rate: f64,
    /// Yearly escalation of the electricity rate (fraction per year).
    pub annual_rate_increase: f64,
}

impl Default for FinancialOptions {
    fn default() -> Self {
        Self {
            electricity_rate: 0.12,
            net_metering_rate: None,
            cost_per_watt: 3.00,
            federal_tax_credit: 30.0,
            state_incentive: 0.0,
            system_lifetime: 25,
            discount_rate: 0.06,
            annual_rate_increase: 0.03,
        }
    }
}

impl FinancialOptions {
    /// Credit rate actually applied to production ($/kWh).
    pub fn effective_credit_rate(&self) -> f64 {
        self.net_metering_rate.unwrap_or(self.electricity_rate)
    }
}

/// Financial outcome of one simulated system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    /// Installed cost before incentives ($).
    pub system_cost: f64,
    /// Federal plus state incentives ($).
    pub incentives: f64,
    /// Cost after incentives ($).
    pub net_cost: f64,
    /// First-year bill savings ($).
    pub annual_savings: f64,
    /// Simple payback (years); `None` when the system never pays back.
    pub payback_years: Option<f64>,
    /// Lifetime return on the net cost (%).
    pub roi: f64,
    /// Net present value over the lifetime ($).
    pub npv: f64,
    /// Levelized cost of energy ($/kWh).
    pub lcoe: f64,
    /// Undiscounted escalated savings over the lifetime ($).
    pub total_lifetime_savings: f64,
}

impl FinancialAnalysis {
    /// Evaluates a system of `dc_capacity_kw` producing `annual_kwh` per year.
    ///
    /// Savings escalate by `annual_rate_increase` each year and are discounted
    /// at `discount_rate`; year one is discounted once.
    pub fn evaluate(dc_capacity_kw: f64, annual_kwh: f64, options: &FinancialOptions) -> Self {
        let system_cost = dc_capacity_kw * 1000.0 * options.cost_per_watt;
        let incentives =
            system_cost * (options.federal_tax_credit + options.state_incentive) / 100.0;
        let net_cost = system_cost - incentives;
        let annual_savings = annual_kwh * options.effective_credit_rate();

        let payback_years = (annual_savings > 0.0).then(|| net_cost / annual_savings);

        let mut discounted = 0.0;
        let mut total_lifetime_savings = 0.0;
        let mut yearly = annual_savings;
        for year in 1..=options.system_lifetime {
            discounted += yearly / (1.0 + options.discount_rate).powi(year as i32);
            total_lifetime_savings += yearly;
            yearly *= 1.0 + options.annual_rate_increase;
        }
        let npv = discounted - net_cost;

        let roi = if net_cost > 0.0 {
            (total_lifetime_savings - net_cost) / net_cost * 100.0
        } else {
            0.0
        };

        let lifetime_kwh = annual_kwh * f64::from(options.system_lifetime);
        let lcoe = if lifetime_kwh > 0.0 {
            net_cost / lifetime_kwh
        } else {
            0.0
        };

        Self {
            system_cost,
            incentives,
            net_cost,
            annual_savings,
            payback_years,
            roi,
            npv,
            lcoe,
            total_lifetime_savings,
        }
    }
}

impl fmt::Display for FinancialAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Financial Analysis ---")?;
        writeln!(f, "System cost:           ${:.0}", self.system_cost)?;
        writeln!(f, "Incentives:            ${:.0}", self.incentives)?;
        writeln!(f, "Net cost:              ${:.0}", self.net_cost)?;
        writeln!(f, "Annual savings:        ${:.0}", self.annual_savings)?;
        match self.payback_years {
            Some(y) => writeln!(f, "Payback:               {y:.1} years")?,
            None => writeln!(f, "Payback:               never")?,
        }
        writeln!(f, "ROI:                   {:.1}%", self.roi)?;
        writeln!(f, "NPV:                   ${:.0}", self.npv)?;
        writeln!(f, "LCOE:                  ${:.3}/kWh", self.lcoe)?;
        write!(f, "Lifetime savings:      ${:.0}", self.total_lifetime_savings)
    }
}
