//! Cash and loan purchase options for a chosen design.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::financial::FinancialAnalysis;

/// Outright purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashOption {
    /// Out-of-pocket cost after incentives ($).
    pub upfront_cost: f64,
    /// First-year bill savings ($).
    pub annual_savings: f64,
    pub payback_years: Option<f64>,
    /// Escalated savings over the analysis horizon ($).
    pub lifetime_savings: f64,
    /// Lifetime savings minus upfront cost ($).
    pub net_benefit: f64,
}

/// Fixed-rate amortized loan over the net cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOption {
    pub principal: f64,
    /// Nominal annual rate (%).
    pub annual_rate: f64,
    pub term_years: u32,
    pub monthly_payment: f64,
    pub total_interest: f64,
    /// First-year savings per month ($).
    pub monthly_savings: f64,
    /// Savings minus payment; negative means the loan costs more than it saves.
    pub net_monthly_cashflow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingOptions {
    pub cash: CashOption,
    pub loan: LoanOption,
}

impl FinancingOptions {
    /// Builds both options from a financial analysis.
    ///
    /// # Arguments
    ///
    /// * `analysis` - Financial analysis of the chosen variant
    /// * `annual_rate` - Loan rate (%/yr)
    /// * `term_years` - Loan term (years, > 0)
    pub fn from_analysis(analysis: &FinancialAnalysis, annual_rate: f64, term_years: u32) -> Self {
        let principal = analysis.net_cost.max(0.0);
        let payment = monthly_payment(principal, annual_rate, term_years);
        let months = f64::from(term_years * 12);
        let monthly_savings = analysis.annual_savings / 12.0;

        Self {
            cash: CashOption {
                upfront_cost: analysis.net_cost,
                annual_savings: analysis.annual_savings,
                payback_years: analysis.payback_years,
                lifetime_savings: analysis.total_lifetime_savings,
                net_benefit: analysis.total_lifetime_savings - analysis.net_cost,
            },
            loan: LoanOption {
                principal,
                annual_rate,
                term_years,
                monthly_payment: payment,
                total_interest: (payment * months - principal).max(0.0),
                monthly_savings,
                net_monthly_cashflow: monthly_savings - payment,
            },
        }
    }
}

/// Standard annuity payment `P * r / (1 - (1 + r)^-n)` with monthly `r`.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, term_years: u32) -> f64 {
    let n = f64::from(term_years * 12);
    if n <= 0.0 {
        return principal;
    }
    let r = annual_rate_pct / 100.0 / 12.0;
    if r.abs() < 1e-12 {
        return principal / n;
    }
    principal * r / (1.0 - (1.0 + r).powf(-n))
}

impl fmt::Display for FinancingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payback = self
            .cash
            .payback_years
            .map_or_else(|| "never".to_string(), |y| format!("{y:.1} years"));
        writeln!(
            f,
            "  Cash:           ${:.0} upfront, payback {payback}, net benefit ${:.0}",
            self.cash.upfront_cost, self.cash.net_benefit
        )?;
        write!(
            f,
            "  Loan:           ${:.2}/month over {} years at {:.2}% (savings ${:.2}/month)",
            self.loan.monthly_payment,
            self.loan.term_years,
            self.loan.annual_rate,
            self.loan.monthly_savings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> FinancialAnalysis {
        FinancialAnalysis {
            system_cost: 20_000.0,
            incentives: 6_000.0,
            net_cost: 14_000.0,
            annual_savings: 1_200.0,
            payback_years: Some(14_000.0 / 1_200.0),
            roi: 100.0,
            npv: 5_000.0,
            lcoe: 0.05,
            total_lifetime_savings: 40_000.0,
        }
    }

    #[test]
    fn amortization_matches_reference() {
        // $10,000 at 6% for 10 years
        let p = monthly_payment(10_000.0, 6.0, 10);
        assert!((p - 111.02).abs() < 0.01);
    }

    #[test]
    fn zero_rate_is_straight_line() {
        assert!((monthly_payment(12_000.0, 0.0, 10) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn options_from_analysis() {
        let opts = FinancingOptions::from_analysis(&analysis(), 7.0, 20);
        assert_eq!(opts.cash.upfront_cost, 14_000.0);
        assert!((opts.cash.net_benefit - 26_000.0).abs() < 1e-9);
        assert!((opts.loan.monthly_savings - 100.0).abs() < 1e-9);
        // 14,000 at 7% over 20 years is about $108.54 a month
        assert!((opts.loan.monthly_payment - 108.54).abs() < 0.01);
        assert!(opts.loan.total_interest > 0.0);
        assert!(opts.loan.net_monthly_cashflow < 0.0);
    }
}
