//! Post-hoc aggregate metrics computed from monthly production records.

use super::types::MonthlyProduction;

/// Annual figures derived from a complete set of monthly records.
///
/// Computed from `&[MonthlyProduction]` so the annual total always agrees
/// with the monthly breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualMetrics {
    /// Sum of monthly AC energy (kWh).
    pub annual_production: f64,
    /// Annual energy over `dc_kw * 8760` (%).
    pub capacity_factor: f64,
    /// kWh per installed kW.
    pub specific_yield: f64,
    /// Specific yield over the GHI reference yield.
    pub performance_ratio: f64,
    /// Mean daily GHI (h/day).
    pub peak_sun_hours: f64,
    /// Avoided emissions (kg CO₂/yr).
    pub co2_savings: f64,
}

impl AnnualMetrics {
    /// Aggregates monthly records.
    ///
    /// # Arguments
    ///
    /// * `months` - Monthly production records (12 in practice)
    /// * `dc_capacity_kw` - Nameplate DC capacity (kW, > 0)
    /// * `emission_factor` - Grid emission factor (kg CO₂/kWh)
    pub fn from_months(
        months: &[MonthlyProduction],
        dc_capacity_kw: f64,
        emission_factor: f64,
    ) -> Self {
        if months.is_empty() || dc_capacity_kw <= 0.0 {
            return Self {
                annual_production: 0.0,
                capacity_factor: 0.0,
                specific_yield: 0.0,
                performance_ratio: 0.0,
                peak_sun_hours: 0.0,
                co2_savings: 0.0,
            };
        }

        let mut annual = 0.0;
        let mut reference_yield = 0.0;
        let mut psh_sum = 0.0;
        for m in months {
            annual += m.production_kwh;
            // kWh/m² at 1 kW/m² STC equals equivalent full-load hours.
            reference_yield += m.peak_sun_hours * f64::from(m.days);
            psh_sum += m.peak_sun_hours;
        }

        let specific_yield = annual / dc_capacity_kw;
        let performance_ratio = if reference_yield > 0.0 {
            specific_yield / reference_yield
        } else {
            0.0
        };

        Self {
            annual_production: annual,
            capacity_factor: annual / (dc_capacity_kw * 8760.0) * 100.0,
            specific_yield,
            performance_ratio,
            peak_sun_hours: psh_sum / months.len() as f64,
            co2_savings: annual * emission_factor,
        }
    }
}
