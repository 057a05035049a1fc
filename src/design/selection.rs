//! Picking one catalog item per component slot.

use std::cmp::Ordering;

use crate::equipment::{Battery, Inverter, Panel};
use crate::sim::types::InverterType;

use super::requirements::OptimizationGoal;
use super::types::Component;

/// Chooses the panel that best serves `goal`.
///
/// Panels failing [`Panel::validate`] are never chosen. Returns `None` when
/// no usable panel remains.
pub fn select_panel(panels: &[Panel], goal: OptimizationGoal) -> Option<&Panel> {
    let usable = panels.iter().filter(|p| p.validate().is_ok());
    match goal {
        OptimizationGoal::MaximizeEfficiency => usable.max_by(|a, b| {
            a.efficiency
                .total_cmp(&b.efficiency)
                .then_with(|| b.price_per_watt.total_cmp(&a.price_per_watt))
        }),
        OptimizationGoal::MinimizeCost => usable.min_by(|a, b| {
            a.price_per_watt
                .total_cmp(&b.price_per_watt)
                .then_with(|| b.efficiency.total_cmp(&a.efficiency))
        }),
        OptimizationGoal::Balanced => {
            usable.max_by(|a, b| value_ratio(a).total_cmp(&value_ratio(b)))
        }
    }
}

/// Efficiency points per dollar per watt; price is positive on usable panels.
fn value_ratio(panel: &Panel) -> f64 {
    panel.efficiency / panel.price_per_watt
}

/// Chooses an inverter model and unit count for an array.
///
/// Micro-inverters take the most efficient model with one unit per panel.
/// String and optimizer inverters are sized so the combined AC rating covers
/// `sizing_ratio * dc_kw` with the least oversize, preferring higher
/// efficiency between equal fits.
pub fn select_inverter(
    inverters: &[Inverter],
    inverter_type: InverterType,
    dc_kw: f64,
    panel_count: u32,
    sizing_ratio: f64,
) -> Option<Component<Inverter>> {
    if inverter_type == InverterType::Micro {
        return inverters
            .iter()
            .filter(|i| i.validate().is_ok())
            .max_by(|a, b| a.efficiency.total_cmp(&b.efficiency))
            .map(|i| Component::new(i.clone(), panel_count));
    }

    let target_ac = dc_kw * sizing_ratio;
    inverters
        .iter()
        .filter(|i| i.validate().is_ok())
        .map(|i| {
            let units = ((target_ac / i.capacity_kw).ceil() as u32).max(1);
            let oversize = f64::from(units) * i.capacity_kw - target_ac;
            (i, units, oversize)
        })
        .min_by(|(a, _, oa), (b, _, ob)| {
            oa.total_cmp(ob)
                .then_with(|| b.efficiency.total_cmp(&a.efficiency))
        })
        .map(|(i, units, _)| Component::new(i.clone(), units))
}

/// Chooses the battery bank that reaches `target_kwh` at the lowest price.
///
/// Between equally priced banks the more efficient one wins.
pub fn select_battery(batteries: &[Battery], target_kwh: f64) -> Option<Component<Battery>> {
    batteries
        .iter()
        .filter(|b| b.validate().is_ok())
        .map(|b| {
            let units = ((target_kwh / b.capacity_kwh).ceil() as u32).max(1);
            (b, units, f64::from(units) * b.unit_price())
        })
        .min_by(|(a, _, ca), (b, _, cb)| match ca.total_cmp(cb) {
            Ordering::Equal => b.efficiency.total_cmp(&a.efficiency),
            other => other,
        })
        .map(|(b, units, _)| Component::new(b.clone(), units))
}

/// Number of panels needed to reach `target_kw`.
pub fn panel_count(target_kw: f64, wattage: f64) -> u32 {
    ((target_kw * 1000.0 / wattage).ceil() as u32).max(1)
}
