//! CSV export of monthly production and ranked design variants.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::design::{DesignResult, DesignVariant};
use crate::sim::types::ProductionResult;

const MONTHLY_HEADER: &str = "month,days,production_kwh,poa_kwh_m2_day,ambient_c,cell_c,\
                              temperature_derate,peak_sun_hours";

const VARIANT_HEADER: &str = "rank,panel_model,panel_type,panel_count,inverter_model,\
                              inverter_type,inverter_count,battery_model,battery_count,dc_kw,\
                              annual_kwh,offset_pct,total_cost,net_cost,overall,cost_score,\
                              performance_score,aesthetics_score,reliability_score";

/// Writes the monthly records of `result` to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(result: &ProductionResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_monthly_csv(result, io::BufWriter::new(file))
}

/// Writes one row per simulated month to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(result: &ProductionResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(MONTHLY_HEADER.split(',').map(str::trim))?;

    for m in &result.monthly {
        wtr.write_record(&[
            m.month.to_string(),
            m.days.to_string(),
            format!("{:.2}", m.production_kwh),
            format!("{:.4}", m.poa_irradiance),
            format!("{:.2}", m.ambient_temperature),
            format!("{:.2}", m.cell_temperature),
            format!("{:.4}", m.temperature_derate),
            format!("{:.3}", m.peak_sun_hours),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the ranked variant table of `result` to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_variants_csv(result: &DesignResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_variants_csv(result, io::BufWriter::new(file))
}

/// Writes the best design and its alternatives, rank 1 first.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_variants_csv(result: &DesignResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(VARIANT_HEADER.split(',').map(str::trim))?;

    let ranked = std::iter::once(&result.design).chain(&result.alternative_designs);
    for (i, v) in ranked.enumerate() {
        wtr.write_record(variant_row(i + 1, v))?;
    }

    wtr.flush()?;
    Ok(())
}

fn variant_row(rank: usize, v: &DesignVariant) -> Vec<String> {
    let c = &v.components;
    let (battery_model, battery_count) = c
        .batteries
        .as_ref()
        .map_or((String::new(), 0), |b| (b.item.model.clone(), b.quantity));
    vec![
        rank.to_string(),
        c.panels.item.model.clone(),
        c.panels.item.module_type.to_string(),
        c.panels.quantity.to_string(),
        c.inverters.item.model.clone(),
        c.inverters.item.inverter_type.to_string(),
        c.inverters.quantity.to_string(),
        battery_model,
        battery_count.to_string(),
        format!("{:.3}", v.system_specs.dc_capacity_kw),
        format!("{:.1}", v.energy_analysis.annual_production),
        format!("{:.2}", v.energy_analysis.offset_percentage),
        format!("{:.2}", v.cost.total),
        format!("{:.2}", v.cost.net),
        format!("{:.2}", v.score.overall),
        format!("{:.2}", v.score.cost),
        format!("{:.2}", v.score.performance),
        format!("{:.2}", v.score.aesthetics),
        format!("{:.2}", v.score.reliability),
    ]
}
