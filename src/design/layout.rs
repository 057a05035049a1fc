//! Rectangular roof packing of the selected panels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::equipment::Panel;

use super::requirements::RoofConstraints;

/// Grid placement of the array on the roof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofLayout {
    pub rows: u32,
    pub panels_per_row: u32,
    pub total_panels: u32,
    /// Width of the widest row (m).
    pub array_width_m: f64,
    /// Extent from the first to the last row (m).
    pub array_depth_m: f64,
    /// Module area covered by the array (m²).
    pub panel_area_m2: f64,
    pub roof_area_m2: f64,
    /// Module area over roof area (%).
    pub utilization: f64,
    pub row_spacing_m: f64,
    pub panel_spacing_m: f64,
    pub tilt: f64,
    pub azimuth: f64,
    /// Whether the grid stays inside the roof rectangle.
    pub fits: bool,
}

impl RoofLayout {
    /// Packs `count` panels in portrait rows across the roof width.
    ///
    /// Roof width defaults to the side of a square with the roof's area.
    /// Rows are filled left to right; the last row may be partial.
    pub fn plan(
        panel: &Panel,
        count: u32,
        roof: &RoofConstraints,
        tilt: f64,
        azimuth: f64,
        row_spacing_m: f64,
        panel_spacing_m: f64,
    ) -> Self {
        let roof_width = roof
            .roof_width_m
            .unwrap_or_else(|| roof.available_area_m2.sqrt());
        let roof_depth = roof.available_area_m2 / roof_width;

        let pitch = panel.width_m + panel_spacing_m;
        let per_row = (((roof_width + panel_spacing_m) / pitch).floor() as u32).max(1);
        let rows = count.div_ceil(per_row).max(1);
        let in_first_row = count.min(per_row);

        let array_width = f64::from(in_first_row) * panel.width_m
            + f64::from(in_first_row.saturating_sub(1)) * panel_spacing_m;
        let array_depth =
            f64::from(rows) * panel.length_m + f64::from(rows - 1) * row_spacing_m;
        let panel_area = f64::from(count) * panel.area_m2();

        Self {
            rows,
            panels_per_row: per_row,
            total_panels: count,
            array_width_m: array_width,
            array_depth_m: array_depth,
            panel_area_m2: panel_area,
            roof_area_m2: roof.available_area_m2,
            utilization: panel_area / roof.available_area_m2 * 100.0,
            row_spacing_m,
            panel_spacing_m,
            tilt,
            azimuth,
            fits: array_width <= roof_width + 1e-9 && array_depth <= roof_depth + 1e-9,
        }
    }
}

impl fmt::Display for RoofLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  Grid:           {} rows x {} panels ({} total)",
            self.rows, self.panels_per_row, self.total_panels
        )?;
        writeln!(
            f,
            "  Footprint:      {:.2} m x {:.2} m",
            self.array_width_m, self.array_depth_m
        )?;
        writeln!(
            f,
            "  Utilization:    {:.1}% of {:.1} m²",
            self.utilization, self.roof_area_m2
        )?;
        write!(
            f,
            "  Fits roof:      {}",
            if self.fits { "yes" } else { "no" }
        )
    }
}
