//! Solar-noon geometry for a representative day of each month.
//!
//! All angles at the public boundary are in degrees.

/// Days per month in a non-leap year.
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Solar azimuth assumed at solar noon (degrees, due south).
pub const NOON_SOLAR_AZIMUTH: f64 = 180.0;

/// Day-of-month used as the representative day.
const REPRESENTATIVE_DAY: u32 = 15;

/// Number of days in `month` (1-based). Months outside 1..=12 return 0.
pub fn days_in_month(month: u32) -> u32 {
    month
        .checked_sub(1)
        .and_then(|i| DAYS_IN_MONTH.get(i as usize))
        .copied()
        .unwrap_or(0)
}

/// Day of year (1-based) of the representative day of `month`.
pub fn representative_day_of_year(month: u32) -> u32 {
    let before: u32 = DAYS_IN_MONTH
        .iter()
        .take(month.saturating_sub(1) as usize)
        .sum();
    before + REPRESENTATIVE_DAY
}

/// Solar declination (degrees) from a sinusoidal fit over the year.
pub fn declination_deg(day_of_year: u32) -> f64 {
    let n = f64::from(day_of_year);
    23.45 * (360.0 / 365.0 * (284.0 + n)).to_radians().sin()
}

/// Solar elevation at noon (degrees), floored at 0.
pub fn noon_elevation_deg(latitude: f64, declination: f64) -> f64 {
    (90.0 - (latitude - declination).abs()).max(0.0)
}

/// Hours between sunrise and sunset.
///
/// Polar day and polar night saturate at 24 and 0.
pub fn daylight_hours(latitude: f64, declination: f64) -> f64 {
    let x = -latitude.to_radians().tan() * declination.to_radians().tan();
    let sunset_hour_angle = x.clamp(-1.0, 1.0).acos().to_degrees();
    2.0 * sunset_hour_angle / 15.0
}

/// Cosine of the angle between the beam and the array normal.
///
/// Spherical law of cosines on sun elevation/azimuth versus array
/// tilt/azimuth. Negative values mean the sun is behind the array.
pub fn cos_incidence(
    sun_elevation: f64,
    sun_azimuth: f64,
    panel_tilt: f64,
    panel_azimuth: f64,
) -> f64 {
    let el = sun_elevation.to_radians();
    let tilt = panel_tilt.to_radians();
    let daz = (sun_azimuth - panel_azimuth).to_radians();
    el.sin() * tilt.cos() + el.cos() * tilt.sin() * daz.cos()
}

/// Noon sun position for the representative day of `month`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub declination: f64,
    pub elevation: f64,
    pub azimuth: f64,
    pub daylight_hours: f64,
}

impl SunPosition {
    pub fn at_noon(latitude: f64, month: u32) -> Self {
        let declination = declination_deg(representative_day_of_year(month));
        Self {
            declination,
            elevation: noon_elevation_deg(latitude, declination),
            azimuth: NOON_SOLAR_AZIMUTH,
            daylight_hours: daylight_hours(latitude, declination),
        }
    }

    /// Zenith angle (degrees).
    pub fn zenith(&self) -> f64 {
        90.0 - self.elevation
    }
}
