//! Plane-of-array transposition with an isotropic sky.

use crate::sim::geometry::{SunPosition, cos_incidence};
use crate::sim::types::TrackingType;
use crate::weather::WeatherMonth;

/// Irradiation components on the array plane (kWh/m²/day).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoaComponents {
    pub beam: f64,
    pub diffuse: f64,
    pub ground: f64,
}

impl PoaComponents {
    /// Total plane-of-array irradiation, floored at 0.
    pub fn total(&self) -> f64 {
        (self.beam + self.diffuse + self.ground).max(0.0)
    }
}

/// Array orientation actually presented to the sun after tracking.
///
/// Returns `(tilt, azimuth, cos_incidence)`.
fn effective_orientation(
    sun: &SunPosition,
    tilt: f64,
    azimuth: f64,
    tracking: TrackingType,
) -> (f64, f64, f64) {
    match tracking {
        TrackingType::Fixed => (
            tilt,
            azimuth,
            cos_incidence(sun.elevation, sun.azimuth, tilt, azimuth),
        ),
        TrackingType::SingleAxis => (
            tilt,
            sun.azimuth,
            cos_incidence(sun.elevation, sun.azimuth, tilt, sun.azimuth),
        ),
        TrackingType::DualAxis => (sun.zenith(), sun.azimuth, 1.0),
    }
}

/// Transposes one month of horizontal irradiation onto the array plane.
///
/// * Beam: `DNI * max(0, cos θ)`
/// * Diffuse: `DHI * (1 + cos β) / 2`
/// * Ground-reflected: `GHI * albedo * (1 - cos β) / 2`
pub fn plane_of_array(
    weather: &WeatherMonth,
    sun: &SunPosition,
    tilt: f64,
    azimuth: f64,
    tracking: TrackingType,
    albedo: f64,
) -> PoaComponents {
    let (eff_tilt, _, cos_theta) = effective_orientation(sun, tilt, azimuth, tracking);
    let cos_tilt = eff_tilt.to_radians().cos();

    // No beam once the sun is below the horizon.
    let beam = if sun.elevation > 0.0 {
        weather.dni * cos_theta.max(0.0)
    } else {
        0.0
    };

    PoaComponents {
        beam,
        diffuse: weather.dhi * (1.0 + cos_tilt) / 2.0,
        ground: weather.ghi * albedo * (1.0 - cos_tilt) / 2.0,
    }
}
