//! NOCT cell-temperature model and linear temperature derating.

use crate::sim::types::ModuleType;

/// Irradiance at which NOCT is specified (W/m²).
const NOCT_IRRADIANCE: f64 = 800.0;
/// Ambient temperature at which NOCT is specified (°C).
const NOCT_AMBIENT: f64 = 20.0;
/// Wind speed at which NOCT is specified (m/s).
const NOCT_WIND: f64 = 1.0;
/// Standard test condition cell temperature (°C).
pub const STC_TEMPERATURE: f64 = 25.0;

/// Lower bound of the wind correction divisor.
const MIN_WIND_FACTOR: f64 = 0.1;

/// Divisor applied to the NOCT heating term; grows with wind speed.
pub fn wind_factor(wind_speed: f64) -> f64 {
    (1.0 + 0.1 * (wind_speed - NOCT_WIND)).max(MIN_WIND_FACTOR)
}

/// Estimated cell temperature (°C).
///
/// # Arguments
///
/// * `ambient` - Ambient air temperature (°C)
/// * `irradiance_w_m2` - Mean daytime plane-of-array irradiance (W/m²)
/// * `wind_speed` - Wind speed (m/s)
/// * `noct` - Nominal operating cell temperature of the module (°C)
pub fn cell_temperature(ambient: f64, irradiance_w_m2: f64, wind_speed: f64, noct: f64) -> f64 {
    let heating = irradiance_w_m2 / NOCT_IRRADIANCE * (noct - NOCT_AMBIENT);
    ambient + heating / wind_factor(wind_speed)
}

/// Mean daytime irradiance (W/m²) from a daily irradiation (kWh/m²/day).
///
/// Daylight shorter than one hour is treated as one hour.
pub fn mean_daytime_irradiance(poa_kwh_m2_day: f64, daylight_hours: f64) -> f64 {
    poa_kwh_m2_day * 1000.0 / daylight_hours.max(1.0)
}

/// Output multiplier relative to 25 °C, floored at `min_derate`.
pub fn temperature_derate(module: ModuleType, cell_temp: f64, min_derate: f64) -> f64 {
    (1.0 + module.temperature_coefficient() * (cell_temp - STC_TEMPERATURE)).max(min_derate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noct_conditions_reproduce_noct() {
        let t = cell_temperature(20.0, 800.0, 1.0, 45.0);
        assert!((t - 45.0).abs() < 1e-12);
    }

    #[test]
    fn wind_cools_the_cell() {
        let calm = cell_temperature(25.0, 600.0, 0.0, 45.0);
        let windy = cell_temperature(25.0, 600.0, 6.0, 45.0);
        assert!(windy < calm);
    }

    #[test]
    fn wind_factor_never_below_floor() {
        assert_eq!(wind_factor(-50.0), 0.1);
        assert!((wind_factor(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn derate_is_unity_at_stc() {
        for m in ModuleType::ALL {
            assert!((temperature_derate(m, 25.0, 0.5) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn thin_film_derates_least() {
        let mono = temperature_derate(ModuleType::Monocrystalline, 55.0, 0.5);
        let poly = temperature_derate(ModuleType::Polycrystalline, 55.0, 0.5);
        let thin = temperature_derate(ModuleType::ThinFilm, 55.0, 0.5);
        assert!((mono - 0.88).abs() < 1e-12);
        assert!(poly < mono && mono < thin);
    }

    #[test]
    fn derate_floor_holds() {
        assert_eq!(temperature_derate(ModuleType::Polycrystalline, 400.0, 0.5), 0.5);
    }

    #[test]
    fn daytime_irradiance_guarded_against_polar_night() {
        assert_eq!(mean_daytime_irradiance(0.5, 0.0), 500.0);
        assert!((mean_daytime_irradiance(6.0, 12.0) - 500.0).abs() < 1e-12);
    }
}
