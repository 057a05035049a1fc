//! Typical-year monthly weather records and the providers that supply them.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::sim::geometry::SunPosition;
use crate::sim::types::Location;

/// Upper bound accepted for daily GHI (kWh/m²/day).
pub const MAX_GHI: f64 = 12.0;

/// Long-term average conditions for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMonth {
    /// Calendar month (1 to 12).
    pub month: u32,
    /// Global horizontal irradiation (kWh/m²/day, 0 to 12).
    pub ghi: f64,
    /// Direct normal irradiation (kWh/m²/day, >= 0).
    pub dni: f64,
    /// Diffuse horizontal irradiation (kWh/m²/day, >= 0).
    pub dhi: f64,
    /// Mean ambient temperature (°C).
    pub temperature: f64,
    /// Mean wind speed (m/s, >= 0).
    pub wind_speed: f64,
    /// Mean relative humidity (%, 0 to 100).
    pub relative_humidity: f64,
}

/// Checks that `months` is a complete, ordered, in-range year.
///
/// # Errors
///
/// Returns the first violation found; the set is accepted or rejected as a
/// whole.
pub fn validate_weather(months: &[WeatherMonth]) -> Result<(), ValidationError> {
    if months.len() != 12 {
        return Err(ValidationError::new(
            "weather",
            format!("Weather data must contain exactly 12 months, got {}", months.len()),
        ));
    }

    for (i, m) in months.iter().enumerate() {
        let expected = i as u32 + 1;
        let field = |name: &str| format!("weather[{i}].{name}");

        if m.month != expected {
            return Err(ValidationError::new(
                field("month"),
                format!(
                    "Weather months must be ordered 1-12: position {expected} holds month {}",
                    m.month
                ),
            ));
        }
        let values = [
            m.ghi,
            m.dni,
            m.dhi,
            m.temperature,
            m.wind_speed,
            m.relative_humidity,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::new(
                field("values"),
                format!("Weather values for month {expected} must be finite"),
            ));
        }
        if !(0.0..=MAX_GHI).contains(&m.ghi) {
            return Err(ValidationError::new(
                field("ghi"),
                format!(
                    "Invalid GHI for month {expected}: {} (must be between 0 and {MAX_GHI} kWh/m²/day)",
                    m.ghi
                ),
            ));
        }
        if m.dni < 0.0 {
            return Err(ValidationError::new(
                field("dni"),
                format!("Invalid DNI for month {expected}: {} (must be >= 0)", m.dni),
            ));
        }
        if m.dhi < 0.0 {
            return Err(ValidationError::new(
                field("dhi"),
                format!("Invalid DHI for month {expected}: {} (must be >= 0)", m.dhi),
            ));
        }
        if m.wind_speed < 0.0 {
            return Err(ValidationError::new(
                field("wind_speed"),
                format!(
                    "Invalid wind speed for month {expected}: {} (must be >= 0)",
                    m.wind_speed
                ),
            ));
        }
        if !(0.0..=100.0).contains(&m.relative_humidity) {
            return Err(ValidationError::new(
                field("relative_humidity"),
                format!(
                    "Invalid relative humidity for month {expected}: {} (must be between 0 and 100%)",
                    m.relative_humidity
                ),
            ));
        }
    }
    Ok(())
}

/// Failure to obtain weather from a provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("cannot read weather file \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid weather CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Source of a typical year of monthly weather for a site.
pub trait WeatherProvider {
    /// Returns 12 monthly records ordered January to December.
    fn monthly_weather(&self, location: &Location) -> Result<Vec<WeatherMonth>, WeatherError>;
}

/// Deterministic synthetic climate for demos and tests.
///
/// GHI follows a cosine over the year centred on `mean_ghi` with peak
/// amplitude `amplitude`, peaking in local summer. The beam/diffuse split
/// reproduces the GHI on a horizontal surface at solar noon. Optional
/// Gaussian noise perturbs each month.
#[derive(Debug, Clone)]
pub struct SyntheticWeather {
    /// Annual mean GHI (kWh/m²/day).
    pub mean_ghi: f64,
    /// Seasonal swing of GHI (kWh/m²/day).
    pub amplitude: f64,
    /// Diffuse share of GHI (0 to 1).
    pub diffuse_fraction: f64,
    /// Annual mean temperature (°C).
    pub mean_temperature: f64,
    /// Seasonal swing of temperature (°C).
    pub temperature_amplitude: f64,
    pub wind_speed: f64,
    pub relative_humidity: f64,
    /// Relative standard deviation of the monthly GHI noise.
    pub noise_std: f64,
    pub seed: u64,
}

impl Default for SyntheticWeather {
    fn default() -> Self {
        Self {
            mean_ghi: 5.0,
            amplitude: 1.5,
            diffuse_fraction: 0.3,
            mean_temperature: 15.0,
            temperature_amplitude: 7.0,
            wind_speed: 3.0,
            relative_humidity: 70.0,
            noise_std: 0.0,
            seed: 42,
        }
    }
}

impl SyntheticWeather {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Generates the 12-month series for `latitude`.
    pub fn year(&self, latitude: f64) -> Vec<WeatherMonth> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        // Seasons flip south of the equator.
        let hemisphere = if latitude >= 0.0 { -1.0 } else { 1.0 };

        (1..=12u32)
            .map(|month| {
                let phase = (2.0 * std::f64::consts::PI * (f64::from(month) - 0.5) / 12.0).cos();
                let noise = 1.0 + gaussian_noise(&mut rng, self.noise_std);
                let ghi = ((self.mean_ghi + hemisphere * self.amplitude * phase) * noise)
                    .clamp(0.0, MAX_GHI);
                let dhi = ghi * self.diffuse_fraction;

                let sun = SunPosition::at_noon(latitude, month);
                let sin_el = sun.elevation.to_radians().sin().max(0.2);
                let dni = (ghi - dhi) / sin_el;

                WeatherMonth {
                    month,
                    ghi,
                    dni,
                    dhi,
                    temperature: self.mean_temperature
                        + hemisphere * self.temperature_amplitude * phase,
                    wind_speed: self.wind_speed,
                    relative_humidity: self.relative_humidity,
                }
            })
            .collect()
    }
}

impl WeatherProvider for SyntheticWeather {
    fn monthly_weather(&self, location: &Location) -> Result<Vec<WeatherMonth>, WeatherError> {
        Ok(self.year(location.latitude))
    }
}

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * std_dev
}

/// Weather read from a CSV file with one header row and 12 data rows.
///
/// Columns: `month,ghi,dni,dhi,temperature,wind_speed,relative_humidity`.
/// The location is not consulted; the file is assumed to describe the site.
#[derive(Debug, Clone)]
pub struct CsvWeather {
    path: PathBuf,
}

impl CsvWeather {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parses weather months from CSV text in any reader.
///
/// # Errors
///
/// Returns a `WeatherError` on malformed CSV or an invalid month set.
pub fn read_weather_csv(reader: impl Read) -> Result<Vec<WeatherMonth>, WeatherError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let months = rdr
        .deserialize::<WeatherMonth>()
        .collect::<Result<Vec<_>, _>>()?;
    validate_weather(&months)?;
    Ok(months)
}

impl WeatherProvider for CsvWeather {
    fn monthly_weather(&self, _location: &Location) -> Result<Vec<WeatherMonth>, WeatherError> {
        let file = File::open(&self.path).map_err(|source| WeatherError::Io {
            path: self.path.clone(),
            source,
        })?;
        read_weather_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_year() -> Vec<WeatherMonth> {
        SyntheticWeather::default().year(37.7749)
    }

    #[test]
    fn csv_provider_reads_bundled_year() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/weather_sf.csv");
        let year = CsvWeather::new(path).monthly_weather(&Location::new(37.7749, -122.4194));
        let Ok(year) = year else {
            panic!("bundled weather should load");
        };
        assert_eq!(year.len(), 12);
        assert_eq!(year[0].month, 1);
    }

    #[test]
    fn csv_provider_reports_missing_file() {
        let path = PathBuf::from("no-such-weather.csv");
        let err = CsvWeather::new(path.clone()).monthly_weather(&Location::new(0.0, 0.0));
        match err {
            Err(WeatherError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn synthetic_year_is_valid() {
        let year = valid_year();
        assert!(validate_weather(&year).is_ok());
        assert_eq!(year.len(), 12);
    }

    #[test]
    fn synthetic_year_peaks_in_local_summer() {
        let north = SyntheticWeather::default().year(40.0);
        let south = SyntheticWeather::default().year(-33.9);
        assert!(north[6].ghi > north[0].ghi);
        assert!(south[0].ghi > south[6].ghi);
        let mean: f64 = north.iter().map(|m| m.ghi).sum::<f64>() / 12.0;
        assert!((mean - 5.0).abs() < 1e-9);
        assert!(north.iter().all(|m| (3.5..=6.5).contains(&m.ghi)));
    }

    #[test]
    fn synthetic_noise_is_seeded() {
        let a = SyntheticWeather {
            noise_std: 0.1,
            ..SyntheticWeather::with_seed(7)
        };
        let b = a.clone();
        let c = SyntheticWeather {
            seed: 8,
            ..a.clone()
        };
        assert_eq!(a.year(10.0), b.year(10.0));
        assert_ne!(a.year(10.0), c.year(10.0));
    }

    #[test]
    fn rejects_eleven_months() {
        let mut year = valid_year();
        year.pop();
        let err = validate_weather(&year).unwrap_err();
        assert!(err.message.contains("exactly 12 months"));
    }

    #[test]
    fn rejects_misordered_months() {
        let mut year = valid_year();
        year.swap(2, 3);
        let err = validate_weather(&year).unwrap_err();
        assert_eq!(err.field, "weather[2].month");
    }

    #[test]
    fn rejects_negative_ghi() {
        let mut year = valid_year();
        year[4].ghi = -0.1;
        let err = validate_weather(&year).unwrap_err();
        assert_eq!(err.field, "weather[4].ghi");
        assert!(err.message.contains("Invalid GHI"));
    }

    #[test]
    fn rejects_ghi_above_twelve() {
        let mut year = valid_year();
        year[0].ghi = 12.5;
        assert!(validate_weather(&year).is_err());
    }

    #[test]
    fn rejects_bad_humidity_and_nan() {
        let mut year = valid_year();
        year[1].relative_humidity = 120.0;
        assert!(validate_weather(&year).is_err());

        let mut year = valid_year();
        year[1].temperature = f64::NAN;
        assert!(validate_weather(&year).is_err());
    }

    #[test]
    fn csv_round_trip_through_reader() {
        let mut s = String::from("month,ghi,dni,dhi,temperature,wind_speed,relative_humidity\n");
        for m in 1..=12 {
            s.push_str(&format!("{m}, 5.0, 4.0, 1.5, 15.0, 3.0, 65.0\n"));
        }
        let months = read_weather_csv(s.as_bytes());
        assert!(months.is_ok(), "CSV should parse: {:?}", months.err());
        let months = months.ok().unwrap_or_default();
        assert_eq!(months.len(), 12);
        assert_eq!(months[11].month, 12);
    }

    #[test]
    fn csv_with_missing_month_is_invalid() {
        let s = "month,ghi,dni,dhi,temperature,wind_speed,relative_humidity\n1,5,4,1.5,15,3,65\n";
        assert!(matches!(
            read_weather_csv(s.as_bytes()),
            Err(WeatherError::Invalid(_))
        ));
    }
}
