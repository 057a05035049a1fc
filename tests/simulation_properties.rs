//! Integration tests for production simulation properties.

mod common;

use solar_design_engine::sim::types::{
    InverterType, Location, ModuleType, SystemSpecification, TrackingType,
};
use solar_design_engine::sim::{FinancialOptions, ProductionSimulator};
use solar_design_engine::weather::WeatherMonth;

use common::{SF_LATITUDE, annual_sf, sf_location, sf_spec, sf_weather, simulate_sf};

#[test]
fn monthly_production_sums_to_annual() {
    let Ok(r) = simulate_sf(&sf_spec()) else {
        panic!("simulation should succeed");
    };
    let sum: f64 = r.monthly.iter().map(|m| m.production_kwh).sum();
    assert!((sum - r.annual_production).abs() < 1.0);
    assert_eq!(r.monthly.len(), 12);
    let months: Vec<u32> = r.monthly.iter().map(|m| m.month).collect();
    assert_eq!(months, (1..=12).collect::<Vec<_>>());
}

#[test]
fn capacity_factor_and_ratio_bounded_across_sites() {
    for latitude in [0.0, 20.0, SF_LATITUDE, 52.0, -33.9] {
        let location = Location::new(latitude, 10.0);
        let spec = SystemSpecification {
            tilt: latitude.abs(),
            ..sf_spec()
        };
        let weather = common::synthetic_weather(latitude);
        let r = ProductionSimulator::default().simulate(&location, &spec, &weather, None);
        let Ok(r) = r else {
            panic!("simulation at latitude {latitude} should succeed");
        };
        assert!(
            r.capacity_factor > 0.0 && r.capacity_factor < 100.0,
            "capacity factor {} at latitude {latitude}",
            r.capacity_factor
        );
        assert!(r.performance_ratio > 0.0, "PR at latitude {latitude}");
        assert!(r.co2_savings > 0.0);
    }
}

fn clear_year(ghi: f64, dni: f64, dhi: f64, temperature: f64) -> Vec<WeatherMonth> {
    (1..=12)
        .map(|month| WeatherMonth {
            month,
            ghi,
            dni,
            dhi,
            temperature,
            wind_speed: 0.0,
            relative_humidity: 20.0,
        })
        .collect()
}

#[test]
fn capacity_factor_bounded_at_extreme_inputs() {
    let years = [
        clear_year(12.0, 12.0, 1.0, -40.0),
        clear_year(11.0, 11.0, 1.0, 0.0),
        clear_year(8.0, 8.0, 1.0, 0.0),
        clear_year(12.0, 30.0, 12.0, -40.0),
    ];
    let trackers = [
        TrackingType::Fixed,
        TrackingType::SingleAxis,
        TrackingType::DualAxis,
    ];
    let modules = [
        ModuleType::Monocrystalline,
        ModuleType::Polycrystalline,
        ModuleType::ThinFilm,
    ];
    for latitude in [0.0, 23.0, 45.0, -60.0, 75.0, 89.0] {
        let location = Location::new(latitude, 0.0);
        for weather in &years {
            for tracking_type in trackers {
                for module_type in modules {
                    let spec = SystemSpecification {
                        dc_capacity_kw: 10.0,
                        module_efficiency: 50.0,
                        inverter_efficiency: 100.0,
                        system_losses: 0.0,
                        tilt: latitude.abs(),
                        azimuth: 180.0,
                        module_type,
                        tracking_type,
                        inverter_type: InverterType::Micro,
                    };
                    let r = ProductionSimulator::default().simulate(&location, &spec, weather, None);
                    let Ok(r) = r else {
                        panic!("valid inputs at latitude {latitude} should simulate");
                    };
                    assert!(
                        r.capacity_factor > 0.0 && r.capacity_factor < 100.0,
                        "capacity factor {} at latitude {latitude}, {tracking_type:?}",
                        r.capacity_factor
                    );
                    assert!(r.performance_ratio > 0.0);
                }
            }
        }
    }
}

#[test]
fn high_efficiency_tracker_ratio_stays_physical() {
    let spec = SystemSpecification {
        module_efficiency: 50.0,
        inverter_efficiency: 99.0,
        system_losses: 0.0,
        tilt: 0.0,
        tracking_type: TrackingType::DualAxis,
        ..sf_spec()
    };
    let r = ProductionSimulator::default().simulate(
        &Location::new(0.0, 0.0),
        &spec,
        &clear_year(11.0, 11.0, 1.0, 0.0),
        None,
    );
    let Ok(r) = r else {
        panic!("simulation should succeed");
    };
    assert!(r.capacity_factor < 50.0, "capacity factor {}", r.capacity_factor);
    assert!(r.performance_ratio <= 1.2, "PR {}", r.performance_ratio);
}

#[test]
fn san_francisco_example_in_expected_ranges() {
    let Ok(r) = simulate_sf(&sf_spec()) else {
        panic!("simulation should succeed");
    };
    assert!(
        (10_000.0..=16_000.0).contains(&r.annual_production),
        "annual production {}",
        r.annual_production
    );
    assert!((10.0..=35.0).contains(&r.capacity_factor));
    assert!((800.0..=2_500.0).contains(&r.specific_yield));
    assert!((r.peak_sun_hours - 5.0).abs() < 0.05);
    assert!((r.co2_savings - r.annual_production * 0.4).abs() < 1e-6);
}

#[test]
fn higher_module_efficiency_produces_more() {
    let yields: Vec<f64> = [15.0, 18.0, 21.0, 24.0]
        .into_iter()
        .map(|eff| {
            annual_sf(&SystemSpecification {
                module_efficiency: eff,
                ..sf_spec()
            })
        })
        .collect();
    assert!(yields.windows(2).all(|w| w[1] > w[0]), "{yields:?}");
}

#[test]
fn hotter_climate_produces_less() {
    let base = sf_weather();
    let yields: Vec<f64> = [0.0, 5.0, 10.0, 15.0]
        .into_iter()
        .map(|delta| {
            let warmer: Vec<WeatherMonth> = base
                .iter()
                .map(|m| WeatherMonth {
                    temperature: m.temperature + delta,
                    ..m.clone()
                })
                .collect();
            ProductionSimulator::default()
                .simulate(&sf_location(), &sf_spec(), &warmer, None)
                .map(|r| r.annual_production)
                .unwrap_or_default()
        })
        .collect();
    assert!(yields[0] > 0.0);
    assert!(yields.windows(2).all(|w| w[1] < w[0]), "{yields:?}");
}

#[test]
fn more_losses_produce_less() {
    let yields: Vec<f64> = [0.0, 5.0, 14.0, 25.0]
        .into_iter()
        .map(|losses| {
            annual_sf(&SystemSpecification {
                system_losses: losses,
                ..sf_spec()
            })
        })
        .collect();
    assert!(yields.windows(2).all(|w| w[1] < w[0]), "{yields:?}");
}

#[test]
fn latitude_tilt_facing_south_is_best() {
    let optimal = annual_sf(&SystemSpecification {
        tilt: SF_LATITUDE,
        azimuth: 180.0,
        ..sf_spec()
    });
    let others = [
        (0.0, 180.0),
        (20.0, 180.0),
        (30.0, 180.0),
        (45.0, 180.0),
        (60.0, 180.0),
        (90.0, 180.0),
        (SF_LATITUDE, 90.0),
        (SF_LATITUDE, 270.0),
        (SF_LATITUDE, 0.0),
        (30.0, 135.0),
    ];
    for (tilt, azimuth) in others {
        let other = annual_sf(&SystemSpecification {
            tilt,
            azimuth,
            ..sf_spec()
        });
        assert!(
            optimal >= other,
            "tilt {tilt} / azimuth {azimuth}: {other} beats optimal {optimal}"
        );
    }
}

#[test]
fn tracking_never_loses_to_fixed() {
    let east = SystemSpecification {
        azimuth: 90.0,
        ..sf_spec()
    };
    let fixed_east = annual_sf(&east);
    let single = annual_sf(&SystemSpecification {
        tracking_type: TrackingType::SingleAxis,
        ..east.clone()
    });
    let dual = annual_sf(&SystemSpecification {
        tracking_type: TrackingType::DualAxis,
        ..east
    });
    let fixed_south = annual_sf(&sf_spec());

    assert!(single > fixed_east);
    // Azimuth tracking recovers the south-facing yield at the same tilt.
    assert!((single - fixed_south).abs() < 1e-6);
    assert!(dual > single);
}

#[test]
fn financial_analysis_with_overrides() {
    let opts = FinancialOptions {
        electricity_rate: 0.30,
        federal_tax_credit: 26.0,
        state_incentive: 4.0,
        system_lifetime: 20,
        ..FinancialOptions::default()
    };
    let r = ProductionSimulator::default().simulate(
        &sf_location(),
        &sf_spec(),
        &sf_weather(),
        Some(&opts),
    );
    let Some(fin) = r.ok().and_then(|r| r.financial) else {
        panic!("financial block expected");
    };
    assert!((fin.system_cost - 30_000.0).abs() < 1e-6);
    assert!((fin.incentives - 9_000.0).abs() < 1e-6);
    assert!((fin.net_cost - 21_000.0).abs() < 1e-6);
    assert!(fin.payback_years.is_some_and(|y| y > 0.0 && y < 20.0));
    assert!(fin.npv > 0.0);
    assert!(fin.total_lifetime_savings > fin.annual_savings * 20.0);
}

#[test]
fn rejects_invalid_latitude() {
    let bad = Location::new(95.0, 0.0);
    let err = ProductionSimulator::default()
        .simulate(&bad, &sf_spec(), &sf_weather(), None)
        .unwrap_err();
    assert!(err.message.contains("Invalid latitude"), "{}", err.message);
}

#[test]
fn rejects_invalid_longitude() {
    let bad = Location::new(10.0, 185.0);
    let err = ProductionSimulator::default()
        .simulate(&bad, &sf_spec(), &sf_weather(), None)
        .unwrap_err();
    assert!(err.message.contains("Invalid longitude"), "{}", err.message);
}

#[test]
fn rejects_zero_capacity() {
    let err = simulate_sf(&SystemSpecification {
        dc_capacity_kw: 0.0,
        ..sf_spec()
    })
    .unwrap_err();
    assert!(err.message.contains("DC capacity must be greater than 0"));
}

#[test]
fn rejects_module_efficiency_above_fifty() {
    let err = simulate_sf(&SystemSpecification {
        module_efficiency: 55.0,
        ..sf_spec()
    })
    .unwrap_err();
    assert!(
        err.message
            .contains("Module efficiency must be between 0 and 50%")
    );
}

#[test]
fn rejects_incomplete_weather() {
    let weather = sf_weather();
    let err = ProductionSimulator::default()
        .simulate(&sf_location(), &sf_spec(), &weather[..11], None)
        .unwrap_err();
    assert_eq!(err.field, "weather");
}

#[test]
fn rejects_misordered_weather() {
    let mut weather = sf_weather();
    weather.swap(2, 3);
    let err = ProductionSimulator::default()
        .simulate(&sf_location(), &sf_spec(), &weather, None)
        .unwrap_err();
    assert_eq!(err.field, "weather[2].month");
}

#[test]
fn rejects_negative_ghi() {
    let mut weather = sf_weather();
    weather[6].ghi = -0.5;
    let err = ProductionSimulator::default()
        .simulate(&sf_location(), &sf_spec(), &weather, None)
        .unwrap_err();
    assert_eq!(err.field, "weather[6].ghi");
}
