//! End-to-end tests of the `solar-design` binary.

mod common;

use std::process::{Command, Output};

use common::data_path;

fn solar_design(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-design"))
        .args(args)
        .env("RUST_LOG", "off")
        .output();
    let Ok(output) = output else {
        panic!("binary should start");
    };
    output
}

fn path_arg(name: &str) -> String {
    data_path(name).display().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn simulate_prints_json() {
    let system = path_arg("system.toml");
    let weather = path_arg("weather_sf.csv");
    let out = solar_design(&[
        "simulate", "--system", &system, "--weather", &weather, "--json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let Ok(json) = serde_json::from_str::<serde_json::Value>(&stdout(&out)) else {
        panic!("stdout should be JSON");
    };
    let annual = json["annual_production"].as_f64().unwrap_or_default();
    assert!((12_000.0..=20_000.0).contains(&annual), "annual {annual}");
    assert_eq!(json["monthly"].as_array().map(Vec::len), Some(12));
    assert!(json["financial"].is_null());
}

#[test]
fn simulate_with_financial_flag_and_config() {
    let system = path_arg("system.toml");
    let config = path_arg("engine.toml");
    let out = solar_design(&[
        "--config", &config, "simulate", "--system", &system, "--financial", "--json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let Ok(json) = serde_json::from_str::<serde_json::Value>(&stdout(&out)) else {
        panic!("stdout should be JSON");
    };
    let annual = json["annual_production"].as_f64().unwrap_or_default();
    let savings = json["financial"]["annual_savings"].as_f64().unwrap_or_default();
    assert!((savings - annual * 0.28).abs() < 1e-6);
}

#[test]
fn simulate_text_report_and_csv() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        panic!("temp dir");
    };
    let csv_path = dir.path().join("monthly.csv");
    let system = path_arg("system.toml");
    let csv_arg = csv_path.display().to_string();
    let out = solar_design(&["simulate", "--system", &system, "--csv", &csv_arg]);
    assert!(out.status.success());
    assert!(!stdout(&out).is_empty());

    let contents = std::fs::read_to_string(&csv_path).unwrap_or_default();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("month,days,production_kwh,poa_kwh_m2_day,ambient_c,cell_c,temperature_derate,peak_sun_hours")
    );
    assert_eq!(lines.count(), 12);
}

#[test]
fn design_writes_ranked_variants() {
    let Some(dir) = tempfile::tempdir().ok() else {
        panic!("temp dir");
    };
    let csv_path = dir.path().join("variants.csv");
    let request = path_arg("request.toml");
    let weather = path_arg("weather_sf.csv");
    let csv_arg = csv_path.display().to_string();
    let out = solar_design(&[
        "design", "--request", &request, "--weather", &weather, "--csv", &csv_arg,
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let contents = std::fs::read_to_string(&csv_path).unwrap_or_default();
    let mut lines = contents.lines();
    assert!(lines.next().is_some_and(|h| h.starts_with("rank,panel_model,")));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("1,"));
}

#[test]
fn design_json_uses_bundled_catalog() {
    let request = path_arg("request.toml");
    let catalog = path_arg("catalog");
    let out = solar_design(&[
        "design", "--request", &request, "--catalog", &catalog, "--json",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let Ok(json) = serde_json::from_str::<serde_json::Value>(&stdout(&out)) else {
        panic!("stdout should be JSON");
    };
    let model = json["design"]["components"]["panels"]["item"]["model"]
        .as_str()
        .unwrap_or_default();
    assert!(["NS-400M", "BW-370M", "TL-345P"].contains(&model), "{model}");
    assert!(json["layout"].is_object());
    assert!(json["financing"].is_object());
}

#[test]
fn catalog_lists_builtin_equipment() {
    let out = solar_design(&["catalog"]);
    assert!(out.status.success());
    let text = stdout(&out);
    for needle in ["=== Panels ===", "=== Inverters ===", "=== Batteries ===", "NS-400M", "OP-6000"] {
        assert!(text.contains(needle), "missing {needle}");
    }
    assert!(text.contains("out of stock"));
}

#[test]
fn missing_system_file_fails() {
    let out = solar_design(&["simulate", "--system", "does-not-exist.toml"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("error:"));
}

#[test]
fn invalid_system_is_reported() {
    let Some(dir) = tempfile::tempdir().ok() else {
        panic!("temp dir");
    };
    let path = dir.path().join("bad.toml");
    let system = std::fs::read_to_string(data_path("system.toml")).unwrap_or_default();
    let written = std::fs::write(&path, system.replace("latitude = 37.7749", "latitude = 95.0"));
    assert!(written.is_ok());
    let arg = path.display().to_string();
    let out = solar_design(&["simulate", "--system", &arg]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid latitude"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let out = solar_design(&[]);
    assert!(!out.status.success());
}
