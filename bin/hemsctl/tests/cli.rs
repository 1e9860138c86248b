//! ---
//! hems_section: "05-operator-interfaces"
//! hems_subsection: "binary"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Operator CLI for inspecting and simulating the household dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

fn hemsctl(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hemsctl").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("HEMS_CONFIG")
        .env("HEMS_LOG", "warn");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn version_flag_prints_package_version() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(hemsctl(&dir).arg("-V"));
    assert_eq!(out.trim(), format!("hemsctl {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn summary_reports_sample_household() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(hemsctl(&dir).arg("summary"));
    assert!(out.contains("1813W"));
    assert!(out.contains("R$ 401.70"));
    assert!(out.contains("4/6"));
    assert!(out.contains("Alerts:           4"));
}

#[test]
fn summary_shows_phantom_share_of_bill() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(hemsctl(&dir).arg("summary"));
    assert!(out.contains("Phantom load:     R$ 10.76 (2.7% of bill)"));
}

#[test]
fn free_tariff_reports_zero_shares() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("free.toml");
    fs::write(&config, "[pricing]\ncost_per_unit = 0.0\n").unwrap();
    let out = stdout_of(hemsctl(&dir).args(["--config", config.to_str().unwrap(), "costs"]));
    assert!(out.contains("Phantom load: R$ 0.00 (0.0% of bill)"));
    assert!(out.contains("R$ 0.00/day"));
    assert!(!out.contains("NaN"));
}

#[test]
fn refresh_notifies_new_phantom_loads() {
    let dir = tempfile::tempdir().unwrap();
    let devices = dir.path().join("casa.json");
    fs::write(
        &devices,
        r#"[{"id":"1","name":"Console","type":"Entretenimento","location":"Sala de Estar",
            "status":"standby","currentPower":10,"averagePower":10,
            "dailyConsumption":0.24,"monthlyConsumption":7.2}]"#,
    )
    .unwrap();
    let out = stdout_of(hemsctl(&dir).args([
        "--devices",
        devices.to_str().unwrap(),
        "refresh",
        "--seed",
        "3",
    ]));
    assert!(out.contains("[warning] Phantom load: Console draws power on standby"));
}

#[test]
fn devices_search_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(hemsctl(&dir).args(["devices", "--search", "tV"]));
    assert!(out.contains("Smart TV Samsung"));
    assert_eq!(out.lines().count(), 1);

    let out = stdout_of(hemsctl(&dir).args(["devices", "--location", "Garagem"]));
    assert_eq!(out.trim(), "No devices match.");
}

#[test]
fn costs_are_ordered_by_consumption() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(hemsctl(&dir).arg("costs"));
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("Ar Condicionado"));
    assert!(first.contains("R$ 5.72/day"));
    assert!(out.trim_end().ends_with("R$ 401.70"));
}

#[test]
fn add_reports_phantom_load() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(hemsctl(&dir).args([
        "add",
        "--name",
        "Roteador",
        "--type",
        "Eletrônicos",
        "--location",
        "Escritório",
        "--current-power",
        "10",
        "--average-power",
        "10",
        "--status",
        "standby",
    ]));
    assert!(out.contains("Added device 7: Roteador"));
    assert!(out.contains("0.2 kWh"));
    assert!(out.contains("[warning] Phantom load"));
    assert!(out.contains("[success] Device added"));
}

#[test]
fn add_with_missing_fields_fails() {
    let dir = tempfile::tempdir().unwrap();
    let assert = hemsctl(&dir)
        .args(["add", "--name", " ", "--type", "Outros", "--location", ""])
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("missing required fields: name, location"));
}

#[test]
fn refresh_is_reproducible_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let run = |dir: &TempDir| stdout_of(hemsctl(dir).args(["refresh", "--ticks", "3", "--seed", "17"]));
    assert_eq!(run(&dir), run(&dir));
}

#[test]
fn export_writes_report_and_honours_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[pricing]\ncost_per_unit = 1.0\n").unwrap();
    let out = stdout_of(hemsctl(&dir).args([
        "--config",
        config.to_str().unwrap(),
        "export",
        "--out",
        "out",
    ]));
    assert!(out.contains("dashboard_metrics.json"));
    let raw = fs::read_to_string(dir.path().join("out/dashboard_metrics.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(report["cost_per_unit"], 1.0);
    assert_eq!(report["data"]["estimated_monthly_cost"], 618.0);
}

#[test]
fn devices_file_replaces_sample_household() {
    let dir = tempfile::tempdir().unwrap();
    let devices = dir.path().join("devices.json");
    fs::write(
        &devices,
        r#"[{"id":"1","name":"Freezer","type":"Eletrodoméstico","location":"Cozinha",
            "status":"online","currentPower":100,"averagePower":100,
            "dailyConsumption":2.4,"monthlyConsumption":72}]"#,
    )
    .unwrap();
    let out = stdout_of(hemsctl(&dir).args([
        "--devices",
        devices.to_str().unwrap(),
        "summary",
    ]));
    assert!(out.contains("100W"));
    assert!(out.contains("1/1"));
}
