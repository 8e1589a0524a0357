use std::process::Command;

fn sim() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rebalance-sim"));
    cmd.env_remove("REBALANCE_SEED").env_remove("RUST_LOG");
    cmd
}

#[test]
fn sweep_writes_table_and_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("runs.csv");

    let status = sim()
        .current_dir(dir.path())
        .args(["--queues", "6", "--apps", "2..=3", "-n", "3", "--seed", "11", "--aggregate", "-q"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let table = std::fs::read_to_string(&output).unwrap();
    assert!(table.starts_with("Run,Rounds,QueueReleases,Algorithm,Scenario,QueueCount,AppCount"));
    // 2 app counts x 4 algorithms x 2 scenarios x 3 samples
    assert_eq!(table.lines().count(), 1 + 48);

    let agg = std::fs::read_to_string(dir.path().join("agg_Rounds__runs.csv")).unwrap();
    assert_eq!(agg.lines().count(), 1 + 16);
}

#[test]
fn single_run_prints_json() {
    let out = sim()
        .args(["--single", "--queues", "8", "--apps", "3", "--scenarios", "LOSE_ONE_APP", "--seed", "4", "-q"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["balanced"], true);
    assert_eq!(report["seed"], 4);
    assert_eq!(report["final"]["apps"].as_array().unwrap().len(), 2);
}

#[test]
fn percentiles_over_sweep_output() {
    let dir = tempfile::tempdir().unwrap();
    let runs = dir.path().join("runs.csv");
    assert!(sim()
        .args(["--queues", "5", "--apps", "2", "-n", "4", "--seed", "1", "-q", "--algorithms", "SEQ_SUB__ACTIVE_REL"])
        .arg("--output")
        .arg(&runs)
        .status()
        .unwrap()
        .success());

    let out = Command::new(env!("CARGO_BIN_EXE_rebalance-percentiles"))
        .current_dir(dir.path())
        .args(["-g", "Scenario", "-v", "QueueReleases", "-c"])
        .arg(&runs)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Read 8 rows with 7 columns each"));

    let agg = std::fs::read_to_string(dir.path().join("agg_QueueReleases__runs.csv")).unwrap();
    let mut lines = agg.lines();
    assert!(lines.next().unwrap().starts_with("Scenario,runs,"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn unknown_value_column_fails() {
    let out = Command::new(env!("CARGO_BIN_EXE_rebalance-percentiles"))
        .args(["-g", "Scenario", "-v", "Speed", "-c", "missing.csv"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn inverted_range_in_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sweep.json");
    std::fs::write(&config, r#"{"app_counts": "5..=2", "samples": 1}"#).unwrap();

    let status = sim()
        .current_dir(dir.path())
        .args(["-q", "--config"])
        .arg(&config)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!dir.path().join("results.csv").exists());
}
