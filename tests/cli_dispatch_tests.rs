use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_listing-optimizer")
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("listing-optimizer-{name}-{stamp}.{extension}"))
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: listing-optimizer"));
}

#[test]
fn solve_without_path_is_usage_error() {
    let output = Command::new(bin())
        .arg("solve")
        .output()
        .expect("solve should run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn solve_with_scenario_file_emits_json() {
    let scenarios = unique_temp_path("scenarios", "yaml");
    fs::write(
        &scenarios,
        "solver:\n  time_limit_secs: 30\nscenarios:\n  - name: Weekend\n    budget: 3000\n    min_properties: 2\n    min_capacity: 10\n    min_rating: 4.5\n  - name: Impossible\n    budget: 3000\n    min_capacity: 500\n    min_rating: 4.5\n",
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args([
            "solve",
            fixture_path("listings.csv").to_string_lossy().as_ref(),
            scenarios.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("solve should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("solve should emit json");
    assert_eq!(payload[0]["scenario"], "Weekend");
    assert_eq!(payload[0]["status"], "optimal");
    assert_eq!(payload[0]["selection"]["selected_count"], 2);
    assert_eq!(payload[1]["status"], "insufficient_aggregate_capacity");

    let _ = fs::remove_file(scenarios);
}

#[test]
fn solve_table_output_has_row_per_builtin_scenario() {
    let output = Command::new(bin())
        .args(["solve", fixture_path("listings.csv").to_string_lossy().as_ref(), "--table"])
        .output()
        .expect("solve should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("scenario\tstatus"));
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn solve_with_missing_listings_file_fails() {
    let output = Command::new(bin())
        .args(["solve", "/nonexistent/listings.csv"])
        .output()
        .expect("solve should run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load failed"));
}

#[test]
fn invalid_scenario_file_fails() {
    let scenarios = unique_temp_path("bad-scenarios", "yaml");
    fs::write(&scenarios, "scenarios:\n  - name: Broke\n    budget: 0\n    min_rating: 4.5\n")
        .expect("fixture should be written");

    let output = Command::new(bin())
        .args([
            "solve",
            fixture_path("listings.csv").to_string_lossy().as_ref(),
            scenarios.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("solve should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load scenarios"));

    let _ = fs::remove_file(scenarios);
}

#[test]
fn scenarios_command_prints_loadable_yaml() {
    let output = Command::new(bin())
        .arg("scenarios")
        .output()
        .expect("scenarios should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = listing_optimizer::config::ScenarioFile::from_yaml_str(&stdout)
        .expect("printed scenarios should parse");
    assert_eq!(parsed, listing_optimizer::config::ScenarioFile::builtin());
}

#[test]
fn validate_command_passes_on_fixture() {
    let output = Command::new(bin())
        .args(["validate", fixture_path("listings.csv").to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));
    assert!(stdout.contains("7 listings"));
}

#[test]
fn validate_command_fails_when_nothing_survives_cleaning() {
    let path = unique_temp_path("empty-listings", "csv");
    fs::write(
        &path,
        "name,listing_url,price,accommodates,review_scores_rating\nA,http://a,,2,4.9\n",
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));

    let _ = fs::remove_file(path);
}
