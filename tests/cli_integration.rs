//! CLI integration tests for the tickets binary
//!
//! These tests drive the binary end to end: config discovery, catalog
//! parsing, generation and the ticket file it leaves behind.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the tickets binary
fn tickets_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("tickets"))
}

const SAMPLE_TASKS: &str = "\
A;T1;10;Task one
B;T2;15;Task two
A;T1;20;Task three
B;T2;5;Task four
";

/// Create a temporary project with the given catalog
fn setup_project(tasks: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    tickets_cmd().arg("init").arg(dir.path()).assert().success();
    fs::write(dir.path().join("tasks.txt"), tasks).unwrap();
    dir
}

fn generate_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = tickets_cmd()
        .current_dir(dir)
        .args(["generate", "--target", "25", "--tolerance", "20", "--format", "json"])
        .args(extra)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    tickets_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized ticket project"));

    assert!(dir.path().join("tickets.toml").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    tickets_cmd().arg("init").arg(dir.path()).assert().success();
    fs::write(dir.path().join("tickets.toml"), "[generation]\nseed = 3\n").unwrap();
    tickets_cmd().arg("init").arg(dir.path()).assert().success();

    let content = fs::read_to_string(dir.path().join("tickets.toml")).unwrap();
    assert_eq!(content, "[generation]\nseed = 3\n");
}

// =============================================================================
// Generation Tests
// =============================================================================

#[test]
fn test_generate_writes_ticket_file() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "20", "--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 ticket(s)"));

    let content = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Билет 1; ("));
    assert!(lines[1].starts_with("Билет 2; ("));
    assert!(!lines[0].ends_with(';'));
    assert!(content.contains("(4) B; T2; 5; Task four"));
}

#[test]
fn test_generate_json_report() {
    let dir = setup_project(SAMPLE_TASKS);
    let json = generate_json(dir.path(), &["--seed", "42"]);

    assert_eq!(json["count"], 2);
    assert_eq!(json["termination"], "exhausted");
    assert_eq!(json["strategy"], "greedy");
    assert_eq!(json["seed"], 42);
    assert_eq!(json["window"]["lower"].as_f64().unwrap().round(), 20.0);
    assert_eq!(json["window"]["upper"].as_f64().unwrap().round(), 30.0);

    let tickets = json["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    for ticket in tickets {
        assert_eq!(ticket["fingerprint"].as_str().unwrap().len(), 7);
    }
}

#[test]
fn test_generate_same_seed_same_file() {
    let dir = setup_project(SAMPLE_TASKS);
    let args = ["generate", "--target", "25", "--tolerance", "20", "--seed", "7"];

    tickets_cmd().current_dir(dir.path()).args(args).assert().success();
    let first = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();

    tickets_cmd().current_dir(dir.path()).args(args).assert().success();
    let second = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_generate_exhaustive_finds_all() {
    let dir = setup_project(SAMPLE_TASKS);
    let json = generate_json(dir.path(), &["--strategy", "exhaustive", "--seed", "1"]);

    // {1,2}, {3,4} and {1,2,4}; {3} alone is too small
    assert_eq!(json["count"], 3);
    assert_eq!(json["strategy"], "exhaustive");
    assert_eq!(json["attempts"], 14);
    assert_eq!(json["rejections"]["too_few_tasks"], 4);
}

#[test]
fn test_generate_min_tasks_allows_single_task_tickets() {
    let dir = setup_project(SAMPLE_TASKS);
    let json = generate_json(
        dir.path(),
        &["--strategy", "exhaustive", "--min-tasks", "1", "--seed", "1"],
    );

    assert_eq!(json["count"], 4);
}

#[test]
fn test_generate_single_theme_single_task_catalog() {
    let dir = setup_project("A;T1;20;x
A;T2;20;y
");

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "20", "--tolerance", "0", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tickets fit the window"));

    let content = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();
    assert!(content.is_empty());
}

#[test]
fn test_generate_truncates_previous_output() {
    let dir = setup_project(SAMPLE_TASKS);
    fs::write(dir.path().join("tickets.txt"), "stale line\nanother\n").unwrap();

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "20", "--seed", "1"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();
    assert!(!content.contains("stale line"));
}

#[test]
fn test_generate_zero_target_fails() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "0", "--tolerance", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_generate_negative_tolerance_fails() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tolerance must not be negative"));
}

#[test]
fn test_generate_empty_catalog_fails_without_touching_output() {
    let dir = setup_project("\n\nnot a record\n");
    fs::write(dir.path().join("tickets.txt"), "previous run\n").unwrap();

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task catalog is empty"));

    let content = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();
    assert_eq!(content, "previous run\n");
}

#[test]
fn test_generate_missing_catalog_fails() {
    let dir = TempDir::new().unwrap();
    tickets_cmd().arg("init").arg(dir.path()).assert().success();

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open task catalog"));
}

#[test]
fn test_generate_single_theme_yields_nothing() {
    let dir = setup_project("A;T1;10;x\nA;T2;10;y\nA;T1;10;z\n");

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "20", "--tolerance", "0", "--seed", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tickets fit the window"));

    let content = fs::read_to_string(dir.path().join("tickets.txt")).unwrap();
    assert!(content.is_empty());
}

#[test]
fn test_generate_require_type_diversity() {
    let dir = setup_project("A;Theory;10;x\nB;Theory;10;y\n");

    let relaxed = generate_json(dir.path(), &["--seed", "2", "--failure-bound", "50"]);
    assert_eq!(relaxed["count"], 1);

    let output = tickets_cmd()
        .current_dir(dir.path())
        .args([
            "generate",
            "--target",
            "20",
            "--tolerance",
            "0",
            "--require-type-diversity",
            "--format",
            "json",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let strict: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(strict["count"], 0);
    assert_eq!(strict["rejections"]["single_type"], 1000);
}

#[test]
fn test_generate_max_attempts_stops_early() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "20", "--max-attempts", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stopped early"));
}

#[test]
fn test_generate_uses_config_file() {
    let dir = setup_project(SAMPLE_TASKS);
    fs::write(
        dir.path().join("tickets.toml"),
        "[files]\ntickets = \"out/tickets.txt\"\n\n[generation]\nseed = 11\n",
    )
    .unwrap();

    let json = generate_json(dir.path(), &[]);
    assert_eq!(json["seed"], 11);
    assert!(dir.path().join("out/tickets.txt").is_file());
}

#[test]
fn test_generate_explicit_config_path() {
    let dir = setup_project(SAMPLE_TASKS);
    let elsewhere = TempDir::new().unwrap();

    tickets_cmd()
        .current_dir(elsewhere.path())
        .arg("--config")
        .arg(dir.path().join("tickets.toml"))
        .args(["generate", "--target", "25", "--tolerance", "20", "--seed", "4"])
        .assert()
        .success();

    assert!(dir.path().join("tickets.txt").is_file());
}

#[test]
fn test_custom_config_name_is_reported() {
    let dir = setup_project(SAMPLE_TASKS);
    let config = dir.path().join("autumn.toml");
    fs::write(&config, "[files]\ntickets = \"autumn.txt\"\n").unwrap();

    tickets_cmd()
        .current_dir(dir.path())
        .arg("--verbose")
        .arg("--config")
        .arg(&config)
        .args(["generate", "--target", "25", "--tolerance", "20", "--seed", "4"])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("Config file: {}", config.display())));

    assert!(dir.path().join("autumn.txt").is_file());
}

#[test]
fn test_generate_verbose_logs_to_stderr() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "generate", "--target", "25", "--tolerance", "20", "--seed", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:generate] Seed: 3"))
        .stderr(predicate::str::contains("Complexity window: [20, 30]"));
}

// =============================================================================
// Show and Catalog Tests
// =============================================================================

#[test]
fn test_show_before_generate() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tickets have been generated yet"));
}

#[test]
fn test_show_after_generate() {
    let dir = setup_project(SAMPLE_TASKS);

    tickets_cmd()
        .current_dir(dir.path())
        .args(["generate", "--target", "25", "--tolerance", "20", "--seed", "42"])
        .assert()
        .success();

    tickets_cmd()
        .current_dir(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Билет 1;"))
        .stdout(predicate::str::contains("Билет 2;"));
}

#[test]
fn test_catalog_summary() {
    let dir = setup_project("A;T1;10;x\n\nbroken line\nB;T2;20;y\n");

    tickets_cmd()
        .current_dir(dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tasks, average complexity 15.00"))
        .stdout(predicate::str::contains("Skipped lines: 3"));
}

#[test]
fn test_catalog_json() {
    let dir = setup_project(SAMPLE_TASKS);

    let output = tickets_cmd()
        .current_dir(dir.path())
        .args(["catalog", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["tasks"], 4);
    assert_eq!(json["themes"]["A"]["count"], 2);
    assert_eq!(json["types"]["T2"]["average_complexity"], 10.0);
}
