//! Integration tests for the kept binary.
//!
//! These tests verify end-to-end behavior including:
//! - Habit add/toggle/edit/delete workflow
//! - Completion rates against a pinned `--today`
//! - Period logging and prediction
//! - Settings persistence and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI with config lookups isolated to `dir`
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kept").expect("Failed to find kept binary");
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn stored_habits(dir: &Path) -> Vec<serde_json::Value> {
    let raw = fs::read_to_string(dir.join("data/habits.json")).expect("Failed to read habits");
    serde_json::from_str(&raw).expect("habits.json is not valid JSON")
}

fn first_habit_id(dir: &Path) -> String {
    stored_habits(dir)[0]["id"].as_i64().unwrap().to_string()
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("kept")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Habit and cycle tracker"));
}

#[test]
fn test_default_command_is_summary() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["--today", "2023-04-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Today: 2023-04-01"))
        .stdout(predicate::str::contains("no prediction available"));
}

#[test]
fn test_add_and_list_habit() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["habit", "add", "Meditate", "--category", "mindfulness"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added habit Meditate"));

    let habits = stored_habits(temp_dir.path());
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["name"], "Meditate");
    assert_eq!(habits[0]["category"], "mindfulness");
    assert_eq!(habits[0]["frequency"], "daily");
    assert_eq!(habits[0]["streak"], 0);
    assert!(habits[0]["completed"].as_object().unwrap().is_empty());

    cli(temp_dir.path())
        .args(["habit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meditate"))
        .stdout(predicate::str::contains("streak 0"));
}

#[test]
fn test_blank_name_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["habit", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Habit name cannot be empty"));

    assert!(!temp_dir.path().join("data/habits.json").exists());
}

#[test]
fn test_unknown_category_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["habit", "add", "Read", "--category", "gardening"])
        .assert()
        .failure();
}

#[test]
fn test_toggle_updates_streak() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["habit", "add", "Read"])
        .assert()
        .success();
    let id = first_habit_id(temp_dir.path());

    cli(temp_dir.path())
        .args(["--today", "2023-04-05", "habit", "toggle", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked done for 2023-04-05"))
        .stdout(predicate::str::contains("Streak: 1"));

    cli(temp_dir.path())
        .args(["--today", "2023-04-05", "habit", "toggle", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked not done"))
        .stdout(predicate::str::contains("Streak: 0"));

    let habits = stored_habits(temp_dir.path());
    assert_eq!(habits[0]["completed"]["2023-04-05"], false);
}

#[test]
fn test_three_of_seven_days() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["--today", "2023-04-01", "habit", "add", "Walk", "--category", "fitness"])
        .assert()
        .success();
    let id = first_habit_id(temp_dir.path());

    for day in ["2023-04-01", "2023-04-02", "2023-04-03"] {
        cli(temp_dir.path())
            .args(["--today", day, "habit", "toggle", id.as_str()])
            .assert()
            .success();
    }

    cli(temp_dir.path())
        .args(["--today", "2023-04-07", "habit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("streak 3"))
        .stdout(predicate::str::contains("43%"));
}

#[test]
fn test_edit_reset_delete() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["habit", "add", "Read"])
        .assert()
        .success();
    let id = first_habit_id(temp_dir.path());

    cli(temp_dir.path())
        .args(["habit", "toggle", id.as_str(), "--date", "2023-04-02"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["habit", "edit", id.as_str(), "--name", "Read books", "--frequency", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Read books (other, weekly)"));

    let habits = stored_habits(temp_dir.path());
    assert_eq!(habits[0]["streak"], 1);
    assert_eq!(habits[0]["completed"]["2023-04-02"], true);

    cli(temp_dir.path())
        .args(["habit", "reset", id.as_str()])
        .assert()
        .success();
    assert_eq!(stored_habits(temp_dir.path())[0]["streak"], 0);

    cli(temp_dir.path())
        .args(["habit", "delete", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted habit Read books"));
    assert!(stored_habits(temp_dir.path()).is_empty());

    cli(temp_dir.path())
        .args(["habit", "delete", id.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No habit with id"));
}

#[test]
fn test_period_prediction() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["cycle", "settings", "--cycle-length", "28", "--period-length", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    for start in ["2023-04-01", "2023-04-29"] {
        cli(temp_dir.path())
            .args(["cycle", "log-period", "--start", start])
            .assert()
            .success();
    }

    cli(temp_dir.path())
        .args(["--today", "2023-05-10", "cycle", "predict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-05-27 to 2023-06-01"))
        .stdout(predicate::str::contains("Cycle day:         12"))
        .stdout(predicate::str::contains("Days until next:   17"));

    cli(temp_dir.path())
        .args(["cycle", "check", "2023-04-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("In recorded period:  yes"));

    cli(temp_dir.path())
        .args(["cycle", "check", "2023-04-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("In recorded period:  no"));
}

#[test]
fn test_oversized_settings_rejected() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["cycle", "log-period", "--start", "2023-04-01"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["cycle", "settings", "--cycle-length", "4000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cycle length must be between 1 and 365 days"));

    cli(temp_dir.path())
        .args(["cycle", "settings", "--period-length", "4000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Period length must be at least 1 day"));

    assert!(!temp_dir.path().join("data/cycle_settings.json").exists());

    cli(temp_dir.path())
        .args(["--today", "2023-04-10", "cycle", "predict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-04-29 to 2023-05-03"));
}

#[test]
fn test_log_period_requires_start() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["cycle", "log-period"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A date is required"));

    cli(temp_dir.path())
        .args(["cycle", "predict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No prediction available"));
}

#[test]
fn test_symptoms() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "cycle",
            "log-symptom",
            "--date",
            "2023-05-02",
            "--kind",
            "cramps",
            "--severity",
            "4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("cramps (4/5) on 2023-05-02"));

    cli(temp_dir.path())
        .args(["cycle", "log-symptom", "--date", "2023-05-02", "--kind", "cramps", "--severity", "9"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["cycle", "check", "2023-05-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Symptom logged:      yes"));
}

#[test]
fn test_calendar() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["cycle", "log-period", "--start", "2023-05-01"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["cycle", "calendar", "--month", "2023-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-05-01  P"))
        .stdout(predicate::str::contains("2023-05-29  p"));

    cli(temp_dir.path())
        .args(["cycle", "calendar", "--month", "2023-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month"));
}

#[test]
fn test_settings_from_config_file() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/kept");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[cycle]\ncycle_length = 30\n").unwrap();

    cli(temp_dir.path())
        .args(["cycle", "settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Average cycle length:  30 days"))
        .stdout(predicate::str::contains("Average period length: 5 days"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["habit", "add", "Read"])
        .assert()
        .success();
    let id = first_habit_id(temp_dir.path());
    cli(temp_dir.path())
        .args(["habit", "toggle", id.as_str(), "--date", "2023-04-02"])
        .assert()
        .success();

    let out = temp_dir.path().join("out");
    cli(temp_dir.path())
        .arg("export")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("habits.csv:   1 rows"));

    let csv = fs::read_to_string(out.join("habits.csv")).unwrap();
    assert!(csv.starts_with("habit_id,name,category,frequency,date,completed,streak"));
    assert!(csv.contains("2023-04-02,true,1"));
    assert!(out.join("periods.csv").exists());
    assert!(out.join("symptoms.csv").exists());
}
