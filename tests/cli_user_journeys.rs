//! Behavior-driven tests for CLI user journeys
//!
//! These tests run the `ferrofolio` binary the way a user would and check
//! what they observe: stdout, the written file, and the exit code.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn ferrofolio(args: &[&str]) -> Output {
    let workdir = tempdir().expect("temp dir");
    Command::new(env!("CARGO_BIN_EXE_ferrofolio"))
        .args(args)
        .arg("--no-dotenv")
        .current_dir(workdir.path())
        .env_remove("FERROFOLIO_ACCOUNT_ID")
        .env_remove("FERROFOLIO_LOOKUP_URL")
        .env_remove("FERROFOLIO_LOOKUP_SECRET")
        .env_remove("FERROFOLIO_LOOKUP_RATE_PER_MINUTE")
        .env_remove("FERROFOLIO_DEGIRO_FORCE_V3")
        .env_remove("FERROFOLIO_TAGS")
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary runs")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// CLI User Journey: Discovering supported formats
// =============================================================================

#[test]
fn user_can_list_every_supported_broker() {
    // When: The user asks which brokers are supported
    let output = ferrofolio(&["brokers"]);

    // Then: All twenty formats are listed with their shape
    assert!(output.status.success(), "{}", stderr(&output));
    let brokers = stdout_json(&output);
    let brokers = brokers.as_array().expect("array of brokers");
    assert_eq!(brokers.len(), 20);

    let degiro_v3 = brokers
        .iter()
        .find(|broker| broker["id"] == "degiro-v3")
        .expect("degiro-v3 listed");
    assert_eq!(degiro_v3["delimiter"], ",");
    assert_eq!(degiro_v3["columns"], 12);
}

#[test]
fn user_can_check_which_broker_produced_a_file() {
    // Given: A Schwab export
    let path = fixture_path("schwab_cash.csv");

    // When: The user runs detection on it
    let output = ferrofolio(&["detect", path.to_str().expect("utf-8 path")]);

    // Then: Schwab is reported with full similarity
    assert!(output.status.success(), "{}", stderr(&output));
    let detection = stdout_json(&output);
    assert_eq!(detection["broker"], "schwab");
    assert_eq!(detection["similarity"], 1.0);
}

#[test]
fn unrecognised_file_exits_with_unknown_format() {
    let workdir = tempdir().expect("temp dir");
    let path = workdir.path().join("statement.csv");
    std::fs::write(&path, "Booking date;Text;Debit;Credit\n").expect("write input");

    let output = ferrofolio(&["detect", path.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("not recognised"));
}

// =============================================================================
// CLI User Journey: Converting an export
// =============================================================================

#[test]
fn user_can_convert_an_export_into_an_import_file() {
    // Given: A Schwab export with interest and fee rows and an output path
    let workdir = tempdir().expect("temp dir");
    let destination = workdir.path().join("import.json");
    let input = fixture_path("schwab_cash.csv");

    // When: The user converts it for their account
    let output = ferrofolio(&[
        "convert",
        input.to_str().expect("utf-8 path"),
        "--account-id",
        "acc-42",
        "--output",
        destination.to_str().expect("utf-8 path"),
        "--lookup-url",
        "http://127.0.0.1:9",
        "--tag",
        "schwab",
        "--pretty",
    ]);

    // Then: The import document is written with both cash activities
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(output.stdout.is_empty(), "document goes to the file only");

    let document: Value =
        serde_json::from_str(&std::fs::read_to_string(&destination).expect("output written"))
            .expect("valid JSON");
    assert_eq!(document["meta"]["version"], "v0");
    let activities = document["activities"].as_array().expect("activities");
    assert_eq!(activities.len(), 2);
    assert!(activities.iter().all(|activity| activity["accountId"] == "acc-42"));
    assert_eq!(activities[0]["type"], "INTEREST");
    assert_eq!(activities[0]["dataSource"], "MANUAL");
    assert_eq!(activities[1]["type"], "FEE");
    assert_eq!(activities[0]["tags"][0], "schwab");
}

#[test]
fn document_is_printed_to_stdout_without_an_output_path() {
    let input = fixture_path("schwab_cash.csv");

    let output = ferrofolio(&[
        "convert",
        input.to_str().expect("utf-8 path"),
        "--broker",
        "schwab",
        "--account-id",
        "acc-42",
    ]);

    assert!(output.status.success(), "{}", stderr(&output));
    let document = stdout_json(&output);
    assert_eq!(document["activities"].as_array().map(Vec::len), Some(2));
}

// =============================================================================
// CLI User Journey: Failures and exit codes
// =============================================================================

#[test]
fn missing_account_id_is_a_configuration_error() {
    let input = fixture_path("schwab_cash.csv");

    let output = ferrofolio(&["convert", input.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("account id is required"));
    assert!(output.stdout.is_empty());
}

#[test]
fn malformed_row_exits_with_a_parse_error_naming_the_line() {
    let input = fixture_path("revolut_extra_fields.csv");

    let output = ferrofolio(&[
        "convert",
        input.to_str().expect("utf-8 path"),
        "--account-id",
        "acc-42",
    ]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("line 3"));
    assert!(output.stdout.is_empty(), "no partial document");
}

#[test]
fn unsupported_broker_flag_is_rejected() {
    let input = fixture_path("schwab_cash.csv");

    let output = ferrofolio(&[
        "convert",
        input.to_str().expect("utf-8 path"),
        "--broker",
        "robinhood",
        "--account-id",
        "acc-42",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("robinhood"));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let output = ferrofolio(&[
        "convert",
        "does-not-exist.csv",
        "--account-id",
        "acc-42",
    ]);

    assert_eq!(output.status.code(), Some(10));
    assert!(stderr(&output).contains("does-not-exist.csv"));
}
