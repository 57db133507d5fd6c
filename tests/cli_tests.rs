// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual omnidata binary and verify its behavior.

mod common;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use common::{temp_dir, ORDERS_JSON, PEOPLE_CSV};

/// Get the path to the built omnidata binary
fn omnidata_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_omnidata"))
}

fn command() -> Command {
    let mut cmd = Command::new(omnidata_bin());
    cmd.env_remove("OMNIDATA_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Run omnidata with arguments
fn run(args: &[&str]) -> Output {
    command()
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", omnidata_bin()))
}

/// Run omnidata with `input` on stdin
fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", omnidata_bin()));
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn assert_ok(args: &[&str], output: &Output) -> String {
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run omnidata and assert success
fn run_ok(args: &[&str]) -> String {
    assert_ok(args, &run(args))
}

/// Run omnidata and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    assert_eq!(output.status.code(), Some(1));
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn s(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("Structured data translator"));
    assert!(output.contains("convert"));
    assert!(output.contains("peek"));
    assert!(output.contains("diff"));
    assert!(output.contains("formats"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("omnidata"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let output = run(&["nonexistent"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

#[test]
fn test_formats_lists_availability() {
    let output = run_ok(&["formats"]);
    assert!(output.contains("Format"));
    assert!(output.lines().any(|l| l.starts_with("csv") && l.contains("read+write")));
    assert!(output.lines().any(|l| l.starts_with("parquet") && l.contains("no")));

    let available = run_ok(&["formats", "--available"]);
    assert!(!available.contains("parquet"));
}

// ============================================================================
// Convert Tests
// ============================================================================

#[test]
fn test_convert_csv_to_json() {
    let dir = temp_dir("cli_convert");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let output = dir.join("people.json");

    let stdout = run_ok(&["convert", "-i", &s(&input), "-o", &s(&output)]);
    assert!(stdout.contains("Successfully converted"));
    assert!(stdout.contains("(csv)"));
    assert!(stdout.contains("(json)"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value[1]["name"], "Bob");
}

#[test]
fn test_convert_stdin_to_stdout() {
    let args = ["convert", "-i", "-", "--from", "csv", "-o", "-", "--to", "yaml"];
    let output = run_with_stdin(&args, PEOPLE_CSV);
    let stdout = assert_ok(&args, &output);

    assert!(stdout.contains("name: Alice"));
    // Confirmation goes to stderr so stdout stays parseable
    assert!(!stdout.contains("Successfully"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Successfully converted"));
}

#[test]
fn test_convert_stdin_needs_format() {
    let args = ["convert", "-i", "-", "-o", "-", "--to", "json"];
    let output = run_with_stdin(&args, PEOPLE_CSV);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_convert_dry_run() {
    let dir = temp_dir("cli_dry_run");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let output = dir.join("people.json");

    let stdout = run_ok(&[
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&output),
        "--dry-run",
    ]);
    assert!(stdout.starts_with("[dry-run] Would convert"));
    assert!(!output.exists());
}

#[test]
fn test_convert_refuses_existing_output() {
    let dir = temp_dir("cli_existing");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let output = dir.write("people.json", "precious");

    let stderr = run_err(&["convert", "-i", &s(&input), "-o", &s(&output)]);
    assert!(stderr.starts_with("Error:"));
    assert!(stderr.contains("already exists"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "precious");

    run_ok(&["convert", "-i", &s(&input), "-o", &s(&output), "--force"]);
    assert_ne!(fs::read_to_string(&output).unwrap(), "precious");
}

#[test]
fn test_convert_stream() {
    let dir = temp_dir("cli_stream");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let output = dir.join("people.json.gz");

    let stdout = run_ok(&[
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&output),
        "--stream",
    ]);
    assert!(stdout.contains("[streamed 2 rows]"));
    let value: serde_json::Value = serde_json::from_str(&common::gunzip(&output)).unwrap();
    assert_eq!(value[0]["name"], "Alice");
    assert_eq!(value[1]["age"], "");
}

#[test]
fn test_convert_placeholder_format() {
    let dir = temp_dir("cli_placeholder");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let stderr = run_err(&[
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&dir.join("people.avro")),
    ]);
    assert!(stderr.contains("apache-avro"));
}

#[test]
fn test_convert_same_format_rejected_by_config() {
    let dir = temp_dir("cli_config");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let config = dir.write("omnidata.toml", "[convert]\nallow_same_format = false\n");

    let stderr = run_err(&[
        "--config",
        &s(&config),
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&dir.join("copy.csv")),
    ]);
    assert!(stderr.contains("same"));
}

#[test]
fn test_convert_no_force_overrides_config() {
    let dir = temp_dir("cli_no_force");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let output = dir.write("people.json", "precious");
    let config = dir.write("omnidata.toml", "[convert]\noverwrite = true\n");

    let stderr = run_err(&[
        "--config",
        &s(&config),
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&output),
        "--no-force",
    ]);
    assert!(stderr.contains("already exists"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "precious");

    run_ok(&[
        "--config",
        &s(&config),
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&output),
    ]);
    assert_ne!(fs::read_to_string(&output).unwrap(), "precious");
}

#[test]
fn test_convert_no_stream_overrides_config() {
    let dir = temp_dir("cli_no_stream");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let config = dir.write("omnidata.toml", "[convert]\nstream = true\n");

    let streamed = run_ok(&[
        "--config",
        &s(&config),
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&dir.join("streamed.json")),
    ]);
    assert!(streamed.contains("[streamed 2 rows]"));

    let whole = run_ok(&[
        "--config",
        &s(&config),
        "convert",
        "-i",
        &s(&input),
        "-o",
        &s(&dir.join("whole.json")),
        "--no-stream",
    ]);
    assert!(whole.contains("Successfully converted"));
    assert!(!whole.contains("streamed"));
}

#[test]
fn test_invalid_config_file() {
    let dir = temp_dir("cli_bad_config");
    let config = dir.write("omnidata.toml", "[convert\n");
    let stderr = run_err(&["--config", &s(&config), "formats"]);
    assert!(stderr.contains("omnidata.toml"));
}

// ============================================================================
// Peek Tests
// ============================================================================

#[test]
fn test_peek_text() {
    let dir = temp_dir("cli_peek");
    let input = dir.write("people.csv", PEOPLE_CSV);

    let stdout = run_ok(&["peek", "-i", &s(&input), "-n", "1"]);
    assert!(stdout.contains("Rows:    2"));
    assert!(stdout.contains("age"));
    assert!(stdout.contains("Preview (1 rows)"));
    assert!(stdout.contains("Alice"));
    assert!(!stdout.contains("Bob"));
}

#[test]
fn test_peek_json_report_from_stdin() {
    let args = ["peek", "-i", "-", "--format", "json", "--report", "json", "--stats"];
    let output = run_with_stdin(&args, ORDERS_JSON);
    let stdout = assert_ok(&args, &output);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["schema"]["row_count"], 3);
    assert_eq!(value["schema"]["columns"][0]["name"], "id");
    assert_eq!(value["schema"]["columns"][0]["type"], "number");
    assert!(value["schema"]["columns"][1]["sample_values"].is_array());
    assert_eq!(value["preview"]["rows"].as_array().unwrap().len(), 3);
}

#[test]
fn test_peek_html_to_file() {
    let dir = temp_dir("cli_peek_html");
    let input = dir.write("people.csv", "name,note\nAnn,<b>hi</b>\n");
    let report = dir.join("report.html");

    let stdout = run_ok(&[
        "peek",
        "-i",
        &s(&input),
        "--report",
        "html",
        "-o",
        &s(&report),
    ]);
    assert!(stdout.is_empty());
    let html = fs::read_to_string(&report).unwrap();
    assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
}

#[test]
fn test_peek_keeps_existing_report() {
    let dir = temp_dir("cli_peek_existing");
    let input = dir.write("people.csv", PEOPLE_CSV);
    let report = dir.write("report.txt", "earlier report");

    let stderr = run_err(&["peek", "-i", &s(&input), "-o", &s(&report)]);
    assert!(stderr.contains("already exists"));
    assert_eq!(fs::read_to_string(&report).unwrap(), "earlier report");

    run_ok(&["peek", "-i", &s(&input), "-o", &s(&report), "--force"]);
    assert!(fs::read_to_string(&report).unwrap().contains("Alice"));
}

#[test]
fn test_peek_missing_file() {
    let stderr = run_err(&["peek", "-i", "/nonexistent/omnidata/people.csv"]);
    assert!(stderr.contains("does not exist"));
}

// ============================================================================
// Diff Tests
// ============================================================================

#[test]
fn test_diff_markdown() {
    let dir = temp_dir("cli_diff");
    let old = dir.write("old.csv", "id,name\n1,Ann\n");
    let new = dir.write("new.json", r#"[{"id": 1, "name": "Ann", "email": "a@x"}]"#);

    let stdout = run_ok(&["diff", &s(&old), &s(&new), "--report", "md"]);
    assert!(stdout.starts_with("# Schema Comparison"));
    assert!(stdout.contains("## Added Columns (1)"));
    assert!(stdout.contains("**email**"));
    assert!(stdout.contains("**Summary:** 1 change(s) detected"));
}

#[test]
fn test_diff_identical_text() {
    let dir = temp_dir("cli_diff_same");
    let old = dir.write("a.csv", PEOPLE_CSV);
    let new = dir.write("b.csv", PEOPLE_CSV);

    let stdout = run_ok(&["diff", &s(&old), &s(&new)]);
    assert!(stdout.contains("Summary: Schemas are identical"));
}

#[test]
fn test_diff_one_side_stdin() {
    let dir = temp_dir("cli_diff_stdin");
    let old = dir.write("old.csv", PEOPLE_CSV);
    let args_owned = [
        "diff".to_string(),
        s(&old),
        "-".to_string(),
        "--format2".to_string(),
        "csv".to_string(),
    ];
    let args: Vec<&str> = args_owned.iter().map(String::as_str).collect();
    let output = run_with_stdin(&args, "name,age,city\nAlice,30,Oslo\n");
    let stdout = assert_ok(&args, &output);
    assert!(stdout.contains("+ city: string"));
}

#[test]
fn test_diff_both_stdin_rejected() {
    let stderr = run_err(&["diff", "-", "-", "--format1", "csv", "--format2", "csv"]);
    assert!(stderr.contains("standard input"));
}
