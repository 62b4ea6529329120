//! Integration tests for the pdf-fixture CLI
//!
//! Drives the built binary and checks the files it writes and what it
//! prints.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn get_cli_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pdf-fixture"))
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

/// Runs the CLI inside `dir` so config discovery never sees the repository
fn run_cli_in(dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(get_cli_path())
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()?;
    Ok(output)
}

fn assert_pdf_at_least(path: &Path, min_bytes: u64) {
    assert!(path.exists(), "PDF file should exist: {}", path.display());
    let content = fs::read(path).expect("Failed to read PDF file");
    assert!(
        content.starts_with(b"%PDF-"),
        "File should start with PDF header"
    );
    assert!(
        content.len() as u64 >= min_bytes,
        "{} is {} bytes, expected at least {}",
        path.display(),
        content.len(),
        min_bytes
    );
}

#[test]
fn test_cli_generate_command() {
    let temp_dir = setup_temp_dir();
    let output_path = temp_dir.path().join("single.pdf");

    let output = run_cli_in(
        temp_dir.path(),
        &["generate", "-o", output_path.to_str().unwrap(), "--size-mb", "0.1"],
    )
    .expect("CLI command should run");

    assert!(output.status.success(), "Command should succeed");
    assert_pdf_at_least(&output_path, 104_857);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PDF created"), "Should show success message");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Generating 'Attachment 1' targeting ~0.10MB..."));
}

#[test]
fn test_cli_generate_zero_size_still_writes_a_page() {
    let temp_dir = setup_temp_dir();
    let output_path = temp_dir.path().join("zero.pdf");

    let output = run_cli_in(
        temp_dir.path(),
        &["generate", "-o", output_path.to_str().unwrap(), "-s", "0", "-q"],
    )
    .expect("CLI command should run");

    assert!(output.status.success());
    assert_pdf_at_least(&output_path, 1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 pages"));
}

#[test]
fn test_cli_batch_with_flags() {
    let temp_dir = setup_temp_dir();
    let out_dir = temp_dir.path().join("generated");

    let output = run_cli_in(
        temp_dir.path(),
        &[
            "batch",
            "--count",
            "2",
            "--size-mb",
            "0.05",
            "--output-dir",
            out_dir.to_str().unwrap(),
        ],
    )
    .expect("CLI command should run");

    assert!(output.status.success(), "Command should succeed");
    assert_pdf_at_least(&out_dir.join("attachment-1.pdf"), 52_428);
    assert_pdf_at_least(&out_dir.join("attachment-2.pdf"), 52_428);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated 2 PDFs"));
    assert!(stdout.contains("Total size:"));
    assert!(stdout.contains("Output directory:"));
}

#[test]
fn test_cli_batch_discovers_config_file() {
    let temp_dir = setup_temp_dir();
    fs::write(
        temp_dir.path().join("pdf-fixture.toml"),
        "[pdf]\ncount = 2\nsize_mb = 0.02\noutput_dir = \"fixtures\"\nlabel_sizes = true\n",
    )
    .unwrap();

    let output = run_cli_in(temp_dir.path(), &["batch", "-q"]).expect("CLI command should run");

    assert!(output.status.success(), "Command should succeed");
    let fixtures = temp_dir.path().join("fixtures");
    assert_pdf_at_least(&fixtures.join("attachment-1-0_02MB.pdf"), 20_971);
    assert_pdf_at_least(&fixtures.join("attachment-2-0_02MB.pdf"), 20_971);
}

#[test]
fn test_cli_batch_json_output() {
    let temp_dir = setup_temp_dir();

    let output = run_cli_in(
        temp_dir.path(),
        &["batch", "-n", "1", "-s", "0.01", "-o", "json-out", "--json"],
    )
    .expect("CLI command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"filename\": \"attachment-1.pdf\""));
    assert!(stdout.contains("\"size_bytes\""));
    assert!(stdout.contains("\"elapsed\""));
}

#[test]
fn test_cli_batch_without_configuration_fails() {
    let temp_dir = setup_temp_dir();

    let output = run_cli_in(temp_dir.path(), &["batch", "--count", "2"])
        .expect("CLI command should run");

    assert!(!output.status.success(), "Command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No configuration file found"));
}

#[test]
fn test_cli_batch_with_zero_count() {
    let temp_dir = setup_temp_dir();

    let output = run_cli_in(
        temp_dir.path(),
        &["batch", "-n", "0", "-s", "1", "-o", "empty"],
    )
    .expect("CLI command should run");

    assert!(output.status.success());
    assert!(temp_dir.path().join("empty").is_dir());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated 0 PDFs"));
}

#[test]
fn test_cli_init_config() {
    let temp_dir = setup_temp_dir();

    let output = run_cli_in(temp_dir.path(), &["init-config"]).expect("CLI command should run");
    assert!(output.status.success());
    let written = fs::read_to_string(temp_dir.path().join("pdf-fixture.toml")).unwrap();
    assert!(written.contains("[pdf]"));
    assert!(written.contains("output_dir = \"build/generated-pdfs\""));

    // Refuses to overwrite without --force
    let output = run_cli_in(temp_dir.path(), &["init-config"]).expect("CLI command should run");
    assert!(!output.status.success());

    let output = run_cli_in(temp_dir.path(), &["init-config", "--force"])
        .expect("CLI command should run");
    assert!(output.status.success());
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_temp_dir();
    let output = run_cli_in(temp_dir.path(), &["--help"]).expect("CLI command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("batch"));
}
