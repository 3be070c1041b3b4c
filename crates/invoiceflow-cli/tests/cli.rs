//! Command-line tests for the `invoiceflow` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const INVOICE_TEXT: &str = "ACME SUPPLIES LTD\n\
Invoice Number: INV-2024-001\n\
Date: 2024-01-15\n\
Subtotal: $100.00\n\
Tax: $8.00\n\
Total: $108.00\n";

fn invoiceflow() -> Command {
    Command::cargo_bin("invoiceflow").unwrap()
}

#[test]
fn parse_text_file_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE_TEXT).unwrap();

    invoiceflow()
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"invoice_id\": \"INV-2024-001\""))
        .stdout(predicate::str::contains("\"vendor_name\": \"ACME SUPPLIES LTD\""))
        .stdout(predicate::str::contains("\"total_amount\": 108.0"));
}

#[test]
fn parse_text_file_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE_TEXT).unwrap();

    invoiceflow()
        .args(["parse", "-f", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-2024-001,ACME SUPPLIES LTD,2024-01-15,108,"));
}

#[test]
fn parse_empty_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "").unwrap();

    invoiceflow()
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text provided for parsing"));
}

#[test]
fn parse_with_unknown_parser_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE_TEXT).unwrap();

    invoiceflow()
        .args(["parse", "--parser", "llm"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parser 'llm'"));
}

#[test]
fn process_missing_file_reports_not_found() {
    invoiceflow()
        .args(["process", "/nonexistent/invoice.pdf"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("File not found: /nonexistent/invoice.pdf"));
}

#[test]
fn batch_writes_results_file() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("inbox");
    let out = dir.path().join("out");
    fs::create_dir(&inputs).unwrap();
    fs::write(inputs.join("broken.pdf"), b"not really a pdf").unwrap();
    fs::write(inputs.join("notes.txt"), b"ignored").unwrap();

    invoiceflow()
        .arg("batch")
        .arg(&inputs)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 files"));

    let results: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with("results_"))
        .collect();
    assert_eq!(results.len(), 1);

    let content = fs::read_to_string(&results[0]).unwrap();
    let records: serde_json::Value = serde_json::from_str(&content).unwrap();
    let record = &records[0];
    assert_eq!(record["file"], "broken.pdf");
    assert_eq!(record["parser_used"], "heuristic");
    assert!(record["result"]["error"].is_string());
}

#[test]
fn parsers_lists_heuristic() {
    invoiceflow()
        .arg("parsers")
        .assert()
        .success()
        .stdout(predicate::str::contains("heuristic (default)"));
}

#[test]
fn config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    invoiceflow()
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .success();
    assert!(config_path.exists());

    invoiceflow()
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    invoiceflow()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"capacity\": 4"))
        .stdout(predicate::str::contains("\"default_parser\": \"heuristic\""));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{ not json").unwrap();

    invoiceflow()
        .arg("-c")
        .arg(&config_path)
        .arg("parsers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}
