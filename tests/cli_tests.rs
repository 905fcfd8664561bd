use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn check_accepts_valid_config() {
    let file = write_temp_config(
        r#"
pairs = ["ETHBTC"]

[strategy]
buy_amount = 0.01
"#,
    );

    Command::cargo_bin("dipcatch")
        .unwrap()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("ETHBTC"));
}

#[test]
fn check_returns_nonzero_on_config_error() {
    let file = write_temp_config(
        r#"
pairs = ["ETHBTC"]

[strategy]
max_loss = 1.5
"#,
    );

    Command::cargo_bin("dipcatch")
        .unwrap()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_loss"));
}

#[test]
fn check_reports_missing_file() {
    Command::cargo_bin("dipcatch")
        .unwrap()
        .args(["check", "--config", "/nonexistent/dipcatch.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}
