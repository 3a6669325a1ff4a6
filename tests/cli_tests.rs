//! End-to-end tests of the sops-runner binary.

#![cfg(unix)]
#![allow(deprecated)] // Command::cargo_bin

mod common;

use assert_cmd::Command;
use common::{MockSops, PRINT_ARGS};
use predicates::prelude::*;
use serial_test::serial;

fn sops_runner(mock: &MockSops) -> Command {
    let mut cmd = Command::cargo_bin("sops-runner").unwrap();
    cmd.env("SOPS_RUNNER_BINARY", &mock.binary);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
#[serial]
fn test_decrypt_prints_trimmed_text() {
    let mock = MockSops::new(r#"printf 'api_key: abc\n\n\n'"#);

    sops_runner(&mock)
        .args(["decrypt", "secrets.yaml"])
        .assert()
        .success()
        .stdout("api_key: abc\n");
}

#[test]
#[serial]
fn test_decrypt_raw_keeps_bytes() {
    let mock = MockSops::new(r#"printf 'abc\n\n'"#);

    sops_runner(&mock)
        .args(["decrypt", "--raw", "secrets.bin"])
        .assert()
        .success()
        .stdout("abc\n\n");
}

#[test]
#[serial]
fn test_failure_exits_with_sops_code() {
    let mock = MockSops::new(r#"printf 'MAC mismatch' >&2; exit 51"#);

    sops_runner(&mock)
        .args(["decrypt", "secrets.yaml"])
        .assert()
        .code(51)
        .stderr(predicate::str::contains(
            "Error: error with file secrets.yaml: MacMismatch exited with code 51",
        ));
}

#[test]
#[serial]
fn test_encrypt_reads_stdin() {
    let mock = MockSops::new("cat");

    sops_runner(&mock)
        .arg("encrypt")
        .write_stdin("plaintext")
        .assert()
        .success()
        .stdout("plaintext");
}

#[test]
#[serial]
fn test_encrypt_reads_input_file() {
    let mock = MockSops::new("cat");
    let input = mock.path().join("plain.yaml");
    std::fs::write(&input, "a: 1\n").unwrap();

    sops_runner(&mock)
        .arg("encrypt")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout("a: 1\n");
}

#[test]
#[serial]
fn test_missing_binary_fails() {
    let mock = MockSops::new("exit 0");

    sops_runner(&mock)
        .env("SOPS_RUNNER_BINARY", "/nonexistent/sops")
        .args(["decrypt", "secrets.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not run /nonexistent/sops"));
}

#[test]
#[serial]
fn test_codes_lists_table() {
    let mock = MockSops::new("exit 0");

    sops_runner(&mock)
        .arg("codes")
        .assert()
        .success()
        .stdout(predicate::str::contains("51  MacMismatch"))
        .stdout(predicate::str::contains("203  FileAlreadyEncrypted"));
}

#[test]
#[serial]
fn test_decrypt_no_rstrip_writes_output_verbatim() {
    let mock = MockSops::new(r#"printf 'secret\n\n'"#);

    sops_runner(&mock)
        .args(["decrypt", "--no-rstrip", "s.yaml"])
        .assert()
        .success()
        .stdout("secret\n\n");
}

#[test]
#[serial]
fn test_decrypt_rejects_invalid_utf8_without_lossy() {
    let mock = MockSops::new(r#"printf 'bad\377bytes\n'"#);

    sops_runner(&mock)
        .args(["decrypt", "s.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not valid UTF-8"));
}

#[test]
#[serial]
fn test_decrypt_lossy_replaces_invalid_utf8() {
    let mock = MockSops::new(r#"printf 'bad\377bytes\n'"#);

    sops_runner(&mock)
        .args(["decrypt", "--lossy", "s.yaml"])
        .assert()
        .success()
        .stdout("bad\u{fffd}bytes\n");
}

#[test]
#[serial]
fn test_decrypt_passes_format_hints() {
    let mock = MockSops::new(PRINT_ARGS);

    sops_runner(&mock)
        .args([
            "decrypt",
            "--input-type",
            "yaml",
            "--output-type",
            "json",
            "secrets.yaml",
        ])
        .assert()
        .success()
        .stdout("--input-type\nyaml\n--output-type\njson\n--decrypt\nsecrets.yaml\n");
}

#[test]
#[serial]
fn test_encrypt_passes_format_hints() {
    let mock = MockSops::new(PRINT_ARGS);

    sops_runner(&mock)
        .args(["encrypt", "--input-type", "dotenv", "--output-type", "json"])
        .write_stdin("A=1\n")
        .assert()
        .success()
        .stdout("--input-type\ndotenv\n--output-type\njson\n--encrypt\n/dev/stdin\n");
}

#[test]
#[serial]
fn test_encrypt_runs_in_cwd() {
    let mock = MockSops::new("pwd");
    let workdir = tempfile::tempdir().unwrap();
    let expected = std::fs::canonicalize(workdir.path()).unwrap();

    let output = sops_runner(&mock)
        .arg("encrypt")
        .arg("--cwd")
        .arg(workdir.path())
        .write_stdin("")
        .output()
        .unwrap();

    assert!(output.status.success());
    let reported = String::from_utf8(output.stdout).unwrap();
    assert_eq!(std::fs::canonicalize(reported.trim_end()).unwrap(), expected);
}

#[test]
#[serial]
fn test_config_file_sets_binary_and_hints() {
    let mock = MockSops::new(PRINT_ARGS);
    let config = mock.path().join("runner.json");
    let json = serde_json::json!({
        "binary": mock.binary,
        "input_type": "yaml",
        "output_type": "json",
    });
    std::fs::write(&config, json.to_string()).unwrap();

    let mut cmd = Command::cargo_bin("sops-runner").unwrap();
    cmd.env_remove("SOPS_RUNNER_BINARY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(["decrypt", "--output-type", "ini", "a.yaml"])
        .assert()
        .success()
        .stdout("--input-type\nyaml\n--output-type\nini\n--decrypt\na.yaml\n");
}

#[test]
#[serial]
fn test_invalid_config_file_fails() {
    let mock = MockSops::new("exit 0");
    let config = mock.path().join("runner.json");
    std::fs::write(&config, r#"{"binary": ""}"#).unwrap();

    sops_runner(&mock)
        .arg("--config")
        .arg(&config)
        .args(["decrypt", "a.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load config"));
}
