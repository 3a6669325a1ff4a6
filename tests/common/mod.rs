//! Shell-script stand-ins for the sops binary.

#![allow(dead_code)]

use sops_runner::{DiagnosticSink, RunnerConfig, Sops};
use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A fake `sops` executable living in its own temp dir.
pub struct MockSops {
    pub dir: TempDir,
    pub binary: PathBuf,
}

impl MockSops {
    /// Create a `/bin/sh` script named `sops` with the given body.
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary = dir.path().join("sops");
        fs::write(&binary, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write mock");

        let mut perms = fs::metadata(&binary).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&binary, perms).unwrap();

        Self { dir, binary }
    }

    /// Mock that exits with whatever code is stored in `code` next to it.
    pub fn exit_code_from_file() -> Self {
        Self::new(r#"printf 'sops says no' >&2; exit "$(cat "$(dirname "$0")/code")""#)
    }

    pub fn set_exit_code(&self, code: i32) {
        fs::write(self.dir.path().join("code"), code.to_string()).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn runner(&self) -> Sops {
        self.runner_with(RunnerConfig::default())
    }

    pub fn runner_with(&self, config: RunnerConfig) -> Sops {
        Sops::with_config(RunnerConfig {
            binary: self.binary.clone(),
            ..config
        })
        .expect("Invalid runner config")
    }
}

/// Records everything forwarded to it.
#[derive(Default)]
pub struct RecordingSink {
    pub messages: RefCell<Vec<String>>,
}

impl DiagnosticSink for RecordingSink {
    fn verbose(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

/// Split the newline-separated argv printed by an echoing mock.
pub fn argv(stdout: &[u8]) -> Vec<String> {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Script body printing each argument on its own line.
pub const PRINT_ARGS: &str = r#"for arg in "$@"; do printf '%s\n' "$arg"; done"#;
