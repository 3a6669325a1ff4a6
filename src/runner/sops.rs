//! The sops runner.

use super::options::{DecryptOptions, EncryptOptions, Plaintext};
use super::process::{check_exit, communicate, exit_code, forward_stderr, sops_args, spawn};
use crate::config::{DecodeMode, RunnerConfig, STDIN_DEVICE, STDOUT_TARGET};
use crate::diagnostics::DiagnosticSink;
use crate::error::{Direction, Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs sops to decrypt and encrypt files.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads. Every call spawns its own process.
#[derive(Debug, Clone, Default)]
pub struct Sops {
    config: RunnerConfig,
}

impl Sops {
    /// Runner using `sops` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with a custom configuration.
    pub fn with_config(config: RunnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Decrypt a file.
    ///
    /// Runs `sops [--input-type X] [--output-type Y] --decrypt <path>`. Anything
    /// sops writes to stderr is handed to `sink`, whether or not it succeeds.
    ///
    /// # Errors
    ///
    /// * [`Error::Tool`] if sops exits nonzero
    /// * [`Error::Decode`] if text was requested and the output is not UTF-8
    /// * [`Error::Spawn`] if sops cannot be started
    pub fn decrypt(
        &self,
        path: impl AsRef<Path>,
        options: &DecryptOptions,
        sink: Option<&dyn DiagnosticSink>,
    ) -> Result<Plaintext> {
        let path = path.as_ref();
        let filename = path.display().to_string();

        let mut command = self.command(
            options.input_type.as_deref(),
            options.output_type.as_deref(),
            "--decrypt",
            path,
        );
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = spawn(&mut command, &self.config.binary)?.wait_with_output()?;
        let code = exit_code(output.status);
        tracing::debug!(file = %filename, exit_code = code, "sops decrypt finished");

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        forward_stderr(&stderr, sink);
        check_exit(code, &filename, stderr, Direction::Decrypt)?;

        if !options.decode_output {
            return Ok(Plaintext::Bytes(output.stdout));
        }

        let mode = options.decode_mode.unwrap_or(self.config.decode_mode);
        let mut text = decode(output.stdout, &filename, mode)?;
        if options.rstrip {
            text.truncate(text.trim_end().len());
        }
        Ok(Plaintext::Text(text))
    }

    /// Decrypt a file and return its content as text with trailing
    /// whitespace removed.
    pub fn decrypt_to_string(
        &self,
        path: impl AsRef<Path>,
        sink: Option<&dyn DiagnosticSink>,
    ) -> Result<String> {
        let path = path.as_ref();
        match self.decrypt(path, &DecryptOptions::default(), sink)? {
            Plaintext::Text(text) => Ok(text),
            // Default options always decode; kept total rather than panicking.
            Plaintext::Bytes(bytes) => {
                decode(bytes, &path.display().to_string(), self.config.decode_mode)
            }
        }
    }

    /// Encrypt `data`.
    ///
    /// Runs `sops [--input-type X] [--output-type Y] --encrypt /dev/stdin` with
    /// `data` on stdin and returns the encrypted bytes exactly as sops wrote
    /// them.
    ///
    /// # Errors
    ///
    /// * [`Error::Tool`] if sops exits nonzero, with filename `"to stdout"`
    /// * [`Error::Spawn`] if sops cannot be started
    pub fn encrypt(
        &self,
        data: &[u8],
        options: &EncryptOptions,
        sink: Option<&dyn DiagnosticSink>,
    ) -> Result<Vec<u8>> {
        let mut command = self.command(
            options.input_type.as_deref(),
            options.output_type.as_deref(),
            "--encrypt",
            Path::new(STDIN_DEVICE),
        );
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }

        let child = spawn(&mut command, &self.config.binary)?;
        let output = communicate(child, data)?;
        let code = exit_code(output.status);
        tracing::debug!(
            bytes_in = data.len(),
            bytes_out = output.stdout.len(),
            exit_code = code,
            "sops encrypt finished"
        );

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        forward_stderr(&stderr, sink);
        check_exit(code, STDOUT_TARGET, stderr, Direction::Encrypt)?;

        Ok(output.stdout)
    }

    fn command(
        &self,
        input_type: Option<&str>,
        output_type: Option<&str>,
        action: &str,
        target: &Path,
    ) -> Command {
        let input_type = input_type.or(self.config.input_type.as_deref());
        let output_type = output_type.or(self.config.output_type.as_deref());
        let args = sops_args(input_type, output_type, action, target);
        tracing::debug!(binary = %self.config.binary.display(), ?args, "running sops");

        let mut command = Command::new(&self.config.binary);
        command.args(args);
        command
    }
}

fn decode(stdout: Vec<u8>, filename: &str, mode: DecodeMode) -> Result<String> {
    match mode {
        DecodeMode::Strict => String::from_utf8(stdout).map_err(|source| Error::Decode {
            filename: filename.to_string(),
            source,
        }),
        DecodeMode::Lossy => Ok(String::from_utf8_lossy(&stdout).into_owned()),
    }
}
