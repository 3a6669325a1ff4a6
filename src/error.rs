//! Error types for sops invocations.

use crate::codes;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sops operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running sops.
#[derive(Error, Debug)]
pub enum Error {
    /// sops ran and exited with a nonzero status.
    #[error(transparent)]
    Tool(#[from] ToolFailure),

    /// Decrypted output was requested as text but is not valid UTF-8.
    #[error("decrypted output of {filename} is not valid UTF-8: {source}")]
    Decode {
        filename: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The sops binary could not be started.
    #[error("could not run {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while talking to a running sops process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid runner configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The sops exit code, if this error came from sops itself.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::Tool(failure) => Some(failure.exit_code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Which way the failed invocation was going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decrypt,
    Encrypt,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Decrypt => "decrypt",
            Direction::Encrypt => "encrypt",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A nonzero exit from sops, categorized through the exit code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// File the invocation was about, or `"to stdout"` for encryption.
    pub filename: String,
    /// Exit code; negative when sops was killed by that signal.
    pub exit_code: i32,
    /// Symbolic name of the exit code, when sops documents it.
    pub category: Option<&'static str>,
    /// Whatever sops wrote to stderr.
    pub stderr: String,
    pub direction: Direction,
}

impl ToolFailure {
    pub fn new(
        filename: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            filename: filename.into(),
            exit_code,
            category: codes::category(exit_code),
            stderr: stderr.into(),
            direction,
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(category) => write!(
                f,
                "error with file {}: {} exited with code {}: {}",
                self.filename, category, self.exit_code, self.stderr
            ),
            None => write!(
                f,
                "could not {} file {}; Unknown sops error code: {}; message: {}",
                self.direction, self.filename, self.exit_code, self.stderr
            ),
        }
    }
}

impl std::error::Error for ToolFailure {}
