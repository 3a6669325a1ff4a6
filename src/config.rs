//! Configuration constants and types for the sops runner.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Binary name looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_SOPS_BINARY: &str = "sops";

/// Path handed to `sops --encrypt` so it reads the payload from stdin.
pub const STDIN_DEVICE: &str = "/dev/stdin";

/// Filename reported in encryption failures.
pub const STDOUT_TARGET: &str = "to stdout";

/// How captured stdout is turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Invalid UTF-8 is an error.
    #[default]
    Strict,
    /// Invalid sequences become U+FFFD. Only for callers that knowingly
    /// round-trip already-broken bytes.
    Lossy,
}

/// Settings shared by every invocation made through one [`crate::Sops`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// sops executable, either a bare name resolved on `PATH` or a path.
    pub binary: PathBuf,

    /// `--input-type` used when a call does not pass its own.
    pub input_type: Option<String>,

    /// `--output-type` used when a call does not pass its own.
    pub output_type: Option<String>,

    /// Decoding applied to decrypted output when text is requested.
    pub decode_mode: DecodeMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_SOPS_BINARY),
            input_type: None,
            output_type: None,
            decode_mode: DecodeMode::Strict,
        }
    }
}

impl RunnerConfig {
    /// Configuration running the given sops executable.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.binary.as_os_str().is_empty() {
            return Err(Error::Config("sops binary must not be empty".to_string()));
        }
        for (flag, value) in [
            ("input_type", &self.input_type),
            ("output_type", &self.output_type),
        ] {
            if matches!(value, Some(v) if v.is_empty()) {
                return Err(Error::Config(format!("{} must not be empty", flag)));
            }
        }
        Ok(())
    }
}
