//! Per-call options and results.

use crate::config::DecodeMode;
use std::path::PathBuf;

/// Options for [`crate::Sops::decrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptOptions {
    /// Passed as `--input-type`.
    pub input_type: Option<String>,
    /// Passed as `--output-type`.
    pub output_type: Option<String>,
    /// Return text instead of raw bytes.
    pub decode_output: bool,
    /// Strip trailing whitespace from decoded text.
    pub rstrip: bool,
    /// Overrides the runner's decode mode for this call.
    pub decode_mode: Option<DecodeMode>,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        Self {
            input_type: None,
            output_type: None,
            decode_output: true,
            rstrip: true,
            decode_mode: None,
        }
    }
}

impl DecryptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the output exactly as sops wrote it.
    pub fn raw() -> Self {
        Self {
            decode_output: false,
            rstrip: false,
            ..Self::default()
        }
    }

    pub fn input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn output_type(mut self, output_type: impl Into<String>) -> Self {
        self.output_type = Some(output_type.into());
        self
    }

    pub fn decode_output(mut self, decode_output: bool) -> Self {
        self.decode_output = decode_output;
        self
    }

    pub fn rstrip(mut self, rstrip: bool) -> Self {
        self.rstrip = rstrip;
        self
    }

    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = Some(mode);
        self
    }
}

/// Options for [`crate::Sops::encrypt`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptOptions {
    /// Passed as `--input-type`.
    pub input_type: Option<String>,
    /// Passed as `--output-type`.
    pub output_type: Option<String>,
    /// Working directory for sops, which is where it looks for `.sops.yaml`.
    pub cwd: Option<PathBuf>,
}

impl EncryptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn output_type(mut self, output_type: impl Into<String>) -> Self {
        self.output_type = Some(output_type.into());
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Decrypted file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plaintext {
    /// Decoded (and possibly trimmed) text.
    Text(String),
    /// Raw bytes, untouched.
    Bytes(Vec<u8>),
}

impl Plaintext {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Plaintext::Text(text) => text.as_bytes(),
            Plaintext::Bytes(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Plaintext::Text(text) => Some(text),
            Plaintext::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Plaintext::Text(text) => text.into_bytes(),
            Plaintext::Bytes(bytes) => bytes,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Plaintext::Text(text) => Some(text),
            Plaintext::Bytes(_) => None,
        }
    }
}
