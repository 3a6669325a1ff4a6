//! sops runner
//!
//! Decrypts and encrypts files by running the [sops](https://github.com/getsops/sops)
//! binary, and turns its exit codes into typed errors.
//!
//! Nothing cryptographic happens in this crate. sops does the work; this crate
//! builds its command line, feeds it input, collects its output and decides
//! whether the run succeeded.
//!
//! # Example
//!
//! ```rust,no_run
//! use sops_runner::{DecryptOptions, EncryptOptions, Sops, TracingSink};
//!
//! let sops = Sops::new();
//!
//! let secret = sops
//!     .decrypt("secrets.enc.yaml", &DecryptOptions::default(), Some(&TracingSink))
//!     .unwrap();
//! println!("{}", secret.as_text().unwrap());
//!
//! let encrypted = sops
//!     .encrypt(b"password: hunter2\n", &EncryptOptions::new().input_type("yaml"), None)
//!     .unwrap();
//! assert!(!encrypted.is_empty());
//! ```

pub mod codes;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod runner;

pub use config::{DecodeMode, RunnerConfig};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{Direction, Error, Result, ToolFailure};
pub use runner::{DecryptOptions, EncryptOptions, Plaintext, Sops};
