//! Running the sops binary.
//!
//! Each call spawns one sops process, feeds it (for encryption), waits for it
//! to exit, and turns the exit status into either the captured output or an
//! [`crate::Error`]. Calls block until sops exits; there is no timeout.

mod options;
mod process;
mod sops;

pub use options::{DecryptOptions, EncryptOptions, Plaintext};
pub use sops::Sops;
