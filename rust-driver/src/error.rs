//! Error types for the usNIC stub driver.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Result type for stub driver operations.
pub type Result<T> = std::result::Result<T, StubError>;

/// Errors raised while inspecting sysfs.
///
/// None of these escape the probe or registration entry points, they are
/// folded into "no device" there.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StubError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Directory enumeration error
    #[error("Directory error: {0}")]
    Nix(#[from] nix::Error),

    /// Attribute value filled the whole buffer, leaving no room for a terminator
    #[error("Attribute value truncated: {}", path.display())]
    Truncated {
        /// Attribute that was read
        path: PathBuf,
    },
}
