//! Error types.

use thiserror::Error;

/// Configuration error type.
///
/// Code generation and validation are total over well-formed inputs, so every variant here is
/// raised while constructing a configuration value, never while generating or checking a code.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum Error {
    /// The requested number of digits was outside of the range [1, 9].
    #[error("invalid digit count {0} (must be between 1 and 9)")]
    InvalidDigits(u8),
    /// The requested time step was zero or negative.
    #[error("invalid step size {0}s (must be positive)")]
    InvalidStepSize(i64),
    /// The shared secret was empty.
    #[error("shared secret must not be empty")]
    EmptySecret,
}

pub type Result<T> = std::result::Result<T, Error>;
