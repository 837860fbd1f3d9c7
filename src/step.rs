//! Mapping wall-clock instants onto TOTP counters.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Length of a TOTP time step, in whole seconds.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StepSize(i64);

impl StepSize {
    /// The [RFC 6238][6238] recommended step of 30 seconds.
    ///
    /// [6238]: https://datatracker.ietf.org/doc/html/rfc6238#section-5.2
    pub const DEFAULT: StepSize = StepSize(30);

    /// # Errors
    ///
    /// Returns [`Error::InvalidStepSize`] if `seconds` is zero or negative.
    pub fn new(seconds: i64) -> Result<Self> {
        if seconds <= 0 {
            return Err(Error::InvalidStepSize(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(self) -> i64 {
        self.0
    }

    /// Counter for a Unix timestamp.
    ///
    /// Division truncates toward zero, so instants in the first step before the epoch map to
    /// counter zero just like those in the first step after it.
    pub fn counter_at(self, unix_seconds: i64) -> i64 {
        unix_seconds / self.0
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Counter for `instant`, using its Unix timestamp in whole seconds.
pub fn time_step(step: StepSize, instant: DateTime<Utc>) -> i64 {
    step.counter_at(instant.timestamp())
}
