//! HMAC-based one-time passwords ([RFC 4226][4226]) and their time-based variant
//! ([RFC 6238][6238]), with window validation that refuses replayed codes.
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use totp_validator::{Digits, TotpValidator};
//!
//! let now = Utc.timestamp_opt(1111111109, 0).unwrap();
//! let validator = TotpValidator::builder(b"12345678901234567890")
//!     .past_tolerance(Duration::seconds(30))
//!     .future_tolerance(Duration::seconds(30))
//!     .build()
//!     .unwrap();
//!
//! let code = validator.code_at(now);
//! assert_eq!(Digits::SIX.pad(code).to_string(), "081804");
//!
//! // The caller owns the replay floor and only advances it on success.
//! let mut last_accepted = 0;
//! let result = validator.validate(now, code, last_accepted);
//! assert!(result.matched());
//! last_accepted = result.counter();
//!
//! assert!(!validator.validate(now, code, last_accepted).matched());
//! ```
//!
//! [4226]: https://datatracker.ietf.org/doc/html/rfc4226
//! [6238]: https://datatracker.ietf.org/doc/html/rfc6238

use chrono::{DateTime, Utc};

pub mod digest;
pub mod digits;
pub mod error;
pub mod step;
pub mod validator;

pub use digest::{HashAlgorithm, Sha1, Sha256, Sha384, Sha512};
pub use digits::Digits;
pub use error::{Error, Result};
pub use step::{time_step, StepSize};
pub use validator::{Builder, TotpValidator, Validation};

use crate::digest::Digest as _;

/// Synchronized moving counter.
///
/// [RFC 4226][4226] describes an "8-byte synchronized moving counter." The counter is hashed as
/// an eight-byte big-endian two's-complement integer, so negative values are accepted and hash to
/// their bit pattern. To allow for more sophisticated forms of counters (including in custom
/// structs, etc.), the `Counter` and [`CounterBytes`] traits are exposed.
///
/// `Counter` is implemented for `i64`, for `u64` (reinterpreted bit for bit, so `u64::MAX` and
/// `-1` are the same counter), and for any [`CounterBytes`].
///
/// [4226]: https://tools.ietf.org/html/rfc4226
pub trait Counter {
    /// The counter value as a signed eight-byte integer.
    fn value(&self) -> i64;
}

/// Raw synchronized moving counter.
///
/// The byte array is read as a big-endian integer. See [`Counter`] for more information.
pub trait CounterBytes {
    /// The counter value as an array of bytes.
    fn value(&self) -> [u8; 8];
}

impl CounterBytes for [u8; 8] {
    fn value(&self) -> [u8; 8] {
        *self
    }
}

impl<T: CounterBytes> Counter for T {
    fn value(&self) -> i64 {
        i64::from_be_bytes(CounterBytes::value(self))
    }
}

impl Counter for i64 {
    fn value(&self) -> i64 {
        *self
    }
}

impl Counter for u64 {
    fn value(&self) -> i64 {
        i64::from_be_bytes(self.to_be_bytes())
    }
}

/// Computes an HOTP code for the given secret and counter.
///
/// The result lies in `0..digits.modulus()` and is not padded; use [`Digits::pad`] for display.
/// This function is total: any secret, including an empty one, and any counter produce a code.
pub fn hotp<H: HashAlgorithm, C: Counter>(
    _algorithm: H,
    secret: &[u8],
    digits: Digits,
    counter: C,
) -> u32 {
    let key = H::new_keyed_hash(secret);
    digest::sign(&key, counter.value()).code(digits)
}

/// Computes a TOTP code for the time step containing `instant`.
pub fn totp<H: HashAlgorithm>(
    algorithm: H,
    secret: &[u8],
    digits: Digits,
    step: StepSize,
    instant: DateTime<Utc>,
) -> u32 {
    hotp(algorithm, secret, digits, time_step(step, instant))
}
