//! Code length, expressed as a decimal modulus.

use std::fmt;

use crate::error::{Error, Result};

const MAX_DIGITS: u8 = 9;

/// Number of decimal digits in a generated code.
///
/// Internally this is the modulus applied to the 31-bit truncated digest, so six digits is stored
/// as `1_000_000`. Since the truncated value never exceeds `2^31 - 1`, anything beyond nine digits
/// would not reduce the value at all; [`Digits::new`] therefore accepts 1 through 9.
///
/// [RFC 4226][4226] requires at least six digits for HOTP. Shorter codes are permitted here for
/// interoperability but are not recommended.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Digits {
    count: u8,
    modulus: u32,
}

impl Digits {
    pub const SIX: Digits = Digits {
        count: 6,
        modulus: 1_000_000,
    };
    pub const SEVEN: Digits = Digits {
        count: 7,
        modulus: 10_000_000,
    };
    pub const EIGHT: Digits = Digits {
        count: 8,
        modulus: 100_000_000,
    };

    /// Creates a digit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDigits`] unless `1 <= count <= 9`.
    pub fn new(count: u8) -> Result<Self> {
        if !(1..=MAX_DIGITS).contains(&count) {
            return Err(Error::InvalidDigits(count));
        }
        Ok(Self {
            count,
            modulus: 10_u32.pow(count.into()),
        })
    }

    /// Number of decimal digits.
    pub fn count(self) -> u8 {
        self.count
    }

    /// The value codes are reduced by, `10^count`.
    pub fn modulus(self) -> u32 {
        self.modulus
    }

    /// Render `code` left-padded with zeroes to the full digit count.
    pub fn pad(self, code: u32) -> Padded {
        Padded { code, digits: self }
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self::SIX
    }
}

/// Zero-padded display form of a code. See [`Digits::pad`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Padded {
    code: u32,
    digits: Digits,
}

impl fmt::Display for Padded {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:0width$}", self.code, width = self.digits.count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_constructor() {
        assert_eq!(Digits::new(6), Ok(Digits::SIX));
        assert_eq!(Digits::new(7), Ok(Digits::SEVEN));
        assert_eq!(Digits::new(8), Ok(Digits::EIGHT));
        assert_eq!(Digits::default(), Digits::SIX);
    }

    #[test]
    fn out_of_range() {
        assert_eq!(Digits::new(0), Err(Error::InvalidDigits(0)));
        assert_eq!(Digits::new(10), Err(Error::InvalidDigits(10)));
    }

    #[test]
    fn bounds() {
        assert_eq!(Digits::new(1).map(Digits::modulus), Ok(10));
        assert_eq!(Digits::new(9).map(Digits::modulus), Ok(1_000_000_000));
    }

    #[test]
    fn padding() {
        assert_eq!(Digits::SIX.pad(81804).to_string(), "081804");
        assert_eq!(Digits::EIGHT.pad(7081804).to_string(), "07081804");
        assert_eq!(Digits::SIX.pad(755224).to_string(), "755224");
    }
}
