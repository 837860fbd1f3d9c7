//! HMAC algorithm selection and digest truncation.

use ring::hmac::{
    self, Key as HmacKey, Tag, HMAC_SHA1_FOR_LEGACY_USE_ONLY, HMAC_SHA256, HMAC_SHA384,
    HMAC_SHA512,
};

use crate::digits::Digits;

mod private {
    /// Marks a trait as being for crate-internal use only.
    pub trait Sealed {}

    impl Sealed for super::Sha1 {}
    impl Sealed for super::Sha256 {}
    impl Sealed for super::Sha384 {}
    impl Sealed for super::Sha512 {}
}

/// Keyed-hash primitive used to compute HOTP digests.
///
/// [RFC 4226][4226] prescribes HMAC-SHA1. [RFC 6238][6238] extends TOTP to HMAC-SHA256 and
/// HMAC-SHA512, and this crate additionally offers HMAC-SHA384. The algorithm is chosen through a
/// type parameter, so the choice is fixed once a key is derived and no dispatch happens per code.
///
/// The trait is sealed: every implementor produces a digest of at least 20 bytes, which is what
/// dynamic truncation needs to stay in bounds for every possible offset.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
/// [6238]: https://datatracker.ietf.org/doc/html/rfc6238
pub trait HashAlgorithm: private::Sealed {
    /// The underlying HMAC algorithm.
    fn algorithm() -> hmac::Algorithm;

    /// Derive a reusable HMAC key from a shared secret.
    fn new_keyed_hash(secret: &[u8]) -> HmacKey {
        HmacKey::new(Self::algorithm(), secret)
    }
}

/// HMAC-SHA1, the [RFC 4226][4226] default.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Sha1;

/// HMAC-SHA256.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Sha256;

/// HMAC-SHA384.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Sha384;

/// HMAC-SHA512.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Sha512;

impl HashAlgorithm for Sha1 {
    fn algorithm() -> hmac::Algorithm {
        HMAC_SHA1_FOR_LEGACY_USE_ONLY
    }
}

impl HashAlgorithm for Sha256 {
    fn algorithm() -> hmac::Algorithm {
        HMAC_SHA256
    }
}

impl HashAlgorithm for Sha384 {
    fn algorithm() -> hmac::Algorithm {
        HMAC_SHA384
    }
}

impl HashAlgorithm for Sha512 {
    fn algorithm() -> hmac::Algorithm {
        HMAC_SHA512
    }
}

/// Dynamic truncation of an HMAC digest.
///
/// # Panics
///
/// Truncating a digest shorter than 20 bytes may index out of bounds. This never happens for tags
/// produced through [`HashAlgorithm`], but could for a hand-built byte slice.
pub trait Digest: AsRef<[u8]> {
    /// Select four bytes of the digest at the offset named by its final nibble and return them as
    /// a 31-bit big-endian integer.
    fn truncate(&self) -> u32 {
        let digest = self.as_ref();
        let len = digest.len();
        debug_assert!(len >= 20);
        let index = (digest[len - 1] & 0xf) as usize;
        let bytes = [
            // Strip leading bit to remove signed/unsigned ambiguity
            digest[index] & 0x7f,
            digest[index + 1],
            digest[index + 2],
            digest[index + 3],
        ];
        u32::from_be_bytes(bytes)
    }

    /// Truncate and reduce modulo the digit count.
    fn code(&self, digits: Digits) -> u32 {
        self.truncate() % digits.modulus()
    }
}

impl Digest for Tag {}

impl Digest for [u8] {}

/// Low-level HMAC of an eight-byte big-endian two's-complement counter.
pub(crate) fn sign(key: &HmacKey, counter: i64) -> Tag {
    hmac::sign(key, &counter.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_section_5_4() {
        let digest: [u8; 20] = [
            0x1f, 0x86, 0x98, 0x69, 0x0e, 0x02, 0xca, 0x16, 0x61, 0x85, 0x50, 0xef, 0x7f, 0x19,
            0xda, 0x8e, 0x94, 0x5b, 0x55, 0x5a,
        ];
        assert_eq!(digest[..].truncate(), 0x50ef7f19);
        assert_eq!(digest[..].code(Digits::new(9).unwrap()), 357872921);
        assert_eq!(digest[..].code(Digits::SIX), 872921);
    }

    #[test]
    fn truncate_clears_sign_bit() {
        let mut digest = [0xff_u8; 20];
        digest[19] = 0xf0;
        assert_eq!(digest[..].truncate(), 0x7fff_ffff);
    }

    #[test]
    fn truncate_max_offset() {
        let mut digest = [0_u8; 20];
        digest[15..19].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        digest[19] = 0x0f;
        assert_eq!(digest[..].truncate(), 0x0102_0304);
    }

    #[test]
    fn test_raw_sha1_digests() {
        let key = Sha1::new_keyed_hash(b"12345678901234567890");
        let expected = [
            0x4c93cf18, 0x41397eea, 0x82fef30, 0x66ef7655, 0x61c5938a, 0x33c083d4, 0x7256c032,
            0x4e5b397, 0x2823443f, 0x2679dc69,
        ];
        for (counter, value) in expected.iter().enumerate() {
            assert_eq!(sign(&key, counter as i64).truncate(), *value);
        }
    }

    #[test]
    fn digest_lengths() {
        let secret = b"12345678901234567890";
        assert_eq!(sign(&Sha1::new_keyed_hash(secret), 0).as_ref().len(), 20);
        assert_eq!(sign(&Sha256::new_keyed_hash(secret), 0).as_ref().len(), 32);
        assert_eq!(sign(&Sha384::new_keyed_hash(secret), 0).as_ref().len(), 48);
        assert_eq!(sign(&Sha512::new_keyed_hash(secret), 0).as_ref().len(), 64);
    }
}
