//! Core types and data structures

use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ElGamalError, Result};
use crate::utils::{modulus_byte_len, to_fixed_bytes_be};

/// Strategy used to embed a byte string into a plaintext residue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaddingMode {
    /// Zero filler followed by a trailing pad-length byte (ANSI X9.23)
    #[default]
    AnsiX923,
    /// Zero bytes prepended to the data
    LeadingZeros,
    /// Zero bytes appended to the data
    TrailingZeros,
    /// No padding: the data is the big-endian magnitude of the plaintext
    BigIntegerPadding,
}

impl PaddingMode {
    pub const ALL: [PaddingMode; 4] = [
        PaddingMode::AnsiX923,
        PaddingMode::LeadingZeros,
        PaddingMode::TrailingZeros,
        PaddingMode::BigIntegerPadding,
    ];

    /// Canonical name used in the key exchange format
    pub fn name(&self) -> &'static str {
        match self {
            PaddingMode::AnsiX923 => "ANSIX923",
            PaddingMode::LeadingZeros => "LeadingZeros",
            PaddingMode::TrailingZeros => "TrailingZeros",
            PaddingMode::BigIntegerPadding => "BigIntegerPadding",
        }
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaddingMode {
    type Err = ElGamalError;

    /// Names are matched exactly (case-sensitive).
    fn from_str(s: &str) -> Result<Self> {
        PaddingMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ElGamalError::UnknownPaddingMode(s.to_string()))
    }
}

/// ElGamal ciphertext (c1, c2)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ciphertext {
    pub(crate) c1: BigUint,
    pub(crate) c2: BigUint,
}

impl Ciphertext {
    /// Create a new ciphertext
    pub fn new(c1: BigUint, c2: BigUint) -> Self {
        Ciphertext { c1, c2 }
    }

    /// Get the first component (g^k mod p)
    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    /// Get the second component (m * y^k mod p)
    pub fn c2(&self) -> &BigUint {
        &self.c2
    }

    /// Serialize as `c1 || c2`, each component left-padded to the modulus byte length
    pub fn to_bytes(&self, modulus: &BigUint) -> Vec<u8> {
        let len = modulus_byte_len(modulus);
        let mut out = to_fixed_bytes_be(&self.c1, len);
        out.extend(to_fixed_bytes_be(&self.c2, len));
        out
    }

    /// Parse `c1 || c2` and check both components are residues mod `modulus`
    pub fn from_bytes(bytes: &[u8], modulus: &BigUint) -> Result<Self> {
        let len = modulus_byte_len(modulus);
        if bytes.len() != 2 * len {
            return Err(ElGamalError::MalformedCiphertext(format!(
                "expected {} bytes, got {}",
                2 * len,
                bytes.len()
            )));
        }

        let (left, right) = bytes.split_at(len);
        let c1 = BigUint::from_bytes_be(left);
        let c2 = BigUint::from_bytes_be(right);

        if &c1 >= modulus || &c2 >= modulus {
            return Err(ElGamalError::MalformedCiphertext(
                "component not reduced modulo p".to_string(),
            ));
        }
        if c1.is_zero() {
            return Err(ElGamalError::MalformedCiphertext(
                "c1 is not a group element".to_string(),
            ));
        }

        Ok(Ciphertext { c1, c2 })
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.c1.to_bytes_be().len() + self.c2.to_bytes_be().len()
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.size_bytes())
    }
}

/// ElGamal signature (r, s)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signature {
    pub(crate) r: BigUint,
    pub(crate) s: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Serialize as `r || s`, each component left-padded to the modulus byte length
    pub fn to_bytes(&self, modulus: &BigUint) -> Vec<u8> {
        let len = modulus_byte_len(modulus);
        let mut out = to_fixed_bytes_be(&self.r, len);
        out.extend(to_fixed_bytes_be(&self.s, len));
        out
    }

    /// Split `r || s`. Range checks are left to verification.
    pub fn from_bytes(bytes: &[u8], modulus: &BigUint) -> Result<Self> {
        let len = modulus_byte_len(modulus);
        if bytes.len() != 2 * len {
            return Err(ElGamalError::MalformedSignature(format!(
                "expected {} bytes, got {}",
                2 * len,
                bytes.len()
            )));
        }

        let (left, right) = bytes.split_at(len);
        Ok(Signature {
            r: BigUint::from_bytes_be(left),
            s: BigUint::from_bytes_be(right),
        })
    }
}

/// Configuration for ElGamal operations
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElGamalConfig {
    /// Smallest accepted modulus, in bits
    pub min_modulus_bits: u64,
    /// Number of Miller-Rabin rounds run on an imported modulus (0 skips the test)
    pub primality_test_rounds: usize,
    /// Bound on ephemeral exponent resampling before giving up on the key
    pub max_ephemeral_attempts: usize,
}

impl Default for ElGamalConfig {
    fn default() -> Self {
        ElGamalConfig {
            min_modulus_bits: 512,
            primality_test_rounds: 20,
            max_ephemeral_attempts: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_mode_names() {
        for mode in PaddingMode::ALL {
            assert_eq!(mode.name().parse::<PaddingMode>().unwrap(), mode);
        }
        assert_eq!(
            "ansix923".parse::<PaddingMode>(),
            Err(ElGamalError::UnknownPaddingMode("ansix923".to_string()))
        );
        assert!("".parse::<PaddingMode>().is_err());
    }

    #[test]
    fn test_ciphertext_layout() {
        let p = BigUint::from(467u32);
        let ct = Ciphertext::new(BigUint::from(29u32), BigUint::from(375u32));

        let bytes = ct.to_bytes(&p);
        assert_eq!(bytes, vec![0x00, 0x1d, 0x01, 0x77]);
        assert_eq!(Ciphertext::from_bytes(&bytes, &p).unwrap(), ct);
    }

    #[test]
    fn test_ciphertext_rejects_bad_input() {
        let p = BigUint::from(467u32);

        // wrong length
        assert!(matches!(
            Ciphertext::from_bytes(&[0x00, 0x1d, 0x01], &p),
            Err(ElGamalError::MalformedCiphertext(_))
        ));
        // c2 = 500 >= p
        assert!(matches!(
            Ciphertext::from_bytes(&[0x00, 0x1d, 0x01, 0xf4], &p),
            Err(ElGamalError::MalformedCiphertext(_))
        ));
        // c1 = 0
        assert!(matches!(
            Ciphertext::from_bytes(&[0x00, 0x00, 0x00, 0x05], &p),
            Err(ElGamalError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_signature_layout() {
        let p = BigUint::from(467u32);
        let sig = Signature::new(BigUint::from(29u32), BigUint::from(51u32));

        let bytes = sig.to_bytes(&p);
        assert_eq!(bytes.len(), 4);
        assert_eq!(Signature::from_bytes(&bytes, &p).unwrap(), sig);
        assert!(matches!(
            Signature::from_bytes(&bytes[1..], &p),
            Err(ElGamalError::MalformedSignature(_))
        ));
    }
}
