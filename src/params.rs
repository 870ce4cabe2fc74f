//! Byte-level parameter snapshots used for import and export

use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::keys::{PrivateKey, PublicKey};
use crate::types::{ElGamalConfig, PaddingMode};

/// Key material as big-endian byte strings.
///
/// An empty `x` marks a public-only snapshot. The buffer holding `x` is wiped
/// when the snapshot is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ElGamalParameters {
    pub p: Vec<u8>,
    pub g: Vec<u8>,
    pub y: Vec<u8>,
    pub x: Zeroizing<Vec<u8>>,
    pub padding: PaddingMode,
}

impl ElGamalParameters {
    /// Snapshot of `public_key`, plus `private_key` when given
    pub fn from_keys(
        public_key: &PublicKey,
        private_key: Option<&PrivateKey>,
        padding: PaddingMode,
    ) -> Self {
        ElGamalParameters {
            p: public_key.p.to_bytes_be(),
            g: public_key.g.to_bytes_be(),
            y: public_key.y.to_bytes_be(),
            x: private_key
                .map(PrivateKey::to_bytes_be)
                .unwrap_or_else(|| Zeroizing::new(Vec::new())),
            padding,
        }
    }

    /// Whether the snapshot carries the private exponent
    pub fn has_private_key(&self) -> bool {
        !self.x.is_empty()
    }

    /// Decode and validate the snapshot.
    ///
    /// Empty `p`, `g` or `y` decode to zero and are rejected by validation.
    pub fn to_keys(&self, config: &ElGamalConfig) -> Result<(PublicKey, Option<PrivateKey>)> {
        let public_key = PublicKey::new(
            BigUint::from_bytes_be(&self.p),
            BigUint::from_bytes_be(&self.g),
            BigUint::from_bytes_be(&self.y),
        );
        public_key.validate(config)?;

        if !self.has_private_key() {
            return Ok((public_key, None));
        }

        // Dropped, and therefore zeroized, if validation fails
        let private_key = PrivateKey::from_bytes_be(&self.x);
        private_key.validate(&public_key)?;

        Ok((public_key, Some(private_key)))
    }

    /// Public-only copy of this snapshot
    pub fn public_only(&self) -> Self {
        ElGamalParameters {
            x: Zeroizing::new(Vec::new()),
            ..self.clone()
        }
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        BigUint::from_bytes_be(&self.p).is_zero()
    }
}

impl fmt::Debug for ElGamalParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElGamalParameters")
            .field("p", &self.p.len())
            .field("g", &self.g.len())
            .field("y", &self.y.len())
            .field("x", &if self.has_private_key() { "***" } else { "" })
            .field("padding", &self.padding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElGamalError;
    use crate::keys::KeyPair;

    fn toy_config() -> ElGamalConfig {
        ElGamalConfig {
            min_modulus_bits: 8,
            ..ElGamalConfig::default()
        }
    }

    fn toy_keypair() -> KeyPair {
        KeyPair::from_components(467u32.into(), 2u32.into(), 127u32.into())
    }

    #[test]
    fn test_snapshot_bytes() {
        let keypair = toy_keypair();
        let params = ElGamalParameters::from_keys(
            &keypair.public_key,
            Some(&keypair.private_key),
            PaddingMode::LeadingZeros,
        );

        assert_eq!(params.p, vec![0x01, 0xd3]);
        assert_eq!(params.g, vec![0x02]);
        assert_eq!(params.y, vec![0x84]);
        assert_eq!(params.x.as_slice(), &[0x7f]);
        assert!(params.has_private_key());

        let public = params.public_only();
        assert!(!public.has_private_key());
        assert_eq!(public.p, params.p);
        assert_eq!(public.padding, PaddingMode::LeadingZeros);
    }

    #[test]
    fn test_to_keys() {
        let keypair = toy_keypair();
        let params = ElGamalParameters::from_keys(
            &keypair.public_key,
            Some(&keypair.private_key),
            PaddingMode::AnsiX923,
        );

        let (public_key, private_key) = params.to_keys(&toy_config()).unwrap();
        assert_eq!(public_key, keypair.public_key);
        assert_eq!(private_key.unwrap().to_bytes_be().as_slice(), &[0x7f]);

        let (_, private_key) = params.public_only().to_keys(&toy_config()).unwrap();
        assert!(private_key.is_none());
    }

    #[test]
    fn test_to_keys_rejects_inconsistent_exponent() {
        let keypair = toy_keypair();
        let mut params = ElGamalParameters::from_keys(
            &keypair.public_key,
            Some(&keypair.private_key),
            PaddingMode::AnsiX923,
        );
        params.x = Zeroizing::new(vec![0x7e]);

        assert!(matches!(
            params.to_keys(&toy_config()),
            Err(ElGamalError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_empty_parameters_are_invalid() {
        let params = ElGamalParameters::default();
        assert!(params.is_degenerate());
        assert!(matches!(
            params.to_keys(&toy_config()),
            Err(ElGamalError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_exponent() {
        let keypair = toy_keypair();
        let params = ElGamalParameters::from_keys(
            &keypair.public_key,
            Some(&keypair.private_key),
            PaddingMode::AnsiX923,
        );
        let rendered = format!("{:?}", params);
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("127"));
    }
}
