//! Core ElGamal encryption and decryption operations

use log::{debug, warn};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{ElGamalError, Result};
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::params::ElGamalParameters;
use crate::types::{Ciphertext, ElGamalConfig, PaddingMode};
use crate::utils::{mod_exp, random_in_range};

/// ElGamal engine backed by `num-bigint` arithmetic.
///
/// Holds a validated public key and, for full keys, the private exponent.
/// A public-only engine can encrypt, verify and multiply; decryption and
/// signing need the private key.
#[derive(Clone, Debug)]
pub struct ElGamalManaged {
    pub(crate) public_key: PublicKey,
    pub(crate) private_key: Option<PrivateKey>,
    pub(crate) padding: PaddingMode,
    config: ElGamalConfig,
}

impl ElGamalManaged {
    /// Import `parameters` with the default configuration
    pub fn from_parameters(parameters: &ElGamalParameters) -> Result<Self> {
        Self::with_config(parameters, ElGamalConfig::default())
    }

    /// Import `parameters`, validating them against `config`
    pub fn with_config(parameters: &ElGamalParameters, config: ElGamalConfig) -> Result<Self> {
        let (public_key, private_key) = parameters.to_keys(&config)?;
        debug!(
            "imported {}-bit key (private: {}, padding: {})",
            public_key.bit_size(),
            private_key.is_some(),
            parameters.padding
        );

        Ok(ElGamalManaged {
            public_key,
            private_key,
            padding: parameters.padding,
            config,
        })
    }

    /// Build a full engine from an existing key pair
    pub fn from_key_pair(
        keypair: KeyPair,
        padding: PaddingMode,
        config: ElGamalConfig,
    ) -> Result<Self> {
        keypair.validate(&config)?;
        let KeyPair {
            public_key,
            private_key,
        } = keypair;

        Ok(ElGamalManaged {
            public_key,
            private_key: Some(private_key),
            padding,
            config,
        })
    }

    /// Build a public-only engine
    pub fn from_public_key(
        public_key: PublicKey,
        padding: PaddingMode,
        config: ElGamalConfig,
    ) -> Result<Self> {
        public_key.validate(&config)?;
        Ok(ElGamalManaged {
            public_key,
            private_key: None,
            padding,
            config,
        })
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Whether the private exponent is loaded
    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// Get the configuration
    pub fn config(&self) -> &ElGamalConfig {
        &self.config
    }

    pub(crate) fn private_key(&self) -> Result<&PrivateKey> {
        self.private_key
            .as_ref()
            .ok_or(ElGamalError::MissingPrivateKey)
    }

    pub(crate) fn replace_keys(
        &mut self,
        public_key: PublicKey,
        private_key: Option<PrivateKey>,
        padding: PaddingMode,
    ) {
        self.public_key = public_key;
        self.private_key = private_key;
        self.padding = padding;
    }

    /// Draw a fresh k in [2, p - 2] with gcd(k, p - 1) = 1
    pub(crate) fn random_ephemeral(&self) -> Result<BigUint> {
        let order = self.public_key.group_order();
        let low = BigUint::from(2u32);
        if order <= low {
            return Err(ElGamalError::InvalidKey(
                "Modulus too small for ephemeral exponents".to_string(),
            ));
        }

        for _ in 0..self.config.max_ephemeral_attempts {
            let k = random_in_range(&low, &order);
            if k.gcd(&order).is_one() {
                return Ok(k);
            }
        }

        warn!(
            "no ephemeral exponent coprime with p - 1 after {} attempts",
            self.config.max_ephemeral_attempts
        );
        Err(ElGamalError::InvalidKey(
            "Could not find an ephemeral exponent coprime with p - 1".to_string(),
        ))
    }

    /// Check a caller-supplied k: 1 <= k <= p - 2 and gcd(k, p - 1) = 1
    pub(crate) fn check_ephemeral(&self, k: &BigUint) -> Result<()> {
        let order = self.public_key.group_order();
        if k < &BigUint::one() || k >= &order {
            return Err(ElGamalError::InvalidParameter(
                "Ephemeral exponent must be in range [1, p - 2]".to_string(),
            ));
        }
        if !k.gcd(&order).is_one() {
            return Err(ElGamalError::InvalidParameter(
                "Ephemeral exponent must be coprime with p - 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Encrypt a plaintext integer in [0, p)
    pub fn encrypt(&self, plaintext: &BigUint) -> Result<Ciphertext> {
        if plaintext >= &self.public_key.p {
            return Err(ElGamalError::InvalidPlaintext);
        }

        let k = self.random_ephemeral()?;
        Ok(self.encrypt_raw(plaintext, &k))
    }

    /// Encrypt with a caller-chosen ephemeral exponent.
    ///
    /// Reusing `k` for two plaintexts under the same key reveals their ratio;
    /// this exists for reproducible test vectors.
    pub fn encrypt_with_ephemeral(&self, plaintext: &BigUint, k: &BigUint) -> Result<Ciphertext> {
        if plaintext >= &self.public_key.p {
            return Err(ElGamalError::InvalidPlaintext);
        }
        self.check_ephemeral(k)?;

        Ok(self.encrypt_raw(plaintext, k))
    }

    fn encrypt_raw(&self, plaintext: &BigUint, k: &BigUint) -> Ciphertext {
        let p = &self.public_key.p;

        let c1 = mod_exp(&self.public_key.g, k, p);
        let y_k = mod_exp(&self.public_key.y, k, p);
        let c2 = (plaintext * y_k) % p;

        Ciphertext::new(c1, c2)
    }

    /// Decrypt a ciphertext with the loaded private key
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        let private_key = self.private_key()?;
        let p = &self.public_key.p;

        if &ciphertext.c1 >= p || &ciphertext.c2 >= p {
            return Err(ElGamalError::MalformedCiphertext(
                "component not reduced modulo p".to_string(),
            ));
        }

        // c1 = 0 has no inverse
        if ciphertext.c1.is_zero() {
            return Err(ElGamalError::ModularInverseError);
        }

        Ok(private_key.unmask(&ciphertext.c1, &ciphertext.c2, p))
    }

    /// Re-randomize a ciphertext (produces a different encryption of the same plaintext)
    pub fn rerandomize(&self, ciphertext: &Ciphertext) -> Result<Ciphertext> {
        let p = &self.public_key.p;
        let r = self.random_ephemeral()?;

        let g_r = mod_exp(&self.public_key.g, &r, p);
        let c1 = (&ciphertext.c1 * g_r) % p;

        let y_r = mod_exp(&self.public_key.y, &r, p);
        let c2 = (&ciphertext.c2 * y_r) % p;

        Ok(Ciphertext::new(c1, c2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_config() -> ElGamalConfig {
        ElGamalConfig {
            min_modulus_bits: 8,
            ..ElGamalConfig::default()
        }
    }

    fn toy_engine() -> ElGamalManaged {
        let keypair = KeyPair::from_components(467u32.into(), 2u32.into(), 127u32.into());
        ElGamalManaged::from_key_pair(keypair, PaddingMode::BigIntegerPadding, toy_config())
            .unwrap()
    }

    #[test]
    fn test_known_vector() {
        let elgamal = toy_engine();
        assert_eq!(
            elgamal.public_key().public_component(),
            &BigUint::from(132u32)
        );

        let ct = elgamal
            .encrypt_with_ephemeral(&BigUint::from(100u32), &BigUint::from(213u32))
            .unwrap();
        assert_eq!(ct.c1(), &BigUint::from(29u32));
        assert_eq!(ct.c2(), &BigUint::from(375u32));

        assert_eq!(elgamal.decrypt(&ct).unwrap(), BigUint::from(100u32));
    }

    #[test]
    fn test_encryption_decryption() {
        let elgamal = toy_engine();

        for m in [0u32, 1, 2, 42, 100, 466] {
            let plaintext = BigUint::from(m);
            let ciphertext = elgamal.encrypt(&plaintext).unwrap();
            assert_eq!(elgamal.decrypt(&ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_plaintext_range() {
        let elgamal = toy_engine();
        assert_eq!(
            elgamal.encrypt(&BigUint::from(467u32)),
            Err(ElGamalError::InvalidPlaintext)
        );
    }

    #[test]
    fn test_ephemeral_checks() {
        let elgamal = toy_engine();
        let m = BigUint::from(5u32);

        // gcd(2, 466) = 2
        assert!(matches!(
            elgamal.encrypt_with_ephemeral(&m, &BigUint::from(2u32)),
            Err(ElGamalError::InvalidParameter(_))
        ));
        assert!(matches!(
            elgamal.encrypt_with_ephemeral(&m, &BigUint::from(466u32)),
            Err(ElGamalError::InvalidParameter(_))
        ));

        for _ in 0..50 {
            let k = elgamal.random_ephemeral().unwrap();
            assert!(elgamal.check_ephemeral(&k).is_ok());
            assert!(k >= BigUint::from(2u32));
        }
    }

    #[test]
    fn test_ephemeral_exhaustion() {
        let config = ElGamalConfig {
            max_ephemeral_attempts: 0,
            ..toy_config()
        };
        let keypair = KeyPair::from_components(467u32.into(), 2u32.into(), 127u32.into());
        let elgamal =
            ElGamalManaged::from_key_pair(keypair, PaddingMode::AnsiX923, config).unwrap();

        assert!(matches!(
            elgamal.encrypt(&BigUint::from(5u32)),
            Err(ElGamalError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_public_only_cannot_decrypt() {
        let full = toy_engine();
        let public = ElGamalManaged::from_public_key(
            full.public_key().clone(),
            PaddingMode::AnsiX923,
            toy_config(),
        )
        .unwrap();

        let ct = public.encrypt(&BigUint::from(9u32)).unwrap();
        assert_eq!(public.decrypt(&ct), Err(ElGamalError::MissingPrivateKey));
        assert_eq!(full.decrypt(&ct).unwrap(), BigUint::from(9u32));
    }

    #[test]
    fn test_decrypt_across_ephemerals() {
        let elgamal = toy_engine();
        let m = BigUint::from(250u32);

        // Includes both ends of [1, p - 2]
        for k in [1u32, 3, 5, 231, 463, 465] {
            let ct = elgamal
                .encrypt_with_ephemeral(&m, &BigUint::from(k))
                .unwrap();
            assert_eq!(elgamal.decrypt(&ct).unwrap(), m);
        }

        let zero_mask = Ciphertext::new(BigUint::from(0u32), BigUint::from(7u32));
        assert_eq!(
            elgamal.decrypt(&zero_mask),
            Err(ElGamalError::ModularInverseError)
        );
    }

    #[test]
    fn test_rerandomization() {
        let elgamal = toy_engine();

        let plaintext = BigUint::from(42u32);
        let ct1 = elgamal.encrypt(&plaintext).unwrap();
        let ct2 = elgamal.rerandomize(&ct1).unwrap();

        let dec1 = elgamal.decrypt(&ct1).unwrap();
        let dec2 = elgamal.decrypt(&ct2).unwrap();
        assert_eq!(dec1, dec2);
        assert_eq!(plaintext, dec1);
    }
}
