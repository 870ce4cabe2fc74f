//! Validated key material

use num_bigint::BigUint;
use num_bigint_dig::BigUint as SecretUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{ElGamalError, Result};
use crate::types::ElGamalConfig;
use crate::utils::is_probable_prime;

/// ElGamal public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) p: BigUint, // Prime modulus
    pub(crate) g: BigUint, // Generator
    pub(crate) y: BigUint, // g^x mod p
}

impl PublicKey {
    /// Create a new public key
    pub fn new(p: BigUint, g: BigUint, y: BigUint) -> Self {
        PublicKey { p, g, y }
    }

    /// Get the prime modulus
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the generator
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the public component (g^x mod p)
    pub fn public_component(&self) -> &BigUint {
        &self.y
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }

    /// Order of the multiplicative group, p - 1
    pub(crate) fn group_order(&self) -> BigUint {
        &self.p - BigUint::one()
    }

    /// Validate the public key against `config`
    pub fn validate(&self, config: &ElGamalConfig) -> Result<()> {
        if self.p <= BigUint::from(2u32) || self.p.is_even() {
            return Err(ElGamalError::InvalidKey(
                "Modulus p must be an odd prime".to_string(),
            ));
        }

        if self.bit_size() < config.min_modulus_bits {
            return Err(ElGamalError::InvalidKey(format!(
                "Modulus is {} bits, at least {} required",
                self.bit_size(),
                config.min_modulus_bits
            )));
        }

        if config.primality_test_rounds > 0
            && !is_probable_prime(&self.p, config.primality_test_rounds)
        {
            return Err(ElGamalError::InvalidKey(
                "Modulus p is not prime".to_string(),
            ));
        }

        // 2 <= g <= p - 1
        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(ElGamalError::InvalidKey(
                "Generator g must be in range [2, p - 1]".to_string(),
            ));
        }

        // 1 <= y <= p - 1
        if self.y < BigUint::one() || self.y >= self.p {
            return Err(ElGamalError::InvalidKey(
                "Public component y must be in range [1, p - 1]".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bits)", self.bit_size())
    }
}

/// ElGamal private key.
///
/// The exponent is held as minimal big-endian bytes in wiped storage. Each
/// operation that needs it as a number builds a zeroizing `num-bigint-dig`
/// value for the duration of the call.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    x: Zeroizing<Vec<u8>>, // Secret exponent
}

impl PrivateKey {
    /// Create a new private key.
    ///
    /// `x` itself is not wiped when it is dropped; key material from outside
    /// should go through [`PrivateKey::from_bytes_be`].
    pub fn new(x: BigUint) -> Self {
        let bytes = Zeroizing::new(x.to_bytes_be());
        Self::from_bytes_be(&bytes)
    }

    /// Create a private key from a big-endian magnitude
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        PrivateKey {
            x: Zeroizing::new(bytes[start..].to_vec()),
        }
    }

    /// Minimal big-endian encoding of the secret exponent
    pub fn to_bytes_be(&self) -> Zeroizing<Vec<u8>> {
        self.x.clone()
    }

    fn exponent(&self) -> Zeroizing<SecretUint> {
        Zeroizing::new(SecretUint::from_bytes_be(&self.x))
    }

    /// Check that `x` is in [1, p - 2] and matches the public component
    pub fn validate(&self, public_key: &PublicKey) -> Result<()> {
        if public_key.p < BigUint::from(3u32) {
            return Err(ElGamalError::InvalidKey(
                "Modulus p must be an odd prime".to_string(),
            ));
        }

        let x = self.exponent();
        let upper = to_secret_uint(&(&public_key.p - 2u32));
        if *x < SecretUint::from(1u32) || *x > upper {
            return Err(ElGamalError::InvalidKey(
                "Private exponent x must be in range [1, p - 2]".to_string(),
            ));
        }

        if self.pow_mod(&public_key.g, &public_key.p) != public_key.y {
            return Err(ElGamalError::InvalidKey(
                "Public component y does not equal g^x mod p".to_string(),
            ));
        }

        Ok(())
    }

    /// base^x mod modulus, for results that are safe to publish
    pub(crate) fn pow_mod(&self, base: &BigUint, modulus: &BigUint) -> BigUint {
        if modulus.is_zero() {
            return BigUint::zero();
        }

        let x = self.exponent();
        let result = to_secret_uint(base).modpow(&x, &to_secret_uint(modulus));
        from_secret_uint(&result)
    }

    /// Recover m = c2 * c1^-x mod p.
    ///
    /// Uses c1^-x = c1^(p - 1 - x), which holds for prime p and c1 != 0.
    pub(crate) fn unmask(&self, c1: &BigUint, c2: &BigUint, p: &BigUint) -> BigUint {
        let x = self.exponent();
        let p = to_secret_uint(p);
        let order = &p - &SecretUint::from(1u32);

        let exponent = Zeroizing::new(&order - &*x);
        let mask_inv = Zeroizing::new(to_secret_uint(c1).modpow(&exponent, &p));
        let product = Zeroizing::new(&*mask_inv * &to_secret_uint(c2));

        from_secret_uint(&(&*product % &p))
    }

    /// s = (h - x*r) * k_inv mod order
    pub(crate) fn sign_component(
        &self,
        h: &BigUint,
        r: &BigUint,
        k_inv: &BigUint,
        order: &BigUint,
    ) -> BigUint {
        let x = self.exponent();
        let order = to_secret_uint(order);

        let xr_full = Zeroizing::new(&*x * &to_secret_uint(r));
        let xr = Zeroizing::new(&*xr_full % &order);
        // Shift by the order to stay non-negative
        let shifted = Zeroizing::new(to_secret_uint(h) + &order - &*xr);
        let diff = Zeroizing::new(&*shifted % &order);
        let product = Zeroizing::new(&*diff * &to_secret_uint(k_inv));

        from_secret_uint(&(&*product % &order))
    }
}

fn to_secret_uint(value: &BigUint) -> SecretUint {
    SecretUint::from_bytes_be(&value.to_bytes_be())
}

fn from_secret_uint(value: &SecretUint) -> BigUint {
    BigUint::from_bytes_be(&value.to_bytes_be())
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.x.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(***)")
    }
}

/// ElGamal key pair
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    /// Create a key pair from existing components, deriving y = g^x mod p
    pub fn from_components(p: BigUint, g: BigUint, x: BigUint) -> Self {
        let private_key = PrivateKey::new(x);
        let y = private_key.pow_mod(&g, &p);
        KeyPair {
            public_key: PublicKey { p, g, y },
            private_key,
        }
    }

    /// Validate both halves against `config`
    pub fn validate(&self, config: &ElGamalConfig) -> Result<()> {
        self.public_key.validate(config)?;
        self.private_key.validate(&self.public_key)
    }

    /// Get the bit size of the keys
    pub fn bit_size(&self) -> u64 {
        self.public_key.bit_size()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({} bits)", self.bit_size())
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

    #[test]
    fn test_from_components() {
        let keypair = KeyPair::from_components(
            BigUint::from(467u32),
            BigUint::from(2u32),
            BigUint::from(127u32),
        );
        assert_eq!(
            keypair.public_key.public_component(),
            &BigUint::from(132u32)
        );
        assert!(keypair.validate(&toy_config()).is_ok());
    }

    #[test]
    fn test_key_validation() {
        let config = toy_config();

        // Test invalid public keys
        let even = PublicKey::new(466u32.into(), 2u32.into(), 3u32.into());
        assert!(even.validate(&config).is_err());

        let composite = PublicKey::new(465u32.into(), 2u32.into(), 3u32.into());
        assert!(composite.validate(&config).is_err());

        let bad_generator = PublicKey::new(467u32.into(), 1u32.into(), 3u32.into());
        assert!(bad_generator.validate(&config).is_err());

        let bad_component = PublicKey::new(467u32.into(), 2u32.into(), 467u32.into());
        assert!(bad_component.validate(&config).is_err());

        let good = PublicKey::new(467u32.into(), 2u32.into(), 132u32.into());
        assert!(good.validate(&config).is_ok());
        assert!(matches!(
            good.validate(&ElGamalConfig::default()),
            Err(ElGamalError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_private_key_validation() {
        let public_key = PublicKey::new(467u32.into(), 2u32.into(), 132u32.into());

        assert!(PrivateKey::new(127u32.into()).validate(&public_key).is_ok());
        assert!(PrivateKey::new(128u32.into())
            .validate(&public_key)
            .is_err());
        assert!(PrivateKey::new(0u32.into()).validate(&public_key).is_err());
        assert!(PrivateKey::new(466u32.into())
            .validate(&public_key)
            .is_err());
    }

    #[test]
    fn test_private_key_is_redacted() {
        let key = PrivateKey::new(127u32.into());
        assert_eq!(format!("{:?}", key), "PrivateKey(***)");
        assert_eq!(key.to_string(), "PrivateKey(***)");
    }

    #[test]
    fn test_private_key_zeroize_overwrites_storage() {
        let mut key = PrivateKey::from_bytes_be(&[0x00, 0x12, 0x34, 0x56]);
        assert_eq!(key.to_bytes_be().as_slice(), &[0x12, 0x34, 0x56]);

        let ptr = key.x.as_ptr();
        let capacity = key.x.capacity();
        key.zeroize();

        // The allocation is kept by the cleared Vec, so it is still readable
        let storage = unsafe { std::slice::from_raw_parts(ptr, capacity) };
        assert!(storage.iter().all(|&b| b == 0));
        assert!(key.to_bytes_be().is_empty());
    }

    #[test]
    fn test_private_key_wipes_on_drop() {
        fn assert_zeroize_on_drop<T: ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<PrivateKey>();
        assert_zeroize_on_drop::<Zeroizing<SecretUint>>();
    }

    #[test]
    fn test_secret_arithmetic() {
        let key = PrivateKey::new(127u32.into());
        let p = BigUint::from(467u32);

        assert_eq!(key.pow_mod(&BigUint::from(2u32), &p), BigUint::from(132u32));

        // (29, 375) encrypts 100 under y = 132 with k = 213
        let m = key.unmask(&BigUint::from(29u32), &BigUint::from(375u32), &p);
        assert_eq!(m, BigUint::from(100u32));

        // r = 29, k^-1 = 431 mod 466
        let s = key.sign_component(
            &BigUint::from(100u32),
            &BigUint::from(29u32),
            &BigUint::from(431u32),
            &BigUint::from(466u32),
        );
        assert_eq!(s, BigUint::from(51u32));
    }
}
