//! # ElGamal Cryptosystem Library
//!
//! ElGamal over the multiplicative group modulo a large prime, with:
//! - Encryption and decryption of arbitrary-precision integers
//! - Signatures over caller-supplied hash digests
//! - Homomorphic multiplication of ciphertexts without the private key
//! - Four padding modes for embedding byte strings into plaintexts
//! - A canonical XML key exchange format
//!
//! Key generation is out of scope: keys are imported from parameters produced
//! elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use elgamal_ext::{ElGamalAlgorithm, ElGamalConfig, ElGamalManaged, KeyPair, PaddingMode};
//! use num_bigint::BigUint;
//!
//! let config = ElGamalConfig { min_modulus_bits: 8, ..ElGamalConfig::default() };
//! let keypair = KeyPair::from_components(467u32.into(), 2u32.into(), 127u32.into());
//! let elgamal = ElGamalManaged::from_key_pair(keypair, PaddingMode::AnsiX923, config).unwrap();
//!
//! // Encrypt values
//! let ct1 = elgamal.encrypt_big_integer(&BigUint::from(10u32)).unwrap();
//! let ct2 = elgamal.encrypt_big_integer(&BigUint::from(20u32)).unwrap();
//!
//! // Multiply under encryption
//! let product = elgamal.multiply(&ct1, &ct2).unwrap();
//!
//! // Decrypt result
//! let result = elgamal.decrypt_big_integer(&product).unwrap();
//! assert_eq!(result, BigUint::from(200u32));
//! ```

pub mod algorithm;
pub mod encryption;
pub mod error;
pub mod homomorphic;
pub mod keys;
pub mod padding;
pub mod params;
pub mod signature;
pub mod types;
pub mod utils;
pub mod xml;

// Re-export main types for convenience
pub use algorithm::ElGamalAlgorithm;
pub use encryption::ElGamalManaged;
pub use error::{ElGamalError, Result};
pub use homomorphic::HomomorphicOperations;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use padding::{BlockLayout, PaddingScheme};
pub use params::ElGamalParameters;
pub use types::{Ciphertext, ElGamalConfig, PaddingMode, Signature};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_basic_workflow() {
        let config = ElGamalConfig {
            min_modulus_bits: 8,
            ..ElGamalConfig::default()
        };
        let keypair = KeyPair::from_components(467u32.into(), 2u32.into(), 127u32.into());
        let elgamal =
            ElGamalManaged::from_key_pair(keypair, PaddingMode::AnsiX923, config).unwrap();

        let m = BigUint::from(42u32);
        let ct = elgamal.encrypt_big_integer(&m).unwrap();
        let decrypted = elgamal.decrypt_big_integer(&ct).unwrap();

        assert_eq!(m, decrypted);
    }

    #[test]
    fn test_engine_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ElGamalManaged>();
    }
}
