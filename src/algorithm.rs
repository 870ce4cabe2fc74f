//! Byte-oriented ElGamal algorithm interface

use log::debug;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::encryption::ElGamalManaged;
use crate::error::Result;
use crate::homomorphic::HomomorphicOperations;
use crate::padding::BlockLayout;
use crate::params::ElGamalParameters;
use crate::types::{Ciphertext, ElGamalConfig, PaddingMode, Signature};
use crate::xml;

/// An ElGamal implementation working on serialized ciphertexts and signatures.
///
/// Ciphertexts are `c1 || c2` and signatures `r || s`, each half left-padded to
/// the byte length of the modulus.
pub trait ElGamalAlgorithm {
    /// Validate and adopt `parameters` as the active key
    fn import_parameters(&mut self, parameters: &ElGamalParameters) -> Result<()>;

    /// Snapshot of the active key; `x` is empty unless `include_private` is set
    fn export_parameters(&self, include_private: bool) -> Result<ElGamalParameters>;

    fn encrypt_big_integer(&self, plaintext: &BigUint) -> Result<Vec<u8>>;

    fn decrypt_big_integer(&self, ciphertext: &[u8]) -> Result<BigUint>;

    fn sign(&self, hash: &[u8]) -> Result<Vec<u8>>;

    /// `Ok(false)` on mismatch; errors only on structurally invalid input
    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> Result<bool>;

    /// Homomorphic product of two ciphertexts
    fn multiply(&self, first: &[u8], second: &[u8]) -> Result<Vec<u8>>;

    fn padding(&self) -> PaddingMode;

    fn set_padding(&mut self, padding: PaddingMode);

    /// Bit length of the modulus
    fn key_size(&self) -> u64;

    fn to_xml_string(&self, include_private: bool) -> Result<String> {
        let parameters = self.export_parameters(include_private)?;
        Ok(xml::to_xml_string(&parameters))
    }

    fn from_xml_string(&mut self, xml: &str) -> Result<()> {
        let parameters = xml::from_xml_string(xml)?;
        self.import_parameters(&parameters)
    }

    /// Pad `data` into one block with the active padding mode and encrypt it
    fn encrypt_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let layout = BlockLayout::for_modulus_bits(self.key_size());
        let plaintext = self.padding().encode(data, &layout)?;
        self.encrypt_big_integer(&plaintext)
    }

    /// Inverse of [`ElGamalAlgorithm::encrypt_data`]
    fn decrypt_data(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let layout = BlockLayout::for_modulus_bits(self.key_size());
        let plaintext = self.decrypt_big_integer(ciphertext)?;
        self.padding().decode(&plaintext, &layout)
    }

    /// Sign the SHA-256 digest of `message`
    fn sign_data(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.sign(&Sha256::digest(message))
    }

    /// Verify a signature made by [`ElGamalAlgorithm::sign_data`]
    fn verify_data(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        self.verify_signature(&Sha256::digest(message), signature)
    }
}

impl ElGamalAlgorithm for ElGamalManaged {
    fn import_parameters(&mut self, parameters: &ElGamalParameters) -> Result<()> {
        let (public_key, private_key) = parameters.to_keys(self.config())?;
        debug!(
            "re-imported {}-bit key (private: {}, padding: {})",
            public_key.bit_size(),
            private_key.is_some(),
            parameters.padding
        );

        self.replace_keys(public_key, private_key, parameters.padding);
        Ok(())
    }

    fn export_parameters(&self, include_private: bool) -> Result<ElGamalParameters> {
        let private_key = if include_private {
            Some(self.private_key()?)
        } else {
            None
        };

        Ok(ElGamalParameters::from_keys(
            &self.public_key,
            private_key,
            self.padding,
        ))
    }

    fn encrypt_big_integer(&self, plaintext: &BigUint) -> Result<Vec<u8>> {
        let ciphertext = self.encrypt(plaintext)?;
        Ok(ciphertext.to_bytes(&self.public_key.p))
    }

    fn decrypt_big_integer(&self, ciphertext: &[u8]) -> Result<BigUint> {
        // Report a missing key before looking at the input
        self.private_key()?;
        let ciphertext = Ciphertext::from_bytes(ciphertext, &self.public_key.p)?;
        self.decrypt(&ciphertext)
    }

    fn sign(&self, hash: &[u8]) -> Result<Vec<u8>> {
        let signature = self.sign_digest(hash)?;
        Ok(signature.to_bytes(&self.public_key.p))
    }

    fn verify_signature(&self, hash: &[u8], signature: &[u8]) -> Result<bool> {
        let signature = Signature::from_bytes(signature, &self.public_key.p)?;
        Ok(self.verify(hash, &signature))
    }

    fn multiply(&self, first: &[u8], second: &[u8]) -> Result<Vec<u8>> {
        let p = &self.public_key.p;
        let first = Ciphertext::from_bytes(first, p)?;
        let second = Ciphertext::from_bytes(second, p)?;

        let product = self.homomorphic_multiply(&first, &second)?;
        Ok(product.to_bytes(p))
    }

    fn padding(&self) -> PaddingMode {
        self.padding
    }

    fn set_padding(&mut self, padding: PaddingMode) {
        self.padding = padding;
    }

    fn key_size(&self) -> u64 {
        self.public_key.bit_size()
    }
}

impl ElGamalManaged {
    /// Import a key from the canonical XML format with the default configuration
    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::from_parameters(&xml::from_xml_string(xml)?)
    }

    /// Import a key from the canonical XML format, validating against `config`
    pub fn from_xml_with_config(xml: &str, config: ElGamalConfig) -> Result<Self> {
        Self::with_config(&xml::from_xml_string(xml)?, config)
    }
}
