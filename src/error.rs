//! Error types for the ElGamal library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElGamalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElGamalError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Plaintext out of range for modulus")]
    InvalidPlaintext,

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Operation requires the private key")]
    MissingPrivateKey,

    #[error("Padding error: {0}")]
    Padding(String),

    #[error("Unknown padding mode: {0:?}")]
    UnknownPaddingMode(String),

    #[error("Failed to compute modular inverse")]
    ModularInverseError,

    #[error("Empty list provided for batch operation")]
    EmptyBatch,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
