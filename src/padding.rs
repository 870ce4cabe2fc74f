//! Plaintext padding: embedding byte strings into residues mod p
//!
//! Each [`PaddingMode`] selects a [`PaddingScheme`] implementation. Schemes that
//! pad work on a block of `(bits(p) - 1) / 8` bytes, so that every encoded
//! block is strictly smaller than the modulus.

use num_bigint::BigUint;

use crate::error::{ElGamalError, Result};
use crate::types::PaddingMode;
use crate::utils::to_fixed_bytes_be;

/// Largest pad length an ANSI X9.23 length byte can record
pub const MAX_ANSI_X923_PAD: usize = 255;

/// Sizes derived from the modulus that the padding schemes work against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    /// Bytes available to a padded plaintext block
    pub block_len: usize,
    /// Bytes needed to hold any residue mod p
    pub modulus_len: usize,
}

impl BlockLayout {
    pub fn for_modulus_bits(bits: u64) -> Self {
        BlockLayout {
            block_len: (bits.saturating_sub(1) / 8) as usize,
            modulus_len: bits.div_ceil(8) as usize,
        }
    }

    pub fn for_modulus(modulus: &BigUint) -> Self {
        Self::for_modulus_bits(modulus.bits())
    }
}

/// Invertible mapping between byte strings and plaintext integers
pub trait PaddingScheme {
    /// Embed `data` into a plaintext integer
    fn encode(&self, data: &[u8], layout: &BlockLayout) -> Result<BigUint>;

    /// Recover the bytes embedded by [`PaddingScheme::encode`]
    fn decode(&self, value: &BigUint, layout: &BlockLayout) -> Result<Vec<u8>>;
}

/// ANSI X9.23: `data || 0x00.. || n`, where `n` counts the pad bytes including itself
#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiX923Padding;

/// `0x00.. || data`
#[derive(Clone, Copy, Debug, Default)]
pub struct LeadingZerosPadding;

/// `data || 0x00..`
#[derive(Clone, Copy, Debug, Default)]
pub struct TrailingZerosPadding;

/// No padding, the data is the big-endian magnitude of the plaintext
#[derive(Clone, Copy, Debug, Default)]
pub struct BigIntegerPadding;

impl PaddingMode {
    /// The scheme implementing this mode
    pub fn scheme(&self) -> &'static dyn PaddingScheme {
        match self {
            PaddingMode::AnsiX923 => &AnsiX923Padding,
            PaddingMode::LeadingZeros => &LeadingZerosPadding,
            PaddingMode::TrailingZeros => &TrailingZerosPadding,
            PaddingMode::BigIntegerPadding => &BigIntegerPadding,
        }
    }

    pub fn encode(&self, data: &[u8], layout: &BlockLayout) -> Result<BigUint> {
        self.scheme().encode(data, layout)
    }

    pub fn decode(&self, value: &BigUint, layout: &BlockLayout) -> Result<Vec<u8>> {
        self.scheme().decode(value, layout)
    }
}

/// Fixed-width block holding `value`, or an error if it does not fit
fn to_block(value: &BigUint, block_len: usize) -> Result<Vec<u8>> {
    let block = to_fixed_bytes_be(value, block_len);
    if block.len() > block_len {
        return Err(ElGamalError::Padding(format!(
            "value needs {} bytes, block holds {}",
            block.len(),
            block_len
        )));
    }
    Ok(block)
}

fn check_fits(data: &[u8], capacity: usize) -> Result<()> {
    if data.len() > capacity {
        return Err(ElGamalError::Padding(format!(
            "data too large: max {} bytes, got {}",
            capacity,
            data.len()
        )));
    }
    Ok(())
}

impl PaddingScheme for AnsiX923Padding {
    fn encode(&self, data: &[u8], layout: &BlockLayout) -> Result<BigUint> {
        // At least the length byte itself must fit
        check_fits(data, layout.block_len.saturating_sub(1))?;
        if layout.block_len == 0 {
            return Err(ElGamalError::Padding("modulus too small".to_string()));
        }

        let pad_len = layout.block_len - data.len();
        if pad_len > MAX_ANSI_X923_PAD {
            return Err(ElGamalError::Padding(format!(
                "pad length {} exceeds {}; data must be at least {} bytes",
                pad_len,
                MAX_ANSI_X923_PAD,
                layout.block_len - MAX_ANSI_X923_PAD
            )));
        }

        let mut block = Vec::with_capacity(layout.block_len);
        block.extend_from_slice(data);
        block.resize(layout.block_len - 1, 0);
        block.push(pad_len as u8);

        Ok(BigUint::from_bytes_be(&block))
    }

    fn decode(&self, value: &BigUint, layout: &BlockLayout) -> Result<Vec<u8>> {
        let block = to_block(value, layout.block_len)?;
        let pad_len = match block.last() {
            Some(&n) => n as usize,
            None => return Err(ElGamalError::Padding("empty block".to_string())),
        };

        if pad_len == 0 || pad_len > block.len() {
            return Err(ElGamalError::Padding(format!(
                "invalid pad length {} for {}-byte block",
                pad_len,
                block.len()
            )));
        }

        let data_len = block.len() - pad_len;
        if block[data_len..block.len() - 1].iter().any(|&b| b != 0) {
            return Err(ElGamalError::Padding(
                "non-zero filler byte".to_string(),
            ));
        }

        Ok(block[..data_len].to_vec())
    }
}

impl PaddingScheme for LeadingZerosPadding {
    fn encode(&self, data: &[u8], layout: &BlockLayout) -> Result<BigUint> {
        check_fits(data, layout.block_len)?;
        // Prepending zeros does not change the big-endian value
        Ok(BigUint::from_bytes_be(data))
    }

    fn decode(&self, value: &BigUint, layout: &BlockLayout) -> Result<Vec<u8>> {
        let block = to_block(value, layout.block_len)?;
        let start = block
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(block.len());
        Ok(block[start..].to_vec())
    }
}

impl PaddingScheme for TrailingZerosPadding {
    fn encode(&self, data: &[u8], layout: &BlockLayout) -> Result<BigUint> {
        check_fits(data, layout.block_len)?;

        let mut block = data.to_vec();
        block.resize(layout.block_len, 0);
        Ok(BigUint::from_bytes_be(&block))
    }

    fn decode(&self, value: &BigUint, layout: &BlockLayout) -> Result<Vec<u8>> {
        let block = to_block(value, layout.block_len)?;
        let end = block.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(block[..end].to_vec())
    }
}

impl PaddingScheme for BigIntegerPadding {
    fn encode(&self, data: &[u8], layout: &BlockLayout) -> Result<BigUint> {
        check_fits(data, layout.modulus_len)?;
        Ok(BigUint::from_bytes_be(data))
    }

    fn decode(&self, value: &BigUint, layout: &BlockLayout) -> Result<Vec<u8>> {
        let bytes = to_block(value, layout.modulus_len)?;
        let start = bytes
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(bytes.len());
        Ok(bytes[start..].to_vec())
    }
}
