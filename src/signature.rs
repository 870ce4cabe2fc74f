//! ElGamal signatures over caller-supplied hash digests
//!
//! For a digest `h`, interpreted as a big-endian integer `H = h mod (p - 1)`:
//!
//! - sign: `r = g^k mod p`, `s = (H - x*r) * k^-1 mod (p - 1)`
//! - verify: `g^H == y^r * r^s mod p`

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::encryption::ElGamalManaged;
use crate::error::{ElGamalError, Result};
use crate::keys::PrivateKey;
use crate::types::Signature;
use crate::utils::{mod_exp, mod_inverse};

/// Reduce a digest into the exponent group Z/(p - 1)
pub(crate) fn digest_to_exponent(hash: &[u8], order: &BigUint) -> BigUint {
    BigUint::from_bytes_be(hash) % order
}

impl ElGamalManaged {
    /// Sign a digest with a fresh ephemeral exponent
    pub fn sign_digest(&self, hash: &[u8]) -> Result<Signature> {
        let private_key = self.private_key()?;

        // k is resampled when it produces s = 0
        for _ in 0..self.config().max_ephemeral_attempts {
            let k = self.random_ephemeral()?;
            if let Some(signature) = self.sign_raw(hash, private_key, &k)? {
                debug!("signed {}-byte digest", hash.len());
                return Ok(signature);
            }
        }

        Err(ElGamalError::InvalidKey(
            "Could not find an ephemeral exponent producing a valid signature".to_string(),
        ))
    }

    /// Sign a digest with a caller-chosen ephemeral exponent.
    ///
    /// Two signatures sharing `k` reveal the private key; this exists for
    /// reproducible test vectors.
    pub fn sign_with_ephemeral(&self, hash: &[u8], k: &BigUint) -> Result<Signature> {
        let private_key = self.private_key()?;
        self.check_ephemeral(k)?;

        self.sign_raw(hash, private_key, k)?.ok_or_else(|| {
            ElGamalError::InvalidParameter("Ephemeral exponent yields s = 0".to_string())
        })
    }

    fn sign_raw(
        &self,
        hash: &[u8],
        private_key: &PrivateKey,
        k: &BigUint,
    ) -> Result<Option<Signature>> {
        let p = &self.public_key.p;
        let order = self.public_key.group_order();

        let h = digest_to_exponent(hash, &order);
        let r = mod_exp(&self.public_key.g, k, p);
        let k_inv = mod_inverse(k, &order).ok_or(ElGamalError::ModularInverseError)?;
        let s = private_key.sign_component(&h, &r, &k_inv, &order);

        if s.is_zero() {
            return Ok(None);
        }
        Ok(Some(Signature::new(r, s)))
    }

    /// Check a signature using only the public key
    pub fn verify(&self, hash: &[u8], signature: &Signature) -> bool {
        let p = &self.public_key.p;
        let order = self.public_key.group_order();

        if signature.r < BigUint::one() || &signature.r >= p || signature.s >= order {
            return false;
        }

        let h = digest_to_exponent(hash, &order);
        let lhs = mod_exp(&self.public_key.g, &h, p);
        let rhs = (mod_exp(&self.public_key.y, &signature.r, p)
            * mod_exp(&signature.r, &signature.s, p))
            % p;

        lhs == rhs
    }
}
