//! Homomorphic operations on ciphertexts

use num_bigint::BigUint;

use crate::encryption::ElGamalManaged;
use crate::error::{ElGamalError, Result};
use crate::types::Ciphertext;
use crate::utils::{mod_exp, mod_inverse};

/// Trait for homomorphic operations.
///
/// None of these need the private key.
pub trait HomomorphicOperations {
    /// Enc(m1) * Enc(m2) = Enc(m1 * m2 mod p)
    fn homomorphic_multiply(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Result<Ciphertext>;

    /// Product of a non-empty batch of ciphertexts
    fn homomorphic_product(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext>;

    /// Enc(m)^e = Enc(m^e mod p)
    fn homomorphic_pow(&self, ct: &Ciphertext, exponent: &BigUint) -> Result<Ciphertext>;

    /// Enc(m1) / Enc(m2) = Enc(m1 * m2^-1 mod p)
    fn homomorphic_divide(
        &self,
        ct_numerator: &Ciphertext,
        ct_denominator: &Ciphertext,
    ) -> Result<Ciphertext>;
}

impl ElGamalManaged {
    fn check_reduced(&self, ct: &Ciphertext) -> Result<()> {
        let p = &self.public_key.p;
        if &ct.c1 >= p || &ct.c2 >= p {
            return Err(ElGamalError::MalformedCiphertext(
                "component not reduced modulo p".to_string(),
            ));
        }
        Ok(())
    }
}

impl HomomorphicOperations for ElGamalManaged {
    fn homomorphic_multiply(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Result<Ciphertext> {
        self.check_reduced(ct1)?;
        self.check_reduced(ct2)?;

        let p = &self.public_key.p;
        let c1 = (&ct1.c1 * &ct2.c1) % p;
        let c2 = (&ct1.c2 * &ct2.c2) % p;

        Ok(Ciphertext::new(c1, c2))
    }

    fn homomorphic_product(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext> {
        let (first, rest) = ciphertexts.split_first().ok_or(ElGamalError::EmptyBatch)?;
        self.check_reduced(first)?;

        let mut result = first.clone();
        for ct in rest {
            result = self.homomorphic_multiply(&result, ct)?;
        }

        Ok(result)
    }

    fn homomorphic_pow(&self, ct: &Ciphertext, exponent: &BigUint) -> Result<Ciphertext> {
        self.check_reduced(ct)?;

        let p = &self.public_key.p;
        let c1 = mod_exp(&ct.c1, exponent, p);
        let c2 = mod_exp(&ct.c2, exponent, p);

        Ok(Ciphertext::new(c1, c2))
    }

    fn homomorphic_divide(
        &self,
        ct_numerator: &Ciphertext,
        ct_denominator: &Ciphertext,
    ) -> Result<Ciphertext> {
        self.check_reduced(ct_numerator)?;
        self.check_reduced(ct_denominator)?;

        let p = &self.public_key.p;

        // Division is multiplication by the modular inverse
        let c1_inv = mod_inverse(&ct_denominator.c1, p).ok_or(ElGamalError::ModularInverseError)?;
        let c2_inv = mod_inverse(&ct_denominator.c2, p).ok_or(ElGamalError::ModularInverseError)?;

        let c1 = (&ct_numerator.c1 * c1_inv) % p;
        let c2 = (&ct_numerator.c2 * c2_inv) % p;

        Ok(Ciphertext::new(c1, c2))
    }
}
