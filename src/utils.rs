//! Utility functions for cryptographic operations

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::thread_rng;

/// Modular exponentiation: base^exp mod modulus
pub fn mod_exp(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Compute modular inverse using extended Euclidean algorithm
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let m_int = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from(a % m), &m_int);

    if !gcd.is_one() {
        return None;
    }

    // mod_floor keeps the result in [0, m) even when x is negative
    BigUint::try_from(x.mod_floor(&m_int)).ok()
}

/// Extended Euclidean algorithm (using BigInt to handle negative intermediate values)
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if a.is_zero() {
        return (b.clone(), BigInt::zero(), BigInt::one());
    }

    let (gcd, x1, y1) = extended_gcd(&(b % a), a);
    let x = y1 - (b / a) * &x1;
    let y = x1;

    (gcd, x, y)
}

/// Miller-Rabin primality test
pub fn is_probable_prime(n: &BigUint, k: usize) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let mut rng = thread_rng();
    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..k {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = mod_exp(&x, &two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor out powers of 2 from n
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let mut s = 0;
    let mut d = n.clone();

    while !d.is_zero() && d.is_even() {
        d >>= 1;
        s += 1;
    }

    (s, d)
}

/// Generate a random element in the range [low, high)
pub fn random_in_range(low: &BigUint, high: &BigUint) -> BigUint {
    let mut rng = thread_rng();
    rng.gen_biguint_range(low, high)
}

/// Number of bytes needed to hold any residue mod `modulus`
pub fn modulus_byte_len(modulus: &BigUint) -> usize {
    modulus.bits().div_ceil(8) as usize
}

/// Big-endian bytes of `value`, left-padded with zeros to `len`.
/// Values wider than `len` are returned unpadded.
pub fn to_fixed_bytes_be(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    };

    if bytes.len() >= len {
        return bytes;
    }

    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_inverse() {
        let a = BigUint::from(3u32);
        let m = BigUint::from(11u32);
        let inv = mod_inverse(&a, &m).unwrap();

        assert_eq!((a * inv) % m, BigUint::one());
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        let a = BigUint::from(6u32);
        let m = BigUint::from(466u32);
        assert!(mod_inverse(&a, &m).is_none());
        assert!(mod_inverse(&BigUint::zero(), &m).is_none());
    }

    #[test]
    fn test_mod_inverse_of_ephemeral() {
        // 213 * 431 = 91803 = 197 * 466 + 1
        let inv = mod_inverse(&BigUint::from(213u32), &BigUint::from(466u32)).unwrap();
        assert_eq!(inv, BigUint::from(431u32));
    }

    #[test]
    fn test_is_probable_prime() {
        for p in [2u32, 3, 5, 7, 11, 13, 467, 7919] {
            assert!(is_probable_prime(&BigUint::from(p), 20), "{} is prime", p);
        }

        for c in [0u32, 1, 4, 6, 8, 9, 10, 12, 15, 561, 7917] {
            assert!(
                !is_probable_prime(&BigUint::from(c), 20),
                "{} is composite",
                c
            );
        }
    }

    #[test]
    fn test_fixed_width_bytes() {
        assert_eq!(to_fixed_bytes_be(&BigUint::zero(), 3), vec![0, 0, 0]);
        assert_eq!(
            to_fixed_bytes_be(&BigUint::from(0x0102u32), 4),
            vec![0, 0, 1, 2]
        );
        assert_eq!(to_fixed_bytes_be(&BigUint::from(0x0102u32), 1), vec![1, 2]);
        assert_eq!(modulus_byte_len(&BigUint::from(467u32)), 2);
        assert_eq!(modulus_byte_len(&BigUint::from(255u32)), 1);
    }
}
