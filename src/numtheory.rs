use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Computes the extended Euclidean algorithm for two integers.
///
/// Returns `(g, x, y)` such that `a*x + b*y == g` and `g == gcd(a, b)`,
/// with `g` normalized non-negative. `b == 0` yields `(a, 1, 0)` (up to the
/// sign normalization).
///
/// # Arguments
///
/// * `a` - Any integer.
/// * `b` - Any integer, zero allowed.
pub fn extended_euclid(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let mut r0 = a.clone();
    let mut r1 = b.clone();
    let mut s0 = BigInt::one();
    let mut s1 = BigInt::zero();
    let mut t0 = BigInt::zero();
    let mut t1 = BigInt::one();

    // Each iteration preserves r_i == a*s_i + b*t_i exactly.
    while !r1.is_zero() {
        let q = &r0 / &r1;
        let r = &r0 - &q * &r1;
        r0 = std::mem::replace(&mut r1, r);
        let s = &s0 - &q * &s1;
        s0 = std::mem::replace(&mut s1, s);
        let t = &t0 - &q * &t1;
        t0 = std::mem::replace(&mut t1, t);
    }

    if r0.sign() == Sign::Minus {
        (-r0, -s0, -t0)
    } else {
        (r0, s0, t0)
    }
}

/// Computes the greatest common divisor of two non-negative integers by
/// plain Euclid.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

/// Computes the modular inverse of `a` modulo `modulus`.
///
/// Returns `d` with `a*d ≡ 1 (mod modulus)`, normalized into `[0, modulus)`.
///
/// # Errors
///
/// Returns [`Error::ModularInverseUndefined`] when `gcd(a, modulus) != 1`.
pub fn modular_inverse(a: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    let (g, x, _) = extended_euclid(a, modulus);
    if !g.is_one() {
        return Err(Error::ModularInverseUndefined {
            modulus: modulus.magnitude().clone(),
        });
    }
    Ok(((x % modulus) + modulus) % modulus)
}

/// Computes `base^exponent mod modulus` by square-and-multiply.
///
/// Walks the exponent's bits directly, least significant first, squaring the
/// running base once per bit: `O(log exponent)` multiplications. Negative
/// bases are normalized into `[0, modulus)` before exponentiation, a zero
/// exponent yields `1 mod modulus`, and a modulus of one yields zero.
///
/// Every primality witness and every cipher block goes through here.
pub fn mod_pow(base: &BigInt, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }

    let m = BigInt::from(modulus.clone());
    let normalized = ((base % &m) + &m) % &m;
    let mut base = normalized.magnitude().clone();
    let mut result = BigUint::one();

    for i in 0..exponent.bits() {
        if exponent.bit(i) {
            result = &result * &base % modulus;
        }
        base = &base * &base % modulus;
    }

    result
}
