use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, ToPrimitive};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::numtheory::{gcd, mod_pow, modular_inverse};
use crate::prime::generate_prime;

/// Attempt cap for the coprime public-exponent search. Coprimality density
/// makes the expected number of draws O(ln phi), so hitting this cap means a
/// degenerate totient rather than bad luck.
const PUBLIC_EXPONENT_ATTEMPTS: u32 = 4096;

/// RSA public key `(n, e)`.
///
/// `n = p * q` and `1 < e < phi(n)` with `gcd(e, phi(n)) = 1`. Immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Modulus
    pub n: BigUint,
    /// Public exponent
    pub e: BigUint,
}

/// RSA private key `(n, d)`.
///
/// `d = e^-1 mod phi(n)`, so `(m^e)^d ≡ m (mod n)` for every message block
/// `m < n`. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    /// Modulus
    pub n: BigUint,
    /// Private exponent
    pub d: BigUint,
}

/// Generates an RSA key pair from two freshly sampled primes.
///
/// The two primes are drawn at (typically distinct) bit lengths; distinct
/// lengths rule out `p == q` and keep the modulus bit length predictable.
/// The public exponent is sampled uniformly and reject-resampled until it is
/// coprime to the totient, then inverted to obtain the private exponent.
///
/// # Arguments
///
/// * `p_bits` - Bit length of the first prime.
/// * `q_bits` - Bit length of the second prime.
/// * `max_attempts` - Sampling budget per prime.
/// * `witness_rounds` - Miller-Rabin rounds per prime candidate.
/// * `rng` - Source of all randomness (primes and exponent).
///
/// # Errors
///
/// * [`Error::PrimeGenerationExhausted`] when either prime search runs out
///   of attempts.
/// * [`Error::PublicExponentExhausted`] when no exponent coprime to the
///   totient shows up within the internal cap.
/// * [`Error::ModularInverseUndefined`] only if the coprimality check above
///   were broken; not reachable through this path.
pub fn generate_keypair<R: Rng + ?Sized>(
    p_bits: u64,
    q_bits: u64,
    max_attempts: u32,
    witness_rounds: u32,
    rng: &mut R,
) -> Result<(PublicKey, PrivateKey)> {
    let p = generate_prime(p_bits, max_attempts, witness_rounds, rng)?;
    let q = generate_prime(q_bits, max_attempts, witness_rounds, rng)?;

    let n = &p * &q;
    let phi = (&p - 1u32) * (&q - 1u32);
    debug!(%n, "primes found, searching for a public exponent");

    let two = BigUint::from(2u32);
    if phi <= two {
        return Err(Error::PublicExponentExhausted { attempts: 0 });
    }

    let mut e = None;
    for _ in 0..PUBLIC_EXPONENT_ATTEMPTS {
        let candidate = rng.gen_biguint_range(&two, &phi);
        if gcd(&candidate, &phi).is_one() {
            e = Some(candidate);
            break;
        }
    }
    let e = e.ok_or(Error::PublicExponentExhausted {
        attempts: PUBLIC_EXPONENT_ATTEMPTS,
    })?;

    debug!("inverting the public exponent modulo the totient");
    let d = modular_inverse(&BigInt::from(e.clone()), &BigInt::from(phi))?;
    let d = d.magnitude().clone();

    Ok((PublicKey { n: n.clone(), e }, PrivateKey { n, d }))
}

/// Encrypts a text message block-wise, one integer per code point.
///
/// Each code point `m` maps to `m^e mod n`. No chunking is performed, so the
/// modulus must exceed every code point in the message's alphabet.
///
/// # Errors
///
/// Returns [`Error::MessageBlockTooLarge`] when a code point is `>= n` and
/// would wrap into a silently-wrong ciphertext block.
pub fn encrypt_message(text: &str, key: &PublicKey) -> Result<Vec<BigUint>> {
    let mut ciphertext = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let code_point = ch as u32;
        let block = BigUint::from(code_point);
        if block >= key.n {
            return Err(Error::MessageBlockTooLarge {
                code_point,
                modulus: key.n.clone(),
            });
        }
        ciphertext.push(mod_pow(&BigInt::from(block), &key.e, &key.n));
    }

    Ok(ciphertext)
}

/// Decrypts a block-wise ciphertext back into text.
///
/// Each block `c` maps to `c^d mod n`, decoded as a Unicode code point.
///
/// # Errors
///
/// Returns [`Error::CodePointDecode`] when a decrypted block is not a valid
/// Unicode scalar value, which indicates a mismatched key or a foreign
/// ciphertext.
pub fn decrypt_message(ciphertext: &[BigUint], key: &PrivateKey) -> Result<String> {
    let mut text = String::with_capacity(ciphertext.len());

    for block in ciphertext {
        let m = mod_pow(&BigInt::from(block.clone()), &key.d, &key.n);
        let ch = m
            .to_u32()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::CodePointDecode(m.clone()))?;
        text.push(ch);
    }

    Ok(text)
}
