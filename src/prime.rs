use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::numtheory::mod_pow;

/// Tests a candidate for primality with the Miller-Rabin probabilistic test.
///
/// Decomposes `candidate - 1 = 2^s * d` with `d` odd, then runs `rounds`
/// independent random witnesses `a` in `[2, candidate - 2]`. A witness passes
/// when `a^d mod candidate` is `1` or `candidate - 1`, or when repeated
/// squaring reaches `candidate - 1` within `s - 1` steps; any other outcome
/// proves compositeness and short-circuits the whole test.
///
/// # Arguments
///
/// * `candidate` - The number under test.
/// * `rounds` - Number of independent witnesses; error probability is at
///   most `4^-rounds` for a composite.
/// * `rng` - Source of witness randomness.
///
/// # Returns
///
/// `true` when the candidate is probably prime, `false` when it is
/// certainly composite.
pub fn miller_rabin<R: Rng + ?Sized>(candidate: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if candidate < &two {
        return false;
    }
    if candidate == &two || candidate == &three {
        return true;
    }
    if !candidate.bit(0) {
        return false;
    }

    // candidate - 1 = 2^s * d with d odd
    let n_minus_1 = candidate - &one;
    let mut d = n_minus_1.clone();
    let mut s = 0u64;
    while !d.bit(0) {
        d >>= 1;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_pow(&BigInt::from(a), &d, candidate);

        if x == one || x == n_minus_1 {
            continue;
        }

        for _ in 0..s.saturating_sub(1) {
            x = &x * &x % candidate;
            // Hitting 1 without passing through n-1 exposes a nontrivial
            // square root of unity, so the candidate is composite.
            if x == one {
                return false;
            }
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

/// Generates a random probable prime of the requested bit length.
///
/// Samples uniformly from `[2^(bit_length - 1), 2^bit_length)` so the top bit
/// is always set, discarding even candidates before they cost a Miller-Rabin
/// round. Every sample, even or odd, consumes one attempt.
///
/// # Arguments
///
/// * `bit_length` - Exact bit length of the prime; must be at least 2.
/// * `max_attempts` - Sampling budget before giving up.
/// * `witness_rounds` - Miller-Rabin rounds per odd candidate.
/// * `rng` - Source of candidate and witness randomness.
///
/// # Errors
///
/// Returns [`Error::PrimeGenerationExhausted`] when no probable prime shows
/// up within `max_attempts` samples (or when `bit_length < 2`, where no
/// candidate range exists).
pub fn generate_prime<R: Rng + ?Sized>(
    bit_length: u64,
    max_attempts: u32,
    witness_rounds: u32,
    rng: &mut R,
) -> Result<BigUint> {
    if bit_length < 2 {
        return Err(Error::PrimeGenerationExhausted {
            bit_length,
            attempts: 0,
        });
    }

    let lower = BigUint::one() << (bit_length - 1);
    let upper = BigUint::one() << bit_length;

    for attempt in 1..=max_attempts {
        let candidate = rng.gen_biguint_range(&lower, &upper);

        if !candidate.bit(0) {
            continue;
        }

        if miller_rabin(&candidate, witness_rounds, rng) {
            debug!(attempt, bit_length, "prime candidate accepted");
            return Ok(candidate);
        }
    }

    Err(Error::PrimeGenerationExhausted {
        bit_length,
        attempts: max_attempts,
    })
}
