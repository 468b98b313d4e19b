use num_bigint::{BigInt, RandBigInt, Sign};
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::numtheory::gcd;

/// Upper bound (inclusive) of the random blinding coefficients. Correctness
/// never depends on this range because interpolation is exact.
const COEFFICIENT_BOUND: u32 = 100;

/// Represents a polynomial over the integers.
///
/// Each polynomial is represented by its coefficients, stored in a vector.
/// The constant term carries the secret; the remaining coefficients are the
/// random blinding terms, and the degree fixes the reconstruction threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    /// The coefficients of the polynomial, constant term first.
    pub coefficients: Vec<BigInt>,
}

impl Polynomial {
    /// Constructs a new polynomial of a given degree with random blinding
    /// coefficients, where the constant term is the provided secret.
    ///
    /// # Arguments
    ///
    /// * `degree` - The degree of the polynomial (threshold minus one).
    /// * `secret` - The secret (constant term) of the polynomial.
    /// * `rng` - Source of the blinding coefficients, drawn from
    ///   `[1, COEFFICIENT_BOUND]`.
    pub fn new<R: Rng + ?Sized>(degree: usize, secret: BigInt, rng: &mut R) -> Self {
        let lower = BigInt::one();
        let upper = BigInt::from(COEFFICIENT_BOUND + 1);
        let mut coefficients = vec![secret; degree + 1];

        for coeff in coefficients.iter_mut().skip(1) {
            *coeff = rng.gen_bigint_range(&lower, &upper);
        }

        Polynomial { coefficients }
    }

    /// Evaluates the polynomial at a given point.
    ///
    /// # Arguments
    ///
    /// * `x` - The point at which to evaluate the polynomial.
    ///
    /// # Returns
    ///
    /// The value of the polynomial at point `x`.
    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        let mut result = BigInt::zero();
        let mut term = BigInt::one();

        for coeff in &self.coefficients {
            result += coeff * &term;
            term *= x;
        }

        result
    }
}

/// One sample point `(x, y)` of a secret-encoding polynomial.
///
/// Shares are independent and order-irrelevant once collected; within one
/// secret's share set every `x` is unique. A share does not record the
/// threshold it was generated with, so the caller must retain that alongside
/// the shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Evaluation point, `1..=shares`.
    pub x: u32,
    /// Polynomial value at `x`.
    pub y: BigInt,
}

/// Splits a secret into a specified number of shares using Shamir's Secret
/// Sharing Scheme.
///
/// Builds a degree-`threshold - 1` polynomial whose constant term is the
/// secret and evaluates it at `x = 1..=shares`.
///
/// # Arguments
///
/// * `secret` - The secret integer to be split.
/// * `threshold` - The minimum number of shares required to reconstruct.
/// * `shares` - The total number of shares to create.
/// * `rng` - Source of the blinding coefficients.
///
/// # Errors
///
/// Returns [`Error::InvalidThreshold`] when `threshold < 1` or
/// `threshold > shares`; never silently clamps.
///
/// # Examples
/// ```rust
/// use num_bigint::BigInt;
/// use keyshard::sss::split_secret;
///
/// let mut rng = rand::thread_rng();
/// let shares = split_secret(&BigInt::from(42), 3, 5, &mut rng).unwrap();
/// // any 3 of the 5 shares reconstruct 42 exactly
/// ```
pub fn split_secret<R: Rng + ?Sized>(
    secret: &BigInt,
    threshold: usize,
    shares: usize,
    rng: &mut R,
) -> Result<Vec<Share>> {
    if threshold < 1 || threshold > shares {
        return Err(Error::InvalidThreshold { threshold, shares });
    }

    let poly = Polynomial::new(threshold - 1, secret.clone(), rng);

    Ok((1..=shares as u32)
        .map(|x| Share {
            x,
            y: poly.evaluate(&BigInt::from(x)),
        })
        .collect())
}

/// Combines shares to reconstruct a secret using Shamir's Secret Sharing
/// Scheme.
///
/// Applies Lagrange interpolation at `x = 0` over exactly the supplied
/// shares, carrying the interpolation coefficients as exact rationals so the
/// recovered secret is exact at any magnitude. The threshold is passed
/// explicitly because shares do not embed it. Pure and idempotent: the input
/// shares are not consumed or invalidated.
///
/// # Arguments
///
/// * `shares` - The collected shares, any order.
/// * `threshold` - The threshold the secret was split with.
///
/// # Errors
///
/// * [`Error::InvalidThreshold`] when `threshold < 1`.
/// * [`Error::InsufficientShares`] when fewer than `threshold` shares are
///   supplied, rather than silently returning garbage.
/// * [`Error::DuplicateShareIndex`] when two shares carry the same `x`.
/// * [`Error::ReconstructionInexact`] when the final division leaves a
///   remainder, which means the shares do not lie on one polynomial.
pub fn combine_shares(shares: &[Share], threshold: usize) -> Result<BigInt> {
    if threshold < 1 {
        return Err(Error::InvalidThreshold {
            threshold,
            shares: shares.len(),
        });
    }
    if shares.len() < threshold {
        return Err(Error::InsufficientShares {
            required: threshold,
            supplied: shares.len(),
        });
    }

    let mut seen = HashSet::new();
    for share in shares {
        if !seen.insert(share.x) {
            return Err(Error::DuplicateShareIndex(share.x));
        }
    }

    interpolate_at_zero(shares)
}

/// Performs exact Lagrange interpolation of the supplied points at `x = 0`.
///
/// secret = sum_i y_i * prod_{j != i} (0 - x_j) / (x_i - x_j), accumulated
/// as a reduced rational so the division is verified exact before the
/// integer secret is returned.
fn interpolate_at_zero(shares: &[Share]) -> Result<BigInt> {
    let mut total = Rational {
        num: BigInt::zero(),
        den: BigInt::one(),
    };

    for (i, si) in shares.iter().enumerate() {
        let mut num = si.y.clone();
        let mut den = BigInt::one();

        for (j, sj) in shares.iter().enumerate() {
            if i != j {
                num *= -BigInt::from(sj.x);
                den *= BigInt::from(si.x) - BigInt::from(sj.x);
            }
        }

        total = total.add(&Rational::new(num, den));
    }

    if !(&total.num % &total.den).is_zero() {
        return Err(Error::ReconstructionInexact);
    }

    Ok(total.num / total.den)
}

/// An exact rational carried as an integer numerator/denominator pair,
/// reduced via gcd with the denominator kept positive.
#[derive(Debug, Clone)]
struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    fn new(num: BigInt, den: BigInt) -> Self {
        let (num, den) = if den.sign() == Sign::Minus {
            (-num, -den)
        } else {
            (num, den)
        };

        let g = gcd(num.magnitude(), den.magnitude());
        if g.is_one() {
            return Rational { num, den };
        }
        let g = BigInt::from(g);
        Rational {
            num: num / &g,
            den: den / g,
        }
    }

    fn add(&self, other: &Rational) -> Rational {
        Rational::new(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
    }
}

/// Refreshes the shares of a secret without changing the secret itself.
///
/// Adds a fresh zero-constant polynomial of degree `threshold - 1` to every
/// share, so the blinding coefficients change while the constant term (the
/// secret) does not. The refreshed set reconstructs to the same secret, but
/// refreshed and stale shares must never be mixed.
///
/// # Arguments
///
/// * `shares` - The complete share set to refresh, in place.
/// * `threshold` - The threshold the secret was split with.
/// * `rng` - Source of the new blinding coefficients.
///
/// # Errors
///
/// * [`Error::InvalidThreshold`] when `threshold < 1`.
/// * [`Error::InsufficientShares`] when the share set is empty.
pub fn refresh_shares<R: Rng + ?Sized>(
    shares: &mut [Share],
    threshold: usize,
    rng: &mut R,
) -> Result<()> {
    if threshold < 1 {
        return Err(Error::InvalidThreshold {
            threshold,
            shares: shares.len(),
        });
    }
    if shares.is_empty() {
        return Err(Error::InsufficientShares {
            required: threshold,
            supplied: 0,
        });
    }

    // Zero constant term, so the sum polynomial keeps the original secret.
    let poly = Polynomial::new(threshold - 1, BigInt::zero(), rng);

    for share in shares.iter_mut() {
        share.y += poly.evaluate(&BigInt::from(share.x));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::IteratorRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_split_and_combine_secret() {
        let secret = BigInt::from(42);
        let threshold = 3;
        let total_shares = 5;

        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, threshold, total_shares, &mut rng).unwrap();
        assert_eq!(shares.len(), total_shares);

        let recovered = combine_shares(&shares, threshold).unwrap();
        assert_eq!(recovered, secret);
    }

    #[test]
    fn test_every_quorum_subset_reconstructs() {
        let secret = BigInt::from(42);
        let threshold = 3;
        let total_shares = 5;

        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, threshold, total_shares, &mut rng).unwrap();

        // Every 3-subset of the 5 shares must yield 42 exactly.
        for i in 0..total_shares {
            for j in (i + 1)..total_shares {
                for k in (j + 1)..total_shares {
                    let subset = [shares[i].clone(), shares[j].clone(), shares[k].clone()];
                    let recovered = combine_shares(&subset, threshold).unwrap();
                    assert_eq!(recovered, secret, "subset ({i}, {j}, {k})");
                }
            }
        }
    }

    #[test]
    fn test_subset_order_is_irrelevant() {
        let secret = BigInt::from(123_456_789i64);
        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, 3, 5, &mut rng).unwrap();

        let forward = [shares[0].clone(), shares[2].clone(), shares[4].clone()];
        let backward = [shares[4].clone(), shares[2].clone(), shares[0].clone()];
        assert_eq!(combine_shares(&forward, 3).unwrap(), secret);
        assert_eq!(combine_shares(&backward, 3).unwrap(), secret);
    }

    #[test]
    fn test_insufficient_shares() {
        let secret = BigInt::from(42);
        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, 3, 5, &mut rng).unwrap();

        let err = combine_shares(&shares[..2], 3).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientShares {
                required: 3,
                supplied: 2
            }
        );
    }

    #[test]
    fn test_invalid_threshold_and_share_count() {
        let secret = BigInt::from(42);
        let mut rng = rand::thread_rng();
        assert!(matches!(
            split_secret(&secret, 0, 5, &mut rng),
            Err(Error::InvalidThreshold {
                threshold: 0,
                shares: 5
            })
        ));
        assert!(matches!(
            split_secret(&secret, 6, 5, &mut rng),
            Err(Error::InvalidThreshold {
                threshold: 6,
                shares: 5
            })
        ));
        assert!(matches!(
            combine_shares(&[], 0),
            Err(Error::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_threshold_one_every_share_is_the_secret() {
        let secret = BigInt::from(7);
        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, 1, 4, &mut rng).unwrap();

        for share in &shares {
            assert_eq!(share.y, secret);
            assert_eq!(combine_shares(&[share.clone()], 1).unwrap(), secret);
        }
    }

    #[test]
    fn test_duplicate_share_index() {
        let secret = BigInt::from(42);
        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, 2, 3, &mut rng).unwrap();

        let doubled = [shares[0].clone(), shares[0].clone(), shares[1].clone()];
        assert_eq!(
            combine_shares(&doubled, 2).unwrap_err(),
            Error::DuplicateShareIndex(shares[0].x)
        );
    }

    #[test]
    fn test_combine_is_pure() {
        let secret = BigInt::from(42);
        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, 3, 5, &mut rng).unwrap();

        let snapshot = shares.clone();
        let first = combine_shares(&shares, 3).unwrap();
        let second = combine_shares(&shares, 3).unwrap();

        assert_eq!(first, second);
        assert_eq!(shares, snapshot, "combining must not mutate the shares");
    }

    #[test]
    fn test_reconstruction_inexact_on_foreign_shares() {
        // (1, 1) and (3, 2) lie on y = x/2 + 1/2, which has no integer value
        // at x = 0; no single integer polynomial produced these points.
        let shares = [
            Share {
                x: 1,
                y: BigInt::from(1),
            },
            Share {
                x: 3,
                y: BigInt::from(2),
            },
        ];
        assert_eq!(
            combine_shares(&shares, 2).unwrap_err(),
            Error::ReconstructionInexact
        );
    }

    #[test]
    fn test_refresh_preserves_secret() {
        let secret = BigInt::from(42);
        let threshold = 3;
        let mut rng = rand::thread_rng();
        let mut shares = split_secret(&secret, threshold, 5, &mut rng).unwrap();

        let before = shares.clone();
        refresh_shares(&mut shares, threshold, &mut rng).unwrap();
        refresh_shares(&mut shares, threshold, &mut rng).unwrap();
        assert_ne!(shares, before, "refresh must re-randomize share values");

        let subset: Vec<Share> = shares
            .iter()
            .cloned()
            .choose_multiple(&mut rng, threshold);
        assert_eq!(combine_shares(&subset, threshold).unwrap(), secret);
    }

    #[test]
    fn test_refresh_rejects_empty_set() {
        let mut rng = rand::thread_rng();
        let mut empty: Vec<Share> = Vec::new();
        assert_eq!(
            refresh_shares(&mut empty, 3, &mut rng).unwrap_err(),
            Error::InsufficientShares {
                required: 3,
                supplied: 0
            }
        );
    }

    #[test]
    fn test_exponent_sized_secret() {
        // A private-exponent-sized secret survives split, refresh, and a
        // quorum-only reconstruction.
        let secret = (BigInt::one() << 200) + BigInt::from(987_654_321i64);
        let threshold = 5;
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let mut shares = split_secret(&secret, threshold, 8, &mut rng).unwrap();
        refresh_shares(&mut shares, threshold, &mut rng).unwrap();

        let subset: Vec<Share> = shares.into_iter().take(threshold).collect();
        assert_eq!(combine_shares(&subset, threshold).unwrap(), secret);
    }

    #[test]
    fn test_split_deterministic_with_seeded_rng() {
        let secret = BigInt::from(42);
        let mut a = ChaCha8Rng::seed_from_u64(5);
        let mut b = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            split_secret(&secret, 3, 5, &mut a).unwrap(),
            split_secret(&secret, 3, 5, &mut b).unwrap()
        );
    }
}
