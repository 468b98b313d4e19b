//! # RSA Key Generation with Shamir-Sharded Private Exponents
//!
//! This library implements two independent but composable cryptographic
//! primitives over arbitrary-precision integers: RSA key generation with
//! block-wise encryption/decryption, and Shamir's Secret Sharing (SSS) used
//! to split an RSA private exponent into redundant shares and reconstruct it
//! from a quorum.
//!
//! ## Shamir's Secret Sharing (SSS)
//!
//! Shamir's Secret Sharing is a cryptographic algorithm created by Adi
//! Shamir. A secret is divided into parts, giving each participant its own
//! unique part, with the property that a certain number of these parts are
//! needed to reconstruct the secret.
//!
//! ### The Mathematics Behind SSS
//!
//! The idea of SSS is based on polynomial interpolation. Given a secret `S`,
//! the algorithm chooses a random polynomial of degree `t-1` (where `t` is
//! the threshold number of shares needed to reconstruct the secret):
//!
//! ```ignore
//! f(x) = a0 + a1*x + a2*x^2 + ... + a(t-1)*x^(t-1)
//! ```
//!
//! where `a0 = S` (the secret), and `a1, ..., a(t-1)` are randomly chosen
//! coefficients. Each share corresponds to a point `(x, f(x))` on this
//! polynomial. With at least `t` points, the polynomial and hence the secret
//! can be reconstructed using Lagrange interpolation. This crate performs
//! the interpolation with exact rational arithmetic, so reconstruction is
//! exact at any secret magnitude and an inexact division is reported rather
//! than silently truncated.
//!
//! ## RSA over unbounded integers
//!
//! Key generation samples two probable primes of (typically distinct) bit
//! lengths by Miller-Rabin testing, derives the modulus `n = p*q` and the
//! totient `phi = (p-1)*(q-1)`, picks a public exponent `e` coprime to
//! `phi`, and inverts it to the private exponent `d`. The cipher is the
//! textbook block-wise one, one integer per code point: no padding, no
//! chunking, demonstration strength only.
//!
//! ### Example: splitting a private exponent
//!
//! ```rust
//! use num_bigint::BigInt;
//! use keyshard::{combine_shares, generate_keypair, split_secret};
//!
//! let mut rng = rand::thread_rng();
//! let (public, private) = generate_keypair(10, 11, 1000, 10, &mut rng).unwrap();
//!
//! // Shard the private exponent: 5 shares, any 3 reconstruct.
//! let shares = split_secret(&BigInt::from(private.d.clone()), 3, 5, &mut rng).unwrap();
//! let recovered = combine_shares(&shares[..3], 3).unwrap();
//! assert_eq!(recovered.magnitude(), &private.d);
//! ```
//!
//! All randomness flows through an injected `rand::Rng`, so tests (and
//! callers who need reproducibility) can supply a seeded generator.

/// The `error` module defines the crate's failure taxonomy: prime-search
/// exhaustion, undefined modular inverses, threshold and quorum violations,
/// inexact reconstruction, and oversized message blocks.
pub mod error;

/// The `numtheory` module implements the number-theoretic primitives the
/// rest of the crate builds on: extended Euclid, gcd, modular inverse, and
/// square-and-multiply modular exponentiation.
pub mod numtheory;

/// The `prime` module implements the Miller-Rabin probabilistic primality
/// test and a bounded-retry random prime generator built on it.
pub mod prime;

/// The `rsa` module derives public/private key pairs from two random primes
/// and implements the block-wise message cipher.
pub mod rsa;

/// The `sss` (Shamir's Secret Sharing) module splits secrets into shares,
/// reconstructs them from a quorum by exact Lagrange interpolation, and
/// proactively refreshes share sets without changing the secret.
pub mod sss;

pub use error::{Error, Result};
pub use rsa::{decrypt_message, encrypt_message, generate_keypair, PrivateKey, PublicKey};
pub use sss::{combine_shares, refresh_shares, split_secret, Share};
