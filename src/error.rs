use num_bigint::BigUint;
use thiserror::Error;

/// Failure conditions surfaced by the number-theoretic core.
///
/// All of these are deterministic, local conditions: the core never retries
/// across them (prime generation's retry budget is internal and
/// `PrimeGenerationExhausted` is its terminal outcome). No partial results
/// accompany an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No prime was found within the attempt budget at the requested bit length.
    #[error("no {bit_length}-bit prime found in {attempts} attempts")]
    PrimeGenerationExhausted {
        /// Requested candidate bit length
        bit_length: u64,
        /// Attempt budget that was exhausted
        attempts: u32,
    },

    /// The coprime public-exponent search hit its attempt cap.
    #[error("no public exponent coprime to the totient found in {attempts} attempts")]
    PublicExponentExhausted {
        /// Attempt cap that was exhausted
        attempts: u32,
    },

    /// gcd(a, modulus) != 1, so no modular inverse exists.
    #[error("modular inverse undefined: argument not coprime to modulus {modulus}")]
    ModularInverseUndefined {
        /// Modulus the inversion was attempted against
        modulus: BigUint,
    },

    /// Threshold below 1 or above the number of shares requested.
    #[error("invalid threshold {threshold} for {shares} shares")]
    InvalidThreshold {
        /// Requested reconstruction threshold
        threshold: usize,
        /// Requested or supplied share count
        shares: usize,
    },

    /// Fewer shares supplied than the threshold recorded at generation time.
    #[error("{supplied} shares supplied but {required} required to reconstruct")]
    InsufficientShares {
        /// Threshold the secret was split with
        required: usize,
        /// Number of shares actually supplied
        supplied: usize,
    },

    /// Two supplied shares carry the same x coordinate.
    #[error("duplicate share index {0}")]
    DuplicateShareIndex(u32),

    /// Lagrange interpolation did not divide evenly, so the supplied shares
    /// cannot all come from one generating polynomial.
    #[error("interpolation did not yield an exact integer secret")]
    ReconstructionInexact,

    /// A plaintext code point is >= the modulus and would wrap.
    #[error("code point {code_point} too large for modulus {modulus}")]
    MessageBlockTooLarge {
        /// Offending code point
        code_point: u32,
        /// Modulus of the key in use
        modulus: BigUint,
    },

    /// A decrypted block is not a valid Unicode scalar value.
    #[error("decrypted block {0} is not a valid code point")]
    CodePointDecode(BigUint),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
