use clap::{crate_version, Parser};
use num_bigint::{BigInt, BigUint};
use serde_json::json;
use std::error::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use keyshard::{
    combine_shares, decrypt_message, encrypt_message, generate_keypair, split_secret, PrivateKey,
    PublicKey, Share,
};

#[derive(Debug, Parser)]
#[command(name = "keyshard")]
#[command(version = crate_version!())]
#[command(
    about = "KEYSHARD - RSA key pairs with Shamir-sharded private exponents",
    long_about = "Keyshard generates demonstration RSA key pairs over arbitrary-precision integers and fragments the private exponent with Shamir's Secret Sharing. The generate subcommand prints the public key and the share set as JSON; encrypt turns a message into comma-separated integer blocks under a public key; decrypt rebuilds the private exponent from a quorum of x:y shares and decodes the blocks. All values are exchanged as decimal text, and nothing is persisted."
)]
enum CliArgument {
    /// Generate an RSA key pair and shard the private exponent into shares.
    Generate {
        /// Total number of shares to create
        #[clap(long, short)]
        shares: usize,

        /// Minimum number of shares needed to rebuild the private exponent
        #[clap(long, short)]
        threshold: usize,

        /// Bit length of the first prime
        #[clap(long, default_value_t = 10)]
        p_bits: u64,

        /// Bit length of the second prime
        #[clap(long, default_value_t = 11)]
        q_bits: u64,

        /// Sampling budget per prime
        #[clap(long, default_value_t = 1000)]
        max_attempts: u32,

        /// Miller-Rabin rounds per prime candidate
        #[clap(long, default_value_t = 10)]
        witness_rounds: u32,
    },
    /// Encrypt a message with a public key.
    Encrypt {
        /// Message to encrypt
        #[clap(long, short)]
        message: String,

        /// Modulus n, decimal
        #[clap(long)]
        n: String,

        /// Public exponent e, decimal
        #[clap(long)]
        e: String,
    },
    /// Rebuild the private exponent from shares and decrypt a message.
    Decrypt {
        /// Ciphertext blocks, decimal, comma separated
        #[clap(long, short, value_delimiter = ',')]
        ciphertext: Vec<String>,

        /// Modulus n, decimal
        #[clap(long)]
        n: String,

        /// Shares as x:y pairs, comma separated
        #[clap(long, short, value_delimiter = ',')]
        share: Vec<String>,

        /// Threshold the private exponent was split with
        #[clap(long, short)]
        threshold: usize,
    },
}

fn parse_share(raw: &str) -> Result<Share, Box<dyn Error>> {
    let (x, y) = raw
        .split_once(':')
        .ok_or("share must be given as x:y")?;
    Ok(Share {
        x: x.trim().parse()?,
        y: y.trim().parse::<BigInt>()?,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let opt = CliArgument::parse();

    match opt {
        CliArgument::Generate {
            shares,
            threshold,
            p_bits,
            q_bits,
            max_attempts,
            witness_rounds,
        } => {
            let mut rng = rand::thread_rng();
            let (public, private) =
                generate_keypair(p_bits, q_bits, max_attempts, witness_rounds, &mut rng)?;
            debug!(n = %public.n, "key pair generated");

            let key_shares =
                split_secret(&BigInt::from(private.d), threshold, shares, &mut rng)?;

            let out = json!({
                "public": { "n": public.n.to_string(), "e": public.e.to_string() },
                "threshold": threshold,
                "shares": key_shares
                    .iter()
                    .map(|s| json!({ "x": s.x, "y": s.y.to_string() }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        CliArgument::Encrypt { message, n, e } => {
            let key = PublicKey {
                n: n.parse::<BigUint>()?,
                e: e.parse::<BigUint>()?,
            };
            let ciphertext = encrypt_message(&message, &key)?;
            let blocks: Vec<String> = ciphertext.iter().map(|b| b.to_string()).collect();
            println!("{}", blocks.join(","));
        }
        CliArgument::Decrypt {
            ciphertext,
            n,
            share,
            threshold,
        } => {
            let shares = share
                .iter()
                .map(|s| parse_share(s))
                .collect::<Result<Vec<_>, _>>()?;
            let d = combine_shares(&shares, threshold)?;
            let key = PrivateKey {
                n: n.parse::<BigUint>()?,
                d: d.magnitude().clone(),
            };
            let blocks = ciphertext
                .iter()
                .map(|c| c.trim().parse::<BigUint>())
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", decrypt_message(&blocks, &key)?);
        }
    }

    Ok(())
}
