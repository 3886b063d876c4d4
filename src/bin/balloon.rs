use std::process::ExitCode;
use std::time::Instant;

use balloon::derivation::{MixMethod, Options, hash_password, verify_password};
use balloon::hash::{Combination, Primitive};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Balloon memory-hard password hashing")]
struct Cli {
    /// Password to hash or verify
    password: String,

    /// Space cost in bytes
    #[arg(short = 's', long = "space", default_value_t = 1024 * 1024)]
    m_cost: u64,

    /// Time cost (number of mixing passes)
    #[arg(short = 't', long = "time", default_value_t = 3)]
    t_cost: u32,

    /// Number of worker threads (double-par only)
    #[arg(short = 'p', long = "parallelism", default_value_t = 1)]
    n_threads: u32,

    /// Neighbors per block (0 selects the strategy default)
    #[arg(short = 'n', long = "neighbors", default_value_t = 0)]
    n_neighbors: u32,

    /// Compression primitive: keccak, argon, blake2b, sha512, argon-perm
    #[arg(short = 'c', long = "primitive", default_value = "blake2b")]
    primitive: Primitive,

    /// Mixing strategy: single, double, double-par, double-pipe, argon2,
    /// catena, scrypt
    #[arg(short = 'm', long = "mix", default_value = "double")]
    mix: MixMethod,

    /// Combine neighbors with XOR before hashing
    #[arg(short = 'x', long = "xor")]
    xor: bool,

    /// Number of hashes to compute (for timing)
    #[arg(short = 'i', long = "iterations", default_value_t = 1)]
    iterations: u32,

    /// Verify the password against this stored hash instead of hashing
    #[arg(short = 'b', long = "blob")]
    blob: Option<String>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            m_cost: self.m_cost,
            t_cost: self.t_cost,
            n_threads: self.n_threads,
            n_neighbors: self.n_neighbors,
            primitive: self.primitive,
            combination: if self.xor {
                Combination::Xor
            } else {
                Combination::Hash
            },
            mix: self.mix,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = cli.options();

    if let Some(blob) = &cli.blob {
        return match verify_password(blob, cli.password.as_bytes(), &opts) {
            Ok(true) => {
                println!("ok");
                ExitCode::SUCCESS
            }
            Ok(false) => {
                println!("mismatch");
                ExitCode::FAILURE
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let iterations = cli.iterations.max(1);
    let start = Instant::now();
    let mut last = String::new();
    for _ in 0..iterations {
        match hash_password(cli.password.as_bytes(), &opts) {
            Ok(blob) => last = blob,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    let per_hash = start.elapsed().as_secs_f64() / f64::from(iterations);

    println!("{last}");
    println!("time: {per_hash:.6} s/hash");
    ExitCode::SUCCESS
}
