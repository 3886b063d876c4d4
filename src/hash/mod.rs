//! Block compression used by the mixing strategies.
//!
//! The hash functions themselves come from the RustCrypto `sha2`, `sha3`
//! and `blake2` crates; the Argon2 BlaMka round is implemented here since
//! no crate exposes it at block granularity.

pub(crate) mod blamka;
mod compress;

pub use compress::{Combination, Primitive, block_size, compress};
