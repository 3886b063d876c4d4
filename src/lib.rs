//! Balloon memory-hard password hashing
//!
//! This crate implements the Balloon family of password hashing functions:
//! a password and salt are expanded into a large buffer, the buffer is
//! mixed `t_cost` times along a pseudo-random graph, and the output is
//! derived from the final buffer. Computing a hash with less memory than
//! the configured `m_cost` costs disproportionately more time.
//!
//! # Module overview
//!
//! - `derivation`
//!   The hashing pipeline. [`derivation::hash`] computes a raw hash;
//!   [`derivation::hash_password`] and [`derivation::verify_password`]
//!   work with the persisted `$balloon$v=1$...` format. The seven mixing
//!   strategies (single, double, double-par, double-pipe, argon2, catena,
//!   scrypt) are selected through [`derivation::Options`].
//!
//! - `hash`
//!   The block compressor that folds several memory blocks into one, over
//!   a selectable primitive (SHAKE128, BlaMka, BLAKE2b, SHA-512 or the wide
//!   BlaMka permutation), in hash or XOR-then-hash mode.
//!
//! - `rng`
//!   [`rng::RandomStream`], the deterministic seeded keystream behind every
//!   random choice the pipeline makes. It never touches OS entropy.
//!
//! - `encoding`
//!   Reading and writing the persisted hash format.
//!
//! # Design goals
//!
//! - Deterministic output for fixed inputs, including across threads
//! - Options validated before any memory is allocated
//! - Every failure reported as a distinguished [`Error`] value
//! - Secret-bearing buffers zeroed on drop

mod error;
mod os;

pub mod derivation;
pub mod encoding;
pub mod hash;
pub mod rng;

pub use error::Error;
