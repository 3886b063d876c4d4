//! Deterministic randomness
//!
//! Everything random inside the hashing pipeline comes from a
//! [`RandomStream`]: a SHA-256-keyed ChaCha20 keystream that is a pure
//! function of its seed. Neighbor selection, buffer filling, output
//! expansion and the per-worker streams of the parallel strategy all use it.
//!
//! Design goals:
//! - Deterministic expansion from arbitrary seed material
//! - Strict seeding/finalized states with distinguished errors
//! - Uniform integer sampling without modulo bias
pub(crate) mod binomial;
pub(crate) mod chacha20;
mod stream;

pub use stream::RandomStream;
