//! Balloon password hashing.
//!
//! Balloon is a memory-hard password hashing function: computing it
//! requires a buffer of `m_cost` bytes and `t_cost` sequential passes over
//! it, and computing it with less memory costs disproportionately more
//! time.
//!
//! # Algorithm Overview
//!
//! 1. **Setup**: validate the options, seed the main random stream from
//!    the salt and allocate `n_blocks` blocks of the primitive's block size.
//! 2. **Fill**: expand `password || salt` into the initial buffer.
//! 3. **Mix**: `t_cost` times, rewrite every block as the compression of
//!    its predecessor and pseudo-randomly chosen neighbors.
//! 4. **Extract**: stream-expand the final block (or half) into the output.
//!
//! # Mixing Strategies
//!
//! - **single**: one buffer updated in place.
//! - **double**: source and destination halves, swapped after each pass.
//! - **double-par**: double buffer split across worker threads, joined
//!   once per pass through a single block.
//! - **double-pipe**: XOR neighbors, then a batched wide permutation.
//! - **argon2**: two inputs per block, uniform sampling.
//! - **catena**: bit-reversal graph, no randomness.
//! - **scrypt**: hash chain with a data-dependent walk on extract.
//!
//! All strategies are deterministic: the same password, salt and options
//! produce the same output, whatever the thread count and scheduling.

pub mod core;
pub(crate) mod memory;
pub(crate) mod mix;
pub mod params;
pub(crate) mod state;
