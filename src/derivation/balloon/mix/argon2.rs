//! Argon2-style uniform sampling.
//!
//! Only the first block is filled. Every block is then compressed from
//! exactly two inputs: its predecessor and one random block. On the first
//! pass the random block of block `i` is drawn from `[0, i)` (block 0 uses
//! itself); later passes draw from the whole buffer.

use super::{Strategy, expand};
use crate::derivation::balloon::memory::Memory;
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::compress;
use crate::rng::RandomStream;

pub(crate) struct Argon2 {
    passes: u64,
}

impl Argon2 {
    pub(crate) fn new() -> Self {
        Self { passes: 0 }
    }
}

impl Strategy for Argon2 {
    fn fill(
        &mut self,
        mem: &mut Memory,
        _opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error> {
        expand(mem.block_mut(0), &[password, salt])
    }

    fn mix(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        stream: &mut RandomStream,
    ) -> Result<(), Error> {
        let n = mem.n_blocks();
        let mut tmp = vec![0u8; mem.block_size()];

        for i in 0..n {
            let prev = if i == 0 && self.passes == 0 {
                0
            } else {
                (i + n - 1) % n
            };

            let block_max = if self.passes == 0 { i } else { n };
            let neighbor = if block_max == 0 {
                0
            } else {
                stream.rand_int(block_max as u64)? as usize
            };

            compress(
                &mut tmp,
                &[mem.block(prev), mem.block(neighbor)],
                opts.combination,
                opts.primitive,
            )?;
            mem.block_mut(i).copy_from_slice(&tmp);
        }

        self.passes += 1;
        Ok(())
    }

    fn extract(&self, mem: &Memory, _opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        expand(out, &[mem.last()])
    }
}
