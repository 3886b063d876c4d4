//! Pipelined double buffer.
//!
//! Each pass first XORs `n_neighbors` distinct source blocks into every
//! destination block, then runs the wide permutation over the destination
//! in batches of [`PIPE_WIDTH`] blocks. Only the `argon-perm` primitive
//! with XOR combination is accepted for this strategy.

use super::{Strategy, draw_neighbors, expand};
use crate::derivation::balloon::memory::{Half, Memory, block, block_mut};
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::{Combination, compress};
use crate::rng::RandomStream;

/// Destination blocks permuted per batch.
pub(crate) const PIPE_WIDTH: usize = 4;

pub(crate) struct DoublePipe {
    src: Half,
}

impl DoublePipe {
    pub(crate) fn new() -> Self {
        Self { src: Half::First }
    }
}

impl Strategy for DoublePipe {
    fn fill(
        &mut self,
        mem: &mut Memory,
        _opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error> {
        expand(mem.half_mut(self.src), &[password, salt])
    }

    fn mix(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        stream: &mut RandomStream,
    ) -> Result<(), Error> {
        if opts.combination != Combination::Xor {
            return Err(Error::IncompatibleOptions(
                "double-pipe requires xor combination",
            ));
        }

        let half = mem.half_blocks();
        let bs = mem.block_size();
        let mut neighbors = Vec::with_capacity(opts.n_neighbors as usize);
        let (src, dst) = mem.split(self.src);

        for i in 0..half {
            draw_neighbors(
                stream,
                &mut neighbors,
                opts.n_neighbors as usize,
                half as u64,
                opts,
            )?;
            let cur = block_mut(dst, bs, i);
            for &j in &neighbors {
                cur.iter_mut()
                    .zip(block(src, bs, j as usize))
                    .for_each(|(d, s)| *d ^= s);
            }
        }

        let mut tmp = vec![0u8; bs];
        for batch in dst.chunks_mut(PIPE_WIDTH * bs) {
            for cur in batch.chunks_exact_mut(bs) {
                compress(&mut tmp, &[&*cur], Combination::Hash, opts.primitive)?;
                cur.copy_from_slice(&tmp);
            }
        }

        self.src = self.src.other();
        Ok(())
    }

    fn extract(&self, mem: &Memory, _opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        expand(out, &[mem.half(self.src)])
    }
}
