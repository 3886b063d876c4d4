//! Double-buffer strategy.
//!
//! The buffer is split into a source and a destination half. Each
//! destination block is the compression of its predecessor (the last source
//! block for block 0) and `n_neighbors` source blocks. The halves swap roles
//! after every pass.

use super::{Strategy, draw_neighbors, expand};
use crate::derivation::balloon::memory::{Half, Memory, block, split_at_block};
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::compress;
use crate::rng::RandomStream;

pub(crate) struct Double {
    src: Half,
}

impl Double {
    pub(crate) fn new() -> Self {
        Self { src: Half::First }
    }
}

impl Strategy for Double {
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

            let (done, cur) = split_at_block(dst, bs, i);
            let prev = if i == 0 {
                block(src, bs, half - 1)
            } else {
                block(done, bs, i - 1)
            };

            let mut blocks = Vec::with_capacity(neighbors.len() + 1);
            blocks.push(prev);
            blocks.extend(neighbors.iter().map(|&j| block(src, bs, j as usize)));

            compress(cur, &blocks, opts.combination, opts.primitive)?;
        }

        self.src = self.src.other();
        Ok(())
    }

    fn extract(&self, mem: &Memory, _opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        expand(out, &[mem.half(self.src)])
    }
}
