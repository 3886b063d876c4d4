//! Single-buffer strategy: every block is rehashed in place, in index
//! order, from its predecessor, itself and `n_neighbors` blocks drawn with
//! replacement from the whole buffer.

use super::{Strategy, expand};
use crate::derivation::balloon::memory::Memory;
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::compress;
use crate::rng::RandomStream;

pub(crate) struct Single;

impl Strategy for Single {
    fn fill(
        &mut self,
        mem: &mut Memory,
        _opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error> {
        expand(mem.as_bytes_mut(), &[password, salt])
    }

    fn mix(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        stream: &mut RandomStream,
    ) -> Result<(), Error> {
        let n = mem.n_blocks();
        let mut tmp = vec![0u8; mem.block_size()];
        let mut neighbors = Vec::with_capacity(opts.n_neighbors as usize);

        for i in 0..n {
            neighbors.clear();
            for _ in 0..opts.n_neighbors {
                neighbors.push(stream.rand_int(n as u64)? as usize);
            }

            let prev = (i + n - 1) % n;
            let mut blocks = Vec::with_capacity(neighbors.len() + 2);
            blocks.push(mem.block(prev));
            blocks.push(mem.block(i));
            blocks.extend(neighbors.iter().map(|&j| mem.block(j)));

            compress(&mut tmp, &blocks, opts.combination, opts.primitive)?;
            mem.block_mut(i).copy_from_slice(&tmp);
        }

        Ok(())
    }

    fn extract(&self, mem: &Memory, _opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        expand(out, &[mem.last()])
    }
}
