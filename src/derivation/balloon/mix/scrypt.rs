//! scrypt-style sequential chain.
//!
//! `fill` builds the whole buffer as a hash chain from the first block.
//! `mix` has nothing to do. `extract` walks the buffer: an accumulator
//! starting at the last block is repeatedly compressed with the block its
//! own first eight bytes point to, `n_blocks` times, and the result is
//! stream-expanded.

use super::{Strategy, expand};
use crate::derivation::balloon::memory::{Memory, block, split_at_block};
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::compress;
use crate::rng::RandomStream;

pub(crate) struct Scrypt;

/// First eight bytes of a block as a little-endian integer.
fn integrify(block: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    let n = block.len().min(8);
    word[..n].copy_from_slice(&block[..n]);
    u64::from_le_bytes(word)
}

impl Strategy for Scrypt {
    fn fill(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error> {
        expand(mem.block_mut(0), &[password, salt])?;

        let bs = mem.block_size();
        let n = mem.n_blocks();
        let zeros = vec![0u8; bs];
        let buf = mem.as_bytes_mut();
        for i in 1..n {
            let (done, cur) = split_at_block(buf, bs, i);
            compress(
                cur,
                &[block(done, bs, i - 1), &zeros[..]],
                opts.combination,
                opts.primitive,
            )?;
        }

        Ok(())
    }

    fn mix(
        &mut self,
        _mem: &mut Memory,
        _opts: &Options,
        _stream: &mut RandomStream,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn extract(&self, mem: &Memory, opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        let n = mem.n_blocks();
        let mut acc = mem.last().to_vec();
        let mut next = vec![0u8; mem.block_size()];

        for _ in 0..n {
            let idx = (integrify(&acc) % n as u64) as usize;
            compress(
                &mut next,
                &[&acc[..], mem.block(idx)],
                opts.combination,
                opts.primitive,
            )?;
            core::mem::swap(&mut acc, &mut next);
        }

        expand(out, &[&acc[..]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrify_reads_little_endian_prefix() {
        let mut b = [0u8; 64];
        b[0] = 1;
        b[1] = 2;
        b[8] = 0xff;
        assert_eq!(integrify(&b), 0x0201);
    }
}
