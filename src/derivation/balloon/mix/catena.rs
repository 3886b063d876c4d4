//! Catena bit-reversal graph.
//!
//! A double buffer whose block count is rounded down to a power of two.
//! Destination block `i` is compressed from its predecessor and the source
//! block at the bit-reversed index of `i`. Neighbor selection is fixed, so
//! the main stream is never consulted.

use super::{Strategy, expand};
use crate::derivation::balloon::memory::{Half, Memory, block, split_at_block};
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::compress;
use crate::rng::RandomStream;

pub(crate) struct Catena {
    src: Half,
    /// Bits needed to index one half.
    n_bits: u32,
}

impl Catena {
    /// Rounds `n_blocks` down to a power of two.
    pub(crate) fn new(n_blocks: &mut u64) -> Self {
        let (rounded, bits) = nearest_power_of_two(*n_blocks);
        *n_blocks = rounded;
        Self {
            src: Half::First,
            n_bits: bits.saturating_sub(1),
        }
    }
}

/// Largest power of two not above `n` (at least 1), and its base-2
/// logarithm.
pub(crate) fn nearest_power_of_two(n: u64) -> (u64, u32) {
    let bits = (u64::BITS - 1).saturating_sub(n.max(1).leading_zeros());
    (1u64 << bits, bits)
}

/// Reverses the low `n_bits` bits of `x`.
pub(crate) fn reverse_bits(x: u64, n_bits: u32) -> u64 {
    if n_bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (u64::BITS - n_bits)
}

impl Strategy for Catena {
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
        _stream: &mut RandomStream,
    ) -> Result<(), Error> {
        let half = mem.half_blocks();
        let bs = mem.block_size();
        let (src, dst) = mem.split(self.src);

        for i in 0..half {
            let (done, cur) = split_at_block(dst, bs, i);
            let prev = if i == 0 {
                block(src, bs, half - 1)
            } else {
                block(done, bs, i - 1)
            };
            let neighbor = reverse_bits(i as u64, self.n_bits) as usize;

            compress(
                cur,
                &[prev, block(src, bs, neighbor)],
                opts.combination,
                opts.primitive,
            )?;
        }

        self.src = self.src.other();
        Ok(())
    }

    fn extract(&self, mem: &Memory, _opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        expand(out, &[mem.half(self.src)])
    }
}
