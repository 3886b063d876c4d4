//! Parameter definitions and validation for Balloon hashing.
//!
//! This module defines the configurable cost parameters, the strategy and
//! primitive selectors, and the validator that normalizes them before any
//! memory is allocated.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;
use crate::hash::{Combination, Primitive, block_size};

/// Minimum output length in bytes.
pub const OUTLEN_MIN: usize = 16;
/// Output length bound in bytes (exclusive).
pub const OUTLEN_MAX: usize = 128;

/// Minimum password length in bytes.
pub const INLEN_MIN: usize = 4;
/// Password length bound in bytes (exclusive).
pub const INLEN_MAX: usize = 1 << 20;

/// Minimum salt length in bytes.
pub const SALTLEN_MIN: usize = 4;
/// Salt length bound in bytes (exclusive).
pub const SALTLEN_MAX: usize = 1 << 20;

/// Minimum number of passes over memory.
pub const TCOST_MIN: u32 = 1;

/// Minimum memory cost in bytes.
pub const MCOST_MIN: u64 = 1024;
/// Memory cost bound in bytes (exclusive). Keeps `n_blocks * block_size`
/// far below `u64::MAX`.
pub const MCOST_MAX: u64 = 1 << 48;

/// Floor on the number of blocks in the buffer.
pub const BLOCKS_MIN: u64 = 32;

/// Hard cap on worker threads.
pub const THREADS_MAX: u32 = 255;

/// Neighbor count used by every strategy in XOR combination.
pub(crate) const XOR_NEIGHBORS: u32 = 10;

/// Memory mixing strategy.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MixMethod {
    /// One buffer, hashed in place.
    SingleBuffer,
    /// Two halves, alternating source and destination.
    DoubleBuffer,
    /// Double buffer with the destination split across worker threads.
    DoubleBufferPar,
    /// Double buffer with XOR neighbors and a batched wide permutation.
    DoubleBufferPipe,
    /// Argon2-style uniform sampling with two inputs per block.
    Argon2Uniform,
    /// Catena bit-reversal graph.
    CatenaBrg,
    /// Sequential hash chain with a data-dependent random walk on extract.
    Scrypt,
}

impl MixMethod {
    pub const ALL: [MixMethod; 7] = [
        MixMethod::SingleBuffer,
        MixMethod::DoubleBuffer,
        MixMethod::DoubleBufferPar,
        MixMethod::DoubleBufferPipe,
        MixMethod::Argon2Uniform,
        MixMethod::CatenaBrg,
        MixMethod::Scrypt,
    ];

    fn name(self) -> &'static str {
        match self {
            MixMethod::SingleBuffer => "single",
            MixMethod::DoubleBuffer => "double",
            MixMethod::DoubleBufferPar => "double-par",
            MixMethod::DoubleBufferPipe => "double-pipe",
            MixMethod::Argon2Uniform => "argon2",
            MixMethod::CatenaBrg => "catena",
            MixMethod::Scrypt => "scrypt",
        }
    }

    /// True for the strategies that split the buffer into two halves.
    pub fn is_double(self) -> bool {
        matches!(
            self,
            MixMethod::DoubleBuffer
                | MixMethod::DoubleBufferPar
                | MixMethod::DoubleBufferPipe
                | MixMethod::CatenaBrg
        )
    }
}

impl fmt::Display for MixMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MixMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MixMethod::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or(Error::IncompatibleOptions("unknown mix method"))
    }
}

/// Configuration parameters for Balloon hashing.
///
/// `Options` is plain data; [`validate`](Options::validate) normalizes it
/// in place and rejects combinations that cannot run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// Memory cost in bytes.
    pub m_cost: u64,
    /// Number of mix passes.
    pub t_cost: u32,
    /// Worker threads (only the parallel strategy may use more than one).
    pub n_threads: u32,
    /// Neighbors per block; 0 selects the strategy default.
    pub n_neighbors: u32,
    /// Compression primitive.
    pub primitive: Primitive,
    /// Block combination mode.
    pub combination: Combination,
    /// Mixing strategy.
    pub mix: MixMethod,
}

impl Default for Options {
    /// 1 MiB, 3 passes, one thread, BLAKE2b, hash combination, double buffer.
    fn default() -> Self {
        Self {
            m_cost: 1024 * 1024,
            t_cost: 3,
            n_threads: 1,
            n_neighbors: 0,
            primitive: Primitive::Blake2b,
            combination: Combination::Hash,
            mix: MixMethod::DoubleBuffer,
        }
    }
}

impl Options {
    /// Normalizes the options in place.
    ///
    /// Costs below their minimum are raised, a zero thread count becomes
    /// one, and a zero neighbor count is replaced with the strategy's
    /// default (except for the parallel strategy in XOR mode, which samples
    /// a degree per block). Validating already valid options changes
    /// nothing.
    pub fn validate(&mut self) -> Result<(), Error> {
        if self.t_cost < TCOST_MIN {
            self.t_cost = TCOST_MIN;
        }
        if self.m_cost < MCOST_MIN {
            self.m_cost = MCOST_MIN;
        }
        if self.m_cost >= MCOST_MAX {
            return Err(Error::MCostTooBig);
        }

        let per_block_degree =
            self.mix == MixMethod::DoubleBufferPar && self.combination == Combination::Xor;
        if self.n_neighbors == 0 && !per_block_degree {
            self.n_neighbors = self.default_neighbors();
        }
        if self.n_neighbors == 0 && self.combination != Combination::Xor {
            return Err(Error::NoNeighbors);
        }

        if self.n_threads == 0 {
            self.n_threads = 1;
        }
        if self.n_threads > THREADS_MAX {
            return Err(Error::ThreadsTooBig);
        }
        if self.mix != MixMethod::DoubleBufferPar && self.n_threads > 1 {
            return Err(Error::IncompatibleOptions(
                "only double-par may use more than one thread",
            ));
        }

        if self.mix == MixMethod::DoubleBufferPipe
            && (self.primitive != Primitive::ArgonPermutation
                || self.combination != Combination::Xor)
        {
            return Err(Error::IncompatibleOptions(
                "double-pipe requires the argon-perm primitive and xor combination",
            ));
        }
        if self.mix != MixMethod::DoubleBufferPipe && self.primitive == Primitive::ArgonPermutation
        {
            return Err(Error::IncompatibleOptions(
                "argon-perm is only compatible with double-pipe",
            ));
        }

        if self.mix == MixMethod::Scrypt && self.t_cost > 1 {
            return Err(Error::TCostTooBig);
        }

        if self.combination == Combination::Xor
            && !matches!(
                self.mix,
                MixMethod::DoubleBuffer | MixMethod::DoubleBufferPar | MixMethod::DoubleBufferPipe
            )
        {
            return Err(Error::IncompatibleOptions(
                "xor combination requires a double-buffer strategy",
            ));
        }

        let n_blocks = self.n_blocks_even();
        let bytes = n_blocks
            .checked_mul(self.block_size() as u64)
            .ok_or(Error::MCostTooBig)?;
        usize::try_from(bytes).map_err(|_| Error::MCostTooBig)?;

        // XOR neighbors are distinct blocks of one half.
        if self.combination == Combination::Xor && u64::from(self.n_neighbors) > n_blocks / 2 {
            return Err(Error::IncompatibleOptions(
                "xor combination needs at most one neighbor per block of a half",
            ));
        }

        if self.mix == MixMethod::DoubleBufferPar && u64::from(self.n_threads) > n_blocks / 2 {
            return Err(Error::ThreadsTooBig);
        }

        Ok(())
    }

    /// Returns a normalized copy of these options.
    pub fn validated(&self) -> Result<Self, Error> {
        let mut opts = self.clone();
        opts.validate()?;
        Ok(opts)
    }

    /// Block size of the selected primitive.
    pub fn block_size(&self) -> usize {
        block_size(self.primitive)
    }

    /// Number of blocks the memory cost buys, never below [`BLOCKS_MIN`].
    pub fn n_blocks(&self) -> u64 {
        (self.m_cost / self.block_size() as u64).max(BLOCKS_MIN)
    }

    /// Block count rounded up to even, as allocated by the hash state.
    pub(crate) fn n_blocks_even(&self) -> u64 {
        let n = self.n_blocks();
        n + n % 2
    }

    /// Fixed neighbor count for the selected strategy and combination.
    ///
    /// These are constants rather than functions of the buffer size so that
    /// runs at different memory costs stay comparable.
    pub fn default_neighbors(&self) -> u32 {
        if self.combination == Combination::Xor {
            return XOR_NEIGHBORS;
        }

        match self.mix {
            MixMethod::SingleBuffer => 20,
            MixMethod::DoubleBuffer | MixMethod::DoubleBufferPar => 20,
            MixMethod::Argon2Uniform | MixMethod::CatenaBrg | MixMethod::Scrypt => 1,
            MixMethod::DoubleBufferPipe => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_blocks_has_a_floor() {
        let opts = Options {
            m_cost: MCOST_MIN,
            ..Options::default()
        };
        assert_eq!(opts.n_blocks(), BLOCKS_MIN);

        let opts = Options {
            m_cost: 64 * 1000 + 63,
            ..Options::default()
        };
        assert_eq!(opts.n_blocks(), 1000);
        assert_eq!(opts.n_blocks_even(), 1000);

        let opts = Options {
            m_cost: 64 * 1001,
            ..Options::default()
        };
        assert_eq!(opts.n_blocks_even(), 1002);
    }

    #[test]
    fn mix_names_round_trip() {
        for m in MixMethod::ALL {
            assert_eq!(m.to_string().parse::<MixMethod>(), Ok(m));
        }
    }
}
