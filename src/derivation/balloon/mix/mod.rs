//! Memory mixing strategies.
//!
//! Every strategy implements the same three steps over a [`Memory`]
//! buffer:
//!
//! - `fill` derives the initial contents from the password and salt through
//!   a fresh [`RandomStream`] seeded with `password || salt`, never through
//!   the state's main stream;
//! - `mix` rewrites the buffer once, drawing block-selection randomness from
//!   the main stream;
//! - `extract` stream-expands a designated part of the final buffer into the
//!   output.
//!
//! The strategy set is closed, so [`Mixer`] dispatches over an enum.

mod argon2;
mod catena;
mod double;
mod double_par;
mod pipe;
mod scrypt;
mod single;

use super::memory::Memory;
use super::params::{MixMethod, Options};
use crate::error::Error;
use crate::rng::RandomStream;

pub(crate) trait Strategy {
    fn fill(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error>;

    fn mix(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        stream: &mut RandomStream,
    ) -> Result<(), Error>;

    fn extract(&self, mem: &Memory, opts: &Options, out: &mut [u8]) -> Result<(), Error>;
}

pub(crate) enum Mixer {
    Single(single::Single),
    Double(double::Double),
    DoublePar(double_par::DoublePar),
    DoublePipe(pipe::DoublePipe),
    Argon2(argon2::Argon2),
    Catena(catena::Catena),
    Scrypt(scrypt::Scrypt),
}

impl Mixer {
    /// Builds the strategy for `opts`.
    ///
    /// Some strategies change the block count before the buffer is
    /// allocated (Catena rounds it to a power of two) or draw private
    /// state from the main stream (the parallel strategy seeds its worker
    /// streams), so both are passed in.
    pub(crate) fn new(
        opts: &Options,
        n_blocks: &mut u64,
        stream: &mut RandomStream,
    ) -> Result<Self, Error> {
        Ok(match opts.mix {
            MixMethod::SingleBuffer => Mixer::Single(single::Single),
            MixMethod::DoubleBuffer => Mixer::Double(double::Double::new()),
            MixMethod::DoubleBufferPar => {
                Mixer::DoublePar(double_par::DoublePar::new(opts, *n_blocks, stream)?)
            }
            MixMethod::DoubleBufferPipe => Mixer::DoublePipe(pipe::DoublePipe::new()),
            MixMethod::Argon2Uniform => Mixer::Argon2(argon2::Argon2::new()),
            MixMethod::CatenaBrg => Mixer::Catena(catena::Catena::new(n_blocks)),
            MixMethod::Scrypt => Mixer::Scrypt(scrypt::Scrypt),
        })
    }

    fn strategy(&self) -> &dyn Strategy {
        match self {
            Mixer::Single(s) => s,
            Mixer::Double(s) => s,
            Mixer::DoublePar(s) => s,
            Mixer::DoublePipe(s) => s,
            Mixer::Argon2(s) => s,
            Mixer::Catena(s) => s,
            Mixer::Scrypt(s) => s,
        }
    }

    fn strategy_mut(&mut self) -> &mut dyn Strategy {
        match self {
            Mixer::Single(s) => s,
            Mixer::Double(s) => s,
            Mixer::DoublePar(s) => s,
            Mixer::DoublePipe(s) => s,
            Mixer::Argon2(s) => s,
            Mixer::Catena(s) => s,
            Mixer::Scrypt(s) => s,
        }
    }

    pub(crate) fn fill(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error> {
        self.strategy_mut().fill(mem, opts, password, salt)
    }

    pub(crate) fn mix(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        stream: &mut RandomStream,
    ) -> Result<(), Error> {
        self.strategy_mut().mix(mem, opts, stream)
    }

    pub(crate) fn extract(&self, mem: &Memory, opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        self.strategy().extract(mem, opts, out)
    }
}

/// Fills `out` from a fresh stream seeded with the concatenation of
/// `seed_parts`.
pub(crate) fn expand(out: &mut [u8], seed_parts: &[&[u8]]) -> Result<(), Error> {
    let mut stream = RandomStream::new();
    for part in seed_parts {
        stream.seed_add(part)?;
    }
    stream.seed_finalize()?;
    stream.fill_buffer(out)
}

/// Draws `k` source-half neighbor indices for one destination block.
///
/// XOR combination requires distinct neighbors, since a block XORed with
/// itself cancels out.
pub(crate) fn draw_neighbors(
    stream: &mut RandomStream,
    out: &mut Vec<u64>,
    k: usize,
    max: u64,
    opts: &Options,
) -> Result<(), Error> {
    out.clear();
    out.resize(k, 0);
    let distinct = opts.combination == crate::hash::Combination::Xor;
    stream.rand_ints(out, max, distinct)
}
