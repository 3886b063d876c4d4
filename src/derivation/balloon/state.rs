//! Hash state: the buffer, the main random stream and the active mixing
//! strategy, driven through fill, `t_cost` mixes and extract.

use tracing::{debug, trace};

use super::memory::Memory;
use super::mix::Mixer;
use super::params::Options;
use crate::error::Error;
use crate::rng::RandomStream;

/// In-progress Balloon computation.
///
/// ```rust, ignore
/// let mut state = HashState::new(&opts, salt)?;
/// state.fill(password, salt)?;
/// for _ in 0..state.options().t_cost {
///     state.mix()?;
/// }
/// state.extract(&mut out)?;
/// ```
pub struct HashState {
    opts: Options,
    mem: Memory,
    stream: RandomStream,
    mixer: Mixer,
    has_mixed: bool,
}

impl HashState {
    /// Validates `opts`, seeds the main stream from `salt` and allocates the
    /// buffer.
    pub fn new(opts: &Options, salt: &[u8]) -> Result<Self, Error> {
        let opts = opts.validated()?;

        let mut n_blocks = opts.n_blocks_even();
        let mut stream = RandomStream::with_seed(salt)?;
        let mixer = Mixer::new(&opts, &mut n_blocks, &mut stream)?;
        let mem = Memory::new(n_blocks, opts.block_size())?;

        debug!(
            mix = %opts.mix,
            primitive = %opts.primitive,
            combination = %opts.combination,
            n_blocks,
            block_size = opts.block_size(),
            n_neighbors = opts.n_neighbors,
            n_threads = opts.n_threads,
            "hash state initialized"
        );

        Ok(Self {
            opts,
            mem,
            stream,
            mixer,
            has_mixed: false,
        })
    }

    /// Fills the buffer from the password and salt.
    pub fn fill(&mut self, password: &[u8], salt: &[u8]) -> Result<(), Error> {
        self.mixer.fill(&mut self.mem, &self.opts, password, salt)
    }

    /// Runs one mixing pass.
    ///
    /// The state only counts as mixed once a pass has completed.
    pub fn mix(&mut self) -> Result<(), Error> {
        self.mixer.mix(&mut self.mem, &self.opts, &mut self.stream)?;
        self.has_mixed = true;
        trace!(rejections = self.stream.rejections(), "mix pass");
        Ok(())
    }

    /// Writes `out.len()` output bytes derived from the buffer.
    ///
    /// Fails with [`Error::CannotExtractBeforeMix`] if [`mix`](Self::mix)
    /// has not run yet. The state is left untouched.
    pub fn extract(&self, out: &mut [u8]) -> Result<(), Error> {
        if !self.has_mixed {
            return Err(Error::CannotExtractBeforeMix);
        }
        self.mixer.extract(&self.mem, &self.opts, out)
    }

    pub fn has_mixed(&self) -> bool {
        self.has_mixed
    }

    /// Normalized options in effect.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Number of blocks actually allocated (even, and a power of two for
    /// Catena).
    pub fn n_blocks(&self) -> usize {
        self.mem.n_blocks()
    }

    pub fn block_size(&self) -> usize {
        self.mem.block_size()
    }

    /// Read-only view of the whole buffer.
    pub fn buffer(&self) -> &[u8] {
        self.mem.as_bytes()
    }
}
