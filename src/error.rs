//! Error type shared by every layer of the crate.
//!
//! Errors fall into four groups: configuration errors (rejected before any
//! memory is allocated), resource errors (entropy, threads), sequencing
//! errors (contract violations such as extracting before mixing), and parse
//! errors for the persisted hash format. Parse errors deliberately carry no
//! detail about which field was malformed.

/// Errors returned by the Balloon hashing functions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Requested output is shorter than `OUTLEN_MIN`.
    #[error("output length too small")]
    OutputTooShort,
    /// Requested output is at least `OUTLEN_MAX`.
    #[error("output length too big")]
    OutputTooLong,
    /// Password is shorter than `INLEN_MIN`.
    #[error("password too short")]
    PasswordTooShort,
    /// Password is at least `INLEN_MAX`.
    #[error("password too long")]
    PasswordTooLong,
    /// Salt is shorter than `SALTLEN_MIN`.
    #[error("salt too short")]
    SaltTooShort,
    /// Salt is at least `SALTLEN_MAX`.
    #[error("salt too long")]
    SaltTooLong,

    /// Memory cost would overflow the buffer size computation.
    #[error("memory cost too big")]
    MCostTooBig,
    /// The allocator refused the hash buffer.
    #[error("memory allocation failed")]
    Alloc,
    /// Time cost exceeds what the mixing strategy allows.
    #[error("time cost too big")]
    TCostTooBig,
    /// Neighbor count is zero outside of XOR combination.
    #[error("number of neighbors must be non-zero")]
    NoNeighbors,
    /// Thread count exceeds `THREADS_MAX` or the number of blocks per half.
    #[error("too many threads")]
    ThreadsTooBig,
    /// The selected options cannot be used together.
    #[error("incompatible options: {0}")]
    IncompatibleOptions(&'static str),

    /// A block span does not match the primitive's block size.
    #[error("block size mismatch: got {got}, expected {expected}")]
    BlockSize {
        /// Length of the offending span.
        got: usize,
        /// Block size of the selected primitive.
        expected: usize,
    },

    /// `extract` was called before any `mix`.
    #[error("cannot extract before mixing")]
    CannotExtractBeforeMix,
    /// Output was requested from a stream that was never finalized.
    #[error("random stream not finalized")]
    StreamUninitialized,
    /// Seed material was added to, or finalize called on, a finalized stream.
    #[error("random stream already finalized")]
    StreamFinalized,
    /// Sampling range is empty or too small for the requested distinct draws.
    #[error("sampling range too small")]
    MaxTooSmall,

    /// A worker thread could not run to completion.
    #[error("worker thread failed")]
    Thread,
    /// The operating system entropy source failed.
    #[error("entropy source failed")]
    Entropy,
    /// A value could not be written into the persisted hash format.
    #[error("unable to encode hash")]
    Encode,
    /// A persisted hash could not be parsed.
    #[error("unable to parse hash")]
    Parse,
}
