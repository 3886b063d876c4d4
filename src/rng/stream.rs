//! Seeded deterministic random stream
//!
//! A [`RandomStream`] collects seed material, hashes it with SHA-256 into a
//! 256-bit ChaCha20 key, and from then on produces a keystream that is a
//! pure function of the seed bytes and of the sequence of requests made
//! against it. No other entropy ever enters.
//!
//! The stream has two states:
//!
//! - **seeding**: [`seed_add`](RandomStream::seed_add) accepts more bytes,
//!   every output request fails with [`Error::StreamUninitialized`];
//! - **finalized**: output requests succeed, further seeding fails with
//!   [`Error::StreamFinalized`].
//!
//! Every mixing strategy draws its block-selection randomness from one of
//! these streams, and every fill/extract step expands bytes through a fresh
//! one.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::chacha20::{self, BLOCK_LEN};
use crate::error::Error;

/// Number of keystream bytes produced per internal chunk in `fill_buffer`.
pub(crate) const CHUNK_LEN: usize = 512;

enum Phase {
    Seeding(Sha256),
    Finalized(Keystream),
}

struct Keystream {
    key: [u8; 32],
    counter: u64,
    block: [u8; BLOCK_LEN],
    /// Offset of the next unused byte in `block`; `BLOCK_LEN` when empty.
    pos: usize,
}

impl Keystream {
    fn new(key: [u8; 32]) -> Self {
        Self {
            key,
            counter: 0,
            block: [0u8; BLOCK_LEN],
            pos: BLOCK_LEN,
        }
    }

    fn refill(&mut self) {
        self.block = chacha20::block(&self.key, self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.pos = 0;
    }

    fn read(&mut self, out: &mut [u8]) {
        let mut offset = 0;
        while offset < out.len() {
            if self.pos == BLOCK_LEN {
                self.refill();
            }
            let take = (BLOCK_LEN - self.pos).min(out.len() - offset);
            out[offset..offset + take].copy_from_slice(&self.block[self.pos..self.pos + take]);
            self.pos += take;
            offset += take;
        }
    }
}

impl Drop for Keystream {
    fn drop(&mut self) {
        self.key.zeroize();
        self.block.zeroize();
    }
}

/// Deterministic pseudo-random byte and integer generator.
pub struct RandomStream {
    phase: Phase,
    rejections: u64,
}

impl RandomStream {
    /// Creates a stream in the seeding state.
    pub fn new() -> Self {
        Self {
            phase: Phase::Seeding(Sha256::new()),
            rejections: 0,
        }
    }

    /// Creates a stream seeded with `seed` and immediately finalizes it.
    pub fn with_seed(seed: &[u8]) -> Result<Self, Error> {
        let mut stream = Self::new();
        stream.seed_add(seed)?;
        stream.seed_finalize()?;
        Ok(stream)
    }

    /// Appends seed material. Order matters: `add(a); add(b)` seeds the
    /// stream with `a || b`.
    pub fn seed_add(&mut self, seed: &[u8]) -> Result<(), Error> {
        match &mut self.phase {
            Phase::Seeding(hasher) => {
                hasher.update(seed);
                Ok(())
            }
            Phase::Finalized(_) => Err(Error::StreamFinalized),
        }
    }

    /// Hashes the collected seed into the keystream key and switches the
    /// stream to the finalized state.
    pub fn seed_finalize(&mut self) -> Result<(), Error> {
        let hasher = match &mut self.phase {
            Phase::Seeding(hasher) => core::mem::take(hasher),
            Phase::Finalized(_) => return Err(Error::StreamFinalized),
        };

        let mut key: [u8; 32] = hasher.finalize().into();
        self.phase = Phase::Finalized(Keystream::new(key));
        key.zeroize();
        Ok(())
    }

    /// Returns true once [`seed_finalize`](Self::seed_finalize) succeeded.
    pub fn is_finalized(&self) -> bool {
        matches!(self.phase, Phase::Finalized(_))
    }

    fn keystream(&mut self) -> Result<&mut Keystream, Error> {
        match &mut self.phase {
            Phase::Finalized(ks) => Ok(ks),
            Phase::Seeding(_) => Err(Error::StreamUninitialized),
        }
    }

    /// Overwrites `out` with the next `out.len()` keystream bytes.
    ///
    /// The keystream is continuous across calls, so two consecutive fills
    /// of `a` and `b` bytes produce the same bytes as one fill of `a + b`.
    pub fn fill_buffer(&mut self, out: &mut [u8]) -> Result<(), Error> {
        let ks = self.keystream()?;
        for chunk in out.chunks_mut(CHUNK_LEN) {
            ks.read(chunk);
        }
        Ok(())
    }

    /// Draws a single byte.
    pub fn rand_byte(&mut self) -> Result<u8, Error> {
        let mut b = [0u8; 1];
        self.fill_buffer(&mut b)?;
        Ok(b[0])
    }

    /// Draws eight bytes interpreted as a little-endian `u64`.
    pub fn rand_u64(&mut self) -> Result<u64, Error> {
        let mut b = [0u8; 8];
        self.fill_buffer(&mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    /// Draws an integer uniformly from `[0, max)`.
    ///
    /// Draws the fewest bytes that can hold `max`, masks the result down to
    /// the smallest power-of-two range containing `max`, and redraws while
    /// the value is out of range.
    pub fn rand_int(&mut self, max: u64) -> Result<u64, Error> {
        if max == 0 {
            return Err(Error::MaxTooSmall);
        }

        let n_bytes = bytes_required(max);
        let mask = mask_for(bits_in_int(max));
        let mut buf = [0u8; 8];

        loop {
            self.fill_buffer(&mut buf[..n_bytes])?;
            let value = bytes_to_int(&buf[..n_bytes]) & mask;
            if value < max {
                return Ok(value);
            }
            self.rejections += 1;
        }
    }

    /// Fills `out` with integers drawn uniformly from `[0, max)`.
    ///
    /// With `distinct`, every accepted value differs from the values already
    /// accepted in this batch; a collision is redrawn. Fails with
    /// [`Error::MaxTooSmall`] before drawing anything when `distinct` is set
    /// and `max < out.len()`.
    pub fn rand_ints(&mut self, out: &mut [u64], max: u64, distinct: bool) -> Result<(), Error> {
        if distinct && max < out.len() as u64 {
            return Err(Error::MaxTooSmall);
        }

        for i in 0..out.len() {
            loop {
                let candidate = self.rand_int(max)?;
                if !distinct || !out[..i].contains(&candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Number of rejection-sampling redraws performed so far by `rand_int`.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }
}

impl Default for RandomStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest byte count `n <= 8` such that `val < 2^(8n)`.
fn bytes_required(val: u64) -> usize {
    (1..8).find(|n| val < 1u64 << (8 * n)).unwrap_or(8)
}

/// Number of significant bits in `val`.
fn bits_in_int(val: u64) -> u32 {
    u64::BITS - val.leading_zeros()
}

fn mask_for(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Assembles up to eight bytes into an integer, most significant first.
fn bytes_to_int(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_int_is_big_endian() {
        let mut buf = [0u8; 8];
        assert_eq!(bytes_to_int(&buf), 0);
        assert_eq!(bytes_to_int(&buf[..0]), 0);

        buf[0] = 5;
        assert_eq!(bytes_to_int(&buf[..1]), 5);
        assert_eq!(bytes_to_int(&buf[..2]), 5 * 256);
        assert_eq!(bytes_to_int(&buf[..3]), 5 * 256 * 256);

        buf[2] = 123;
        assert_eq!(bytes_to_int(&buf[..3]), 5 * 256 * 256 + 123);
    }

    #[test]
    fn bytes_required_uses_full_width() {
        assert_eq!(bytes_required(1), 1);
        assert_eq!(bytes_required(255), 1);
        assert_eq!(bytes_required(256), 2);
        assert_eq!(bytes_required(1 << 24), 4);
        assert_eq!(bytes_required(1 << 32), 5);
        assert_eq!(bytes_required(1 << 40), 6);
        assert_eq!(bytes_required(u64::MAX), 8);
    }

    #[test]
    fn bit_counting() {
        assert_eq!(bits_in_int(0), 0);
        assert_eq!(bits_in_int(1), 1);
        assert_eq!(bits_in_int(3), 2);
        assert_eq!(bits_in_int(4), 3);
        assert_eq!(bits_in_int(u64::MAX), 64);
        assert_eq!(mask_for(64), u64::MAX);
        assert_eq!(mask_for(3), 0b111);
    }

    #[test]
    fn fill_is_continuous_across_calls() {
        let mut a = RandomStream::with_seed(b"abcde").unwrap();
        let mut b = RandomStream::with_seed(b"abcde").unwrap();

        let mut whole = vec![0u8; 1000];
        a.fill_buffer(&mut whole).unwrap();

        let mut first = vec![0u8; 3];
        let mut second = vec![0u8; 997];
        b.fill_buffer(&mut first).unwrap();
        b.fill_buffer(&mut second).unwrap();

        assert_eq!(&whole[..3], &first[..]);
        assert_eq!(&whole[3..], &second[..]);
    }
}
