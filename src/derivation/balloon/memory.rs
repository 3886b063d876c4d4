//! Memory buffer for the hash state.
//!
//! The buffer is one contiguous, zeroed-on-drop allocation of
//! `n_blocks × block_size` bytes. Blocks are addressed by index, never by
//! pointer; the double-buffer strategies view it as two halves of
//! `n_blocks / 2` blocks each and borrow them disjointly.

use zeroize::Zeroizing;

use crate::error::Error;

/// One of the two halves of a double buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Half {
    First,
    Second,
}

impl Half {
    pub(crate) fn other(self) -> Self {
        match self {
            Half::First => Half::Second,
            Half::Second => Half::First,
        }
    }
}

pub(crate) struct Memory {
    bytes: Zeroizing<Vec<u8>>,
    block_size: usize,
    n_blocks: usize,
}

impl Memory {
    pub(crate) fn new(n_blocks: u64, block_size: usize) -> Result<Self, Error> {
        let n_blocks = usize::try_from(n_blocks).map_err(|_| Error::MCostTooBig)?;
        let len = n_blocks
            .checked_mul(block_size)
            .ok_or(Error::MCostTooBig)?;

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| Error::Alloc)?;
        bytes.resize(len, 0);

        Ok(Self {
            bytes: Zeroizing::new(bytes),
            block_size,
            n_blocks,
        })
    }

    #[inline]
    pub(crate) fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    #[inline]
    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub(crate) fn half_blocks(&self) -> usize {
        self.n_blocks / 2
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub(crate) fn block(&self, i: usize) -> &[u8] {
        block(&self.bytes, self.block_size, i)
    }

    pub(crate) fn block_mut(&mut self, i: usize) -> &mut [u8] {
        block_mut(&mut self.bytes, self.block_size, i)
    }

    pub(crate) fn last(&self) -> &[u8] {
        self.block(self.n_blocks - 1)
    }

    fn half_range(&self, half: Half) -> core::ops::Range<usize> {
        let len = self.half_blocks() * self.block_size;
        match half {
            Half::First => 0..len,
            Half::Second => len..2 * len,
        }
    }

    pub(crate) fn half(&self, half: Half) -> &[u8] {
        &self.bytes[self.half_range(half)]
    }

    pub(crate) fn half_mut(&mut self, half: Half) -> &mut [u8] {
        let range = self.half_range(half);
        &mut self.bytes[range]
    }

    /// Borrows `src` for reading and the other half for writing.
    pub(crate) fn split(&mut self, src: Half) -> (&[u8], &mut [u8]) {
        let len = self.half_blocks() * self.block_size;
        let (first, rest) = self.bytes.split_at_mut(len);
        let second = &mut rest[..len];
        match src {
            Half::First => (first, second),
            Half::Second => (second, first),
        }
    }
}

/// Block `i` of `span`.
#[inline]
pub(crate) fn block(span: &[u8], block_size: usize, i: usize) -> &[u8] {
    &span[i * block_size..(i + 1) * block_size]
}

#[inline]
pub(crate) fn block_mut(span: &mut [u8], block_size: usize, i: usize) -> &mut [u8] {
    &mut span[i * block_size..(i + 1) * block_size]
}

/// Splits `span` at block `i` into the already written prefix and block
/// `i` itself, so the previous block can be read while `i` is written.
#[inline]
pub(crate) fn split_at_block(span: &mut [u8], block_size: usize, i: usize) -> (&[u8], &mut [u8]) {
    let (done, rest) = span.split_at_mut(i * block_size);
    (done, &mut rest[..block_size])
}
