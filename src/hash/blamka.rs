//! BlaMka block operations.
//!
//! This module defines the 1024-byte block structure and the compression
//! function G from Argon2, used here as two of the block compressor's
//! backends: the chained `Argon` primitive and the wide `ArgonPermutation`.
//! The compression function is based on the BLAKE2b round function but
//! uses additional multiplication operations for enhanced diffusion.

use zeroize::Zeroize;

/// Size in bytes of one BlaMka block.
pub(crate) const BLOCK_LEN: usize = 1024;

const WORDS: usize = BLOCK_LEN / 8;

/// A 1024-byte block (128 × 64-bit words), zeroed on drop.
#[derive(Debug, Clone)]
pub(crate) struct Block(pub(crate) [u64; WORDS]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; WORDS]);

    /// Loads a block from a little-endian byte span of exactly
    /// [`BLOCK_LEN`] bytes. Callers check the length.
    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), BLOCK_LEN);
        let mut block = Self::ZERO;
        block
            .0
            .iter_mut()
            .zip(bytes.chunks_exact(8))
            .for_each(|(word, chunk)| {
                let mut w = [0u8; 8];
                w.copy_from_slice(chunk);
                *word = u64::from_le_bytes(w);
            });
        block
    }

    pub(crate) fn write_to(&self, out: &mut [u8]) {
        out.chunks_exact_mut(8)
            .zip(self.0.iter())
            .for_each(|(chunk, word)| chunk.copy_from_slice(&word.to_le_bytes()));
    }

    pub(crate) fn xor_slice(&mut self, bytes: &[u8]) {
        self.0
            .iter_mut()
            .zip(bytes.chunks_exact(8))
            .for_each(|(word, chunk)| {
                let mut w = [0u8; 8];
                w.copy_from_slice(chunk);
                *word ^= u64::from_le_bytes(w);
            });
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// Computes G(X, Y) = P(X ⊕ Y) ⊕ X ⊕ Y, where P applies the BlaMka
    /// round first on rows of 16 words, then on columns.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = Block::ZERO;
        r.0.iter_mut()
            .zip(x.0.iter().zip(y.0.iter()))
            .for_each(|(r, (a, b))| *r = a ^ b);
        r.permute()
    }

    /// Returns P(self) ⊕ self.
    pub(crate) fn permute(&self) -> Self {
        let mut z = self.clone();

        // Rows: P on 8 groups of 16 consecutive words
        for i in 0..8 {
            let base = 16 * i;
            let mut v = [0u64; 16];
            v.copy_from_slice(&z.0[base..base + 16]);
            permute_p(&mut v);
            z.0[base..base + 16].copy_from_slice(&v);
        }

        // Columns: P on 8 groups of interleaved word pairs
        for i in 0..8 {
            let mut v = [0u64; 16];
            for (k, pair) in v.chunks_exact_mut(2).enumerate() {
                pair[0] = z.0[2 * i + 16 * k];
                pair[1] = z.0[2 * i + 16 * k + 1];
            }

            permute_p(&mut v);

            for (k, pair) in v.chunks_exact(2).enumerate() {
                z.0[2 * i + 16 * k] = pair[0];
                z.0[2 * i + 16 * k + 1] = pair[1];
            }
        }

        z.0.iter_mut().zip(self.0.iter()).for_each(|(z, r)| *z ^= r);
        z
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// a + b + 2 × trunc(a) × trunc(b)
#[inline(always)]
fn fblamka(a: u64, b: u64) -> u64 {
    a.wrapping_add(b)
        .wrapping_add(2u64.wrapping_mul(a & 0xffff_ffff).wrapping_mul(b & 0xffff_ffff))
}

/// GB mixing function (Argon2 variant of BLAKE2b's G), rotations 32, 24,
/// 16 and 63.
#[inline(always)]
fn gb(a: u64, b: u64, c: u64, d: u64) -> (u64, u64, u64, u64) {
    let a = fblamka(a, b);
    let d = (d ^ a).rotate_right(32);
    let c = fblamka(c, d);
    let b = (b ^ c).rotate_right(24);
    let a = fblamka(a, b);
    let d = (d ^ a).rotate_right(16);
    let c = fblamka(c, d);
    let b = (b ^ c).rotate_right(63);
    (a, b, c, d)
}

/// One BlaMka round over a 4×4 matrix: columns, then diagonals.
#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    (v[0], v[4], v[8], v[12]) = gb(v[0], v[4], v[8], v[12]);
    (v[1], v[5], v[9], v[13]) = gb(v[1], v[5], v[9], v[13]);
    (v[2], v[6], v[10], v[14]) = gb(v[2], v[6], v[10], v[14]);
    (v[3], v[7], v[11], v[15]) = gb(v[3], v[7], v[11], v[15]);

    (v[0], v[5], v[10], v[15]) = gb(v[0], v[5], v[10], v[15]);
    (v[1], v[6], v[11], v[12]) = gb(v[1], v[6], v[11], v[12]);
    (v[2], v[7], v[8], v[13]) = gb(v[2], v[7], v[8], v[13]);
    (v[3], v[4], v[9], v[14]) = gb(v[3], v[4], v[9], v[14]);
}
