//! ChaCha20 keystream block function
//!
//! This module provides the ChaCha20 block function (RFC 8439) used as the
//! keystream generator behind [`RandomStream`](super::RandomStream).
//!
//! The stream is never used for encryption, only to expand a 256-bit key
//! into a long deterministic byte sequence. The nonce is therefore fixed to
//! zero and the 96-bit nonce field is repurposed as the high half of a
//! 64-bit block counter, so a stream can run past 2³² blocks without the
//! counter wrapping.

/// ChaCha20 constant words.
///
/// These values correspond to the ASCII string `"expand 32-byte k"`
/// encoded as little-endian `u32` words, as defined in RFC 8439.
const CHACHA20_CONSTANTS: [u32; 4] = [
    0x6170_7865, // "expa"
    0x3320_646e, // "nd 3"
    0x7962_2d32, // "2-by"
    0x6b20_6574, // "te k"
];

/// Size in bytes of one keystream block.
pub(crate) const BLOCK_LEN: usize = 64;

/// Performs one ChaCha20 quarter round.
#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Applies the full ChaCha20 permutation (20 rounds).
fn rounds(state: &mut [u32; 16]) {
    for _ in 0..10 {
        // Column rounds
        quarter_round(state, 0, 4, 8, 12);
        quarter_round(state, 1, 5, 9, 13);
        quarter_round(state, 2, 6, 10, 14);
        quarter_round(state, 3, 7, 11, 15);

        // Diagonal rounds
        quarter_round(state, 0, 5, 10, 15);
        quarter_round(state, 1, 6, 11, 12);
        quarter_round(state, 2, 7, 8, 13);
        quarter_round(state, 3, 4, 9, 14);
    }
}

/// Generates the 64-byte keystream block at position `counter`.
///
/// The low 32 bits of the counter occupy the RFC 8439 block-counter word;
/// the high 32 bits occupy the first nonce word. The remaining nonce words
/// are zero.
pub(crate) fn block(key: &[u8; 32], counter: u64) -> [u8; BLOCK_LEN] {
    let mut state = [0u32; 16];

    // Constants
    state[0..4].copy_from_slice(&CHACHA20_CONSTANTS);

    // Key (256-bit, as little-endian words)
    for (s, k) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
        *s = u32::from_le_bytes([k[0], k[1], k[2], k[3]]);
    }

    state[12] = counter as u32;
    state[13] = (counter >> 32) as u32;

    // Preserve original state for feed-forward
    let original = state;

    rounds(&mut state);

    state.iter_mut().zip(&original).for_each(|(s, o)| {
        *s = s.wrapping_add(*o);
    });

    let mut out = [0u8; BLOCK_LEN];
    out.chunks_exact_mut(4)
        .zip(&state)
        .for_each(|(chunk, word)| {
            chunk.copy_from_slice(&word.to_le_bytes());
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 8439 §2.3.2 uses nonce 00:00:00:09:00:00:00:4a:00:00:00:00, which
    /// cannot be expressed with a zero nonce; the all-zero key vector from
    /// §A.1 (test vector #1) can.
    #[test]
    fn zero_key_zero_counter_matches_rfc8439() {
        let out = block(&[0u8; 32], 0);
        let expected_prefix = [
            0x76, 0xb8, 0xe0, 0xad, 0xa0, 0xf1, 0x3d, 0x90, 0x40, 0x5d, 0x6a, 0xe5, 0x53, 0x86,
            0xbd, 0x28,
        ];
        assert_eq!(&out[..16], &expected_prefix);
    }

    #[test]
    fn high_counter_bits_change_the_block() {
        let key = [7u8; 32];
        assert_ne!(block(&key, 1), block(&key, 1 | (1 << 32)));
    }
}
