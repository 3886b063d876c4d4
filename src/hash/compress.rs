//! Block compressor
//!
//! Folds any number of fixed-size input blocks into one output block using
//! a selectable primitive. Two combination modes exist:
//!
//! - [`Combination::Hash`] feeds every input block to a single invocation
//!   of the primitive;
//! - [`Combination::Xor`] XORs inputs `1..n` into a scratch block, then
//!   hashes exactly two blocks: input 0 and the scratch block.
//!
//! Every span handed to [`compress`] must be exactly
//! [`block_size`]`(primitive)` bytes long.

use core::fmt;
use core::str::FromStr;

use sha2::{Digest, Sha512};
use sha3::Shake128;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use zeroize::Zeroizing;

use super::blamka::{self, Block};
use crate::error::Error;

/// Compression primitive behind [`compress`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    /// SHAKE128 sponge, one rate-sized block per input.
    Keccak1600,
    /// Argon2 BlaMka compression G: `G(b0, 0)`, then chained over the
    /// remaining inputs.
    Argon,
    /// BLAKE2b-512 over the concatenated inputs.
    Blake2b,
    /// SHA-512 over the concatenated inputs.
    Sha512,
    /// Wide BlaMka permutation over the XOR of the inputs. Only usable with
    /// the pipelined mixing strategy.
    ArgonPermutation,
}

/// How input blocks are combined before compression.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Combination {
    /// Hash every input block.
    Hash,
    /// XOR all inputs but the first, then hash the first with the XOR.
    Xor,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Keccak1600,
        Primitive::Argon,
        Primitive::Blake2b,
        Primitive::Sha512,
        Primitive::ArgonPermutation,
    ];

    fn name(self) -> &'static str {
        match self {
            Primitive::Keccak1600 => "keccak",
            Primitive::Argon => "argon",
            Primitive::Blake2b => "blake2b",
            Primitive::Sha512 => "sha512",
            Primitive::ArgonPermutation => "argon-perm",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primitive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or(Error::IncompatibleOptions("unknown primitive"))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combination::Hash => "hash",
            Combination::Xor => "xor",
        })
    }
}

impl FromStr for Combination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(Combination::Hash),
            "xor" => Ok(Combination::Xor),
            _ => Err(Error::IncompatibleOptions("unknown combination mode")),
        }
    }
}

/// Block size in bytes produced and consumed by `primitive`.
pub const fn block_size(primitive: Primitive) -> usize {
    match primitive {
        // SHAKE128 rate
        Primitive::Keccak1600 => 168,
        Primitive::Argon | Primitive::ArgonPermutation => blamka::BLOCK_LEN,
        Primitive::Blake2b | Primitive::Sha512 => 64,
    }
}

/// Compresses `inputs` into `out`.
///
/// # Errors
///
/// Returns [`Error::BlockSize`] when `out` or any input is not exactly
/// `block_size(primitive)` bytes, and [`Error::IncompatibleOptions`] when
/// `inputs` is empty.
pub fn compress(
    out: &mut [u8],
    inputs: &[&[u8]],
    combination: Combination,
    primitive: Primitive,
) -> Result<(), Error> {
    let expected = block_size(primitive);
    for span in inputs.iter().map(|b| b.len()).chain([out.len()]) {
        if span != expected {
            return Err(Error::BlockSize {
                got: span,
                expected,
            });
        }
    }

    let Some((first, rest)) = inputs.split_first() else {
        return Err(Error::IncompatibleOptions("no input blocks"));
    };

    match combination {
        Combination::Hash => hash_blocks(out, inputs, primitive),
        Combination::Xor => {
            let mut scratch = Zeroizing::new(vec![0u8; expected]);
            for block in rest {
                scratch
                    .iter_mut()
                    .zip(block.iter())
                    .for_each(|(s, b)| *s ^= b);
            }
            hash_blocks(out, &[*first, &scratch[..]], primitive)
        }
    }
}

fn hash_blocks(out: &mut [u8], inputs: &[&[u8]], primitive: Primitive) -> Result<(), Error> {
    match primitive {
        Primitive::Keccak1600 => {
            let mut sponge = Shake128::default();
            for block in inputs {
                Update::update(&mut sponge, block);
            }
            sponge.finalize_xof().read(out);
        }
        Primitive::Argon => {
            // G depends only on x ^ y, so the first block is compressed on
            // its own before chaining; otherwise {x, x} folds to zero.
            let mut acc = Block::compress(&Block::from_slice(inputs[0]), &Block::ZERO);
            for block in &inputs[1..] {
                acc = Block::compress(&acc, &Block::from_slice(block));
            }
            acc.write_to(out);
        }
        Primitive::ArgonPermutation => {
            let mut acc = Block::ZERO;
            for block in inputs {
                acc.xor_slice(block);
            }
            acc.permute().write_to(out);
        }
        Primitive::Blake2b => digest_into::<blake2::Blake2b512>(out, inputs),
        Primitive::Sha512 => digest_into::<Sha512>(out, inputs),
    }
    Ok(())
}

fn digest_into<D: Digest>(out: &mut [u8], inputs: &[&[u8]]) {
    let mut hasher = D::new();
    for block in inputs {
        Digest::update(&mut hasher, block);
    }
    out.copy_from_slice(&hasher.finalize());
}
