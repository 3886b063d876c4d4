//! Persisted hash format.
//!
//! A stored hash is a single line:
//!
//! ```text
//! $balloon$v=1$s=<space>,t=<time>,p=<threads>$<base64 salt>$<base64 hash>
//! ```
//!
//! Salt and hash use padded standard base64. The parameter list accepts the
//! keys `s`, `t` and `p` in any order; all three are required and a repeated
//! key keeps its last value. Any malformed field yields [`Error::Parse`]
//! without saying which one.

use base64::engine::{Engine as _, general_purpose::STANDARD};

use crate::error::Error;

const DELIM: char = '$';
const ALGORITHM: &str = "balloon";
const VERSION: &str = "v=1";

/// Decoded contents of a persisted hash.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PasswordBlob {
    /// Space (memory) cost.
    pub s_cost: u32,
    /// Time cost.
    pub t_cost: u32,
    /// Thread count.
    pub p_cost: u32,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

/// Writes a persisted hash.
///
/// Fails with [`Error::Encode`] when a cost does not fit in 32 bits or the
/// salt or hash is empty.
pub fn write_blob(
    s_cost: u64,
    t_cost: u32,
    p_cost: u32,
    salt: &[u8],
    hash: &[u8],
) -> Result<String, Error> {
    let s_cost = u32::try_from(s_cost).map_err(|_| Error::Encode)?;
    if salt.is_empty() || hash.is_empty() {
        return Err(Error::Encode);
    }

    Ok(format!(
        "{DELIM}{ALGORITHM}{DELIM}{VERSION}{DELIM}s={s_cost},t={t_cost},p={p_cost}{DELIM}{}{DELIM}{}",
        STANDARD.encode(salt),
        STANDARD.encode(hash),
    ))
}

/// Parses a persisted hash.
pub fn read_blob(blob: &str) -> Result<PasswordBlob, Error> {
    let fields: Vec<&str> = blob.split(DELIM).collect();
    let [empty, algorithm, version, params, salt, hash] = fields[..] else {
        return Err(Error::Parse);
    };

    if !empty.is_empty() || algorithm != ALGORITHM || version != VERSION {
        return Err(Error::Parse);
    }

    let (s_cost, t_cost, p_cost) = parse_options(params)?;
    let salt = decode(salt)?;
    let hash = decode(hash)?;

    Ok(PasswordBlob {
        s_cost,
        t_cost,
        p_cost,
        salt,
        hash,
    })
}

fn decode(field: &str) -> Result<Vec<u8>, Error> {
    match STANDARD.decode(field) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(Error::Parse),
    }
}

/// Parses a `key=value` list such as `t=15,s=014,p=1` into
/// `(s_cost, t_cost, p_cost)`.
pub fn parse_options(params: &str) -> Result<(u32, u32, u32), Error> {
    let mut s_cost = None;
    let mut t_cost = None;
    let mut p_cost = None;

    for pair in params.split(',') {
        let (key, value) = pair.split_once('=').ok_or(Error::Parse)?;
        let value = int_parse(value)?;
        match key {
            "s" => s_cost = Some(value),
            "t" => t_cost = Some(value),
            "p" => p_cost = Some(value),
            _ => return Err(Error::Parse),
        }
    }

    match (s_cost, t_cost, p_cost) {
        (Some(s), Some(t), Some(p)) => Ok((s, t, p)),
        _ => Err(Error::Parse),
    }
}

/// Parses an unsigned decimal integer that fits in 32 bits.
///
/// Only ASCII digits are accepted; leading zeros are allowed, signs and
/// whitespace are not.
pub fn int_parse(s: &str) -> Result<u32, Error> {
    if s.is_empty() {
        return Err(Error::Parse);
    }

    s.bytes().try_fold(0u32, |acc, b| {
        if !b.is_ascii_digit() {
            return Err(Error::Parse);
        }
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or(Error::Parse)
    })
}
