//! Balloon entry points
//!
//! [`hash`] computes a raw Balloon output of caller-chosen length.
//! [`hash_password`] and [`verify_password`] wrap it with a random salt
//! and the persisted `$balloon$v=1$...` format.

use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use super::params::{
    INLEN_MAX, INLEN_MIN, OUTLEN_MAX, OUTLEN_MIN, Options, SALTLEN_MAX, SALTLEN_MIN,
};
use super::state::HashState;
use crate::encoding::{read_blob, write_blob};
use crate::error::Error;
use crate::os::sys_random;

/// Salt length used by [`hash_password`].
pub const BLOB_SALT_LEN: usize = 16;
/// Digest length used by [`hash_password`].
pub const BLOB_HASH_LEN: usize = 32;

/// Computes a Balloon hash of `password` into `out`.
///
/// # Arguments
///
/// * `password` - The password to hash (`INLEN_MIN..INLEN_MAX` bytes)
/// * `salt` - A salt (`SALTLEN_MIN..SALTLEN_MAX` bytes)
/// * `opts` - Cost parameters, primitive and mixing strategy
/// * `out` - Output buffer (`OUTLEN_MIN..OUTLEN_MAX` bytes)
///
/// # Example
///
/// ```rust, ignore
/// use balloon::derivation::{Options, hash};
///
/// let mut out = [0u8; 32];
/// hash(b"my_password", b"random_salt_16b!", &Options::default(), &mut out)?;
/// ```
pub fn hash(password: &[u8], salt: &[u8], opts: &Options, out: &mut [u8]) -> Result<(), Error> {
    check_lengths(password, salt, out.len())?;

    let mut state = HashState::new(opts, salt)?;
    state.fill(password, salt)?;
    for _ in 0..state.options().t_cost {
        state.mix()?;
    }
    state.extract(out)
}

fn check_lengths(password: &[u8], salt: &[u8], outlen: usize) -> Result<(), Error> {
    if outlen < OUTLEN_MIN {
        return Err(Error::OutputTooShort);
    }
    if outlen >= OUTLEN_MAX {
        return Err(Error::OutputTooLong);
    }
    if password.len() < INLEN_MIN {
        return Err(Error::PasswordTooShort);
    }
    if password.len() >= INLEN_MAX {
        return Err(Error::PasswordTooLong);
    }
    if salt.len() < SALTLEN_MIN {
        return Err(Error::SaltTooShort);
    }
    if salt.len() >= SALTLEN_MAX {
        return Err(Error::SaltTooLong);
    }
    Ok(())
}

/// Hashes `password` under a fresh random salt and returns the persisted
/// `$balloon$v=1$...` string.
pub fn hash_password(password: &[u8], opts: &Options) -> Result<String, Error> {
    let opts = opts.validated()?;

    let mut salt = [0u8; BLOB_SALT_LEN];
    sys_random(&mut salt)?;

    let mut out = Zeroizing::new([0u8; BLOB_HASH_LEN]);
    hash(password, &salt, &opts, &mut out[..])?;

    write_blob(opts.m_cost, opts.t_cost, opts.n_threads, &salt, &out[..])
}

/// Checks `password` against a persisted hash.
///
/// The costs stored in `blob` override those of `opts`; the primitive,
/// combination and strategy come from `opts`. Any malformed blob yields
/// [`Error::Parse`]. The digest comparison runs in constant time.
pub fn verify_password(blob: &str, password: &[u8], opts: &Options) -> Result<bool, Error> {
    let stored = read_blob(blob)?;
    if !(OUTLEN_MIN..OUTLEN_MAX).contains(&stored.hash.len()) {
        return Err(Error::Parse);
    }

    let opts = Options {
        m_cost: u64::from(stored.s_cost),
        t_cost: stored.t_cost,
        n_threads: stored.p_cost,
        ..opts.clone()
    };

    let mut out = Zeroizing::new(vec![0u8; stored.hash.len()]);
    hash(password, &stored.salt, &opts, &mut out[..])?;

    let ok: bool = out[..].ct_eq(&stored.hash[..]).into();
    debug!(ok, "password verified");
    Ok(ok)
}
