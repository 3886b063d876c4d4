//! Password hashing and key derivation.

pub mod balloon;

pub use balloon::core::{BLOB_HASH_LEN, BLOB_SALT_LEN, hash, hash_password, verify_password};
pub use balloon::params::{
    BLOCKS_MIN, INLEN_MAX, INLEN_MIN, MCOST_MAX, MCOST_MIN, MixMethod, OUTLEN_MAX, OUTLEN_MIN,
    Options, SALTLEN_MAX, SALTLEN_MIN, THREADS_MAX, TCOST_MIN,
};
pub use balloon::state::HashState;
