//! Operating system entropy (macOS)

use libc::{c_void, getentropy};

use crate::error::Error;

/// `getentropy` refuses requests larger than this.
const MAX_REQUEST: usize = 256;

/// Fills a buffer with cryptographically secure random bytes from the OS.
pub(crate) fn sys_random(buf: &mut [u8]) -> Result<(), Error> {
    for chunk in buf.chunks_mut(MAX_REQUEST) {
        let ret = unsafe { getentropy(chunk.as_mut_ptr() as *mut c_void, chunk.len()) };
        if ret != 0 {
            return Err(Error::Entropy);
        }
    }
    Ok(())
}
