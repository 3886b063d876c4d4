//! Operating system entropy (Linux)
//!
//! Uses the `getrandom` system call, which reads directly from the kernel
//! entropy pool and blocks only until the pool is initialized at boot.

use libc::{EINTR, c_void, getrandom};

use crate::error::Error;

/// Fills a buffer with cryptographically secure random bytes from the OS.
///
/// Partial reads are retried until the buffer is full. Interrupted calls
/// are retried; any other failure is reported as [`Error::Entropy`].
pub(crate) fn sys_random(buf: &mut [u8]) -> Result<(), Error> {
    let mut filled = 0;

    while filled < buf.len() {
        let ret = unsafe {
            getrandom(
                buf[filled..].as_mut_ptr() as *mut c_void,
                buf.len() - filled,
                0,
            )
        };

        if ret < 0 {
            if std::io::Error::last_os_error().raw_os_error() == Some(EINTR) {
                continue;
            }
            return Err(Error::Entropy);
        }

        filled += ret as usize;
    }

    Ok(())
}
