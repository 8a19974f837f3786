//! The two-phase size-probe/fill protocol shared by `read` and `list`.
//!
//! The probe and the fill are separate OS calls, so another process can
//! change the attribute in between. The fill's returned length is
//! authoritative: a value that shrank comes back at its new length. A value
//! that grew makes the fill fail with `ERANGE`; that is retried at most once
//! and otherwise surfaced.

use std::io;

use log::debug;

use crate::sys;

/// Run probe/allocate/fill against `call`.
///
/// `call` performs one OS read: given an empty slice it must probe the size,
/// given a non-empty slice it must fill it and return the number of bytes
/// written.
pub(crate) fn probe_and_fill<F>(retry_on_resize: bool, mut call: F) -> io::Result<Vec<u8>>
where
    F: FnMut(&mut [u8]) -> io::Result<usize>,
{
    let attempts = if retry_on_resize { 2 } else { 1 };
    let mut attempt = 1;
    loop {
        let size = call(&mut [])?;
        // Some platforms reject a zero-capacity non-null buffer, so an empty
        // value never reaches the fill.
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; size];
        match call(&mut buf) {
            Ok(len) => {
                buf.truncate(len);
                return Ok(buf);
            }
            Err(err) if err.raw_os_error() == Some(sys::ERANGE) && attempt < attempts => {
                debug!(
                    "attribute grew past the probed {} bytes, retrying ({}/{})",
                    size, attempt, attempts
                );
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Split a packed name list into its NUL-terminated segments.
pub(crate) fn split_names(packed: &[u8]) -> impl Iterator<Item = &[u8]> {
    packed.split(|b| *b == 0).filter(|segment| !segment.is_empty())
}
