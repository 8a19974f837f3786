//! The unsafe OS boundary: the four extended attribute primitives.
//!
//! Every wrapper reads errno immediately after the failing call, before
//! anything else can run on this thread and overwrite it. An empty buffer is
//! passed to the OS as a null pointer with zero capacity (a size probe).

use std::ffi::CStr;
use std::io;
use std::ptr;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
compile_error!("attrfs-raw supports Linux, Android, macOS and iOS");

/// The "no such attribute" errno.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) const ENOATTR: i32 = libc::ENODATA;

/// The "no such attribute" errno.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) const ENOATTR: i32 = libc::ENOATTR;

/// The errno reported when a fill buffer is smaller than the data.
pub(crate) const ERANGE: i32 = libc::ERANGE;

fn out_ptr(buf: &mut [u8]) -> *mut libc::c_void {
    if buf.is_empty() {
        ptr::null_mut()
    } else {
        buf.as_mut_ptr().cast()
    }
}

fn size_result(ret: libc::ssize_t) -> io::Result<usize> {
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret as usize)
    }
}

fn unit_result(ret: libc::c_int) -> io::Result<()> {
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod platform {
    use libc::{c_char, c_int, c_void, size_t, ssize_t};

    pub(super) unsafe fn getxattr(
        path: *const c_char,
        name: *const c_char,
        value: *mut c_void,
        size: size_t,
    ) -> ssize_t {
        libc::getxattr(path, name, value, size)
    }

    pub(super) unsafe fn setxattr(
        path: *const c_char,
        name: *const c_char,
        value: *const c_void,
        size: size_t,
    ) -> c_int {
        libc::setxattr(path, name, value, size, 0)
    }

    pub(super) unsafe fn listxattr(path: *const c_char, list: *mut c_char, size: size_t) -> ssize_t {
        libc::listxattr(path, list, size)
    }

    pub(super) unsafe fn removexattr(path: *const c_char, name: *const c_char) -> c_int {
        libc::removexattr(path, name)
    }
}

// Darwin takes an extra position argument (resource forks only) and an
// options bitmask; zero for both follows symlinks like the Linux calls.
#[cfg(any(target_os = "macos", target_os = "ios"))]
mod platform {
    use libc::{c_char, c_int, c_void, size_t, ssize_t};

    pub(super) unsafe fn getxattr(
        path: *const c_char,
        name: *const c_char,
        value: *mut c_void,
        size: size_t,
    ) -> ssize_t {
        libc::getxattr(path, name, value, size, 0, 0)
    }

    pub(super) unsafe fn setxattr(
        path: *const c_char,
        name: *const c_char,
        value: *const c_void,
        size: size_t,
    ) -> c_int {
        libc::setxattr(path, name, value, size, 0, 0)
    }

    pub(super) unsafe fn listxattr(path: *const c_char, list: *mut c_char, size: size_t) -> ssize_t {
        libc::listxattr(path, list, size, 0)
    }

    pub(super) unsafe fn removexattr(path: *const c_char, name: *const c_char) -> c_int {
        libc::removexattr(path, name, 0)
    }
}

/// Read the value of `name` into `buf`, or probe its size if `buf` is empty.
pub(crate) fn get(path: &CStr, name: &CStr, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: both strings are NUL-terminated; the value pointer is null or
    // points to `buf.len()` writable bytes.
    let ret = unsafe { platform::getxattr(path.as_ptr(), name.as_ptr(), out_ptr(buf), buf.len()) };
    size_result(ret)
}

/// Create or replace `name` with `value`.
pub(crate) fn set(path: &CStr, name: &CStr, value: &[u8]) -> io::Result<()> {
    // SAFETY: both strings are NUL-terminated; `value` is a valid slice.
    let ret = unsafe {
        platform::setxattr(
            path.as_ptr(),
            name.as_ptr(),
            value.as_ptr().cast(),
            value.len(),
        )
    };
    unit_result(ret)
}

/// Read the packed, NUL-separated name list into `buf`, or probe its size if
/// `buf` is empty.
pub(crate) fn list(path: &CStr, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: `path` is NUL-terminated; the list pointer is null or points to
    // `buf.len()` writable bytes.
    let ret = unsafe { platform::listxattr(path.as_ptr(), out_ptr(buf).cast(), buf.len()) };
    size_result(ret)
}

/// Delete `name`.
pub(crate) fn remove(path: &CStr, name: &CStr) -> io::Result<()> {
    // SAFETY: both strings are NUL-terminated.
    let ret = unsafe { platform::removexattr(path.as_ptr(), name.as_ptr()) };
    unit_result(ret)
}
