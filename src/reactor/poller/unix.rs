use libc::{F_GETFL, F_SETFL, O_NONBLOCK, c_int, close, fcntl, nfds_t, pipe, poll, pollfd, read, write};
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

/// Reads from a file descriptor into the given buffer.
///
/// Returns the number of bytes read, or a negative value on error.
/// The file descriptor **must** be non-blocking.
pub(crate) fn sys_read(fd: RawFd, buffer: &mut [u8]) -> isize {
    unsafe { read(fd, buffer.as_mut_ptr() as *mut _, buffer.len()) }
}

/// Writes the buffer to a file descriptor.
///
/// Returns the number of bytes written, or a negative value on error.
/// The file descriptor **must** be non-blocking.
pub(crate) fn sys_write(fd: RawFd, buffer: &[u8]) -> isize {
    unsafe { write(fd, buffer.as_ptr() as *const _, buffer.len()) }
}

/// Closes a file descriptor.
pub(crate) fn sys_close(fd: RawFd) {
    unsafe { close(fd) };
}

/// Sets a file descriptor to non-blocking mode.
pub(crate) fn sys_set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { fcntl(fd, F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { fcntl(fd, F_SETFL, flags | O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Creates a pipe whose both ends are non-blocking.
///
/// Returns `(read_end, write_end)`.
pub(crate) fn sys_pipe() -> io::Result<(RawFd, RawFd)> {
    let mut fds: [c_int; 2] = [-1; 2];

    let rc = unsafe { pipe(fds.as_mut_ptr()) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    for fd in fds {
        if let Err(e) = sys_set_nonblocking(fd) {
            sys_close(fds[0]);
            sys_close(fds[1]);
            return Err(e);
        }
    }

    Ok((fds[0], fds[1]))
}

/// Waits for readiness on the given descriptors using `poll(2)`.
///
/// The timeout is rounded up to whole milliseconds so that a sub-millisecond
/// deadline does not turn into a busy loop. An interrupted wait is reported
/// as zero ready descriptors.
pub(crate) fn sys_poll(fds: &mut [pollfd], timeout: Duration) -> io::Result<usize> {
    let mut millis = timeout.as_millis();
    if Duration::from_millis(millis as u64) < timeout {
        millis += 1;
    }
    let timeout_ms = millis.min(c_int::MAX as u128) as c_int;

    let n = unsafe { poll(fds.as_mut_ptr(), fds.len() as nfds_t, timeout_ms) };

    if n < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(0);
        }
        return Err(err);
    }

    Ok(n as usize)
}
