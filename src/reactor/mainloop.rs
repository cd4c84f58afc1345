use super::poller::common::Interest;
use super::poller::platform::sys_poll;

use libc::{POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT, pollfd};
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

/// Per-iteration state shared by every processor of the reactor.
///
/// During the update phase processors register descriptors they care about
/// and may shrink the proposed timeout. The reactor then blocks once on the
/// whole set, after which processors query the readiness of their own
/// descriptors during the process phase.
pub struct MainloopContext {
    /// Registered descriptors, one entry per fd.
    fds: Vec<pollfd>,

    /// Longest time the next wait may block.
    timeout: Duration,
}

impl MainloopContext {
    /// Creates an empty context whose wait would block for at most `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            fds: Vec::with_capacity(8),
            timeout,
        }
    }

    /// Adds `fd` to the readiness set.
    ///
    /// Registering the same descriptor twice merges both interests.
    pub fn add_fd(&mut self, fd: RawFd, interest: Interest) {
        let events = to_events(interest);

        if let Some(entry) = self.fds.iter_mut().find(|entry| entry.fd == fd) {
            entry.events |= events;
            return;
        }

        self.fds.push(pollfd {
            fd,
            events,
            revents: 0,
        });
    }

    /// Returns the interest currently registered for `fd`, if any.
    pub fn interest(&self, fd: RawFd) -> Option<Interest> {
        self.entry(fd).map(|entry| Interest {
            read: entry.events & POLLIN != 0,
            write: entry.events & POLLOUT != 0,
        })
    }

    /// Lowers the wait timeout to `timeout` if it is shorter than the
    /// current one.
    pub fn shrink_timeout(&mut self, timeout: Duration) {
        self.timeout = self.timeout.min(timeout);
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether `fd` was reported readable by the last wait.
    ///
    /// Hang-ups count as readable so that the owner gets a chance to
    /// observe the end of stream.
    pub fn is_readable(&self, fd: RawFd) -> bool {
        self.revents(fd) & (POLLIN | POLLHUP) != 0
    }

    pub fn is_writable(&self, fd: RawFd) -> bool {
        self.revents(fd) & POLLOUT != 0
    }

    pub fn has_error(&self, fd: RawFd) -> bool {
        self.revents(fd) & (POLLERR | POLLNVAL) != 0
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.fds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fds.is_empty()
    }

    /// Blocks until a registered descriptor is ready or the timeout expires.
    ///
    /// Returns the number of ready descriptors.
    pub(crate) fn wait(&mut self) -> io::Result<usize> {
        for entry in &mut self.fds {
            entry.revents = 0;
        }

        sys_poll(&mut self.fds, self.timeout)
    }

    fn entry(&self, fd: RawFd) -> Option<&pollfd> {
        self.fds.iter().find(|entry| entry.fd == fd)
    }

    fn revents(&self, fd: RawFd) -> i16 {
        self.entry(fd).map(|entry| entry.revents).unwrap_or(0)
    }
}

fn to_events(interest: Interest) -> i16 {
    let mut events = 0;

    if interest.read {
        events |= POLLIN;
    }
    if interest.write {
        events |= POLLOUT;
    }

    events
}
