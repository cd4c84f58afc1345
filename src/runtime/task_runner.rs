use crate::error::Result;
use crate::reactor::poller::common::Interest;
use crate::reactor::poller::platform::{sys_close, sys_pipe, sys_read, sys_write};
use crate::reactor::{MainloopContext, Processor};

use log::error;
use std::collections::VecDeque;
use std::io;
use std::os::fd::RawFd;
use std::sync::Mutex;

/// A unit of work handed to the reactor thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Executes tasks posted from any thread on the reactor thread.
///
/// Posting pushes the task into a mutex protected FIFO and writes one byte
/// into a non-blocking pipe whose read end is part of the reactor's
/// readiness set. When the reactor sees the pipe readable it drains it and
/// runs the queued tasks.
///
/// This is the only safe way for foreign threads to touch state owned by
/// the reactor thread.
pub struct TaskRunner {
    /// Queue holding tasks not yet executed.
    queue: Mutex<VecDeque<Task>>,

    /// Read end of the wakeup pipe, watched by the reactor.
    read_fd: RawFd,

    /// Write end of the wakeup pipe, written by [`post`](Self::post).
    write_fd: RawFd,
}

impl TaskRunner {
    /// Creates a task runner and its wakeup pipe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) when the pipe cannot be
    /// created. There is no way to run without it.
    pub fn new() -> Result<Self> {
        let (read_fd, write_fd) = sys_pipe()?;

        Ok(Self {
            queue: Mutex::new(VecDeque::new()),
            read_fd,
            write_fd,
        })
    }

    /// Posts `task` for execution on the reactor thread.
    ///
    /// Tasks run sequentially in the order their posts acquired the queue
    /// lock. Safe to call from any number of threads concurrently.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.queue.lock().unwrap();
        queue.push_back(Box::new(task));

        // A failed write only matters if no earlier byte is still unread.
        let rc = sys_write(self.write_fd, &[1u8]);
        if rc != 1 {
            let err = io::Error::last_os_error();
            error!("failed to write wakeup pipe {}: {}", self.write_fd, err);
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Descriptor the reactor watches for readability.
    pub fn wakeup_fd(&self) -> RawFd {
        self.read_fd
    }

    /// Runs every task queued at the time of the call.
    ///
    /// The queue is swapped out under the lock and the lock is released
    /// before any task runs, so tasks may post further tasks. Those run on
    /// the next pass.
    pub fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.queue.lock().unwrap());
        let count = tasks.len();

        for task in tasks {
            task();
        }

        count
    }

    fn drain_wakeup(&self) {
        let mut buffer = [0u8; 64];

        while sys_read(self.read_fd, &mut buffer) > 0 {}
    }
}

impl Processor for TaskRunner {
    fn update(&self, mainloop: &mut MainloopContext) {
        mainloop.add_fd(self.read_fd, Interest::READABLE);
    }

    fn process(&self, mainloop: &MainloopContext) {
        if mainloop.is_readable(self.read_fd) {
            self.drain_wakeup();
            self.run_pending();
        }
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        sys_close(self.read_fd);
        sys_close(self.write_fd);
    }
}
