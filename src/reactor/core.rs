use super::mainloop::MainloopContext;
use super::timer::TimerHandle;
use crate::error::Result;
use crate::runtime::task_runner::TaskRunner;

use log::{debug, error};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A component driven by the reactor.
///
/// Every iteration the reactor first asks each processor to register its
/// descriptors and shrink the timeout ([`update`](Self::update)), blocks
/// once, then lets each processor consume the readiness results
/// ([`process`](Self::process)). Processors run in registration order.
pub trait Processor {
    fn update(&self, mainloop: &mut MainloopContext);

    fn process(&self, mainloop: &MainloopContext);
}

impl<P: Processor + ?Sized> Processor for Rc<P> {
    fn update(&self, mainloop: &mut MainloopContext) {
        (**self).update(mainloop);
    }

    fn process(&self, mainloop: &MainloopContext) {
        (**self).process(mainloop);
    }
}

impl<P: Processor + ?Sized> Processor for Arc<P> {
    fn update(&self, mainloop: &mut MainloopContext) {
        (**self).update(mainloop);
    }

    fn process(&self, mainloop: &MainloopContext) {
        (**self).process(mainloop);
    }
}

/// Single-threaded cooperative event loop.
///
/// The reactor owns the timer queue and the [`TaskRunner`] through which
/// other threads hand work over. It is not `Send`: everything it drives
/// lives on the thread that runs it.
pub struct Reactor {
    processors: Vec<Box<dyn Processor>>,

    task_runner: Arc<TaskRunner>,
    timers: TimerHandle,

    /// Upper bound of a single wait.
    poll_timeout: Duration,

    stopped: Arc<AtomicBool>,
}

impl Reactor {
    /// Creates a reactor whose waits never exceed `poll_timeout`.
    ///
    /// # Errors
    ///
    /// Fails when the task runner's wakeup pipe cannot be created.
    pub fn new(poll_timeout: Duration) -> Result<Self> {
        let task_runner = Arc::new(TaskRunner::new()?);

        let mut reactor = Self {
            processors: Vec::new(),
            task_runner: task_runner.clone(),
            timers: TimerHandle::new(),
            poll_timeout,
            stopped: Arc::new(AtomicBool::new(false)),
        };
        reactor.add_processor(task_runner);

        Ok(reactor)
    }

    /// Registers a processor. It is updated and processed after every
    /// processor registered before it.
    pub fn add_processor<P>(&mut self, processor: P)
    where
        P: Processor + 'static,
    {
        self.processors.push(Box::new(processor));
    }

    pub fn timers(&self) -> TimerHandle {
        self.timers.clone()
    }

    pub fn task_runner(&self) -> Arc<TaskRunner> {
        self.task_runner.clone()
    }

    /// Returns a handle usable from any thread.
    pub fn handle(&self) -> ReactorHandle {
        ReactorHandle {
            task_runner: self.task_runner.clone(),
            stopped: self.stopped.clone(),
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// Runs one update, wait and process iteration.
    pub fn run_once(&mut self) -> Result<()> {
        let mut mainloop = MainloopContext::new(self.poll_timeout);

        for processor in &self.processors {
            processor.update(&mut mainloop);
        }

        if let Some(deadline) = self.timers.next_deadline() {
            mainloop.shrink_timeout(deadline.saturating_duration_since(Instant::now()));
        }

        let ready = mainloop.wait()?;
        debug!(
            "reactor woke up: {} of {} descriptors ready",
            ready,
            mainloop.len()
        );

        let now = Instant::now();

        for processor in &self.processors {
            processor.process(&mainloop);
        }

        self.timers.fire_due(now);

        Ok(())
    }

    /// Runs the loop until [`ReactorHandle::stop`] is called.
    pub fn run(&mut self) -> Result<()> {
        while !self.stopped.load(Ordering::Acquire) {
            if let Err(e) = self.run_once() {
                error!("reactor iteration failed: {}", e);
                return Err(e);
            }
        }

        Ok(())
    }
}

/// Thread-safe handle to a [`Reactor`].
#[derive(Clone)]
pub struct ReactorHandle {
    task_runner: Arc<TaskRunner>,
    stopped: Arc<AtomicBool>,
}

impl ReactorHandle {
    /// Posts `task` for execution on the reactor thread.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.task_runner.post(task);
    }

    /// Asks the reactor to return from [`Reactor::run`].
    ///
    /// The current iteration completes first. A blocked wait is interrupted
    /// by posting an empty task.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.task_runner.post(|| {});
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
