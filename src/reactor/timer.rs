use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Deferred work executed on the reactor thread when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + 'static>;

/// An entry in the reactor timer queue.
///
/// Entries are ordered by deadline, then by insertion sequence, so that two
/// timers sharing a deadline fire in the order they were scheduled.
struct TimerEntry {
    /// The time at which the timer should fire.
    deadline: Instant,

    /// Insertion sequence, breaks ties between equal deadlines.
    seq: u64,

    callback: TimerCallback,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Ord for TimerEntry {
    /// Orders timer entries by `(deadline, seq)`.
    ///
    /// The comparison is **reversed** so that a `BinaryHeap<TimerEntry>`
    /// behaves as a min-heap, where the earliest deadline is popped first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Deadline ordered queue of one-shot timers.
///
/// Timers cannot be cancelled once scheduled. A callback that may become
/// irrelevant has to check its own state when it runs.
#[derive(Default)]
pub struct TimerQueue {
    heap: BinaryHeap<TimerEntry>,
    next_seq: u64,
}

impl TimerQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to run once `deadline` has passed.
    pub fn schedule<F>(&mut self, deadline: Instant, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.heap.push(TimerEntry {
            deadline,
            seq,
            callback: Box::new(callback),
        });
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|entry| entry.deadline)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Fires every timer whose deadline is at or before `now`, in order.
    ///
    /// Returns the number of timers fired.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let due = self.take_due(now);
        let fired = due.len();

        for callback in due {
            callback();
        }

        fired
    }

    /// Removes the timers that are due at `now` without running them.
    ///
    /// Collecting the whole batch first keeps timers scheduled by a firing
    /// callback out of the current pass.
    fn take_due(&mut self, now: Instant) -> Vec<TimerCallback> {
        let mut due = Vec::new();

        while let Some(entry) = self.heap.peek() {
            if entry.deadline > now {
                break;
            }

            if let Some(entry) = self.heap.pop() {
                due.push(entry.callback);
            }
        }

        due
    }
}

/// Shared handle to the reactor's timer queue.
///
/// The handle is reactor-thread only. Callbacks, processors and tasks may
/// keep a clone and schedule further timers, including from inside a firing
/// timer.
#[derive(Clone, Default)]
pub struct TimerHandle {
    queue: Rc<RefCell<TimerQueue>>,
}

impl TimerHandle {
    /// Creates a handle to a new, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` at an absolute deadline.
    pub fn schedule_at<F>(&self, deadline: Instant, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.queue.borrow_mut().schedule(deadline, callback);
    }

    /// Schedules `callback` to run after `delay` has elapsed.
    pub fn schedule_after<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.schedule_at(Instant::now() + delay, callback);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().next_deadline()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Fires every timer due at `now`.
    ///
    /// The queue is not borrowed while callbacks run, so they are free to
    /// schedule new timers through this handle. Those are never eligible in
    /// the same pass.
    pub fn fire_due(&self, now: Instant) -> usize {
        let due = self.queue.borrow_mut().take_due(now);
        let fired = due.len();

        for callback in due {
            callback();
        }

        fired
    }
}
