//! Reactor core and scheduling.
//!
//! This module implements the cooperative event loop of the agent.
//! The reactor is responsible for:
//! - collecting readiness interests from every registered processor,
//! - blocking once per iteration on the whole readiness set,
//! - handing readiness results back to the processors,
//! - firing timers in deadline order.
//!
//! Exactly one thread runs the reactor. Other threads reach it through
//! [`ReactorHandle`] or the [`TaskRunner`](crate::TaskRunner).

mod core;
mod mainloop;
mod timer;

pub(crate) mod poller;

pub use self::core::{Processor, Reactor, ReactorHandle};
pub use mainloop::MainloopContext;
pub use poller::common::Interest;
pub use timer::{TimerCallback, TimerHandle, TimerQueue};
