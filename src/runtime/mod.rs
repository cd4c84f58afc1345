//! Agent runtime: the cross-thread task runner and the assembled agent.

mod builder;
mod core;

pub(crate) mod task_runner;

pub use self::core::BorderAgent;
pub use builder::AgentBuilder;
pub use task_runner::{Task, TaskRunner};
