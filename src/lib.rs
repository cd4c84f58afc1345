//! # border-agent
//!
//! Core of a border agent bridging a constrained mesh network to an IP
//! network: service registrations made on the mesh side are advertised over
//! multicast DNS on the IP side.
//!
//! The crate provides:
//!
//! - A **cooperative reactor** that gathers readiness interests from its
//!   processors, blocks once per iteration, and fires timers in deadline
//!   order
//! - A **task runner**, the only safe way for other threads to hand work to
//!   the reactor thread
//! - An **advertising proxy** that turns one host update into several
//!   asynchronous publications and reports one aggregated result back
//! - A **stack event dispatcher** fanning mesh state changes out to listeners
//!
//! The mesh stack and the multicast DNS publisher are collaborators
//! supplied by the embedder through the [`Stack`] and [`Publisher`] traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use border_agent::{AgentBuilder, AgentConfig};
//!
//! let config = AgentConfig::load()?;
//! let mut agent = AgentBuilder::from_config(&config).build(stack, publisher)?;
//!
//! let handle = agent.handle();
//! std::thread::spawn(move || {
//!     handle.post(|| log::info!("hello from the reactor thread"));
//! });
//!
//! agent.run()?;
//! ```
//!
//! ## Modules
//!
//! - [`agent`]: collaborator contracts and the components built on them
//! - [`reactor`]: the event loop and its timers
//! - [`names`]: DNS-SD name splitting

mod config;
mod error;
mod runtime;

pub mod agent;
pub mod names;
pub mod reactor;

pub use agent::{
    AdvertisingProxy, Host, HostRef, Publisher, Service, Stack, StackEvent, StackEventDispatcher,
    StackListener,
};
pub use config::AgentConfig;
pub use error::{Error, Result};
pub use reactor::{Interest, MainloopContext, Processor, Reactor, ReactorHandle, TimerHandle};
pub use runtime::{AgentBuilder, BorderAgent, Task, TaskRunner};
