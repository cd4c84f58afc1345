//! Platform-specific readiness primitives.
//!
//! The reactor waits on a readiness set assembled afresh on every iteration,
//! so the only system calls it needs are `poll(2)`, non-blocking pipes and
//! raw reads/writes. They are wrapped here so that the rest of the crate
//! stays free of `unsafe`.

pub(crate) mod common;

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as platform;
