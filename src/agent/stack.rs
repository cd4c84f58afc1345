//! Contract of the mesh protocol stack and the processor driving it.

use super::host::HostRef;
use crate::error::Result;
use crate::reactor::{MainloopContext, Processor};

use std::rc::Rc;
use std::time::Duration;

/// Receives host updates: `(host, time the stack waits for the result)`.
pub type HostUpdateHandler = Rc<dyn Fn(HostRef, Option<Duration>)>;

/// Receives stack state changes.
pub type StateHandler = Rc<dyn Fn(&StackEvent)>;

/// Role of the device in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    Disabled,
    Detached,
    Child,
    Router,
    Leader,
}

impl DeviceRole {
    /// Whether the device is part of a mesh partition.
    pub fn is_attached(self) -> bool {
        matches!(
            self,
            DeviceRole::Child | DeviceRole::Router | DeviceRole::Leader
        )
    }
}

/// State change notification emitted by the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEvent {
    ThreadState { attached: bool },
    NetworkName(String),
    ExtPanId([u8; 8]),
    Pskc([u8; 16]),
    ThreadVersion(u16),
}

impl StackEvent {
    pub fn role_changed(role: DeviceRole) -> Self {
        StackEvent::ThreadState {
            attached: role.is_attached(),
        }
    }
}

/// The mesh side protocol stack.
///
/// Every method is called on the reactor thread.
pub trait Stack {
    /// Installs or clears the handler receiving host updates.
    fn set_host_update_handler(&self, handler: Option<HostUpdateHandler>);

    /// Installs or clears the handler receiving state changes.
    fn set_state_handler(&self, handler: Option<StateHandler>);

    /// Closes the update of `host` with `outcome`.
    fn report_result(&self, host: &HostRef, outcome: Result<()>);

    /// Whether the stack has deferred work that must run without waiting.
    fn has_pending_work(&self) -> bool;

    /// Registers the stack's own descriptors.
    fn update(&self, _mainloop: &mut MainloopContext) {}

    /// Runs the stack after the wait.
    fn process(&self, _mainloop: &MainloopContext) {}
}

/// Plugs a [`Stack`] into the reactor.
///
/// Pending stack work turns the next wait into a non-blocking poll.
pub struct StackDriver {
    stack: Rc<dyn Stack>,
}

impl StackDriver {
    /// Wraps `stack` so the reactor can drive it.
    pub fn new(stack: Rc<dyn Stack>) -> Self {
        Self { stack }
    }
}

impl Processor for StackDriver {
    fn update(&self, mainloop: &mut MainloopContext) {
        if self.stack.has_pending_work() {
            mainloop.shrink_timeout(Duration::ZERO);
        }

        self.stack.update(mainloop);
    }

    fn process(&self, mainloop: &MainloopContext) {
        self.stack.process(mainloop);
    }
}
