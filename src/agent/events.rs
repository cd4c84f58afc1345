use super::stack::StackEvent;
use crate::error::Result;

use log::warn;
use std::cell::RefCell;
use std::rc::Rc;

/// Observer of stack state changes.
pub trait StackListener {
    /// Called for every state change, in registration order.
    ///
    /// An error is logged and does not stop delivery to later listeners.
    fn on_stack_event(&self, event: &StackEvent) -> Result<()>;
}

/// Fans stack state changes out to registered listeners.
///
/// Registration is append-only.
#[derive(Default)]
pub struct StackEventDispatcher {
    listeners: RefCell<Vec<Rc<dyn StackListener>>>,
}

impl StackEventDispatcher {
    /// Creates a dispatcher without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener`; it is notified after every earlier listener.
    pub fn add_listener(&self, listener: Rc<dyn StackListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers `event` to every listener.
    ///
    /// The listener list is snapshotted first, so a listener registered
    /// during delivery only sees the next event.
    pub fn emit(&self, event: &StackEvent) {
        let listeners = self.listeners.borrow().clone();

        for listener in listeners {
            if let Err(e) = listener.on_stack_event(event) {
                warn!("stack listener failed to handle {:?}: {}", event, e);
            }
        }
    }
}
