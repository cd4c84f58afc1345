use super::task_runner::TaskRunner;
use crate::agent::{
    AdvertisingProxy, Publisher, Stack, StackDriver, StackEvent, StackEventDispatcher,
};
use crate::error::Result;
use crate::reactor::{Reactor, ReactorHandle, TimerHandle};

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// The assembled border agent.
///
/// `BorderAgent` is responsible for:
/// - driving the mesh stack and the task runner from one reactor,
/// - feeding stack state changes to the [`StackEventDispatcher`],
/// - advertising host updates through the [`AdvertisingProxy`].
///
/// It lives on the thread that runs it. Other threads use
/// [`handle`](Self::handle).
pub struct BorderAgent {
    reactor: Reactor,

    stack: Rc<dyn Stack>,
    proxy: Rc<AdvertisingProxy>,
    dispatcher: Rc<StackEventDispatcher>,
}

impl BorderAgent {
    /// Wires the agent together.
    ///
    /// The proxy always listens to stack state changes; with `start_proxy`
    /// it is also started right away.
    pub(crate) fn new(
        stack: Rc<dyn Stack>,
        publisher: Rc<dyn Publisher>,
        poll_timeout: Duration,
        update_timeout: Option<Duration>,
        start_proxy: bool,
    ) -> Result<Self> {
        let mut reactor = Reactor::new(poll_timeout)?;
        reactor.add_processor(StackDriver::new(stack.clone()));

        let proxy =
            AdvertisingProxy::with_timers(publisher, stack.clone(), reactor.timers(), update_timeout);

        let dispatcher = Rc::new(StackEventDispatcher::new());
        dispatcher.add_listener(proxy.clone());

        let weak = Rc::downgrade(&dispatcher);
        stack.set_state_handler(Some(Rc::new(move |event: &StackEvent| {
            if let Some(dispatcher) = weak.upgrade() {
                dispatcher.emit(event);
            }
        })));

        if start_proxy {
            proxy.start();
        }

        Ok(Self {
            reactor,
            stack,
            proxy,
            dispatcher,
        })
    }

    /// Runs the agent until [`ReactorHandle::stop`] is called.
    pub fn run(&mut self) -> Result<()> {
        self.reactor.run()
    }

    /// Runs a single reactor iteration.
    pub fn run_once(&mut self) -> Result<()> {
        self.reactor.run_once()
    }

    pub fn handle(&self) -> ReactorHandle {
        self.reactor.handle()
    }

    pub fn proxy(&self) -> Rc<AdvertisingProxy> {
        self.proxy.clone()
    }

    pub fn dispatcher(&self) -> Rc<StackEventDispatcher> {
        self.dispatcher.clone()
    }

    pub fn timers(&self) -> TimerHandle {
        self.reactor.timers()
    }

    pub fn task_runner(&self) -> Arc<TaskRunner> {
        self.reactor.task_runner()
    }

    /// Gives access to the reactor, e.g. to register more processors.
    pub fn reactor_mut(&mut self) -> &mut Reactor {
        &mut self.reactor
    }
}

impl Drop for BorderAgent {
    /// Detaches the agent from its collaborators.
    fn drop(&mut self) {
        self.proxy.stop();
        self.stack.set_state_handler(None);
    }
}
