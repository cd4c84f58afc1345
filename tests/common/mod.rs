#![allow(dead_code)]

use border_agent::agent::{HostHandler, HostUpdateHandler, ServiceHandler, StateHandler, TxtList};
use border_agent::{Error, Host, HostRef, MainloopContext, Publisher, Result, Stack, StackEvent};

use std::cell::{Cell, RefCell};
use std::net::Ipv6Addr;
use std::rc::Rc;
use std::time::Duration;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn address(last: u16) -> Ipv6Addr {
    Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, last)
}

/// Mesh stack double recording every reported result.
#[derive(Default)]
pub struct FakeStack {
    results: RefCell<Vec<(HostRef, Result<()>)>>,
    host_handler: RefCell<Option<HostUpdateHandler>>,
    state_handler: RefCell<Option<StateHandler>>,
    pub pending_work: Cell<bool>,
    pub updates: Cell<usize>,
    pub processed: Cell<usize>,
}

impl FakeStack {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Hands `host` to the registered handler, as the stack would.
    pub fn submit(&self, host: Host) -> HostRef {
        self.submit_with_timeout(host, None)
    }

    pub fn submit_with_timeout(&self, host: Host, timeout: Option<Duration>) -> HostRef {
        let host = Rc::new(host);
        let handler = self.host_handler.borrow().clone();

        if let Some(handler) = handler {
            handler(host.clone(), timeout);
        }

        host
    }

    pub fn emit(&self, event: StackEvent) {
        let handler = self.state_handler.borrow().clone();

        if let Some(handler) = handler {
            handler(&event);
        }
    }

    pub fn has_host_handler(&self) -> bool {
        self.host_handler.borrow().is_some()
    }

    pub fn has_state_handler(&self) -> bool {
        self.state_handler.borrow().is_some()
    }

    pub fn take_results(&self) -> Vec<(HostRef, Result<()>)> {
        std::mem::take(&mut *self.results.borrow_mut())
    }

    pub fn result_count(&self) -> usize {
        self.results.borrow().len()
    }
}

impl Stack for FakeStack {
    fn set_host_update_handler(&self, handler: Option<HostUpdateHandler>) {
        *self.host_handler.borrow_mut() = handler;
    }

    fn set_state_handler(&self, handler: Option<StateHandler>) {
        *self.state_handler.borrow_mut() = handler;
    }

    fn report_result(&self, host: &HostRef, outcome: Result<()>) {
        self.results.borrow_mut().push((host.clone(), outcome));
    }

    fn has_pending_work(&self) -> bool {
        self.pending_work.get()
    }

    fn update(&self, _mainloop: &mut MainloopContext) {
        self.updates.set(self.updates.get() + 1);
    }

    fn process(&self, _mainloop: &MainloopContext) {
        self.processed.set(self.processed.get() + 1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PublishHost {
        name: String,
        address: Ipv6Addr,
    },
    UnpublishHost {
        name: String,
    },
    PublishService {
        host_name: String,
        port: u16,
        name: String,
        service_type: String,
        txt_len: usize,
    },
    UnpublishService {
        name: String,
        service_type: String,
    },
}

/// Publisher double.
///
/// By default operations stay pending until the test completes them.
/// An immediate publisher answers every operation successfully before
/// returning from the call.
#[derive(Default)]
pub struct FakePublisher {
    calls: RefCell<Vec<Call>>,
    host_handler: RefCell<Option<HostHandler>>,
    service_handler: RefCell<Option<ServiceHandler>>,
    immediate: Cell<bool>,
    failing_service: RefCell<Option<String>>,
}

impl FakePublisher {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn immediate() -> Rc<Self> {
        let publisher = Self::default();
        publisher.immediate.set(true);
        Rc::new(publisher)
    }

    /// Makes `publish_service` for instance `name` fail synchronously.
    pub fn fail_service(&self, name: &str) {
        *self.failing_service.borrow_mut() = Some(name.to_owned());
    }

    pub fn complete_host(&self, name: &str, outcome: Result<()>) {
        let handler = self.host_handler.borrow().clone();

        if let Some(handler) = handler {
            handler(name, outcome);
        }
    }

    pub fn complete_service(&self, name: &str, service_type: &str, outcome: Result<()>) {
        let handler = self.service_handler.borrow().clone();

        if let Some(handler) = handler {
            handler(name, service_type, outcome);
        }
    }

    pub fn has_handlers(&self) -> bool {
        self.host_handler.borrow().is_some() && self.service_handler.borrow().is_some()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Publisher for FakePublisher {
    fn publish_host(&self, name: &str, address: &Ipv6Addr) -> Result<()> {
        self.calls.borrow_mut().push(Call::PublishHost {
            name: name.to_owned(),
            address: *address,
        });

        if self.immediate.get() {
            self.complete_host(name, Ok(()));
        }

        Ok(())
    }

    fn unpublish_host(&self, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::UnpublishHost {
            name: name.to_owned(),
        });

        if self.immediate.get() {
            self.complete_host(name, Ok(()));
        }

        Ok(())
    }

    fn publish_service(
        &self,
        host_name: &str,
        port: u16,
        name: &str,
        service_type: &str,
        txt: &TxtList,
    ) -> Result<()> {
        if self.failing_service.borrow().as_deref() == Some(name) {
            return Err(Error::Mdns(format!("cannot register {}", name)));
        }

        self.calls.borrow_mut().push(Call::PublishService {
            host_name: host_name.to_owned(),
            port,
            name: name.to_owned(),
            service_type: service_type.to_owned(),
            txt_len: txt.len(),
        });

        if self.immediate.get() {
            // Real publishers report the type with its root label.
            self.complete_service(name, &format!("{}.", service_type), Ok(()));
        }

        Ok(())
    }

    fn unpublish_service(&self, name: &str, service_type: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::UnpublishService {
            name: name.to_owned(),
            service_type: service_type.to_owned(),
        });

        if self.immediate.get() {
            self.complete_service(name, service_type, Ok(()));
        }

        Ok(())
    }

    fn set_host_handler(&self, handler: Option<HostHandler>) {
        *self.host_handler.borrow_mut() = handler;
    }

    fn set_service_handler(&self, handler: Option<ServiceHandler>) {
        *self.service_handler.borrow_mut() = handler;
    }
}
