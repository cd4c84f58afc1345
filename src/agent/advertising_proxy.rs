//! Advertising proxy.
//!
//! Bridges host registrations of the mesh stack to the multicast DNS
//! publisher. One host update fans out into one host operation plus one
//! operation per service; the publisher answers every operation
//! asynchronously and the proxy folds the answers for the host publication
//! and the live services back into a single result for the stack. Answers
//! about withdrawn hosts and deleted services are not awaited.
//!
//! Completions only carry names, so they are matched to in-flight updates
//! by re-deriving the names of every in-flight host and its services. The
//! first in-flight update that matches takes the completion. Two updates in
//! flight at the same time for identically named services cannot be told
//! apart.

use super::events::StackListener;
use super::host::HostRef;
use super::publisher::{Publisher, TxtList};
use super::stack::{Stack, StackEvent};
use crate::error::{Error, Result};
use crate::names::{normalize_service_type, split_full_host_name, split_full_service_name};
use crate::reactor::TimerHandle;

use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Book-keeping of one host update waiting for publisher results.
struct OutstandingUpdate {
    /// Internal identity, used by deadline timers.
    id: u64,

    /// The update being answered.
    host: HostRef,

    /// Publication results still expected.
    remaining: usize,
}

pub struct AdvertisingProxy {
    publisher: Rc<dyn Publisher>,
    stack: Rc<dyn Stack>,

    /// Timer queue used to arm update deadlines, if any.
    timers: Option<TimerHandle>,

    /// Upper bound on how long an update may stay in flight.
    update_timeout: Option<Duration>,

    /// In-flight updates, in arrival order.
    outstanding: RefCell<Vec<OutstandingUpdate>>,

    next_id: Cell<u64>,
    started: Cell<bool>,

    /// Handed to collaborator callbacks instead of a strong reference.
    this: Weak<AdvertisingProxy>,
}

impl AdvertisingProxy {
    /// Creates a proxy without update deadlines.
    pub fn new(publisher: Rc<dyn Publisher>, stack: Rc<dyn Stack>) -> Rc<Self> {
        Self::build(publisher, stack, None, None)
    }

    /// Creates a proxy that force-finalizes updates still in flight after
    /// `update_timeout`, or after the timeout carried by the update itself
    /// when that is shorter.
    pub fn with_timers(
        publisher: Rc<dyn Publisher>,
        stack: Rc<dyn Stack>,
        timers: TimerHandle,
        update_timeout: Option<Duration>,
    ) -> Rc<Self> {
        Self::build(publisher, stack, Some(timers), update_timeout)
    }

    fn build(
        publisher: Rc<dyn Publisher>,
        stack: Rc<dyn Stack>,
        timers: Option<TimerHandle>,
        update_timeout: Option<Duration>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            publisher,
            stack,
            timers,
            update_timeout,
            outstanding: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            started: Cell::new(false),
            this: this.clone(),
        })
    }

    /// Subscribes to host updates and publisher results.
    pub fn start(&self) {
        if self.started.replace(true) {
            return;
        }

        let this = self.this.clone();
        self.stack
            .set_host_update_handler(Some(Rc::new(move |host: HostRef, timeout: Option<Duration>| {
                if let Some(proxy) = this.upgrade() {
                    proxy.handle_host_update(host, timeout);
                }
            })));

        let this = self.this.clone();
        self.publisher.set_host_handler(Some(Rc::new(
            move |name: &str, outcome: Result<()>| {
                if let Some(proxy) = this.upgrade() {
                    proxy.handle_host_published(name, outcome);
                }
            },
        )));

        let this = self.this.clone();
        self.publisher.set_service_handler(Some(Rc::new(
            move |name: &str, service_type: &str, outcome: Result<()>| {
                if let Some(proxy) = this.upgrade() {
                    proxy.handle_service_published(name, service_type, outcome);
                }
            },
        )));

        info!("advertising proxy started");
    }

    /// Unsubscribes from the stack and the publisher.
    ///
    /// Updates still in flight are abandoned: no result can reach them any
    /// more.
    pub fn stop(&self) {
        if !self.started.replace(false) {
            return;
        }

        self.publisher.set_service_handler(None);
        self.publisher.set_host_handler(None);
        self.stack.set_host_update_handler(None);

        let abandoned = std::mem::take(&mut *self.outstanding.borrow_mut());
        if !abandoned.is_empty() {
            warn!(
                "advertising proxy stopped with {} update(s) in flight",
                abandoned.len()
            );
        }

        info!("advertising proxy stopped");
    }

    /// Whether the proxy is subscribed to the stack and the publisher.
    pub fn is_started(&self) -> bool {
        self.started.get()
    }

    /// Number of host updates waiting for publisher results.
    pub fn outstanding_len(&self) -> usize {
        self.outstanding.borrow().len()
    }

    /// Advertises a host update on the IP side.
    ///
    /// Exactly one result is reported to the stack for `host`: right away
    /// when the update cannot be dispatched or awaits no answer, or once
    /// the publisher has answered.
    pub fn handle_host_update(&self, host: HostRef, timeout: Option<Duration>) {
        info!("advertising update of host {}", host.full_name);

        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let remaining = host.expected_completions();

        // Registered before dispatch: the publisher may answer synchronously.
        self.outstanding.borrow_mut().push(OutstandingUpdate {
            id,
            host: host.clone(),
            remaining,
        });

        if let Err(e) = self.dispatch(&host) {
            info!("failed to advertise update of host {}: {}", host.full_name, e);

            match self.take(id) {
                Some(update) => self.stack.report_result(&update.host, Err(e.normalized())),
                None => debug!("update of host {} already finalized", host.full_name),
            }
            return;
        }

        if remaining == 0 {
            if let Some(update) = self.take(id) {
                self.stack.report_result(&update.host, Ok(()));
            }
            return;
        }

        if self.contains(id) {
            self.arm_deadline(id, timeout);
        }
    }

    /// Handles the result of a host publication.
    pub fn handle_host_published(&self, name: &str, outcome: Result<()>) {
        let index = self.outstanding.borrow().iter().position(|update| {
            update.host.is_published()
                && split_full_host_name(&update.host.full_name)
                    .map(|host_name| host_name.instance == name)
                    .unwrap_or(false)
        });

        match index {
            Some(index) => self.complete(index, outcome),
            None => warn!("dropping unmatched publisher result of host {}", name),
        }
    }

    /// Handles the result of a service publication or withdrawal.
    pub fn handle_service_published(&self, name: &str, service_type: &str, outcome: Result<()>) {
        let service_type = normalize_service_type(service_type);

        let index = self.outstanding.borrow().iter().position(|update| {
            update.host.live_services().any(|service| {
                split_full_service_name(&service.full_name)
                    .map(|service_name| {
                        service_name.instance == name && service_name.service_type == service_type
                    })
                    .unwrap_or(false)
            })
        });

        match index {
            Some(index) => self.complete(index, outcome),
            None => warn!(
                "dropping unmatched publisher result of service {}.{}",
                name, service_type
            ),
        }
    }

    fn dispatch(&self, host: &HostRef) -> Result<()> {
        let host_name = split_full_host_name(&host.full_name)?;

        match host.preferred_address() {
            Some(address) => self.publisher.publish_host(host_name.instance, address)?,
            None => self.publisher.unpublish_host(host_name.instance)?,
        }

        for service in &host.services {
            let service_name = split_full_service_name(&service.full_name)?;

            if host.is_published() && !service.deleted {
                // TXT records are not carried over.
                let txt = TxtList::new();

                self.publisher.publish_service(
                    host_name.instance,
                    service.port,
                    service_name.instance,
                    service_name.service_type,
                    &txt,
                )?;
            } else {
                self.publisher
                    .unpublish_service(service_name.instance, service_name.service_type)?;
            }
        }

        Ok(())
    }

    /// Accounts one publisher result against the update at `index`.
    ///
    /// The first error, or the last expected success, finalizes the update.
    fn complete(&self, index: usize, outcome: Result<()>) {
        let finished = {
            let mut outstanding = self.outstanding.borrow_mut();
            let update = &mut outstanding[index];

            if outcome.is_err() || update.remaining <= 1 {
                Some(outstanding.remove(index))
            } else {
                update.remaining -= 1;
                None
            }
        };

        if let Some(update) = finished {
            debug!(
                "update of host {} finalized: {:?}",
                update.host.full_name, outcome
            );
            self.stack
                .report_result(&update.host, outcome.map_err(Error::normalized));
        }
    }

    fn arm_deadline(&self, id: u64, timeout: Option<Duration>) {
        let Some(timers) = &self.timers else {
            return;
        };

        let timeout = match (timeout, self.update_timeout) {
            (Some(event), Some(configured)) => event.min(configured),
            (event, configured) => match event.or(configured) {
                Some(timeout) => timeout,
                None => return,
            },
        };

        let this = self.this.clone();
        timers.schedule_after(timeout, move || {
            if let Some(proxy) = this.upgrade() {
                proxy.expire(id);
            }
        });
    }

    /// Force-finalizes the update `id` if it is still in flight.
    fn expire(&self, id: u64) {
        if let Some(update) = self.take(id) {
            warn!(
                "update of host {} timed out with {} result(s) outstanding",
                update.host.full_name, update.remaining
            );
            self.stack.report_result(&update.host, Err(Error::Timeout));
        }
    }

    fn contains(&self, id: u64) -> bool {
        self.outstanding.borrow().iter().any(|update| update.id == id)
    }

    fn take(&self, id: u64) -> Option<OutstandingUpdate> {
        let mut outstanding = self.outstanding.borrow_mut();
        let index = outstanding.iter().position(|update| update.id == id)?;

        Some(outstanding.remove(index))
    }
}

impl StackListener for AdvertisingProxy {
    fn on_stack_event(&self, event: &StackEvent) -> Result<()> {
        if let StackEvent::ThreadState { attached } = event {
            if *attached {
                self.start();
            } else {
                self.stop();
            }
        }

        Ok(())
    }
}

impl Drop for AdvertisingProxy {
    fn drop(&mut self) {
        self.stop();
    }
}
