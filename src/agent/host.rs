//! Host records handed over by the mesh stack.
//!
//! A [`Host`] describes the registration of one mesh device: its full name,
//! its addresses and its services. The stack owns the record for the whole
//! lifetime of the update; the advertising proxy only reads it and hands the
//! very same [`HostRef`] back when it reports the outcome.

use std::net::Ipv6Addr;
use std::rc::Rc;

/// Shared reference to a host record owned by the stack.
///
/// Stacks identify the update being answered with [`Rc::ptr_eq`].
pub type HostRef = Rc<Host>;

/// One registered service of a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Full service instance name, e.g. `myprinter._ipp._tcp.default.service.arpa.`.
    pub full_name: String,
    pub port: u16,
    /// The registration of this service is being removed.
    pub deleted: bool,
}

impl Service {
    /// Creates a live service registration.
    pub fn new(full_name: impl Into<String>, port: u16) -> Self {
        Self {
            full_name: full_name.into(),
            port,
            deleted: false,
        }
    }

    /// Marks the service as deleted.
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

/// A host update as registered on the mesh side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Host {
    /// Full host name, e.g. `router1.default.service.arpa`.
    pub full_name: String,
    pub addresses: Vec<Ipv6Addr>,
    pub services: Vec<Service>,
}

impl Host {
    /// Creates a host without addresses or services.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            addresses: Vec::new(),
            services: Vec::new(),
        }
    }

    /// Appends an address.
    pub fn with_address(mut self, address: Ipv6Addr) -> Self {
        self.addresses.push(address);
        self
    }

    /// Appends a service.
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// A host with at least one address is published, otherwise it and all
    /// of its services are withdrawn.
    pub fn is_published(&self) -> bool {
        !self.addresses.is_empty()
    }

    /// Address advertised for the host.
    ///
    /// There is no notion of a preferred address yet; the first one wins.
    pub fn preferred_address(&self) -> Option<&Ipv6Addr> {
        self.addresses.first()
    }

    /// Services that are not being removed.
    ///
    /// Each of them is either published or, when the host is withdrawn,
    /// unpublished, and its completion is awaited either way.
    pub fn live_services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|service| !service.deleted)
    }

    /// Number of publisher completions this update waits for: one for a
    /// published host plus one per live service.
    pub fn expected_completions(&self) -> usize {
        usize::from(self.is_published()) + self.live_services().count()
    }
}
