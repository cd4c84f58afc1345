//! Contract of the multicast DNS publisher on the IP side.

use crate::error::Result;

use std::net::Ipv6Addr;
use std::rc::Rc;

/// TXT record entries attached to a published service.
pub type TxtList = Vec<(String, Vec<u8>)>;

/// Completion callback for host operations: `(host instance, outcome)`.
pub type HostHandler = Rc<dyn Fn(&str, Result<()>)>;

/// Completion callback for service operations:
/// `(service instance, service type, outcome)`.
///
/// The service type may carry a trailing root label.
pub type ServiceHandler = Rc<dyn Fn(&str, &str, Result<()>)>;

/// Asynchronous publisher of hosts and services.
///
/// Every call returns once the request is accepted; an `Err` means it was
/// rejected outright. The outcome of an accepted request is delivered later,
/// possibly before the call returns, through the handler registered with
/// [`set_host_handler`](Self::set_host_handler) for host operations or
/// [`set_service_handler`](Self::set_service_handler) for service
/// operations. This holds for withdrawals as well as publications.
///
/// All methods are called on the reactor thread. Implementations must not
/// hold internal borrows while invoking a handler.
pub trait Publisher {
    fn publish_host(&self, name: &str, address: &Ipv6Addr) -> Result<()>;

    fn unpublish_host(&self, name: &str) -> Result<()>;

    fn publish_service(
        &self,
        host_name: &str,
        port: u16,
        name: &str,
        service_type: &str,
        txt: &TxtList,
    ) -> Result<()>;

    fn unpublish_service(&self, name: &str, service_type: &str) -> Result<()>;

    /// Installs or clears the host completion handler.
    fn set_host_handler(&self, handler: Option<HostHandler>);

    /// Installs or clears the service completion handler.
    fn set_service_handler(&self, handler: Option<ServiceHandler>);
}
