//! Border agent components riding on the reactor.
//!
//! - [`Stack`] and [`Publisher`] describe the two collaborators: the mesh
//!   protocol stack and the multicast DNS publisher.
//! - [`AdvertisingProxy`] translates host updates of the former into
//!   publications of the latter.
//! - [`StackEventDispatcher`] fans stack state changes out to listeners.

mod advertising_proxy;
mod events;
mod host;
mod publisher;
mod stack;

pub use advertising_proxy::AdvertisingProxy;
pub use events::{StackEventDispatcher, StackListener};
pub use host::{Host, HostRef, Service};
pub use publisher::{HostHandler, Publisher, ServiceHandler, TxtList};
pub use stack::{DeviceRole, HostUpdateHandler, Stack, StackDriver, StackEvent, StateHandler};
