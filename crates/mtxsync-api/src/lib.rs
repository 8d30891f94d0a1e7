// mtxsync-api: Async clients for the Trassir VMS and the MediaMTX control API

pub mod error;
pub mod mediamtx;
pub mod transport;
pub mod vms;

pub use error::Error;
pub use mediamtx::{MediaMtxClient, PathEntry};
pub use transport::{TlsMode, TransportConfig};
pub use vms::{Channel, VmsClient};
