//! Server-wide plumbing: the session registry and the outbound transport
//! seam.

pub mod registry;
pub mod transport;

pub use registry::{GameServer, ServerConfig, Session};
pub use transport::{SocketTable, Transport};
