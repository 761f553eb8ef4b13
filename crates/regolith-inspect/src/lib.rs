//! Inspection tools for regolith - TCP server for poking a live session
//!
//! Start the server in your host:
//! ```ignore
//! let handler = Arc::new(Mutex::new(MyHandler::new()));
//! let _server = InspectServer::start(handler, 9761);
//! ```
//! Clients send one JSON command per line and receive one JSON response
//! per line.

pub mod protocol;
pub mod server;

pub use protocol::{InspectCommand, InspectResponse};
pub use server::{InspectHandler, InspectServer};

/// Default inspection server port
pub const DEFAULT_PORT: u16 = 9761;
