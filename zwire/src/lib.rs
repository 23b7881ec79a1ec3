//! # zwire
//!
//! ZeroMQ messaging patterns over message-oriented transports.
//!
//! ## Architecture
//!
//! - **`zwire-core`**: endpoint contracts, subscription tries, load balancer,
//!   routing table, options and errors
//! - **`zwire-zws`**: pattern sockets, ZWS framing and the `inproc://`
//!   transport
//! - **`zwire`**: public API surface (this crate)
//!
//! ## Protocols (opt-in via features)
//!
//! - **`zws`** - ZeroMQ patterns with ZWS (ZeroMQ over WebSocket) framing
//!
//! ```toml
//! [dependencies]
//! zwire = { version = "0.1", features = ["zws"] }
//! ```
//!
//! ## Quick Start
//!
//! ### REQ / REP
//!
//! ```rust
//! # #[cfg(feature = "zws")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use zwire::zws::prelude::*;
//!
//! let mut server = RepSocket::new();
//! server.bind("inproc://hello")?;
//!
//! let mut client = ReqSocket::new();
//! client.connect("inproc://hello")?;
//! client.send("Hello")?;
//!
//! if let Some(request) = server.try_recv() {
//!     println!("request: {:?}", request.frames);
//!     server.send("World")?;
//! }
//! let reply = client.try_recv().ok_or("no reply")?;
//! assert_eq!(reply.frames, vec!["World"]);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "zws"))]
//! # fn main() {}
//! ```
//!
//! ### Custom transports
//!
//! Sockets speak to transports only through [`Endpoint`](zwire_core::endpoint::Endpoint)
//! and [`Listener`](zwire_core::endpoint::Listener). A WebSocket transport hands
//! established connections to a socket with `adopt()` and posts their
//! traffic through `event_sender()`.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export core types
pub use bytes::Bytes;
pub use zwire_core::endpoint::{Endpoint, EndpointEvent, EndpointId, EndpointRef, Listener};
pub use zwire_core::error::{Result, ZwireError};
pub use zwire_core::message::{Delivery, IntoFrame, IntoFrames, Message, Msg};
pub use zwire_core::options::SocketOptions;

pub mod dev_tracing;

// Protocol modules (opt-in via features)
#[cfg(feature = "zws")]
pub mod zws;
