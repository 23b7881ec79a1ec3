//! Endpoint and listener contracts between transports and sockets.
//!
//! A transport owns its connections and exposes each one to a socket as an
//! [`Endpoint`]. Lifecycle notifications and inbound messages flow the other
//! way, as [`EndpointEvent`]s posted into the socket's event channel. The
//! socket processes them one at a time, so pattern state is never touched
//! concurrently.

use crate::message::{Delivery, Msg};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique endpoint identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(u64);

static NEXT_ENDPOINT_ID: AtomicU64 = AtomicU64::new(1);

impl EndpointId {
    /// Allocate a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ENDPOINT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ep#{}", self.0)
    }
}

/// One connected peer as seen by a socket.
pub trait Endpoint: Send + Sync {
    /// Stable identity for the lifetime of the connection.
    fn id(&self) -> EndpointId;

    /// Address this endpoint was connected to or accepted on.
    fn address(&self) -> &str;

    /// Hand a message to the transport.
    ///
    /// Returns `false` when the transport cannot take it right now. Must not
    /// block and must not panic.
    fn send(&self, msg: &Msg) -> bool;

    /// Close the connection. The transport reports `Terminated` afterwards.
    fn close(&self);
}

/// Shared handle to an endpoint.
pub type EndpointRef = Arc<dyn Endpoint>;

/// A bound listener as seen by a socket.
///
/// Accepted connections are reported as [`EndpointEvent::Attach`].
pub trait Listener: Send + Sync {
    /// Address the listener is bound to.
    fn address(&self) -> &str;

    /// Stop accepting connections.
    fn close(&self);
}

/// Notification posted into a socket's event channel.
pub enum EndpointEvent {
    /// A connection is established and ready to be attached.
    Attach(EndpointRef),
    /// The connection is gone.
    Terminated(EndpointId),
    /// The connection dropped and came back without terminating.
    Hiccuped(EndpointId),
    /// A complete message arrived.
    Message(Delivery),
    /// Deferred continuation scheduled by the socket itself.
    Resume,
}

impl EndpointEvent {
    /// Convenience constructor for inbound messages.
    #[must_use]
    pub fn message(source: EndpointId, frames: Msg) -> Self {
        Self::Message(Delivery::new(source, frames))
    }
}

impl fmt::Debug for EndpointEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach(ep) => f.debug_tuple("Attach").field(&ep.id()).finish(),
            Self::Terminated(id) => f.debug_tuple("Terminated").field(id).finish(),
            Self::Hiccuped(id) => f.debug_tuple("Hiccuped").field(id).finish(),
            Self::Message(d) => f
                .debug_struct("Message")
                .field("source", &d.source)
                .field("frames", &d.frames.len())
                .finish(),
            Self::Resume => f.write_str("Resume"),
        }
    }
}
