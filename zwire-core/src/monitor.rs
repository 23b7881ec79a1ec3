//! Socket event monitoring.
//!
//! Provides event streams for tracking socket lifecycle events like
//! connections, disconnections and binds.

use std::fmt;

/// Socket lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Socket connected to a peer.
    Connected(String),

    /// Socket accepted a new incoming connection.
    Accepted(String),

    /// A peer connection was terminated.
    Disconnected(String),

    /// A peer connection dropped and recovered.
    Hiccuped(String),

    /// Socket bound to an address.
    Bound(String),

    /// Socket stopped listening on an address.
    Unbound(String),

    /// Socket closed.
    Closed,
}

impl fmt::Display for SocketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected(addr) => write!(f, "Connected to {addr}"),
            Self::Accepted(addr) => write!(f, "Accepted connection on {addr}"),
            Self::Disconnected(addr) => write!(f, "Disconnected from {addr}"),
            Self::Hiccuped(addr) => write!(f, "Connection to {addr} recovered"),
            Self::Bound(addr) => write!(f, "Bound to {addr}"),
            Self::Unbound(addr) => write!(f, "Unbound from {addr}"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Handle for receiving socket events.
pub type SocketMonitor = flume::Receiver<SocketEvent>;

/// Sender half held by the socket.
pub type SocketEventSender = flume::Sender<SocketEvent>;

/// Creates a new monitoring channel pair.
#[must_use]
pub fn create_monitor() -> (SocketEventSender, SocketMonitor) {
    flume::unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_event_display() {
        let event = SocketEvent::Connected("inproc://jobs".into());
        assert_eq!(event.to_string(), "Connected to inproc://jobs");
        assert_eq!(SocketEvent::Closed.to_string(), "Closed");
    }

    #[test]
    fn test_monitor_channel() {
        let (sender, receiver) = create_monitor();
        sender.send(SocketEvent::Bound("inproc://a".into())).unwrap();

        let event = receiver.recv().unwrap();
        assert!(matches!(event, SocketEvent::Bound(_)));
    }
}
