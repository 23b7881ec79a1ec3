//! Socket type enumeration.
//!
//! Each pattern strategy declares one of these; transports use it to refuse
//! connections between sockets that cannot talk to each other.

use std::fmt;

/// ZeroMQ-style socket types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SocketType {
    /// PAIR socket for exclusive bidirectional communication
    Pair = 0,

    /// PUB socket for publishing messages to subscribers
    Pub = 1,

    /// SUB socket for subscribing to published messages
    Sub = 2,

    /// REQ socket for synchronous request-reply client
    Req = 3,

    /// REP socket for synchronous request-reply server
    Rep = 4,

    /// DEALER socket for asynchronous request-reply patterns
    Dealer = 5,

    /// ROUTER socket for routing messages by identity
    Router = 6,

    /// PULL socket for receiving messages from pushers
    Pull = 7,

    /// PUSH socket for sending messages to pullers
    Push = 8,

    /// XPUB socket for extended publisher with subscription awareness
    XPub = 9,

    /// XSUB socket for extended subscriber with dynamic subscriptions
    XSub = 10,
}

impl SocketType {
    /// Get the socket type as a string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pair => "PAIR",
            Self::Pub => "PUB",
            Self::Sub => "SUB",
            Self::Req => "REQ",
            Self::Rep => "REP",
            Self::Dealer => "DEALER",
            Self::Router => "ROUTER",
            Self::Pull => "PULL",
            Self::Push => "PUSH",
            Self::XPub => "XPUB",
            Self::XSub => "XSUB",
        }
    }

    /// Check if this socket type is compatible with the given peer type.
    pub fn is_compatible(&self, peer: SocketType) -> bool {
        matches!(
            (self, peer),
            (Self::Pair, Self::Pair)
                | (Self::Pub | Self::XPub, Self::Sub | Self::XSub)
                | (Self::Sub | Self::XSub, Self::Pub | Self::XPub)
                | (Self::Req, Self::Rep | Self::Router)
                | (Self::Rep, Self::Req | Self::Dealer)
                | (Self::Dealer, Self::Rep | Self::Router | Self::Dealer)
                | (Self::Router, Self::Req | Self::Dealer | Self::Router)
                | (Self::Push, Self::Pull)
                | (Self::Pull, Self::Push)
        )
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
