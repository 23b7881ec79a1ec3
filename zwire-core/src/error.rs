//! zwire Error Types
//!
//! Errors raised synchronously at the call site of a socket operation.
//! Malformed data from peers never surfaces here; it is logged and dropped.

use crate::address::AddressError;
use crate::socket_type::SocketType;
use thiserror::Error;

/// Main error type for zwire operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZwireError {
    /// Operation not allowed in the pattern's current state
    /// (REQ sending with a reply outstanding, REP replying without a request).
    #[error("State violation: {0}")]
    StateViolation(&'static str),

    /// Operation not supported by this socket type or transport
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Protocol error raised by a transport codec
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Locally constructed message is not valid for the operation
    #[error("Invalid message: {0}")]
    InvalidMessage(&'static str),

    /// Endpoint address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Address already bound
    #[error("Address in use: {0}")]
    AddrInUse(String),

    /// Nothing bound at the address
    #[error("Address not found: {0}")]
    AddrNotFound(String),

    /// Peer socket type cannot talk to this socket type
    #[error("Incompatible socket types: {local} cannot connect to {peer}")]
    Incompatible { local: SocketType, peer: SocketType },

    /// ROUTER with `router_mandatory` addressed an unknown peer
    #[error("Host unreachable")]
    HostUnreachable,

    /// Socket closed
    #[error("Socket closed")]
    SocketClosed,
}

/// Result type alias for zwire operations
pub type Result<T> = std::result::Result<T, ZwireError>;

impl ZwireError {
    /// Create an unsupported-operation error with a message
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a protocol error with a message
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Whether the same call may succeed later without the caller changing
    /// behavior. Only state violations clear on their own (once the pending
    /// reply or request completes).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StateViolation(_))
    }

    /// Check if this is an addressing error
    #[must_use]
    pub const fn is_address_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress(_)
                | Self::AddrInUse(_)
                | Self::AddrNotFound(_)
                | Self::Incompatible { .. }
        )
    }
}
