//! Socket configuration options
//!
//! A subset of libzmq's socket options (zmq_setsockopt) that the pattern
//! layer and the built-in transports consult.

use crate::error::{Result, ZwireError};
use bytes::Bytes;

/// Socket configuration options.
///
/// # Examples
///
/// ```
/// use zwire_core::options::SocketOptions;
/// use bytes::Bytes;
///
/// let opts = SocketOptions::default()
///     .with_routing_id(Bytes::from_static(b"worker-01"))
///     .with_send_hwm(64);
/// ```
#[derive(Debug, Clone)]
pub struct SocketOptions {
    /// Socket identity / routing ID (ZMQ_ROUTING_ID)
    ///
    /// Sent to every peer as the connection greeting. A ROUTER peer uses a
    /// non-empty value as this socket's routing key.
    /// - Default: None (empty greeting, peer assigns a key)
    pub routing_id: Option<Bytes>,

    /// Surface the connection greeting (routing id) as the first message
    ///
    /// - `false` (default): drop the greeting on receipt
    /// - `true`: deliver it to the pattern (ROUTER and REP force this on)
    pub recv_routing_id: bool,

    /// Immediate mode (ZMQ_IMMEDIATE)
    ///
    /// - `false` (default): attach a connecting endpoint as soon as
    ///   `connect` returns, so messages queue against it
    /// - `true`: attach only once the transport reports the connection up;
    ///   a transport hiccup terminates instead of resuming
    pub immediate: bool,

    /// High water mark for sending (ZMQ_SNDHWM)
    ///
    /// Maximum number of undelivered events a peer may have queued before
    /// `send` on the endpoint reports back-pressure.
    /// - Default: 1000 messages
    pub send_hwm: usize,

    /// ROUTER mandatory mode (ZMQ_ROUTER_MANDATORY)
    ///
    /// - `false` (default): silently drop messages to unknown peers
    /// - `true`: return `HostUnreachable` when sending to an unknown peer
    pub router_mandatory: bool,

    /// ROUTER handover mode (ZMQ_ROUTER_HANDOVER)
    ///
    /// - `false` (default): a second peer claiming an attached identity is
    ///   disconnected
    /// - `true`: the previous holder is disconnected and the new peer takes
    ///   over the identity
    pub router_handover: bool,

    /// XPUB verbose mode (ZMQ_XPUB_VERBOSE)
    ///
    /// - `false` (default): only report new subscriptions
    /// - `true`: report all subscription messages (including duplicates)
    pub xpub_verbose: bool,

    /// XPUB welcome message (ZMQ_XPUB_WELCOME_MSG)
    ///
    /// Sent to each newly attached subscriber.
    pub xpub_welcome_msg: Option<Bytes>,
}

impl Default for SocketOptions {
    fn default() -> Self {
        Self {
            routing_id: None,
            recv_routing_id: false,
            immediate: false,
            send_hwm: 1000,
            router_mandatory: false,
            router_handover: false,
            xpub_verbose: false,
            xpub_welcome_msg: None,
        }
    }
}

impl SocketOptions {
    /// Create new socket options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set socket routing ID / identity.
    pub fn with_routing_id(mut self, id: Bytes) -> Self {
        self.routing_id = Some(id);
        self
    }

    /// Deliver the connection greeting to the pattern.
    pub fn with_recv_routing_id(mut self, enabled: bool) -> Self {
        self.recv_routing_id = enabled;
        self
    }

    /// Enable or disable immediate mode.
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Set send high water mark.
    pub fn with_send_hwm(mut self, hwm: usize) -> Self {
        self.send_hwm = hwm;
        self
    }

    /// Enable ROUTER mandatory mode.
    pub fn with_router_mandatory(mut self, enabled: bool) -> Self {
        self.router_mandatory = enabled;
        self
    }

    /// Enable ROUTER handover mode.
    pub fn with_router_handover(mut self, enabled: bool) -> Self {
        self.router_handover = enabled;
        self
    }

    /// Enable XPUB verbose mode.
    pub fn with_xpub_verbose(mut self, enabled: bool) -> Self {
        self.xpub_verbose = enabled;
        self
    }

    /// Set XPUB welcome message.
    pub fn with_xpub_welcome_msg(mut self, msg: Bytes) -> Self {
        self.xpub_welcome_msg = Some(msg);
        self
    }

    /// Greeting frame sent to a peer after the connection is established.
    pub fn greeting(&self) -> Bytes {
        self.routing_id.clone().unwrap_or_default()
    }

    /// Check option values a transport depends on before a peer sees them.
    pub fn validate(&self) -> Result<()> {
        match &self.routing_id {
            Some(id) => Self::validate_routing_id(id),
            None => Ok(()),
        }
    }

    /// Validate a routing ID.
    ///
    /// Identities are at most 255 bytes. A non-empty identity may not start
    /// with a zero byte, which would be indistinguishable from an
    /// auto-generated ROUTER key.
    pub fn validate_routing_id(id: &[u8]) -> Result<()> {
        if id.len() > 255 {
            return Err(ZwireError::InvalidMessage(
                "routing ID cannot exceed 255 bytes",
            ));
        }
        if id.first() == Some(&0x00) {
            return Err(ZwireError::InvalidMessage(
                "routing ID cannot start with a null byte",
            ));
        }
        Ok(())
    }
}
