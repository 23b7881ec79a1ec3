//! Endpoint address parsing.
//!
//! Sockets accept `ws://`, `wss://` and `inproc://` addresses. Only inproc has
//! a built-in transport; WebSocket addresses are parsed so that an external
//! transport can be handed endpoints for them.

use std::fmt;
use std::str::FromStr;

/// Transport address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    /// WebSocket: `ws://host:port/path`
    Ws(String),
    /// Secure WebSocket: `wss://host:port/path`
    Wss(String),
    /// In-process transport: `inproc://name`
    Inproc(String),
}

impl Address {
    /// Parse an address from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use zwire_core::address::Address;
    ///
    /// let addr = Address::parse("ws://127.0.0.1:5555/chat").unwrap();
    /// assert!(matches!(addr, Address::Ws(_)));
    ///
    /// let addr = Address::parse("inproc://workers").unwrap();
    /// assert!(addr.is_inproc());
    /// ```
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        s.parse()
    }

    /// Returns true if this is an inproc address.
    pub fn is_inproc(&self) -> bool {
        matches!(self, Address::Inproc(_))
    }

    /// Scheme name without the `://` separator.
    pub fn scheme(&self) -> &'static str {
        match self {
            Address::Ws(_) => "ws",
            Address::Wss(_) => "wss",
            Address::Inproc(_) => "inproc",
        }
    }
}

fn non_empty(rest: &str, scheme: &'static str) -> Result<String, AddressError> {
    if rest.is_empty() {
        Err(AddressError::EmptyTarget(scheme))
    } else {
        Ok(rest.to_string())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("ws://") {
            non_empty(rest, "ws").map(Address::Ws)
        } else if let Some(rest) = s.strip_prefix("wss://") {
            non_empty(rest, "wss").map(Address::Wss)
        } else if let Some(name) = s.strip_prefix("inproc://") {
            non_empty(name, "inproc").map(Address::Inproc)
        } else if s.contains("://") {
            Err(AddressError::UnknownScheme(s.to_string()))
        } else {
            Err(AddressError::Malformed(s.to_string()))
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ws(rest) => write!(f, "ws://{}", rest),
            Address::Wss(rest) => write!(f, "wss://{}", rest),
            Address::Inproc(name) => write!(f, "inproc://{}", name),
        }
    }
}

/// Errors that can occur when parsing addresses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Unknown scheme in address: {0} (expected ws://, wss:// or inproc://)")]
    UnknownScheme(String),

    #[error("Malformed address: {0}")]
    Malformed(String),

    #[error("Empty target in {0}:// address")]
    EmptyTarget(&'static str),
}
