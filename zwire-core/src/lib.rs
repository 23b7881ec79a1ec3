//! zwire Core
//!
//! This crate contains the transport-agnostic building blocks of the pattern
//! layer:
//! - Endpoint / listener contracts and the socket event type (`endpoint`)
//! - Prefix trie and subscription control frames (`subscription`)
//! - PUB-side subscription index and fan-out set (`pubsub`)
//! - Round-robin load balancer with back-pressure (`lb`)
//! - ROUTER routing table (`router`)
//! - Messages, options, addresses and error types

#![deny(unsafe_code)]
// Allow some pedantic lints that are intentional in this crate
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::new_without_default)]
#![allow(clippy::len_without_is_empty)]
pub mod address;
pub mod endpoint;
pub mod error;
pub mod lb;
pub mod message;
pub mod monitor;
pub mod options;
pub mod router;
pub mod socket_type;
pub mod subscription;

pub mod pubsub {
    pub mod dist;
    pub mod index;
}

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Optional: a small prelude to make downstream crates ergonomic.
// Keep it minimal to avoid API lock-in.
pub mod prelude {
    pub use crate::address::Address;
    pub use crate::endpoint::{Endpoint, EndpointEvent, EndpointId, EndpointRef, Listener};
    pub use crate::error::{Result, ZwireError};
    pub use crate::lb::LoadBalancer;
    pub use crate::message::{Delivery, IntoFrames, Message, Msg};
    pub use crate::monitor::{SocketEvent, SocketMonitor};
    pub use crate::options::SocketOptions;
    pub use crate::pubsub::dist::Distribution;
    pub use crate::pubsub::index::MultiTrie;
    pub use crate::router::{Identify, RoutingTable};
    pub use crate::socket_type::SocketType;
    pub use crate::subscription::{SubscriptionEvent, Trie};
}
