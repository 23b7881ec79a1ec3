//! # zwire ZWS
//!
//! ZeroMQ messaging patterns over message-oriented transports.
//!
//! ## Overview
//!
//! Every socket is a [`Socket<P>`](base::Socket) running one pattern
//! strategy:
//! - **PAIR**: exclusive one-to-one link
//! - **PUSH / PULL**: load-balanced pipeline
//! - **DEALER / ROUTER**: asynchronous request-reply with identity routing
//! - **REQ / REP**: strict request-reply (one outstanding request)
//! - **PUB / SUB**, **XPUB / XSUB**: prefix-filtered publish-subscribe
//!
//! Transports plug in through the `Endpoint` and `Listener` contracts of
//! `zwire-core`. The built-in `inproc://` transport speaks the ZWS framing
//! (one flag byte per frame) so in-process peers behave like remote ones.
//!
//! ## Quick Start
//!
//! ```rust
//! use zwire_zws::{PubSocket, SubSocket};
//!
//! # fn main() -> zwire_core::error::Result<()> {
//! let mut publisher = PubSocket::new();
//! publisher.bind("inproc://quick-start")?;
//!
//! let mut subscriber = SubSocket::new();
//! subscriber.connect("inproc://quick-start")?;
//! subscriber.subscribe("weather.")?;
//!
//! publisher.process();
//! publisher.send(["weather.paris", "sunny"])?;
//! publisher.send(["sports.rugby", "17-12"])?;
//!
//! let msg = subscriber.try_recv().expect("subscribed topic");
//! assert_eq!(msg.frames[0].as_ref(), b"weather.paris");
//! assert!(subscriber.try_recv().is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Zero-copy**: frames are `Bytes` from decoder to application
//! - **Single-owner state**: pattern state is touched only from the socket's
//!   own event dispatch, so no locks guard it
//! - **Back-pressure aware**: refused sends are queued, never lost

// Allow some pedantic lints
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::new_without_default)]

pub mod base;
pub mod codec;
pub mod inproc;
pub mod socket_trait;

// Pattern strategies
pub mod dealer;
pub mod pair;
pub mod publisher;
pub mod pull;
pub mod push;
pub mod rep;
pub mod req;
pub mod router;
pub mod subscriber;
pub mod xpub;
pub mod xsub;

pub use base::Socket;
pub use socket_trait::{Context, Pattern};

pub type PairSocket = Socket<pair::Pair>;
pub type PushSocket = Socket<push::Push>;
pub type PullSocket = Socket<pull::Pull>;
pub type DealerSocket = Socket<dealer::Dealer>;
pub type RouterSocket = Socket<router::Router>;
pub type ReqSocket = Socket<req::Req>;
pub type RepSocket = Socket<rep::Rep>;
pub type PubSocket = Socket<publisher::Pub>;
pub type SubSocket = Socket<subscriber::Sub>;
pub type XPubSocket = Socket<xpub::XPub>;
pub type XSubSocket = Socket<xsub::XSub>;

/// Prelude module for convenient imports
///
/// ```rust
/// use zwire_zws::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        DealerSocket, PairSocket, PubSocket, PullSocket, PushSocket, RepSocket, ReqSocket,
        RouterSocket, Socket, SubSocket, XPubSocket, XSubSocket,
    };
    pub use bytes::Bytes;
    pub use zwire_core::prelude::*;
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::base::Socket;
    use crate::socket_trait::Pattern;
    use bytes::Bytes;
    use zwire_core::endpoint::{EndpointEvent, EndpointId};
    use zwire_core::message::Msg;

    pub fn frames(parts: &[&[u8]]) -> Msg {
        parts.iter().map(|p| Bytes::copy_from_slice(p)).collect()
    }

    /// Post a message from `source` as a transport would.
    pub fn inject<P: Pattern>(sock: &Socket<P>, source: EndpointId, parts: &[&[u8]]) {
        sock.event_sender()
            .send(EndpointEvent::message(source, frames(parts)))
            .unwrap();
    }
}
