//! ZeroMQ patterns with ZWS framing.
//!
//! # Socket Types
//!
//! - [`PairSocket`] - Exclusive one-to-one link
//! - [`PushSocket`] / [`PullSocket`] - Load-balanced pipeline
//! - [`DealerSocket`] / [`RouterSocket`] - Asynchronous request-reply with routing
//! - [`ReqSocket`] / [`RepSocket`] - Strict request-reply
//! - [`PubSocket`] / [`SubSocket`] - Prefix-filtered publish-subscribe
//! - [`XPubSocket`] / [`XSubSocket`] - Publish-subscribe with visible
//!   subscriptions, for brokers
//!
//! # Quick Start
//!
//! ## Broker forwarding
//!
//! ```rust
//! use zwire::zws::{PubSocket, SubSocket, XPubSocket, XSubSocket};
//!
//! # fn main() -> zwire::Result<()> {
//! let mut upstream = PubSocket::new();
//! upstream.bind("inproc://broker-up")?;
//! let mut frontend = XSubSocket::new();
//! frontend.connect("inproc://broker-up")?;
//!
//! let mut backend = XPubSocket::new();
//! backend.bind("inproc://broker-down")?;
//! let mut subscriber = SubSocket::new();
//! subscriber.connect("inproc://broker-down")?;
//! subscriber.subscribe("prices.")?;
//!
//! // Forward subscriptions up ...
//! while let Some(sub) = backend.try_recv() {
//!     frontend.send(sub.frames)?;
//! }
//! upstream.process();
//! upstream.send(["prices.eur", "1.09"])?;
//!
//! // ... and data down.
//! while let Some(data) = frontend.try_recv() {
//!     backend.send(data.frames)?;
//! }
//! let msg = subscriber.try_recv().expect("forwarded");
//! assert_eq!(msg.frames, vec!["prices.eur", "1.09"]);
//! # Ok(())
//! # }
//! ```

pub use zwire_zws::{
    DealerSocket, PairSocket, PubSocket, PullSocket, PushSocket, RepSocket, ReqSocket,
    RouterSocket, Socket, SubSocket, XPubSocket, XSubSocket,
};
pub use zwire_zws::{Context, Pattern};

/// Pattern strategies, for implementing sockets generically over `Socket<P>`.
pub mod patterns {
    pub use zwire_zws::dealer::Dealer;
    pub use zwire_zws::pair::Pair;
    pub use zwire_zws::publisher::Pub;
    pub use zwire_zws::pull::Pull;
    pub use zwire_zws::push::Push;
    pub use zwire_zws::rep::Rep;
    pub use zwire_zws::req::Req;
    pub use zwire_zws::router::Router;
    pub use zwire_zws::subscriber::Sub;
    pub use zwire_zws::xpub::XPub;
    pub use zwire_zws::xsub::XSub;
}

/// ZWS wire codec, for transports carrying ZWS over WebSocket.
pub mod codec {
    pub use zwire_zws::codec::{encode, CodecError, ZwsDecoder, ZwsFrame};
}

/// Convenient imports for ZWS sockets.
///
/// ```rust
/// use zwire::zws::prelude::*;
/// ```
pub mod prelude {
    pub use zwire_zws::prelude::*;
}
