//! Pattern strategy trait.
//!
//! Every socket is a [`Socket<P>`](crate::base::Socket) holding one pattern
//! strategy. The socket owns endpoint bookkeeping and the event loop; the
//! pattern only reacts to the hooks below. Patterns that build on another
//! (REQ on DEALER, REP on ROUTER, SUB on XSUB, PUB on XPUB) wrap the inner
//! strategy and delegate to it explicitly.
//!
//! All hooks run on the socket's own event loop, one at a time, so pattern
//! state needs no synchronization.

use bytes::Bytes;
use flume::Sender;
use std::collections::VecDeque;
use tracing::{debug, trace};

use zwire_core::endpoint::{EndpointEvent, EndpointId, EndpointRef};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::{Delivery, Msg};
use zwire_core::options::SocketOptions;
use zwire_core::socket_type::SocketType;

/// What a pattern hook may touch besides its own state.
pub struct Context<'a> {
    pub(crate) socket_type: SocketType,
    pub(crate) options: &'a SocketOptions,
    pub(crate) inbox: &'a mut VecDeque<Delivery>,
    pub(crate) events: &'a Sender<EndpointEvent>,
}

impl Context<'_> {
    /// Socket options.
    #[inline]
    pub fn options(&self) -> &SocketOptions {
        self.options
    }

    /// Surface a message to the application.
    pub fn deliver(&mut self, delivery: Delivery) {
        trace!(
            "[{}] surfacing {} frames from {}",
            self.socket_type,
            delivery.frames.len(),
            delivery.source
        );
        self.inbox.push_back(delivery);
    }

    /// Schedule [`Pattern::on_resume`] to run after the events already
    /// queued on this socket.
    pub fn defer(&self) {
        // The socket holds the receiver for its whole life, so this only
        // fails after close, when nothing should resume anyway.
        let _ = self.events.send(EndpointEvent::Resume);
    }
}

/// Hooks a messaging pattern implements. All default to no-ops.
pub trait Pattern: Default + Send + 'static {
    /// Socket type advertised to peers.
    const SOCKET_TYPE: SocketType;

    /// Force options this pattern depends on.
    fn adjust_options(options: &mut SocketOptions) {
        let _ = options;
    }

    /// An endpoint joined the socket.
    fn on_attach(&mut self, cx: &mut Context<'_>, endpoint: EndpointRef) {
        let _ = (cx, endpoint);
    }

    /// A previously attached endpoint is gone. Drop every reference to it.
    fn on_terminated(&mut self, cx: &mut Context<'_>, id: EndpointId) {
        let _ = (cx, id);
    }

    /// An attached endpoint reconnected without terminating.
    fn on_hiccup(&mut self, cx: &mut Context<'_>, id: EndpointId) {
        let _ = (cx, id);
    }

    /// A message arrived from an attached endpoint.
    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        let _ = (cx, delivery);
    }

    /// The application sent a message.
    fn on_send(&mut self, cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        debug!(
            "[{}] send ignored ({} frames)",
            cx.socket_type,
            msg.len()
        );
        Ok(())
    }

    /// A continuation scheduled with [`Context::defer`].
    fn on_resume(&mut self, cx: &mut Context<'_>) {
        let _ = cx;
    }

    fn subscribe(&mut self, cx: &mut Context<'_>, topic: Bytes) -> Result<()> {
        let _ = topic;
        Err(ZwireError::unsupported(format!(
            "{} sockets do not subscribe",
            cx.socket_type
        )))
    }

    fn unsubscribe(&mut self, cx: &mut Context<'_>, topic: Bytes) -> Result<()> {
        let _ = topic;
        Err(ZwireError::unsupported(format!(
            "{} sockets do not unsubscribe",
            cx.socket_type
        )))
    }
}
