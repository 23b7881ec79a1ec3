//! PUSH pattern: load-balanced sends, nothing received.

use tracing::trace;

use crate::dealer::Dealer;
use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{EndpointId, EndpointRef};
use zwire_core::error::Result;
use zwire_core::message::{Delivery, Msg};
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Push {
    inner: Dealer,
}

impl Push {
    /// Messages waiting for a peer to accept them.
    pub fn pending(&self) -> usize {
        self.inner.pending()
    }
}

impl Pattern for Push {
    const SOCKET_TYPE: SocketType = SocketType::Push;

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.inner.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.inner.terminated(id);
    }

    fn on_hiccup(&mut self, _cx: &mut Context<'_>, _id: EndpointId) {
        self.inner.flush();
    }

    fn on_receive(&mut self, _cx: &mut Context<'_>, delivery: Delivery) {
        trace!("[PUSH] dropping inbound message from {}", delivery.source);
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        self.inner.enqueue(msg);
        Ok(())
    }
}
