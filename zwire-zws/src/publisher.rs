//! PUB pattern: XPUB that keeps its subscription index up to date but never
//! surfaces anything to the application.

use tracing::trace;

use crate::socket_trait::{Context, Pattern};
use crate::xpub::XPub;
use zwire_core::endpoint::{EndpointId, EndpointRef};
use zwire_core::error::Result;
use zwire_core::message::{Delivery, Msg};
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Pub {
    inner: XPub,
}

impl Pub {
    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }
}

impl Pattern for Pub {
    const SOCKET_TYPE: SocketType = SocketType::Pub;

    fn on_attach(&mut self, cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.inner
            .attach(endpoint, cx.options().xpub_welcome_msg.as_ref());
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        let _ = self.inner.terminated(id);
    }

    fn on_receive(&mut self, _cx: &mut Context<'_>, delivery: Delivery) {
        if let Some(dropped) = self.inner.apply(delivery, false) {
            trace!("[PUB] dropping inbound message from {}", dropped.source);
        }
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        self.inner.publish(&msg);
        Ok(())
    }
}
