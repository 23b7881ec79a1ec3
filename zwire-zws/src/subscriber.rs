//! SUB pattern: XSUB with a topic API and no application sends.

use bytes::Bytes;
use tracing::debug;

use crate::socket_trait::{Context, Pattern};
use crate::xsub::XSub;
use zwire_core::endpoint::{EndpointId, EndpointRef};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::{Delivery, Msg};
use zwire_core::socket_type::SocketType;
use zwire_core::subscription::SubscriptionEvent;

#[derive(Default)]
pub struct Sub {
    inner: XSub,
}

impl Pattern for Sub {
    const SOCKET_TYPE: SocketType = SocketType::Sub;

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.inner.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.inner.terminated(id);
    }

    fn on_hiccup(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.inner.hiccup(id);
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        if let Some(delivery) = self.inner.filter(delivery) {
            cx.deliver(delivery);
        }
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, _msg: Msg) -> Result<()> {
        Err(ZwireError::unsupported(
            "SUB sockets cannot send, use subscribe()/unsubscribe()",
        ))
    }

    fn subscribe(&mut self, _cx: &mut Context<'_>, topic: Bytes) -> Result<()> {
        debug!("[SUB] subscribe {:?}", topic);
        self.inner
            .forward(vec![SubscriptionEvent::Subscribe(topic).to_frame()]);
        Ok(())
    }

    fn unsubscribe(&mut self, _cx: &mut Context<'_>, topic: Bytes) -> Result<()> {
        debug!("[SUB] unsubscribe {:?}", topic);
        self.inner
            .forward(vec![SubscriptionEvent::Unsubscribe(topic).to_frame()]);
        Ok(())
    }
}
