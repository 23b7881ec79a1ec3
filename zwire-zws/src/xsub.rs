//! XSUB pattern.
//!
//! Holds this socket's own subscriptions in a [`Trie`] and forwards them
//! upstream as control frames (`0x01` + topic to subscribe, `0x00` + topic
//! to unsubscribe). Inbound messages surface only when their first frame
//! matches a subscription. Every (re)attached peer gets the full
//! subscription set replayed.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{Endpoint, EndpointId, EndpointRef};
use zwire_core::error::Result;
use zwire_core::message::{Delivery, Msg};
use zwire_core::pubsub::dist::Distribution;
use zwire_core::socket_type::SocketType;
use zwire_core::subscription::{SubscriptionEvent, Trie};

#[derive(Default)]
pub struct XSub {
    subscriptions: Trie,
    dist: Distribution,
}

impl XSub {
    /// This socket's current subscriptions.
    pub fn subscriptions(&self) -> &Trie {
        &self.subscriptions
    }

    fn replay(&self, endpoint: &EndpointRef) {
        let mut count = 0usize;
        self.subscriptions.for_each(|topic| {
            let frame = SubscriptionEvent::Subscribe(Bytes::copy_from_slice(topic)).to_frame();
            if !endpoint.send(&vec![frame]) {
                trace!("[XSUB] {} refused subscription replay", endpoint.id());
            }
            count += 1;
        });
        if count > 0 {
            debug!("[XSUB] replayed {} subscriptions to {}", count, endpoint.id());
        }
    }

    pub(crate) fn attach(&mut self, endpoint: EndpointRef) {
        self.replay(&endpoint);
        self.dist.attach(endpoint);
    }

    pub(crate) fn hiccup(&mut self, id: EndpointId) {
        if let Some(endpoint) = self.dist.get(id).cloned() {
            self.replay(&endpoint);
        }
    }

    pub(crate) fn terminated(&mut self, id: EndpointId) {
        self.dist.terminated(id);
    }

    /// Filter an inbound message against the subscriptions.
    pub(crate) fn filter(&self, delivery: Delivery) -> Option<Delivery> {
        let topic = delivery.frames.first().map_or(&[][..], |f| &f[..]);
        if self.subscriptions.check(topic) {
            Some(delivery)
        } else {
            trace!("[XSUB] no subscription matches, dropping");
            None
        }
    }

    /// Apply a control frame to the local subscriptions and forward it, or
    /// pass any other message upstream unchanged.
    pub(crate) fn forward(&mut self, msg: Msg) {
        match msg.first().and_then(SubscriptionEvent::from_frame) {
            Some(SubscriptionEvent::Subscribe(topic)) => {
                self.subscriptions.add(&topic);
                self.dist.send_to_all(&msg);
            }
            Some(SubscriptionEvent::Unsubscribe(topic)) => {
                if self.subscriptions.remove(&topic) {
                    self.dist.send_to_all(&msg);
                }
            }
            None => self.dist.send_to_all(&msg),
        }
    }
}

impl Pattern for XSub {
    const SOCKET_TYPE: SocketType = SocketType::XSub;

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.terminated(id);
    }

    fn on_hiccup(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.hiccup(id);
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        if let Some(delivery) = self.filter(delivery) {
            cx.deliver(delivery);
        }
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        self.forward(msg);
        Ok(())
    }
}
