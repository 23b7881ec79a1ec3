//! XPUB pattern.
//!
//! Downstream peers subscribe by sending control frames; each subscription
//! is recorded per endpoint in a [`MultiTrie`]. Publishing matches the first
//! frame against it and sends to exactly the matched endpoints.
//!
//! Subscription changes surface to the application as the control frame
//! itself:
//! - first subscriber of a prefix: `0x01 + prefix`
//! - last unsubscriber of a prefix, or its last subscriber disconnecting:
//!   `0x00 + prefix`
//!
//! With `xpub_verbose` every subscribe and unsubscribe surfaces, duplicates
//! included. Non-control messages from downstream always surface.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{Endpoint, EndpointId, EndpointRef};
use zwire_core::error::Result;
use zwire_core::message::{Delivery, Msg};
use zwire_core::pubsub::dist::Distribution;
use zwire_core::pubsub::index::MultiTrie;
use zwire_core::socket_type::SocketType;
use zwire_core::subscription::SubscriptionEvent;

#[derive(Default)]
pub struct XPub {
    subscribers: MultiTrie,
    dist: Distribution,
}

impl XPub {
    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.dist.len()
    }

    pub(crate) fn attach(&mut self, endpoint: EndpointRef, welcome: Option<&Bytes>) {
        if let Some(welcome) = welcome {
            if !endpoint.send(&vec![welcome.clone()]) {
                trace!("[XPUB] {} refused welcome message", endpoint.id());
            }
        }
        self.dist.attach(endpoint);
    }

    /// Drop `id` everywhere. Returns an unsubscribe frame for every prefix
    /// it was the last subscriber of.
    pub(crate) fn terminated(&mut self, id: EndpointId) -> Vec<Bytes> {
        let mut orphaned = Vec::new();
        self.subscribers.remove_endpoint(id, |_, prefix| {
            orphaned.push(SubscriptionEvent::Unsubscribe(Bytes::copy_from_slice(prefix)).to_frame());
        });
        self.dist.terminated(id);
        if !orphaned.is_empty() {
            debug!("[XPUB] {} left {} prefixes without subscribers", id, orphaned.len());
        }
        orphaned
    }

    /// Apply a control frame from downstream. Returns the message if it
    /// should surface.
    pub(crate) fn apply(&mut self, delivery: Delivery, verbose: bool) -> Option<Delivery> {
        let unique = match delivery.frames.first().and_then(SubscriptionEvent::from_frame) {
            Some(SubscriptionEvent::Subscribe(prefix)) => {
                self.subscribers.add(&prefix, delivery.source)
            }
            Some(SubscriptionEvent::Unsubscribe(prefix)) => {
                self.subscribers.remove(&prefix, delivery.source)
            }
            None => return Some(delivery),
        };

        if unique || verbose {
            Some(delivery)
        } else {
            trace!("[XPUB] duplicate subscription change from {}", delivery.source);
            None
        }
    }

    pub(crate) fn publish(&mut self, msg: &Msg) {
        let topic = msg.first().map_or(&[][..], |f| &f[..]);
        let Self { subscribers, dist } = self;
        subscribers.match_topic(topic, |id| dist.match_endpoint(id));
        dist.send_to_matching(msg);
    }
}

impl Pattern for XPub {
    const SOCKET_TYPE: SocketType = SocketType::XPub;

    fn on_attach(&mut self, cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.attach(endpoint, cx.options().xpub_welcome_msg.as_ref());
    }

    fn on_terminated(&mut self, cx: &mut Context<'_>, id: EndpointId) {
        for frame in self.terminated(id) {
            cx.deliver(Delivery::new(id, vec![frame]));
        }
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        let verbose = cx.options().xpub_verbose;
        if let Some(delivery) = self.apply(delivery, verbose) {
            cx.deliver(delivery);
        }
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        self.publish(&msg);
        Ok(())
    }
}
