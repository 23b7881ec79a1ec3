//! ROUTER pattern.
//!
//! Every attached endpoint starts anonymous. Its first inbound frame, the
//! routing-id greeting, picks its routing key and is not surfaced:
//!
//! - non-empty greeting: `0x00` + greeting bytes (peer-chosen)
//! - empty greeting: `0x01` + one-byte counter (auto-assigned)
//!
//! Later messages surface as `[key, ...frames]`. Sends take the key as their
//! first frame; messages to an unknown key are dropped, or fail with
//! `HostUnreachable` when `router_mandatory` is set.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{Endpoint, EndpointId, EndpointRef};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::{Delivery, Msg};
use zwire_core::options::SocketOptions;
use zwire_core::router::{Identify, RoutingTable};
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Router {
    table: RoutingTable,
}

impl Router {
    /// Routing key currently held by `id`.
    pub fn key_of(&self, id: EndpointId) -> Option<&Bytes> {
        self.table.key_of(id)
    }

    pub(crate) fn attach(&mut self, endpoint: EndpointRef) {
        debug!("[ROUTER] attached anonymous {}", endpoint.id());
        self.table.attach(endpoint);
    }

    pub(crate) fn terminated(&mut self, id: EndpointId) {
        if let Some(key) = self.table.terminated(id) {
            debug!("[ROUTER] {} released key {:?}", id, key);
        }
    }

    /// Identify anonymous senders and key everything else.
    ///
    /// Returns the message as it should surface, or `None` when it was
    /// consumed as a greeting or dropped.
    pub(crate) fn accept(&mut self, delivery: Delivery, handover: bool) -> Option<Delivery> {
        let source = delivery.source;

        if self.table.is_anonymous(source) {
            let first = delivery.frames.first().cloned().unwrap_or_default();
            match self.table.identify(source, &first, handover) {
                Identify::Assigned { key, displaced } => {
                    debug!("[ROUTER] {} identified as {:?}", source, key);
                    if let Some(previous) = displaced {
                        debug!("[ROUTER] handing {:?} over from {}", key, previous.id());
                        previous.close();
                    }
                }
                Identify::Rejected(dropped) => {
                    debug!("[ROUTER] no routing key for {}, closing", source);
                    if let Some(endpoint) = dropped {
                        endpoint.close();
                    }
                }
            }
            return None;
        }

        let Some(key) = self.table.key_of(source) else {
            trace!("[ROUTER] dropping message from unknown {}", source);
            return None;
        };
        let mut frames = Vec::with_capacity(delivery.frames.len() + 1);
        frames.push(key.clone());
        frames.extend(delivery.frames);
        Some(Delivery::new(source, frames))
    }

    /// Send `msg[1..]` to the endpoint keyed by `msg[0]`.
    ///
    /// Returns false when the key is unknown. A peer refusing the message is
    /// not reported: the message is dropped.
    pub(crate) fn route(&self, msg: &Msg) -> bool {
        let Some((key, body)) = msg.split_first() else {
            return false;
        };
        let Some(endpoint) = self.table.lookup(key) else {
            trace!("[ROUTER] no peer for key {:?}", key);
            return false;
        };
        if !endpoint.send(&body.to_vec()) {
            trace!("[ROUTER] {} refused message, dropping", endpoint.id());
        }
        true
    }
}

impl Pattern for Router {
    const SOCKET_TYPE: SocketType = SocketType::Router;

    fn adjust_options(options: &mut SocketOptions) {
        options.recv_routing_id = true;
    }

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.terminated(id);
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        if let Some(keyed) = self.accept(delivery, cx.options().router_handover) {
            cx.deliver(keyed);
        }
    }

    fn on_send(&mut self, cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        if msg.len() < 2 {
            return Err(ZwireError::InvalidMessage(
                "ROUTER messages need a routing key and a body",
            ));
        }
        if !self.route(&msg) && cx.options().router_mandatory {
            return Err(ZwireError::HostUnreachable);
        }
        Ok(())
    }
}
