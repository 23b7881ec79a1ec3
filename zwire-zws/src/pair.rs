//! PAIR pattern: exactly one peer at a time.
//!
//! A second endpoint is closed as soon as it attaches. Messages sent while
//! there is no peer, or that the peer refuses, wait in a FIFO that is flushed
//! when a peer attaches or hiccups.

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{Endpoint, EndpointId, EndpointRef};
use zwire_core::error::Result;
use zwire_core::message::{Delivery, Msg};
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Pair {
    peer: Option<EndpointRef>,
    pending: VecDeque<Msg>,
}

impl Pair {
    fn is_peer(&self, id: EndpointId) -> bool {
        self.peer.as_ref().is_some_and(|p| p.id() == id)
    }

    fn flush(&mut self) {
        let Some(peer) = &self.peer else {
            return;
        };
        while let Some(msg) = self.pending.front() {
            if !peer.send(msg) {
                trace!("[PAIR] peer {} refused, {} pending", peer.id(), self.pending.len());
                break;
            }
            self.pending.pop_front();
        }
    }
}

impl Pattern for Pair {
    const SOCKET_TYPE: SocketType = SocketType::Pair;

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        if self.peer.is_some() {
            debug!("[PAIR] rejecting second peer {}", endpoint.id());
            endpoint.close();
            return;
        }
        debug!("[PAIR] peer {} attached", endpoint.id());
        self.peer = Some(endpoint);
        self.flush();
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        if self.is_peer(id) {
            debug!("[PAIR] peer {} gone", id);
            self.peer = None;
        }
    }

    fn on_hiccup(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        if self.is_peer(id) {
            self.flush();
        }
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        if self.is_peer(delivery.source) {
            cx.deliver(delivery);
        } else {
            trace!("[PAIR] dropping message from stale {}", delivery.source);
        }
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        self.pending.push_back(msg);
        self.flush();
        Ok(())
    }
}
