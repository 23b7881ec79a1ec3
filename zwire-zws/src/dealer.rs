//! DEALER pattern.
//!
//! Sends are load-balanced across attached peers; receives pass through
//! unfiltered. A message the balancer cannot place is kept in a FIFO and
//! retried whenever a peer attaches or hiccups, and before every later send,
//! so messages always leave in the order they were sent.

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{Endpoint, EndpointId, EndpointRef};
use zwire_core::error::Result;
use zwire_core::lb::LoadBalancer;
use zwire_core::message::{Delivery, Msg};
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Dealer {
    lb: LoadBalancer,
    pending: VecDeque<Msg>,
}

impl Dealer {
    /// Messages waiting for a peer to accept them.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn attach(&mut self, endpoint: EndpointRef) {
        self.lb.attach(endpoint);
        self.flush();
    }

    pub(crate) fn terminated(&mut self, id: EndpointId) {
        self.lb.terminated(id);
    }

    /// Queue `msg` behind anything already pending and push as much as the
    /// peers accept.
    pub(crate) fn enqueue(&mut self, msg: Msg) {
        self.pending.push_back(msg);
        self.flush();
        if !self.pending.is_empty() {
            trace!("[DEALER] {} messages pending", self.pending.len());
        }
    }

    /// Drain the pending FIFO, stopping at the first rejection.
    pub(crate) fn flush(&mut self) {
        while let Some(msg) = self.pending.front() {
            if !self.lb.send(msg) {
                break;
            }
            self.pending.pop_front();
        }
    }
}

impl Pattern for Dealer {
    const SOCKET_TYPE: SocketType = SocketType::Dealer;

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        debug!("[DEALER] attached {}", endpoint.id());
        self.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        debug!("[DEALER] terminated {}", id);
        self.terminated(id);
    }

    fn on_hiccup(&mut self, _cx: &mut Context<'_>, _id: EndpointId) {
        self.flush();
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        cx.deliver(delivery);
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        self.enqueue(msg);
        Ok(())
    }
}
