//! Round-robin load balancer for PUSH/DEALER-style sockets.
//!
//! The balancer never queues. When the pool is empty or the endpoint under
//! the cursor reports back-pressure, `send` returns false and the caller
//! keeps the message. The cursor moves on after every attempt, accepted or
//! rejected, so one stalled peer cannot pin the rotation.

use crate::endpoint::{Endpoint, EndpointId, EndpointRef};
use crate::message::Msg;
use tracing::trace;

#[derive(Default)]
pub struct LoadBalancer {
    endpoints: Vec<EndpointRef>,
    cursor: usize,
}

impl LoadBalancer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, endpoint: EndpointRef) {
        self.endpoints.push(endpoint);
    }

    /// Remove `id` from the pool. The cursor keeps pointing at the entry
    /// that would have been tried next.
    pub fn terminated(&mut self, id: EndpointId) {
        let Some(pos) = self.endpoints.iter().position(|ep| ep.id() == id) else {
            return;
        };
        self.endpoints.remove(pos);
        if pos < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.endpoints.len() {
            self.cursor = 0;
        }
    }

    /// Try the endpoint under the cursor.
    pub fn send(&mut self, msg: &Msg) -> bool {
        if self.endpoints.is_empty() {
            return false;
        }
        if self.cursor >= self.endpoints.len() {
            self.cursor = 0;
        }

        let ep = &self.endpoints[self.cursor];
        let accepted = ep.send(msg);
        if !accepted {
            trace!("[LB] endpoint {} applied back-pressure", ep.id());
        }
        self.cursor = (self.cursor + 1) % self.endpoints.len();
        accepted
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
