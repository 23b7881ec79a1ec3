//! Fan-out set for PUB-side and XSUB-side sockets.
//!
//! Tracks attached endpoints plus a one-shot "matched" subset. XPUB marks
//! subscribers through [`Distribution::match_endpoint`] and then flushes with
//! [`Distribution::send_to_matching`]. Delivery is fire-and-forget: an
//! endpoint that rejects a message simply misses it.

use crate::endpoint::{Endpoint, EndpointId, EndpointRef};
use crate::message::Msg;
use smallvec::SmallVec;
use tracing::trace;

#[derive(Default)]
pub struct Distribution {
    attached: Vec<EndpointRef>,
    matched: SmallVec<[EndpointId; 8]>,
}

impl Distribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, endpoint: EndpointRef) {
        self.attached.push(endpoint);
    }

    /// Forget `id` in both the attached and the matched set.
    pub fn terminated(&mut self, id: EndpointId) {
        self.attached.retain(|ep| ep.id() != id);
        self.matched.retain(|m| *m != id);
    }

    /// Mark `id` for the next [`send_to_matching`](Self::send_to_matching).
    /// Idempotent; unknown ids are ignored.
    pub fn match_endpoint(&mut self, id: EndpointId) {
        if !self.matched.contains(&id) && self.attached.iter().any(|ep| ep.id() == id) {
            self.matched.push(id);
        }
    }

    /// Deliver to the matched subset, then clear it.
    pub fn send_to_matching(&mut self, msg: &Msg) {
        for id in self.matched.drain(..) {
            if let Some(ep) = self.attached.iter().find(|ep| ep.id() == id) {
                if !ep.send(msg) {
                    trace!("[DIST] endpoint {} rejected message, dropping", id);
                }
            }
        }
    }

    /// Deliver to every attached endpoint.
    pub fn send_to_all(&self, msg: &Msg) {
        for ep in &self.attached {
            if !ep.send(msg) {
                trace!("[DIST] endpoint {} rejected message, dropping", ep.id());
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: EndpointId) -> Option<&EndpointRef> {
        self.attached.iter().find(|ep| ep.id() == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEndpoint;
    use bytes::Bytes;

    fn msg(s: &'static str) -> Msg {
        vec![Bytes::from_static(s.as_bytes())]
    }

    #[test]
    fn send_to_matching_is_one_shot() {
        let a = MockEndpoint::new();
        let b = MockEndpoint::new();
        let mut dist = Distribution::new();
        dist.attach(a.clone());
        dist.attach(b.clone());

        dist.match_endpoint(a.id());
        dist.match_endpoint(a.id());
        dist.send_to_matching(&msg("x"));
        assert_eq!(a.sent(), vec![msg("x")]);
        assert!(b.sent().is_empty());

        // Matched set was cleared by the previous flush.
        dist.send_to_matching(&msg("y"));
        assert_eq!(a.sent().len(), 1);
    }

    #[test]
    fn send_to_all_ignores_rejection() {
        let a = MockEndpoint::new();
        let b = MockEndpoint::new();
        b.set_accepting(false);
        let mut dist = Distribution::new();
        dist.attach(a.clone());
        dist.attach(b.clone());

        dist.send_to_all(&msg("hi"));
        assert_eq!(a.sent(), vec![msg("hi")]);
        assert!(b.sent().is_empty());
    }

    #[test]
    fn terminated_clears_match() {
        let a = MockEndpoint::new();
        let mut dist = Distribution::new();
        dist.attach(a.clone());
        dist.match_endpoint(a.id());
        dist.terminated(a.id());

        dist.send_to_matching(&msg("x"));
        assert!(a.sent().is_empty());
        assert!(dist.is_empty());
    }
}
