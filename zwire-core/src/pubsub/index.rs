//! PUB-side Subscription Index (MultiTrie)
//!
//! Design:
//! - Byte-keyed trie; each node holds the set of endpoints subscribed to the
//!   exact prefix ending there.
//! - Children kept sorted by byte, looked up with binary search.
//! - Endpoint sets are `SmallVec`s: fanout per prefix is usually tiny.
//! - `add`/`remove` report cardinality edges (first subscriber in, last
//!   subscriber out) so XPUB can decide what to forward upstream.
//! - Matching dedups results because endpoints may subscribe to overlapping
//!   prefixes.

use crate::endpoint::EndpointId;
use smallvec::SmallVec;

#[derive(Debug, Default)]
struct Node {
    /// Inline up to 4 subscribers without heap allocation.
    subscribers: SmallVec<[EndpointId; 4]>,
    children: Vec<(u8, Node)>,
}

impl Node {
    fn is_inert(&self) -> bool {
        self.subscribers.is_empty() && self.children.is_empty()
    }

    fn remove(&mut self, seq: &[u8], endpoint: EndpointId) -> bool {
        let Some((&first, rest)) = seq.split_first() else {
            let Some(pos) = self.subscribers.iter().position(|e| *e == endpoint) else {
                return false;
            };
            self.subscribers.swap_remove(pos);
            return self.subscribers.is_empty();
        };

        let Ok(idx) = self.children.binary_search_by_key(&first, |(b, _)| *b) else {
            return false;
        };
        let last = self.children[idx].1.remove(rest, endpoint);
        if self.children[idx].1.is_inert() {
            self.children.remove(idx);
        }
        last
    }

    fn remove_endpoint(
        &mut self,
        endpoint: EndpointId,
        prefix: &mut Vec<u8>,
        on_last: &mut dyn FnMut(EndpointId, &[u8]),
    ) {
        if let Some(pos) = self.subscribers.iter().position(|e| *e == endpoint) {
            self.subscribers.swap_remove(pos);
            if self.subscribers.is_empty() {
                on_last(endpoint, prefix.as_slice());
            }
        }

        let mut i = 0usize;
        while i < self.children.len() {
            prefix.push(self.children[i].0);
            self.children[i].1.remove_endpoint(endpoint, prefix, on_last);
            prefix.pop();

            if self.children[i].1.is_inert() {
                self.children.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Prefix → subscribing endpoints.
#[derive(Debug, Default)]
pub struct MultiTrie {
    root: Node,
}

impl MultiTrie {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_inert()
    }

    /// Subscribe `endpoint` to `seq`.
    ///
    /// Returns true iff the prefix had no subscribers before this call.
    pub fn add(&mut self, seq: &[u8], endpoint: EndpointId) -> bool {
        let mut node = &mut self.root;
        for &byte in seq {
            let idx = match node.children.binary_search_by_key(&byte, |(b, _)| *b) {
                Ok(idx) => idx,
                Err(idx) => {
                    node.children.insert(idx, (byte, Node::default()));
                    idx
                }
            };
            node = &mut node.children[idx].1;
        }

        let first = node.subscribers.is_empty();
        if !node.subscribers.contains(&endpoint) {
            node.subscribers.push(endpoint);
        }
        first
    }

    /// Unsubscribe `endpoint` from `seq`.
    ///
    /// Returns true iff the endpoint was subscribed and the prefix now has no
    /// subscribers left.
    pub fn remove(&mut self, seq: &[u8], endpoint: EndpointId) -> bool {
        self.root.remove(seq, endpoint)
    }

    /// Visit every endpoint subscribed to any prefix of `topic`, each once.
    ///
    /// Visit order is ascending by endpoint id.
    pub fn match_topic(&self, topic: &[u8], mut visitor: impl FnMut(EndpointId)) {
        let mut out: SmallVec<[EndpointId; 16]> = SmallVec::new();

        let mut node = &self.root;
        out.extend_from_slice(&node.subscribers);
        for &byte in topic {
            match node.children.binary_search_by_key(&byte, |(b, _)| *b) {
                Ok(idx) => node = &node.children[idx].1,
                Err(_) => break,
            }
            out.extend_from_slice(&node.subscribers);
        }

        // Dedup if needed (endpoint might have subscribed to nested prefixes).
        if out.len() > 1 {
            out.sort_unstable();
            out.dedup();
        }

        for endpoint in out {
            visitor(endpoint);
        }
    }

    /// Remove `endpoint` from every prefix (used on disconnect).
    ///
    /// `on_last` is called with each prefix the endpoint was the last
    /// subscriber of.
    pub fn remove_endpoint(
        &mut self,
        endpoint: EndpointId,
        mut on_last: impl FnMut(EndpointId, &[u8]),
    ) {
        let mut prefix = Vec::new();
        self.root.remove_endpoint(endpoint, &mut prefix, &mut on_last);
    }
}
