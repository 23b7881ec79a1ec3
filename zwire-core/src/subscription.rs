//! Subscription trie and subscription control frames for XSUB/SUB sockets.
//!
//! [`Trie`] is a refcounted prefix set: a topic matches when any stored
//! prefix (including the empty one) is a prefix of it. Children are kept in a
//! byte-sorted vec so lookups are a binary search per level.

use bytes::Bytes;

#[derive(Debug, Default)]
struct Node {
    refcount: u32,
    children: Vec<(u8, Node)>,
}

impl Node {
    fn child(&self, byte: u8) -> Option<&Node> {
        self.children
            .binary_search_by_key(&byte, |(b, _)| *b)
            .ok()
            .map(|idx| &self.children[idx].1)
    }

    fn child_or_insert(&mut self, byte: u8) -> &mut Node {
        let idx = match self.children.binary_search_by_key(&byte, |(b, _)| *b) {
            Ok(idx) => idx,
            Err(idx) => {
                self.children.insert(idx, (byte, Node::default()));
                idx
            }
        };
        &mut self.children[idx].1
    }

    fn is_inert(&self) -> bool {
        self.refcount == 0 && self.children.is_empty()
    }

    /// Decrement the refcount at the end of `seq`, pruning emptied nodes on
    /// the way back up. Returns true only when the count reached zero.
    fn remove(&mut self, seq: &[u8]) -> bool {
        let Some((&first, rest)) = seq.split_first() else {
            if self.refcount == 0 {
                return false;
            }
            self.refcount -= 1;
            return self.refcount == 0;
        };

        let Ok(idx) = self.children.binary_search_by_key(&first, |(b, _)| *b) else {
            return false;
        };
        let removed = self.children[idx].1.remove(rest);
        if self.children[idx].1.is_inert() {
            self.children.remove(idx);
        }
        removed
    }

    fn for_each(&self, prefix: &mut Vec<u8>, visitor: &mut dyn FnMut(&[u8])) {
        if self.refcount > 0 {
            visitor(prefix.as_slice());
        }
        for (byte, child) in &self.children {
            prefix.push(*byte);
            child.for_each(prefix, visitor);
            prefix.pop();
        }
    }
}

/// Refcounted set of subscribed prefixes for a single subscriber.
#[derive(Debug, Default)]
pub struct Trie {
    root: Node,
    len: usize,
}

impl Trie {
    /// Create an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `seq`. Duplicates increase its refcount.
    pub fn add(&mut self, seq: &[u8]) {
        let mut node = &mut self.root;
        for &byte in seq {
            node = node.child_or_insert(byte);
        }
        if node.refcount == 0 {
            self.len += 1;
        }
        node.refcount += 1;
    }

    /// Remove one reference to `seq`.
    ///
    /// Returns true only when this call dropped the refcount to zero, i.e.
    /// when matching behaviour actually changed.
    pub fn remove(&mut self, seq: &[u8]) -> bool {
        let removed = self.root.remove(seq);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// True iff some stored sequence is a prefix of `seq`.
    #[must_use]
    pub fn check(&self, seq: &[u8]) -> bool {
        let mut node = &self.root;
        if node.refcount > 0 {
            return true;
        }
        for &byte in seq {
            match node.child(byte) {
                Some(next) => node = next,
                None => return false,
            }
            if node.refcount > 0 {
                return true;
            }
        }
        false
    }

    /// Visit every stored sequence once, in byte order.
    pub fn for_each(&self, mut visitor: impl FnMut(&[u8])) {
        let mut prefix = Vec::new();
        self.root.for_each(&mut prefix, &mut visitor);
    }

    /// Number of distinct stored sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there are no subscriptions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Subscription control message exchanged between SUB-side and PUB-side
/// sockets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    /// A peer subscribed to a topic
    Subscribe(Bytes),
    /// A peer unsubscribed from a topic
    Unsubscribe(Bytes),
}

impl SubscriptionEvent {
    /// Parse a control frame.
    ///
    /// Format: [0x01|0x00] [topic prefix...]. Anything else, including an
    /// empty frame, is ordinary data and yields `None`.
    #[must_use]
    pub fn from_frame(frame: &Bytes) -> Option<Self> {
        match frame.first()? {
            0x01 => Some(Self::Subscribe(frame.slice(1..))),
            0x00 => Some(Self::Unsubscribe(frame.slice(1..))),
            _ => None,
        }
    }

    /// Encode this event as a control frame
    #[must_use]
    pub fn to_frame(&self) -> Bytes {
        let (cmd, prefix) = match self {
            Self::Subscribe(p) => (0x01u8, p),
            Self::Unsubscribe(p) => (0x00u8, p),
        };

        let mut msg = Vec::with_capacity(1 + prefix.len());
        msg.push(cmd);
        msg.extend_from_slice(prefix);
        Bytes::from(msg)
    }

    /// Get the topic prefix
    #[must_use]
    pub const fn prefix(&self) -> &Bytes {
        match self {
            Self::Subscribe(p) | Self::Unsubscribe(p) => p,
        }
    }

    /// Check if this is a subscribe event
    #[must_use]
    pub const fn is_subscribe(&self) -> bool {
        matches!(self, Self::Subscribe(_))
    }
}
