//! ROUTER routing table
//!
//! Goals:
//! - Endpoints start anonymous; their first inbound frame decides the key
//! - Peer-chosen identity: `0x00` + greeting bytes
//! - Auto identity: `0x01` + one byte from a per-table counter
//! - Keys are unique among attached endpoints and free again on terminate
//! - Collisions either reject the newcomer or hand the key over

use crate::endpoint::{Endpoint, EndpointId, EndpointRef};
use bytes::{BufMut, Bytes, BytesMut};
use hashbrown::HashMap;
use tracing::debug;

const PEER_CHOSEN: u8 = 0x00;
const AUTO_ASSIGNED: u8 = 0x01;

struct Entry {
    endpoint: EndpointRef,
    key: Option<Bytes>,
}

/// Outcome of identifying an anonymous endpoint.
pub enum Identify {
    /// Endpoint now owns `key`. With handover, `displaced` is the previous
    /// holder, already removed from the table; the caller should close it.
    Assigned {
        key: Bytes,
        displaced: Option<EndpointRef>,
    },
    /// No key could be assigned. The endpoint is removed from the table and
    /// handed back so the caller can close it; its later frames find no entry.
    Rejected(Option<EndpointRef>),
}

/// Routing keys of the endpoints attached to one ROUTER socket.
#[derive(Default)]
pub struct RoutingTable {
    endpoints: HashMap<EndpointId, Entry>,
    keys: HashMap<Bytes, EndpointId>,
    next_id: u8,
}

impl RoutingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly attached, still anonymous endpoint.
    pub fn attach(&mut self, endpoint: EndpointRef) {
        self.endpoints.insert(
            endpoint.id(),
            Entry {
                endpoint,
                key: None,
            },
        );
    }

    /// Forget `id`, releasing its key. Returns the key it held, if any.
    pub fn terminated(&mut self, id: EndpointId) -> Option<Bytes> {
        let key = self.endpoints.remove(&id)?.key?;
        if self.keys.get(&key) == Some(&id) {
            self.keys.remove(&key);
        }
        Some(key)
    }

    #[must_use]
    pub fn is_anonymous(&self, id: EndpointId) -> bool {
        self.endpoints.get(&id).is_some_and(|e| e.key.is_none())
    }

    /// Assign a key to the anonymous endpoint `id` from its first frame.
    pub fn identify(&mut self, id: EndpointId, first_frame: &Bytes, handover: bool) -> Identify {
        if !self.is_anonymous(id) {
            return Identify::Rejected(None);
        }

        let mut displaced = None;
        let key = if first_frame.is_empty() {
            match self.next_auto_key() {
                Some(key) => key,
                None => {
                    debug!("[ROUTER] auto identity space exhausted");
                    return self.reject(id);
                }
            }
        } else {
            let mut buf = BytesMut::with_capacity(1 + first_frame.len());
            buf.put_u8(PEER_CHOSEN);
            buf.extend_from_slice(first_frame);
            let key = buf.freeze();

            if let Some(&holder) = self.keys.get(&key) {
                if !handover {
                    debug!("[ROUTER] duplicate identity {:?}, rejecting {}", key, id);
                    return self.reject(id);
                }
                displaced = self.endpoints.remove(&holder).map(|e| e.endpoint);
            }
            key
        };

        self.keys.insert(key.clone(), id);
        if let Some(entry) = self.endpoints.get_mut(&id) {
            entry.key = Some(key.clone());
        }
        Identify::Assigned { key, displaced }
    }

    fn reject(&mut self, id: EndpointId) -> Identify {
        Identify::Rejected(self.endpoints.remove(&id).map(|e| e.endpoint))
    }

    fn next_auto_key(&mut self) -> Option<Bytes> {
        for _ in 0..=u8::MAX as usize {
            let candidate = Bytes::copy_from_slice(&[AUTO_ASSIGNED, self.next_id]);
            self.next_id = self.next_id.wrapping_add(1);
            if !self.keys.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    #[must_use]
    pub fn key_of(&self, id: EndpointId) -> Option<&Bytes> {
        self.endpoints.get(&id)?.key.as_ref()
    }

    /// Endpoint currently holding `key`.
    #[must_use]
    pub fn lookup(&self, key: &[u8]) -> Option<&EndpointRef> {
        let id = self.keys.get(key)?;
        self.endpoints.get(id).map(|e| &e.endpoint)
    }

    #[must_use]
    pub fn get(&self, id: EndpointId) -> Option<&EndpointRef> {
        self.endpoints.get(&id).map(|e| &e.endpoint)
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
