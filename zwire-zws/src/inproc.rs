//! In-process transport for sockets within the same process.
//!
//! Bound names live in a global registry protected by `DashMap`. Connecting
//! creates a linked pair of endpoints; each side encodes outbound messages
//! with the ZWS codec and the other side reassembles them, so inproc peers
//! see exactly what a WebSocket peer would: a routing-id greeting first,
//! then multipart messages.
//!
//! # Usage
//!
//! Sockets use this module through `bind("inproc://name")` and
//! `connect("inproc://name")`; nothing here needs to be called directly.

use bytes::Bytes;
use dashmap::DashMap;
use flume::Sender;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::codec::{self, ZwsDecoder};
use zwire_core::endpoint::{Endpoint, EndpointEvent, EndpointId, EndpointRef, Listener};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::Msg;
use zwire_core::options::SocketOptions;
use zwire_core::socket_type::SocketType;

/// What a socket contributes to an inproc connection.
#[derive(Clone)]
pub struct InprocPeer {
    pub events: Sender<EndpointEvent>,
    pub socket_type: SocketType,
    pub options: SocketOptions,
}

struct Binding {
    token: u64,
    peer: InprocPeer,
}

/// Global registry of bound inproc names
static INPROC_REGISTRY: once_cell::sync::Lazy<DashMap<String, Binding>> =
    once_cell::sync::Lazy::new(DashMap::new);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Register `name` for `peer`.
///
/// # Errors
///
/// `AddrInUse` if the name is already bound.
pub fn bind(name: &str, peer: InprocPeer) -> Result<Arc<InprocListener>> {
    let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    match INPROC_REGISTRY.entry(name.to_string()) {
        dashmap::mapref::entry::Entry::Occupied(_) => {
            Err(ZwireError::AddrInUse(format!("inproc://{name}")))
        }
        dashmap::mapref::entry::Entry::Vacant(slot) => {
            slot.insert(Binding { token, peer });
            debug!("[INPROC] bound {}", name);
            Ok(Arc::new(InprocListener {
                name: name.to_string(),
                address: format!("inproc://{name}"),
                token,
            }))
        }
    }
}

/// Connect `local` to the socket bound at `name`.
///
/// The bound socket is notified with an `Attach` event. The returned endpoint
/// is the local side; call [`InprocEndpoint::handshake`] once the local
/// socket is ready to see the peer's greeting.
///
/// # Errors
///
/// - `AddrNotFound` if nothing is bound at `name`
/// - `Incompatible` if the two socket types cannot talk to each other
pub fn connect(name: &str, local: InprocPeer) -> Result<Arc<InprocEndpoint>> {
    let address = format!("inproc://{name}");
    let remote = INPROC_REGISTRY
        .get(name)
        .filter(|b| !b.peer.events.is_disconnected())
        .map(|b| b.peer.clone())
        .ok_or_else(|| ZwireError::AddrNotFound(address.clone()))?;

    if !local.socket_type.is_compatible(remote.socket_type) {
        return Err(ZwireError::Incompatible {
            local: local.socket_type,
            peer: remote.socket_type,
        });
    }

    let link = Arc::new(Link {
        sides: [Side::new(local, &address), Side::new(remote, &address)],
        closed: AtomicBool::new(false),
    });
    let connector = Arc::new(InprocEndpoint {
        link: Arc::clone(&link),
        side: 0,
    });
    let acceptor: EndpointRef = Arc::new(InprocEndpoint { link, side: 1 });

    if connector.link.sides[1]
        .events
        .send(EndpointEvent::Attach(acceptor))
        .is_err()
    {
        return Err(ZwireError::AddrNotFound(address));
    }
    trace!("[INPROC] {} connected to {}", connector.id(), name);
    Ok(connector)
}

/// Names currently bound.
pub fn list_bound() -> Vec<String> {
    INPROC_REGISTRY
        .iter()
        .map(|entry| entry.key().clone())
        .collect()
}

/// Handle to a bound inproc name.
pub struct InprocListener {
    name: String,
    address: String,
    token: u64,
}

impl Listener for InprocListener {
    fn address(&self) -> &str {
        &self.address
    }

    fn close(&self) {
        if INPROC_REGISTRY
            .remove_if(&self.name, |_, b| b.token == self.token)
            .is_some()
        {
            debug!("[INPROC] unbound {}", self.name);
        }
    }
}

struct Inbound {
    decoder: ZwsDecoder,
    greeted: bool,
}

struct Side {
    id: EndpointId,
    address: String,
    events: Sender<EndpointEvent>,
    recv_routing_id: bool,
    send_hwm: usize,
    greeting: Bytes,
    inbound: Mutex<Inbound>,
}

impl Side {
    fn new(peer: InprocPeer, address: &str) -> Self {
        Self {
            id: EndpointId::next(),
            address: address.to_string(),
            events: peer.events,
            recv_routing_id: peer.options.recv_routing_id,
            send_hwm: peer.options.send_hwm,
            greeting: peer.options.greeting(),
            inbound: Mutex::new(Inbound {
                decoder: ZwsDecoder::new(),
                greeted: false,
            }),
        }
    }

    /// Decode `segments` as arriving on this side and post completed
    /// messages to the owning socket.
    fn receive(&self, segments: &[Bytes]) -> bool {
        let mut inbound = self.inbound.lock();
        for segment in segments {
            let msg = match inbound.decoder.decode(segment) {
                Ok(Some(msg)) => msg,
                Ok(None) => continue,
                Err(e) => {
                    debug!("[INPROC] {} dropped malformed segment: {}", self.id, e);
                    return false;
                }
            };

            if !inbound.greeted {
                inbound.greeted = true;
                if !self.recv_routing_id {
                    trace!("[INPROC] {} consumed greeting", self.id);
                    continue;
                }
            }

            if self.events.send(EndpointEvent::message(self.id, msg)).is_err() {
                return false;
            }
        }
        true
    }
}

struct Link {
    sides: [Side; 2],
    closed: AtomicBool,
}

/// One side of an inproc connection.
pub struct InprocEndpoint {
    link: Arc<Link>,
    side: usize,
}

impl InprocEndpoint {
    fn local(&self) -> &Side {
        &self.link.sides[self.side]
    }

    fn remote(&self) -> &Side {
        &self.link.sides[1 - self.side]
    }

    /// Exchange routing-id greetings in both directions.
    pub fn handshake(&self) {
        let local_greeting = vec![self.local().greeting.clone()];
        let remote_greeting = vec![self.remote().greeting.clone()];
        self.remote().receive(&codec::encode(&local_greeting));
        self.local().receive(&codec::encode(&remote_greeting));
    }
}

impl Endpoint for InprocEndpoint {
    fn id(&self) -> EndpointId {
        self.local().id
    }

    fn address(&self) -> &str {
        &self.local().address
    }

    fn send(&self, msg: &Msg) -> bool {
        if self.link.closed.load(Ordering::Acquire) {
            return false;
        }
        let remote = self.remote();
        if remote.events.len() >= self.local().send_hwm {
            trace!("[INPROC] {} at send HWM", self.id());
            return false;
        }
        remote.receive(&codec::encode(msg))
    }

    fn close(&self) {
        if self.link.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        for side in &self.link.sides {
            let _ = side.events.send(EndpointEvent::Terminated(side.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(socket_type: SocketType, options: SocketOptions) -> (InprocPeer, flume::Receiver<EndpointEvent>) {
        let (events, rx) = flume::unbounded();
        (
            InprocPeer {
                events,
                socket_type,
                options,
            },
            rx,
        )
    }

    #[test]
    fn test_bind_duplicate() {
        let (a, _rx_a) = peer(SocketType::Pull, SocketOptions::new());
        let (b, _rx_b) = peer(SocketType::Pull, SocketOptions::new());

        let listener = bind("test-duplicate", a).unwrap();
        assert!(matches!(bind("test-duplicate", b), Err(ZwireError::AddrInUse(_))));
        assert!(list_bound().contains(&"test-duplicate".to_string()));

        listener.close();
        assert!(!list_bound().contains(&"test-duplicate".to_string()));
    }

    #[test]
    fn test_connect_unbound() {
        let (a, _rx) = peer(SocketType::Push, SocketOptions::new());
        assert!(matches!(
            connect("test-nobody-home", a),
            Err(ZwireError::AddrNotFound(_))
        ));
    }

    #[test]
    fn test_connect_incompatible() {
        let (a, _rx_a) = peer(SocketType::Pull, SocketOptions::new());
        let (b, _rx_b) = peer(SocketType::Pub, SocketOptions::new());
        let listener = bind("test-incompatible", a).unwrap();

        assert!(matches!(
            connect("test-incompatible", b),
            Err(ZwireError::Incompatible { .. })
        ));
        listener.close();
    }

    #[test]
    fn test_greeting_and_message_flow() {
        let (server, server_rx) = peer(
            SocketType::Router,
            SocketOptions::new().with_recv_routing_id(true),
        );
        let (client, client_rx) = peer(
            SocketType::Dealer,
            SocketOptions::new().with_routing_id(Bytes::from_static(b"c1")),
        );
        let listener = bind("test-greeting", server).unwrap();

        let ep = connect("test-greeting", client).unwrap();
        ep.handshake();
        assert!(ep.send(&vec![Bytes::from_static(b"hi"), Bytes::new()]));

        let accepted = match server_rx.try_recv().unwrap() {
            EndpointEvent::Attach(ep) => ep,
            other => panic!("expected attach, got {other:?}"),
        };
        match server_rx.try_recv().unwrap() {
            EndpointEvent::Message(d) => {
                assert_eq!(d.source, accepted.id());
                assert_eq!(d.frames, vec![Bytes::from_static(b"c1")]);
            }
            other => panic!("expected greeting, got {other:?}"),
        }
        match server_rx.try_recv().unwrap() {
            EndpointEvent::Message(d) => {
                assert_eq!(d.frames, vec![Bytes::from_static(b"hi"), Bytes::new()]);
            }
            other => panic!("expected message, got {other:?}"),
        }

        // The dealer does not receive routing ids: the server greeting is consumed.
        assert!(client_rx.try_recv().is_err());

        ep.close();
        ep.close();
        assert!(matches!(server_rx.try_recv(), Ok(EndpointEvent::Terminated(id)) if id == accepted.id()));
        assert!(matches!(client_rx.try_recv(), Ok(EndpointEvent::Terminated(id)) if id == ep.id()));
        assert!(client_rx.try_recv().is_err());
        assert!(!accepted.send(&vec![Bytes::from_static(b"late")]));

        listener.close();
    }

    #[test]
    fn test_send_hwm_backpressure() {
        let (server, server_rx) = peer(SocketType::Pull, SocketOptions::new());
        let (client, _client_rx) = peer(SocketType::Push, SocketOptions::new().with_send_hwm(3));
        let listener = bind("test-hwm", server).unwrap();

        let ep = connect("test-hwm", client).unwrap();
        ep.handshake();
        // Attach already occupies one slot.
        assert!(ep.send(&vec![Bytes::from_static(b"1")]));
        assert!(ep.send(&vec![Bytes::from_static(b"2")]));
        assert!(!ep.send(&vec![Bytes::from_static(b"3")]));

        let _ = server_rx.try_recv();
        assert!(ep.send(&vec![Bytes::from_static(b"3")]));
        listener.close();
    }
}
