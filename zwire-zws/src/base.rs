//! Socket runtime shared by all pattern strategies.
//!
//! `Socket<P>` owns the endpoint table, the bound listeners, the event
//! channel every transport posts into, and the inbox of messages surfaced to
//! the application. Events are dispatched one at a time to the pattern `P`.
//!
//! # Attachment
//!
//! An endpoint is *connected* when this socket initiated it and *attached*
//! once the pattern has seen it. Without `immediate`, a connected endpoint is
//! attached before `connect` returns. With `immediate`, it is attached when
//! its `Attach` event is dispatched. Messages from endpoints that are not
//! attached are dropped.

use bytes::Bytes;
use flume::{Receiver, Sender};
use hashbrown::HashMap;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::inproc::{self, InprocPeer};
use crate::socket_trait::{Context, Pattern};
use zwire_core::address::{Address, AddressError};
use zwire_core::endpoint::{Endpoint, EndpointEvent, EndpointId, EndpointRef, Listener};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::{Delivery, IntoFrame, IntoFrames};
use zwire_core::monitor::{create_monitor, SocketEvent, SocketEventSender, SocketMonitor};
use zwire_core::options::SocketOptions;
use zwire_core::socket_type::SocketType;

struct Attached {
    endpoint: EndpointRef,
    connected: bool,
    attached: bool,
}

/// A messaging socket running pattern `P`.
///
/// # Example
///
/// ```rust
/// use zwire_zws::{RepSocket, ReqSocket};
///
/// # fn main() -> zwire_core::error::Result<()> {
/// let mut rep = RepSocket::new();
/// rep.bind("inproc://doc-echo")?;
///
/// let mut req = ReqSocket::new();
/// req.connect("inproc://doc-echo")?;
/// req.send("Hello")?;
///
/// let request = rep.try_recv().expect("request");
/// assert_eq!(request.frames[0].as_ref(), b"Hello");
/// rep.send("World")?;
///
/// let reply = req.try_recv().expect("reply");
/// assert_eq!(reply.frames[0].as_ref(), b"World");
/// # Ok(())
/// # }
/// ```
pub struct Socket<P: Pattern> {
    pattern: P,
    options: SocketOptions,
    endpoints: HashMap<EndpointId, Attached>,
    listeners: Vec<Arc<dyn Listener>>,
    events_tx: Sender<EndpointEvent>,
    events_rx: Receiver<EndpointEvent>,
    inbox: VecDeque<Delivery>,
    monitor: Option<SocketEventSender>,
    closed: bool,
}

impl<P: Pattern> Default for Socket<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Pattern> Socket<P> {
    /// Create a socket with default options.
    pub fn new() -> Self {
        Self::with_options(SocketOptions::default())
    }

    /// Create a socket with custom options.
    pub fn with_options(mut options: SocketOptions) -> Self {
        P::adjust_options(&mut options);
        let (events_tx, events_rx) = flume::unbounded();
        Self {
            pattern: P::default(),
            options,
            endpoints: HashMap::new(),
            listeners: Vec::new(),
            events_tx,
            events_rx,
            inbox: VecDeque::new(),
            monitor: None,
            closed: false,
        }
    }

    /// Get the socket type.
    pub fn socket_type(&self) -> SocketType {
        P::SOCKET_TYPE
    }

    /// Get a reference to the socket options.
    pub fn options(&self) -> &SocketOptions {
        &self.options
    }

    /// Pattern state, for inspection.
    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of endpoints currently known to the socket.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Sender external transports use to post events to this socket.
    pub fn event_sender(&self) -> Sender<EndpointEvent> {
        self.events_tx.clone()
    }

    /// Enable lifecycle monitoring. A second call replaces the previous
    /// monitor.
    pub fn monitor(&mut self) -> SocketMonitor {
        let (tx, rx) = create_monitor();
        self.monitor = Some(tx);
        rx
    }

    fn emit(&self, event: SocketEvent) {
        if let Some(monitor) = &self.monitor {
            let _ = monitor.send(event);
        }
    }

    fn context(&mut self) -> (&mut P, Context<'_>) {
        let cx = Context {
            socket_type: P::SOCKET_TYPE,
            options: &self.options,
            inbox: &mut self.inbox,
            events: &self.events_tx,
        };
        (&mut self.pattern, cx)
    }

    fn inproc_peer(&self) -> InprocPeer {
        InprocPeer {
            events: self.events_tx.clone(),
            socket_type: P::SOCKET_TYPE,
            options: self.options.clone(),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(ZwireError::SocketClosed)
        } else {
            Ok(())
        }
    }

    /// Open, and carrying options a peer can be greeted with.
    fn ensure_ready(&self) -> Result<()> {
        self.ensure_open()?;
        self.options.validate()
    }

    /// Connect to `address`.
    ///
    /// # Errors
    ///
    /// - `Unsupported` for schemes without a built-in transport
    ///   (`ws://`, `wss://`, anything unknown)
    /// - `AddrNotFound` / `Incompatible` from the inproc transport
    /// - `InvalidMessage` if the configured routing id cannot be sent
    pub fn connect(&mut self, address: &str) -> Result<()> {
        self.ensure_ready()?;
        let name = match parse_address(address)? {
            Address::Inproc(name) => name,
            other => {
                return Err(ZwireError::unsupported(format!(
                    "no built-in transport for {}://, use adopt()",
                    other.scheme()
                )))
            }
        };

        let link = inproc::connect(&name, self.inproc_peer())?;
        let id = link.id();
        let endpoint: EndpointRef = link.clone();
        debug!("[{}] connecting {} to {}", P::SOCKET_TYPE, id, address);

        if self.options.immediate {
            self.endpoints.insert(
                id,
                Attached {
                    endpoint: Arc::clone(&endpoint),
                    connected: true,
                    attached: false,
                },
            );
            let _ = self.events_tx.send(EndpointEvent::Attach(endpoint));
            link.handshake();
        } else {
            self.endpoints.insert(
                id,
                Attached {
                    endpoint: Arc::clone(&endpoint),
                    connected: true,
                    attached: true,
                },
            );
            link.handshake();
            let (pattern, mut cx) = self.context();
            pattern.on_attach(&mut cx, endpoint);
        }

        self.emit(SocketEvent::Connected(address.to_string()));
        Ok(())
    }

    /// Attach an endpoint an external transport already established.
    pub fn adopt(&mut self, endpoint: EndpointRef) -> Result<()> {
        self.ensure_ready()?;
        let id = endpoint.id();
        let address = endpoint.address().to_string();
        self.endpoints.insert(
            id,
            Attached {
                endpoint: Arc::clone(&endpoint),
                connected: true,
                attached: true,
            },
        );
        let (pattern, mut cx) = self.context();
        pattern.on_attach(&mut cx, endpoint);
        self.emit(SocketEvent::Connected(address));
        Ok(())
    }

    /// Close every endpoint this socket connected to `address`.
    ///
    /// No-op when nothing matches.
    pub fn disconnect(&mut self, address: &str) {
        let ids: Vec<EndpointId> = self
            .endpoints
            .iter()
            .filter(|(_, e)| e.connected && e.endpoint.address() == address)
            .map(|(id, _)| *id)
            .collect();

        for id in ids {
            self.detach(id, true);
        }
    }

    /// Bind to `address`.
    ///
    /// # Errors
    ///
    /// - `Unsupported` for schemes without a built-in listener
    /// - `AddrInUse` if the inproc name is taken
    /// - `InvalidMessage` if the configured routing id cannot be sent
    pub fn bind(&mut self, address: &str) -> Result<()> {
        self.ensure_ready()?;
        let name = match parse_address(address)? {
            Address::Inproc(name) => name,
            other => {
                return Err(ZwireError::unsupported(format!(
                    "no built-in listener for {}://, use bind_listener()",
                    other.scheme()
                )))
            }
        };

        let listener = inproc::bind(&name, self.inproc_peer())?;
        self.listeners.push(listener);
        debug!("[{}] bound {}", P::SOCKET_TYPE, address);
        self.emit(SocketEvent::Bound(address.to_string()));
        Ok(())
    }

    /// Take ownership of a listener an external transport created. Its
    /// accepted endpoints must be posted through [`event_sender`](Self::event_sender).
    pub fn bind_listener(&mut self, listener: Arc<dyn Listener>) -> Result<()> {
        if let Err(err) = self.ensure_ready() {
            listener.close();
            return Err(err);
        }
        self.emit(SocketEvent::Bound(listener.address().to_string()));
        self.listeners.push(listener);
        Ok(())
    }

    /// Close the listener bound to `address`. No-op when nothing matches.
    pub fn unbind(&mut self, address: &str) {
        let (closing, kept): (Vec<_>, Vec<_>) = self
            .listeners
            .drain(..)
            .partition(|l| l.address() == address);
        self.listeners = kept;

        for listener in closing {
            listener.close();
            self.emit(SocketEvent::Unbound(address.to_string()));
        }
    }

    /// Send a message through the pattern.
    ///
    /// Accepts a single frame (`&str`, `String`, `Bytes`, byte arrays) or a
    /// list of frames.
    pub fn send(&mut self, payload: impl IntoFrames) -> Result<()> {
        self.ensure_open()?;
        let msg = payload.into_frames();
        if msg.is_empty() {
            return Err(ZwireError::InvalidMessage("message has no frames"));
        }
        let (pattern, mut cx) = self.context();
        pattern.on_send(&mut cx, msg)
    }

    /// Subscribe to `topic` (SUB / XSUB style sockets).
    pub fn subscribe(&mut self, topic: impl IntoFrame) -> Result<()> {
        self.ensure_open()?;
        let topic: Bytes = topic.into_frame();
        let (pattern, mut cx) = self.context();
        pattern.subscribe(&mut cx, topic)
    }

    /// Remove a subscription to `topic`.
    pub fn unsubscribe(&mut self, topic: impl IntoFrame) -> Result<()> {
        self.ensure_open()?;
        let topic: Bytes = topic.into_frame();
        let (pattern, mut cx) = self.context();
        pattern.unsubscribe(&mut cx, topic)
    }

    /// Dispatch every event queued so far. Returns how many were handled.
    pub fn process(&mut self) -> usize {
        let mut handled = 0;
        while !self.closed {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    self.dispatch(event);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Next surfaced message, dispatching queued events as needed. Never
    /// waits.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        loop {
            if let Some(delivery) = self.inbox.pop_front() {
                return Some(delivery);
            }
            if self.closed {
                return None;
            }
            match self.events_rx.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(_) => return None,
            }
        }
    }

    /// Wait for the next surfaced message.
    ///
    /// # Errors
    ///
    /// `SocketClosed` once the socket is closed.
    pub async fn recv(&mut self) -> Result<Delivery> {
        loop {
            if let Some(delivery) = self.try_recv() {
                return Ok(delivery);
            }
            self.ensure_open()?;
            let event = self
                .events_rx
                .recv_async()
                .await
                .map_err(|_| ZwireError::SocketClosed)?;
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: EndpointEvent) {
        trace!("[{}] event {:?}", P::SOCKET_TYPE, event);
        match event {
            EndpointEvent::Attach(endpoint) => self.on_attach_event(endpoint),
            EndpointEvent::Terminated(id) => self.detach(id, false),
            EndpointEvent::Hiccuped(id) => {
                let Some(entry) = self.endpoints.get(&id) else {
                    return;
                };
                if !entry.attached {
                    return;
                }
                let address = entry.endpoint.address().to_string();
                if self.options.immediate {
                    debug!("[{}] {} hiccuped, terminating (immediate)", P::SOCKET_TYPE, id);
                    self.detach(id, true);
                } else {
                    self.emit(SocketEvent::Hiccuped(address));
                    let (pattern, mut cx) = self.context();
                    pattern.on_hiccup(&mut cx, id);
                }
            }
            EndpointEvent::Message(delivery) => {
                if self
                    .endpoints
                    .get(&delivery.source)
                    .is_some_and(|e| e.attached)
                {
                    let (pattern, mut cx) = self.context();
                    pattern.on_receive(&mut cx, delivery);
                } else {
                    trace!(
                        "[{}] dropping message from unattached {}",
                        P::SOCKET_TYPE,
                        delivery.source
                    );
                }
            }
            EndpointEvent::Resume => {
                let (pattern, mut cx) = self.context();
                pattern.on_resume(&mut cx);
            }
        }
    }

    fn on_attach_event(&mut self, endpoint: EndpointRef) {
        if self.closed {
            endpoint.close();
            return;
        }
        let id = endpoint.id();
        match self.endpoints.get_mut(&id) {
            Some(entry) if entry.attached => return,
            Some(entry) => entry.attached = true,
            None => {
                self.emit(SocketEvent::Accepted(endpoint.address().to_string()));
                self.endpoints.insert(
                    id,
                    Attached {
                        endpoint: Arc::clone(&endpoint),
                        connected: false,
                        attached: true,
                    },
                );
            }
        }
        let (pattern, mut cx) = self.context();
        pattern.on_attach(&mut cx, endpoint);
    }

    /// Forget `id`, telling the pattern if it had seen the endpoint.
    fn detach(&mut self, id: EndpointId, close: bool) {
        let Some(entry) = self.endpoints.remove(&id) else {
            return;
        };
        if close {
            entry.endpoint.close();
        }
        self.emit(SocketEvent::Disconnected(entry.endpoint.address().to_string()));
        if entry.attached {
            let (pattern, mut cx) = self.context();
            pattern.on_terminated(&mut cx, id);
        }
    }

    /// Close every listener and endpoint. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        debug!("[{}] closing", P::SOCKET_TYPE);

        for listener in self.listeners.drain(..) {
            listener.close();
        }

        let entries: Vec<(EndpointId, Attached)> = self.endpoints.drain().collect();
        for (id, entry) in entries {
            entry.endpoint.close();
            if entry.attached {
                let (pattern, mut cx) = self.context();
                pattern.on_terminated(&mut cx, id);
            }
        }

        // Nothing queued may outlive the socket: refuse pending accepts and
        // discard deferred work.
        while let Ok(event) = self.events_rx.try_recv() {
            if let EndpointEvent::Attach(endpoint) = event {
                endpoint.close();
            }
        }
        self.inbox.clear();
        self.emit(SocketEvent::Closed);
    }
}

impl<P: Pattern> Drop for Socket<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: Pattern> fmt::Debug for Socket<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("type", &P::SOCKET_TYPE)
            .field("endpoints", &self.endpoints.len())
            .field("listeners", &self.listeners.len())
            .field("closed", &self.closed)
            .finish()
    }
}

/// Parse an address, reporting unknown schemes as unsupported operations.
fn parse_address(address: &str) -> Result<Address> {
    Address::parse(address).map_err(|e| match e {
        AddressError::UnknownScheme(_) => ZwireError::unsupported(e.to_string()),
        other => other.into(),
    })
}
