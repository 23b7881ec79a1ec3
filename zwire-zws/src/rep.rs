//! REP pattern: one request at a time on top of ROUTER.
//!
//! A request's envelope (every frame up to the empty delimiter, routing key
//! included) is saved and the body surfaced. The reply is sent back with
//! that envelope. Requests arriving mid-reply wait in a FIFO; after a reply
//! the next one is picked up through a deferred `Resume` event, never from
//! inside `send`.

use bytes::Bytes;
use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::router::Router;
use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{EndpointId, EndpointRef};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::{Delivery, Msg};
use zwire_core::options::SocketOptions;
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Rep {
    inner: Router,
    envelope: Vec<Bytes>,
    pending: VecDeque<Delivery>,
    sending_reply: bool,
    resume_scheduled: bool,
}

impl Rep {
    /// True between surfacing a request and sending its reply.
    pub fn sending_reply(&self) -> bool {
        self.sending_reply
    }

    /// Requests queued behind the current one.
    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// Split `request` at the delimiter and surface the body. Returns false
    /// for a request without a delimiter.
    fn start(&mut self, cx: &mut Context<'_>, request: Delivery) -> bool {
        let Delivery { source, mut frames } = request;
        let Some(delimiter) = frames.iter().position(Bytes::is_empty) else {
            trace!("[REP] request from {} has no delimiter, dropping", source);
            return false;
        };

        let body = frames.split_off(delimiter + 1);
        frames.pop();
        self.envelope = frames;
        self.sending_reply = true;
        cx.deliver(Delivery::new(source, body));
        true
    }
}

impl Pattern for Rep {
    const SOCKET_TYPE: SocketType = SocketType::Rep;

    fn adjust_options(options: &mut SocketOptions) {
        Router::adjust_options(options);
    }

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.inner.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.inner.terminated(id);
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        let handover = cx.options().router_handover;
        let Some(request) = self.inner.accept(delivery, handover) else {
            return;
        };

        if self.sending_reply || self.resume_scheduled || !self.pending.is_empty() {
            trace!("[REP] queueing request from {}", request.source);
            self.pending.push_back(request);
            return;
        }
        self.start(cx, request);
    }

    fn on_send(&mut self, cx: &mut Context<'_>, msg: Msg) -> Result<()> {
        if !self.sending_reply {
            return Err(ZwireError::StateViolation(
                "cannot send a reply without a pending request",
            ));
        }

        let mut reply = std::mem::take(&mut self.envelope);
        reply.reserve(msg.len() + 1);
        reply.push(Bytes::new());
        reply.extend(msg);
        if !self.inner.route(&reply) {
            debug!("[REP] requester is gone, reply dropped");
        }
        self.sending_reply = false;

        if !self.pending.is_empty() && !self.resume_scheduled {
            self.resume_scheduled = true;
            cx.defer();
        }
        Ok(())
    }

    fn on_resume(&mut self, cx: &mut Context<'_>) {
        self.resume_scheduled = false;
        while let Some(request) = self.pending.pop_front() {
            if self.start(cx, request) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{frames, inject};
    use crate::RepSocket;
    use zwire_core::endpoint::Endpoint;
    use zwire_core::error::ZwireError;
    use zwire_core::testing::MockEndpoint;

    #[test]
    fn reply_carries_the_envelope() {
        let mut sock = RepSocket::new();
        let peer = MockEndpoint::new();
        sock.adopt(peer.clone()).unwrap();

        inject(&sock, peer.id(), &[b""]);
        inject(&sock, peer.id(), &[b"hop", b"", b"Hello"]);

        let request = sock.try_recv().unwrap();
        assert_eq!(request.frames, frames(&[b"Hello"]));
        sock.send("World").unwrap();

        // The routing key is consumed by the ROUTER layer; the rest of the
        // envelope goes back to the peer.
        assert_eq!(peer.sent(), vec![frames(&[b"hop", b"", b"World"])]);
    }

    #[test]
    fn send_without_request_is_a_state_violation() {
        let mut sock = RepSocket::new();
        assert!(matches!(
            sock.send("orphan"),
            Err(ZwireError::StateViolation(_))
        ));
    }

    #[test]
    fn queued_requests_are_answered_in_order() {
        let mut sock = RepSocket::new();
        let a = MockEndpoint::new();
        let b = MockEndpoint::new();
        sock.adopt(a.clone()).unwrap();
        sock.adopt(b.clone()).unwrap();
        inject(&sock, a.id(), &[b"A"]);
        inject(&sock, b.id(), &[b"B"]);
        inject(&sock, a.id(), &[b"", b"from a"]);
        inject(&sock, b.id(), &[b"", b"from b"]);

        let first = sock.try_recv().unwrap();
        assert_eq!(first.frames, frames(&[b"from a"]));
        // The second request is already queued; it must not surface yet.
        assert!(sock.try_recv().is_none());

        sock.send("to a").unwrap();
        let second = sock.try_recv().unwrap();
        assert_eq!(second.frames, frames(&[b"from b"]));
        sock.send("to b").unwrap();

        assert_eq!(a.sent(), vec![frames(&[b"", b"to a"])]);
        assert_eq!(b.sent(), vec![frames(&[b"", b"to b"])]);
    }

    #[test]
    fn malformed_queued_request_does_not_stall() {
        let mut sock = RepSocket::new();
        let a = MockEndpoint::new();
        sock.adopt(a.clone()).unwrap();
        inject(&sock, a.id(), &[b""]);
        inject(&sock, a.id(), &[b"", b"ok"]);
        inject(&sock, a.id(), &[b"no delimiter"]);

        assert_eq!(sock.try_recv().unwrap().frames, frames(&[b"ok"]));
        assert!(sock.try_recv().is_none());
        sock.send("done").unwrap();

        // The deferred follow-up finds nothing valid and the socket is idle.
        assert!(sock.try_recv().is_none());
        assert!(matches!(
            sock.send("again"),
            Err(ZwireError::StateViolation(_))
        ));

        inject(&sock, a.id(), &[b"", b"next"]);
        assert_eq!(sock.try_recv().unwrap().frames, frames(&[b"next"]));
    }

    #[test]
    fn close_discards_deferred_work() {
        let mut sock = RepSocket::new();
        let a = MockEndpoint::new();
        sock.adopt(a.clone()).unwrap();
        inject(&sock, a.id(), &[b""]);
        inject(&sock, a.id(), &[b"", b"1"]);
        inject(&sock, a.id(), &[b"", b"2"]);

        assert!(sock.try_recv().is_some());
        assert!(sock.try_recv().is_none());
        sock.send("r1").unwrap();
        sock.close();

        assert!(sock.try_recv().is_none());
        assert_eq!(sock.process(), 0);
        assert!(a.is_closed());
    }
}
