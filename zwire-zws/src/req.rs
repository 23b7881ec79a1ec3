//! REQ pattern: strict request/reply on top of DEALER.
//!
//! Each request is prefixed with an empty delimiter frame and load-balanced
//! like a DEALER send. Until the matching reply arrives, a second `send`
//! fails with `StateViolation` and leaves the socket untouched.

use bytes::Bytes;
use tracing::trace;

use crate::dealer::Dealer;
use crate::socket_trait::{Context, Pattern};
use zwire_core::endpoint::{EndpointId, EndpointRef};
use zwire_core::error::{Result, ZwireError};
use zwire_core::message::{Delivery, Msg};
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Req {
    inner: Dealer,
    receiving_reply: bool,
}

impl Req {
    /// True while a request is waiting for its reply.
    pub fn awaiting_reply(&self) -> bool {
        self.receiving_reply
    }
}

impl Pattern for Req {
    const SOCKET_TYPE: SocketType = SocketType::Req;

    fn on_attach(&mut self, _cx: &mut Context<'_>, endpoint: EndpointRef) {
        self.inner.attach(endpoint);
    }

    fn on_terminated(&mut self, _cx: &mut Context<'_>, id: EndpointId) {
        self.inner.terminated(id);
    }

    fn on_hiccup(&mut self, _cx: &mut Context<'_>, _id: EndpointId) {
        self.inner.flush();
    }

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        if !self.receiving_reply {
            trace!("[REQ] unexpected message from {}, dropping", delivery.source);
            return;
        }

        let Delivery { source, mut frames } = delivery;
        if frames.len() < 2 || !frames[0].is_empty() {
            trace!("[REQ] malformed reply envelope from {}, dropping", source);
            return;
        }
        frames.remove(0);
        self.receiving_reply = false;
        cx.deliver(Delivery::new(source, frames));
    }

    fn on_send(&mut self, _cx: &mut Context<'_>, mut msg: Msg) -> Result<()> {
        if self.receiving_reply {
            return Err(ZwireError::StateViolation(
                "cannot send another request before receiving the reply",
            ));
        }
        msg.insert(0, Bytes::new());
        self.inner.enqueue(msg);
        self.receiving_reply = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{frames, inject};
    use crate::ReqSocket;
    use zwire_core::endpoint::Endpoint;
    use zwire_core::error::ZwireError;
    use zwire_core::testing::MockEndpoint;

    #[test]
    fn request_gets_delimiter() {
        let mut sock = ReqSocket::new();
        let peer = MockEndpoint::new();
        sock.adopt(peer.clone()).unwrap();

        sock.send("Hello").unwrap();
        assert_eq!(peer.sent(), vec![frames(&[b"", b"Hello"])]);
    }

    #[test]
    fn second_send_is_a_state_violation() {
        let mut sock = ReqSocket::new();
        let peer = MockEndpoint::new();
        sock.adopt(peer.clone()).unwrap();

        assert!(!sock.pattern().awaiting_reply());
        sock.send("one").unwrap();
        assert!(sock.pattern().awaiting_reply());
        assert!(matches!(
            sock.send("two"),
            Err(ZwireError::StateViolation(_))
        ));
        assert_eq!(peer.sent().len(), 1);

        inject(&sock, peer.id(), &[b"", b"reply"]);
        assert_eq!(sock.try_recv().unwrap().frames, frames(&[b"reply"]));
        assert!(!sock.pattern().awaiting_reply());
        sock.send("two").unwrap();
        assert_eq!(peer.sent().len(), 2);
    }

    #[test]
    fn malformed_replies_are_skipped() {
        let mut sock = ReqSocket::new();
        let peer = MockEndpoint::new();
        sock.adopt(peer.clone()).unwrap();
        sock.send("q").unwrap();

        inject(&sock, peer.id(), &[b"no-delimiter", b"x"]);
        inject(&sock, peer.id(), &[b""]);
        sock.process();
        assert!(sock.pattern().awaiting_reply());

        inject(&sock, peer.id(), &[b"", b"answer"]);
        inject(&sock, peer.id(), &[b"", b"late duplicate"]);

        assert_eq!(sock.try_recv().unwrap().frames, frames(&[b"answer"]));
        assert!(sock.try_recv().is_none());
    }

    #[test]
    fn unsolicited_message_is_dropped() {
        let mut sock = ReqSocket::new();
        let peer = MockEndpoint::new();
        sock.adopt(peer.clone()).unwrap();

        inject(&sock, peer.id(), &[b"", b"surprise"]);
        assert!(sock.try_recv().is_none());
    }
}
