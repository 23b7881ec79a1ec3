//! PULL pattern: fair-queued fan-in. Every inbound message is surfaced;
//! sends are ignored.

use crate::socket_trait::{Context, Pattern};
use zwire_core::message::Delivery;
use zwire_core::socket_type::SocketType;

#[derive(Default)]
pub struct Pull;

impl Pattern for Pull {
    const SOCKET_TYPE: SocketType = SocketType::Pull;

    fn on_receive(&mut self, cx: &mut Context<'_>, delivery: Delivery) {
        cx.deliver(delivery);
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{frames, inject};
    use crate::PullSocket;
    use zwire_core::endpoint::Endpoint;
    use zwire_core::testing::MockEndpoint;

    #[test]
    fn surfaces_from_every_peer_in_arrival_order() {
        let mut sock = PullSocket::new();
        let a = MockEndpoint::new();
        let b = MockEndpoint::new();
        sock.adopt(a.clone()).unwrap();
        sock.adopt(b.clone()).unwrap();

        inject(&sock, a.id(), &[b"1"]);
        inject(&sock, b.id(), &[b"2"]);
        inject(&sock, a.id(), &[b"3"]);

        let got: Vec<_> = std::iter::from_fn(|| sock.try_recv()).collect();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].frames, frames(&[b"1"]));
        assert_eq!(got[1].source, b.id());
        assert_eq!(got[2].frames, frames(&[b"3"]));
    }

    #[test]
    fn send_is_ignored() {
        let mut sock = PullSocket::new();
        let a = MockEndpoint::new();
        sock.adopt(a.clone()).unwrap();
        sock.send("nope").unwrap();
        assert!(a.sent().is_empty());
    }
}
