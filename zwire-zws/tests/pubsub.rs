//! Integration tests for PUB/SUB and XPUB/XSUB sockets
//!
//! Tests cover:
//! - Prefix matching, including the empty subscription
//! - Unsubscribe stopping delivery
//! - XPUB subscription notices with and without `xpub_verbose`
//! - Subscription replay from XSUB to a late publisher

use zwire_core::options::SocketOptions;
use zwire_zws::{PubSocket, SubSocket, XPubSocket, XSubSocket};

const TOPICS: [&str; 6] = ["", "a", "ab", "abc", "b", "ba"];

/// A topic reaches a subscriber iff the subscription is a prefix of it
#[test]
fn test_prefix_matching_property() {
    for (n, sub_topic) in TOPICS.iter().enumerate() {
        let address = format!("inproc://pubsub-prefix-{n}");
        let mut publisher = PubSocket::new();
        publisher.bind(&address).unwrap();

        let mut subscriber = SubSocket::new();
        subscriber.connect(&address).unwrap();
        subscriber.subscribe(*sub_topic).unwrap();
        publisher.process();

        for topic in TOPICS {
            publisher.send([topic, "payload"]).unwrap();
            let got = subscriber.try_recv();
            assert_eq!(
                got.is_some(),
                topic.starts_with(sub_topic),
                "subscription {sub_topic:?}, topic {topic:?}"
            );
        }

        subscriber.unsubscribe(*sub_topic).unwrap();
        publisher.process();
        publisher.send(["abc", "payload"]).unwrap();
        assert!(subscriber.try_recv().is_none());
    }
}

/// Two subscribers to one topic give one notice, or two when verbose
#[test]
fn test_xpub_dedup_and_verbose() {
    for (verbose, expected) in [(false, 1), (true, 2)] {
        let address = format!("inproc://pubsub-verbose-{verbose}");
        let mut xpub = XPubSocket::with_options(SocketOptions::new().with_xpub_verbose(verbose));
        xpub.bind(&address).unwrap();

        let mut s1 = SubSocket::new();
        let mut s2 = SubSocket::new();
        s1.connect(&address).unwrap();
        s2.connect(&address).unwrap();
        s1.subscribe("news").unwrap();
        s2.subscribe("news").unwrap();

        let notices: Vec<_> = std::iter::from_fn(|| xpub.try_recv()).collect();
        assert_eq!(notices.len(), expected);
        assert!(notices.iter().all(|n| n.frames == vec!["\x01news"]));
    }
}

/// The unsubscribe notice appears only once the last subscriber leaves
#[test]
fn test_xpub_last_unsubscribe() {
    let mut xpub = XPubSocket::new();
    xpub.bind("inproc://pubsub-last").unwrap();

    let mut s1 = SubSocket::new();
    let mut s2 = SubSocket::new();
    s1.connect("inproc://pubsub-last").unwrap();
    s2.connect("inproc://pubsub-last").unwrap();
    s1.subscribe("t").unwrap();
    s2.subscribe("t").unwrap();
    assert_eq!(xpub.try_recv().unwrap().frames, vec!["\x01t"]);

    s1.unsubscribe("t").unwrap();
    assert!(xpub.try_recv().is_none());

    s2.unsubscribe("t").unwrap();
    assert_eq!(xpub.try_recv().unwrap().frames, vec!["\x00t"]);
}

/// A subscriber disconnecting surfaces `0x00 + prefix` for its orphaned prefixes
#[test]
fn test_xpub_notices_disconnect() {
    let mut xpub = XPubSocket::new();
    xpub.bind("inproc://pubsub-gone").unwrap();

    let mut sub = SubSocket::new();
    sub.connect("inproc://pubsub-gone").unwrap();
    sub.subscribe("gone").unwrap();
    assert_eq!(xpub.try_recv().unwrap().frames, vec!["\x01gone"]);

    sub.disconnect("inproc://pubsub-gone");
    assert_eq!(xpub.try_recv().unwrap().frames, vec!["\x00gone"]);
}

/// XSUB replays its subscriptions to a publisher it connects to later
#[test]
fn test_xsub_replays_on_connect() {
    let mut xsub = XSubSocket::new();
    xsub.send(b"\x01late").unwrap();

    let mut publisher = PubSocket::new();
    publisher.bind("inproc://pubsub-replay").unwrap();
    xsub.connect("inproc://pubsub-replay").unwrap();
    publisher.process();

    publisher.send("late.news").unwrap();
    publisher.send("other").unwrap();
    assert_eq!(xsub.try_recv().unwrap().frames, vec!["late.news"]);
    assert!(xsub.try_recv().is_none());
}

/// XPUB/XSUB forward data both ways
#[test]
fn test_xsub_upstream_data_reaches_xpub() {
    let mut xpub = XPubSocket::new();
    xpub.bind("inproc://pubsub-upstream").unwrap();
    let mut xsub = XSubSocket::new();
    xsub.connect("inproc://pubsub-upstream").unwrap();

    xsub.send("ping").unwrap();
    assert_eq!(xpub.try_recv().unwrap().frames, vec!["ping"]);
}
