//! Integration tests for the Message builder and frame coercion

use bytes::Bytes;
use zwire_core::message::{IntoFrames, Message};

#[test]
fn test_message_builder_basic() {
    let msg = Message::new()
        .push_str("topic")
        .push_str("Hello")
        .push(Vec::from(&b"World"[..]));

    assert_eq!(msg.len(), 3);

    let frames = msg.into_frames();
    assert_eq!(frames[0], Bytes::from_static(b"topic"));
    assert_eq!(frames[1], Bytes::from_static(b"Hello"));
    assert_eq!(frames[2], Bytes::from_static(b"World"));
}

#[test]
fn test_message_builder_envelope() {
    let msg = Message::new()
        .push(Vec::from(&b"identity"[..]))
        .push_empty()
        .push_str("body");

    let frames = msg.into_frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], Bytes::from_static(b"identity"));
    assert!(frames[1].is_empty());
    assert_eq!(frames[2], Bytes::from_static(b"body"));
}

#[test]
fn test_message_builder_capacity() {
    let msg = Message::with_capacity(10);
    assert_eq!(msg.len(), 0);
    assert!(msg.is_empty()); // Pre-allocated capacity but no frames yet

    let msg = msg.push_str("frame1").push_str("frame2");

    assert_eq!(msg.len(), 2);
}

#[test]
fn test_message_builder_from_frames() {
    let frames = vec![
        Bytes::from_static(b"a"),
        Bytes::from_static(b"b"),
        Bytes::from_static(b"c"),
    ];

    let msg = Message::from_frames(frames.clone());
    assert_eq!(msg.len(), 3);
    assert_eq!(msg.frames(), &frames[..]);
}

#[test]
fn test_text_and_binary_frames_normalize_identically() {
    let text = vec!["abc", "def"].into_frames();
    let binary = vec![&b"abc"[..], &b"def"[..]].into_frames();
    let owned = vec![String::from("abc"), String::from("def")].into_frames();

    assert_eq!(text, binary);
    assert_eq!(text, owned);
}

#[test]
fn test_builder_is_into_frames() {
    fn frames_of(payload: impl IntoFrames) -> usize {
        payload.into_frames().len()
    }

    assert_eq!(frames_of(Message::new().push_str("a").push_empty()), 2);
    assert_eq!(frames_of("single"), 1);
    assert_eq!(frames_of([Bytes::new(), Bytes::from_static(b"x")]), 2);
}
