//! Integration tests for PUSH/PULL and PAIR sockets

use zwire_core::error::ZwireError;
use zwire_core::options::SocketOptions;
use zwire_zws::{PairSocket, PullSocket, PushSocket};

/// Workers pulling from one PUSH share the jobs evenly
#[test]
fn test_push_fans_out_to_workers() {
    let mut push = PushSocket::new();
    push.bind("inproc://pipeline-fanout").unwrap();

    let mut workers: Vec<PullSocket> = (0..3)
        .map(|_| {
            let mut pull = PullSocket::new();
            pull.connect("inproc://pipeline-fanout").unwrap();
            pull
        })
        .collect();
    push.process();

    for i in 0..9 {
        push.send(format!("task-{i}")).unwrap();
    }

    for worker in &mut workers {
        let got: Vec<_> = std::iter::from_fn(|| worker.try_recv()).collect();
        assert_eq!(got.len(), 3);
    }
}

/// Messages sent before any worker exists are delivered in order later
#[test]
fn test_push_queues_until_worker_attaches() {
    let mut push = PushSocket::new();
    push.bind("inproc://pipeline-late").unwrap();
    push.send("first").unwrap();
    push.send("second").unwrap();

    let mut pull = PullSocket::new();
    pull.connect("inproc://pipeline-late").unwrap();
    push.process();

    assert_eq!(pull.try_recv().unwrap().frames, vec!["first"]);
    assert_eq!(pull.try_recv().unwrap().frames, vec!["second"]);
}

/// Pull fans in from several pushers
#[test]
fn test_pull_fans_in() {
    let mut pull = PullSocket::new();
    pull.bind("inproc://pipeline-fanin").unwrap();

    let mut a = PushSocket::new();
    let mut b = PushSocket::new();
    a.connect("inproc://pipeline-fanin").unwrap();
    b.connect("inproc://pipeline-fanin").unwrap();
    a.send("from a").unwrap();
    b.send("from b").unwrap();

    let got: Vec<_> = std::iter::from_fn(|| pull.try_recv()).collect();
    assert_eq!(got.len(), 2);
}

/// Send HWM turns into queueing rather than loss
#[test]
fn test_send_hwm_queues_instead_of_dropping() {
    let mut pull = PullSocket::new();
    pull.bind("inproc://pipeline-hwm").unwrap();

    let mut push = PushSocket::with_options(SocketOptions::new().with_send_hwm(4));
    push.connect("inproc://pipeline-hwm").unwrap();
    for i in 0..10 {
        push.send(format!("{i}")).unwrap();
    }
    assert!(push.pattern().pending() > 0);

    let mut received = Vec::new();
    while received.len() < 10 {
        while let Some(msg) = pull.try_recv() {
            received.push(msg.frames[0].clone());
        }
        // Retry the backlog now that the puller drained its queue.
        push.send(format!("{}", 10 + received.len())).unwrap();
    }
    for (i, frame) in received.iter().take(10).enumerate() {
        assert_eq!(frame, &format!("{i}"));
    }
}

/// PAIR accepts one peer and rejects the second
#[test]
fn test_pair_is_exclusive() {
    let mut server = PairSocket::new();
    server.bind("inproc://pipeline-pair").unwrap();

    let mut first = PairSocket::new();
    let mut second = PairSocket::new();
    first.connect("inproc://pipeline-pair").unwrap();
    second.connect("inproc://pipeline-pair").unwrap();

    first.send("hello").unwrap();
    second.send("intruder").unwrap();

    let got: Vec<_> = std::iter::from_fn(|| server.try_recv()).collect();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].frames, vec!["hello"]);

    server.send("back").unwrap();
    assert_eq!(first.try_recv().unwrap().frames, vec!["back"]);
    assert!(second.try_recv().is_none());
    assert_eq!(second.endpoint_count(), 0);
}

/// Incompatible socket types refuse to connect
#[test]
fn test_incompatible_types() {
    let mut pull = PullSocket::new();
    pull.bind("inproc://pipeline-incompatible").unwrap();

    let mut pair = PairSocket::new();
    assert!(matches!(
        pair.connect("inproc://pipeline-incompatible"),
        Err(ZwireError::Incompatible { .. })
    ));
}

/// With `immediate`, a connection is only used once its attach is processed
#[test]
fn test_immediate_attaches_on_dispatch() {
    let mut pull = PullSocket::new();
    pull.bind("inproc://pipeline-immediate").unwrap();

    let mut push = PushSocket::with_options(SocketOptions::new().with_immediate(true));
    push.connect("inproc://pipeline-immediate").unwrap();
    push.send("queued").unwrap();
    assert_eq!(push.pattern().pending(), 1);

    push.process();
    assert_eq!(push.pattern().pending(), 0);
    assert_eq!(pull.try_recv().unwrap().frames, vec!["queued"]);
}
