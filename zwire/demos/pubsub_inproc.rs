//! PUB/SUB and XPUB subscription notices over `inproc://`.
//!
//! Run this example:
//! ```bash
//! RUST_LOG=debug cargo run -p zwire --features zws --example pubsub_inproc
//! ```

use bytes::Bytes;
use tracing::info;
use zwire::zws::{SubSocket, XPubSocket};
use zwire::SocketOptions;

fn main() -> zwire::Result<()> {
    zwire::dev_tracing::init_tracing();
    info!("=== zwire XPUB -> SUB over inproc ===");

    let mut publisher = XPubSocket::with_options(
        SocketOptions::new()
            .with_xpub_verbose(true)
            .with_xpub_welcome_msg(Bytes::from_static(b"welcome")),
    );
    let events = publisher.monitor();
    publisher.bind("inproc://ticker")?;

    let mut weather = SubSocket::new();
    weather.connect("inproc://ticker")?;
    weather.subscribe("weather.")?;
    weather.subscribe("welcome")?;

    let mut everything = SubSocket::new();
    everything.connect("inproc://ticker")?;
    everything.subscribe("")?;

    // Subscriptions reach the publisher as ordinary messages.
    while let Some(notice) = publisher.try_recv() {
        let frame = &notice.frames[0];
        let kind = if frame.first() == Some(&1) { "subscribe" } else { "unsubscribe" };
        info!("[XPUB] {} {:?}", kind, String::from_utf8_lossy(&frame[1..]));
    }

    for (topic, body) in [
        ("weather.paris", "sunny"),
        ("sports.rugby", "17-12"),
        ("weather.oslo", "snow"),
    ] {
        publisher.send([topic, body])?;
    }

    for (name, sub) in [("weather", &mut weather), ("everything", &mut everything)] {
        while let Some(msg) = sub.try_recv() {
            let parts: Vec<_> = msg.frames.iter().map(|f| String::from_utf8_lossy(f)).collect();
            info!("[SUB {}] {:?}", name, parts);
        }
    }

    weather.close();
    publisher.process();
    for event in events.try_iter() {
        info!("[MONITOR] {}", event);
    }
    Ok(())
}
