//! REQ/REP over `inproc://` with the server on its own thread.
//!
//! Run this example:
//! ```bash
//! RUST_LOG=debug cargo run -p zwire --features zws --example req_rep_inproc
//! ```

use std::thread;
use tracing::info;
use zwire::zws::{RepSocket, ReqSocket};

const REQUESTS: usize = 5;

fn main() -> zwire::Result<()> {
    zwire::dev_tracing::init_tracing();
    info!("=== zwire REQ <-> REP over inproc ===");

    let mut server = RepSocket::new();
    server.bind("inproc://echo")?;

    let server_handle = thread::spawn(move || {
        compio::runtime::Runtime::new()
            .expect("runtime")
            .block_on(async move {
                for _ in 0..REQUESTS {
                    let request = server.recv().await?;
                    info!("[REP] Received {:?}", String::from_utf8_lossy(&request.frames[0]));

                    let mut reply = b"echo: ".to_vec();
                    reply.extend_from_slice(&request.frames[0]);
                    server.send(vec![reply])?;
                }
                info!("[REP] Done");
                zwire::Result::Ok(())
            })
    });

    let mut client = ReqSocket::new();
    client.connect("inproc://echo")?;

    compio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(async {
            for i in 0..REQUESTS {
                client.send(format!("request #{i}"))?;
                let reply = client.recv().await?;
                info!("[REQ] Reply {:?}", String::from_utf8_lossy(&reply.frames[0]));
            }
            zwire::Result::Ok(())
        })?;

    server_handle.join().expect("server thread")?;
    Ok(())
}
