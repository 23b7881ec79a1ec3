//! Tracing setup for demos, benches and tests.

/// Initialize a tracing subscriber when `RUST_LOG` is set.
///
/// Call `zwire::dev_tracing::init_tracing()` first thing in a demo or test
/// to see the `[ROUTER]`, `[INPROC]` ... logs. This is a no-op when
/// `RUST_LOG` is not set or when a global subscriber is already installed.
pub fn init_tracing() {
    use std::env;

    if env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_target(false)
            .try_init();
    }
}
