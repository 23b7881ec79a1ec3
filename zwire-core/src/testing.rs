//! Test helpers shared by the workspace's test suites.
//!
//! Enabled for this crate's own tests and, for downstream crates, through
//! the `test-util` feature.

use crate::endpoint::{Endpoint, EndpointId};
use crate::message::Msg;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Endpoint that records every accepted message.
///
/// `set_accepting(false)` simulates back-pressure: `send` returns false and
/// nothing is recorded.
pub struct MockEndpoint {
    id: EndpointId,
    address: String,
    accepting: AtomicBool,
    closed: AtomicBool,
    sent: Mutex<Vec<Msg>>,
}

impl MockEndpoint {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_address("mock://")
    }

    #[must_use]
    pub fn with_address(address: &str) -> Arc<Self> {
        Arc::new(Self {
            id: EndpointId::next(),
            address: address.to_string(),
            accepting: AtomicBool::new(true),
            closed: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Msg> {
        self.sent.lock().clone()
    }

    /// Drain the recorded messages.
    #[must_use]
    pub fn take_sent(&self) -> Vec<Msg> {
        std::mem::take(&mut *self.sent.lock())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Endpoint for MockEndpoint {
    fn id(&self) -> EndpointId {
        self.id
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn send(&self, msg: &Msg) -> bool {
        if self.closed.load(Ordering::SeqCst) || !self.accepting.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().push(msg.clone());
        true
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
