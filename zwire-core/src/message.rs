//! Messages, frame conversions and the tagged delivery type.
//!
//! A message is an ordered, non-empty list of frames. The public `send`
//! entry points accept anything implementing [`IntoFrames`], so callers can
//! pass a string, raw bytes, a list of either, or a built [`Message`].

use crate::endpoint::EndpointId;
use bytes::Bytes;

/// Canonical multipart message: one `Bytes` per frame.
pub type Msg = Vec<Bytes>;

/// A message tagged with the endpoint it arrived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Endpoint that delivered the frames.
    pub source: EndpointId,
    /// Frames in arrival order.
    pub frames: Msg,
}

impl Delivery {
    /// Create a delivery.
    #[must_use]
    pub const fn new(source: EndpointId, frames: Msg) -> Self {
        Self { source, frames }
    }

    /// Consume the delivery and keep only the frames.
    #[must_use]
    pub fn into_frames(self) -> Msg {
        self.frames
    }
}

/// A multipart message builder with ergonomic frame construction.
///
/// # Examples
///
/// ```
/// use zwire_core::message::Message;
///
/// // ROUTER envelope: [identity, empty, body]
/// let msg = Message::new()
///     .push(&b"client-123"[..])
///     .push_empty()
///     .push_str("Hello")
///     .into_frames();
/// assert_eq!(msg.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    frames: Vec<Bytes>,
}

impl Message {
    /// Create a new empty message.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Create a message with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Create a message from existing frames.
    #[must_use]
    pub const fn from_frames(frames: Vec<Bytes>) -> Self {
        Self { frames }
    }

    /// Add a frame from any type that can be converted to `Bytes`.
    #[must_use]
    pub fn push(mut self, frame: impl Into<Bytes>) -> Self {
        self.frames.push(frame.into());
        self
    }

    /// Add a string frame (UTF-8 encoded).
    #[must_use]
    pub fn push_str(mut self, s: &str) -> Self {
        self.frames.push(Bytes::copy_from_slice(s.as_bytes()));
        self
    }

    /// Add an empty frame.
    ///
    /// Empty frames are the delimiter in request/reply envelopes.
    #[must_use]
    pub fn push_empty(mut self) -> Self {
        self.frames.push(Bytes::new());
        self
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the message has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the frames as a slice.
    #[must_use]
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }

    /// Consume the builder and return the frames.
    #[must_use]
    pub fn into_frames(self) -> Msg {
        self.frames
    }
}

impl From<Message> for Msg {
    fn from(msg: Message) -> Self {
        msg.frames
    }
}

/// Conversion of one value into a single frame.
pub trait IntoFrame {
    /// Convert into frame bytes.
    fn into_frame(self) -> Bytes;
}

impl IntoFrame for Bytes {
    fn into_frame(self) -> Bytes {
        self
    }
}

impl IntoFrame for &Bytes {
    fn into_frame(self) -> Bytes {
        self.clone()
    }
}

impl IntoFrame for &str {
    fn into_frame(self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl IntoFrame for String {
    fn into_frame(self) -> Bytes {
        Bytes::from(self)
    }
}

impl IntoFrame for &[u8] {
    fn into_frame(self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl<const N: usize> IntoFrame for &[u8; N] {
    fn into_frame(self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl IntoFrame for Vec<u8> {
    fn into_frame(self) -> Bytes {
        Bytes::from(self)
    }
}

/// Conversion of a single frame or a list of frames into a [`Msg`].
pub trait IntoFrames {
    /// Convert into canonical frames.
    fn into_frames(self) -> Msg;
}

impl IntoFrames for Message {
    fn into_frames(self) -> Msg {
        self.frames
    }
}

impl IntoFrames for Bytes {
    fn into_frames(self) -> Msg {
        vec![self]
    }
}

impl IntoFrames for &str {
    fn into_frames(self) -> Msg {
        vec![self.into_frame()]
    }
}

impl IntoFrames for String {
    fn into_frames(self) -> Msg {
        vec![self.into_frame()]
    }
}

impl<const N: usize> IntoFrames for &[u8; N] {
    fn into_frames(self) -> Msg {
        vec![self.into_frame()]
    }
}

impl<T: IntoFrame> IntoFrames for Vec<T> {
    fn into_frames(self) -> Msg {
        self.into_iter().map(IntoFrame::into_frame).collect()
    }
}

impl<T: IntoFrame, const N: usize> IntoFrames for [T; N] {
    fn into_frames(self) -> Msg {
        self.into_iter().map(IntoFrame::into_frame).collect()
    }
}
