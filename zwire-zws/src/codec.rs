//! ZWS framing.
//!
//! A WebSocket binary message carries exactly one frame: a one-byte flag
//! followed by the payload. Flag `1` means more frames follow; any other
//! value ends the message. An N-frame message is N segments.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use zwire_core::error::ZwireError;
use zwire_core::message::Msg;

const MORE: u8 = 0x01;
const LAST: u8 = 0x00;

/// ZWS protocol errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Protocol violation: empty segment")]
    EmptySegment,
}

impl From<CodecError> for ZwireError {
    fn from(err: CodecError) -> Self {
        ZwireError::protocol(err.to_string())
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// A decoded ZWS frame
#[derive(Debug, Clone)]
pub struct ZwsFrame {
    pub more: bool,
    pub payload: Bytes,
}

impl ZwsFrame {
    /// Parse one wire segment (zero-copy).
    pub fn parse(segment: &Bytes) -> Result<Self> {
        let flag = *segment.first().ok_or(CodecError::EmptySegment)?;
        Ok(Self {
            more: flag == MORE,
            payload: segment.slice(1..),
        })
    }

    /// Encode this frame as one wire segment
    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(1 + self.payload.len());
        out.put_u8(if self.more { MORE } else { LAST });
        out.extend_from_slice(&self.payload);
        out.freeze()
    }
}

/// Encode a message as wire segments, one per frame.
pub fn encode(msg: &Msg) -> Vec<Bytes> {
    let last = msg.len().saturating_sub(1);
    msg.iter()
        .enumerate()
        .map(|(i, payload)| {
            ZwsFrame {
                more: i < last,
                payload: payload.clone(),
            }
            .encode()
        })
        .collect()
}

/// Collects ZWS segments until a complete message is formed.
///
/// Invariants:
/// - Frames are appended in-order
/// - A message completes on the first frame without the MORE flag
///
/// Owned by a single connection's read side.
#[derive(Debug, Default)]
pub struct ZwsDecoder {
    frames: Vec<Bytes>,
}

impl ZwsDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one segment.
    ///
    /// Returns:
    /// - Ok(Some(msg)) → message complete
    /// - Ok(None) → waiting for more frames
    /// - Err → protocol violation; the partial message is discarded
    pub fn decode(&mut self, segment: &Bytes) -> Result<Option<Msg>> {
        let frame = match ZwsFrame::parse(segment) {
            Ok(frame) => frame,
            Err(e) => {
                self.frames.clear();
                return Err(e);
            }
        };

        self.frames.push(frame.payload);
        if frame.more {
            Ok(None)
        } else {
            Ok(Some(std::mem::take(&mut self.frames)))
        }
    }

    /// True while a multi-frame message is half received.
    #[inline]
    pub fn is_partial(&self) -> bool {
        !self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_sets_more_on_all_but_last() {
        let msg = vec![
            Bytes::from_static(b"a"),
            Bytes::new(),
            Bytes::from_static(b"bc"),
        ];
        let segments = encode(&msg);
        assert_eq!(
            segments,
            vec![
                Bytes::from_static(b"\x01a"),
                Bytes::from_static(b"\x01"),
                Bytes::from_static(b"\x00bc"),
            ]
        );
    }

    #[test]
    fn decoder_assembles_message() {
        let mut dec = ZwsDecoder::new();
        assert_eq!(dec.decode(&Bytes::from_static(b"\x01id")).unwrap(), None);
        assert!(dec.is_partial());
        assert_eq!(dec.decode(&Bytes::from_static(b"\x01")).unwrap(), None);
        let msg = dec.decode(&Bytes::from_static(b"\x00body")).unwrap().unwrap();
        assert_eq!(
            msg,
            vec![
                Bytes::from_static(b"id"),
                Bytes::new(),
                Bytes::from_static(b"body")
            ]
        );
        assert!(!dec.is_partial());
    }

    #[test]
    fn any_flag_other_than_one_ends_message() {
        let mut dec = ZwsDecoder::new();
        let msg = dec.decode(&Bytes::from_static(b"\x07x")).unwrap();
        assert_eq!(msg, Some(vec![Bytes::from_static(b"x")]));
    }

    #[test]
    fn empty_segment_is_protocol_error() {
        let mut dec = ZwsDecoder::new();
        dec.decode(&Bytes::from_static(b"\x01partial")).unwrap();
        assert_eq!(dec.decode(&Bytes::new()), Err(CodecError::EmptySegment));
        assert!(!dec.is_partial());

        let err: ZwireError = CodecError::EmptySegment.into();
        assert!(matches!(err, ZwireError::Protocol(_)));
    }
}
