#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use zwire_zws::codec::{encode, ZwsDecoder};

fuzz_target!(|data: &[u8]| {
    // First byte picks segment lengths, the rest is the segment stream.
    let Some((&stride, rest)) = data.split_first() else {
        return;
    };
    let stride = usize::from(stride % 32);

    let mut decoder = ZwsDecoder::new();
    let mut input = Bytes::copy_from_slice(rest);
    while !input.is_empty() {
        let take = stride.min(input.len());
        let segment = input.split_to(take);

        match decoder.decode(&segment) {
            Ok(Some(msg)) => {
                // Whatever decodes must re-encode to one segment per frame.
                let segments = encode(&msg);
                assert_eq!(segments.len(), msg.len());
                let mut again = ZwsDecoder::new();
                let mut out = None;
                for seg in &segments {
                    out = again.decode(seg).expect("re-encoded segment");
                }
                assert_eq!(out, Some(msg));
            }
            Ok(None) => assert!(decoder.is_partial()),
            Err(_) => assert!(!decoder.is_partial()),
        }

        if take == 0 {
            break;
        }
    }
});
