#![no_main]
use libfuzzer_sys::fuzz_target;

use brotli::{BrotliResult, BrotliState};

fuzz_target!(|data: &[u8]| {
    // First byte picks the chunk sizes; the rest is the stream.
    let Some((&knobs, stream)) = data.split_first() else {
        return;
    };
    let in_chunk = (knobs & 0x0f) as usize + 1;
    let out_chunk = (knobs >> 4) as usize + 1;

    let mut state = BrotliState::new();
    let mut out = Vec::new();
    let mut buf = vec![0u8; out_chunk];
    let mut total = 0usize;
    let mut fed = 0usize;
    let mut out_len = 0usize;
    let streamed = loop {
        let end = (fed + in_chunk).min(stream.len());
        let mut next_in = &stream[fed..end];
        let mut next_out: &mut [u8] = &mut buf;
        let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total);
        let written = out_chunk - next_out.len();
        out.extend_from_slice(&buf[..written]);
        out_len += written;
        fed = end - next_in.len();
        match result {
            BrotliResult::NeedsMoreOutput => continue,
            BrotliResult::NeedsMoreInput if fed < stream.len() => continue,
            BrotliResult::NeedsMoreInput | BrotliResult::Error => break None,
            BrotliResult::Success => break Some(out.clone()),
        }
    };
    assert_eq!(total, out_len);

    // Chunking must not change the result.
    match (streamed, brotli::decompress_to_vec(stream)) {
        (Some(a), Ok(b)) => assert_eq!(a, b),
        (Some(_), Err(e)) => panic!("chunked decode succeeded, whole decode failed: {e}"),
        _ => {}
    }
});
