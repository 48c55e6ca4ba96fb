#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly, never panic.
    let whole = brotli::decompress_to_vec(data);

    // A one-shot decode into a bounded buffer must agree with the Vec path.
    let mut out = vec![0u8; 1 << 16];
    match (brotli::decompress_buffer(data, &mut out), &whole) {
        (Ok(n), Ok(v)) => assert_eq!(&out[..n], &v[..]),
        (Ok(_), Err(_)) => panic!("bounded decode succeeded where unbounded failed"),
        _ => {}
    }

    // The size probe must never disagree with a successful decode.
    if let (Some(size), Ok(v)) = (brotli::decompressed_size(data), &whole) {
        assert_eq!(size, v.len());
    }
});
