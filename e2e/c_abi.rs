//! E2E Test Suite 07: C ABI entry points
//!
//! Calls the `extern "C"` functions the way C code would, through raw
//! pointers and size_t counters:
//! - BrotliDecompressBuffer / BrotliDecompressedSize
//! - BrotliDecompressStream with pointer and counter bookkeeping
//! - BrotliCreateState with allocation hooks
//! - BrotliSetCustomDictionary

#[path = "../tests/common/mod.rs"]
mod common;

use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use libc::{c_void, size_t};

use brotli::abi::{
    BrotliCreateState, BrotliDecompressBuffer, BrotliDecompressStream, BrotliDecompressedSize,
    BrotliDestroyState, BrotliSetCustomDictionary,
};
use brotli::{BrotliError, BrotliResult};

use common::{dictionary_stream, encode, sample_data, ABCABC_STORED};

unsafe extern "C" fn counting_alloc(opaque: *mut c_void, size: size_t) -> *mut c_void {
    (*(opaque as *const AtomicUsize)).fetch_add(1, Ordering::SeqCst);
    libc::malloc(size)
}

unsafe extern "C" fn counting_free(opaque: *mut c_void, address: *mut c_void) {
    (*(opaque as *const AtomicUsize)).fetch_sub(1, Ordering::SeqCst);
    libc::free(address)
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: One-shot entry points
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decompress_buffer() {
    let data = sample_data(10_000);
    let compressed = encode(&data, 9, 18);
    let mut out = vec![0u8; data.len()];
    let mut decoded_size: size_t = out.len();
    let result = unsafe {
        BrotliDecompressBuffer(
            compressed.len(),
            compressed.as_ptr(),
            &mut decoded_size,
            out.as_mut_ptr(),
        )
    };
    assert_eq!(result, BrotliResult::Success);
    assert_eq!(decoded_size, data.len());
    assert!(out == data);
}

#[test]
fn test_decompress_buffer_too_small() {
    let mut out = [0u8; 4];
    let mut decoded_size: size_t = out.len();
    let result = unsafe {
        BrotliDecompressBuffer(
            ABCABC_STORED.len(),
            ABCABC_STORED.as_ptr(),
            &mut decoded_size,
            out.as_mut_ptr(),
        )
    };
    assert_eq!(result, BrotliResult::NeedsMoreOutput);
    assert_eq!(decoded_size, 4);
}

#[test]
fn test_null_pointers_rejected() {
    let mut decoded_size: size_t = 16;
    let result =
        unsafe { BrotliDecompressBuffer(4, ptr::null(), &mut decoded_size, ptr::null_mut()) };
    assert_eq!(result, BrotliResult::Error);
    assert_eq!(unsafe { BrotliDecompressedSize(4, ptr::null(), &mut decoded_size) }, 0);
}

#[test]
fn test_decompressed_size() {
    let mut size: size_t = 0;
    let ok = unsafe { BrotliDecompressedSize(ABCABC_STORED.len(), ABCABC_STORED.as_ptr(), &mut size) };
    assert_eq!((ok, size), (1, 6));
    let junk = [0x11u8, 0x00];
    let ok = unsafe { BrotliDecompressedSize(junk.len(), junk.as_ptr(), &mut size) };
    assert_eq!(ok, 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Streaming with pointer bookkeeping
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stream_pointer_bookkeeping() {
    let data = sample_data(30_000);
    let compressed = encode(&data, 7, 16);
    let mut out = vec![0u8; data.len()];
    unsafe {
        let state = BrotliCreateState(None, None, ptr::null_mut());
        assert!(!state.is_null());

        let mut next_in = compressed.as_ptr();
        let mut next_out = out.as_mut_ptr();
        let mut available_out: size_t = 0;
        let mut total_out: size_t = 0;
        let mut fed = 0usize;
        let result = loop {
            let mut available_in: size_t = (compressed.len() - fed).min(100);
            let start_in = next_in;
            available_out += 1000.min(out.len() - total_out - available_out);
            let result = BrotliDecompressStream(
                &mut available_in,
                &mut next_in,
                &mut available_out,
                &mut next_out,
                &mut total_out,
                state,
            );
            fed += next_in.offset_from(start_in) as usize;
            assert_eq!(next_out.offset_from(out.as_ptr()) as usize, total_out);
            match result {
                BrotliResult::NeedsMoreInput | BrotliResult::NeedsMoreOutput => continue,
                other => break other,
            }
        };
        assert_eq!(result, BrotliResult::Success);
        assert_eq!(total_out, data.len());
        BrotliDestroyState(state);
    }
    assert!(out == data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Allocation hooks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_state_with_hooks() {
    let live = AtomicUsize::new(0);
    let opaque = &live as *const AtomicUsize as *mut c_void;
    let data = sample_data(5_000);
    let compressed = encode(&data, 11, 16);
    let mut out = vec![0u8; data.len()];
    unsafe {
        let state = BrotliCreateState(Some(counting_alloc), Some(counting_free), opaque);
        assert!(!state.is_null());
        // The session itself lives in hook memory.
        assert_eq!(live.load(Ordering::SeqCst), 1);

        let mut available_in = compressed.len();
        let mut next_in = compressed.as_ptr();
        let mut available_out = out.len();
        let mut next_out = out.as_mut_ptr();
        let mut total_out = 0;
        let result = BrotliDecompressStream(
            &mut available_in,
            &mut next_in,
            &mut available_out,
            &mut next_out,
            &mut total_out,
            state,
        );
        assert_eq!(result, BrotliResult::Success);
        assert_eq!(available_in, 0);
        assert_eq!(available_out, 0);
        assert!(live.load(Ordering::SeqCst) > 1);
        BrotliDestroyState(state);
    }
    assert_eq!(live.load(Ordering::SeqCst), 0);
    assert!(out == data);
}

#[test]
fn test_half_hook_pair_gives_null() {
    let state = unsafe { BrotliCreateState(Some(counting_alloc), None, ptr::null_mut()) };
    assert!(state.is_null());
    unsafe { BrotliDestroyState(ptr::null_mut()) };
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Custom dictionary
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_custom_dictionary() {
    let dict = b"hello world";
    let stream = dictionary_stream(5, 4, 5);
    let mut out = [0u8; 5];
    unsafe {
        let state = BrotliCreateState(None, None, ptr::null_mut());
        BrotliSetCustomDictionary(dict.len(), dict.as_ptr(), state);
        let mut available_in = stream.len();
        let mut next_in = stream.as_ptr();
        let mut available_out = out.len();
        let mut next_out = out.as_mut_ptr();
        let mut total_out = 0;
        let result = BrotliDecompressStream(
            &mut available_in,
            &mut next_in,
            &mut available_out,
            &mut next_out,
            &mut total_out,
            state,
        );
        assert_eq!(result, BrotliResult::Success);
        BrotliDestroyState(state);
    }
    assert_eq!(&out, b"world");
}

#[test]
fn test_custom_dictionary_too_late_fails_session() {
    let stream = ABCABC_STORED;
    let mut out = [0u8; 8];
    unsafe {
        let state = BrotliCreateState(None, None, ptr::null_mut());
        let mut available_in = 2;
        let mut next_in = stream.as_ptr();
        let mut available_out = out.len();
        let mut next_out = out.as_mut_ptr();
        let mut total_out = 0;
        let result = BrotliDecompressStream(
            &mut available_in,
            &mut next_in,
            &mut available_out,
            &mut next_out,
            &mut total_out,
            state,
        );
        assert_eq!(result, BrotliResult::NeedsMoreInput);

        BrotliSetCustomDictionary(4, b"late".as_ptr(), state);
        assert_eq!((*state).last_error(), Some(BrotliError::InvalidUsage));

        let mut available_in = stream.len() - 2;
        let result = BrotliDecompressStream(
            &mut available_in,
            &mut next_in,
            &mut available_out,
            &mut next_out,
            &mut total_out,
            state,
        );
        assert_eq!(result, BrotliResult::Error);
        BrotliDestroyState(state);
    }
}
