//! C-ABI shims: export the decoder entry points under their C names.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced `target/release/libbrotli.a` links against code written for
//! the C decoder header.

// `BrotliState` crosses the boundary only as an opaque pointer.
#![allow(improper_ctypes_definitions)]

use std::ptr;
use std::slice;

use libc::{c_int, c_void, size_t};

use crate::decode::{decompressed_size, BrotliResult, BrotliState};
use crate::memory::{BrotliAllocFunc, BrotliFreeFunc, CustomMem};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// An input slice from a C pointer/length pair. A null pointer is only
/// accepted for an empty range.
#[inline]
unsafe fn in_slice<'a>(ptr: *const u8, len: size_t) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(slice::from_raw_parts(ptr, len))
}

#[inline]
unsafe fn out_slice<'a>(ptr: *mut u8, len: size_t) -> Option<&'a mut [u8]> {
    if len == 0 {
        return Some(&mut []);
    }
    if ptr.is_null() {
        return None;
    }
    Some(slice::from_raw_parts_mut(ptr, len))
}

// ─────────────────────────────────────────────────────────────────────────────
// BrotliCreateState / BrotliDestroyState
//
// BrotliState* BrotliCreateState(brotli_alloc_func alloc_func,
//                                brotli_free_func free_func, void* opaque);
// void BrotliDestroyState(BrotliState* state);
//
// With hooks, the state itself is placed in hook memory too.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn BrotliCreateState(
    alloc_func: Option<BrotliAllocFunc>,
    free_func: Option<BrotliFreeFunc>,
    opaque: *mut c_void,
) -> *mut BrotliState<'static> {
    let Ok(mem) = CustomMem::new(alloc_func, free_func, opaque) else {
        return ptr::null_mut();
    };
    let state = BrotliState::with_allocator(mem);
    if !mem.is_custom() {
        return Box::into_raw(Box::new(state));
    }
    let size = std::mem::size_of::<BrotliState<'static>>();
    let raw = mem.alloc_raw(size) as *mut BrotliState<'static>;
    if raw.is_null() || raw.align_offset(std::mem::align_of::<BrotliState<'static>>()) != 0 {
        if !raw.is_null() {
            mem.free_raw(raw as *mut c_void);
        }
        return ptr::null_mut();
    }
    ptr::write(raw, state);
    raw
}

#[no_mangle]
pub unsafe extern "C" fn BrotliDestroyState(state: *mut BrotliState<'static>) {
    if state.is_null() {
        return;
    }
    let mem = (*state).mem;
    if mem.is_custom() {
        ptr::drop_in_place(state);
        mem.free_raw(state as *mut c_void);
    } else {
        drop(Box::from_raw(state));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BrotliDecompressedSize
//
// int BrotliDecompressedSize(size_t encoded_size,
//                            const uint8_t* encoded_buffer,
//                            size_t* decoded_size);
//
// Returns 1 and sets *decoded_size on success, 0 otherwise.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn BrotliDecompressedSize(
    encoded_size: size_t,
    encoded_buffer: *const u8,
    decoded_size: *mut size_t,
) -> c_int {
    if decoded_size.is_null() {
        return 0;
    }
    let Some(input) = in_slice(encoded_buffer, encoded_size) else {
        return 0;
    };
    match decompressed_size(input) {
        Some(n) => {
            *decoded_size = n;
            1
        }
        None => 0,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BrotliDecompressBuffer
//
// BrotliResult BrotliDecompressBuffer(size_t encoded_size,
//                                     const uint8_t* encoded_buffer,
//                                     size_t* decoded_size,
//                                     uint8_t* decoded_buffer);
//
// *decoded_size holds the buffer capacity on entry and the decoded length on
// success.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn BrotliDecompressBuffer(
    encoded_size: size_t,
    encoded_buffer: *const u8,
    decoded_size: *mut size_t,
    decoded_buffer: *mut u8,
) -> BrotliResult {
    if decoded_size.is_null() {
        return BrotliResult::Error;
    }
    let (Some(input), Some(output)) = (
        in_slice(encoded_buffer, encoded_size),
        out_slice(decoded_buffer, *decoded_size),
    ) else {
        return BrotliResult::Error;
    };
    let mut state = BrotliState::new();
    let mut next_in = input;
    let mut next_out = output;
    let mut total_out = 0usize;
    let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
    *decoded_size = total_out;
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// BrotliDecompressStream
//
// BrotliResult BrotliDecompressStream(size_t* available_in,
//                                     const uint8_t** next_in,
//                                     size_t* available_out,
//                                     uint8_t** next_out,
//                                     size_t* total_out,
//                                     BrotliState* s);
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn BrotliDecompressStream(
    available_in: *mut size_t,
    next_in: *mut *const u8,
    available_out: *mut size_t,
    next_out: *mut *mut u8,
    total_out: *mut size_t,
    state: *mut BrotliState<'static>,
) -> BrotliResult {
    if available_in.is_null()
        || next_in.is_null()
        || available_out.is_null()
        || next_out.is_null()
        || total_out.is_null()
        || state.is_null()
    {
        return BrotliResult::Error;
    }
    let (Some(input), Some(output)) = (
        in_slice(*next_in, *available_in),
        out_slice(*next_out, *available_out),
    ) else {
        return BrotliResult::Error;
    };
    let in_len = input.len();
    let out_len = output.len();
    let mut in_cursor = input;
    let mut out_cursor = output;
    let mut total = *total_out;
    let result = (*state).decompress_stream(&mut in_cursor, &mut out_cursor, &mut total);

    // The decoder may hand back read-ahead bytes, but never past the start
    // of this call's input.
    let consumed = in_len - in_cursor.len();
    let produced = out_len - out_cursor.len();
    if consumed > 0 {
        *next_in = (*next_in).add(consumed);
    }
    if produced > 0 {
        *next_out = (*next_out).add(produced);
    }
    *available_in -= consumed;
    *available_out -= produced;
    *total_out = total;
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// BrotliSetCustomDictionary
//
// void BrotliSetCustomDictionary(size_t size, const uint8_t* dict,
//                                BrotliState* s);
//
// The dictionary must stay alive until decoding is done.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn BrotliSetCustomDictionary(
    size: size_t,
    dict: *const u8,
    state: *mut BrotliState<'static>,
) {
    if state.is_null() {
        return;
    }
    let Some(dict) = in_slice(dict, size) else {
        return;
    };
    // Misuse after decoding started leaves the session in `Error`.
    if let Err(e) = (*state).set_custom_dictionary(dict) {
        (*state).fail(e);
    }
}
