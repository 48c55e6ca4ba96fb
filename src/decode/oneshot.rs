//! Whole-buffer wrappers over the streaming engine, and the size probe.

use crate::bit_reader::BitReader;
use crate::config::READ_BUFFER_SIZE;
use crate::decode::metablock::read_window_bits;
use crate::decode::state::BrotliState;
use crate::decode::types::{BrotliError, BrotliResult, Step};

/// Decompresses all of `input` into `output` in one call.
///
/// Returns the number of bytes written. `output` too small for the stream
/// yields `OutputTooSmall`; a stream cut short yields `TruncatedHeader` or
/// `LengthMismatch` depending on where it stops.
pub fn decompress_buffer(input: &[u8], output: &mut [u8]) -> Result<usize, BrotliError> {
    let mut state = BrotliState::new();
    let mut next_in = input;
    let mut next_out: &mut [u8] = output;
    let mut total_out = 0usize;
    match state.decompress_stream(&mut next_in, &mut next_out, &mut total_out) {
        BrotliResult::Success => Ok(total_out),
        BrotliResult::NeedsMoreOutput => Err(BrotliError::OutputTooSmall),
        BrotliResult::NeedsMoreInput => Err(state.truncation_error()),
        BrotliResult::Error => Err(state.last_error().unwrap_or(BrotliError::Corrupt)),
    }
}

/// Decompresses all of `input` into a freshly allocated vector.
pub fn decompress_to_vec(input: &[u8]) -> Result<Vec<u8>, BrotliError> {
    let mut state = BrotliState::new();
    let mut next_in = input;
    let mut out = Vec::new();
    let mut chunk = vec![0u8; READ_BUFFER_SIZE];
    let cap = chunk.len();
    let mut total_out = 0usize;
    loop {
        let mut next_out: &mut [u8] = &mut chunk;
        let result = state.decompress_stream(&mut next_in, &mut next_out, &mut total_out);
        let written = cap - next_out.len();
        out.extend_from_slice(&chunk[..written]);
        match result {
            BrotliResult::Success => return Ok(out),
            BrotliResult::NeedsMoreOutput => continue,
            BrotliResult::NeedsMoreInput => return Err(state.truncation_error()),
            BrotliResult::Error => return Err(state.last_error().unwrap_or(BrotliError::Corrupt)),
        }
    }
}

/// Reads the declared decompressed size without decoding.
///
/// Only defined for a stream whose first meta-block is last (compressed or
/// empty), or an uncompressed meta-block followed by an empty last one.
/// Anything else, or a header that does not parse, gives `None`.
pub fn decompressed_size(input: &[u8]) -> Option<usize> {
    let mut br = BitReader::new();
    let mut cursor = input;
    let header = probe_header(&mut br, &mut cursor).ok()?;
    match header {
        ProbedHeader::LastEmpty => Some(0),
        ProbedHeader::Last(len) => Some(len),
        ProbedHeader::Uncompressed(len) => {
            let consumed = input.len() - cursor.len();
            let body = consumed - br.unload_bytes(consumed);
            let trailer = *input.get(body.checked_add(len)?)?;
            // ISLAST and ISLASTEMPTY both set.
            (trailer & 3 == 3).then_some(len)
        }
    }
}

enum ProbedHeader {
    LastEmpty,
    Last(usize),
    Uncompressed(usize),
}

fn probe_header(br: &mut BitReader, input: &mut &[u8]) -> Step<ProbedHeader> {
    read_window_bits(br, input)?;
    let is_last = br.read_bits(1, input)? == 1;
    if is_last && br.read_bits(1, input)? == 1 {
        return Ok(ProbedHeader::LastEmpty);
    }
    let nibbles = br.read_bits(2, input)?;
    if nibbles == 3 {
        // Metadata: nothing to size.
        return Err(BrotliError::Corrupt.into());
    }
    let nibbles = nibbles + 4;
    let mut len = 0usize;
    for i in 0..nibbles {
        let v = br.read_bits(4, input)?;
        if i + 1 == nibbles && nibbles > 4 && v == 0 {
            return Err(BrotliError::ExuberantNibble.into());
        }
        len |= (v as usize) << (4 * i);
    }
    let len = len + 1;
    if is_last {
        return Ok(ProbedHeader::Last(len));
    }
    if br.read_bits(1, input)? != 1 {
        return Err(BrotliError::Corrupt.into());
    }
    br.align_to_byte()?;
    Ok(ProbedHeader::Uncompressed(len))
}
