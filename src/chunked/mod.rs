//! Chunked transfer coding.
//!
//! [`encode_chunk`] and [`encode_last`] produce the frames written by
//! [`ResponseWriter`][crate::ResponseWriter]; [`Decoder`] reverses them incrementally.
use bytes::{Buf, Bytes, BytesMut};

use crate::common::{CRLF, ParseResult, split_line};
use crate::headers::Headers;
use crate::log::trace;

mod error;

pub use error::ChunkedError;


const MAX_CHUNKED_SIZE: u64 = u64::MAX >> 1;
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const LAST_CHUNK: &[u8] = b"0\r\n";

// ===== Encode =====

/// An encoded chunk frame.
///
/// The bytes must be written in following order: `header`, `chunk`, then `trail`.
#[derive(Debug)]
pub struct EncodedBuf<'a> {
    pub header: Bytes,
    pub chunk: &'a [u8],
    pub trail: &'static [u8],
}

impl<'a> EncodedBuf<'a> {
    fn empty() -> Self {
        Self {
            header: Bytes::new(),
            chunk: &[],
            trail: b"",
        }
    }

    /// Returns `true` if the frame writes nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.chunk.is_empty() && self.trail.is_empty()
    }

    /// Returns the total frame length.
    #[inline]
    pub fn len(&self) -> usize {
        self.header.len() + self.chunk.len() + self.trail.len()
    }
}

/// Encode `chunk` as `HEX-LENGTH CRLF chunk CRLF`, using `write_buffer` for the size line.
///
/// An empty chunk encodes to nothing, since a zero size line would terminate the body.
pub fn encode_chunk<'a>(chunk: &'a [u8], write_buffer: &mut BytesMut) -> EncodedBuf<'a> {
    if chunk.is_empty() {
        return EncodedBuf::empty();
    }

    write_buffer.reserve(size_of::<usize>() * 2 + CRLF.len());
    put_hex(write_buffer, chunk.len());
    write_buffer.extend_from_slice(CRLF);

    EncodedBuf {
        header: write_buffer.split().freeze(),
        chunk,
        trail: CRLF,
    }
}

/// Encode the terminating zero length chunk.
///
/// Trailer fields and the final CRLF are written separately.
pub fn encode_last(write_buffer: &mut BytesMut) {
    write_buffer.extend_from_slice(LAST_CHUNK);
}

fn put_hex(buf: &mut BytesMut, mut value: usize) {
    let mut digits = [0u8; size_of::<usize>() * 2];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = HEX_DIGITS[value & 0xf];
        value >>= 4;
        if value == 0 {
            break;
        }
    }
    buf.extend_from_slice(&digits[start..]);
}

// ===== Decode =====

/// Incremental chunked body decoder.
///
/// Trailer fields following the last chunk are collected into [`Decoder::trailers`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    phase: Phase,
    trailers: Headers,
}

#[derive(Debug, Clone, Copy, Default)]
enum Phase {
    /// Expecting a chunk size line.
    #[default]
    Size,
    /// Inside chunk data, with remaining length.
    Data(u64),
    /// Expecting the CRLF after chunk data.
    DataEnd,
    /// After the last chunk, expecting trailer fields or the final CRLF.
    Trailers,
    Eof,
}

impl Decoder {
    /// Create new decoder expecting the first chunk size line.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the final CRLF has been decoded.
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self.phase, Phase::Eof)
    }

    /// Returns trailer fields decoded so far.
    #[inline]
    pub fn trailers(&self) -> &Headers {
        &self.trailers
    }

    /// Decode the next piece of chunk data from `buffer`, advancing it past consumed bytes.
    ///
    /// Returns `Ok(None)` once the last chunk and trailer section have been decoded, and
    /// [`ParseResult::Pending`] when more bytes are required.
    pub fn decode(&mut self, buffer: &mut BytesMut) -> ParseResult<Option<Bytes>, ChunkedError> {
        use ParseResult as Result;

        loop {
            match self.phase {
                Phase::Eof => return Result::Ok(None),
                Phase::Size => {
                    let Some(line) = split_line(buffer) else {
                        return Result::Pending;
                    };
                    let size = match parse_size(line) {
                        Ok(size) => size,
                        Err(err) => return Result::Err(err),
                    };
                    let line_len = line.len();
                    buffer.advance(line_len + CRLF.len());

                    trace!("chunk size: {size}");
                    self.phase = match size {
                        0 => Phase::Trailers,
                        size => Phase::Data(size),
                    };
                }
                Phase::Data(remaining) => {
                    if buffer.is_empty() {
                        return Result::Pending;
                    }

                    let len = buffer.len() as u64;
                    let chunk = match remaining.checked_sub(len) {
                        // buffer contains less than the remaining chunk
                        Some(leftover) if leftover > 0 => {
                            self.phase = Phase::Data(leftover);
                            buffer.split()
                        }
                        _ => {
                            self.phase = Phase::DataEnd;
                            buffer.split_to(remaining as usize)
                        }
                    };

                    return Result::Ok(Some(chunk.freeze()));
                }
                Phase::DataEnd => match buffer.first_chunk::<2>() {
                    Some(crlf) if crlf == CRLF => {
                        buffer.advance(CRLF.len());
                        self.phase = Phase::Size;
                    }
                    Some(_) => return Result::Err(ChunkedError::InvalidSeparator),
                    None if buffer.first().is_some_and(|&b| b != b'\r') => {
                        return Result::Err(ChunkedError::InvalidSeparator);
                    }
                    None => return Result::Pending,
                },
                Phase::Trailers => match self.trailers.parse_line(buffer) {
                    ParseResult::Ok(line) => {
                        buffer.advance(line.consumed());
                        if line.is_end() {
                            self.phase = Phase::Eof;
                        }
                    }
                    ParseResult::Pending => return Result::Pending,
                    ParseResult::Err(err) => return Result::Err(ChunkedError::InvalidTrailer(err)),
                },
            }
        }
    }
}

/// Parse `HEX-LENGTH [; extension]`.
fn parse_size(line: &[u8]) -> Result<u64, ChunkedError> {
    let digits_len = line
        .iter()
        .position(|byte| !byte.is_ascii_hexdigit())
        .unwrap_or(line.len());

    if digits_len == 0 {
        return Err(ChunkedError::InvalidSize);
    }

    // chunk extensions are ignored
    match line.get(digits_len) {
        None | Some(b';') => {}
        Some(_) => return Err(ChunkedError::InvalidSize),
    }

    let mut size: u64 = 0;
    for &byte in &line[..digits_len] {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            _ => byte - b'A' + 10,
        };
        size = match size.checked_mul(16) {
            Some(size) => size + u64::from(digit),
            None => return Err(ChunkedError::TooLarge),
        };
    }

    if size > MAX_CHUNKED_SIZE {
        return Err(ChunkedError::TooLarge);
    }

    Ok(size)
}
