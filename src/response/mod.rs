//! HTTP Response.
//!
//! A response is written through a [`ResponseWriter`], which enforces the order of the parts:
//!
//! ```text
//! status line -> headers -> ( body | chunk* -> last chunk ) -> trailers?
//! ```
use bytes::BytesMut;

use crate::common::CRLF;
use crate::headers::Headers;
use crate::http::{HTTP_11, StatusCode};
use crate::log::warning;
use crate::matches;

mod error;
mod writer;

pub use error::{WriteError, WriteOp};
pub use writer::{ResponseWriter, WriteState};

#[cfg(test)]
mod test;

/// Returns headers for a simple, non chunked response.
///
/// Contains `content-length`, `connection: close` and `content-type`. To switch to chunked
/// coding, remove `content-length` and set `transfer-encoding: chunked`.
pub fn default_headers(content_len: usize, content_type: &str) -> Headers {
    let mut headers = Headers::with_capacity(3);
    headers.set("content-length", itoa::Buffer::new().format(content_len));
    headers.set("connection", "close");
    headers.set("content-type", content_type);
    headers
}

pub(crate) fn write_status_line(buf: &mut BytesMut, status: StatusCode) {
    buf.extend_from_slice(HTTP_11.as_bytes());
    buf.extend_from_slice(b" ");
    buf.extend_from_slice(status.as_str().as_bytes());
    buf.extend_from_slice(CRLF);
}

/// Write `name: value` lines followed by the empty line.
///
/// Fields whose name is not a token are skipped, and CR or LF in a value is written as a space,
/// so a field can never start a new line.
pub(crate) fn write_fields(buf: &mut BytesMut, headers: &Headers) {
    for (name, value) in headers {
        if name.is_empty() || !name.bytes().all(matches::is_token) {
            warning!("skipping header with invalid name {name:?}");
            continue;
        }

        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");

        let mut value = value.as_bytes();
        while let Some(end) = value.iter().position(|&byte| matches!(byte, b'\r' | b'\n')) {
            buf.extend_from_slice(&value[..end]);
            buf.extend_from_slice(b" ");
            value = &value[end + 1..];
        }
        buf.extend_from_slice(value);
        buf.extend_from_slice(CRLF);
    }
    buf.extend_from_slice(CRLF);
}
