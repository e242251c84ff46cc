//! HTTP/1.1 Protocol.
//!
//! - [`parser`] contains the incremental request parser.
//! - [`ReadBuffer`] holds bytes read from IO until the parser consumes them.
//! - [`read_request`] integrates both into reading a request from a stream.
use tokio::io::AsyncRead;

use crate::log::debug;
use crate::request::Request;

pub mod parser;
mod buffer;
mod error;

pub use buffer::ReadBuffer;
pub use error::RequestError;
pub use parser::{ParseError, ParseState, RequestParser};

#[cfg(test)]
mod test;

/// Read a request from `io`.
///
/// Bytes are read into `buffer` and handed to a [`RequestParser`] until the header block is
/// complete. Bytes past the header block, if any, are left in `buffer`.
///
/// # Errors
///
/// Returns [`RequestError::Truncated`] if the stream ends before the request is complete, and
/// [`RequestError::TooLarge`] if the request line and header block together reach the buffer
/// limit.
pub async fn read_request<R>(io: &mut R, buffer: &mut ReadBuffer) -> Result<Request, RequestError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut parser = RequestParser::new();
    let mut consumed = 0;

    loop {
        let read = parser.parse(buffer.as_slice())?;
        buffer.consume(read);
        consumed += read;

        if parser.is_done() {
            break;
        }

        if consumed + buffer.len() >= buffer.limit() {
            return Err(RequestError::TooLarge);
        }

        if buffer.read_from(io).await? == 0 {
            debug!("stream closed in {:?}", parser.state());
            break;
        }
    }

    parser.into_request().ok_or(RequestError::Truncated)
}
