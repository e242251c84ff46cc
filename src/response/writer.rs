use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{WriteError, WriteOp, write_fields, write_status_line};
use crate::chunked::{self, EncodedBuf};
use crate::common::CRLF;
use crate::headers::Headers;
use crate::http::StatusCode;
use crate::log::trace;

const DEFAULT_BUFFER_CAP: usize = 256;

/// Response write progress marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Initial,
    StatusLineWritten,
    HeadersWritten,
    BodyWritten,
    TrailersWritten,
    /// The sink failed mid write, no further operation is accepted.
    Failed,
}

impl std::fmt::Display for WriteState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Initial => "initial",
            Self::StatusLineWritten => "status line",
            Self::HeadersWritten => "headers",
            Self::BodyWritten => "body",
            Self::TrailersWritten => "trailers",
            Self::Failed => "failed write",
        })
    }
}

/// Writes a single response onto a byte sink.
///
/// Each method checks the write progress against the legal order and returns
/// [`WriteError::Order`] without writing anything when called out of order.
///
/// ```rust
/// # async fn run() -> Result<(), tcphttp::response::WriteError> {
/// use tcphttp::{ResponseWriter, StatusCode, response::default_headers};
///
/// let mut res = ResponseWriter::new(Vec::new());
/// res.write_status_line(StatusCode::OK).await?;
/// res.write_headers(&default_headers(5, "text/plain")).await?;
/// res.write_body(b"hello").await?;
/// res.finish().await?;
/// # Ok(())
/// # }
/// ```
pub struct ResponseWriter<W> {
    io: W,
    state: WriteState,
    chunked: bool,
    committed: bool,
    write_buffer: BytesMut,
}

impl<W> ResponseWriter<W> {
    /// Create new writer bound to `io`.
    pub fn new(io: W) -> Self {
        Self {
            io,
            state: WriteState::Initial,
            chunked: false,
            committed: false,
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_CAP),
        }
    }

    /// Returns the current write progress.
    #[inline]
    pub fn state(&self) -> WriteState {
        self.state
    }

    /// Returns `true` if any byte has been handed to the sink.
    ///
    /// Once committed, the response can no longer be replaced by an error response.
    #[inline]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Returns `true` if at least one chunk or the last chunk has been written.
    #[inline]
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    /// Returns shared reference to the underlying sink.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.io
    }

    /// Consume the writer, returning the underlying sink.
    #[inline]
    pub fn into_inner(self) -> W {
        self.io
    }

    fn begin(&self, op: WriteOp) -> Result<WriteState, WriteError> {
        let (expected, next) = op.transition();
        if self.state != expected {
            return Err(WriteError::Order {
                op,
                expected,
                found: self.state,
            });
        }
        Ok(next)
    }
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    /// Write `HTTP/1.1 <code> <reason>`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        let next = self.begin(WriteOp::StatusLine)?;
        write_status_line(&mut self.write_buffer, status);
        self.flush_buffer().await?;
        self.state = next;
        Ok(())
    }

    /// Write header fields and the empty line ending the header block.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        let next = self.begin(WriteOp::Headers)?;
        write_fields(&mut self.write_buffer, headers);
        self.flush_buffer().await?;
        self.state = next;
        Ok(())
    }

    /// Write the whole body verbatim.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<(), WriteError> {
        let next = self.begin(WriteOp::Body)?;
        if self.chunked {
            return Err(WriteError::MixedBody);
        }
        self.write_raw(body).await?;
        self.state = next;
        Ok(())
    }

    /// Write one chunk frame, may be called any number of times before
    /// [`write_chunked_done`][ResponseWriter::write_chunked_done].
    ///
    /// An empty chunk writes nothing.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), WriteError> {
        self.begin(WriteOp::Chunk)?;
        if chunk.is_empty() {
            return Ok(());
        }
        self.chunked = true;

        let EncodedBuf { header, chunk, trail } = chunked::encode_chunk(chunk, &mut self.write_buffer);
        trace!("writing chunk of {} bytes", chunk.len());
        self.write_raw(&header).await?;
        self.write_raw(chunk).await?;
        self.write_raw(trail).await?;
        Ok(())
    }

    /// Write the terminating zero length chunk.
    pub async fn write_chunked_done(&mut self) -> Result<(), WriteError> {
        let next = self.begin(WriteOp::ChunkedDone)?;
        self.chunked = true;
        chunked::encode_last(&mut self.write_buffer);
        self.flush_buffer().await?;
        self.state = next;
        Ok(())
    }

    /// Write trailer fields and the final empty line.
    ///
    /// Trailer names should be declared beforehand in a `trailers` header.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        let next = self.begin(WriteOp::Trailers)?;
        write_fields(&mut self.write_buffer, trailers);
        self.flush_buffer().await?;
        self.state = next;
        Ok(())
    }

    /// Complete the response and flush the sink.
    ///
    /// A chunked body without trailers gets its empty trailer section here.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Incomplete`] if the status line or headers were never written, or a
    /// chunked body was never terminated. A writer whose sink already failed stays failed.
    pub async fn finish(&mut self) -> Result<(), WriteError> {
        match self.state {
            WriteState::Initial | WriteState::StatusLineWritten | WriteState::Failed => {
                return Err(WriteError::Incomplete(self.state));
            }
            WriteState::HeadersWritten if self.chunked => {
                return Err(WriteError::Incomplete(self.state));
            }
            WriteState::BodyWritten if self.chunked => {
                self.write_buffer.extend_from_slice(CRLF);
                self.flush_buffer().await?;
                self.state = WriteState::TrailersWritten;
            }
            _ => {}
        }
        if let Err(err) = self.io.flush().await {
            self.state = WriteState::Failed;
            return Err(err.into());
        }
        Ok(())
    }

    async fn flush_buffer(&mut self) -> Result<(), WriteError> {
        self.committed = true;
        let result = self.io.write_all_buf(&mut self.write_buffer).await;
        if result.is_err() {
            self.write_buffer.clear();
            self.state = WriteState::Failed;
        }
        Ok(result?)
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.committed = true;
        if let Err(err) = self.io.write_all(bytes).await {
            self.state = WriteState::Failed;
            return Err(err.into());
        }
        Ok(())
    }
}

impl<W> std::fmt::Debug for ResponseWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("state", &self.state)
            .field("chunked", &self.chunked)
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}
