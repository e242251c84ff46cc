use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

use super::{ParseError, ReadBuffer, RequestError, read_request};

/// Reader that returns at most `size` bytes per read.
struct ChunkReader {
    data: Vec<u8>,
    pos: usize,
    size: usize,
}

impl ChunkReader {
    fn new(data: impl Into<Vec<u8>>, size: usize) -> Self {
        Self { data: data.into(), pos: 0, size }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let end = self.data.len().min(self.pos + self.size);
        let len = (end - self.pos).min(buf.remaining());
        let start = self.pos;
        buf.put_slice(&self.data[start..start + len]);
        self.pos += len;
        Poll::Ready(Ok(()))
    }
}

/// Reader that always fails.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _: &mut Context<'_>,
        _: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::ErrorKind::ConnectionReset.into()))
    }
}

#[tokio::test]
async fn read_in_small_pieces() {
    let mut io = ChunkReader::new(&b"GET /foo HTTP/1.1\r\nHost: x\r\n\r\n"[..], 8);
    let mut buffer = ReadBuffer::new(8, 1024);

    let request = read_request(&mut io, &mut buffer).await.unwrap();
    assert_eq!(request.method(), "GET");
    assert_eq!(request.target(), "/foo");
    assert_eq!(request.version(), "1.1");
    assert_eq!(request.headers().get("host"), Some("x"));
    assert!(buffer.is_empty());
}

#[tokio::test]
async fn read_every_piece_size() {
    let input = b"POST /coffee HTTP/1.1\r\nHost: localhost:42069\r\nAccept: */*\r\n\r\n";

    for size in 1..=input.len() {
        let mut io = ChunkReader::new(&input[..], size);
        let mut buffer = ReadBuffer::new(4, 1024);

        let request = read_request(&mut io, &mut buffer).await.unwrap();
        assert_eq!(request.method(), "POST", "piece size {size}");
        assert_eq!(request.target(), "/coffee", "piece size {size}");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"), "piece size {size}");
        assert_eq!(request.headers().get("accept"), Some("*/*"), "piece size {size}");
    }
}

#[tokio::test]
async fn read_leaves_body_in_buffer() {
    let mut io = ChunkReader::new(&b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello"[..], 64);
    let mut buffer = ReadBuffer::new(64, 1024);

    let request = read_request(&mut io, &mut buffer).await.unwrap();
    assert_eq!(request.headers().get("content-length"), Some("5"));
    assert_eq!(buffer.as_slice(), b"hello");
}

#[tokio::test]
async fn read_truncated() {
    let mut io = ChunkReader::new(&b"GET /foo HTTP/1.1\r\n"[..], 3);
    let mut buffer = ReadBuffer::new(16, 1024);

    let err = read_request(&mut io, &mut buffer).await.unwrap_err();
    assert!(matches!(err, RequestError::Truncated), "{err:?}");

    let mut io = ChunkReader::new(Vec::new(), 3);
    let err = read_request(&mut io, &mut buffer).await.unwrap_err();
    assert!(matches!(err, RequestError::Truncated), "{err:?}");
}

#[tokio::test]
async fn read_too_large() {
    let mut input = b"GET / HTTP/1.1\r\n".to_vec();
    for i in 0..64 {
        input.extend_from_slice(format!("X-Field-{i}: some value\r\n").as_bytes());
    }
    input.extend_from_slice(b"\r\n");

    let mut io = ChunkReader::new(input, 32);
    let mut buffer = ReadBuffer::new(64, 256);

    let err = read_request(&mut io, &mut buffer).await.unwrap_err();
    assert!(matches!(err, RequestError::TooLarge), "{err:?}");
    assert_eq!(err.status().map(|status| status.status()), Some(431));
}

#[tokio::test]
async fn read_invalid() {
    let mut io = ChunkReader::new(&b"GET / HTTP/1.0\r\n\r\n"[..], 64);
    let mut buffer = ReadBuffer::new(64, 1024);

    let err = read_request(&mut io, &mut buffer).await.unwrap_err();
    assert!(matches!(err, RequestError::Parse(ParseError::UnsupportedVersion)), "{err:?}");
    assert_eq!(err.status().map(|status| status.status()), Some(400));
}

#[tokio::test]
async fn read_io_error() {
    let mut buffer = ReadBuffer::new(64, 1024);
    let err = read_request(&mut BrokenReader, &mut buffer).await.unwrap_err();
    assert!(matches!(err, RequestError::Io(_)), "{err:?}");
    assert!(err.status().is_none());
}

#[tokio::test]
async fn read_buffer_grows() {
    let mut buffer = ReadBuffer::new(4, 1024);
    let mut io = ChunkReader::new(&b"0123456789"[..], 4);

    assert_eq!(buffer.read_from(&mut io).await.unwrap(), 4);
    assert_eq!(buffer.read_from(&mut io).await.unwrap(), 4);
    assert_eq!(buffer.read_from(&mut io).await.unwrap(), 2);
    assert_eq!(buffer.read_from(&mut io).await.unwrap(), 0);
    assert_eq!(buffer.as_slice(), b"0123456789");
    assert!(buffer.capacity() >= 10);

    buffer.consume(4);
    assert_eq!(buffer.as_slice(), b"456789");
    assert_eq!(buffer.len(), 6);

    let rest = buffer.split();
    assert_eq!(&rest[..], b"456789");
    assert!(buffer.is_empty());
}

#[tokio::test]
async fn read_buffered_request() {
    let mut buffer = ReadBuffer::new(64, 1024);
    buffer.extend_from_slice(b"DELETE /items/7 HTTP/1.1\r\nX-Trace: 1\r\n\r\nrest");

    // parsed without touching the stream
    let mut io = BrokenReader;
    let request = read_request(&mut io, &mut buffer).await.unwrap();
    assert_eq!(buffer.as_slice(), b"rest");

    let (line, headers) = request.into_parts();
    assert_eq!(line.method(), "DELETE");
    assert_eq!(line.target(), "/items/7");
    assert_eq!(line.to_string(), "DELETE /items/7 HTTP/1.1");
    assert_eq!(headers.get("x-trace"), Some("1"));
}
