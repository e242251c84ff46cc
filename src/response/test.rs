use super::{ResponseWriter, WriteError, WriteOp, WriteState, default_headers};
use crate::chunked::Decoder;
use crate::common::ParseResult;
use crate::headers::Headers;
use crate::http::StatusCode;
use bytes::BytesMut;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

fn output<W: AsRef<[u8]>>(res: &ResponseWriter<W>) -> &str {
    std::str::from_utf8(res.get_ref().as_ref()).unwrap()
}

/// Sink that accepts `limit` bytes, then fails every write.
#[derive(Default)]
struct LimitedSink {
    written: Vec<u8>,
    limit: usize,
}

impl AsyncWrite for LimitedSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let room = self.limit - self.written.len();
        if room == 0 {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        let len = room.min(buf.len());
        self.written.extend_from_slice(&buf[..len]);
        Poll::Ready(Ok(len))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

macro_rules! assert_order {
    ($res:ident.$method:ident($($arg:expr)?), $op:ident, $expected:ident, $found:ident) => {
        match $res.$method($($arg)?).await {
            Err(WriteError::Order { op, expected, found }) => {
                assert_eq!(op, WriteOp::$op);
                assert_eq!(expected, WriteState::$expected);
                assert_eq!(found, WriteState::$found);
            }
            other => panic!("expected ordering error, found {other:?}"),
        }
    };
}

#[tokio::test]
async fn simple_response() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    assert_eq!(res.state(), WriteState::StatusLineWritten);

    res.write_headers(&default_headers(5, "text/plain")).await.unwrap();
    res.write_body(b"hello").await.unwrap();
    assert_eq!(res.state(), WriteState::BodyWritten);
    res.finish().await.unwrap();

    assert_eq!(
        output(&res),
        "HTTP/1.1 200 OK\r\n\
         content-length: 5\r\n\
         connection: close\r\n\
         content-type: text/plain\r\n\
         \r\n\
         hello"
    );
}

#[tokio::test]
async fn status_lines() {
    for (status, line) in [
        (StatusCode::OK, "HTTP/1.1 200 OK\r\n"),
        (StatusCode::BAD_REQUEST, "HTTP/1.1 400 Bad Request\r\n"),
        (StatusCode::INTERNAL_SERVER_ERROR, "HTTP/1.1 500 Internal Server Error\r\n"),
    ] {
        let mut res = ResponseWriter::new(Vec::new());
        res.write_status_line(status).await.unwrap();
        assert_eq!(output(&res), line);
    }
}

#[tokio::test]
async fn headers_before_status_line() {
    let mut res = ResponseWriter::new(Vec::new());
    assert_order!(res.write_headers(&Headers::new()), Headers, StatusLineWritten, Initial);
    assert_eq!(res.state(), WriteState::Initial);
    assert!(res.get_ref().is_empty());
    assert!(!res.is_committed());
}

#[tokio::test]
async fn out_of_order_writes() {
    let mut res = ResponseWriter::new(Vec::new());
    assert_order!(res.write_body(b"body"), Body, HeadersWritten, Initial);
    assert_order!(res.write_chunk(b"body"), Chunk, HeadersWritten, Initial);
    assert_order!(res.write_chunked_done(), ChunkedDone, HeadersWritten, Initial);

    res.write_status_line(StatusCode::OK).await.unwrap();
    assert_order!(res.write_status_line(StatusCode::OK), StatusLine, Initial, StatusLineWritten);

    res.write_headers(&Headers::new()).await.unwrap();
    let written = res.get_ref().len();

    assert_order!(res.write_trailers(&Headers::new()), Trailers, BodyWritten, HeadersWritten);
    assert_order!(res.write_headers(&Headers::new()), Headers, StatusLineWritten, HeadersWritten);
    assert_eq!(res.get_ref().len(), written);
}

#[tokio::test]
async fn body_then_trailers_is_terminal() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    res.write_body(b"").await.unwrap();
    res.write_trailers(&Headers::new()).await.unwrap();
    assert_eq!(res.state(), WriteState::TrailersWritten);

    assert_order!(res.write_body(b"more"), Body, HeadersWritten, TrailersWritten);
    assert_order!(res.write_trailers(&Headers::new()), Trailers, BodyWritten, TrailersWritten);
}

#[tokio::test]
async fn chunked_frames() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    let head = res.get_ref().len();

    res.write_chunk(b"abc").await.unwrap();
    res.write_chunk(b"de").await.unwrap();
    assert_eq!(res.state(), WriteState::HeadersWritten);
    res.write_chunked_done().await.unwrap();
    assert_eq!(res.state(), WriteState::BodyWritten);

    assert_eq!(&res.get_ref()[head..], b"3\r\nabc\r\n2\r\nde\r\n0\r\n");

    let mut body = BytesMut::from(&res.get_ref()[head..]);
    let mut decoder = Decoder::new();
    let mut decoded = Vec::new();
    while let ParseResult::Ok(Some(chunk)) = decoder.decode(&mut body) {
        decoded.extend_from_slice(&chunk);
    }
    assert_eq!(decoded, b"abcde");
}

#[tokio::test]
async fn chunked_hex_length() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    let head = res.get_ref().len();

    res.write_chunk(&[b'x'; 1024]).await.unwrap();
    res.write_chunk(b"").await.unwrap();

    assert!(res.get_ref()[head..].starts_with(b"400\r\nxxx"));
    assert_eq!(res.get_ref().len() - head, 5 + 1024 + 2);
}

#[tokio::test]
async fn empty_chunk_keeps_plain_body() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&default_headers(5, "text/plain")).await.unwrap();
    let head = res.get_ref().len();

    res.write_chunk(b"").await.unwrap();
    assert!(!res.is_chunked());
    assert_eq!(res.get_ref().len(), head);

    res.write_body(b"hello").await.unwrap();
    res.finish().await.unwrap();
    assert_eq!(&res.get_ref()[head..], b"hello");
}

#[tokio::test]
async fn chunked_with_trailers() {
    let mut headers = default_headers(0, "application/json");
    headers.remove("content-length");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailers", "X-Content-Length");

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", "5");

    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&headers).await.unwrap();
    res.write_chunk(b"hello").await.unwrap();
    res.write_chunked_done().await.unwrap();
    res.write_trailers(&trailers).await.unwrap();
    res.finish().await.unwrap();

    assert_eq!(
        output(&res),
        "HTTP/1.1 200 OK\r\n\
         connection: close\r\n\
         content-type: application/json\r\n\
         transfer-encoding: chunked\r\n\
         trailers: X-Content-Length\r\n\
         \r\n\
         5\r\nhello\r\n\
         0\r\n\
         x-content-length: 5\r\n\
         \r\n"
    );
}

#[tokio::test]
async fn finish_terminates_chunked_body() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    let head = res.get_ref().len();
    res.write_chunk(b"abc").await.unwrap();
    res.write_chunked_done().await.unwrap();
    res.finish().await.unwrap();

    assert_eq!(res.state(), WriteState::TrailersWritten);
    assert_eq!(&res.get_ref()[head..], b"3\r\nabc\r\n0\r\n\r\n");

    let mut body = BytesMut::from(&res.get_ref()[head..]);
    let mut decoder = Decoder::new();
    assert_eq!(decoder.decode(&mut body), ParseResult::Ok(Some(bytes::Bytes::from_static(b"abc"))));
    assert_eq!(decoder.decode(&mut body), ParseResult::Ok(None));
    assert!(decoder.is_eof());
    assert!(body.is_empty());
}

#[tokio::test]
async fn finish_incomplete() {
    let mut res = ResponseWriter::new(Vec::new());
    assert!(matches!(res.finish().await, Err(WriteError::Incomplete(WriteState::Initial))));

    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    res.finish().await.unwrap();

    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    res.write_chunk(b"abc").await.unwrap();
    assert!(matches!(res.finish().await, Err(WriteError::Incomplete(WriteState::HeadersWritten))));
}

#[tokio::test]
async fn mixed_body() {
    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&Headers::new()).await.unwrap();
    res.write_chunk(b"abc").await.unwrap();

    let err = res.write_body(b"plain").await.unwrap_err();
    assert!(matches!(err, WriteError::MixedBody));
    assert!(err.is_order());
}

#[test]
fn default_headers_fields() {
    let headers = default_headers(42, "text/html");
    assert_eq!(headers.len(), 3);
    assert_eq!(headers.get("Content-Length"), Some("42"));
    assert_eq!(headers.get("connection"), Some("close"));
    assert_eq!(headers.get("content-type"), Some("text/html"));
}

#[tokio::test]
async fn fields_cannot_break_lines() {
    let mut headers = Headers::new();
    headers.set("X-A", "v\r\nInjected: yes");
    headers.set("Bad Name", "x");
    headers.set("X-B", "ok");

    let mut res = ResponseWriter::new(Vec::new());
    res.write_status_line(StatusCode::OK).await.unwrap();
    res.write_headers(&headers).await.unwrap();

    assert_eq!(
        output(&res),
        "HTTP/1.1 200 OK\r\n\
         x-a: v  Injected: yes\r\n\
         x-b: ok\r\n\
         \r\n"
    );
}

#[tokio::test]
async fn io_error_fails_writer() {
    let mut res = ResponseWriter::new(LimitedSink { limit: 10, ..Default::default() });

    let err = res.write_status_line(StatusCode::OK).await.unwrap_err();
    assert!(matches!(err, WriteError::Io(_)), "{err:?}");
    assert_eq!(res.state(), WriteState::Failed);
    assert!(res.is_committed());

    assert_order!(res.write_status_line(StatusCode::OK), StatusLine, Initial, Failed);
    assert_order!(res.write_headers(&Headers::new()), Headers, StatusLineWritten, Failed);
    assert!(matches!(res.finish().await, Err(WriteError::Incomplete(WriteState::Failed))));

    assert_eq!(res.get_ref().written, b"HTTP/1.1 2");
}
