//! HTTP/1.1 Parser.
//!
//! Every parser here works on a byte slice that may end in the middle of a line. When no complete
//! CRLF terminated line is available, the parser returns [`ParseResult::Pending`] (or `0` bytes
//! consumed) without side effects, the caller reads more bytes and calls again with the same
//! unconsumed prefix.
//!
//! - [`RequestLine::parse_chunk`] parses `METHOD SP TARGET SP HTTP/1.1 CRLF`.
//! - [`Headers::parse_line`] parses one `name: value CRLF` line, or the empty line ending the
//!   header block.
//! - [`RequestParser`] drives both through the request phases.
//!
//! [`ParseResult::Pending`]: crate::ParseResult::Pending
//! [`RequestLine::parse_chunk`]: crate::RequestLine::parse_chunk
//! [`Headers::parse_line`]: crate::Headers::parse_line
use std::mem;

use crate::headers::Headers;
use crate::log::trace;
use crate::request::{Request, RequestLine};

mod error;
mod header;
mod request;

pub use error::ParseError;
pub use header::Line;


/// Request parsing progress marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for the request line.
    Initialized,
    /// Request line parsed, consuming header lines.
    ParsingHeaders,
    /// Header block terminated, the request is complete.
    Done,
}

/// Resumable HTTP/1.1 request parser.
///
/// ```rust
/// use tcphttp::h1::parser::{ParseState, RequestParser};
///
/// let mut parser = RequestParser::new();
/// assert_eq!(parser.parse(b"GET / HT").unwrap(), 0);
/// assert_eq!(parser.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap(), 18);
/// assert_eq!(parser.state(), ParseState::Done);
///
/// let request = parser.into_request().unwrap();
/// assert_eq!(request.method(), "GET");
/// ```
#[derive(Debug, Default)]
pub struct RequestParser {
    phase: Phase,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Reqline,
    Headers {
        reqline: RequestLine,
        headers: Headers,
    },
    Done(Request),
}

impl RequestParser {
    /// Create new parser waiting for a request line.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current progress marker.
    pub fn state(&self) -> ParseState {
        match self.phase {
            Phase::Reqline => ParseState::Initialized,
            Phase::Headers { .. } => ParseState::ParsingHeaders,
            Phase::Done(_) => ParseState::Done,
        }
    }

    /// Returns `true` if the request is complete.
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Returns the parsed request line, if it is already available.
    pub fn request_line(&self) -> Option<&RequestLine> {
        match &self.phase {
            Phase::Reqline => None,
            Phase::Headers { reqline, .. } => Some(reqline),
            Phase::Done(request) => Some(request.line()),
        }
    }

    /// Parse as many complete lines of `bytes` as possible.
    ///
    /// Returns the number of bytes consumed, `0` means that more bytes are required. The caller
    /// must drop the consumed prefix before the next call.
    ///
    /// # Errors
    ///
    /// Returns error for a malformed request line or header line, and [`ParseError::AlreadyDone`]
    /// when called after the request is complete.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }

        let mut total = 0;
        while !self.is_done() {
            let read = self.parse_single(&bytes[total..])?;
            if read == 0 {
                break;
            }
            total += read;
        }
        Ok(total)
    }

    fn parse_single(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        match &mut self.phase {
            Phase::Reqline => {
                let Some((reqline, read)) = RequestLine::parse_chunk(bytes).into_result()? else {
                    return Ok(0);
                };
                trace!("request line: {} {} HTTP/{}", reqline.method(), reqline.target(), reqline.version());
                self.phase = Phase::Headers {
                    reqline,
                    headers: Headers::new(),
                };
                Ok(read)
            }
            Phase::Headers { headers, .. } => {
                let Some(line) = headers.parse_line(bytes).into_result()? else {
                    return Ok(0);
                };
                if line.is_end() {
                    self.complete();
                }
                Ok(line.consumed())
            }
            Phase::Done(_) => Err(ParseError::AlreadyDone),
        }
    }

    fn complete(&mut self) {
        if let Phase::Headers { reqline, headers } = mem::take(&mut self.phase) {
            self.phase = Phase::Done(Request::new(reqline, headers));
        }
    }

    /// Consume the parser, returning the request if parsing is complete.
    pub fn into_request(self) -> Option<Request> {
        match self.phase {
            Phase::Done(request) => Some(request),
            _ => None,
        }
    }
}
