use std::io;

use super::parser::ParseError;
use crate::http::StatusCode;

/// Error reading a request from a connection.
#[derive(Debug)]
pub enum RequestError {
    /// Malformed request line or header line.
    Parse(ParseError),
    /// The stream ended before the header block was complete.
    Truncated,
    /// The header section exceeds the configured limit.
    TooLarge,
    /// IO error on the underlying stream.
    Io(io::Error),
}

impl RequestError {
    /// Returns the status code a server should respond with, if any.
    ///
    /// IO errors return `None`, the peer is unlikely to receive a response anyway.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Parse(_) | Self::Truncated => Some(StatusCode::BAD_REQUEST),
            Self::TooLarge => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            Self::Io(_) => None,
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Truncated | Self::TooLarge => None,
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "parse error: {err}"),
            Self::Truncated => f.write_str("truncated request: stream ended before request was fully parsed"),
            Self::TooLarge => f.write_str("request header section too large"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl From<ParseError> for RequestError {
    #[inline]
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<io::Error> for RequestError {
    #[inline]
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
