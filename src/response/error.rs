use std::io;

use super::WriteState;

/// Response writing operation, used to report ordering violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    StatusLine,
    Headers,
    Body,
    Chunk,
    ChunkedDone,
    Trailers,
}

impl WriteOp {
    /// Returns the state the operation is legal from, and the state it leads to.
    pub(crate) const fn transition(self) -> (WriteState, WriteState) {
        use WriteState as S;
        match self {
            Self::StatusLine => (S::Initial, S::StatusLineWritten),
            Self::Headers => (S::StatusLineWritten, S::HeadersWritten),
            Self::Body => (S::HeadersWritten, S::BodyWritten),
            Self::Chunk => (S::HeadersWritten, S::HeadersWritten),
            Self::ChunkedDone => (S::HeadersWritten, S::BodyWritten),
            Self::Trailers => (S::BodyWritten, S::TrailersWritten),
        }
    }

    const fn as_str(&self) -> &'static str {
        match self {
            Self::StatusLine => "status line",
            Self::Headers => "headers",
            Self::Body => "body",
            Self::Chunk => "chunk",
            Self::ChunkedDone => "last chunk",
            Self::Trailers => "trailers",
        }
    }
}

impl std::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error writing a response.
#[derive(Debug)]
pub enum WriteError {
    /// Operation called out of order, nothing was written.
    Order {
        op: WriteOp,
        expected: WriteState,
        found: WriteState,
    },
    /// Plain body written after chunks, or chunks after a plain body.
    MixedBody,
    /// Response ended before it was complete.
    Incomplete(WriteState),
    /// IO error on the underlying sink.
    Io(io::Error),
}

impl WriteError {
    /// Returns `true` for ordering violations, which are bugs in the caller.
    #[inline]
    pub fn is_order(&self) -> bool {
        matches!(self, Self::Order { .. } | Self::MixedBody)
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Order { op, expected, found } => {
                write!(f, "cannot write {op} after {found}, expected {expected}")
            }
            Self::MixedBody => f.write_str("cannot mix plain and chunked body"),
            Self::Incomplete(state) => write!(f, "response incomplete after {state}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl From<io::Error> for WriteError {
    #[inline]
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
