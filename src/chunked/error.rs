use crate::h1::ParseError;

/// Chunked body decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkedError {
    /// Chunk size line is not a hexadecimal number.
    InvalidSize,
    /// Chunk data is not followed by CRLF.
    InvalidSeparator,
    /// Chunk size does not fit.
    TooLarge,
    /// Malformed trailer field.
    InvalidTrailer(ParseError),
}

impl std::error::Error for ChunkedError {}

impl std::fmt::Display for ChunkedError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidSize => f.write_str("invalid chunk size"),
            Self::InvalidSeparator => f.write_str("invalid chunk separator"),
            Self::TooLarge => f.write_str("chunk too large"),
            Self::InvalidTrailer(err) => write!(f, "invalid trailer: {err}"),
        }
    }
}
