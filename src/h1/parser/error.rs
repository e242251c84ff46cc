/// HTTP parsing error.
///
/// Every variant is fatal for the connection that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not made of exactly three space separated parts.
    InvalidRequestLine,
    /// Method is empty or contains a byte other than an upper case letter.
    InvalidMethod,
    /// Request target is empty or not valid UTF-8.
    InvalidTarget,
    /// Version is anything other than `HTTP/1.1`.
    UnsupportedVersion,
    /// Header line has no colon.
    InvalidHeader,
    /// Header name is empty or contains a non token byte.
    InvalidHeaderName,
    /// Header value is not valid UTF-8.
    InvalidHeaderValue,
    /// Parser is called again after the header block is complete.
    AlreadyDone,
}

impl ParseError {
    const fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequestLine => "invalid request line",
            Self::InvalidMethod => "invalid method",
            Self::InvalidTarget => "invalid request target",
            Self::UnsupportedVersion => "unsupported version",
            Self::InvalidHeader => "invalid header line",
            Self::InvalidHeaderName => "invalid header name",
            Self::InvalidHeaderValue => "invalid header value",
            Self::AlreadyDone => "request already parsed",
        }
    }
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
