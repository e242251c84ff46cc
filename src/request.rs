//! HTTP Request.
use crate::headers::Headers;

/// HTTP request line, e.g: `GET /index.html HTTP/1.1`.
///
/// Parsed by [`RequestLine::parse_chunk`], immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub(crate) method: String,
    pub(crate) target: String,
    pub(crate) version: String,
}

impl RequestLine {
    /// Returns the method, e.g: `"GET"`.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request target as sent by the client, e.g: `"/index.html?q=1"`.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the version without the `HTTP/` prefix, always `"1.1"`.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Display for RequestLine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} HTTP/{}", self.method, self.target, self.version)
    }
}

/// HTTP Request.
///
/// Only produced once the whole header block has been parsed.
#[derive(Debug, Clone)]
pub struct Request {
    line: RequestLine,
    headers: Headers,
}

impl Request {
    pub(crate) fn new(line: RequestLine, headers: Headers) -> Self {
        Self { line, headers }
    }

    /// Returns the request line.
    #[inline]
    pub fn line(&self) -> &RequestLine {
        &self.line
    }

    /// Returns the method.
    #[inline]
    pub fn method(&self) -> &str {
        self.line.method()
    }

    /// Returns the request target.
    #[inline]
    pub fn target(&self) -> &str {
        self.line.target()
    }

    /// Returns the version, without the `HTTP/` prefix.
    #[inline]
    pub fn version(&self) -> &str {
        self.line.version()
    }

    /// Returns the header fields.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Destruct into request line and headers.
    #[inline]
    pub fn into_parts(self) -> (RequestLine, Headers) {
        (self.line, self.headers)
    }
}
