use super::ParseError;
use crate::common::{CRLF, ParseResult, split_line};
use crate::headers::Headers;
use crate::matches;

/// A single line consumed by [`Headers::parse_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// A `name: value` field was consumed.
    Field {
        /// Bytes consumed, including the CRLF.
        consumed: usize,
    },
    /// The empty line terminating the header block was consumed.
    End,
}

impl Line {
    /// Returns the number of bytes consumed by this line.
    #[inline]
    pub const fn consumed(&self) -> usize {
        match self {
            Self::Field { consumed } => *consumed,
            Self::End => CRLF.len(),
        }
    }

    /// Returns `true` if this line terminates the header block.
    #[inline]
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

impl Headers {
    /// Parse a single header line from the start of `bytes` into the map.
    ///
    /// At most one line is consumed per call. Returns [`ParseResult::Pending`] when `bytes` does
    /// not contain a complete line yet, and [`Line::End`] on the empty line ending the block.
    ///
    /// On error nothing is consumed and the map is left unchanged.
    ///
    /// ```rust
    /// use tcphttp::{Headers, ParseResult, h1::parser::Line};
    ///
    /// let mut headers = Headers::new();
    /// let line = headers.parse_line(b"Host: localhost:42069\r\n\r\n");
    /// assert_eq!(line, ParseResult::Ok(Line::Field { consumed: 23 }));
    /// assert_eq!(headers.get("host"), Some("localhost:42069"));
    /// ```
    pub fn parse_line(&mut self, bytes: &[u8]) -> ParseResult<Line, ParseError> {
        use ParseResult as Result;

        let Some(line) = split_line(bytes) else {
            return Result::Pending;
        };

        if line.is_empty() {
            return Result::Ok(Line::End);
        }

        let Some(colon) = line.iter().position(|&byte| byte == b':') else {
            return Result::Err(ParseError::InvalidHeader);
        };

        let (name, value) = (&line[..colon], &line[colon + 1..]);

        let start = name
            .iter()
            .position(|&byte| !matches::is_leading_ws(byte))
            .unwrap_or(name.len());
        let name = &name[start..];

        if name.is_empty() || !name.iter().all(|&byte| matches::is_token(byte)) {
            return Result::Err(ParseError::InvalidHeaderName);
        }

        let Ok(value) = std::str::from_utf8(value.trim_ascii()) else {
            return Result::Err(ParseError::InvalidHeaderValue);
        };

        // token bytes are ASCII
        let name = String::from_utf8_lossy(name);
        self.append(&name, value);

        Result::Ok(Line::Field {
            consumed: line.len() + CRLF.len(),
        })
    }
}
