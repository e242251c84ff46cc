/// Result of an incremental parse over a byte slice.
///
/// [`Pending`] means the input does not contain a complete unit yet: nothing was consumed and the
/// caller should read more bytes and call again.
///
/// [`Pending`]: ParseResult::Pending
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult<T, E> {
    /// Bytes is not sufficient for parsing, more IO read is required.
    Pending,
    /// Parse success.
    Ok(T),
    /// Parse failed.
    Err(E),
}

impl<T, E> ParseResult<T, E> {
    /// Returns `true` if the parse result is [`Pending`].
    ///
    /// [`Pending`]: ParseResult::Pending
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if the parse result is [`Ok`].
    ///
    /// [`Ok`]: ParseResult::Ok
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(..))
    }

    /// Returns `true` if the parse result is [`Err`].
    ///
    /// [`Err`]: ParseResult::Err
    #[inline]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(..))
    }

    /// Maps the success value, leaving `Pending` and `Err` untouched.
    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ParseResult<U, E> {
        match self {
            Self::Pending => ParseResult::Pending,
            Self::Ok(ok) => ParseResult::Ok(f(ok)),
            Self::Err(err) => ParseResult::Err(err),
        }
    }

    /// Convert to `Result<Option<T>, E>`, where `None` is [`Pending`].
    ///
    /// [`Pending`]: ParseResult::Pending
    #[inline]
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Self::Pending => Ok(None),
            Self::Ok(ok) => Ok(Some(ok)),
            Self::Err(err) => Err(err),
        }
    }
}

/// Line terminator used throughout HTTP/1.1 framing.
pub(crate) const CRLF: &[u8; 2] = b"\r\n";

/// Returns the first CRLF terminated line in `bytes`, without the terminator.
///
/// Returns `None` if `bytes` does not contain a CRLF yet.
pub(crate) fn split_line(bytes: &[u8]) -> Option<&[u8]> {
    bytes
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .map(|end| &bytes[..end])
}
