use super::ParseError;
use crate::common::{CRLF, ParseResult, split_line};
use crate::matches;
use crate::request::RequestLine;

const VERSION_PREFIX: &[u8] = b"HTTP/";
const VERSION: &[u8] = b"1.1";

impl RequestLine {
    /// Parse request line from the start of `bytes`.
    ///
    /// On success returns the line and the number of bytes consumed, including the CRLF. Returns
    /// [`ParseResult::Pending`] if `bytes` does not hold a complete line yet.
    pub fn parse_chunk(bytes: &[u8]) -> ParseResult<(RequestLine, usize), ParseError> {
        match split_line(bytes) {
            Some(line) => parse_reqline(line).map(|reqline| (reqline, line.len() + CRLF.len())),
            None => ParseResult::Pending,
        }
    }
}

fn parse_reqline(line: &[u8]) -> ParseResult<RequestLine, ParseError> {
    use ParseResult as Result;

    let mut parts = line.split(|&byte| byte == b' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Result::Err(ParseError::InvalidRequestLine);
    };

    if method.is_empty() || !method.iter().all(|&byte| matches::is_method(byte)) {
        return Result::Err(ParseError::InvalidMethod);
    }

    let target = match std::str::from_utf8(target) {
        Ok(target) if !target.is_empty() => target,
        _ => return Result::Err(ParseError::InvalidTarget),
    };

    let version = match version.strip_prefix(VERSION_PREFIX) {
        Some(version) if version == VERSION => version,
        _ => return Result::Err(ParseError::UnsupportedVersion),
    };

    // method and version are checked ASCII
    Result::Ok(RequestLine {
        method: String::from_utf8_lossy(method).into_owned(),
        target: target.to_owned(),
        version: String::from_utf8_lossy(version).into_owned(),
    })
}
