use std::num::NonZeroU16;

/// HTTP [Status Code][rfc].
///
/// Only the codes declared below can be constructed, each carrying its canonical reason phrase.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(NonZeroU16);

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::OK
    }
}

macro_rules! status_code {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self(NonZeroU16::new($int).unwrap());
            )*

            /// Returns status code matching the numeric value, if it is a known code.
            pub const fn from_u16(status: u16) -> Option<Self> {
                match status {
                    $(
                        $int => Some(Self::$id),
                    )*
                    _ => None,
                }
            }

            /// Returns status code value, e.g: `200`.
            #[inline]
            pub const fn status(&self) -> u16 {
                self.0.get()
            }

            /// Returns status code and reason phrase, e.g: `"200 OK"`.
            #[inline]
            pub const fn as_str(&self) -> &'static str {
                match self.0.get() {
                    $(
                        $int => concat!(stringify!($int), " ", $msg),
                    )*
                    _ => unreachable!(),
                }
            }

            /// Returns reason phrase, e.g: `"OK"`.
            #[inline]
            pub const fn message(&self) -> &'static str {
                match self.0.get() {
                    $(
                        $int => $msg,
                    )*
                    _ => unreachable!(),
                }
            }
        }
    };
}

status_code! {
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `400`. The server cannot or will not process the request due to something that is
    /// perceived to be a client error.
    400 BAD_REQUEST "Bad Request";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `405`. The request method is known by the server but is not supported by the target
    /// resource.
    405 METHOD_NOT_ALLOWED "Method Not Allowed";
    /// `413`. The request is larger than limits defined by server.
    413 CONTENT_TOO_LARGE "Content Too Large";
    /// `431`. The server is unwilling to process the request because its header fields are too
    /// large.
    431 REQUEST_HEADER_FIELDS_TOO_LARGE "Request Header Fields Too Large";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
    /// `502`. The server, while working as a gateway, got an invalid response.
    502 BAD_GATEWAY "Bad Gateway";
    /// `505`. The HTTP version used in the request is not supported by the server.
    505 HTTP_VERSION_NOT_SUPPORTED "HTTP Version Not Supported";
}

impl StatusCode {
    /// Returns `true` for `4xx` and `5xx` codes.
    #[inline]
    pub const fn is_error(&self) -> bool {
        self.0.get() >= 400
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.as_str()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::StatusCode;

    #[test]
    fn reason_phrases() {
        assert_eq!(StatusCode::OK.as_str(), "200 OK");
        assert_eq!(StatusCode::BAD_REQUEST.as_str(), "400 Bad Request");
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.message(), "Internal Server Error");
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.status(), 500);
        assert_eq!(StatusCode::from_u16(404), Some(StatusCode::NOT_FOUND));
        assert_eq!(StatusCode::from_u16(299), None);
        assert!(StatusCode::BAD_GATEWAY.is_error());
        assert!(!StatusCode::default().is_error());
    }
}
