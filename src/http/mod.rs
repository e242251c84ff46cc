//! HTTP protocol primitives.
mod status;

pub use status::StatusCode;

/// The only protocol version this crate speaks, as written on the wire.
pub const HTTP_11: &str = "HTTP/1.1";
