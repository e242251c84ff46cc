//! HTTP/1.1 Server Toolkit
//!
//! A minimal HTTP/1.1 implementation on top of raw TCP: an incremental request parser, an order
//! enforcing response writer with chunked coding and trailers, and a single request per
//! connection server.
#![warn(missing_debug_implementations)]
#![cfg_attr(not(feature = "log"), allow(unused_variables))]

mod log;
mod common;
mod matches;

pub mod http;
pub mod headers;
pub mod h1;
pub mod request;
pub mod response;
pub mod chunked;
pub mod server;

pub use common::ParseResult;
pub use headers::Headers;
pub use http::StatusCode;
pub use request::{Request, RequestLine};
pub use response::ResponseWriter;
pub use server::{Config, Handler, Server};
