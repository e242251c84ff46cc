//! HTTP header fields.
//!
//! [`Headers`] maps lower-cased field names to their value. Repeated fields are folded into a
//! single comma separated value in arrival order.
//!
//! Incremental parsing of a header block lives in [`Headers::parse_line`], which consumes at most
//! one line per call, see [`h1::parser`][crate::h1::parser] for the request side of it.
mod map;
mod iter;

pub use map::Headers;
pub use iter::Iter;
