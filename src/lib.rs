//! Incremental, callback-driven parser for HTTP/1.x wire messages, plus a standalone
//! request-target URL parser.
//!
//! [`request::HttpRequestParser`] and [`response::HttpResponseParser`] drive a caller-supplied
//! [`sink::Sink`] as bytes arrive in arbitrary fragments; neither ever buffers a whole message.
//! [`url::parse_url`] is a separate, pure function that splits a request-target into its
//! components without normalizing them.

#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_lifetimes)]
#![deny(missing_docs)]

extern crate alloc;

#[macro_use]
extern crate log;

mod chunk;
pub mod error;
mod framing;
mod header;
pub mod method;
mod parser;
pub mod request;
pub mod response;
pub mod sink;
pub mod url;
pub mod version;

pub use error::HttpParserError;
pub use method::Method;
pub use request::HttpRequestParser;
pub use response::HttpResponseParser;
pub use sink::Sink;
pub use url::{parse_url, UrlComponents, UrlError};
pub use version::HttpVersion;
