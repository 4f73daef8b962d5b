//! The public request-side entry point: [`HttpRequestParser`].

use crate::error::Result;
use crate::method::Method;
use crate::parser::{Kind, Parser};
use crate::sink::Sink;
use crate::version::HttpVersion;

/// Incremental parser for an HTTP/1.x request message.
///
/// Construct with a [`Sink`] (use `()` for a no-op sink), then repeatedly call [`feed_data`][
/// Self::feed_data] with whatever fragments of the wire stream arrive. The parser never buffers a
/// whole message: it retains only enough state to resume across fragment boundaries and drives
/// event calls against the sink as grammar elements complete.
pub struct HttpRequestParser<S: Sink> {
    inner: Parser<S>,
}

impl<S: Sink> HttpRequestParser<S> {
    /// Construct a parser for one request, or a pipelined sequence of requests on the same
    /// connection, driving `sink`.
    pub fn new(sink: S) -> Self {
        HttpRequestParser {
            inner: Parser::new(Kind::Request, sink),
        }
    }

    /// Feed the next fragment of the wire stream.
    ///
    /// `bytes` may be any contiguous slice: a whole message, a single byte, or anything in
    /// between. On a protocol violation the parser transitions to a terminal failed state and
    /// every subsequent `feed_data` call fails. On upgrade detection this returns
    /// [`crate::error::HttpParserError::UpgradeDetected`] carrying the offset, into `bytes`, of
    /// the first byte of the tunnelled protocol; this is not an error condition, merely the
    /// signal that the parser stopped on purpose.
    pub fn feed_data(&mut self, bytes: &[u8]) -> Result<(), S::Error> {
        self.inner.feed_data(bytes)
    }

    /// The request's HTTP version, once the start-line has been parsed.
    pub fn get_http_version(&self) -> Option<HttpVersion> {
        self.inner.version()
    }

    /// The request's method, once the start-line has been parsed.
    pub fn get_method(&self) -> Option<Method> {
        self.inner.method()
    }

    /// Whether the connection should be kept alive, once headers are complete. `None` before
    /// that point.
    pub fn should_keep_alive(&self) -> Option<bool> {
        self.inner.should_keep_alive()
    }

    /// Whether this message is a protocol upgrade request, once headers are complete. `None`
    /// before that point.
    pub fn should_upgrade(&self) -> Option<bool> {
        self.inner.should_upgrade()
    }

    /// A shared reference to the sink, for callers that want to inspect accumulated state
    /// between `feed_data` calls.
    pub fn sink(&self) -> &S {
        self.inner.sink()
    }

    /// A mutable reference to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        self.inner.sink_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HttpParserError;

    #[test]
    fn parses_simple_get() {
        let mut p = HttpRequestParser::new(());
        p.feed_data(b"GET /foo HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .unwrap();
        assert_eq!(p.get_method(), Some(Method::Get));
        assert_eq!(p.get_http_version(), Some(HttpVersion::HTTP_11));
        assert_eq!(p.should_keep_alive(), Some(true));
    }

    #[test]
    fn rejects_unknown_method() {
        let mut p = HttpRequestParser::new(());
        let err = p.feed_data(b"SPAM /x HTTP/1.1\r\n").unwrap_err();
        assert_eq!(err, HttpParserError::InvalidMethod);
    }

    #[test]
    fn rejects_empty_target() {
        let mut p = HttpRequestParser::new(());
        let err = p.feed_data(b"POST  HTTP/1.1\r\n").unwrap_err();
        assert!(matches!(err, HttpParserError::InvalidUrl(_)));
    }

    #[test]
    fn data_after_completed_fails_when_not_keep_alive() {
        let mut p = HttpRequestParser::new(());
        p.feed_data(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n")
            .unwrap();
        let err = p.feed_data(b"x").unwrap_err();
        assert_eq!(err, HttpParserError::DataAfterCompleted);
    }

    #[test]
    fn pipelines_keep_alive_requests_on_one_parser() {
        let mut p = HttpRequestParser::new(());
        p.feed_data(b"GET /a HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(p.get_method(), Some(Method::Get));
        p.feed_data(b"POST /b HTTP/1.1\r\nContent-Length: 0\r\n\r\n")
            .unwrap();
        assert_eq!(p.get_method(), Some(Method::Post));
    }
}
