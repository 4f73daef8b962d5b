//! The public response-side entry point: [`HttpResponseParser`].

use crate::error::Result;
use crate::parser::{Kind, Parser};
use crate::sink::Sink;
use crate::version::HttpVersion;

/// Incremental parser for an HTTP/1.x response message.
///
/// See [`crate::request::HttpRequestParser`] for the shared fragmentation, zero-copy, and
/// reentrancy contract; this type is its response-side twin.
pub struct HttpResponseParser<S: Sink> {
    inner: Parser<S>,
}

impl<S: Sink> HttpResponseParser<S> {
    /// Construct a parser for one response, or a pipelined sequence of responses on the same
    /// connection, driving `sink`.
    pub fn new(sink: S) -> Self {
        HttpResponseParser {
            inner: Parser::new(Kind::Response, sink),
        }
    }

    /// Feed the next fragment of the wire stream. See
    /// [`HttpRequestParser::feed_data`][crate::request::HttpRequestParser::feed_data] for the
    /// full contract.
    pub fn feed_data(&mut self, bytes: &[u8]) -> Result<(), S::Error> {
        self.inner.feed_data(bytes)
    }

    /// The response's HTTP version, once the status-line has been parsed.
    pub fn get_http_version(&self) -> Option<HttpVersion> {
        self.inner.version()
    }

    /// The response's status code, once the status-line has been parsed.
    pub fn get_status_code(&self) -> Option<u16> {
        self.inner.status_code()
    }

    /// Whether the connection should be kept alive, once headers are complete. `None` before
    /// that point.
    pub fn should_keep_alive(&self) -> Option<bool> {
        self.inner.should_keep_alive()
    }

    /// Whether this message is a protocol upgrade response (a `101` status), once headers are
    /// complete. `None` before that point.
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
    fn parses_simple_response() {
        let mut p = HttpResponseParser::new(());
        p.feed_data(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi")
            .unwrap();
        assert_eq!(p.get_status_code(), Some(200));
        assert_eq!(p.get_http_version(), Some(HttpVersion::HTTP_11));
    }

    #[test]
    fn rejects_out_of_range_status() {
        let mut p = HttpResponseParser::new(());
        let err = p.feed_data(b"HTTP/1.1 1299 FOOSPAM\r\n").unwrap_err();
        assert_eq!(err, HttpParserError::InvalidStatus);
    }

    #[test]
    fn no_content_length_on_1_1_response_means_eof_framing() {
        let mut p = HttpResponseParser::new(());
        p.feed_data(b"HTTP/1.1 200 OK\r\n\r\nhello").unwrap();
        // EOF framing: should_keep_alive is still well-defined once headers are complete, even
        // though the body itself only ends when the connection closes.
        assert_eq!(p.should_keep_alive(), Some(true));
    }

    #[test]
    fn response_101_signals_upgrade() {
        let mut p = HttpResponseParser::new(());
        let err = p
            .feed_data(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\n\r\ntail")
            .unwrap_err();
        assert!(matches!(err, HttpParserError::UpgradeDetected(_)));
    }
}
