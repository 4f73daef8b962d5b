//! The event receiver a [`crate::request::HttpRequestParser`] or
//! [`crate::response::HttpResponseParser`] drives as it parses.

/// Receives parse events as a message is fed through `feed_data`.
///
/// Every method has a no-op default, standing in for the reference parser's dynamic attribute
/// lookup (a sink there may simply not define a given callback). A sink that implements none of
/// these methods — `()` — is a valid, fully functional no-op sink.
///
/// All byte slices passed to these methods borrow from the buffer given to the triggering
/// `feed_data` call and are only valid for the duration of the call.
pub trait Sink {
    /// Error type a callback may fail with. Propagated to the caller of `feed_data` wrapped in
    /// [`crate::error::HttpParserError::CallbackFailure`].
    type Error;

    /// Fired once per message, at the first byte of the start-line.
    fn on_message_begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired exactly once for a request, with the raw (undecoded) request-target bytes.
    fn on_url(&mut self, _url: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired exactly once for a response, with the reason-phrase bytes.
    fn on_status(&mut self, _status: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired once per complete header field (after obs-fold continuations are joined).
    fn on_header(&mut self, _name: &[u8], _value: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired exactly once, after the last header (or trailer, for chunked bodies) is delivered.
    fn on_headers_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired zero or more times with a slice of body payload. For chunked bodies, only
    /// de-chunked payload is ever passed here; chunk framing bytes are never exposed.
    fn on_body(&mut self, _body: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired once per chunk, immediately after its chunk-size line is parsed.
    fn on_chunk_header(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired once per chunk, immediately after its trailing CRLF is consumed.
    fn on_chunk_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Fired exactly once per message, after the body (if any) is fully consumed.
    fn on_message_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The null sink: every event is a no-op.
impl Sink for () {
    type Error = core::convert::Infallible;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unit_sink_accepts_every_event() {
        let mut sink = ();
        sink.on_message_begin().unwrap();
        sink.on_url(b"/").unwrap();
        sink.on_status(b"OK").unwrap();
        sink.on_header(b"Host", b"example.com").unwrap();
        sink.on_headers_complete().unwrap();
        sink.on_body(b"x").unwrap();
        sink.on_chunk_header().unwrap();
        sink.on_chunk_complete().unwrap();
        sink.on_message_complete().unwrap();
    }
}
