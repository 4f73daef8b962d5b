//! The closed error taxonomy shared by the message parser and the standalone URL parser.

use core::fmt;

use crate::url::UrlError;

/// Errors raised while feeding bytes to a [`crate::request::HttpRequestParser`] or
/// [`crate::response::HttpResponseParser`], or while calling [`crate::url::parse_url`].
///
/// `E` is the error type a [`crate::sink::Sink`] implementation may return from its callbacks;
/// it is carried unchanged inside [`HttpParserError::CallbackFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HttpParserError<E> {
    /// Start-line method token is not a recognized HTTP method.
    InvalidMethod,

    /// Malformed request-target or malformed standalone URL.
    InvalidUrl(UrlError),

    /// Response status code is not exactly three digits in `100..=599`.
    InvalidStatus,

    /// `HTTP/<digit>.<digit>` token is malformed.
    InvalidVersion,

    /// `Content-Length` is not a valid non-negative integer, or conflicts with a prior one.
    InvalidContentLength,

    /// Chunk-size line is not valid hex, or overflows 64 bits.
    InvalidChunkSize,

    /// Illegal byte in a header field-name or field-value.
    InvalidHeaderToken,

    /// `feed_data` called with non-empty input after the message already completed.
    DataAfterCompleted,

    /// A sink callback failed; the original cause is carried here.
    CallbackFailure(E),

    /// Not an error: parsing stopped because the message requested a protocol upgrade.
    ///
    /// The payload is the offset, into the buffer passed to the triggering `feed_data` call, of
    /// the first byte not consumed by the parser.
    UpgradeDetected(usize),

    /// `feed_data` or `parse_url` was given input that is not a valid byte sequence for this
    /// call (currently unused by this crate's own entry points, reserved for bindings that adapt
    /// a non-`&[u8]` input type).
    TypeError,
}

/// Result alias for fallible operations in this crate.
pub type Result<T, E> = core::result::Result<T, HttpParserError<E>>;

impl<E> From<UrlError> for HttpParserError<E> {
    fn from(value: UrlError) -> Self {
        HttpParserError::InvalidUrl(value)
    }
}

impl<E: fmt::Display> fmt::Display for HttpParserError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HttpParserError::*;
        match self {
            InvalidMethod => write!(f, "invalid method"),
            InvalidUrl(e) => write!(f, "invalid url: {}", e),
            InvalidStatus => write!(f, "invalid status"),
            InvalidVersion => write!(f, "invalid http version"),
            InvalidContentLength => write!(f, "invalid content-length"),
            InvalidChunkSize => write!(f, "invalid chunk size"),
            InvalidHeaderToken => write!(f, "invalid header token"),
            DataAfterCompleted => write!(f, "data received after message completed"),
            CallbackFailure(e) => write!(f, "callback failed: {}", e),
            UpgradeDetected(offset) => write!(f, "upgrade detected at offset {}", offset),
            TypeError => write!(f, "invalid input type"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for HttpParserError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HttpParserError::CallbackFailure(e) => Some(e),
            _ => None,
        }
    }
}
