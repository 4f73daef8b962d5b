//! Resolves how a message's body is delimited, once the header section is complete.

use crate::error::{HttpParserError, Result};
use crate::method::Method;
use crate::version::HttpVersion;

/// How the body of a message is delimited, resolved once headers are complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Framing {
    /// No body at all (`Content-Length: 0` is folded into this).
    NoBody,
    /// `Content-Length: n`.
    LengthDelimited(u64),
    /// `Transfer-Encoding: chunked`.
    Chunked,
    /// No framing header present; read until the connection closes.
    Eof,
}

/// Header values relevant to framing, accumulated while the header section is scanned. Also
/// tracks whether any `Connection` token requested an upgrade, needed for upgrade detection once
/// headers are complete.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FramingInputs {
    pub(crate) content_length: Option<u64>,
    pub(crate) duplicate_content_length: bool,
    pub(crate) chunked: bool,
    pub(crate) connection_close: bool,
    pub(crate) connection_keep_alive: bool,
    pub(crate) connection_upgrade: bool,
    pub(crate) has_upgrade_header: bool,
}

impl FramingInputs {
    pub(crate) fn observe_header(&mut self, name: &[u8], value: &[u8]) {
        if eq_ignore_case(name, b"content-length") {
            match parse_u64(value) {
                Some(v) => {
                    if self.content_length.is_some() && self.content_length != Some(v) {
                        self.duplicate_content_length = true;
                    }
                    self.content_length = Some(v);
                }
                None => self.duplicate_content_length = true,
            }
        } else if eq_ignore_case(name, b"transfer-encoding") {
            if contains_token_ci(value, b"chunked") {
                self.chunked = true;
            }
        } else if eq_ignore_case(name, b"connection") {
            if contains_token_ci(value, b"close") {
                self.connection_close = true;
            }
            if contains_token_ci(value, b"keep-alive") {
                self.connection_keep_alive = true;
            }
            if contains_token_ci(value, b"upgrade") {
                self.connection_upgrade = true;
            }
        } else if eq_ignore_case(name, b"upgrade") {
            self.has_upgrade_header = true;
        }
    }

    pub(crate) fn should_upgrade(&self, status_code: Option<u16>) -> bool {
        if status_code == Some(101) {
            return true;
        }
        self.connection_upgrade && self.has_upgrade_header
    }
}

/// Resolves framing for a request, following RFC 7230's chunked-overrides-content-length
/// priority and rejecting methods that must not carry a body (`CONNECT`).
pub(crate) fn resolve_request<E>(
    method: Method,
    inputs: &FramingInputs,
) -> Result<Framing, E> {
    if !method.has_request_body() {
        return Ok(Framing::NoBody);
    }
    header_defined(inputs)
}

/// Resolves framing for a response, following RFC 2616 §4.3's body-presence rules (HEAD,
/// successful CONNECT, 1xx, 204, 304 never carry a body) before falling back to the same
/// chunked/content-length/eof priority used for requests.
pub(crate) fn resolve_response<E>(
    version: HttpVersion,
    method: Option<Method>,
    status_code: u16,
    inputs: &FramingInputs,
) -> Result<Framing, E> {
    let is_success = (200..300).contains(&status_code);
    let is_informational = (100..200).contains(&status_code);

    let has_no_body = method == Some(Method::Head)
        || (is_success && method == Some(Method::Connect))
        || is_informational
        || matches!(status_code, 204 | 304);

    if has_no_body {
        return if version.is_http10() {
            Ok(Framing::Eof)
        } else {
            Ok(Framing::NoBody)
        };
    }

    header_defined(inputs)
}

fn header_defined<E>(inputs: &FramingInputs) -> Result<Framing, E> {
    if inputs.duplicate_content_length {
        return Err(HttpParserError::InvalidContentLength);
    }

    if inputs.chunked {
        return Ok(Framing::Chunked);
    }

    if let Some(len) = inputs.content_length {
        return Ok(if len == 0 {
            Framing::NoBody
        } else {
            Framing::LengthDelimited(len)
        });
    }

    Ok(Framing::Eof)
}

fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_ascii_lowercase() == *y)
}

fn contains_token_ci(value: &[u8], token: &[u8]) -> bool {
    value
        .split(|&b| b == b',')
        .map(trim_ascii)
        .any(|part| eq_ignore_case(part, token))
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace());
    let Some(start) = start else {
        return &[];
    };
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap();
    &bytes[start..=end]
}

fn parse_u64(bytes: &[u8]) -> Option<u64> {
    let bytes = trim_ascii(bytes);
    if bytes.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add((b - b'0') as u64)?;
    }
    Some(value)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chunked_overrides_content_length() {
        let mut inputs = FramingInputs::default();
        inputs.observe_header(b"Content-Length", b"10");
        inputs.observe_header(b"Transfer-Encoding", b"chunked");
        assert_eq!(
            resolve_request::<()>(Method::Post, &inputs).unwrap(),
            Framing::Chunked
        );
    }

    #[test]
    fn duplicate_content_length_is_an_error() {
        let mut inputs = FramingInputs::default();
        inputs.observe_header(b"Content-Length", b"10");
        inputs.observe_header(b"Content-Length", b"20");
        assert_eq!(
            resolve_request::<()>(Method::Post, &inputs).unwrap_err(),
            HttpParserError::InvalidContentLength
        );
    }

    #[test]
    fn connect_request_has_no_body() {
        let inputs = FramingInputs::default();
        assert_eq!(
            resolve_request::<()>(Method::Connect, &inputs).unwrap(),
            Framing::NoBody
        );
    }

    #[test]
    fn no_framing_header_on_response_means_eof() {
        let inputs = FramingInputs::default();
        assert_eq!(
            resolve_response::<()>(HttpVersion::HTTP_11, Some(Method::Get), 200, &inputs).unwrap(),
            Framing::Eof
        );
    }

    #[test]
    fn response_204_has_no_body() {
        let inputs = FramingInputs::default();
        assert_eq!(
            resolve_response::<()>(HttpVersion::HTTP_11, Some(Method::Get), 204, &inputs).unwrap(),
            Framing::NoBody
        );
    }

    #[test]
    fn upgrade_requires_both_tokens() {
        let mut inputs = FramingInputs::default();
        inputs.observe_header(b"Connection", b"Upgrade");
        inputs.observe_header(b"Upgrade", b"websocket");
        assert!(inputs.should_upgrade(None));
    }
}
