//! The closed set of HTTP methods a request start-line may use.

use core::fmt;

/// A recognized HTTP request method.
///
/// This is the full historical method set (common verbs plus WebDAV, versioning and a handful
/// of feed-protocol extensions), not just the nine verbs in RFC 7230. See `DESIGN.md` for why
/// there is no separate "strict" subset: a caller that wants to reject the extended verbs can do
/// so itself by matching on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// `PATCH`
    Patch,
    /// `PROPFIND`
    PropFind,
    /// `PROPPATCH`
    PropPatch,
    /// `MKCOL`
    MkCol,
    /// `COPY`
    Copy,
    /// `MOVE`
    Move,
    /// `LOCK`
    Lock,
    /// `UNLOCK`
    Unlock,
    /// `VERSION-CONTROL`
    VersionControl,
    /// `REPORT`
    Report,
    /// `CHECKOUT`
    Checkout,
    /// `MERGE`
    Merge,
    /// `MSEARCH`
    MSearch,
    /// `NOTIFY`
    Notify,
    /// `SUBSCRIBE`
    Subscribe,
    /// `UNSUBSCRIBE`
    Unsubscribe,
    /// `PURGE`
    Purge,
    /// `MKCALENDAR`
    MkCalendar,
    /// `LINK`
    Link,
    /// `UNLINK`
    Unlink,
    /// `SOURCE`
    Source,
}

impl Method {
    /// Parse a method token as it appears on a request start-line.
    ///
    /// Matches the whole token exactly; no case-insensitivity, as method tokens are case
    /// sensitive per RFC 7230.
    pub fn parse(token: &[u8]) -> Option<Self> {
        use Method::*;
        Some(match token {
            b"GET" => Get,
            b"HEAD" => Head,
            b"POST" => Post,
            b"PUT" => Put,
            b"DELETE" => Delete,
            b"CONNECT" => Connect,
            b"OPTIONS" => Options,
            b"TRACE" => Trace,
            b"PATCH" => Patch,
            b"PROPFIND" => PropFind,
            b"PROPPATCH" => PropPatch,
            b"MKCOL" => MkCol,
            b"COPY" => Copy,
            b"MOVE" => Move,
            b"LOCK" => Lock,
            b"UNLOCK" => Unlock,
            b"VERSION-CONTROL" => VersionControl,
            b"REPORT" => Report,
            b"CHECKOUT" => Checkout,
            b"MERGE" => Merge,
            b"MSEARCH" | b"M-SEARCH" => MSearch,
            b"NOTIFY" => Notify,
            b"SUBSCRIBE" => Subscribe,
            b"UNSUBSCRIBE" => Unsubscribe,
            b"PURGE" => Purge,
            b"MKCALENDAR" => MkCalendar,
            b"LINK" => Link,
            b"UNLINK" => Unlink,
            b"SOURCE" => Source,
            _ => return None,
        })
    }

    /// Whether a request using this method is expected to carry a body, absent any framing
    /// headers saying otherwise. `CONNECT` and most body-less verbs return `false`; everything
    /// else defers to `Content-Length`/`Transfer-Encoding` and returns `true`.
    pub(crate) fn has_request_body(self) -> bool {
        !matches!(self, Method::Connect)
    }

    /// The method token as it would appear on the wire.
    pub fn as_str(self) -> &'static str {
        use Method::*;
        match self {
            Get => "GET",
            Head => "HEAD",
            Post => "POST",
            Put => "PUT",
            Delete => "DELETE",
            Connect => "CONNECT",
            Options => "OPTIONS",
            Trace => "TRACE",
            Patch => "PATCH",
            PropFind => "PROPFIND",
            PropPatch => "PROPPATCH",
            MkCol => "MKCOL",
            Copy => "COPY",
            Move => "MOVE",
            Lock => "LOCK",
            Unlock => "UNLOCK",
            VersionControl => "VERSION-CONTROL",
            Report => "REPORT",
            Checkout => "CHECKOUT",
            Merge => "MERGE",
            MSearch => "MSEARCH",
            Notify => "NOTIFY",
            Subscribe => "SUBSCRIBE",
            Unsubscribe => "UNSUBSCRIBE",
            Purge => "PURGE",
            MkCalendar => "MKCALENDAR",
            Link => "LINK",
            Unlink => "UNLINK",
            Source => "SOURCE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
