//! The shared incremental engine behind [`crate::request::HttpRequestParser`] and
//! [`crate::response::HttpResponseParser`].

use alloc::vec::Vec;

use crate::chunk::{ChunkDecoder, ChunkEvent};
use crate::error::{HttpParserError, Result};
use crate::framing::{self, Framing, FramingInputs};
use crate::header::{HeaderEvent, HeaderScanner};
use crate::method::Method;
use crate::sink::Sink;
use crate::version::{parse_version, HttpVersion};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Request,
    Response,
}

/// The message-level phases this engine walks through for one request or response. `HeaderField`
/// and `HeaderValue` are collapsed into `Headers` (delegated to [`HeaderScanner`]'s own sub-states)
/// and `ChunkSize`/`ChunkData` are collapsed into `Chunked` (delegated to [`ChunkDecoder`]'s own
/// sub-states), since those finer phases are implementation detail of the two scanners, not
/// decisions the top-level engine itself needs to branch on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    StartLine,
    Headers,
    Body,
    Chunked,
    ChunkTrailer,
    Complete,
    Upgraded,
    Dead,
}

pub(crate) struct Parser<S: Sink> {
    kind: Kind,
    sink: S,
    phase: Phase,
    line_buf: Vec<u8>,
    version: Option<HttpVersion>,
    method: Option<Method>,
    status_code: Option<u16>,
    framing_inputs: FramingInputs,
    framing: Option<Framing>,
    bytes_remaining: u64,
    headers: HeaderScanner,
    chunk: ChunkDecoder,
    keep_alive: bool,
    should_upgrade: bool,
}

impl<S: Sink> Parser<S> {
    pub(crate) fn new(kind: Kind, sink: S) -> Self {
        Parser {
            kind,
            sink,
            phase: Phase::Idle,
            line_buf: Vec::new(),
            version: None,
            method: None,
            status_code: None,
            framing_inputs: FramingInputs::default(),
            framing: None,
            bytes_remaining: 0,
            headers: HeaderScanner::new(),
            chunk: ChunkDecoder::new(),
            keep_alive: true,
            should_upgrade: false,
        }
    }

    pub(crate) fn version(&self) -> Option<HttpVersion> {
        self.version
    }

    pub(crate) fn method(&self) -> Option<Method> {
        self.method
    }

    pub(crate) fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub(crate) fn should_keep_alive(&self) -> Option<bool> {
        self.framing.is_some().then_some(self.keep_alive)
    }

    pub(crate) fn should_upgrade(&self) -> Option<bool> {
        self.framing.is_some().then_some(self.should_upgrade)
    }

    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub(crate) fn feed_data(&mut self, data: &[u8]) -> Result<(), S::Error> {
        match self.phase {
            Phase::Upgraded | Phase::Dead => {
                return Err(HttpParserError::DataAfterCompleted);
            }
            Phase::Complete => {
                if data.is_empty() {
                    return Ok(());
                }
                if !self.keep_alive {
                    return Err(HttpParserError::DataAfterCompleted);
                }
                self.reset_for_next_message();
            }
            _ => {}
        }

        match self.drive(data) {
            Ok(pos) => {
                if self.phase == Phase::Upgraded {
                    trace!("upgrade detected, tunnel starts at offset {}", pos);
                    Err(HttpParserError::UpgradeDetected(pos))
                } else {
                    Ok(())
                }
            }
            Err(e) => {
                self.phase = Phase::Dead;
                Err(e)
            }
        }
    }

    fn reset_for_next_message(&mut self) {
        self.phase = Phase::Idle;
        self.line_buf.clear();
        self.version = None;
        self.method = None;
        self.status_code = None;
        self.framing_inputs = FramingInputs::default();
        self.framing = None;
        self.bytes_remaining = 0;
        self.headers = HeaderScanner::new();
        self.chunk = ChunkDecoder::new();
        self.should_upgrade = false;
    }

    fn drive(&mut self, data: &[u8]) -> Result<usize, S::Error> {
        let mut pos = 0;

        loop {
            match self.phase {
                Phase::Idle => {
                    trace!("message begin");
                    self.sink
                        .on_message_begin()
                        .map_err(HttpParserError::CallbackFailure)?;
                    self.phase = Phase::StartLine;
                }
                Phase::StartLine => {
                    if !self.step_start_line(data, &mut pos)? {
                        break;
                    }
                }
                Phase::Headers => {
                    if !self.step_headers(data, &mut pos)? {
                        break;
                    }
                }
                Phase::Body => {
                    if !self.step_body(data, &mut pos)? {
                        break;
                    }
                }
                Phase::Chunked => {
                    if !self.step_chunked(data, &mut pos)? {
                        break;
                    }
                }
                Phase::ChunkTrailer => {
                    if !self.step_chunk_trailer(data, &mut pos)? {
                        break;
                    }
                }
                Phase::Complete | Phase::Upgraded | Phase::Dead => break,
            }
        }

        Ok(pos)
    }

    fn step_start_line(&mut self, data: &[u8], pos: &mut usize) -> Result<bool, S::Error> {
        let Some((content, consumed)) = take_line(&mut self.line_buf, data, pos) else {
            return Ok(false);
        };

        match self.kind {
            Kind::Request => self.parse_request_line(&content)?,
            Kind::Response => self.parse_status_line(&content)?,
        }

        let _ = consumed;
        self.phase = Phase::Headers;
        Ok(true)
    }

    fn parse_request_line(&mut self, content: &[u8]) -> Result<(), S::Error> {
        let sp1 = position(content, b' ').ok_or(HttpParserError::InvalidMethod)?;
        let method_tok = &content[..sp1];
        let method = Method::parse(method_tok).ok_or(HttpParserError::InvalidMethod)?;

        let remainder = &content[sp1 + 1..];
        let sp2 = position(remainder, b' ').ok_or(HttpParserError::InvalidVersion)?;
        let target = &remainder[..sp2];
        let version_tok = &remainder[sp2 + 1..];

        if target.is_empty() {
            return Err(HttpParserError::InvalidUrl(
                crate::url::parse_url(b"").unwrap_err(),
            ));
        }
        crate::url::parse_url(target)?;

        let version = parse_version(version_tok).ok_or(HttpParserError::InvalidVersion)?;

        self.method = Some(method);
        self.version = Some(version);

        trace!("request line: {} {:?} HTTP/{}", method, target, version);

        self.sink
            .on_url(target)
            .map_err(HttpParserError::CallbackFailure)?;

        Ok(())
    }

    fn parse_status_line(&mut self, content: &[u8]) -> Result<(), S::Error> {
        let sp1 = position(content, b' ').ok_or(HttpParserError::InvalidVersion)?;
        let version_tok = &content[..sp1];
        let version = parse_version(version_tok).ok_or(HttpParserError::InvalidVersion)?;

        let remainder = &content[sp1 + 1..];
        let (status_tok, reason) = match position(remainder, b' ') {
            Some(sp2) => (&remainder[..sp2], &remainder[sp2 + 1..]),
            None => (remainder, &remainder[remainder.len()..]),
        };

        if status_tok.len() != 3 || !status_tok.iter().all(u8::is_ascii_digit) {
            return Err(HttpParserError::InvalidStatus);
        }

        let status_code = status_tok
            .iter()
            .fold(0u16, |acc, &b| acc * 10 + (b - b'0') as u16);

        if !(100..=599).contains(&status_code) {
            return Err(HttpParserError::InvalidStatus);
        }

        self.version = Some(version);
        self.status_code = Some(status_code);

        trace!("status line: HTTP/{} {}", version, status_code);

        self.sink
            .on_status(reason)
            .map_err(HttpParserError::CallbackFailure)?;

        Ok(())
    }

    fn step_headers(&mut self, data: &[u8], pos: &mut usize) -> Result<bool, S::Error> {
        loop {
            let event = self.headers.step(data, pos)?;
            match event {
                None => return Ok(false),
                Some(HeaderEvent::Field) => {
                    let name = self.headers.name();
                    let value = self.headers.value();
                    self.framing_inputs.observe_header(name, value);
                    self.sink
                        .on_header(name, value)
                        .map_err(HttpParserError::CallbackFailure)?;
                    self.headers.clear_field();
                }
                Some(HeaderEvent::End) => {
                    self.finish_headers()?;
                    return Ok(true);
                }
            }
        }
    }

    fn finish_headers(&mut self) -> Result<(), S::Error> {
        let version = self.version.expect("version resolved before headers");

        let framing = match self.kind {
            Kind::Request => {
                let method = self.method.expect("method resolved before headers");
                framing::resolve_request(method, &self.framing_inputs)?
            }
            Kind::Response => framing::resolve_response(
                version,
                self.method,
                self.status_code.expect("status resolved before headers"),
                &self.framing_inputs,
            )?,
        };

        self.should_upgrade = self.framing_inputs.should_upgrade(self.status_code);

        self.keep_alive = if self.framing_inputs.connection_close {
            false
        } else if version.is_http10() {
            self.framing_inputs.connection_keep_alive
        } else {
            true
        };

        self.framing = Some(framing);

        self.sink
            .on_headers_complete()
            .map_err(HttpParserError::CallbackFailure)?;

        if self.should_upgrade {
            debug!("upgrade requested, headers complete");
            self.sink
                .on_message_complete()
                .map_err(HttpParserError::CallbackFailure)?;
            // `feed_data` reads `pos` back out once `drive`'s loop notices this phase and
            // stops, and reports it as the tunnel's starting offset.
            self.phase = Phase::Upgraded;
            return Ok(());
        }

        trace!("framing resolved: {:?}", framing);

        match framing {
            Framing::NoBody => {
                self.sink
                    .on_message_complete()
                    .map_err(HttpParserError::CallbackFailure)?;
                self.phase = Phase::Complete;
            }
            Framing::LengthDelimited(n) => {
                self.bytes_remaining = n;
                self.phase = Phase::Body;
            }
            Framing::Chunked => {
                self.phase = Phase::Chunked;
            }
            Framing::Eof => {
                self.phase = Phase::Body;
                self.bytes_remaining = u64::MAX;
            }
        }

        Ok(())
    }

    fn step_body(&mut self, data: &[u8], pos: &mut usize) -> Result<bool, S::Error> {
        if self.bytes_remaining == 0 {
            self.sink
                .on_message_complete()
                .map_err(HttpParserError::CallbackFailure)?;
            self.phase = Phase::Complete;
            return Ok(true);
        }

        let available = (data.len() - *pos) as u64;
        if available == 0 {
            return Ok(false);
        }

        let take = available.min(self.bytes_remaining) as usize;
        let slice = &data[*pos..*pos + take];
        *pos += take;
        if self.bytes_remaining != u64::MAX {
            self.bytes_remaining -= take as u64;
        }

        self.sink
            .on_body(slice)
            .map_err(HttpParserError::CallbackFailure)?;

        Ok(true)
    }

    fn step_chunked(&mut self, data: &[u8], pos: &mut usize) -> Result<bool, S::Error> {
        match self.chunk.step(data, pos)? {
            None => Ok(false),
            Some(ChunkEvent::Header) => {
                self.sink
                    .on_chunk_header()
                    .map_err(HttpParserError::CallbackFailure)?;
                Ok(true)
            }
            Some(ChunkEvent::Data(len)) => {
                let slice = &data[*pos - len..*pos];
                self.sink
                    .on_body(slice)
                    .map_err(HttpParserError::CallbackFailure)?;
                Ok(true)
            }
            Some(ChunkEvent::Complete) => {
                self.sink
                    .on_chunk_complete()
                    .map_err(HttpParserError::CallbackFailure)?;
                Ok(true)
            }
            Some(ChunkEvent::TrailerStart) => {
                self.phase = Phase::ChunkTrailer;
                Ok(true)
            }
        }
    }

    fn step_chunk_trailer(&mut self, data: &[u8], pos: &mut usize) -> Result<bool, S::Error> {
        loop {
            let event = self.headers.step(data, pos)?;
            match event {
                None => return Ok(false),
                Some(HeaderEvent::Field) => {
                    let name = self.headers.name();
                    let value = self.headers.value();
                    self.sink
                        .on_header(name, value)
                        .map_err(HttpParserError::CallbackFailure)?;
                    self.headers.clear_field();
                }
                Some(HeaderEvent::End) => {
                    self.chunk.mark_trailer_done();
                    self.sink
                        .on_message_complete()
                        .map_err(HttpParserError::CallbackFailure)?;
                    self.phase = Phase::Complete;
                    return Ok(true);
                }
            }
        }
    }
}

/// Finds `content[..end]` for the next line (CRLF or, tolerantly, bare LF) in `data[*pos..]`,
/// resuming from whatever was buffered in `carry` by a prior call that ran out of input.
/// Advances `*pos` past the consumed bytes and returns the line's content (without its
/// terminator). Returns `None` (leaving the partial line in `carry`) if no full line is present.
fn take_line(carry: &mut Vec<u8>, data: &[u8], pos: &mut usize) -> Option<(Vec<u8>, usize)> {
    let remaining = &data[*pos..];

    if carry.is_empty() {
        if let Some((end, total)) = find_line_end(remaining) {
            let content = remaining[..end].to_vec();
            *pos += total;
            return Some((content, total));
        }
        carry.extend_from_slice(remaining);
        *pos = data.len();
        return None;
    }

    carry.extend_from_slice(remaining);
    if let Some((end, total)) = find_line_end(carry) {
        let content = carry[..end].to_vec();
        let consumed_from_data = total - (carry.len() - remaining.len());
        *pos += consumed_from_data;
        carry.clear();
        return Some((content, total));
    }

    *pos = data.len();
    None
}

fn find_line_end(buf: &[u8]) -> Option<(usize, usize)> {
    for i in 0..buf.len() {
        if buf[i] == b'\n' {
            if i > 0 && buf[i - 1] == b'\r' {
                return Some((i - 1, i + 1));
            }
            debug!("bare LF accepted as line terminator");
            return Some((i, i + 1));
        }
    }
    None
}

fn position(bytes: &[u8], needle: u8) -> Option<usize> {
    bytes.iter().position(|&b| b == needle)
}
