//! Chunked transfer-encoding decoder.

use alloc::vec::Vec;

use crate::error::{HttpParserError, Result};

/// One step of progress made while decoding chunked data out of a fragment.
pub(crate) enum ChunkEvent {
    /// A new chunk-size line was parsed. The chunk is non-empty; `on_chunk_header` should fire.
    Header,
    /// `len` bytes ending at the decoder's current cursor are chunk payload; emit them via
    /// `on_body`.
    Data(usize),
    /// The chunk's trailing CRLF was consumed; `on_chunk_complete` should fire.
    Complete,
    /// The terminating zero-size chunk was seen; trailer headers follow (reuse the header
    /// scanner), then the final CRLF.
    TrailerStart,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Size,
    Chunk(u64),
    Crlf,
    Trailer,
    Ended,
}

/// Incremental decoder for `chunked` transfer-encoded bodies.
///
/// Cycles `Size -> Chunk(n) -> CrLf -> Size -> ... -> Trailer -> Ended`, re-entering at the
/// exact sub-state on every call so a chunk-size line, a chunk body, or the trailing CRLF can
/// each be split across an arbitrary number of fragments. The chunk-size accumulator is `u64`
/// with checked arithmetic to reject overflow rather than wrapping silently; progress is reported
/// through [`ChunkEvent`] so the caller can forward chunk payloads straight to its sink instead
/// of copying them into an intermediate buffer.
pub(crate) struct ChunkDecoder {
    state: State,
    /// Carries a chunk-size or trailing-CRLF line across a `feed_data` boundary, the same way
    /// `parser.rs`'s `line_buf`/`take_line` carry a split start-line.
    line_buf: Vec<u8>,
}

impl ChunkDecoder {
    pub(crate) fn new() -> Self {
        ChunkDecoder {
            state: State::Size,
            line_buf: Vec::new(),
        }
    }

    pub(crate) fn mark_trailer_done(&mut self) {
        self.state = State::Ended;
    }

    /// Advance by at most one state transition, starting at `src[*pos..]`. Returns `None` when
    /// more input is needed before further progress can be made, or while in the trailer phase
    /// (trailer headers are driven by the caller's header scanner, not by this decoder).
    pub(crate) fn step<E>(&mut self, src: &[u8], pos: &mut usize) -> Result<Option<ChunkEvent>, E> {
        match self.state {
            State::Size => self.read_size(src, pos),
            State::Chunk(_) => Ok(self.read_data(src, pos)),
            State::Crlf => self.read_crlf(src, pos),
            State::Trailer | State::Ended => Ok(None),
        }
    }

    fn read_size<E>(&mut self, src: &[u8], pos: &mut usize) -> Result<Option<ChunkEvent>, E> {
        let Some(content) = take_line(&mut self.line_buf, src, pos) else {
            return Ok(None);
        };
        let buf = content.as_slice();

        let size_end = buf.iter().position(|&c| c == b';').unwrap_or(buf.len());
        if size_end == 0 {
            return Err(HttpParserError::InvalidChunkSize);
        }

        let mut len: u64 = 0;
        for &c in &buf[..size_end] {
            let digit = (c as char)
                .to_digit(16)
                .ok_or(HttpParserError::InvalidChunkSize)? as u64;
            len = len
                .checked_mul(16)
                .and_then(|v| v.checked_add(digit))
                .ok_or(HttpParserError::InvalidChunkSize)?;
        }

        if len == 0 {
            self.state = State::Trailer;
            return Ok(Some(ChunkEvent::TrailerStart));
        }

        self.state = State::Chunk(len);
        Ok(Some(ChunkEvent::Header))
    }

    fn read_data(&mut self, src: &[u8], pos: &mut usize) -> Option<ChunkEvent> {
        let State::Chunk(left) = &mut self.state else {
            unreachable!()
        };

        let available = (src.len() - *pos) as u64;
        let to_read = available.min(*left) as usize;

        if to_read == 0 {
            return None;
        }

        *pos += to_read;
        *left -= to_read as u64;

        if *left == 0 {
            self.state = State::Crlf;
        }

        Some(ChunkEvent::Data(to_read))
    }

    fn read_crlf<E>(&mut self, src: &[u8], pos: &mut usize) -> Result<Option<ChunkEvent>, E> {
        let Some(content) = take_line(&mut self.line_buf, src, pos) else {
            return Ok(None);
        };
        if !content.is_empty() {
            return Err(HttpParserError::InvalidChunkSize);
        }
        self.state = State::Size;
        Ok(Some(ChunkEvent::Complete))
    }
}

/// Finds the end of the next line, tolerating a bare LF in place of CRLF. Returns
/// `(content_len, total_len)`: `content_len` excludes the terminator, `total_len` includes it.
fn find_line_end(buf: &[u8]) -> Option<(usize, usize)> {
    let nl = buf.iter().position(|&b| b == b'\n')?;
    if nl > 0 && buf[nl - 1] == b'\r' {
        Some((nl - 1, nl + 1))
    } else {
        Some((nl, nl + 1))
    }
}

/// Finds the next line's content in `data[*pos..]`, resuming from whatever was buffered in
/// `carry` by a prior call that ran out of input, and advancing `*pos` past the bytes consumed
/// from `data`. Returns `None` (leaving the partial line in `carry`) if no full line is present
/// yet. Mirrors `parser.rs`'s `take_line`, used here so a chunk-size line or the chunk's trailing
/// CRLF can straddle a `feed_data` boundary without dropping already-scanned bytes.
fn take_line(carry: &mut Vec<u8>, data: &[u8], pos: &mut usize) -> Option<Vec<u8>> {
    let remaining = &data[*pos..];

    if carry.is_empty() {
        if let Some((end, total)) = find_line_end(remaining) {
            let content = remaining[..end].to_vec();
            *pos += total;
            return Some(content);
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
        return Some(content);
    }

    *pos = data.len();
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec::Vec;

    fn run(input: &[u8]) -> (usize, Vec<u8>) {
        let mut d = ChunkDecoder::new();
        let mut pos = 0;
        let mut data = Vec::new();
        loop {
            match d.step::<()>(input, &mut pos) {
                Ok(Some(ChunkEvent::Data(len))) => {
                    let start = pos - len;
                    data.extend_from_slice(&input[start..pos]);
                }
                Ok(Some(ChunkEvent::TrailerStart)) => {
                    d.mark_trailer_done();
                }
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => break,
            }
        }
        (pos, data)
    }

    #[test]
    fn decodes_two_chunks_and_terminator() {
        let (consumed, data) = run(b"5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n");
        assert_eq!(data, b"hello world");
        assert_eq!(consumed, b"5\r\nhello\r\n6\r\n world\r\n0\r\n".len());
    }

    #[test]
    fn stops_cleanly_on_partial_size_line() {
        let mut d = ChunkDecoder::new();
        let mut pos = 0;
        assert!(d.step::<()>(b"2", &mut pos).unwrap().is_none());
        // the lone digit is buffered in `line_buf`, not dropped; `pos` reports it consumed.
        assert_eq!(pos, 1);
        assert_eq!(d.line_buf, b"2");
    }

    #[test]
    fn resumes_a_chunk_size_split_across_fragments() {
        // "15" (hex 21) split as "1" then "5\r\n...": the leading digit must not be dropped.
        let mut d = ChunkDecoder::new();
        let mut pos = 0;
        assert!(d.step::<()>(b"1", &mut pos).unwrap().is_none());

        let mut pos2 = 0;
        let rest = b"5\r\naaaaaaaaaaaaaaaaaaaaa\r\n0\r\n\r\n";
        match d.step::<()>(rest, &mut pos2).unwrap() {
            Some(ChunkEvent::Header) => {}
            other => panic!("expected chunk header, got {:?}", other.map(|_| ())),
        }

        let mut total = Vec::new();
        loop {
            match d.step::<()>(rest, &mut pos2) {
                Ok(Some(ChunkEvent::Data(len))) => {
                    let start = pos2 - len;
                    total.extend_from_slice(&rest[start..pos2]);
                }
                Ok(Some(ChunkEvent::TrailerStart)) => d.mark_trailer_done(),
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => break,
            }
        }
        assert_eq!(total, b"aaaaaaaaaaaaaaaaaaaaa");
    }

    #[test]
    fn rejects_overflowing_chunk_size() {
        let mut d = ChunkDecoder::new();
        let mut pos = 0;
        let huge = b"ffffffffffffffff1\r\n";
        assert!(d.step::<()>(huge, &mut pos).is_err());
    }

    #[test]
    fn skips_chunk_extension() {
        let (consumed, data) = run(b"2;meta\r\nOK\r\n0\r\n\r\n");
        assert_eq!(data, b"OK");
        assert!(consumed > 0);
    }

    #[test]
    fn tolerates_bare_lf_in_chunk_framing() {
        let (_, data) = run(b"5\nhello\n0\n\n");
        assert_eq!(data, b"hello");
    }
}
