//! Delimiter-based line framing.
//!
//! [`LineCodec`] holds the scanning state for one stream and implements
//! [`tokio_util::codec::Decoder`], so it can sit under a `FramedRead`.
//! [`LineBuffer`] pairs the codec with its own growable storage for sources
//! that are not byte streams, such as a datagram socket.

use std::borrow::Cow;

use bytes::BytesMut;
use memchr::memmem;

use crate::error;

/// Initial capacity of a [`LineBuffer`]. The buffer grows past this as needed.
const INITIAL_CAPACITY: usize = 1024;

/// Line terminator of a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// `\r\n`, used by the IRC control connection.
    CrLf,
    /// `\n`, used by the local relay channel.
    Lf,
}

impl Delimiter {
    /// The terminator bytes.
    #[inline]
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Delimiter::CrLf => b"\r\n",
            Delimiter::Lf => b"\n",
        }
    }

    fn find(self, haystack: &[u8]) -> Option<usize> {
        match self {
            Delimiter::CrLf => memmem::find(haystack, b"\r\n"),
            Delimiter::Lf => memchr::memchr(b'\n', haystack),
        }
    }
}

/// Scanning state for one delimiter-terminated stream.
///
/// Lines are returned without their terminator. There is no length limit:
/// a partial line stays buffered until its delimiter arrives.
#[derive(Debug)]
pub struct LineCodec {
    delimiter: Delimiter,
    /// Index of the next byte to check for a delimiter
    next_index: usize,
}

impl LineCodec {
    /// Create a codec splitting on `delimiter`.
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            next_index: 0,
        }
    }

    /// Codec for the `\r\n` control stream.
    pub fn crlf() -> Self {
        Self::new(Delimiter::CrLf)
    }

    /// Codec for the `\n` local stream.
    pub fn lf() -> Self {
        Self::new(Delimiter::Lf)
    }

    /// The delimiter this codec splits on.
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Split the next complete line off the front of `src`.
    ///
    /// Everything after the delimiter stays in `src`, so calling this in a
    /// loop drains lines in arrival order.
    pub fn next_line(&mut self, src: &mut BytesMut) -> Option<BytesMut> {
        let term = self.delimiter.as_bytes();
        // A delimiter may straddle the previous scan boundary.
        let start = self.next_index.saturating_sub(term.len() - 1).min(src.len());

        match self.delimiter.find(&src[start..]) {
            Some(offset) => {
                let end = start + offset;
                let mut line = src.split_to(end + term.len());
                line.truncate(end);
                self.next_index = 0;
                Some(line)
            }
            None => {
                self.next_index = src.len();
                None
            }
        }
    }
}

#[cfg(feature = "tokio")]
impl tokio_util::codec::Decoder for LineCodec {
    type Item = BytesMut;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<BytesMut>> {
        Ok(self.next_line(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<BytesMut>> {
        match self.next_line(src) {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                let pending = src.len();
                src.clear();
                self.next_index = 0;
                Err(error::ProtocolError::UnterminatedLine { pending })
            }
        }
    }
}

/// Growable byte accumulator that yields complete lines.
///
/// One buffer per input source; bytes are appended as they arrive and
/// [`LineBuffer::extract_line`] is called until it returns `None`.
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    codec: LineCodec,
}

impl LineBuffer {
    /// Create an empty buffer splitting on `delimiter`.
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_CAPACITY),
            codec: LineCodec::new(delimiter),
        }
    }

    /// Append freshly read bytes. Never discards unread data.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Remove and return the next complete line, without its delimiter.
    pub fn extract_line(&mut self) -> Option<BytesMut> {
        self.codec.next_line(&mut self.buf)
    }

    /// Iterator draining every complete line currently buffered.
    pub fn drain_lines(&mut self) -> DrainLines<'_> {
        DrainLines { buffer: self }
    }

    /// Bytes buffered but not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Whether no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The delimiter this buffer splits on.
    pub fn delimiter(&self) -> Delimiter {
        self.codec.delimiter()
    }
}

/// Iterator returned by [`LineBuffer::drain_lines`].
pub struct DrainLines<'a> {
    buffer: &'a mut LineBuffer,
}

impl Iterator for DrainLines<'_> {
    type Item = BytesMut;

    fn next(&mut self) -> Option<BytesMut> {
        self.buffer.extract_line()
    }
}

/// Prepare a line received from a local command for the control connection.
///
/// Cuts the line at its first `\r` so a command cannot smuggle extra
/// protocol lines, then caps it at `max_len` bytes on a character boundary.
pub fn sanitize_relay_line(raw: &[u8], max_len: usize) -> Cow<'_, str> {
    let cut = memchr::memchr(b'\r', raw).unwrap_or(raw.len());
    let text = String::from_utf8_lossy(&raw[..cut]);
    if text.len() <= max_len {
        return text;
    }

    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(&s[..end]),
        Cow::Owned(mut s) => {
            s.truncate(end);
            Cow::Owned(s)
        }
    }
}
