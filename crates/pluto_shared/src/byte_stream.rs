use std::fmt;
use std::fmt::Debug;

/// A single element read from a [`ByteStream`].
///
/// The tokenizer never sees raw bytes; multi-byte UTF-8 sequences are decoded
/// when the stream is filled and non-ASCII code points pass through unchanged.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Character {
    /// A decoded code point
    Ch(char),
    /// The end of the (closed) stream
    StreamEnd,
}

use Character::{Ch, StreamEnd};

impl From<Character> for char {
    fn from(c: Character) -> Self {
        match c {
            Ch(c) => c,
            StreamEnd => 0x0 as char,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ch(c) => write!(f, "{c}"),
            StreamEnd => write!(f, "StreamEnd"),
        }
    }
}

impl Character {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Ch(c) if c.is_whitespace())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Ch(c) if c.is_numeric())
    }
}

/// Character stream over an in-memory buffer with arbitrary lookahead.
///
/// Input arrives as a string or raw bytes (decoded lossily as UTF-8). Once
/// `close()` is called, reads past the end return [`Character::StreamEnd`].
pub struct ByteStream {
    /// Decoded code points
    buffer: Vec<char>,
    /// Offset of the NEXT code point to read
    position: usize,
    /// When true, no more data will be appended to the buffer
    closed: bool,
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStream {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
            closed: false,
        }
    }

    /// Fills the stream from a string slice.
    pub fn read_from_str(&mut self, s: &str) {
        self.buffer.extend(s.chars());
    }

    /// Fills the stream from raw bytes, decoding lossily as UTF-8.
    pub fn read_from_bytes(&mut self, bytes: &[u8]) {
        match std::str::from_utf8(bytes) {
            Ok(s) => self.buffer.extend(s.chars()),
            Err(e) => {
                log::warn!("invalid utf-8 in css source (at byte {}), decoding lossily", e.valid_up_to());
                self.buffer.extend(String::from_utf8_lossy(bytes).chars());
            }
        }
    }

    /// Closes the stream. Reads past the buffered data now return `StreamEnd`
    /// instead of pretending more data may arrive.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn eof(&self) -> bool {
        self.closed && self.position >= self.buffer.len()
    }

    /// Reads the current character and advances the stream.
    pub fn read(&mut self) -> Character {
        match self.buffer.get(self.position) {
            Some(c) => {
                self.position += 1;
                Ch(*c)
            }
            None => StreamEnd,
        }
    }

    /// Returns the character at the given offset from the current position
    /// without advancing. `look_ahead(0)` is the character `read()` would
    /// return next.
    pub fn look_ahead(&self, offset: usize) -> Character {
        match self.buffer.get(self.position + offset) {
            Some(c) => Ch(*c),
            None => StreamEnd,
        }
    }

    /// Returns the next `len` characters as a string, shorter when the stream
    /// ends first. Used for short fixed-string probes (`/*`, `*/`, `-->`).
    pub fn look_ahead_slice(&self, len: usize) -> String {
        let end = (self.position + len).min(self.buffer.len());
        self.buffer[self.position..end].iter().collect()
    }

    /// Current read offset in code points from the start of the stream.
    pub fn offset(&self) -> usize {
        self.position
    }
}

/// Location of a token or error in the source: 1-based line and column plus
/// a 0-based code point offset.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    line: usize,
    column: usize,
    offset: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

/// Tracks the current source location while a scanner advances through a
/// [`ByteStream`].
pub struct LocationHandler {
    /// The location the stream started on. Does not have to be 1/1 (think
    /// inline style attributes in the middle of a document).
    pub start_location: Location,
    /// Current location relative to `start_location`
    pub cur_location: Location,
}

impl LocationHandler {
    pub fn new(start_location: Location) -> Self {
        Self {
            start_location,
            cur_location: Location::default(),
        }
    }

    /// Advances the current location over the given character.
    pub fn inc(&mut self, ch: Character) {
        match ch {
            Ch('\n') => {
                self.cur_location.line += 1;
                self.cur_location.column = 1;
                self.cur_location.offset += 1;
            }
            Ch(_) => {
                self.cur_location.column += 1;
                self.cur_location.offset += 1;
            }
            StreamEnd => {}
        }
    }

    /// The absolute location: start location plus the relative position.
    pub fn absolute(&self) -> Location {
        Location::new(
            self.start_location.line + self.cur_location.line - 1,
            if self.cur_location.line == 1 {
                self.start_location.column + self.cur_location.column - 1
            } else {
                self.cur_location.column
            },
            self.cur_location.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_lookahead() {
        let mut stream = ByteStream::new();
        stream.read_from_str("ab");
        stream.close();

        assert_eq!(stream.look_ahead(0), Ch('a'));
        assert_eq!(stream.look_ahead(1), Ch('b'));
        assert_eq!(stream.look_ahead(2), StreamEnd);
        assert_eq!(stream.read(), Ch('a'));
        assert_eq!(stream.read(), Ch('b'));
        assert_eq!(stream.read(), StreamEnd);
        assert!(stream.eof());
    }

    #[test]
    fn non_ascii_passthrough() {
        let mut stream = ByteStream::new();
        stream.read_from_bytes("héllo".as_bytes());
        stream.close();

        assert_eq!(stream.read(), Ch('h'));
        assert_eq!(stream.read(), Ch('é'));
    }

    #[test]
    fn lookahead_slice_stops_at_end() {
        let mut stream = ByteStream::new();
        stream.read_from_str("/*");
        stream.close();

        assert_eq!(stream.look_ahead_slice(2), "/*");
        assert_eq!(stream.look_ahead_slice(4), "/*");
    }

    #[test]
    fn location_tracking() {
        let mut handler = LocationHandler::new(Location::default());
        for c in "a\nbc".chars() {
            handler.inc(Ch(c));
        }
        assert_eq!(handler.absolute(), Location::new(2, 3, 4));
    }

    #[test]
    fn location_with_offset_start() {
        let mut handler = LocationHandler::new(Location::new(10, 5, 0));
        assert_eq!(handler.absolute(), Location::new(10, 5, 0));
        handler.inc(Ch('x'));
        assert_eq!(handler.absolute(), Location::new(10, 6, 1));
    }
}
