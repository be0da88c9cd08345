use crate::tokenizer::{Token, TokenType};
use pluto_shared::byte_stream::Location;

/// Cursor over an already-tokenized slice.
///
/// All parser grammar runs on this; the tokenizer itself is single-pass and
/// forgotten once the token vector exists. Out-of-range reads return `Eof`.
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    cursor: usize,
    /// Handed out for reads past the end
    eof: Token,
}

/// Snapshot of a stream position for speculative parses. `release()` commits
/// the consumed tokens; passing the guard to [`TokenStream::rewind`] undoes
/// them.
#[must_use]
pub struct StreamGuard {
    start: usize,
}

impl StreamGuard {
    /// Commit: the speculative parse succeeded, keep the cursor where it is.
    pub fn release(self) {}
}

impl<'t> TokenStream<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let eof_location = tokens.last().map(|t| t.location).unwrap_or_default();
        Self {
            tokens,
            cursor: 0,
            eof: Token {
                token_type: TokenType::Eof,
                location: eof_location,
            },
        }
    }

    /// Snapshots the cursor. Pair with `rewind` (failure) or `release`
    /// (success).
    pub fn guard(&self) -> StreamGuard {
        StreamGuard { start: self.cursor }
    }

    pub fn rewind(&mut self, guard: StreamGuard) {
        self.cursor = guard.start;
    }

    pub fn at_end(&self) -> bool {
        self.peek(0).is_eof()
    }

    pub fn current_location(&self) -> Location {
        self.peek(0).location
    }

    /// The token at `offset` from the cursor without advancing.
    pub fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.cursor + offset).unwrap_or(&self.eof)
    }

    /// The next non-whitespace token without advancing.
    pub fn peek_skip_whitespace(&self) -> &Token {
        let mut offset = 0;
        loop {
            let token = self.peek(offset);
            if token.is_whitespace() {
                offset += 1;
            } else {
                return token;
            }
        }
    }

    /// Consumes and returns the next token. At the end, returns `Eof` without
    /// advancing further.
    pub fn consume(&mut self) -> Token {
        let token = self.peek(0).clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    /// Skips any run of whitespace tokens.
    pub fn consume_whitespace(&mut self) {
        while self.peek(0).is_whitespace() {
            self.cursor += 1;
        }
    }

    /// Consumes the next token and any whitespace after it.
    pub fn consume_including_whitespace(&mut self) -> Token {
        let token = self.consume();
        self.consume_whitespace();
        token
    }

    /// Consumes a comma along with surrounding whitespace. Returns false (and
    /// stays put) when the next non-whitespace token is not a comma.
    pub fn consume_comma_including_whitespace(&mut self) -> bool {
        let guard = self.guard();
        self.consume_whitespace();
        if self.peek(0).is_comma() {
            self.cursor += 1;
            self.consume_whitespace();
            guard.release();
            return true;
        }
        self.rewind(guard);
        false
    }

    /// Balanced skip: consumes one component value. A block-opening token
    /// (including functions) is skipped together with its entire interior and
    /// closing partner.
    pub fn consume_component(&mut self) {
        let token = self.consume();
        let Some(close) = token.token_type.closing_partner() else {
            return;
        };

        let mut depth = vec![close];
        while !depth.is_empty() {
            let token = self.consume();
            if token.is_eof() {
                return;
            }
            if let Some(last) = depth.last() {
                if token.token_type == *last {
                    depth.pop();
                    continue;
                }
            }
            if let Some(close) = token.token_type.closing_partner() {
                depth.push(close);
            }
        }
    }

    /// Consumes a block that starts at the current (block-opening) token and
    /// returns a sub-stream over the balanced interior. The cursor advances
    /// past the closing bracket. Returns `None` when the current token does
    /// not open a block.
    pub fn consume_block(&mut self) -> Option<TokenStream<'t>> {
        let close = self.peek(0).token_type.closing_partner()?;
        self.cursor += 1;

        let start = self.cursor;
        let mut depth = vec![close];
        while !depth.is_empty() {
            let token = self.peek(0);
            if token.is_eof() {
                // unterminated block runs to the end of the stream
                let interior = &self.tokens[start..self.cursor.min(self.tokens.len())];
                return Some(TokenStream::new(interior));
            }
            if let Some(last) = depth.last() {
                if token.token_type == *last {
                    depth.pop();
                    self.cursor += 1;
                    continue;
                }
            }
            if let Some(close) = token.token_type.closing_partner() {
                depth.push(close);
            }
            self.cursor += 1;
        }

        // interior excludes the closing bracket
        Some(TokenStream::new(&self.tokens[start..self.cursor - 1]))
    }

    /// Current cursor position, for later slicing.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// The tokens between two previously observed positions.
    pub fn slice(&self, start: usize, end: usize) -> &'t [Token] {
        &self.tokens[start.min(self.tokens.len())..end.min(self.tokens.len())]
    }

    /// Consumes balanced components until one of `stops` appears at the top
    /// level (or the stream ends) and returns the consumed slice. The stop
    /// token itself is not consumed.
    pub fn consume_components_until(&mut self, stops: &[TokenType]) -> &'t [Token] {
        let start = self.cursor;
        loop {
            let token = self.peek(0);
            if token.is_eof() || stops.contains(&token.token_type) {
                break;
            }
            self.consume_component();
        }
        self.slice(start, self.cursor)
    }

    /// The remaining tokens from the cursor to the end (exclusive of `Eof`).
    pub fn remaining(&self) -> &'t [Token] {
        let end = self
            .tokens
            .iter()
            .position(|t| t.is_eof())
            .unwrap_or(self.tokens.len());
        &self.tokens[self.cursor.min(end)..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    #[test]
    fn peek_and_consume() {
        let tokens = tokenize_str("a b");
        let mut stream = TokenStream::new(&tokens);

        assert!(stream.peek(0).is_ident());
        assert!(stream.peek(1).is_whitespace());
        assert!(stream.consume().is_ident());
        assert!(stream.consume().is_whitespace());
        assert!(stream.consume().is_ident());
        assert!(stream.consume().is_eof());
        // consuming past the end stays at eof
        assert!(stream.consume().is_eof());
    }

    #[test]
    fn guard_rewinds_unless_released() {
        let tokens = tokenize_str("a b c");
        let mut stream = TokenStream::new(&tokens);

        let guard = stream.guard();
        stream.consume();
        stream.consume();
        stream.rewind(guard);
        assert!(stream.peek(0).is_ident_value("a"));

        let guard = stream.guard();
        stream.consume();
        guard.release();
        assert!(stream.peek(0).is_whitespace());
    }

    #[test]
    fn comma_consumption() {
        let tokens = tokenize_str("a , b");
        let mut stream = TokenStream::new(&tokens);

        stream.consume();
        assert!(stream.consume_comma_including_whitespace());
        assert!(stream.peek(0).is_ident_value("b"));

        let tokens = tokenize_str("a b");
        let mut stream = TokenStream::new(&tokens);
        stream.consume();
        assert!(!stream.consume_comma_including_whitespace());
        // the whitespace before 'b' is untouched
        assert!(stream.peek(0).is_whitespace());
    }

    #[test]
    fn component_skips_balanced_blocks() {
        let tokens = tokenize_str("calc(1 + (2 * 3)) next");
        let mut stream = TokenStream::new(&tokens);

        stream.consume_component();
        stream.consume_whitespace();
        assert!(stream.peek(0).is_ident_value("next"));
    }

    #[test]
    fn block_returns_interior() {
        let tokens = tokenize_str("{ color : red } after");
        let mut stream = TokenStream::new(&tokens);

        let mut block = stream.consume_block().unwrap();
        block.consume_whitespace();
        assert!(block.consume().is_ident_value("color"));

        stream.consume_whitespace();
        assert!(stream.peek(0).is_ident_value("after"));
    }

    #[test]
    fn nested_block_interior_is_balanced() {
        let tokens = tokenize_str("{ a { b } c } after");
        let mut stream = TokenStream::new(&tokens);

        let block = stream.consume_block().unwrap();
        let inner: Vec<String> = block.remaining().iter().map(ToString::to_string).collect();
        assert_eq!(inner.join(""), " a { b } c ");

        stream.consume_whitespace();
        assert!(stream.peek(0).is_ident_value("after"));
    }

    #[test]
    fn non_block_token_yields_no_block() {
        let tokens = tokenize_str("a");
        let mut stream = TokenStream::new(&tokens);
        assert!(stream.consume_block().is_none());
    }
}
