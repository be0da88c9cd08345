use crate::parser::CssParser;
use crate::stream::TokenStream;
use crate::stylesheet::NthPattern;
use crate::tokenizer::{NumericFlag, TokenType};

impl CssParser<'_> {
    /// Parses an `An+B` pattern: `odd`, `even`, a bare integer, or an
    /// `n`-form (`2n`, `-n+3`, `n-1`, `+n 2`). Shared by `:nth-*()` and
    /// `@page :nth()`.
    pub(crate) fn parse_anplusb(&mut self, stream: &mut TokenStream) -> Option<NthPattern> {
        log::trace!("parse_anplusb");

        stream.consume_whitespace();

        match stream.peek(0).token_type.clone() {
            TokenType::Ident(name) if name.eq_ignore_ascii_case("odd") => {
                stream.consume();
                Some(NthPattern::new(2, 1))
            }
            TokenType::Ident(name) if name.eq_ignore_ascii_case("even") => {
                stream.consume();
                Some(NthPattern::new(2, 0))
            }
            // bare integer: 0n+b
            TokenType::Number { value, flag, .. } => {
                if flag != NumericFlag::Integer {
                    return None;
                }
                stream.consume();
                Some(NthPattern::new(0, value as i32))
            }
            // `2n`, `2n-1`, `-3n` come through as dimensions with an
            // n-leading unit
            TokenType::Dimension { value, flag, unit, .. } => {
                if flag != NumericFlag::Integer {
                    return None;
                }
                stream.consume();
                let b = self.parse_n_remainder(stream, &unit)?;
                Some(NthPattern::new(value as i32, b))
            }
            // `n`, `n-2`, `-n`, `-n+4`
            TokenType::Ident(name) => {
                stream.consume();
                let (a, rest) = if let Some(rest) = strip_n_prefix(&name, true) {
                    (-1, rest.to_string())
                } else if let Some(rest) = strip_n_prefix(&name, false) {
                    (1, rest.to_string())
                } else {
                    return None;
                };
                let b = self.parse_n_remainder(stream, &format!("n{rest}"))?;
                Some(NthPattern::new(a, b))
            }
            // `+n...`: the sign tokenizes separately
            TokenType::Delim('+') => {
                stream.consume();
                let TokenType::Ident(name) = stream.peek(0).token_type.clone() else {
                    return None;
                };
                stream.consume();
                let rest = strip_n_prefix(&name, false)?;
                let b = self.parse_n_remainder(stream, &format!("n{rest}"))?;
                Some(NthPattern::new(1, b))
            }
            _ => None,
        }
    }

    /// Handles what follows the coefficient: the unit/ident must be `n`,
    /// `n-`, or `n-<digits>`; for the first two forms the offset may
    /// continue in later tokens.
    fn parse_n_remainder(&mut self, stream: &mut TokenStream, n_part: &str) -> Option<i32> {
        let lower = n_part.to_ascii_lowercase();
        if !lower.starts_with('n') {
            return None;
        }

        match &lower[1..] {
            "" => self.parse_b_offset(stream),
            "-" => {
                // `2n- 1` form: an unsigned integer must follow
                stream.consume_whitespace();
                let TokenType::Number { value, flag, signed } = stream.peek(0).token_type.clone() else {
                    return None;
                };
                if flag != NumericFlag::Integer || signed {
                    return None;
                }
                stream.consume();
                Some(-(value as i32))
            }
            rest if rest.starts_with('-') => {
                // `2n-1` came through as a single token
                let digits = &rest[1..];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse::<i32>().ok().map(|b| -b)
            }
            _ => None,
        }
    }

    /// Optional signed offset: `+ 3`, `- 3`, or a signed number token.
    fn parse_b_offset(&mut self, stream: &mut TokenStream) -> Option<i32> {
        stream.consume_whitespace();

        match stream.peek(0).token_type.clone() {
            TokenType::Eof => Some(0),
            TokenType::Number { value, flag, signed } => {
                if flag != NumericFlag::Integer || !signed {
                    return None;
                }
                stream.consume();
                Some(value as i32)
            }
            TokenType::Delim(sign @ ('+' | '-')) => {
                stream.consume();
                stream.consume_whitespace();
                let TokenType::Number { value, flag, signed } = stream.peek(0).token_type.clone() else {
                    return None;
                };
                if flag != NumericFlag::Integer || signed {
                    return None;
                }
                stream.consume();
                let b = value as i32;
                Some(if sign == '-' { -b } else { b })
            }
            _ => None,
        }
    }
}

/// Strips the `n` (or `-n` when `negative`) prefix off an identifier,
/// returning the remainder.
fn strip_n_prefix(name: &str, negative: bool) -> Option<&str> {
    let name = if negative { name.strip_prefix('-')? } else { name };
    if name.len() >= 1 && (name.starts_with('n') || name.starts_with('N')) {
        Some(&name[1..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    fn parse(source: &str) -> Option<NthPattern> {
        let tokens = tokenize_str(source);
        let mut stream = TokenStream::new(&tokens);
        let mut parser = CssParser::test_default();
        let pattern = parser.parse_anplusb(&mut stream)?;
        stream.consume_whitespace();
        if !stream.at_end() {
            return None;
        }
        Some(pattern)
    }

    #[test]
    fn keywords() {
        assert_eq!(parse("odd"), Some(NthPattern::new(2, 1)));
        assert_eq!(parse("even"), Some(NthPattern::new(2, 0)));
    }

    #[test]
    fn bare_integer() {
        assert_eq!(parse("3"), Some(NthPattern::new(0, 3)));
        assert_eq!(parse("+7"), Some(NthPattern::new(0, 7)));
        assert_eq!(parse("-1"), Some(NthPattern::new(0, -1)));
    }

    #[test]
    fn n_forms() {
        assert_eq!(parse("n"), Some(NthPattern::new(1, 0)));
        assert_eq!(parse("-n"), Some(NthPattern::new(-1, 0)));
        assert_eq!(parse("+n"), Some(NthPattern::new(1, 0)));
        assert_eq!(parse("2n"), Some(NthPattern::new(2, 0)));
        assert_eq!(parse("-3n"), Some(NthPattern::new(-3, 0)));
    }

    #[test]
    fn n_with_offset() {
        assert_eq!(parse("2n+1"), Some(NthPattern::new(2, 1)));
        assert_eq!(parse("2n + 1"), Some(NthPattern::new(2, 1)));
        assert_eq!(parse("2n - 3"), Some(NthPattern::new(2, -3)));
        assert_eq!(parse("2n-1"), Some(NthPattern::new(2, -1)));
        assert_eq!(parse("-n+2"), Some(NthPattern::new(-1, 2)));
        assert_eq!(parse("n-1"), Some(NthPattern::new(1, -1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("2m+1"), None);
        assert_eq!(parse("2.5n"), None);
        assert_eq!(parse("n +- 1"), None);
        assert_eq!(parse("odd 2"), None);
    }
}
