use pluto_shared::byte_stream::Character::{Ch, StreamEnd};
use pluto_shared::byte_stream::{ByteStream, Character, Location, LocationHandler};
use std::fmt;

pub type Number = f32;

/// Maximum allowed code point; everything above maps to U+FFFD.
const MAX_CODE_POINT: u32 = 0x0010_FFFF;
const REPLACEMENT: char = '\u{FFFD}';

/// Type flag of a `<number-token>`, `<percentage-token>` or `<dimension-token>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NumericFlag {
    Integer,
    Number,
}

/// Type flag of a `<hash-token>`: `Id` when the value is a valid identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HashFlag {
    Id,
    Unrestricted,
}

#[derive(Debug, PartialEq, Clone, serde::Serialize, serde::Deserialize)]
pub enum TokenType {
    /// An `<at-keyword-token>`; the value does not include the `@` marker
    AtKeyword(String),
    Ident(String),
    Function(String),
    Url(String),
    /// A `<bad-url-token>`; always indicates a parse error
    BadUrl,
    Dimension {
        value: Number,
        flag: NumericFlag,
        /// Whether the number was written with an explicit sign
        signed: bool,
        unit: String,
    },
    Percentage {
        value: Number,
        flag: NumericFlag,
        signed: bool,
    },
    Number {
        value: Number,
        flag: NumericFlag,
        signed: bool,
    },
    /// A `<string-token>`; the value does not include the quotes
    QuotedString(String),
    /// A `<bad-string-token>`; always indicates a parse error
    BadString,
    /// A `u+XXXX-XXXX` range; both bounds clamped to U+10FFFF
    UnicodeRange {
        start: u32,
        end: u32,
    },
    /// One or more whitespace code points, collapsed
    Whitespace,
    /// A `<hash-token>`; the value does not include the `#` marker
    Hash(String, HashFlag),
    Delim(char),
    LCurly,
    RCurly,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Cdo,
    Cdc,
    Eof,
}

impl TokenType {
    /// The canonical close partner of a block-opening token, used by the
    /// stream's balanced-skip operation.
    pub fn closing_partner(&self) -> Option<TokenType> {
        match self {
            TokenType::LCurly => Some(TokenType::RCurly),
            TokenType::LParen | TokenType::Function(_) => Some(TokenType::RParen),
            TokenType::LBracket => Some(TokenType::RBracket),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Location of the token in the source
    pub location: Location,
}

impl Token {
    /// Returns a new token for the given type on the given location
    fn new(token_type: TokenType, location: Location) -> Token {
        Token { token_type, location }
    }

    fn new_delim(c: char, location: Location) -> Token {
        Token::new(TokenType::Delim(c), location)
    }

    fn new_hash(value: &str, flag: HashFlag, location: Location) -> Token {
        Token::new(TokenType::Hash(value.to_string(), flag), location)
    }

    fn new_atkeyword(keyword: &str, location: Location) -> Token {
        Token::new(TokenType::AtKeyword(keyword.to_string()), location)
    }

    fn new_number(value: Number, flag: NumericFlag, signed: bool, location: Location) -> Token {
        Token::new(TokenType::Number { value, flag, signed }, location)
    }

    fn new_percentage(value: Number, flag: NumericFlag, signed: bool, location: Location) -> Token {
        Token::new(TokenType::Percentage { value, flag, signed }, location)
    }

    fn new_dimension(value: Number, flag: NumericFlag, signed: bool, unit: &str, location: Location) -> Token {
        Token::new(
            TokenType::Dimension {
                value,
                flag,
                signed,
                unit: unit.to_string(),
            },
            location,
        )
    }

    fn new_ident(value: &str, location: Location) -> Token {
        Token::new(TokenType::Ident(value.to_string()), location)
    }

    fn new_function(value: &str, location: Location) -> Token {
        Token::new(TokenType::Function(value.to_string()), location)
    }

    fn new_quoted_string(value: &str, location: Location) -> Token {
        Token::new(TokenType::QuotedString(value.to_string()), location)
    }

    fn new_url(value: &str, location: Location) -> Token {
        Token::new(TokenType::Url(value.to_string()), location)
    }

    fn new_unicode_range(start: u32, end: u32, location: Location) -> Token {
        Token::new(TokenType::UnicodeRange { start, end }, location)
    }
}

impl Token {
    pub fn is_comma(&self) -> bool {
        matches!(self.token_type, TokenType::Comma)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.token_type, TokenType::QuotedString(_))
    }

    pub fn is_ident(&self) -> bool {
        matches!(self.token_type, TokenType::Ident(_))
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace)
    }

    pub fn is_colon(&self) -> bool {
        matches!(self.token_type, TokenType::Colon)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::Eof)
    }

    pub fn is_delim(&self, delim: char) -> bool {
        matches!(self.token_type, TokenType::Delim(c) if c == delim)
    }

    pub fn is_ident_value(&self, value: &str) -> bool {
        matches!(&self.token_type, TokenType::Ident(v) if v.eq_ignore_ascii_case(value))
    }

    pub fn is_function_name(&self, name: &str) -> bool {
        matches!(&self.token_type, TokenType::Function(v) if v.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token_type {
            TokenType::AtKeyword(val) => write!(f, "@{val}"),
            TokenType::Url(val) => write!(f, "url({val})"),
            TokenType::BadUrl => write!(f, "url()"),
            TokenType::Hash(val, _) => write!(f, "#{val}"),
            TokenType::Ident(val) => write!(f, "{val}"),
            TokenType::Function(val) => write!(f, "{val}("),
            TokenType::QuotedString(val) => write!(f, "\"{val}\""),
            TokenType::BadString => write!(f, "\"\""),
            TokenType::Delim(val) => write!(f, "{val}"),
            TokenType::Number { value, .. } => write!(f, "{value}"),
            TokenType::Percentage { value, .. } => write!(f, "{value}%"),
            TokenType::Dimension { value, unit, .. } => write!(f, "{value}{unit}"),
            TokenType::UnicodeRange { start, end } => write!(f, "U+{start:X}-{end:X}"),
            TokenType::Cdc => write!(f, "-->"),
            TokenType::Cdo => write!(f, "<!--"),
            TokenType::Colon => write!(f, ":"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::Comma => write!(f, ","),
            TokenType::LBracket => write!(f, "["),
            TokenType::RBracket => write!(f, "]"),
            TokenType::LCurly => write!(f, "{{"),
            TokenType::RCurly => write!(f, "}}"),
            TokenType::LParen => write!(f, "("),
            TokenType::RParen => write!(f, ")"),
            TokenType::Whitespace => write!(f, " "),
            TokenType::Eof => Ok(()),
        }
    }
}

/// CSS tokenizer according to the [w3 specification](https://www.w3.org/TR/css-syntax-3/#tokenization).
///
/// A single-pass scanner with a three character lookahead window. It never
/// fails: malformed input degrades to `BadString`/`BadUrl` tokens and
/// scanning continues. Comments are tracked but stripped from the output.
pub struct Tokenizer<'stream> {
    stream: &'stream mut ByteStream,
    /// Source location bookkeeping; the start does not have to be 1/1
    location: LocationHandler,
    /// Comments encountered while scanning, in source order
    comments: Vec<(String, Location)>,
}

impl<'stream> Tokenizer<'stream> {
    pub fn new(stream: &'stream mut ByteStream, start_location: Location) -> Self {
        Self {
            stream,
            location: LocationHandler::new(start_location),
            comments: Vec::new(),
        }
    }

    /// Scans the whole stream and returns the tokens with `Eof` appended.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.consume_token();
            let eof = token.is_eof();
            tokens.push(token);
            if eof {
                break;
            }
        }

        tokens
    }

    /// The comments seen so far, stripped from the public token output.
    pub fn comments(&self) -> &[(String, Location)] {
        &self.comments
    }

    fn current_location(&self) -> Location {
        self.location.absolute()
    }

    /// 4.3.1. [Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Token {
        while self.look_ahead_slice(2) == "/*" {
            self.consume_comment();
        }

        let current = self.current_char();
        let loc = self.current_location();

        match current {
            StreamEnd => Token::new(TokenType::Eof, loc),
            Ch(c) if c.is_whitespace() => {
                self.consume_whitespace();
                Token::new(TokenType::Whitespace, loc)
            }
            Ch('"' | '\'') => self.consume_string_token(),
            Ch(c @ '#') => {
                // consume '#'
                self.next_char();

                if self.is_ident_char(self.current_char()) || self.is_start_of_escape(0) {
                    let flag = if self.is_next_3_points_starts_ident_seq(0) {
                        HashFlag::Id
                    } else {
                        HashFlag::Unrestricted
                    };
                    return Token::new_hash(self.consume_ident().as_str(), flag, loc);
                }

                Token::new_delim(c, loc)
            }
            Ch('(') => {
                self.next_char();
                Token::new(TokenType::LParen, loc)
            }
            Ch(')') => {
                self.next_char();
                Token::new(TokenType::RParen, loc)
            }
            Ch('[') => {
                self.next_char();
                Token::new(TokenType::LBracket, loc)
            }
            Ch(']') => {
                self.next_char();
                Token::new(TokenType::RBracket, loc)
            }
            Ch('{') => {
                self.next_char();
                Token::new(TokenType::LCurly, loc)
            }
            Ch('}') => {
                self.next_char();
                Token::new(TokenType::RCurly, loc)
            }
            Ch(',') => {
                self.next_char();
                Token::new(TokenType::Comma, loc)
            }
            Ch(':') => {
                self.next_char();
                Token::new(TokenType::Colon, loc)
            }
            Ch(';') => {
                self.next_char();
                Token::new(TokenType::Semicolon, loc)
            }
            Ch(c @ '+') => {
                if self.is_signed_decimal(0) {
                    return self.consume_numeric_token();
                }

                // consume '+'
                self.next_char();
                Token::new_delim(c, loc)
            }
            Ch('.') => {
                if self.stream.look_ahead(1).is_numeric() {
                    return self.consume_numeric_token();
                }

                // consume '.'
                self.next_char();
                Token::new_delim('.', loc)
            }
            Ch(c @ '-') => {
                if self.is_signed_decimal(0) {
                    return self.consume_numeric_token();
                }

                if self.look_ahead_slice(3) == "-->" {
                    self.consume_chars(3);
                    return Token::new(TokenType::Cdc, loc);
                }

                if self.is_next_3_points_starts_ident_seq(0) {
                    return self.consume_ident_like_seq();
                }

                // consume '-'
                self.next_char();
                Token::new_delim(c, loc)
            }
            Ch(c @ '<') => {
                if self.look_ahead_slice(4) == "<!--" {
                    self.consume_chars(4);
                    return Token::new(TokenType::Cdo, loc);
                }

                // consume '<'
                self.next_char();
                Token::new_delim(c, loc)
            }
            Ch(c @ '@') => {
                // consume '@'
                self.next_char();

                if self.is_next_3_points_starts_ident_seq(0) {
                    return Token::new_atkeyword(self.consume_ident().as_str(), loc);
                }

                Token::new_delim(c, loc)
            }
            Ch(c @ '\\') => {
                if self.is_start_of_escape(0) {
                    return self.consume_ident_like_seq();
                }

                // parse error; consume '\'
                self.next_char();
                Token::new_delim(c, loc)
            }
            Ch(c) if c.is_ascii_digit() => self.consume_numeric_token(),
            Ch('u' | 'U') if self.is_unicode_range_start() => self.consume_unicode_range(),
            Ch(c) if self.is_ident_start(c) => self.consume_ident_like_seq(),
            Ch(c) => {
                self.next_char();
                Token::new_delim(c, loc)
            }
        }
    }

    /// 4.3.2. [Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comment(&mut self) {
        let loc = self.current_location();
        // consume '/*'
        self.consume_chars(2);

        let mut comment = String::new();
        while self.look_ahead_slice(2) != "*/" && !self.stream.eof() {
            comment.push(self.next_char().into());
        }

        // consume '*/'; unterminated comments run to EOF
        self.consume_chars(2);
        self.comments.push((comment, loc));
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    ///
    /// Returns either a `<number-token>`, `<percentage-token>`, or `<dimension-token>`.
    fn consume_numeric_token(&mut self) -> Token {
        let loc = self.current_location();
        let (value, flag, signed) = self.consume_number();

        if self.is_next_3_points_starts_ident_seq(0) {
            let unit = self.consume_ident();
            return Token::new_dimension(value, flag, signed, unit.as_str(), loc);
        } else if self.current_char() == Ch('%') {
            // consume '%'
            self.next_char();
            return Token::new_percentage(value, flag, signed, loc);
        }

        Token::new_number(value, flag, signed, loc)
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Returns either a `<string-token>` or `<bad-string-token>`.
    fn consume_string_token(&mut self) -> Token {
        let loc = self.current_location();

        // consume the opening quote
        let ending = self.next_char();
        let mut value = String::new();

        loop {
            // eof is a parse error but returns what was read so far
            if self.current_char() == ending || self.stream.eof() {
                // consume string ending
                self.next_char();
                return Token::new_quoted_string(value.as_str(), loc);
            }

            // unescaped newline: parse error, the '\n' is NOT consumed
            if self.current_char() == Ch('\n') {
                return Token::new(TokenType::BadString, loc);
            }

            // escaped newline is a line continuation
            if self.current_char() == Ch('\\') && self.stream.look_ahead(1) == Ch('\n') {
                self.consume_chars(2);
                continue;
            }

            if self.is_start_of_escape(0) {
                value.push(self.consume_escaped_code_point());
                continue;
            }

            value.push(self.next_char().into());
        }
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> (Number, NumericFlag, bool) {
        let mut repr = String::new();
        let mut flag = NumericFlag::Integer;

        let signed = matches!(self.current_char(), Ch('+' | '-'));
        if signed {
            repr.push(self.next_char().into());
        }

        repr.push_str(&self.consume_digits());

        if self.current_char() == Ch('.') && self.stream.look_ahead(1).is_numeric() {
            repr.push_str(&self.consume_chars(2));
            repr.push_str(&self.consume_digits());
            flag = NumericFlag::Number;
        }

        // optional exponent: [eE][+-]?digits
        let c1 = self.stream.look_ahead(0);
        let c2 = self.stream.look_ahead(1);
        let c3 = self.stream.look_ahead(2);
        if matches!(c1, Ch('e' | 'E')) && ((matches!(c2, Ch('-' | '+')) && c3.is_numeric()) || c2.is_numeric()) {
            repr.push(self.next_char().into());
            repr.push(self.next_char().into());
            repr.push_str(&self.consume_digits());
            flag = NumericFlag::Number;
        }

        (repr.parse().unwrap_or(0.0), flag, signed)
    }

    /// 4.3.4. [Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// Returns: `<ident-token>`, `<function-token>`, `<url-token>`, or `<bad-url-token>`.
    fn consume_ident_like_seq(&mut self) -> Token {
        let loc = self.current_location();

        let value = self.consume_ident();

        if value.eq_ignore_ascii_case("url") && self.current_char() == Ch('(') {
            // consume '('
            self.next_char();
            self.consume_whitespace();

            // a quoted url() stays a function token
            if matches!(self.current_char(), Ch('"' | '\'')) {
                return Token::new_function(value.as_str(), loc);
            }

            return self.consume_url(loc);
        } else if self.current_char() == Ch('(') {
            // consume '('
            self.next_char();
            return Token::new_function(value.as_str(), loc);
        }

        Token::new_ident(value.as_str(), loc)
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-a-url-token)
    ///
    /// Returns either a `<url-token>` or a `<bad-url-token>`.
    fn consume_url(&mut self, loc: Location) -> Token {
        let mut url = String::new();

        self.consume_whitespace();

        loop {
            if self.current_char() == Ch(')') {
                // consume ')'
                self.next_char();
                break;
            }

            if self.stream.eof() {
                // parse error, but still a url token
                break;
            }

            if self.current_char().is_whitespace() {
                // whitespace is only allowed before the closing paren
                self.consume_whitespace();
                if self.current_char() == Ch(')') || self.stream.eof() {
                    continue;
                }
                self.consume_remnants_of_bad_url();
                return Token::new(TokenType::BadUrl, loc);
            }

            if matches!(self.current_char(), Ch('"' | '\'' | '(')) || self.is_non_printable_char() {
                self.consume_remnants_of_bad_url();
                return Token::new(TokenType::BadUrl, loc);
            }

            if self.is_start_of_escape(0) {
                url.push(self.consume_escaped_code_point());
                continue;
            }

            url.push(self.next_char().into());
        }

        Token::new_url(url.as_str(), loc)
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// Consumes enough of the input to reach a recovery point where normal
    /// tokenizing can resume.
    fn consume_remnants_of_bad_url(&mut self) {
        loop {
            if self.current_char() == Ch(')') || self.stream.eof() {
                self.next_char();
                break;
            }

            if self.is_start_of_escape(0) {
                self.consume_escaped_code_point();
                continue;
            }

            self.next_char();
        }
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-an-escaped-code-point)
    ///
    /// A run of up to six hex digits followed by optional whitespace yields a
    /// code point; 0, surrogates and anything above U+10FFFF map to U+FFFD.
    fn consume_escaped_code_point(&mut self) -> char {
        // consume '\'
        self.next_char();

        if self.stream.eof() {
            // parse error
            return REPLACEMENT;
        }

        let mut hex = String::new();
        while matches!(self.current_char(), Ch(c) if c.is_ascii_hexdigit()) && hex.len() < 6 {
            hex.push(self.next_char().into());
        }

        if hex.is_empty() {
            // not a hex escape; the next code point is taken literally
            return self.next_char().into();
        }

        // a single whitespace after the hex run is part of the escape
        if self.current_char().is_whitespace() {
            self.next_char();
        }

        let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0);
        if code_point == 0 || code_point > MAX_CODE_POINT || (0xD800..=0xDFFF).contains(&code_point) {
            return REPLACEMENT;
        }

        char::from_u32(code_point).unwrap_or(REPLACEMENT)
    }

    /// Consumes `U+XXXX`, `U+XX??` or `U+XXXX-XXXX` forms. The caller checked
    /// `is_unicode_range_start`.
    fn consume_unicode_range(&mut self) -> Token {
        let loc = self.current_location();

        // consume 'u' and '+'
        self.consume_chars(2);

        let mut hex = String::new();
        let mut questions = 0;
        while hex.len() + questions < 6 {
            match self.current_char() {
                Ch(c) if c.is_ascii_hexdigit() && questions == 0 => {
                    hex.push(self.next_char().into());
                }
                Ch('?') => {
                    self.next_char();
                    questions += 1;
                }
                _ => break,
            }
        }

        if questions > 0 {
            let start = format!("{}{}", hex, "0".repeat(questions));
            let end = format!("{}{}", hex, "F".repeat(questions));
            return Token::new_unicode_range(clamp_code_point(&start), clamp_code_point(&end), loc);
        }

        let start = clamp_code_point(&hex);

        if self.current_char() == Ch('-') && matches!(self.stream.look_ahead(1), Ch(c) if c.is_ascii_hexdigit()) {
            // consume '-'
            self.next_char();

            let mut end_hex = String::new();
            while matches!(self.current_char(), Ch(c) if c.is_ascii_hexdigit()) && end_hex.len() < 6 {
                end_hex.push(self.next_char().into());
            }

            return Token::new_unicode_range(start, clamp_code_point(&end_hex), loc);
        }

        Token::new_unicode_range(start, start, loc)
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// The caller ensures the stream starts with an ident sequence.
    fn consume_ident(&mut self) -> String {
        let mut value = String::new();

        loop {
            if self.is_start_of_escape(0) {
                value.push(self.consume_escaped_code_point());
                continue;
            }

            match self.current_char() {
                Ch(c) if self.is_ident_char(Ch(c)) => {
                    value.push(self.next_char().into());
                }
                _ => break,
            }
        }

        value
    }

    fn consume_digits(&mut self) -> String {
        let mut value = String::new();

        while matches!(self.current_char(), Ch(c) if c.is_ascii_digit()) {
            value.push(self.next_char().into());
        }

        value
    }

    fn consume_chars(&mut self, mut len: usize) -> String {
        let mut value = String::new();

        while len > 0 && !self.stream.eof() {
            value.push(self.next_char().into());
            len -= 1;
        }

        value
    }

    fn consume_whitespace(&mut self) {
        while self.current_char().is_whitespace() {
            self.next_char();
        }
    }

    /// [ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
    fn is_ident_start(&self, c: char) -> bool {
        c.is_alphabetic() || !c.is_ascii() || c == '_'
    }

    /// [ident code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
    fn is_ident_char(&self, c: Character) -> bool {
        matches!(c, Ch(c) if self.is_ident_start(c) || c.is_ascii_digit() || c == '-')
    }

    /// [non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
    fn is_non_printable_char(&self) -> bool {
        matches!(self.current_char(), Ch(c)
            if ('\u{0000}'..='\u{0008}').contains(&c)
                || c == '\u{000B}'
                || ('\u{000E}'..='\u{001F}').contains(&c)
                || c == '\u{007F}')
    }

    /// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_start_of_escape(&self, start: usize) -> bool {
        self.stream.look_ahead(start) == Ch('\\') && self.stream.look_ahead(start + 1) != Ch('\n')
    }

    /// 4.3.9. [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#check-if-three-code-points-would-start-an-ident-sequence)
    fn is_next_3_points_starts_ident_seq(&self, start: usize) -> bool {
        let first = self.stream.look_ahead(start);
        let second = self.stream.look_ahead(start + 1);

        if first == Ch('-') {
            return matches!(second, Ch(c) if self.is_ident_start(c))
                || second == Ch('-')
                || self.is_start_of_escape(start + 1);
        }

        if first == Ch('\\') {
            return self.is_start_of_escape(start);
        }

        matches!(first, Ch(c) if self.is_ident_start(c))
    }

    fn is_signed_decimal(&self, start: usize) -> bool {
        let current = self.stream.look_ahead(start);
        let next = self.stream.look_ahead(start + 1);
        let last = self.stream.look_ahead(start + 2);

        // e.g. +1, -1, +.1, -0.01
        matches!(current, Ch('+' | '-')) && ((next == Ch('.') && last.is_numeric()) || next.is_numeric())
    }

    /// `u`/`U` followed by `+` and a hex digit or `?` begins a unicode range.
    fn is_unicode_range_start(&self) -> bool {
        self.stream.look_ahead(1) == Ch('+')
            && matches!(self.stream.look_ahead(2), Ch(c) if c.is_ascii_hexdigit() || c == '?')
    }

    fn current_char(&self) -> Character {
        self.stream.look_ahead(0)
    }

    fn next_char(&mut self) -> Character {
        let c = self.stream.read();
        self.location.inc(c);
        c
    }

    fn look_ahead_slice(&self, len: usize) -> String {
        self.stream.look_ahead_slice(len)
    }
}

/// Convenience entry point: tokenizes a complete source string.
pub fn tokenize_str(source: &str) -> Vec<Token> {
    let mut stream = ByteStream::new();
    stream.read_from_str(source);
    stream.close();

    Tokenizer::new(&mut stream, Location::default()).tokenize()
}

fn clamp_code_point(hex: &str) -> u32 {
    u32::from_str_radix(hex, 16).unwrap_or(0).min(MAX_CODE_POINT)
}
