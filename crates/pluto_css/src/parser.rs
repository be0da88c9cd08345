use std::collections::HashMap;
use std::sync::Arc;

use pluto_interface::css::CssOrigin;
use pluto_interface::fetcher::ResourceFetcher;
use pluto_shared::config::{Context, ParserConfig};

use crate::properties::{property_id, PropertyId};
use crate::stream::TokenStream;
use crate::stylesheet::{CssDeclaration, CssLog, CssRule, CssStylesheet, StyleRule};
use crate::tokenizer::{tokenize_str, Token, TokenType};
use crate::values::{CssValue, VariableData};

pub mod anplusb;
pub mod at_rule;
pub mod calc;
pub mod selector;
pub mod shorthand;
pub mod value;

/// `@import` chains deeper than this are skipped without error.
pub(crate) const MAX_IMPORT_DEPTH: usize = 256;

/// Recursive-descent CSS parser over a [`TokenStream`].
///
/// Parsing never fails as a whole: rules and declarations that do not parse
/// are discarded, a log entry is left behind, and parsing continues after the
/// next safe recovery point.
pub struct CssParser<'a> {
    pub(crate) config: ParserConfig,
    pub(crate) origin: CssOrigin,
    /// Url of the sheet being parsed; base for `@import` and `url()`
    pub(crate) source_url: String,
    pub(crate) fetcher: Option<&'a dyn ResourceFetcher>,
    pub(crate) import_depth: usize,
    pub(crate) log: Vec<CssLog>,
    pub(crate) namespaces: HashMap<String, String>,
}

impl<'a> CssParser<'a> {
    /// Bare parser for unit tests of individual grammar productions.
    #[cfg(test)]
    pub(crate) fn test_default() -> CssParser<'static> {
        CssParser::new(ParserConfig::default(), CssOrigin::Author, "", None)
    }

    fn new(config: ParserConfig, origin: CssOrigin, source_url: &str, fetcher: Option<&'a dyn ResourceFetcher>) -> Self {
        Self {
            config,
            origin,
            source_url: source_url.to_string(),
            fetcher,
            import_depth: 0,
            log: Vec::new(),
            namespaces: HashMap::new(),
        }
    }

    /// Parses a complete stylesheet from source text.
    pub fn parse_str(
        data: &str,
        config: ParserConfig,
        origin: CssOrigin,
        source_url: &str,
        fetcher: Option<&'a dyn ResourceFetcher>,
    ) -> CssStylesheet {
        let mut parser = CssParser::new(config, origin, source_url, fetcher);
        parser.parse_sheet(data)
    }

    /// Parses the declaration text of a `style` attribute.
    pub fn parse_inline_style(data: &str) -> Vec<CssDeclaration> {
        let config = ParserConfig {
            context: Context::DeclarationList,
            ..Default::default()
        };
        let mut parser = CssParser::new(config, CssOrigin::Inline, "", None);
        let tokens = tokenize_str(data);
        let mut stream = TokenStream::new(&tokens);
        parser.parse_declaration_list(&mut stream)
    }

    pub(crate) fn parse_sheet(&mut self, data: &str) -> CssStylesheet {
        log::trace!("parse_sheet {}", self.source_url);

        let tokens = tokenize_str(data);
        let mut stream = TokenStream::new(&tokens);
        let rules = self.parse_rule_list(&mut stream, true);

        CssStylesheet {
            rules,
            origin: self.origin,
            url: self.source_url.clone(),
            parse_log: std::mem::take(&mut self.log),
            namespaces: std::mem::take(&mut self.namespaces),
        }
    }

    /// Consumes a list of rules. At the top level, `CDO`/`CDC` tokens are
    /// skipped for HTML-comment compatibility.
    pub(crate) fn parse_rule_list(&mut self, stream: &mut TokenStream, top_level: bool) -> Vec<CssRule> {
        let mut rules = Vec::new();

        loop {
            stream.consume_whitespace();
            match &stream.peek(0).token_type {
                TokenType::Eof => break,
                TokenType::Cdo | TokenType::Cdc if top_level => {
                    stream.consume();
                }
                TokenType::Cdo | TokenType::Cdc => {
                    // inside a block these are plain garbage
                    let location = stream.current_location();
                    self.log.push(CssLog::error("unexpected CDO/CDC", location));
                    stream.consume();
                }
                TokenType::AtKeyword(_) => {
                    if let Some(rule) = self.parse_at_rule(stream) {
                        rules.push(rule);
                    }
                }
                _ => {
                    if let Some(rule) = self.parse_style_rule(stream) {
                        rules.push(rule);
                    }
                }
            }
        }

        rules
    }

    /// Parses one style rule: a selector list prelude plus a `{}` block of
    /// declarations. A bad prelude discards the whole rule, block included.
    pub(crate) fn parse_style_rule(&mut self, stream: &mut TokenStream) -> Option<CssRule> {
        let location = stream.current_location();
        let prelude = stream.consume_components_until(&[TokenType::LCurly, TokenType::Semicolon]);

        if stream.peek(0).token_type == TokenType::Semicolon {
            // a qualified rule cannot end in a semicolon
            stream.consume();
            self.log.push(CssLog::error("unexpected ; in style rule", location));
            return None;
        }

        let mut block = stream.consume_block()?;

        let mut prelude_stream = TokenStream::new(prelude);
        let Some(selectors) = self.parse_selector_list(&mut prelude_stream, false) else {
            self.log.push(CssLog::error("invalid selector list", location));
            return None;
        };

        let declarations = self.parse_declaration_list(&mut block);

        Some(CssRule::Style(Arc::new(StyleRule { selectors, declarations })))
    }

    /// Parses the interior of a declaration block.
    pub(crate) fn parse_declaration_list(&mut self, stream: &mut TokenStream) -> Vec<CssDeclaration> {
        let mut declarations = Vec::new();

        loop {
            stream.consume_whitespace();
            match &stream.peek(0).token_type {
                TokenType::Eof => break,
                TokenType::Semicolon => {
                    stream.consume();
                }
                TokenType::Ident(_) => {
                    declarations.extend(self.parse_declaration(stream));
                }
                _ => {
                    // skip to the next recovery point
                    let location = stream.current_location();
                    self.log.push(CssLog::error("expected declaration", location));
                    stream.consume_components_until(&[TokenType::Semicolon]);
                }
            }
        }

        declarations
    }

    /// Parses one declaration: `name : value [!important]`. Emits zero or
    /// more longhand declarations (shorthands expand here).
    pub(crate) fn parse_declaration(&mut self, stream: &mut TokenStream) -> Vec<CssDeclaration> {
        let location = stream.current_location();
        let Token {
            token_type: TokenType::Ident(name),
            ..
        } = stream.consume()
        else {
            return Vec::new();
        };

        stream.consume_whitespace();
        if !stream.peek(0).is_colon() {
            self.log.push(CssLog::error("expected : after property name", location));
            stream.consume_components_until(&[TokenType::Semicolon]);
            return Vec::new();
        }
        stream.consume();
        stream.consume_whitespace();

        let value_tokens = stream.consume_components_until(&[TokenType::Semicolon]);
        let (value_tokens, important) = strip_important(value_tokens);
        let value_tokens = trim_whitespace(value_tokens);

        if value_tokens.is_empty() && !name.starts_with("--") {
            self.log.push(CssLog::error("empty declaration value", location));
            return Vec::new();
        }

        let declarations = self.parse_declaration_value(&name, value_tokens, important);
        if declarations.is_empty() {
            self.log.push(CssLog::warn(
                &format!("dropped declaration for '{name}'"),
                location,
            ));
        }
        declarations
    }

    /// Property-value entry point: given a name and its value tokens,
    /// produce the longhand declarations. Also used when re-parsing after
    /// `var()` substitution.
    pub fn parse_declaration_value(&mut self, name: &str, tokens: &[Token], important: bool) -> Vec<CssDeclaration> {
        let id = property_id(name);

        match id {
            PropertyId::Unknown => Vec::new(),
            PropertyId::Custom => {
                // custom property values stay unparsed
                vec![CssDeclaration::custom(
                    name,
                    CssValue::CustomProperty(name.to_string(), VariableData::new(tokens.to_vec())),
                    important,
                )]
            }
            _ => self.parse_property_value(id, tokens, important),
        }
    }

    /// Same as [`Self::parse_declaration_value`] but with the property id
    /// already resolved.
    pub fn parse_property_value(&mut self, id: PropertyId, tokens: &[Token], important: bool) -> Vec<CssDeclaration> {
        let data = VariableData::new(tokens.to_vec());
        if data.contains_var() {
            // defer until the cascade can substitute the references; the
            // original property rides along for the re-parse
            if id.is_shorthand() {
                return id
                    .longhands()
                    .iter()
                    .map(|longhand| {
                        CssDeclaration::new(*longhand, CssValue::VariableReference(data.clone(), id), important)
                    })
                    .collect();
            }
            return vec![CssDeclaration::new(id, CssValue::VariableReference(data, id), important)];
        }

        if let Some(wide) = parse_wide_keyword(tokens) {
            if id.is_shorthand() {
                return id
                    .longhands()
                    .iter()
                    .map(|longhand| CssDeclaration::new(*longhand, wide.clone(), important))
                    .collect();
            }
            return vec![CssDeclaration::new(id, wide, important)];
        }

        let mut stream = TokenStream::new(tokens);
        if id.is_shorthand() {
            return self.parse_shorthand(id, &mut stream, important).unwrap_or_default();
        }

        let Some(value) = self.parse_longhand(id, &mut stream) else {
            return Vec::new();
        };
        stream.consume_whitespace();
        if !stream.at_end() {
            // trailing garbage invalidates the declaration
            return Vec::new();
        }
        vec![CssDeclaration::new(id, value, important)]
    }
}

/// Property-value reparse entry point: parses a token sequence as the value
/// of the given property. Used when resolving `var()` substitutions, which
/// happen long after the owning sheet's parser is gone.
pub fn reparse_property_value(id: PropertyId, tokens: &[Token], important: bool) -> Vec<CssDeclaration> {
    let mut parser = CssParser::new(ParserConfig::default(), CssOrigin::Author, "", None);
    parser.parse_property_value(id, tokens, important)
}

/// Splits a trailing `!important` off a declaration value.
pub(crate) fn strip_important(tokens: &[Token]) -> (&[Token], bool) {
    let mut end = tokens.len();
    while end > 0 && tokens[end - 1].is_whitespace() {
        end -= 1;
    }
    if end >= 2 {
        let ident_ok = tokens[end - 1].is_ident_value("important");
        let mut bang = end - 1;
        while bang > 0 && tokens[bang - 1].is_whitespace() {
            bang -= 1;
        }
        if ident_ok && bang > 0 && tokens[bang - 1].is_delim('!') {
            return (&tokens[..bang - 1], true);
        }
    }
    (tokens, false)
}

pub(crate) fn trim_whitespace(tokens: &[Token]) -> &[Token] {
    let start = tokens.iter().position(|t| !t.is_whitespace()).unwrap_or(tokens.len());
    let end = tokens.iter().rposition(|t| !t.is_whitespace()).map_or(start, |i| i + 1);
    &tokens[start..end]
}

/// Recognizes a lone wide keyword (`initial`/`inherit`/`unset`).
pub(crate) fn parse_wide_keyword(tokens: &[Token]) -> Option<CssValue> {
    let meaningful: Vec<&Token> = tokens.iter().filter(|t| !t.is_whitespace()).collect();
    if meaningful.len() != 1 {
        return None;
    }
    match &meaningful[0].token_type {
        TokenType::Ident(name) if name.eq_ignore_ascii_case("initial") => Some(CssValue::Initial),
        TokenType::Ident(name) if name.eq_ignore_ascii_case("inherit") => Some(CssValue::Inherit),
        TokenType::Ident(name) if name.eq_ignore_ascii_case("unset") => Some(CssValue::Unset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ValueId;

    fn parse(data: &str) -> CssStylesheet {
        CssParser::parse_str(data, ParserConfig::default(), CssOrigin::Author, "test.css", None)
    }

    fn style_rules(sheet: &CssStylesheet) -> Vec<Arc<StyleRule>> {
        sheet
            .rules
            .iter()
            .filter_map(|rule| match rule {
                CssRule::Style(rule) => Some(Arc::clone(rule)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn parses_a_simple_rule() {
        let sheet = parse("p { color: red }");
        let rules = style_rules(&sheet);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations.len(), 1);
        assert_eq!(rules[0].declarations[0].id, PropertyId::Color);
    }

    #[test]
    fn discards_bad_rule_and_continues() {
        let sheet = parse("p { color: red } 23skidoo { x } a { color: blue }");
        let rules = style_rules(&sheet);
        assert_eq!(rules.len(), 2);
        assert!(!sheet.parse_log.is_empty());
    }

    #[test]
    fn discards_bad_declaration_and_continues() {
        let sheet = parse("p { colour: red; color: green; ; color-taste: umami }");
        let rules = style_rules(&sheet);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations.len(), 1);
        assert!(rules[0].declarations[0].value.is_ident(ValueId::None) == false);
    }

    #[test]
    fn important_is_stripped() {
        let sheet = parse("p { color: red !important }");
        let rules = style_rules(&sheet);
        assert!(rules[0].declarations[0].important);

        let sheet = parse("p { color: red ! important }");
        let rules = style_rules(&sheet);
        assert!(rules[0].declarations[0].important);
    }

    #[test]
    fn custom_property_kept_as_tokens() {
        let sheet = parse(":root { --main: 10px solid }");
        let rules = style_rules(&sheet);
        let declaration = &rules[0].declarations[0];
        assert_eq!(declaration.id, PropertyId::Custom);
        assert_eq!(declaration.name, "--main");
        assert!(matches!(declaration.value, CssValue::CustomProperty(..)));
    }

    #[test]
    fn var_reference_defers_parsing() {
        let sheet = parse("p { margin: var(--m) }");
        let rules = style_rules(&sheet);
        // the shorthand fans out to all four longhands, each deferred
        assert_eq!(rules[0].declarations.len(), 4);
        assert!(rules[0]
            .declarations
            .iter()
            .all(|d| matches!(d.value, CssValue::VariableReference(..))));
    }

    #[test]
    fn wide_keyword_expands_shorthand() {
        let sheet = parse("p { margin: inherit }");
        let rules = style_rules(&sheet);
        assert_eq!(rules[0].declarations.len(), 4);
        assert!(rules[0].declarations.iter().all(|d| d.value == CssValue::Inherit));
    }

    #[test]
    fn cdo_cdc_ignored_at_top_level() {
        let sheet = parse("<!-- p { color: red } -->");
        assert_eq!(style_rules(&sheet).len(), 1);
    }

    #[test]
    fn inline_style_declarations() {
        let declarations = CssParser::parse_inline_style("color: red; margin-top: 4px");
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].id, PropertyId::Color);
        assert_eq!(declarations[1].id, PropertyId::MarginTop);
    }

    #[test]
    fn strip_important_requires_bang() {
        let tokens = tokenize_str("red important");
        let (rest, important) = strip_important(&tokens[..tokens.len() - 1]);
        assert!(!important);
        assert_eq!(rest.len(), 3);
    }

    // run with --ignored to see the parser trace for a snippet
    #[test]
    #[ignore]
    fn trace_parse() {
        simple_logger::SimpleLogger::new().init().unwrap();

        let sheet = parse("div.note > p:first-of-type { margin: var(--m, 4px) !important }");
        assert_eq!(style_rules(&sheet).len(), 1);
    }
}
