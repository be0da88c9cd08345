use std::sync::Arc;

use crate::counter_style::{CounterStyleRule, CounterSystem};
use crate::font_face::{FontFaceRule, FontSlope, FontSource};
use crate::parser::{CssParser, MAX_IMPORT_DEPTH};
use crate::stream::TokenStream;
use crate::stylesheet::{
    CssLog, CssRule, ImportRule, MediaRule, NamespaceRule, PageMarginRule, PageMarginType, PageRule, PageSelector,
    SelectorMatchType, SimpleSelector,
};
use crate::tokenizer::{NumericFlag, Token, TokenType};

impl CssParser<'_> {
    /// Dispatches an at-rule by name. Unknown at-rules are consumed
    /// (prelude and block) and dropped.
    pub(crate) fn parse_at_rule(&mut self, stream: &mut TokenStream) -> Option<CssRule> {
        let location = stream.current_location();
        let TokenType::AtKeyword(name) = stream.peek(0).token_type.clone() else {
            return None;
        };
        stream.consume();

        log::trace!("parse_at_rule @{name}");

        // split into prelude and optional block
        let prelude = stream.consume_components_until(&[TokenType::LCurly, TokenType::Semicolon]);
        let mut prelude = TokenStream::new(prelude);

        let block = match stream.peek(0).token_type {
            TokenType::LCurly => stream.consume_block(),
            TokenType::Semicolon => {
                stream.consume();
                None
            }
            _ => None,
        };

        let rule = match name.to_ascii_lowercase().as_str() {
            "import" if block.is_none() => self.parse_import_rule(&mut prelude),
            "namespace" if block.is_none() => self.parse_namespace_rule(&mut prelude),
            "media" => block.and_then(|mut block| self.parse_media_rule(&mut prelude, &mut block)),
            "font-face" => block.and_then(|mut block| self.parse_font_face_rule(&mut prelude, &mut block)),
            "counter-style" => block.and_then(|mut block| self.parse_counter_style_rule(&mut prelude, &mut block)),
            "page" => block.and_then(|mut block| self.parse_page_rule(&mut prelude, &mut block)),
            _ => {
                self.log.push(CssLog::warn(&format!("unknown at-rule @{name}"), location));
                None
            }
        };

        if rule.is_none() {
            self.log.push(CssLog::error(&format!("dropped @{name} rule"), location));
        }
        rule
    }

    /// `@import <url> [media-query-list];` — the target sheet is fetched
    /// and parsed inline. Deep import chains are cut off silently; fetch
    /// failures import nothing.
    fn parse_import_rule(&mut self, prelude: &mut TokenStream) -> Option<CssRule> {
        prelude.consume_whitespace();

        let href = match prelude.peek(0).token_type.clone() {
            TokenType::QuotedString(href) => {
                prelude.consume_including_whitespace();
                href
            }
            _ => self.parse_url_value(prelude)?,
        };

        let queries = self.parse_media_query_list(prelude);
        let completed = self.complete_url(&href);

        let mut rules = Vec::new();
        if self.import_depth < MAX_IMPORT_DEPTH {
            if let Some(fetcher) = self.fetcher {
                let data = fetcher.fetch_url(&completed);
                if !data.is_failure() {
                    let mut nested = CssParser {
                        config: self.config.clone(),
                        origin: self.origin,
                        source_url: completed.clone(),
                        fetcher: Some(fetcher),
                        import_depth: self.import_depth + 1,
                        log: Vec::new(),
                        namespaces: std::collections::HashMap::new(),
                    };
                    let sheet = nested.parse_sheet(&data.as_text());
                    self.log.extend(sheet.parse_log);
                    rules = sheet.rules;
                }
            }
        }

        Some(CssRule::Import(ImportRule {
            href: completed,
            queries,
            rules,
        }))
    }

    /// `@namespace [prefix] <uri>;`
    fn parse_namespace_rule(&mut self, prelude: &mut TokenStream) -> Option<CssRule> {
        prelude.consume_whitespace();

        let prefix = match prelude.peek(0).token_type.clone() {
            TokenType::Ident(prefix) => {
                prelude.consume_including_whitespace();
                Some(prefix)
            }
            _ => None,
        };

        let uri = match prelude.peek(0).token_type.clone() {
            TokenType::QuotedString(uri) | TokenType::Url(uri) => {
                prelude.consume_including_whitespace();
                uri
            }
            _ => return None,
        };

        prelude.consume_whitespace();
        if !prelude.at_end() {
            return None;
        }

        self.namespaces
            .insert(prefix.clone().unwrap_or_default(), uri.clone());
        Some(CssRule::Namespace(NamespaceRule { prefix, uri }))
    }

    fn parse_media_rule(&mut self, prelude: &mut TokenStream, block: &mut TokenStream) -> Option<CssRule> {
        let queries = self.parse_media_query_list(prelude);
        let rules = self.parse_rule_list(block, false);
        Some(CssRule::Media(MediaRule { queries, rules }))
    }

    /// `@font-face { descriptors }` — family and src are mandatory.
    fn parse_font_face_rule(&mut self, prelude: &mut TokenStream, block: &mut TokenStream) -> Option<CssRule> {
        prelude.consume_whitespace();
        if !prelude.at_end() {
            return None;
        }

        let mut rule = FontFaceRule::default();

        for (name, tokens) in descriptor_list(block) {
            let mut value = TokenStream::new(&tokens);
            value.consume_whitespace();
            match name.as_str() {
                "font-family" => match value.peek(0).token_type.clone() {
                    TokenType::QuotedString(family) | TokenType::Ident(family) => {
                        rule.family = Some(family);
                    }
                    _ => {}
                },
                "src" => {
                    if let Some(sources) = self.parse_font_sources(&mut value) {
                        rule.sources = sources;
                    }
                }
                "font-weight" => {
                    if let Some(range) = self.parse_weight_range(&mut value) {
                        rule.weight = Some(range);
                    }
                }
                "font-stretch" => {
                    if let Some(range) = self.parse_stretch_range(&mut value) {
                        rule.stretch = Some(range);
                    }
                }
                "font-style" => {
                    if let Some(slope) = self.parse_slope_descriptor(&mut value) {
                        rule.slope = Some(slope);
                    }
                }
                "unicode-range" => {
                    rule.unicode_ranges = self.parse_unicode_ranges(&mut value);
                }
                _ => {}
            }
        }

        if rule.family.is_none() || rule.sources.is_empty() {
            return None;
        }
        Some(CssRule::FontFace(rule))
    }

    /// `src`: comma separated `url(...) [format(...)]` and `local(...)`
    /// entries.
    fn parse_font_sources(&mut self, stream: &mut TokenStream) -> Option<Vec<FontSource>> {
        let mut sources = Vec::new();

        loop {
            stream.consume_whitespace();
            match stream.peek(0).token_type.clone() {
                TokenType::Function(name) if name.eq_ignore_ascii_case("local") => {
                    let mut block = stream.consume_block()?;
                    block.consume_whitespace();
                    let name = match block.peek(0).token_type.clone() {
                        TokenType::QuotedString(name) => name,
                        TokenType::Ident(_) => {
                            // unquoted local names may span several idents
                            let mut words = Vec::new();
                            while let TokenType::Ident(word) = block.peek(0).token_type.clone() {
                                block.consume_including_whitespace();
                                words.push(word);
                            }
                            words.join(" ")
                        }
                        _ => return None,
                    };
                    sources.push(FontSource::Local(name));
                }
                _ => {
                    let href = self.parse_url_value(stream)?;
                    let mut format = None;
                    if stream.peek(0).is_function_name("format") {
                        let mut block = stream.consume_block()?;
                        block.consume_whitespace();
                        match block.peek(0).token_type.clone() {
                            TokenType::QuotedString(f) | TokenType::Ident(f) => format = Some(f),
                            _ => return None,
                        }
                    }
                    sources.push(FontSource::Url { href, format });
                }
            }

            if !stream.consume_comma_including_whitespace() {
                break;
            }
        }

        stream.consume_whitespace();
        if sources.is_empty() {
            return None;
        }
        Some(sources)
    }

    /// 1-2 weights, each a number or `normal`/`bold`.
    fn parse_weight_range(&mut self, stream: &mut TokenStream) -> Option<(f32, f32)> {
        let lo = self.parse_weight_component(stream)?;
        let hi = self.parse_weight_component(stream).unwrap_or(lo);
        Some((lo.min(hi), lo.max(hi)))
    }

    fn parse_weight_component(&mut self, stream: &mut TokenStream) -> Option<f32> {
        stream.consume_whitespace();
        match stream.peek(0).token_type.clone() {
            TokenType::Number { value, .. } if (1.0..=1000.0).contains(&value) => {
                stream.consume_including_whitespace();
                Some(value)
            }
            TokenType::Ident(name) if name.eq_ignore_ascii_case("normal") => {
                stream.consume_including_whitespace();
                Some(400.0)
            }
            TokenType::Ident(name) if name.eq_ignore_ascii_case("bold") => {
                stream.consume_including_whitespace();
                Some(700.0)
            }
            _ => None,
        }
    }

    /// 1-2 stretches, each a percentage or a stretch keyword.
    fn parse_stretch_range(&mut self, stream: &mut TokenStream) -> Option<(f32, f32)> {
        let lo = self.parse_stretch_component(stream)?;
        let hi = self.parse_stretch_component(stream).unwrap_or(lo);
        Some((lo.min(hi), lo.max(hi)))
    }

    fn parse_stretch_component(&mut self, stream: &mut TokenStream) -> Option<f32> {
        stream.consume_whitespace();
        if let TokenType::Percentage { value, .. } = stream.peek(0).token_type.clone() {
            if value < 0.0 {
                return None;
            }
            stream.consume_including_whitespace();
            return Some(value);
        }
        let value = self.parse_font_stretch(stream)?;
        value.as_ident().map(crate::font_face::stretch_keyword_percent)
    }

    /// `normal`, `italic`, or `oblique` with up to two angles.
    fn parse_slope_descriptor(&mut self, stream: &mut TokenStream) -> Option<FontSlope> {
        stream.consume_whitespace();
        let TokenType::Ident(name) = stream.peek(0).token_type.clone() else {
            return None;
        };
        match name.to_ascii_lowercase().as_str() {
            "normal" => {
                stream.consume_including_whitespace();
                Some(FontSlope::Normal)
            }
            "italic" => {
                stream.consume_including_whitespace();
                Some(FontSlope::Italic)
            }
            "oblique" => {
                stream.consume_including_whitespace();
                let lo = self.parse_angle_degrees(stream).unwrap_or(14.0);
                let hi = self.parse_angle_degrees(stream).unwrap_or(lo);
                Some(FontSlope::Oblique(lo.min(hi), lo.max(hi)))
            }
            _ => None,
        }
    }

    fn parse_angle_degrees(&mut self, stream: &mut TokenStream) -> Option<f32> {
        let TokenType::Dimension { value, unit, .. } = stream.peek(0).token_type.clone() else {
            return None;
        };
        let unit = crate::values::AngleUnit::from_name(&unit)?;
        stream.consume_including_whitespace();
        Some(unit.to_degrees(value))
    }

    /// Comma separated unicode-range tokens; `from > to` entries are
    /// dropped.
    fn parse_unicode_ranges(&mut self, stream: &mut TokenStream) -> Vec<(u32, u32)> {
        let mut ranges = Vec::new();
        loop {
            stream.consume_whitespace();
            let TokenType::UnicodeRange { start, end } = stream.peek(0).token_type.clone() else {
                break;
            };
            stream.consume_including_whitespace();
            if start <= end {
                ranges.push((start, end));
            }
            if !stream.consume_comma_including_whitespace() {
                break;
            }
        }
        ranges
    }

    /// `@counter-style <name> { descriptors }`
    fn parse_counter_style_rule(&mut self, prelude: &mut TokenStream, block: &mut TokenStream) -> Option<CssRule> {
        prelude.consume_whitespace();
        let TokenType::Ident(name) = prelude.peek(0).token_type.clone() else {
            return None;
        };
        prelude.consume_including_whitespace();
        if !prelude.at_end() {
            return None;
        }
        if self.origin != pluto_interface::css::CssOrigin::UserAgent
            && matches!(name.to_ascii_lowercase().as_str(), "none" | "decimal" | "disc")
        {
            // authors cannot redefine these names
            return None;
        }

        let mut rule = CounterStyleRule::new(&name);

        for (descriptor, tokens) in descriptor_list(block) {
            let mut value = TokenStream::new(&tokens);
            value.consume_whitespace();
            match descriptor.as_str() {
                "system" => {
                    let TokenType::Ident(system) = value.peek(0).token_type.clone() else {
                        continue;
                    };
                    let Some(system) = CounterSystem::from_name(&system) else {
                        continue;
                    };
                    value.consume_including_whitespace();
                    rule.system = Some(system);
                    match system {
                        CounterSystem::Fixed => {
                            if let TokenType::Number { value: first, flag, .. } = value.peek(0).token_type.clone() {
                                if flag == NumericFlag::Integer {
                                    rule.first_symbol_value = Some(first as i32);
                                }
                            }
                        }
                        CounterSystem::Extends => {
                            if let TokenType::Ident(target) = value.peek(0).token_type.clone() {
                                rule.extends_name = Some(target);
                            }
                        }
                        _ => {}
                    }
                }
                "symbols" => {
                    let mut symbols = Vec::new();
                    loop {
                        value.consume_whitespace();
                        match value.peek(0).token_type.clone() {
                            TokenType::QuotedString(symbol) | TokenType::Ident(symbol) => {
                                value.consume();
                                symbols.push(symbol);
                            }
                            _ => break,
                        }
                    }
                    if !symbols.is_empty() {
                        rule.symbols = Some(symbols);
                    }
                }
                "additive-symbols" => {
                    let mut entries = Vec::new();
                    loop {
                        value.consume_whitespace();
                        let TokenType::Number { value: weight, flag, .. } = value.peek(0).token_type.clone() else {
                            break;
                        };
                        if flag != NumericFlag::Integer || weight < 0.0 {
                            break;
                        }
                        value.consume_including_whitespace();
                        let symbol = match value.peek(0).token_type.clone() {
                            TokenType::QuotedString(symbol) | TokenType::Ident(symbol) => symbol,
                            _ => break,
                        };
                        value.consume();
                        entries.push((weight as i32, symbol));
                        if !value.consume_comma_including_whitespace() {
                            break;
                        }
                    }
                    if !entries.is_empty() {
                        rule.additive_symbols = Some(entries);
                    }
                }
                "negative" => {
                    let prefix = match value.peek(0).token_type.clone() {
                        TokenType::QuotedString(s) | TokenType::Ident(s) => s,
                        _ => continue,
                    };
                    value.consume_including_whitespace();
                    let suffix = match value.peek(0).token_type.clone() {
                        TokenType::QuotedString(s) | TokenType::Ident(s) => {
                            value.consume();
                            s
                        }
                        _ => String::new(),
                    };
                    rule.negative = Some((prefix, suffix));
                }
                "prefix" => {
                    if let TokenType::QuotedString(s) | TokenType::Ident(s) = value.peek(0).token_type.clone() {
                        rule.prefix = Some(s);
                    }
                }
                "suffix" => {
                    if let TokenType::QuotedString(s) | TokenType::Ident(s) = value.peek(0).token_type.clone() {
                        rule.suffix = Some(s);
                    }
                }
                "range" => {
                    if value.peek(0).is_ident_value("auto") {
                        rule.range = None;
                        continue;
                    }
                    let mut ranges = Vec::new();
                    loop {
                        let lo = self.parse_range_bound(&mut value);
                        let hi = self.parse_range_bound(&mut value);
                        match (lo, hi) {
                            (Some(lo), Some(hi)) => ranges.push((lo, hi)),
                            _ => break,
                        }
                        if !value.consume_comma_including_whitespace() {
                            break;
                        }
                    }
                    if !ranges.is_empty() {
                        rule.range = Some(ranges);
                    }
                }
                "pad" => {
                    let TokenType::Number { value: count, flag, .. } = value.peek(0).token_type.clone() else {
                        continue;
                    };
                    if flag != NumericFlag::Integer || count < 0.0 {
                        continue;
                    }
                    value.consume_including_whitespace();
                    if let TokenType::QuotedString(symbol) | TokenType::Ident(symbol) = value.peek(0).token_type.clone() {
                        rule.pad = Some((count as u32, symbol));
                    }
                }
                "fallback" => {
                    if let TokenType::Ident(fallback) = value.peek(0).token_type.clone() {
                        rule.fallback = Some(fallback);
                    }
                }
                _ => {}
            }
        }

        Some(CssRule::CounterStyle(rule))
    }

    /// One range bound: an integer or `infinite`. Returns
    /// `Some(None)`-style infinite bounds as `None` inside the tuple.
    fn parse_range_bound(&mut self, stream: &mut TokenStream) -> Option<Option<i64>> {
        stream.consume_whitespace();
        match stream.peek(0).token_type.clone() {
            TokenType::Number { value, flag, .. } if flag == NumericFlag::Integer => {
                stream.consume_including_whitespace();
                Some(Some(value as i64))
            }
            TokenType::Ident(name) if name.eq_ignore_ascii_case("infinite") => {
                stream.consume_including_whitespace();
                Some(None)
            }
            _ => None,
        }
    }

    /// `@page [selector-list] { declarations and margin boxes }`
    fn parse_page_rule(&mut self, prelude: &mut TokenStream, block: &mut TokenStream) -> Option<CssRule> {
        let selectors = self.parse_page_selector_list(prelude)?;

        let mut declarations = Vec::new();
        let mut margin_rules = Vec::new();

        loop {
            block.consume_whitespace();
            match block.peek(0).token_type.clone() {
                TokenType::Eof => break,
                TokenType::Semicolon => {
                    block.consume();
                }
                TokenType::AtKeyword(name) => {
                    block.consume();
                    let Some(margin_type) = PageMarginType::from_name(&name) else {
                        // skip unknown nested at-rules
                        block.consume_components_until(&[TokenType::LCurly]);
                        let _ = block.consume_block();
                        continue;
                    };
                    block.consume_whitespace();
                    let Some(mut margin_block) = block.consume_block() else {
                        continue;
                    };
                    margin_rules.push(PageMarginRule {
                        margin_type,
                        declarations: self.parse_declaration_list(&mut margin_block),
                    });
                }
                TokenType::Ident(_) => {
                    declarations.extend(self.parse_declaration(block));
                }
                _ => {
                    let location = block.current_location();
                    self.log.push(CssLog::error("expected declaration or margin box", location));
                    block.consume_components_until(&[TokenType::Semicolon]);
                }
            }
        }

        Some(CssRule::Page(Arc::new(PageRule {
            selectors,
            declarations,
            margin_rules,
        })))
    }

    /// `@page` selectors are compound-only: an optional page name plus
    /// `:first`, `:blank`, `:left`, `:right` and `:nth()` pseudos.
    fn parse_page_selector_list(&mut self, stream: &mut TokenStream) -> Option<Vec<PageSelector>> {
        let mut selectors = Vec::new();

        stream.consume_whitespace();
        if stream.at_end() {
            // `@page { ... }` matches every page
            return Some(selectors);
        }

        loop {
            stream.consume_whitespace();
            let mut compound = PageSelector::new();

            if let TokenType::Ident(name) = stream.peek(0).token_type.clone() {
                stream.consume();
                let mut simple = SimpleSelector::new(SelectorMatchType::PseudoPageName);
                simple.name = name;
                compound.push(simple);
            }

            while stream.peek(0).is_colon() {
                stream.consume();
                match stream.peek(0).token_type.clone() {
                    TokenType::Ident(name) => {
                        stream.consume();
                        let match_type = match name.to_ascii_lowercase().as_str() {
                            "first" => SelectorMatchType::PseudoPageFirst,
                            "left" => SelectorMatchType::PseudoPageLeft,
                            "right" => SelectorMatchType::PseudoPageRight,
                            "blank" => SelectorMatchType::PseudoPageBlank,
                            _ => return None,
                        };
                        compound.push(SimpleSelector::new(match_type));
                    }
                    TokenType::Function(name) if name.eq_ignore_ascii_case("nth") => {
                        let mut block = stream.consume_block()?;
                        let nth = self.parse_anplusb(&mut block)?;
                        block.consume_whitespace();
                        if !block.at_end() {
                            return None;
                        }
                        let mut simple = SimpleSelector::new(SelectorMatchType::PseudoPageNth);
                        simple.nth = nth;
                        compound.push(simple);
                    }
                    _ => return None,
                }
            }

            if compound.is_empty() {
                return None;
            }
            selectors.push(compound);

            stream.consume_whitespace();
            match stream.peek(0).token_type {
                TokenType::Comma => {
                    stream.consume();
                }
                TokenType::Eof => break,
                _ => return None,
            }
        }

        Some(selectors)
    }
}

/// Splits a block into `(descriptor-name, value-tokens)` pairs. Entries
/// without a name or colon are skipped to the next semicolon.
fn descriptor_list(block: &mut TokenStream) -> Vec<(String, Vec<Token>)> {
    let mut descriptors = Vec::new();

    loop {
        block.consume_whitespace();
        match block.peek(0).token_type.clone() {
            TokenType::Eof => break,
            TokenType::Semicolon => {
                block.consume();
            }
            TokenType::Ident(name) => {
                block.consume();
                block.consume_whitespace();
                if !block.peek(0).is_colon() {
                    block.consume_components_until(&[TokenType::Semicolon]);
                    continue;
                }
                block.consume();
                let tokens = block.consume_components_until(&[TokenType::Semicolon]);
                descriptors.push((name.to_ascii_lowercase(), tokens.to_vec()));
            }
            _ => {
                block.consume_components_until(&[TokenType::Semicolon]);
            }
        }
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssParser;
    use crate::stylesheet::CssStylesheet;
    use pluto_interface::css::CssOrigin;
    use pluto_interface::fetcher::{ResourceData, ResourceFetcher};
    use pluto_shared::config::ParserConfig;

    fn parse(data: &str) -> CssStylesheet {
        CssParser::parse_str(data, ParserConfig::default(), CssOrigin::Author, "", None)
    }

    struct StaticFetcher(&'static str);

    impl ResourceFetcher for StaticFetcher {
        fn fetch_url(&self, _url: &str) -> ResourceData {
            ResourceData::new(self.0.as_bytes().to_vec(), "text/css", "UTF-8")
        }
    }

    #[test]
    fn media_rule_nests_rules() {
        let sheet = parse("@media print and (min-width: 10cm) { p { color: red } }");
        let CssRule::Media(media) = &sheet.rules[0] else {
            panic!("expected a media rule");
        };
        assert_eq!(media.queries.queries.len(), 1);
        assert_eq!(media.rules.len(), 1);
    }

    #[test]
    fn import_inlines_fetched_rules() {
        let fetcher = StaticFetcher("a { color: blue }");
        let sheet = CssParser::parse_str(
            "@import url(other.css) print;",
            ParserConfig::default(),
            CssOrigin::Author,
            "https://example.com/main.css",
            Some(&fetcher),
        );
        let CssRule::Import(import) = &sheet.rules[0] else {
            panic!("expected an import rule");
        };
        assert_eq!(import.href, "https://example.com/other.css");
        assert_eq!(import.queries.queries[0].media_type, pluto_interface::media::MediaType::Print);
        assert_eq!(import.rules.len(), 1);
    }

    #[test]
    fn import_without_fetcher_keeps_href() {
        let sheet = parse("@import \"other.css\";");
        let CssRule::Import(import) = &sheet.rules[0] else {
            panic!("expected an import rule");
        };
        assert_eq!(import.href, "other.css");
        assert!(import.rules.is_empty());
    }

    #[test]
    fn namespace_rule_registers_prefix() {
        let sheet = parse("@namespace svg url(http://www.w3.org/2000/svg);");
        let CssRule::Namespace(ns) = &sheet.rules[0] else {
            panic!("expected a namespace rule");
        };
        assert_eq!(ns.prefix.as_deref(), Some("svg"));
        assert_eq!(sheet.namespaces.get("svg").map(String::as_str), Some("http://www.w3.org/2000/svg"));
    }

    #[test]
    fn font_face_descriptors() {
        let sheet = parse(
            "@font-face { font-family: \"Body\"; src: url(body.woff2) format(\"woff2\"), local(Helvetica); \
             font-weight: 400 700; font-style: oblique 10deg 20deg; unicode-range: U+0-7F, U+A0-FF; }",
        );
        let CssRule::FontFace(rule) = &sheet.rules[0] else {
            panic!("expected a font-face rule");
        };
        assert_eq!(rule.family.as_deref(), Some("Body"));
        assert_eq!(rule.sources.len(), 2);
        assert_eq!(rule.weight, Some((400.0, 700.0)));
        assert_eq!(rule.slope, Some(FontSlope::Oblique(10.0, 20.0)));
        assert_eq!(rule.unicode_ranges, vec![(0, 0x7F), (0xA0, 0xFF)]);
    }

    #[test]
    fn font_face_requires_family_and_src() {
        let sheet = parse("@font-face { font-family: X }");
        assert!(sheet.rules.is_empty());
    }

    #[test]
    fn counter_style_descriptors() {
        let sheet = parse(
            "@counter-style dots { system: cyclic; symbols: \"*\" \"+\"; suffix: \" \"; \
             range: 1 10, 20 infinite; pad: 2 \"0\"; fallback: lower-roman; }",
        );
        let CssRule::CounterStyle(rule) = &sheet.rules[0] else {
            panic!("expected a counter-style rule");
        };
        assert_eq!(rule.name, "dots");
        assert_eq!(rule.system, Some(CounterSystem::Cyclic));
        assert_eq!(rule.symbols.as_ref().map(Vec::len), Some(2));
        assert_eq!(rule.range.as_ref().map(Vec::len), Some(2));
        assert_eq!(rule.range.as_ref().unwrap()[1], (Some(20), None));
        assert_eq!(rule.pad, Some((2, "0".to_string())));
        assert_eq!(rule.fallback.as_deref(), Some("lower-roman"));
    }

    #[test]
    fn counter_style_cannot_shadow_decimal() {
        let sheet = parse("@counter-style decimal { system: cyclic; symbols: x }");
        assert!(sheet.rules.is_empty());
    }

    #[test]
    fn page_rule_with_margins() {
        let sheet = parse(
            "@page chapter:first { margin: 2cm; @top-center { content: \"Title\" } @bottom-right { content: counter(page) } }",
        );
        let CssRule::Page(rule) = &sheet.rules[0] else {
            panic!("expected a page rule");
        };
        assert_eq!(rule.selectors.len(), 1);
        assert_eq!(rule.selectors[0].len(), 2);
        assert_eq!(rule.selectors[0][0].match_type, SelectorMatchType::PseudoPageName);
        assert_eq!(rule.selectors[0][1].match_type, SelectorMatchType::PseudoPageFirst);
        assert_eq!(rule.margin_rules.len(), 2);
        assert_eq!(rule.margin_rules[0].margin_type, PageMarginType::TopCenter);
        // margin shorthand expanded into four longhands
        assert_eq!(rule.declarations.len(), 4);
    }

    #[test]
    fn page_nth_selector() {
        let sheet = parse("@page :nth(2n) { size: a4 }");
        let CssRule::Page(rule) = &sheet.rules[0] else {
            panic!("expected a page rule");
        };
        assert_eq!(rule.selectors[0][0].match_type, SelectorMatchType::PseudoPageNth);
        assert_eq!(rule.selectors[0][0].nth.a, 2);
    }

    #[test]
    fn unknown_at_rule_is_skipped() {
        let sheet = parse("@unknown foo { bar } p { color: red }");
        assert_eq!(sheet.rules.len(), 1);
        assert!(matches!(sheet.rules[0], CssRule::Style(_)));
        assert!(!sheet.parse_log.is_empty());
    }
}
