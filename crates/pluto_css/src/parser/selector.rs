use crate::parser::CssParser;
use crate::stream::TokenStream;
use crate::stylesheet::{
    CaseType, Combinator, ComplexSelector, CompoundSelector, Selector, SelectorMatchType, SimpleSelector,
};
use crate::tokenizer::TokenType;

impl CssParser<'_> {
    /// Parses a comma separated selector list. The whole list is rejected
    /// when any branch is invalid, per the CSS error handling rules.
    pub(crate) fn parse_selector_list(&mut self, stream: &mut TokenStream, relative: bool) -> Option<Vec<Selector>> {
        let mut selectors = Vec::new();

        loop {
            stream.consume_whitespace();
            let selector = self.parse_selector(stream, relative)?;
            selectors.push(selector);

            stream.consume_whitespace();
            match stream.peek(0).token_type {
                TokenType::Comma => {
                    stream.consume();
                }
                TokenType::Eof => break,
                _ => return None,
            }
        }

        if selectors.is_empty() {
            return None;
        }
        Some(selectors)
    }

    /// Parses one complex selector. `relative` allows a leading combinator
    /// (`:has(> div)`); without one the implied relation is descendant.
    ///
    /// Parts are stored right-to-left; each part's combinator tells how its
    /// compound is reached from the compound on its right. The leftmost
    /// part ends up last with combinator `None`, or with the leading
    /// combinator for relative selectors.
    pub(crate) fn parse_selector(&mut self, stream: &mut TokenStream, relative: bool) -> Option<Selector> {
        log::trace!("parse_selector");

        let mut parts: Vec<ComplexSelector> = Vec::new();

        stream.consume_whitespace();
        let mut combinator = if relative {
            self.parse_combinator(stream).unwrap_or(Combinator::Descendant)
        } else {
            Combinator::None
        };

        loop {
            stream.consume_whitespace();
            let compound = self.parse_compound_selector(stream)?;
            parts.push(ComplexSelector { combinator, compound });

            // a combinator, or whitespace followed by another compound,
            // continues the selector
            let had_whitespace = stream.peek(0).is_whitespace();
            let guard = stream.guard();
            stream.consume_whitespace();

            if let Some(explicit) = self.parse_combinator(stream) {
                guard.release();
                combinator = explicit;
                continue;
            }

            match stream.peek(0).token_type {
                TokenType::Comma | TokenType::Eof => {
                    stream.rewind(guard);
                    break;
                }
                _ if had_whitespace => {
                    guard.release();
                    combinator = Combinator::Descendant;
                }
                _ => return None,
            }
        }

        parts.reverse();
        Some(Selector { parts })
    }

    fn parse_combinator(&mut self, stream: &mut TokenStream) -> Option<Combinator> {
        let combinator = match stream.peek(0).token_type {
            TokenType::Delim('>') => Combinator::Child,
            TokenType::Delim('+') => Combinator::DirectAdjacent,
            TokenType::Delim('~') => Combinator::InDirectAdjacent,
            _ => return None,
        };
        stream.consume();
        stream.consume_whitespace();
        Some(combinator)
    }

    /// A compound selector: optional tag/universal (with optional namespace
    /// prefix) followed by any number of id/class/attribute/pseudo
    /// fragments.
    pub(crate) fn parse_compound_selector(&mut self, stream: &mut TokenStream) -> Option<CompoundSelector> {
        let mut compound = CompoundSelector::new();

        // leading tag, universal or ns|tag
        match stream.peek(0).token_type.clone() {
            TokenType::Ident(name) => {
                stream.consume();
                self.finish_tag_or_namespace(stream, &mut compound, Some(name));
            }
            TokenType::Delim('*') => {
                stream.consume();
                self.finish_tag_or_namespace(stream, &mut compound, None);
            }
            _ => {}
        }

        loop {
            match stream.peek(0).token_type.clone() {
                TokenType::Hash(value, _) => {
                    stream.consume();
                    let mut simple = SimpleSelector::new(SelectorMatchType::Id);
                    simple.value = value;
                    compound.push(simple);
                }
                TokenType::Delim('.') => {
                    stream.consume();
                    let TokenType::Ident(value) = stream.peek(0).token_type.clone() else {
                        return None;
                    };
                    stream.consume();
                    let mut simple = SimpleSelector::new(SelectorMatchType::Class);
                    simple.value = value;
                    compound.push(simple);
                }
                TokenType::LBracket => {
                    let simple = self.parse_attribute_selector(stream)?;
                    compound.push(simple);
                }
                TokenType::Colon => {
                    let simple = self.parse_pseudo_selector(stream)?;
                    compound.push(simple);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return None;
        }
        Some(compound)
    }

    /// Emits the tag (or universal) simple selector just consumed, turning
    /// it into a namespace prefix when a `|` follows.
    fn finish_tag_or_namespace(&mut self, stream: &mut TokenStream, compound: &mut CompoundSelector, name: Option<String>) {
        // `ns|tag` and `*|tag`: the consumed token was the prefix
        if stream.peek(0).is_delim('|') && !stream.peek(1).is_delim('|') {
            stream.consume();
            if let Some(prefix) = name {
                let mut simple = SimpleSelector::new(SelectorMatchType::Namespace);
                // @namespace rules precede style rules, so the prefix map
                // is complete by the time selectors parse
                simple.value = self.namespaces.get(&prefix).cloned().unwrap_or_default();
                simple.name = prefix;
                compound.push(simple);
            }
            match stream.peek(0).token_type.clone() {
                TokenType::Ident(tag) => {
                    stream.consume();
                    let mut simple = SimpleSelector::new(SelectorMatchType::Tag);
                    simple.name = tag;
                    compound.push(simple);
                }
                TokenType::Delim('*') => {
                    stream.consume();
                    compound.push(SimpleSelector::new(SelectorMatchType::Universal));
                }
                _ => {}
            }
            return;
        }

        match name {
            Some(tag) => {
                let mut simple = SimpleSelector::new(SelectorMatchType::Tag);
                simple.name = tag;
                compound.push(simple);
            }
            None => compound.push(SimpleSelector::new(SelectorMatchType::Universal)),
        }
    }

    /// `[name]`, `[name <op> value]` with an optional trailing `i` flag.
    fn parse_attribute_selector(&mut self, stream: &mut TokenStream) -> Option<SimpleSelector> {
        let mut block = stream.consume_block()?;

        block.consume_whitespace();
        let TokenType::Ident(name) = block.peek(0).token_type.clone() else {
            return None;
        };
        block.consume();
        block.consume_whitespace();

        let match_type = match block.peek(0).token_type {
            TokenType::Eof => {
                let mut simple = SimpleSelector::new(SelectorMatchType::AttributeHas);
                simple.name = name;
                return Some(simple);
            }
            TokenType::Delim('=') => {
                block.consume();
                SelectorMatchType::AttributeEquals
            }
            TokenType::Delim(op @ ('~' | '|' | '^' | '$' | '*')) => {
                block.consume();
                if !block.peek(0).is_delim('=') {
                    return None;
                }
                block.consume();
                match op {
                    '~' => SelectorMatchType::AttributeIncludes,
                    '|' => SelectorMatchType::AttributeDashEquals,
                    '^' => SelectorMatchType::AttributeStartsWith,
                    '$' => SelectorMatchType::AttributeEndsWith,
                    _ => SelectorMatchType::AttributeContains,
                }
            }
            _ => return None,
        };

        block.consume_whitespace();
        let value = match block.peek(0).token_type.clone() {
            TokenType::Ident(value) | TokenType::QuotedString(value) => {
                block.consume();
                value
            }
            _ => return None,
        };

        block.consume_whitespace();
        let case_type = match block.peek(0).token_type.clone() {
            TokenType::Ident(flag) if flag.eq_ignore_ascii_case("i") => {
                block.consume();
                CaseType::Insensitive
            }
            TokenType::Ident(flag) if flag.eq_ignore_ascii_case("s") => {
                block.consume();
                CaseType::Sensitive
            }
            _ => CaseType::Sensitive,
        };

        block.consume_whitespace();
        if !block.at_end() {
            return None;
        }

        let mut simple = SimpleSelector::new(match_type);
        simple.name = name;
        simple.value = value;
        simple.case_type = case_type;
        Some(simple)
    }

    /// `:`-prefixed pseudo-classes and `::`-prefixed pseudo-elements. The
    /// CSS2 pseudo-elements still parse with a single colon.
    fn parse_pseudo_selector(&mut self, stream: &mut TokenStream) -> Option<SimpleSelector> {
        // consume ':'
        stream.consume();

        if stream.peek(0).is_colon() {
            stream.consume();
            let TokenType::Ident(name) = stream.peek(0).token_type.clone() else {
                return None;
            };
            stream.consume();
            let match_type = pseudo_element_type(&name)?;
            return Some(SimpleSelector::new(match_type));
        }

        match stream.peek(0).token_type.clone() {
            TokenType::Ident(name) => {
                stream.consume();
                // legacy single-colon pseudo-elements
                if let Some(match_type) = pseudo_element_type(&name) {
                    return Some(SimpleSelector::new(match_type));
                }
                let match_type = pseudo_class_type(&name)?;
                Some(SimpleSelector::new(match_type))
            }
            TokenType::Function(name) => {
                let mut block = stream.consume_block()?;
                self.parse_functional_pseudo(&name, &mut block)
            }
            _ => None,
        }
    }

    fn parse_functional_pseudo(&mut self, name: &str, block: &mut TokenStream) -> Option<SimpleSelector> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "is" | "not" | "where" | "has" => {
                let match_type = match lower.as_str() {
                    "is" => SelectorMatchType::PseudoClassIs,
                    "not" => SelectorMatchType::PseudoClassNot,
                    "where" => SelectorMatchType::PseudoClassWhere,
                    _ => SelectorMatchType::PseudoClassHas,
                };
                let relative = lower == "has";
                let sub_selectors = self.parse_selector_list(block, relative)?;
                let mut simple = SimpleSelector::new(match_type);
                simple.sub_selectors = sub_selectors;
                Some(simple)
            }
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                let match_type = match lower.as_str() {
                    "nth-child" => SelectorMatchType::PseudoClassNthChild,
                    "nth-last-child" => SelectorMatchType::PseudoClassNthLastChild,
                    "nth-of-type" => SelectorMatchType::PseudoClassNthOfType,
                    _ => SelectorMatchType::PseudoClassNthLastOfType,
                };
                let nth = self.parse_anplusb(block)?;
                block.consume_whitespace();
                if !block.at_end() {
                    return None;
                }
                let mut simple = SimpleSelector::new(match_type);
                simple.nth = nth;
                Some(simple)
            }
            "lang" => {
                block.consume_whitespace();
                let TokenType::Ident(lang) = block.peek(0).token_type.clone() else {
                    return None;
                };
                block.consume();
                let mut simple = SimpleSelector::new(SelectorMatchType::PseudoClassLang);
                simple.name = lang;
                Some(simple)
            }
            _ => None,
        }
    }
}

fn pseudo_class_type(name: &str) -> Option<SelectorMatchType> {
    let match_type = match name.to_ascii_lowercase().as_str() {
        "root" => SelectorMatchType::PseudoClassRoot,
        "scope" => SelectorMatchType::PseudoClassScope,
        "empty" => SelectorMatchType::PseudoClassEmpty,
        "first-child" => SelectorMatchType::PseudoClassFirstChild,
        "last-child" => SelectorMatchType::PseudoClassLastChild,
        "only-child" => SelectorMatchType::PseudoClassOnlyChild,
        "first-of-type" => SelectorMatchType::PseudoClassFirstOfType,
        "last-of-type" => SelectorMatchType::PseudoClassLastOfType,
        "only-of-type" => SelectorMatchType::PseudoClassOnlyOfType,
        "link" => SelectorMatchType::PseudoClassLink,
        "any-link" => SelectorMatchType::PseudoClassAnyLink,
        "local-link" => SelectorMatchType::PseudoClassLocalLink,
        "enabled" => SelectorMatchType::PseudoClassEnabled,
        "disabled" => SelectorMatchType::PseudoClassDisabled,
        "checked" => SelectorMatchType::PseudoClassChecked,
        "hover" => SelectorMatchType::PseudoClassHover,
        "active" => SelectorMatchType::PseudoClassActive,
        "focus" => SelectorMatchType::PseudoClassFocus,
        _ => return None,
    };
    Some(match_type)
}

fn pseudo_element_type(name: &str) -> Option<SelectorMatchType> {
    let match_type = match name.to_ascii_lowercase().as_str() {
        "before" => SelectorMatchType::PseudoElementBefore,
        "after" => SelectorMatchType::PseudoElementAfter,
        "marker" => SelectorMatchType::PseudoElementMarker,
        "first-letter" => SelectorMatchType::PseudoElementFirstLetter,
        "first-line" => SelectorMatchType::PseudoElementFirstLine,
        _ => return None,
    };
    Some(match_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    fn parse_list(source: &str) -> Option<Vec<Selector>> {
        let tokens = tokenize_str(source);
        let mut stream = TokenStream::new(&tokens);
        let mut parser = CssParser::test_default();
        parser.parse_selector_list(&mut stream, false)
    }

    #[test]
    fn single_compound() {
        let selectors = parse_list("div.note#x").unwrap();
        assert_eq!(selectors.len(), 1);
        let compound = &selectors[0].parts[0].compound;
        assert_eq!(compound.len(), 3);
        assert_eq!(compound[0].match_type, SelectorMatchType::Tag);
        assert_eq!(compound[1].match_type, SelectorMatchType::Class);
        assert_eq!(compound[2].match_type, SelectorMatchType::Id);
    }

    #[test]
    fn combinators_store_right_to_left() {
        let selectors = parse_list("div > p").unwrap();
        let parts = &selectors[0].parts;
        assert_eq!(parts.len(), 2);
        // rightmost compound first, carrying the combinator to its left
        assert_eq!(parts[0].compound[0].name, "p");
        assert_eq!(parts[0].combinator, Combinator::Child);
        assert_eq!(parts[1].compound[0].name, "div");
        assert_eq!(parts[1].combinator, Combinator::None);
    }

    #[test]
    fn descendant_from_whitespace() {
        let selectors = parse_list("ul li").unwrap();
        let parts = &selectors[0].parts;
        assert_eq!(parts[0].combinator, Combinator::Descendant);
    }

    #[test]
    fn selector_list_splits_on_commas() {
        let selectors = parse_list("a, b.c, #d").unwrap();
        assert_eq!(selectors.len(), 3);
    }

    #[test]
    fn invalid_branch_rejects_whole_list() {
        assert!(parse_list("a, %%").is_none());
    }

    #[test]
    fn attribute_operators() {
        let selectors = parse_list("[a][b=x][c~=y][d|=z][e^=p][f$=q][g*=r]").unwrap();
        let compound = &selectors[0].parts[0].compound;
        let types: Vec<SelectorMatchType> = compound.iter().map(|s| s.match_type).collect();
        assert_eq!(
            types,
            vec![
                SelectorMatchType::AttributeHas,
                SelectorMatchType::AttributeEquals,
                SelectorMatchType::AttributeIncludes,
                SelectorMatchType::AttributeDashEquals,
                SelectorMatchType::AttributeStartsWith,
                SelectorMatchType::AttributeEndsWith,
                SelectorMatchType::AttributeContains,
            ]
        );
    }

    #[test]
    fn attribute_case_flag() {
        let selectors = parse_list("[type=text i]").unwrap();
        let simple = &selectors[0].parts[0].compound[0];
        assert_eq!(simple.case_type, CaseType::Insensitive);
    }

    #[test]
    fn functional_pseudo_classes() {
        let selectors = parse_list(":is(a, b):not(.x):where(#y)").unwrap();
        let compound = &selectors[0].parts[0].compound;
        assert_eq!(compound[0].match_type, SelectorMatchType::PseudoClassIs);
        assert_eq!(compound[0].sub_selectors.len(), 2);
        assert_eq!(compound[1].match_type, SelectorMatchType::PseudoClassNot);
        assert_eq!(compound[2].match_type, SelectorMatchType::PseudoClassWhere);
    }

    #[test]
    fn has_allows_leading_combinator() {
        let selectors = parse_list("a:has(> span)").unwrap();
        let compound = &selectors[0].parts[0].compound;
        let has = &compound[1];
        assert_eq!(has.match_type, SelectorMatchType::PseudoClassHas);
        let inner = &has.sub_selectors[0];
        // the relative combinator ends up on the last (leftmost) part
        assert_eq!(inner.parts.last().unwrap().combinator, Combinator::Child);
    }

    #[test]
    fn nth_child_pattern() {
        let selectors = parse_list("li:nth-child(2n+1)").unwrap();
        let nth = &selectors[0].parts[0].compound[1];
        assert_eq!(nth.match_type, SelectorMatchType::PseudoClassNthChild);
        assert_eq!((nth.nth.a, nth.nth.b), (2, 1));
    }

    #[test]
    fn pseudo_elements_double_and_single_colon() {
        let selectors = parse_list("p::before, p:after").unwrap();
        assert_eq!(
            selectors[0].parts[0].compound[1].match_type,
            SelectorMatchType::PseudoElementBefore
        );
        assert_eq!(
            selectors[1].parts[0].compound[1].match_type,
            SelectorMatchType::PseudoElementAfter
        );
    }

    #[test]
    fn unknown_pseudo_class_fails() {
        assert!(parse_list(":hovver").is_none());
    }

    #[test]
    fn namespace_prefix() {
        let selectors = parse_list("svg|circle").unwrap();
        let compound = &selectors[0].parts[0].compound;
        assert_eq!(compound[0].match_type, SelectorMatchType::Namespace);
        assert_eq!(compound[0].name, "svg");
        assert_eq!(compound[1].match_type, SelectorMatchType::Tag);
        assert_eq!(compound[1].name, "circle");
    }

    #[test]
    fn specificity_of_nested_pseudos() {
        let selectors = parse_list(":is(a, b.c, #d)").unwrap();
        assert_eq!(selectors[0].specificity(), 0x10000);

        let selectors = parse_list(":where(a, b.c, #d)").unwrap();
        assert_eq!(selectors[0].specificity(), 0);
    }
}
