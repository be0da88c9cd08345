use crate::parser::CssParser;
use crate::stream::TokenStream;
use crate::tokenizer::TokenType;
use pluto_interface::media::{MediaFeature, MediaQuery, MediaQueryList, MediaType};

impl CssParser<'_> {
    /// Parses a media query list. Evaluation is the document's business
    /// (`supports_media_queries`); this only builds the data model. A branch
    /// that does not parse becomes `not all` per the CSS error rules.
    pub(crate) fn parse_media_query_list(&mut self, stream: &mut TokenStream) -> MediaQueryList {
        let mut queries = Vec::new();

        loop {
            stream.consume_whitespace();
            if stream.at_end() {
                break;
            }

            match self.parse_media_query(stream) {
                Some(query) => queries.push(query),
                None => {
                    // skip the rest of this branch
                    stream.consume_components_until(&[TokenType::Comma]);
                    queries.push(MediaQuery {
                        negated: true,
                        media_type: MediaType::All,
                        features: Vec::new(),
                    });
                }
            }

            stream.consume_whitespace();
            if stream.peek(0).is_comma() {
                stream.consume();
            } else {
                break;
            }
        }

        MediaQueryList { queries }
    }

    fn parse_media_query(&mut self, stream: &mut TokenStream) -> Option<MediaQuery> {
        let mut query = MediaQuery::default();
        let mut has_type = false;

        stream.consume_whitespace();

        if let TokenType::Ident(name) = stream.peek(0).token_type.clone() {
            match name.to_ascii_lowercase().as_str() {
                "not" => {
                    query.negated = true;
                    stream.consume_including_whitespace();
                }
                // `only` exists for legacy parsers and changes nothing
                "only" => {
                    stream.consume_including_whitespace();
                }
                _ => {}
            }
        }

        if let TokenType::Ident(name) = stream.peek(0).token_type.clone() {
            query.media_type = MediaType::from_name(&name.to_ascii_lowercase())?;
            stream.consume_including_whitespace();
            has_type = true;
        }

        loop {
            stream.consume_whitespace();
            match stream.peek(0).token_type.clone() {
                TokenType::LParen if !has_type && query.features.is_empty() => {
                    query.features.push(self.parse_media_feature(stream)?);
                }
                TokenType::Ident(name) if name.eq_ignore_ascii_case("and") => {
                    stream.consume_including_whitespace();
                    query.features.push(self.parse_media_feature(stream)?);
                }
                TokenType::Eof | TokenType::Comma => break,
                _ if !has_type && query.features.is_empty() => return None,
                _ => break,
            }
        }

        Some(query)
    }

    /// `(name)` or `(name: value)`.
    fn parse_media_feature(&mut self, stream: &mut TokenStream) -> Option<MediaFeature> {
        if stream.peek(0).token_type != TokenType::LParen {
            return None;
        }
        let mut block = stream.consume_block()?;

        block.consume_whitespace();
        let TokenType::Ident(name) = block.peek(0).token_type.clone() else {
            return None;
        };
        block.consume_including_whitespace();

        let mut value = None;
        if block.peek(0).is_colon() {
            block.consume();
            block.consume_whitespace();
            let tokens = block.remaining();
            if tokens.is_empty() {
                return None;
            }
            let text: String = tokens.iter().map(ToString::to_string).collect();
            value = Some(text.trim().to_string());
        } else if !block.at_end() {
            return None;
        }

        Some(MediaFeature {
            name: name.to_ascii_lowercase(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    fn parse(source: &str) -> MediaQueryList {
        let tokens = tokenize_str(source);
        let mut stream = TokenStream::new(&tokens);
        let mut parser = CssParser::test_default();
        parser.parse_media_query_list(&mut stream)
    }

    #[test]
    fn plain_media_types() {
        let list = parse("print, screen");
        assert_eq!(list.queries.len(), 2);
        assert_eq!(list.queries[0].media_type, MediaType::Print);
        assert_eq!(list.queries[1].media_type, MediaType::Screen);
    }

    #[test]
    fn not_and_only_qualifiers() {
        let list = parse("not print");
        assert!(list.queries[0].negated);
        assert_eq!(list.queries[0].media_type, MediaType::Print);

        let list = parse("only screen");
        assert!(!list.queries[0].negated);
        assert_eq!(list.queries[0].media_type, MediaType::Screen);
    }

    #[test]
    fn features_with_and() {
        let list = parse("print and (min-width: 10cm) and (color)");
        let query = &list.queries[0];
        assert_eq!(query.features.len(), 2);
        assert_eq!(query.features[0].name, "min-width");
        assert_eq!(query.features[0].value.as_deref(), Some("10cm"));
        assert_eq!(query.features[1].name, "color");
        assert_eq!(query.features[1].value, None);
    }

    #[test]
    fn bare_feature_query() {
        let list = parse("(orientation: landscape)");
        assert_eq!(list.queries[0].media_type, MediaType::All);
        assert_eq!(list.queries[0].features[0].name, "orientation");
    }

    #[test]
    fn unparsable_branch_becomes_not_all() {
        let list = parse("télévision, print");
        assert_eq!(list.queries.len(), 2);
        assert!(list.queries[0].negated);
        assert_eq!(list.queries[0].media_type, MediaType::All);
        assert_eq!(list.queries[1].media_type, MediaType::Print);
    }

    #[test]
    fn empty_list_is_unrestricted() {
        assert!(parse("").is_empty());
    }
}
