//! CSS engine core of the Pluto paged-media renderer: tokenizer, rule
//! parser, selector matcher, cascade and value resolution, plus the
//! `@counter-style` and `@font-face` resolvers.
//!
//! The pipeline is deterministic and single-threaded: source text goes
//! through [`tokenizer::Tokenizer`] into a [`stream::TokenStream`], the
//! [`parser::CssParser`] builds a [`stylesheet::CssStylesheet`], a
//! [`cascade::StyleEngine`] indexes the rules, and a
//! [`cascade::StyleBuilder`] emits one [`computed::BoxStyle`] per element.

use std::sync::Arc;

use lazy_static::lazy_static;
use pluto_interface::css::CssOrigin;
use pluto_shared::config::ParserConfig;

pub mod cascade;
pub mod colors;
pub mod computed;
pub mod counter_style;
pub mod errors;
pub mod font_face;
pub mod functions;
pub mod matcher;
mod media;
pub mod parser;
pub mod properties;
pub mod stream;
pub mod stylesheet;
pub mod tokenizer;
pub mod values;

use counter_style::CounterStyleMap;
use errors::Error;
use parser::CssParser;
use stylesheet::{CssRule, CssStylesheet, Severity};

lazy_static! {
    static ref USER_AGENT_STYLESHEET: CssStylesheet = {
        let config = ParserConfig {
            ignore_errors: true,
            ..Default::default()
        };
        CssParser::parse_str(
            include_str!("../resources/useragent.css"),
            config,
            CssOrigin::UserAgent,
            "pluto:useragent.css",
            None,
        )
    };
    static ref USER_AGENT_COUNTER_STYLES: Arc<CounterStyleMap> = {
        let config = ParserConfig {
            ignore_errors: true,
            ..Default::default()
        };
        let sheet = CssParser::parse_str(
            include_str!("../resources/counterstyles.css"),
            config,
            CssOrigin::UserAgent,
            "pluto:counterstyles.css",
            None,
        );
        let rules = sheet
            .rules
            .into_iter()
            .filter_map(|rule| match rule {
                CssRule::CounterStyle(rule) => Some(rule),
                _ => None,
            })
            .collect();
        Arc::new(CounterStyleMap::build(rules, None))
    };
}

/// The built-in user agent stylesheet, parsed once per process.
pub fn user_agent_stylesheet() -> &'static CssStylesheet {
    &USER_AGENT_STYLESHEET
}

/// The built-in predefined counter styles, parsed once per process.
pub fn user_agent_counter_styles() -> Arc<CounterStyleMap> {
    Arc::clone(&USER_AGENT_COUNTER_STYLES)
}

/// Parses a stylesheet, failing (instead of collecting diagnostics) when
/// `config.ignore_errors` is off and the source had hard parse errors.
pub fn parse_stylesheet(
    data: &str,
    config: ParserConfig,
    origin: CssOrigin,
    source_url: &str,
    fetcher: Option<&dyn pluto_interface::fetcher::ResourceFetcher>,
) -> anyhow::Result<CssStylesheet> {
    let strict = !config.ignore_errors;
    let sheet = CssParser::parse_str(data, config, origin, source_url, fetcher);

    if strict {
        if let Some(entry) = sheet.parse_log.iter().find(|entry| entry.severity == Severity::Error) {
            return Err(Error::Parse(entry.message.clone(), entry.location).into());
        }
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_sheet_parses_cleanly() {
        let sheet = user_agent_stylesheet();
        assert!(!sheet.rules.is_empty());
        assert!(
            !sheet.parse_log.iter().any(|entry| entry.severity == Severity::Error),
            "{:?}",
            sheet.parse_log
        );
    }

    #[test]
    fn user_agent_counter_styles_cover_the_classics() {
        let map = user_agent_counter_styles();
        assert_eq!(map.representation("lower-roman", 4), "iv");
        assert_eq!(map.representation("upper-roman", 1987), "MCMLXXXVII");
        assert_eq!(map.representation("lower-alpha", 28), "ab");
        assert_eq!(map.representation("decimal-leading-zero", 7), "07");
    }

    #[test]
    fn strict_parse_surfaces_errors() {
        let config = ParserConfig::default();
        let result = parse_stylesheet("p { color red }", config, CssOrigin::Author, "", None);
        assert!(result.is_err());

        let lenient = ParserConfig {
            ignore_errors: true,
            ..Default::default()
        };
        assert!(parse_stylesheet("p { color red }", lenient, CssOrigin::Author, "", None).is_ok());
    }
}
