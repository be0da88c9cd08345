use std::collections::{HashMap, HashSet};

use crate::stream::TokenStream;
use crate::tokenizer::{Token, TokenType};
use crate::values::VariableData;

/// Substitutes every `var(--name[, fallback])` in `tokens` against the
/// element's custom property map.
///
/// Unresolvable names fall back to their fallback sub-stream, recursively
/// substituted. Cycles are detected through the `visited` set of names: a
/// second visit aborts the whole resolution with `None`, which upstream
/// treats as an invalid declaration.
pub fn substitute_variables(
    tokens: &[Token],
    custom_properties: &HashMap<String, VariableData>,
    visited: &mut HashSet<String>,
) -> Option<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stream = TokenStream::new(tokens);

    loop {
        let token = stream.peek(0).clone();
        match &token.token_type {
            TokenType::Eof => break,
            TokenType::Function(name) if name.eq_ignore_ascii_case("var") => {
                let mut block = stream.consume_block()?;
                let mut resolved = substitute_one(&mut block, custom_properties, visited)?;
                out.append(&mut resolved);
            }
            _ => {
                stream.consume();
                out.push(token);
            }
        }
    }

    Some(out)
}

/// Resolves the interior of one `var()` block.
fn substitute_one(
    block: &mut TokenStream,
    custom_properties: &HashMap<String, VariableData>,
    visited: &mut HashSet<String>,
) -> Option<Vec<Token>> {
    block.consume_whitespace();
    let TokenType::Ident(name) = block.peek(0).token_type.clone() else {
        return None;
    };
    if !name.starts_with("--") {
        return None;
    }
    block.consume_including_whitespace();

    let fallback = if block.peek(0).is_comma() {
        block.consume();
        block.consume_whitespace();
        Some(block.remaining())
    } else if block.at_end() {
        None
    } else {
        return None;
    };

    if visited.contains(&name) {
        // reference cycle
        return None;
    }

    if let Some(data) = custom_properties.get(&name) {
        visited.insert(name.clone());
        let resolved = substitute_variables(&data.tokens, custom_properties, visited);
        visited.remove(&name);
        if let Some(resolved) = resolved {
            return Some(resolved);
        }
        // an unresolvable value falls through to the fallback
    }

    match fallback {
        Some(tokens) => substitute_variables(tokens, custom_properties, visited),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    fn customs(entries: &[(&str, &str)]) -> HashMap<String, VariableData> {
        entries
            .iter()
            .map(|(name, value)| {
                let mut tokens = tokenize_str(value);
                tokens.pop(); // strip eof
                ((*name).to_string(), VariableData::new(tokens))
            })
            .collect()
    }

    fn substitute(source: &str, customs_map: &HashMap<String, VariableData>) -> Option<String> {
        let mut tokens = tokenize_str(source);
        tokens.pop();
        let mut visited = HashSet::new();
        let resolved = substitute_variables(&tokens, customs_map, &mut visited)?;
        Some(resolved.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn simple_substitution() {
        let map = customs(&[("--main", "red")]);
        assert_eq!(substitute("var(--main)", &map), Some("red".to_string()));
    }

    #[test]
    fn substitution_inside_other_tokens() {
        let map = customs(&[("--size", "10px")]);
        assert_eq!(
            substitute("1px solid var(--size)", &map),
            Some("1px solid 10px".to_string())
        );
    }

    #[test]
    fn nested_references() {
        let map = customs(&[("--a", "var(--b)"), ("--b", "4em")]);
        assert_eq!(substitute("var(--a)", &map), Some("4em".to_string()));
    }

    #[test]
    fn fallback_used_when_missing() {
        let map = customs(&[]);
        assert_eq!(substitute("var(--nope, 5px)", &map), Some("5px".to_string()));
    }

    #[test]
    fn fallback_may_itself_reference() {
        let map = customs(&[("--real", "3px")]);
        assert_eq!(substitute("var(--nope, var(--real))", &map), Some("3px".to_string()));
    }

    #[test]
    fn missing_without_fallback_fails() {
        let map = customs(&[]);
        assert_eq!(substitute("var(--nope)", &map), None);
    }

    #[test]
    fn direct_cycle_fails() {
        let map = customs(&[("--a", "var(--b)"), ("--b", "var(--a)")]);
        assert_eq!(substitute("var(--a)", &map), None);
        assert_eq!(substitute("var(--b)", &map), None);
    }

    #[test]
    fn self_cycle_fails() {
        let map = customs(&[("--a", "var(--a)")]);
        assert_eq!(substitute("var(--a)", &map), None);
    }

    #[test]
    fn non_custom_name_is_invalid() {
        let map = customs(&[]);
        assert_eq!(substitute("var(main)", &map), None);
    }
}
