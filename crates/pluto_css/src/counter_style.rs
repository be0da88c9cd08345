use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// `system` descriptor of an `@counter-style`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterSystem {
    Cyclic,
    Fixed,
    Symbolic,
    Alphabetic,
    Numeric,
    Additive,
    Extends,
}

impl CounterSystem {
    pub fn from_name(name: &str) -> Option<CounterSystem> {
        match name.to_ascii_lowercase().as_str() {
            "cyclic" => Some(CounterSystem::Cyclic),
            "fixed" => Some(CounterSystem::Fixed),
            "symbolic" => Some(CounterSystem::Symbolic),
            "alphabetic" => Some(CounterSystem::Alphabetic),
            "numeric" => Some(CounterSystem::Numeric),
            "additive" => Some(CounterSystem::Additive),
            "extends" => Some(CounterSystem::Extends),
            _ => None,
        }
    }

    /// Whether negative values get the negative affixes (instead of simply
    /// being out of range or indexed directly).
    fn uses_negative_affixes(self) -> bool {
        matches!(
            self,
            CounterSystem::Symbolic | CounterSystem::Alphabetic | CounterSystem::Numeric | CounterSystem::Additive
        )
    }
}

/// A parsed `@counter-style` rule. Every descriptor is optional so extends
/// chains can distinguish "defined here" from "inherited".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CounterStyleRule {
    pub name: String,
    pub system: Option<CounterSystem>,
    /// `fixed <integer>` first symbol value
    pub first_symbol_value: Option<i32>,
    /// `extends <name>` target
    pub extends_name: Option<String>,
    pub symbols: Option<Vec<String>>,
    /// `additive-symbols`: (weight, symbol) pairs
    pub additive_symbols: Option<Vec<(i32, String)>>,
    /// `negative` prefix and optional suffix
    pub negative: Option<(String, String)>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// `range`: inclusive bounds; `None` bound = infinite
    pub range: Option<Vec<(Option<i64>, Option<i64>)>>,
    pub pad: Option<(u32, String)>,
    pub fallback: Option<String>,
}

impl CounterStyleRule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Copies every descriptor this rule does not define from `source`.
    fn inherit_from(&mut self, source: &CounterStyleRule) {
        if self.system.is_none() || self.system == Some(CounterSystem::Extends) {
            self.system = source.system;
        }
        if self.first_symbol_value.is_none() {
            self.first_symbol_value = source.first_symbol_value;
        }
        if self.symbols.is_none() {
            self.symbols = source.symbols.clone();
        }
        if self.additive_symbols.is_none() {
            self.additive_symbols = source.additive_symbols.clone();
        }
        if self.negative.is_none() {
            self.negative = source.negative.clone();
        }
        if self.prefix.is_none() {
            self.prefix = source.prefix.clone();
        }
        if self.suffix.is_none() {
            self.suffix = source.suffix.clone();
        }
        if self.range.is_none() {
            self.range = source.range.clone();
        }
        if self.pad.is_none() {
            self.pad = source.pad.clone();
        }
        if self.fallback.is_none() {
            self.fallback = source.fallback.clone();
        }
    }
}

/// A resolved counter style: extends chains are already flattened.
#[derive(Clone, Debug)]
pub struct CounterStyle {
    rule: CounterStyleRule,
}

impl CounterStyle {
    fn system(&self) -> CounterSystem {
        self.rule.system.unwrap_or(CounterSystem::Symbolic)
    }

    fn symbols(&self) -> &[String] {
        self.rule.symbols.as_deref().unwrap_or(&[])
    }

    pub fn name(&self) -> &str {
        &self.rule.name
    }

    pub fn prefix(&self) -> &str {
        self.rule.prefix.as_deref().unwrap_or("")
    }

    pub fn suffix(&self) -> &str {
        // ". " is the spec default suffix
        self.rule.suffix.as_deref().unwrap_or(". ")
    }

    fn negative_prefix(&self) -> &str {
        self.rule.negative.as_ref().map(|(p, _)| p.as_str()).unwrap_or("-")
    }

    fn negative_suffix(&self) -> &str {
        self.rule.negative.as_ref().map(|(_, s)| s.as_str()).unwrap_or("")
    }

    /// Whether `value` falls inside this style's range (explicit or the
    /// system default).
    fn in_range(&self, value: i64) -> bool {
        if let Some(ranges) = &self.rule.range {
            return ranges.iter().any(|(lo, hi)| {
                lo.map(|lo| value >= lo).unwrap_or(true) && hi.map(|hi| value <= hi).unwrap_or(true)
            });
        }

        match self.system() {
            CounterSystem::Cyclic | CounterSystem::Numeric | CounterSystem::Fixed => true,
            CounterSystem::Alphabetic | CounterSystem::Symbolic => value >= 1,
            CounterSystem::Additive => value >= 0,
            CounterSystem::Extends => true,
        }
    }

    /// The absolute (sign-less) initial representation, or `None` when the
    /// system cannot represent the value and the fallback must take over.
    fn initial_representation(&self, value: i64) -> Option<String> {
        let symbols = self.symbols();

        match self.system() {
            CounterSystem::Cyclic => {
                if symbols.is_empty() {
                    return None;
                }
                let n = symbols.len() as i64;
                let index = (value.abs() - 1).rem_euclid(n) as usize;
                Some(symbols[index].clone())
            }
            CounterSystem::Fixed => {
                let first = i64::from(self.rule.first_symbol_value.unwrap_or(1));
                let index = value - first;
                if index < 0 || index >= symbols.len() as i64 {
                    return None;
                }
                Some(symbols[index as usize].clone())
            }
            CounterSystem::Symbolic => {
                if symbols.is_empty() || value < 1 {
                    return None;
                }
                let n = symbols.len() as i64;
                let symbol = &symbols[((value - 1).rem_euclid(n)) as usize];
                let repeat = (value + n - 1) / n;
                Some(symbol.repeat(repeat as usize))
            }
            CounterSystem::Alphabetic => {
                if symbols.len() < 2 || value < 1 {
                    return None;
                }
                let n = symbols.len() as i64;
                let mut v = value.abs();
                let mut out = Vec::new();
                while v > 0 {
                    v -= 1;
                    out.push(symbols[(v % n) as usize].clone());
                    v /= n;
                }
                out.reverse();
                Some(out.concat())
            }
            CounterSystem::Numeric => {
                if symbols.len() < 2 {
                    return None;
                }
                let n = symbols.len() as i64;
                let mut v = value.abs();
                if v == 0 {
                    return Some(symbols[0].clone());
                }
                let mut out = Vec::new();
                while v > 0 {
                    out.push(symbols[(v % n) as usize].clone());
                    v /= n;
                }
                out.reverse();
                Some(out.concat())
            }
            CounterSystem::Additive => {
                let mut weights: Vec<(i32, String)> = self.rule.additive_symbols.clone().unwrap_or_default();
                weights.sort_by(|a, b| b.0.cmp(&a.0));

                let mut v = value.abs();
                if v == 0 {
                    // zero needs an explicit zero-weight entry
                    return weights
                        .iter()
                        .find(|(w, _)| *w == 0)
                        .map(|(_, symbol)| symbol.clone());
                }

                let mut out = String::new();
                for (weight, symbol) in &weights {
                    let weight = i64::from(*weight);
                    if weight <= 0 {
                        continue;
                    }
                    while v >= weight {
                        out.push_str(symbol);
                        v -= weight;
                    }
                }
                if v != 0 {
                    // residue left over: the symbol set cannot cover the value
                    return None;
                }
                Some(out)
            }
            CounterSystem::Extends => None,
        }
    }
}

/// Holds the document's `@counter-style` rules plus a pointer to the shared
/// user-agent map. Lookups fall through to the user-agent styles.
#[derive(Clone, Debug, Default)]
pub struct CounterStyleMap {
    styles: HashMap<String, CounterStyle>,
    user_agent: Option<Arc<CounterStyleMap>>,
}

impl CounterStyleMap {
    pub fn new(user_agent: Option<Arc<CounterStyleMap>>) -> Self {
        Self {
            styles: HashMap::new(),
            user_agent,
        }
    }

    /// Builds a map from parsed rules. Extends chains are flattened in
    /// place; cycles are broken by re-rooting every participant at the
    /// built-in `decimal`.
    pub fn build(rules: Vec<CounterStyleRule>, user_agent: Option<Arc<CounterStyleMap>>) -> Self {
        let mut raw: HashMap<String, CounterStyleRule> = HashMap::new();
        for rule in rules {
            // later definitions of the same name win
            raw.insert(rule.name.clone(), rule);
        }

        // break extends cycles first; the walk keeps its path in order so
        // only the styles on the cycle itself are re-rooted, not the
        // ancestors that merely point into it
        let names: Vec<String> = raw.keys().cloned().collect();
        for name in &names {
            let mut path: Vec<String> = Vec::new();
            let mut current = name.clone();
            loop {
                path.push(current.clone());
                let Some(next) = raw
                    .get(&current)
                    .filter(|r| r.system == Some(CounterSystem::Extends))
                    .and_then(|r| r.extends_name.clone())
                else {
                    break;
                };
                if let Some(start) = path.iter().position(|entry| *entry == next) {
                    // every style in the cycle now extends decimal
                    for member in &path[start..] {
                        if let Some(rule) = raw.get_mut(member) {
                            if rule.system == Some(CounterSystem::Extends) {
                                rule.extends_name = Some("decimal".to_string());
                            }
                        }
                    }
                    break;
                }
                if !raw.contains_key(&next) {
                    break;
                }
                current = next;
            }
        }

        // flatten: propagate attributes down the (now acyclic) chains
        let mut map = Self::new(user_agent);
        for name in &names {
            let mut resolved = raw[name].clone();
            let mut visited = HashSet::new();
            visited.insert(name.clone());
            let mut current = raw[name].clone();
            while current.system == Some(CounterSystem::Extends) {
                let Some(target_name) = current.extends_name.clone() else {
                    break;
                };
                if !visited.insert(target_name.clone()) {
                    break;
                }
                let target = match raw.get(&target_name) {
                    Some(target) => target.clone(),
                    None => match map.user_agent_rule(&target_name) {
                        Some(target) => target,
                        None => break,
                    },
                };
                resolved.inherit_from(&target);
                current = target;
            }
            if resolved.system == Some(CounterSystem::Extends) {
                // nothing to extend; behave like decimal
                resolved.system = Some(CounterSystem::Numeric);
                resolved.symbols = decimal_symbols();
            }
            map.styles.insert(name.clone(), CounterStyle { rule: resolved });
        }

        map
    }

    fn user_agent_rule(&self, name: &str) -> Option<CounterStyleRule> {
        self.user_agent
            .as_ref()
            .and_then(|ua| ua.styles.get(name))
            .map(|style| style.rule.clone())
    }

    pub fn find(&self, name: &str) -> Option<&CounterStyle> {
        self.styles
            .get(name)
            .or_else(|| self.user_agent.as_ref().and_then(|ua| ua.styles.get(name)))
    }

    /// Generates the representation of `value` in the named style. Unknown
    /// styles render as `decimal`. Fallback chains are ancestor-safe: a
    /// style already on the chain is not consulted twice.
    pub fn representation(&self, name: &str, value: i64) -> String {
        let mut visited = HashSet::new();
        self.representation_inner(name, value, &mut visited)
    }

    fn representation_inner(&self, name: &str, value: i64, visited: &mut HashSet<String>) -> String {
        if !visited.insert(name.to_string()) {
            return String::new();
        }

        let Some(style) = self.find(name) else {
            if name == "decimal" {
                // no UA map attached; use the hard-wired decimal
                return decimal_representation(value);
            }
            return self.representation_inner("decimal", value, visited);
        };

        let fallback = style.rule.fallback.clone().unwrap_or_else(|| "decimal".to_string());

        if !style.in_range(value) {
            return self.representation_inner(&fallback, value, visited);
        }

        let Some(mut text) = style.initial_representation(value) else {
            return self.representation_inner(&fallback, value, visited);
        };

        if value < 0 && style.system().uses_negative_affixes() {
            text = format!("{}{}{}", style.negative_prefix(), text, style.negative_suffix());
        }

        if let Some((min_len, pad_symbol)) = &style.rule.pad {
            let len = text.chars().count() as u32;
            if len < *min_len {
                let padding = pad_symbol.repeat((*min_len - len) as usize);
                text = format!("{padding}{text}");
            }
        }

        text
    }
}

fn decimal_symbols() -> Option<Vec<String>> {
    Some((0..10).map(|d| d.to_string()).collect())
}

fn decimal_representation(value: i64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(name: &str, system: CounterSystem, symbols: &[&str]) -> CounterStyleRule {
        CounterStyleRule {
            name: name.to_string(),
            system: Some(system),
            symbols: Some(symbols.iter().map(|s| (*s).to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn numeric_base_two() {
        let map = CounterStyleMap::build(vec![style("x", CounterSystem::Numeric, &["a", "b"])], None);

        assert_eq!(map.representation("x", 0), "a");
        assert_eq!(map.representation("x", 1), "b");
        assert_eq!(map.representation("x", 2), "ba");
        assert_eq!(map.representation("x", 5), "bab");
    }

    #[test]
    fn numeric_negative_uses_affixes() {
        let map = CounterStyleMap::build(vec![style("x", CounterSystem::Numeric, &["0", "1"])], None);
        assert_eq!(map.representation("x", -2), "-10");
    }

    #[test]
    fn cyclic_wraps() {
        let map = CounterStyleMap::build(vec![style("tri", CounterSystem::Cyclic, &["a", "b", "c"])], None);
        assert_eq!(map.representation("tri", 1), "a");
        assert_eq!(map.representation("tri", 3), "c");
        assert_eq!(map.representation("tri", 4), "a");
    }

    #[test]
    fn symbolic_repeats() {
        let map = CounterStyleMap::build(vec![style("s", CounterSystem::Symbolic, &["*", "+"])], None);
        assert_eq!(map.representation("s", 1), "*");
        assert_eq!(map.representation("s", 2), "+");
        assert_eq!(map.representation("s", 3), "**");
        assert_eq!(map.representation("s", 4), "++");
    }

    #[test]
    fn alphabetic_is_bijective() {
        let map = CounterStyleMap::build(
            vec![style("alpha", CounterSystem::Alphabetic, &["a", "b", "c"])],
            None,
        );
        assert_eq!(map.representation("alpha", 1), "a");
        assert_eq!(map.representation("alpha", 3), "c");
        assert_eq!(map.representation("alpha", 4), "aa");
        // zero is out of range for alphabetic; falls back to decimal
        assert_eq!(map.representation("alpha", 0), "0");
    }

    #[test]
    fn fixed_overflows_to_fallback() {
        let mut rule = style("f", CounterSystem::Fixed, &["x", "y"]);
        rule.first_symbol_value = Some(1);
        let map = CounterStyleMap::build(vec![rule], None);
        assert_eq!(map.representation("f", 1), "x");
        assert_eq!(map.representation("f", 2), "y");
        assert_eq!(map.representation("f", 3), "3");
    }

    #[test]
    fn additive_greedy() {
        let mut rule = CounterStyleRule::new("roman-ish");
        rule.system = Some(CounterSystem::Additive);
        rule.additive_symbols = Some(vec![(10, "X".into()), (5, "V".into()), (1, "I".into())]);
        let map = CounterStyleMap::build(vec![rule], None);

        assert_eq!(map.representation("roman-ish", 7), "VII");
        assert_eq!(map.representation("roman-ish", 26), "XXVI");
    }

    #[test]
    fn additive_zero_without_entry_falls_back() {
        let mut rule = CounterStyleRule::new("adds");
        rule.system = Some(CounterSystem::Additive);
        rule.additive_symbols = Some(vec![(1, "I".into())]);
        let map = CounterStyleMap::build(vec![rule], None);
        // zero has no zero-weight entry: empty representation, then fallback
        assert_eq!(map.representation("adds", 0), "0");
    }

    #[test]
    fn extends_inherits_missing_descriptors() {
        let mut base = style("base", CounterSystem::Numeric, &["0", "1"]);
        base.suffix = Some(") ".to_string());

        let mut ext = CounterStyleRule::new("ext");
        ext.system = Some(CounterSystem::Extends);
        ext.extends_name = Some("base".to_string());
        ext.prefix = Some("(".to_string());

        let map = CounterStyleMap::build(vec![base, ext], None);
        let resolved = map.find("ext").unwrap();
        assert_eq!(resolved.prefix(), "(");
        assert_eq!(resolved.suffix(), ") ");
        assert_eq!(map.representation("ext", 2), "10");
    }

    #[test]
    fn extends_cycle_reroots_at_decimal() {
        let mut a = CounterStyleRule::new("a");
        a.system = Some(CounterSystem::Extends);
        a.extends_name = Some("b".to_string());
        let mut b = CounterStyleRule::new("b");
        b.system = Some(CounterSystem::Extends);
        b.extends_name = Some("a".to_string());

        let map = CounterStyleMap::build(vec![a, b], None);
        assert_eq!(map.representation("a", 7), "7");
        assert_eq!(map.representation("b", 7), "7");
    }

    #[test]
    fn ancestor_into_cycle_is_not_rerooted() {
        // a -> b -> c -> b: only b and c form the cycle; a keeps its
        // extends pointer and still inherits b's own descriptors
        let mut a = CounterStyleRule::new("a");
        a.system = Some(CounterSystem::Extends);
        a.extends_name = Some("b".to_string());
        let mut b = CounterStyleRule::new("b");
        b.system = Some(CounterSystem::Extends);
        b.extends_name = Some("c".to_string());
        b.prefix = Some("<".to_string());
        let mut c = CounterStyleRule::new("c");
        c.system = Some(CounterSystem::Extends);
        c.extends_name = Some("b".to_string());

        let map = CounterStyleMap::build(vec![a, b, c], None);
        assert_eq!(map.find("a").unwrap().prefix(), "<");
        assert_eq!(map.representation("a", 7), "7");
        assert_eq!(map.representation("b", 7), "7");
        assert_eq!(map.representation("c", 7), "7");
    }

    #[test]
    fn fallback_is_ancestor_safe() {
        // two styles falling back to each other can never cover 100
        let mut a = style("a", CounterSystem::Fixed, &["x"]);
        a.fallback = Some("b".to_string());
        let mut b = style("b", CounterSystem::Fixed, &["y"]);
        b.fallback = Some("a".to_string());

        let map = CounterStyleMap::build(vec![a, b], None);
        // both out of range; the cycle is cut and the result is empty rather
        // than a hang
        assert_eq!(map.representation("a", 100), "");
    }

    #[test]
    fn pad_prefixes_symbols() {
        let mut rule = style("padded", CounterSystem::Numeric, &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        rule.pad = Some((3, "0".to_string()));
        let map = CounterStyleMap::build(vec![rule], None);
        assert_eq!(map.representation("padded", 7), "007");
        assert_eq!(map.representation("padded", 1234), "1234");
    }

    #[test]
    fn unknown_style_renders_decimal() {
        let map = CounterStyleMap::build(vec![], None);
        assert_eq!(map.representation("nope", 42), "42");
    }
}
