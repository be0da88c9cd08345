use core::fmt::Debug;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use pluto_interface::css::CssOrigin;
use pluto_interface::media::MediaQueryList;
use pluto_shared::byte_stream::Location;

use crate::counter_style::CounterStyleRule;
use crate::font_face::FontFaceRule;
use crate::properties::PropertyId;
use crate::values::CssValue;

/// Severity of a CSS parse log entry.
#[derive(Debug, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

/// A parse diagnostic. Parsing never fails outright; discarded rules and
/// declarations leave one of these behind.
#[derive(PartialEq)]
pub struct CssLog {
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

impl CssLog {
    pub fn error(message: &str, location: Location) -> Self {
        Self {
            severity: Severity::Error,
            message: message.to_string(),
            location,
        }
    }

    pub fn warn(message: &str, location: Location) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.to_string(),
            location,
        }
    }
}

impl Display for CssLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] ({}:{}): {}",
            self.severity,
            self.location.line(),
            self.location.column(),
            self.message
        )
    }
}

impl Debug for CssLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// How a simple selector matches, including every recognized pseudo kind.
/// One flat enum so the matcher is a single dispatch with no indirection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SelectorMatchType {
    Universal,
    Tag,
    Namespace,
    Id,
    Class,
    // attribute variants; `name` is the attribute, `value` the operand
    AttributeHas,
    AttributeEquals,
    AttributeIncludes,
    AttributeContains,
    AttributeDashEquals,
    AttributeStartsWith,
    AttributeEndsWith,
    // functional pseudo-classes carrying sub-selector lists
    PseudoClassIs,
    PseudoClassNot,
    PseudoClassWhere,
    PseudoClassHas,
    // tree-structural pseudo-classes
    PseudoClassRoot,
    PseudoClassScope,
    PseudoClassEmpty,
    PseudoClassFirstChild,
    PseudoClassLastChild,
    PseudoClassOnlyChild,
    PseudoClassFirstOfType,
    PseudoClassLastOfType,
    PseudoClassOnlyOfType,
    PseudoClassNthChild,
    PseudoClassNthLastChild,
    PseudoClassNthOfType,
    PseudoClassNthLastOfType,
    // link and state pseudo-classes
    PseudoClassLink,
    PseudoClassAnyLink,
    PseudoClassLocalLink,
    PseudoClassEnabled,
    PseudoClassDisabled,
    PseudoClassChecked,
    PseudoClassLang,
    // dynamic states; never matched in paged output
    PseudoClassHover,
    PseudoClassActive,
    PseudoClassFocus,
    // pseudo-elements
    PseudoElementBefore,
    PseudoElementAfter,
    PseudoElementMarker,
    PseudoElementFirstLetter,
    PseudoElementFirstLine,
    // @page selector pseudos
    PseudoPageName,
    PseudoPageFirst,
    PseudoPageLeft,
    PseudoPageRight,
    PseudoPageBlank,
    PseudoPageNth,
}

impl SelectorMatchType {
    pub fn is_pseudo_element(self) -> bool {
        matches!(
            self,
            SelectorMatchType::PseudoElementBefore
                | SelectorMatchType::PseudoElementAfter
                | SelectorMatchType::PseudoElementMarker
                | SelectorMatchType::PseudoElementFirstLetter
                | SelectorMatchType::PseudoElementFirstLine
        )
    }

    pub fn is_attribute(self) -> bool {
        matches!(
            self,
            SelectorMatchType::AttributeHas
                | SelectorMatchType::AttributeEquals
                | SelectorMatchType::AttributeIncludes
                | SelectorMatchType::AttributeContains
                | SelectorMatchType::AttributeDashEquals
                | SelectorMatchType::AttributeStartsWith
                | SelectorMatchType::AttributeEndsWith
        )
    }
}

/// The pseudo-element a style is being built for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PseudoType {
    #[default]
    None,
    Before,
    After,
    Marker,
    FirstLetter,
    FirstLine,
}

impl PseudoType {
    pub fn from_match_type(match_type: SelectorMatchType) -> Option<PseudoType> {
        match match_type {
            SelectorMatchType::PseudoElementBefore => Some(PseudoType::Before),
            SelectorMatchType::PseudoElementAfter => Some(PseudoType::After),
            SelectorMatchType::PseudoElementMarker => Some(PseudoType::Marker),
            SelectorMatchType::PseudoElementFirstLetter => Some(PseudoType::FirstLetter),
            SelectorMatchType::PseudoElementFirstLine => Some(PseudoType::FirstLine),
            _ => None,
        }
    }
}

/// An+B pattern shared by `:nth-*` and `@page :nth()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NthPattern {
    pub a: i32,
    pub b: i32,
}

impl NthPattern {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Tests `a·k + b == count` for some integer `k >= 0`, where `count` is
    /// 1-based.
    pub fn matches(&self, count: i32) -> bool {
        if self.a == 0 {
            return count == self.b;
        }
        let delta = count - self.b;
        delta % self.a == 0 && delta / self.a >= 0
    }
}

/// Case handling for attribute value comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CaseType {
    #[default]
    Sensitive,
    /// The `i` flag was present
    Insensitive,
}

/// A single simple selector, flattened: only the payloads relevant to its
/// `match_type` are populated.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimpleSelector {
    pub match_type: SelectorMatchType,
    pub case_type: CaseType,
    /// An+B payload of `:nth-*` kinds
    pub nth: NthPattern,
    /// Tag name, attribute name, namespace prefix, or `:lang()` argument
    pub name: String,
    /// Attribute operand, id, or class name
    pub value: String,
    /// Sub-selector lists of `:is`/`:not`/`:where`/`:has`
    pub sub_selectors: Vec<Selector>,
}

impl Default for SelectorMatchType {
    fn default() -> Self {
        SelectorMatchType::Universal
    }
}

impl SimpleSelector {
    pub fn new(match_type: SelectorMatchType) -> Self {
        Self {
            match_type,
            ..Default::default()
        }
    }

    /// Specificity contribution of this simple selector alone.
    fn specificity(&self) -> u32 {
        match self.match_type {
            SelectorMatchType::Id => 0x10000,
            SelectorMatchType::Universal => 0,
            SelectorMatchType::Tag | SelectorMatchType::Namespace => 1,
            m if m.is_pseudo_element() => 1,
            // the functional pseudos take the maximum over their children;
            // :where() contributes nothing by definition
            SelectorMatchType::PseudoClassIs
            | SelectorMatchType::PseudoClassNot
            | SelectorMatchType::PseudoClassHas => self
                .sub_selectors
                .iter()
                .map(Selector::specificity)
                .max()
                .unwrap_or(0),
            SelectorMatchType::PseudoClassWhere => 0,
            _ => 0x100,
        }
    }
}

/// The relationship between two consecutive compound selectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Combinator {
    /// First compound of a selector
    #[default]
    None,
    Descendant,
    Child,
    DirectAdjacent,
    InDirectAdjacent,
}

impl Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combinator::None => write!(f, ""),
            Combinator::Descendant => write!(f, " "),
            Combinator::Child => write!(f, ">"),
            Combinator::DirectAdjacent => write!(f, "+"),
            Combinator::InDirectAdjacent => write!(f, "~"),
        }
    }
}

/// A compound selector is a conjunction of simple selectors on one element.
pub type CompoundSelector = Vec<SimpleSelector>;

/// One compound plus the combinator that links it to the compound on its
/// right.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComplexSelector {
    pub combinator: Combinator,
    pub compound: CompoundSelector,
}

/// A full selector, stored right-to-left: `parts[0]` is the rightmost
/// compound, the one matched against the subject element first.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Selector {
    pub parts: Vec<ComplexSelector>,
}

impl Selector {
    /// Packed specificity: id = 0x10000, class/attribute/pseudo-class =
    /// 0x100, tag/pseudo-element = 1, summed over the entire chain.
    pub fn specificity(&self) -> u32 {
        self.parts
            .iter()
            .flat_map(|part| part.compound.iter())
            .map(SimpleSelector::specificity)
            .sum()
    }

    /// The pseudo-element the rightmost compound targets, if any.
    pub fn pseudo_type(&self) -> PseudoType {
        self.parts
            .first()
            .into_iter()
            .flat_map(|part| part.compound.iter())
            .find_map(|simple| PseudoType::from_match_type(simple.match_type))
            .unwrap_or(PseudoType::None)
    }
}

/// A declaration with its property id resolved. Custom properties keep their
/// name (`id == Custom`).
#[derive(Clone, Debug, PartialEq)]
pub struct CssDeclaration {
    pub id: PropertyId,
    /// Original name for custom properties, empty otherwise
    pub name: String,
    pub value: CssValue,
    pub important: bool,
}

impl CssDeclaration {
    pub fn new(id: PropertyId, value: CssValue, important: bool) -> Self {
        Self {
            id,
            name: String::new(),
            value,
            important,
        }
    }

    pub fn custom(name: &str, value: CssValue, important: bool) -> Self {
        Self {
            id: PropertyId::Custom,
            name: name.to_string(),
            value,
            important,
        }
    }
}

/// A style rule: selector list plus declarations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<CssDeclaration>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaRule {
    pub queries: MediaQueryList,
    pub rules: Vec<CssRule>,
}

/// An `@import`; the fetched sheet's rules are inlined at parse time.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportRule {
    pub href: String,
    pub queries: MediaQueryList,
    pub rules: Vec<CssRule>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceRule {
    pub prefix: Option<String>,
    pub uri: String,
}

/// The sixteen page margin boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum PageMarginType {
    TopLeftCorner,
    TopLeft,
    TopCenter,
    TopRight,
    TopRightCorner,
    BottomLeftCorner,
    BottomLeft,
    BottomCenter,
    BottomRight,
    BottomRightCorner,
    LeftTop,
    LeftMiddle,
    LeftBottom,
    RightTop,
    RightMiddle,
    RightBottom,
}

impl PageMarginType {
    pub fn from_name(name: &str) -> Option<PageMarginType> {
        match name.to_ascii_lowercase().as_str() {
            "top-left-corner" => Some(PageMarginType::TopLeftCorner),
            "top-left" => Some(PageMarginType::TopLeft),
            "top-center" => Some(PageMarginType::TopCenter),
            "top-right" => Some(PageMarginType::TopRight),
            "top-right-corner" => Some(PageMarginType::TopRightCorner),
            "bottom-left-corner" => Some(PageMarginType::BottomLeftCorner),
            "bottom-left" => Some(PageMarginType::BottomLeft),
            "bottom-center" => Some(PageMarginType::BottomCenter),
            "bottom-right" => Some(PageMarginType::BottomRight),
            "bottom-right-corner" => Some(PageMarginType::BottomRightCorner),
            "left-top" => Some(PageMarginType::LeftTop),
            "left-middle" => Some(PageMarginType::LeftMiddle),
            "left-bottom" => Some(PageMarginType::LeftBottom),
            "right-top" => Some(PageMarginType::RightTop),
            "right-middle" => Some(PageMarginType::RightMiddle),
            "right-bottom" => Some(PageMarginType::RightBottom),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageMarginRule {
    pub margin_type: PageMarginType,
    pub declarations: Vec<CssDeclaration>,
}

/// An `@page` selector is compound-only.
pub type PageSelector = Vec<SimpleSelector>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageRule {
    pub selectors: Vec<PageSelector>,
    pub declarations: Vec<CssDeclaration>,
    pub margin_rules: Vec<PageMarginRule>,
}

/// All rule kinds a stylesheet can contain.
#[derive(Clone, Debug, PartialEq)]
pub enum CssRule {
    Style(Arc<StyleRule>),
    Media(MediaRule),
    Import(ImportRule),
    Namespace(NamespaceRule),
    FontFace(FontFaceRule),
    CounterStyle(CounterStyleRule),
    Page(Arc<PageRule>),
}

/// A complete parsed stylesheet.
#[derive(Debug, Default)]
pub struct CssStylesheet {
    pub rules: Vec<CssRule>,
    pub origin: CssOrigin,
    /// Url or file path where the stylesheet was found
    pub url: String,
    /// Issues collected during parsing
    pub parse_log: Vec<CssLog>,
    /// `@namespace` prefix map of this sheet
    pub namespaces: HashMap<String, String>,
}

/// One entry of a stylesheet index bucket: a selector of a style rule with
/// its precomputed specificity and global insertion position.
#[derive(Clone, Debug)]
pub struct RuleData {
    pub rule: Arc<StyleRule>,
    /// Index of the selector inside the rule's selector list
    pub selector_index: usize,
    pub specificity: u32,
    /// Global monotonically increasing insertion order across the cascade
    pub position: u32,
    pub origin: CssOrigin,
}

impl RuleData {
    pub fn selector(&self) -> &Selector {
        &self.rule.selectors[self.selector_index]
    }
}

/// Style rules indexed by the most selective key of their rightmost
/// compound. The cascade probes the buckets that can possibly match an
/// element instead of scanning every rule.
#[derive(Debug, Default)]
pub struct StyleIndex {
    pub id_rules: HashMap<String, Vec<RuleData>>,
    pub class_rules: HashMap<String, Vec<RuleData>>,
    pub tag_rules: HashMap<String, Vec<RuleData>>,
    pub attribute_rules: HashMap<String, Vec<RuleData>>,
    pub pseudo_rules: Vec<RuleData>,
    pub universal_rules: Vec<RuleData>,
    position: u32,
}

impl StyleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next insertion position; shared across every sheet added to this
    /// index.
    pub fn next_position(&mut self) -> u32 {
        let position = self.position;
        self.position += 1;
        position
    }

    pub fn add_style_rule(&mut self, rule: &Arc<StyleRule>, origin: CssOrigin) {
        let position = self.next_position();
        for (selector_index, selector) in rule.selectors.iter().enumerate() {
            let data = RuleData {
                rule: Arc::clone(rule),
                selector_index,
                specificity: selector.specificity(),
                position,
                origin,
            };
            self.insert(data);
        }
    }

    fn insert(&mut self, data: RuleData) {
        enum Bucket {
            Id(String),
            Class(String),
            Attribute(String),
            Tag(String),
            Pseudo,
            Universal,
        }

        // bucket preference: id, class, attribute, tag, pseudo, universal
        let bucket = {
            let Some(rightmost) = data.selector().parts.first() else {
                return;
            };

            let mut tag: Option<&str> = None;
            let mut attribute: Option<&str> = None;
            let mut id: Option<&str> = None;
            let mut class: Option<&str> = None;
            let mut has_pseudo_element = false;
            for simple in &rightmost.compound {
                match simple.match_type {
                    SelectorMatchType::Id => id = Some(&simple.value),
                    SelectorMatchType::Class => class = Some(&simple.value),
                    SelectorMatchType::Tag => tag = Some(&simple.name),
                    m if m.is_attribute() => attribute = Some(&simple.name),
                    m if m.is_pseudo_element() => has_pseudo_element = true,
                    _ => {}
                }
            }

            if let Some(value) = id {
                Bucket::Id(value.to_string())
            } else if let Some(value) = class {
                Bucket::Class(value.to_string())
            } else if let Some(name) = attribute {
                Bucket::Attribute(name.to_string())
            } else if let Some(name) = tag {
                Bucket::Tag(name.to_string())
            } else if has_pseudo_element {
                Bucket::Pseudo
            } else {
                Bucket::Universal
            }
        };

        match bucket {
            Bucket::Id(key) => self.id_rules.entry(key).or_default().push(data),
            Bucket::Class(key) => self.class_rules.entry(key).or_default().push(data),
            Bucket::Attribute(key) => self.attribute_rules.entry(key).or_default().push(data),
            Bucket::Tag(key) => self.tag_rules.entry(key).or_default().push(data),
            Bucket::Pseudo => self.pseudo_rules.push(data),
            Bucket::Universal => self.universal_rules.push(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(match_type: SelectorMatchType) -> SimpleSelector {
        SimpleSelector::new(match_type)
    }

    fn selector_of(compound: Vec<SimpleSelector>) -> Selector {
        Selector {
            parts: vec![ComplexSelector {
                combinator: Combinator::None,
                compound,
            }],
        }
    }

    #[test]
    fn specificity_packing() {
        let mut id = simple(SelectorMatchType::Id);
        id.value = "x".into();
        let mut class = simple(SelectorMatchType::Class);
        class.value = "y".into();
        let mut tag = simple(SelectorMatchType::Tag);
        tag.name = "div".into();

        let selector = selector_of(vec![id, class, tag]);
        assert_eq!(selector.specificity(), 0x10101);
    }

    #[test]
    fn where_contributes_zero() {
        let mut wh = simple(SelectorMatchType::PseudoClassWhere);
        let mut inner = simple(SelectorMatchType::Id);
        inner.value = "x".into();
        wh.sub_selectors = vec![selector_of(vec![inner])];

        assert_eq!(selector_of(vec![wh]).specificity(), 0);
    }

    #[test]
    fn is_takes_the_max_of_children() {
        let mut is = simple(SelectorMatchType::PseudoClassIs);
        let mut a = simple(SelectorMatchType::Tag);
        a.name = "a".into();
        let mut b = simple(SelectorMatchType::Id);
        b.value = "b".into();
        let mut c = simple(SelectorMatchType::Class);
        c.value = "c".into();
        is.sub_selectors = vec![
            selector_of(vec![a]),
            selector_of(vec![b]),
            selector_of(vec![c]),
        ];

        assert_eq!(selector_of(vec![is]).specificity(), 0x10000);
    }

    #[test]
    fn not_contributes_its_argument() {
        let mut not = simple(SelectorMatchType::PseudoClassNot);
        let mut inner = simple(SelectorMatchType::Class);
        inner.value = "x".into();
        not.sub_selectors = vec![selector_of(vec![inner])];

        assert_eq!(selector_of(vec![not]).specificity(), 0x100);
    }

    #[test]
    fn nth_pattern_arithmetic() {
        // 2n+1: odd positions
        let odd = NthPattern::new(2, 1);
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        // 0n+3: exactly the third
        let third = NthPattern::new(0, 3);
        assert!(third.matches(3));
        assert!(!third.matches(6));

        // -n+2: first two
        let first_two = NthPattern::new(-1, 2);
        assert!(first_two.matches(1));
        assert!(first_two.matches(2));
        assert!(!first_two.matches(3));
    }

    #[test]
    fn index_bucket_selection() {
        let mut index = StyleIndex::new();

        let mut id_sel = simple(SelectorMatchType::Id);
        id_sel.value = "main".into();
        let rule = Arc::new(StyleRule {
            selectors: vec![selector_of(vec![id_sel])],
            declarations: vec![],
        });
        index.add_style_rule(&rule, CssOrigin::Author);

        assert_eq!(index.id_rules.get("main").map(Vec::len), Some(1));
        assert!(index.universal_rules.is_empty());
    }

    #[test]
    fn index_positions_are_monotonic() {
        let mut index = StyleIndex::new();
        let rule = Arc::new(StyleRule {
            selectors: vec![selector_of(vec![simple(SelectorMatchType::Universal)])],
            declarations: vec![],
        });
        index.add_style_rule(&rule, CssOrigin::Author);
        index.add_style_rule(&rule, CssOrigin::Author);

        assert_eq!(index.universal_rules[0].position, 0);
        assert_eq!(index.universal_rules[1].position, 1);
    }

    #[test]
    fn pseudo_type_of_selector() {
        let before = simple(SelectorMatchType::PseudoElementBefore);
        let selector = selector_of(vec![before]);
        assert_eq!(selector.pseudo_type(), PseudoType::Before);

        let plain = selector_of(vec![simple(SelectorMatchType::Universal)]);
        assert_eq!(plain.pseudo_type(), PseudoType::None);
    }
}
