use crate::colors::RgbaColor;
use crate::tokenizer::{Number, Token};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a recognized CSS keyword. Keyword values are carried as
/// these ids rather than strings, so equality is a discriminant compare and
/// every `Ident` value is effectively a shared singleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub enum ValueId {
    Additive,
    Alphabetic,
    Always,
    Attr,
    Auto,
    Avoid,
    AvoidPage,
    Baseline,
    BidiOverride,
    Block,
    Bold,
    Bolder,
    BorderBox,
    Both,
    Bottom,
    BreakSpaces,
    Calc,
    Capitalize,
    Center,
    Ch,
    Clamp,
    CloseQuote,
    Collapse,
    Column,
    ColumnReverse,
    Condensed,
    Contain,
    Contents,
    ContentBox,
    Counter,
    Counters,
    Cover,
    Currentcolor,
    Cursive,
    Cyclic,
    Dashed,
    Decimal,
    Dotted,
    Double,
    Embed,
    End,
    Expanded,
    Extends,
    ExtraCondensed,
    ExtraExpanded,
    Fantasy,
    Fixed,
    Flex,
    FlexEnd,
    FlexStart,
    FlowRoot,
    Format,
    Groove,
    Hidden,
    Hide,
    Hsl,
    Hsla,
    Hwb,
    Infinite,
    Inline,
    InlineBlock,
    InlineFlex,
    InlineTable,
    Inset,
    Inside,
    Isolate,
    IsolateOverride,
    Italic,
    Justify,
    Landscape,
    Large,
    Larger,
    Left,
    Lighter,
    LineThrough,
    ListItem,
    Local,
    Lowercase,
    Ledger,
    Legal,
    Letter,
    A3,
    A4,
    A5,
    B4,
    B5,
    Max,
    MaxContent,
    Medium,
    Min,
    MinContent,
    FitContent,
    Middle,
    Monospace,
    NoCloseQuote,
    NoOpenQuote,
    NoRepeat,
    None,
    Normal,
    Nowrap,
    Numeric,
    Oblique,
    Odd,
    Even,
    OpenQuote,
    Outset,
    Outside,
    Overline,
    PaddingBox,
    Portrait,
    Pre,
    PreLine,
    PreWrap,
    Relative,
    Repeat,
    RepeatX,
    RepeatY,
    Rgb,
    Rgba,
    Ridge,
    Right,
    Round,
    Row,
    RowReverse,
    Running,
    SansSerif,
    Scroll,
    SemiCondensed,
    SemiExpanded,
    Separate,
    Serif,
    Show,
    SmallCaps,
    Small,
    Smaller,
    Solid,
    Space,
    SpaceAround,
    SpaceBetween,
    SpaceEvenly,
    Start,
    Static,
    Stretch,
    Sub,
    Super,
    Symbolic,
    Table,
    TableCaption,
    TableCell,
    TableColumn,
    TableColumnGroup,
    TableFooterGroup,
    TableHeaderGroup,
    TableRow,
    TableRowGroup,
    TextBottom,
    TextTop,
    Thick,
    Thin,
    Top,
    Underline,
    Uppercase,
    Url,
    Var,
    Visible,
    Wavy,
    Wrap,
    WrapReverse,
    XLarge,
    XSmall,
    XxLarge,
    XxSmall,
    XxxLarge,
    Absolute,
    BreakAll,
    BreakWord,
    KeepAll,
    Ellipsis,
    Clip,
    Page,
    Content,
    First,
    Blank,
    Ltr,
    Rtl,
    On,
    Off,
    UltraCondensed,
    UltraExpanded,
}

/// Keyword name table. Kept sorted by name; `from_name` goes through a map,
/// `name()` scans linearly (it only runs for display purposes).
const VALUE_NAMES: &[(&str, ValueId)] = &[
    ("a3", ValueId::A3),
    ("a4", ValueId::A4),
    ("a5", ValueId::A5),
    ("absolute", ValueId::Absolute),
    ("additive", ValueId::Additive),
    ("alphabetic", ValueId::Alphabetic),
    ("always", ValueId::Always),
    ("attr", ValueId::Attr),
    ("auto", ValueId::Auto),
    ("avoid", ValueId::Avoid),
    ("avoid-page", ValueId::AvoidPage),
    ("b4", ValueId::B4),
    ("b5", ValueId::B5),
    ("baseline", ValueId::Baseline),
    ("bidi-override", ValueId::BidiOverride),
    ("blank", ValueId::Blank),
    ("block", ValueId::Block),
    ("bold", ValueId::Bold),
    ("bolder", ValueId::Bolder),
    ("border-box", ValueId::BorderBox),
    ("both", ValueId::Both),
    ("bottom", ValueId::Bottom),
    ("break-all", ValueId::BreakAll),
    ("break-spaces", ValueId::BreakSpaces),
    ("break-word", ValueId::BreakWord),
    ("calc", ValueId::Calc),
    ("capitalize", ValueId::Capitalize),
    ("center", ValueId::Center),
    ("ch", ValueId::Ch),
    ("clamp", ValueId::Clamp),
    ("clip", ValueId::Clip),
    ("close-quote", ValueId::CloseQuote),
    ("collapse", ValueId::Collapse),
    ("column", ValueId::Column),
    ("column-reverse", ValueId::ColumnReverse),
    ("condensed", ValueId::Condensed),
    ("contain", ValueId::Contain),
    ("content", ValueId::Content),
    ("content-box", ValueId::ContentBox),
    ("contents", ValueId::Contents),
    ("counter", ValueId::Counter),
    ("counters", ValueId::Counters),
    ("cover", ValueId::Cover),
    ("currentcolor", ValueId::Currentcolor),
    ("cursive", ValueId::Cursive),
    ("cyclic", ValueId::Cyclic),
    ("dashed", ValueId::Dashed),
    ("decimal", ValueId::Decimal),
    ("dotted", ValueId::Dotted),
    ("double", ValueId::Double),
    ("ellipsis", ValueId::Ellipsis),
    ("embed", ValueId::Embed),
    ("end", ValueId::End),
    ("even", ValueId::Even),
    ("expanded", ValueId::Expanded),
    ("extends", ValueId::Extends),
    ("extra-condensed", ValueId::ExtraCondensed),
    ("extra-expanded", ValueId::ExtraExpanded),
    ("fantasy", ValueId::Fantasy),
    ("first", ValueId::First),
    ("fit-content", ValueId::FitContent),
    ("fixed", ValueId::Fixed),
    ("flex", ValueId::Flex),
    ("flex-end", ValueId::FlexEnd),
    ("flex-start", ValueId::FlexStart),
    ("flow-root", ValueId::FlowRoot),
    ("format", ValueId::Format),
    ("groove", ValueId::Groove),
    ("hidden", ValueId::Hidden),
    ("hide", ValueId::Hide),
    ("hsl", ValueId::Hsl),
    ("hsla", ValueId::Hsla),
    ("hwb", ValueId::Hwb),
    ("infinite", ValueId::Infinite),
    ("inline", ValueId::Inline),
    ("inline-block", ValueId::InlineBlock),
    ("inline-flex", ValueId::InlineFlex),
    ("inline-table", ValueId::InlineTable),
    ("inset", ValueId::Inset),
    ("inside", ValueId::Inside),
    ("isolate", ValueId::Isolate),
    ("isolate-override", ValueId::IsolateOverride),
    ("italic", ValueId::Italic),
    ("justify", ValueId::Justify),
    ("keep-all", ValueId::KeepAll),
    ("landscape", ValueId::Landscape),
    ("large", ValueId::Large),
    ("larger", ValueId::Larger),
    ("ledger", ValueId::Ledger),
    ("left", ValueId::Left),
    ("legal", ValueId::Legal),
    ("letter", ValueId::Letter),
    ("lighter", ValueId::Lighter),
    ("line-through", ValueId::LineThrough),
    ("list-item", ValueId::ListItem),
    ("local", ValueId::Local),
    ("lowercase", ValueId::Lowercase),
    ("ltr", ValueId::Ltr),
    ("max", ValueId::Max),
    ("max-content", ValueId::MaxContent),
    ("medium", ValueId::Medium),
    ("middle", ValueId::Middle),
    ("min", ValueId::Min),
    ("min-content", ValueId::MinContent),
    ("monospace", ValueId::Monospace),
    ("no-close-quote", ValueId::NoCloseQuote),
    ("no-open-quote", ValueId::NoOpenQuote),
    ("no-repeat", ValueId::NoRepeat),
    ("none", ValueId::None),
    ("normal", ValueId::Normal),
    ("nowrap", ValueId::Nowrap),
    ("numeric", ValueId::Numeric),
    ("oblique", ValueId::Oblique),
    ("odd", ValueId::Odd),
    ("off", ValueId::Off),
    ("on", ValueId::On),
    ("open-quote", ValueId::OpenQuote),
    ("outset", ValueId::Outset),
    ("outside", ValueId::Outside),
    ("overline", ValueId::Overline),
    ("padding-box", ValueId::PaddingBox),
    ("page", ValueId::Page),
    ("portrait", ValueId::Portrait),
    ("pre", ValueId::Pre),
    ("pre-line", ValueId::PreLine),
    ("pre-wrap", ValueId::PreWrap),
    ("relative", ValueId::Relative),
    ("repeat", ValueId::Repeat),
    ("repeat-x", ValueId::RepeatX),
    ("repeat-y", ValueId::RepeatY),
    ("rgb", ValueId::Rgb),
    ("rgba", ValueId::Rgba),
    ("ridge", ValueId::Ridge),
    ("right", ValueId::Right),
    ("round", ValueId::Round),
    ("row", ValueId::Row),
    ("row-reverse", ValueId::RowReverse),
    ("rtl", ValueId::Rtl),
    ("running", ValueId::Running),
    ("sans-serif", ValueId::SansSerif),
    ("scroll", ValueId::Scroll),
    ("semi-condensed", ValueId::SemiCondensed),
    ("semi-expanded", ValueId::SemiExpanded),
    ("separate", ValueId::Separate),
    ("serif", ValueId::Serif),
    ("show", ValueId::Show),
    ("small", ValueId::Small),
    ("small-caps", ValueId::SmallCaps),
    ("smaller", ValueId::Smaller),
    ("solid", ValueId::Solid),
    ("space", ValueId::Space),
    ("space-around", ValueId::SpaceAround),
    ("space-between", ValueId::SpaceBetween),
    ("space-evenly", ValueId::SpaceEvenly),
    ("start", ValueId::Start),
    ("static", ValueId::Static),
    ("stretch", ValueId::Stretch),
    ("sub", ValueId::Sub),
    ("super", ValueId::Super),
    ("symbolic", ValueId::Symbolic),
    ("table", ValueId::Table),
    ("table-caption", ValueId::TableCaption),
    ("table-cell", ValueId::TableCell),
    ("table-column", ValueId::TableColumn),
    ("table-column-group", ValueId::TableColumnGroup),
    ("table-footer-group", ValueId::TableFooterGroup),
    ("table-header-group", ValueId::TableHeaderGroup),
    ("table-row", ValueId::TableRow),
    ("table-row-group", ValueId::TableRowGroup),
    ("text-bottom", ValueId::TextBottom),
    ("text-top", ValueId::TextTop),
    ("thick", ValueId::Thick),
    ("thin", ValueId::Thin),
    ("top", ValueId::Top),
    ("ultra-condensed", ValueId::UltraCondensed),
    ("ultra-expanded", ValueId::UltraExpanded),
    ("underline", ValueId::Underline),
    ("uppercase", ValueId::Uppercase),
    ("url", ValueId::Url),
    ("var", ValueId::Var),
    ("visible", ValueId::Visible),
    ("wavy", ValueId::Wavy),
    ("wrap", ValueId::Wrap),
    ("wrap-reverse", ValueId::WrapReverse),
    ("x-large", ValueId::XLarge),
    ("x-small", ValueId::XSmall),
    ("xx-large", ValueId::XxLarge),
    ("xx-small", ValueId::XxSmall),
    ("xxx-large", ValueId::XxxLarge),
];

lazy_static! {
    static ref VALUE_ID_MAP: HashMap<&'static str, ValueId> = VALUE_NAMES.iter().copied().collect();
}

impl ValueId {
    /// Resolves a keyword name, ASCII case-insensitively.
    pub fn from_name(name: &str) -> Option<ValueId> {
        let lower = name.to_ascii_lowercase();
        VALUE_ID_MAP.get(lower.as_str()).copied()
    }

    pub fn name(self) -> &'static str {
        VALUE_NAMES
            .iter()
            .find(|(_, id)| *id == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

/// The closed set of length units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LengthUnit {
    /// Unitless (quirks-mode zero and number-to-length promotions)
    #[default]
    None,
    Px,
    Pt,
    Pc,
    Cm,
    Mm,
    In,
    Vw,
    Vh,
    Vmin,
    Vmax,
    Em,
    Ex,
    Ch,
    Rem,
}

impl LengthUnit {
    pub fn from_name(name: &str) -> Option<LengthUnit> {
        match name.to_ascii_lowercase().as_str() {
            "px" => Some(LengthUnit::Px),
            "pt" => Some(LengthUnit::Pt),
            "pc" => Some(LengthUnit::Pc),
            "cm" => Some(LengthUnit::Cm),
            "mm" => Some(LengthUnit::Mm),
            "in" => Some(LengthUnit::In),
            "vw" => Some(LengthUnit::Vw),
            "vh" => Some(LengthUnit::Vh),
            "vmin" => Some(LengthUnit::Vmin),
            "vmax" => Some(LengthUnit::Vmax),
            "em" => Some(LengthUnit::Em),
            "ex" => Some(LengthUnit::Ex),
            "ch" => Some(LengthUnit::Ch),
            "rem" => Some(LengthUnit::Rem),
            _ => None,
        }
    }

    /// Conversion factor to px for absolute units (96 dpi), `None` for units
    /// that need a resolution context.
    pub fn absolute_px_factor(self) -> Option<f32> {
        match self {
            LengthUnit::None | LengthUnit::Px => Some(1.0),
            LengthUnit::Pt => Some(96.0 / 72.0),
            LengthUnit::Pc => Some(96.0 / 6.0),
            LengthUnit::Cm => Some(96.0 / 2.54),
            LengthUnit::Mm => Some(96.0 / 25.4),
            LengthUnit::In => Some(96.0),
            _ => None,
        }
    }

    pub fn is_absolute(self) -> bool {
        self.absolute_px_factor().is_some()
    }
}

/// Angle units; values normalize to degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AngleUnit {
    Deg,
    Rad,
    Grad,
    Turn,
}

impl AngleUnit {
    pub fn from_name(name: &str) -> Option<AngleUnit> {
        match name.to_ascii_lowercase().as_str() {
            "deg" => Some(AngleUnit::Deg),
            "rad" => Some(AngleUnit::Rad),
            "grad" => Some(AngleUnit::Grad),
            "turn" => Some(AngleUnit::Turn),
            _ => None,
        }
    }

    pub fn to_degrees(self, value: Number) -> Number {
        match self {
            AngleUnit::Deg => value,
            AngleUnit::Rad => value * 180.0 / std::f32::consts::PI,
            AngleUnit::Grad => value * 0.9,
            AngleUnit::Turn => value * 360.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CalcOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
}

/// Unit of a calc literal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CalcUnit {
    None,
    Percent,
    Length(LengthUnit),
    Angle(AngleUnit),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CalcItem {
    Literal { value: Number, unit: CalcUnit },
    Op(CalcOp),
}

/// A `calc()`/`clamp()`/`min()`/`max()` expression as a postfix operation
/// list. Every item is either a literal push or a binary operator; arity is
/// validated at parse time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalcList {
    /// Whether the surrounding property accepts negative results
    pub allows_negative: bool,
    /// Whether the expression is a plain number (no length/percent units)
    pub unitless: bool,
    pub items: Vec<CalcItem>,
}

impl CalcList {
    /// Walks the postfix list with a small evaluation stack. `resolve` turns
    /// a literal into an f32 (applying the unit context); `None` anywhere
    /// poisons the whole expression.
    pub fn evaluate<F>(&self, resolve: F) -> Option<f32>
    where
        F: Fn(Number, CalcUnit) -> Option<f32>,
    {
        let mut stack: Vec<f32> = Vec::new();

        for item in &self.items {
            match item {
                CalcItem::Literal { value, unit } => stack.push(resolve(*value, *unit)?),
                CalcItem::Op(op) => {
                    let b = stack.pop()?;
                    let a = stack.pop()?;
                    let v = match op {
                        CalcOp::Add => a + b,
                        CalcOp::Sub => a - b,
                        CalcOp::Mul => a * b,
                        CalcOp::Div => {
                            if b == 0.0 {
                                return None;
                            }
                            a / b
                        }
                        CalcOp::Min => a.min(b),
                        CalcOp::Max => a.max(b),
                    };
                    stack.push(v);
                }
            }
        }

        let result = if stack.len() == 1 { stack.pop() } else { None };
        result.map(|v| if self.allows_negative { v } else { v.max(0.0) })
    }
}

/// Raw token sequence of a custom property value or of a value containing
/// `var()` references. Substitution happens at cascade time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariableData {
    pub tokens: Vec<Token>,
}

impl VariableData {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Whether the token sequence contains a `var(` reference anywhere.
    pub fn contains_var(&self) -> bool {
        self.tokens.iter().any(|t| t.is_function_name("var"))
    }
}

/// A `counter()`/`counters()` value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CounterValue {
    pub identifier: String,
    /// Counter style name; `decimal` when unspecified
    pub style: String,
    /// Separator for `counters()`; empty for `counter()`
    pub separator: String,
}

/// An `attr()` value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttrValue {
    pub name: String,
    pub fallback: Option<CssValue>,
}

/// The engine-wide tagged value variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CssValue {
    Initial,
    Inherit,
    Unset,
    Ident(ValueId),
    CustomIdent(String),
    /// A `--name: ...` declaration value, kept as raw tokens
    CustomProperty(String, VariableData),
    /// A value whose tokens contain `var()`; substituted at cascade time
    /// and re-parsed as the carried property (the shorthand when the
    /// declaration came from one)
    VariableReference(VariableData, crate::properties::PropertyId),
    Integer(i32),
    Number(Number),
    Percent(Number),
    Angle(Number, AngleUnit),
    Length(Number, LengthUnit),
    Calc(CalcList),
    Attr(Box<AttrValue>),
    String(String),
    /// `local(name)` font source
    LocalUrl(String),
    Url(String),
    /// An image reference; the renderer resolves the handle
    Image(String),
    Color(RgbaColor),
    Counter(Box<CounterValue>),
    FontFeature(String, i32),
    FontVariation(String, Number),
    UnicodeRange(u32, u32),
    Pair(Box<(CssValue, CssValue)>),
    Rect(Box<[CssValue; 4]>),
    List(Vec<CssValue>),
    Function(ValueId, Vec<CssValue>),
    UnaryFunction(ValueId, Box<CssValue>),
}

impl CssValue {
    pub fn pair(first: CssValue, second: CssValue) -> CssValue {
        CssValue::Pair(Box::new((first, second)))
    }

    pub fn rect(top: CssValue, right: CssValue, bottom: CssValue, left: CssValue) -> CssValue {
        CssValue::Rect(Box::new([top, right, bottom, left]))
    }

    /// Whether this is one of the wide keywords that apply to any property.
    pub fn is_wide_keyword(&self) -> bool {
        matches!(self, CssValue::Initial | CssValue::Inherit | CssValue::Unset)
    }

    pub fn is_ident(&self, id: ValueId) -> bool {
        matches!(self, CssValue::Ident(v) if *v == id)
    }

    pub fn as_ident(&self) -> Option<ValueId> {
        match self {
            CssValue::Ident(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            CssValue::Number(v) => Some(*v),
            CssValue::Integer(v) => Some(*v as Number),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            CssValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_percent(&self) -> Option<Number> {
        match self {
            CssValue::Percent(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<RgbaColor> {
        match self {
            CssValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Angle in degrees, reduced to `[0, 360)`.
    pub fn as_degrees(&self) -> Option<Number> {
        match self {
            CssValue::Angle(value, unit) => Some(crate::colors::normalize_hue(unit.to_degrees(*value))),
            _ => None,
        }
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Initial => write!(f, "initial"),
            CssValue::Inherit => write!(f, "inherit"),
            CssValue::Unset => write!(f, "unset"),
            CssValue::Ident(id) => write!(f, "{}", id.name()),
            CssValue::CustomIdent(name) => write!(f, "{name}"),
            CssValue::CustomProperty(name, _) => write!(f, "{name}: <tokens>"),
            CssValue::VariableReference(..) => write!(f, "<pending var()>"),
            CssValue::Integer(v) => write!(f, "{v}"),
            CssValue::Number(v) => write!(f, "{v}"),
            CssValue::Percent(v) => write!(f, "{v}%"),
            CssValue::Angle(v, unit) => write!(f, "{v}{}", match unit {
                AngleUnit::Deg => "deg",
                AngleUnit::Rad => "rad",
                AngleUnit::Grad => "grad",
                AngleUnit::Turn => "turn",
            }),
            CssValue::Length(v, unit) => write!(f, "{v}{}", match unit {
                LengthUnit::None => "",
                LengthUnit::Px => "px",
                LengthUnit::Pt => "pt",
                LengthUnit::Pc => "pc",
                LengthUnit::Cm => "cm",
                LengthUnit::Mm => "mm",
                LengthUnit::In => "in",
                LengthUnit::Vw => "vw",
                LengthUnit::Vh => "vh",
                LengthUnit::Vmin => "vmin",
                LengthUnit::Vmax => "vmax",
                LengthUnit::Em => "em",
                LengthUnit::Ex => "ex",
                LengthUnit::Ch => "ch",
                LengthUnit::Rem => "rem",
            }),
            CssValue::Calc(_) => write!(f, "calc(...)"),
            CssValue::Attr(attr) => write!(f, "attr({})", attr.name),
            CssValue::String(s) => write!(f, "\"{s}\""),
            CssValue::LocalUrl(s) => write!(f, "local({s})"),
            CssValue::Url(s) => write!(f, "url({s})"),
            CssValue::Image(s) => write!(f, "url({s})"),
            CssValue::Color(c) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            CssValue::Counter(c) => write!(f, "counter({})", c.identifier),
            CssValue::FontFeature(tag, v) => write!(f, "\"{tag}\" {v}"),
            CssValue::FontVariation(tag, v) => write!(f, "\"{tag}\" {v}"),
            CssValue::UnicodeRange(from, to) => write!(f, "U+{from:X}-{to:X}"),
            CssValue::Pair(pair) => write!(f, "{} {}", pair.0, pair.1),
            CssValue::Rect(rect) => write!(f, "{} {} {} {}", rect[0], rect[1], rect[2], rect[3]),
            CssValue::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            CssValue::Function(id, args) => {
                write!(f, "{}(", id.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            CssValue::UnaryFunction(id, arg) => write!(f, "{}({})", id.name(), arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(ValueId::from_name("auto"), Some(ValueId::Auto));
        assert_eq!(ValueId::from_name("AUTO"), Some(ValueId::Auto));
        assert_eq!(ValueId::from_name("inline-block"), Some(ValueId::InlineBlock));
        assert_eq!(ValueId::from_name("no-such-keyword"), None);
    }

    #[test]
    fn keyword_names_round_trip() {
        for (name, id) in VALUE_NAMES {
            assert_eq!(ValueId::from_name(name), Some(*id));
        }
    }

    #[test]
    fn length_unit_factors() {
        assert_eq!(LengthUnit::In.absolute_px_factor(), Some(96.0));
        assert_eq!(LengthUnit::Pt.absolute_px_factor(), Some(96.0 / 72.0));
        assert_eq!(LengthUnit::Pc.absolute_px_factor(), Some(16.0));
        assert_eq!(LengthUnit::Em.absolute_px_factor(), None);
    }

    #[test]
    fn angle_conversion() {
        assert_eq!(AngleUnit::Turn.to_degrees(0.5), 180.0);
        assert_eq!(AngleUnit::Grad.to_degrees(100.0), 90.0);
        let deg = AngleUnit::Rad.to_degrees(std::f32::consts::PI);
        assert!((deg - 180.0).abs() < 1e-3);
    }

    #[test]
    fn angle_normalizes_modulo_360() {
        let v = CssValue::Angle(540.0, AngleUnit::Deg);
        assert_eq!(v.as_degrees(), Some(180.0));
        let v = CssValue::Angle(-0.25, AngleUnit::Turn);
        assert_eq!(v.as_degrees(), Some(270.0));
    }

    #[test]
    fn calc_postfix_evaluation() {
        // 10 + 2 * 3 => 10 2 3 * +
        let calc = CalcList {
            allows_negative: true,
            unitless: true,
            items: vec![
                CalcItem::Literal { value: 10.0, unit: CalcUnit::None },
                CalcItem::Literal { value: 2.0, unit: CalcUnit::None },
                CalcItem::Literal { value: 3.0, unit: CalcUnit::None },
                CalcItem::Op(CalcOp::Mul),
                CalcItem::Op(CalcOp::Add),
            ],
        };
        let result = calc.evaluate(|v, _| Some(v));
        assert_eq!(result, Some(16.0));
    }

    #[test]
    fn calc_stack_underflow_is_none() {
        let calc = CalcList {
            allows_negative: true,
            unitless: true,
            items: vec![CalcItem::Op(CalcOp::Add)],
        };
        assert_eq!(calc.evaluate(|v, _| Some(v)), None);
    }

    #[test]
    fn calc_division_by_zero_is_none() {
        let calc = CalcList {
            allows_negative: true,
            unitless: true,
            items: vec![
                CalcItem::Literal { value: 1.0, unit: CalcUnit::None },
                CalcItem::Literal { value: 0.0, unit: CalcUnit::None },
                CalcItem::Op(CalcOp::Div),
            ],
        };
        assert_eq!(calc.evaluate(|v, _| Some(v)), None);
    }

    #[test]
    fn calc_clamps_negative_when_disallowed() {
        let calc = CalcList {
            allows_negative: false,
            unitless: true,
            items: vec![
                CalcItem::Literal { value: 2.0, unit: CalcUnit::None },
                CalcItem::Literal { value: 5.0, unit: CalcUnit::None },
                CalcItem::Op(CalcOp::Sub),
            ],
        };
        assert_eq!(calc.evaluate(|v, _| Some(v)), Some(0.0));
    }

    #[test]
    fn wide_keywords() {
        assert!(CssValue::Initial.is_wide_keyword());
        assert!(CssValue::Inherit.is_wide_keyword());
        assert!(CssValue::Unset.is_wide_keyword());
        assert!(!CssValue::Ident(ValueId::Auto).is_wide_keyword());
    }
}
