use crate::values::{CssValue, ValueId};

/// Longest recognized property name; anything longer is `Unknown` without a
/// table probe.
const MAX_PROPERTY_NAME_LEN: usize = 32;

/// Identifier of a recognized CSS property or descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub enum PropertyId {
    // longhands
    AlignContent,
    AlignItems,
    AlignSelf,
    BackgroundAttachment,
    BackgroundClip,
    BackgroundColor,
    BackgroundImage,
    BackgroundOrigin,
    BackgroundPosition,
    BackgroundRepeat,
    BackgroundSize,
    BorderBottomColor,
    BorderBottomLeftRadius,
    BorderBottomRightRadius,
    BorderBottomStyle,
    BorderBottomWidth,
    BorderCollapse,
    BorderHorizontalSpacing,
    BorderLeftColor,
    BorderLeftStyle,
    BorderLeftWidth,
    BorderRightColor,
    BorderRightStyle,
    BorderRightWidth,
    BorderTopColor,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderTopStyle,
    BorderTopWidth,
    BorderVerticalSpacing,
    Bottom,
    BoxSizing,
    BreakAfter,
    BreakBefore,
    BreakInside,
    CaptionSide,
    Clear,
    Color,
    Content,
    CounterIncrement,
    CounterReset,
    CounterSet,
    Direction,
    Display,
    EmptyCells,
    FlexBasis,
    FlexDirection,
    FlexGrow,
    FlexShrink,
    FlexWrap,
    Float,
    FontFamily,
    FontFeatureSettings,
    FontKerning,
    FontSize,
    FontStretch,
    FontStyle,
    FontVariantCaps,
    FontVariantEastAsian,
    FontVariantLigatures,
    FontVariantNumeric,
    FontVariantPosition,
    FontVariationSettings,
    FontWeight,
    Height,
    JustifyContent,
    Left,
    LetterSpacing,
    LineHeight,
    ListStyleImage,
    ListStylePosition,
    ListStyleType,
    MarginBottom,
    MarginLeft,
    MarginRight,
    MarginTop,
    MaxHeight,
    MaxWidth,
    MinHeight,
    MinWidth,
    Order,
    Orphans,
    OutlineColor,
    OutlineOffset,
    OutlineStyle,
    OutlineWidth,
    Overflow,
    OverflowWrap,
    PaddingBottom,
    PaddingLeft,
    PaddingRight,
    PaddingTop,
    Page,
    PageBreakAfter,
    PageBreakBefore,
    PageBreakInside,
    Position,
    Quotes,
    Right,
    Size,
    TabSize,
    TableLayout,
    TextAlign,
    TextDecorationColor,
    TextDecorationLine,
    TextDecorationStyle,
    TextIndent,
    TextOverflow,
    TextTransform,
    Top,
    UnicodeBidi,
    VerticalAlign,
    Visibility,
    WhiteSpace,
    Widows,
    Width,
    WordBreak,
    WordSpacing,
    ZIndex,
    // shorthands
    Background,
    Border,
    BorderBottom,
    BorderColor,
    BorderLeft,
    BorderRadius,
    BorderRight,
    BorderSpacing,
    BorderStyle,
    BorderTop,
    BorderWidth,
    Flex,
    FlexFlow,
    Font,
    FontVariant,
    ListStyle,
    Margin,
    Outline,
    Padding,
    TextDecoration,
    // name starts with `--`
    Custom,
    // not in the table
    Unknown,
}

/// Sorted property name table, binary-searched on a lower-cased copy of the
/// name. ASCII `-` sorts before letters, so the vendor names lead.
const PROPERTY_NAMES: &[(&str, PropertyId)] = &[
    ("-pluto-border-horizontal-spacing", PropertyId::BorderHorizontalSpacing),
    ("-pluto-border-vertical-spacing", PropertyId::BorderVerticalSpacing),
    ("align-content", PropertyId::AlignContent),
    ("align-items", PropertyId::AlignItems),
    ("align-self", PropertyId::AlignSelf),
    ("background", PropertyId::Background),
    ("background-attachment", PropertyId::BackgroundAttachment),
    ("background-clip", PropertyId::BackgroundClip),
    ("background-color", PropertyId::BackgroundColor),
    ("background-image", PropertyId::BackgroundImage),
    ("background-origin", PropertyId::BackgroundOrigin),
    ("background-position", PropertyId::BackgroundPosition),
    ("background-repeat", PropertyId::BackgroundRepeat),
    ("background-size", PropertyId::BackgroundSize),
    ("border", PropertyId::Border),
    ("border-bottom", PropertyId::BorderBottom),
    ("border-bottom-color", PropertyId::BorderBottomColor),
    ("border-bottom-left-radius", PropertyId::BorderBottomLeftRadius),
    ("border-bottom-right-radius", PropertyId::BorderBottomRightRadius),
    ("border-bottom-style", PropertyId::BorderBottomStyle),
    ("border-bottom-width", PropertyId::BorderBottomWidth),
    ("border-collapse", PropertyId::BorderCollapse),
    ("border-color", PropertyId::BorderColor),
    ("border-left", PropertyId::BorderLeft),
    ("border-left-color", PropertyId::BorderLeftColor),
    ("border-left-style", PropertyId::BorderLeftStyle),
    ("border-left-width", PropertyId::BorderLeftWidth),
    ("border-radius", PropertyId::BorderRadius),
    ("border-right", PropertyId::BorderRight),
    ("border-right-color", PropertyId::BorderRightColor),
    ("border-right-style", PropertyId::BorderRightStyle),
    ("border-right-width", PropertyId::BorderRightWidth),
    ("border-spacing", PropertyId::BorderSpacing),
    ("border-style", PropertyId::BorderStyle),
    ("border-top", PropertyId::BorderTop),
    ("border-top-color", PropertyId::BorderTopColor),
    ("border-top-left-radius", PropertyId::BorderTopLeftRadius),
    ("border-top-right-radius", PropertyId::BorderTopRightRadius),
    ("border-top-style", PropertyId::BorderTopStyle),
    ("border-top-width", PropertyId::BorderTopWidth),
    ("border-width", PropertyId::BorderWidth),
    ("bottom", PropertyId::Bottom),
    ("box-sizing", PropertyId::BoxSizing),
    ("break-after", PropertyId::BreakAfter),
    ("break-before", PropertyId::BreakBefore),
    ("break-inside", PropertyId::BreakInside),
    ("caption-side", PropertyId::CaptionSide),
    ("clear", PropertyId::Clear),
    ("color", PropertyId::Color),
    ("content", PropertyId::Content),
    ("counter-increment", PropertyId::CounterIncrement),
    ("counter-reset", PropertyId::CounterReset),
    ("counter-set", PropertyId::CounterSet),
    ("direction", PropertyId::Direction),
    ("display", PropertyId::Display),
    ("empty-cells", PropertyId::EmptyCells),
    ("flex", PropertyId::Flex),
    ("flex-basis", PropertyId::FlexBasis),
    ("flex-direction", PropertyId::FlexDirection),
    ("flex-flow", PropertyId::FlexFlow),
    ("flex-grow", PropertyId::FlexGrow),
    ("flex-shrink", PropertyId::FlexShrink),
    ("flex-wrap", PropertyId::FlexWrap),
    ("float", PropertyId::Float),
    ("font", PropertyId::Font),
    ("font-family", PropertyId::FontFamily),
    ("font-feature-settings", PropertyId::FontFeatureSettings),
    ("font-kerning", PropertyId::FontKerning),
    ("font-size", PropertyId::FontSize),
    ("font-stretch", PropertyId::FontStretch),
    ("font-style", PropertyId::FontStyle),
    ("font-variant", PropertyId::FontVariant),
    ("font-variant-caps", PropertyId::FontVariantCaps),
    ("font-variant-east-asian", PropertyId::FontVariantEastAsian),
    ("font-variant-ligatures", PropertyId::FontVariantLigatures),
    ("font-variant-numeric", PropertyId::FontVariantNumeric),
    ("font-variant-position", PropertyId::FontVariantPosition),
    ("font-variation-settings", PropertyId::FontVariationSettings),
    ("font-weight", PropertyId::FontWeight),
    ("height", PropertyId::Height),
    ("justify-content", PropertyId::JustifyContent),
    ("left", PropertyId::Left),
    ("letter-spacing", PropertyId::LetterSpacing),
    ("line-height", PropertyId::LineHeight),
    ("list-style", PropertyId::ListStyle),
    ("list-style-image", PropertyId::ListStyleImage),
    ("list-style-position", PropertyId::ListStylePosition),
    ("list-style-type", PropertyId::ListStyleType),
    ("margin", PropertyId::Margin),
    ("margin-bottom", PropertyId::MarginBottom),
    ("margin-left", PropertyId::MarginLeft),
    ("margin-right", PropertyId::MarginRight),
    ("margin-top", PropertyId::MarginTop),
    ("max-height", PropertyId::MaxHeight),
    ("max-width", PropertyId::MaxWidth),
    ("min-height", PropertyId::MinHeight),
    ("min-width", PropertyId::MinWidth),
    ("order", PropertyId::Order),
    ("orphans", PropertyId::Orphans),
    ("outline", PropertyId::Outline),
    ("outline-color", PropertyId::OutlineColor),
    ("outline-offset", PropertyId::OutlineOffset),
    ("outline-style", PropertyId::OutlineStyle),
    ("outline-width", PropertyId::OutlineWidth),
    ("overflow", PropertyId::Overflow),
    ("overflow-wrap", PropertyId::OverflowWrap),
    ("padding", PropertyId::Padding),
    ("padding-bottom", PropertyId::PaddingBottom),
    ("padding-left", PropertyId::PaddingLeft),
    ("padding-right", PropertyId::PaddingRight),
    ("padding-top", PropertyId::PaddingTop),
    ("page", PropertyId::Page),
    ("page-break-after", PropertyId::PageBreakAfter),
    ("page-break-before", PropertyId::PageBreakBefore),
    ("page-break-inside", PropertyId::PageBreakInside),
    ("position", PropertyId::Position),
    ("quotes", PropertyId::Quotes),
    ("right", PropertyId::Right),
    ("size", PropertyId::Size),
    ("tab-size", PropertyId::TabSize),
    ("table-layout", PropertyId::TableLayout),
    ("text-align", PropertyId::TextAlign),
    ("text-decoration", PropertyId::TextDecoration),
    ("text-decoration-color", PropertyId::TextDecorationColor),
    ("text-decoration-line", PropertyId::TextDecorationLine),
    ("text-decoration-style", PropertyId::TextDecorationStyle),
    ("text-indent", PropertyId::TextIndent),
    ("text-overflow", PropertyId::TextOverflow),
    ("text-transform", PropertyId::TextTransform),
    ("top", PropertyId::Top),
    ("unicode-bidi", PropertyId::UnicodeBidi),
    ("vertical-align", PropertyId::VerticalAlign),
    ("visibility", PropertyId::Visibility),
    ("white-space", PropertyId::WhiteSpace),
    ("widows", PropertyId::Widows),
    ("width", PropertyId::Width),
    ("word-break", PropertyId::WordBreak),
    ("word-spacing", PropertyId::WordSpacing),
    ("z-index", PropertyId::ZIndex),
];

/// Resolves a property name to its id. The name is ASCII-lowercased into a
/// stack buffer before the binary search; names longer than the buffer are
/// unknown by construction.
pub fn property_id(name: &str) -> PropertyId {
    if name.starts_with("--") {
        return PropertyId::Custom;
    }
    if name.len() > MAX_PROPERTY_NAME_LEN || !name.is_ascii() {
        return PropertyId::Unknown;
    }

    let mut buf = [0u8; MAX_PROPERTY_NAME_LEN];
    for (i, byte) in name.bytes().enumerate() {
        buf[i] = byte.to_ascii_lowercase();
    }
    let Ok(lower) = std::str::from_utf8(&buf[..name.len()]) else {
        return PropertyId::Unknown;
    };

    match PROPERTY_NAMES.binary_search_by(|(name, _)| (*name).cmp(lower)) {
        Ok(index) => PROPERTY_NAMES[index].1,
        Err(_) => PropertyId::Unknown,
    }
}

impl PropertyId {
    pub fn name(self) -> &'static str {
        PROPERTY_NAMES
            .iter()
            .find(|(_, id)| *id == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    /// The longhands a shorthand expands to; empty for longhands.
    pub fn longhands(self) -> &'static [PropertyId] {
        use PropertyId::*;
        match self {
            Background => &[
                BackgroundImage,
                BackgroundPosition,
                BackgroundSize,
                BackgroundRepeat,
                BackgroundAttachment,
                BackgroundOrigin,
                BackgroundClip,
                BackgroundColor,
            ],
            Border => &[
                BorderTopWidth,
                BorderTopStyle,
                BorderTopColor,
                BorderRightWidth,
                BorderRightStyle,
                BorderRightColor,
                BorderBottomWidth,
                BorderBottomStyle,
                BorderBottomColor,
                BorderLeftWidth,
                BorderLeftStyle,
                BorderLeftColor,
            ],
            BorderTop => &[BorderTopWidth, BorderTopStyle, BorderTopColor],
            BorderRight => &[BorderRightWidth, BorderRightStyle, BorderRightColor],
            BorderBottom => &[BorderBottomWidth, BorderBottomStyle, BorderBottomColor],
            BorderLeft => &[BorderLeftWidth, BorderLeftStyle, BorderLeftColor],
            BorderColor => &[BorderTopColor, BorderRightColor, BorderBottomColor, BorderLeftColor],
            BorderStyle => &[BorderTopStyle, BorderRightStyle, BorderBottomStyle, BorderLeftStyle],
            BorderWidth => &[BorderTopWidth, BorderRightWidth, BorderBottomWidth, BorderLeftWidth],
            BorderRadius => &[
                BorderTopLeftRadius,
                BorderTopRightRadius,
                BorderBottomRightRadius,
                BorderBottomLeftRadius,
            ],
            BorderSpacing => &[BorderHorizontalSpacing, BorderVerticalSpacing],
            Flex => &[FlexGrow, FlexShrink, FlexBasis],
            FlexFlow => &[FlexDirection, FlexWrap],
            Font => &[
                FontStyle,
                FontVariantCaps,
                FontWeight,
                FontStretch,
                FontSize,
                LineHeight,
                FontFamily,
            ],
            FontVariant => &[
                FontVariantCaps,
                FontVariantEastAsian,
                FontVariantLigatures,
                FontVariantNumeric,
                FontVariantPosition,
            ],
            ListStyle => &[ListStyleType, ListStylePosition, ListStyleImage],
            Margin => &[MarginTop, MarginRight, MarginBottom, MarginLeft],
            Outline => &[OutlineWidth, OutlineStyle, OutlineColor],
            Padding => &[PaddingTop, PaddingRight, PaddingBottom, PaddingLeft],
            TextDecoration => &[TextDecorationLine, TextDecorationStyle, TextDecorationColor],
            _ => &[],
        }
    }

    pub fn is_shorthand(self) -> bool {
        !self.longhands().is_empty()
    }

    /// Whether the property inherits by default.
    pub fn is_inherited(self) -> bool {
        use PropertyId::*;
        matches!(
            self,
            BorderCollapse
                | BorderHorizontalSpacing
                | BorderVerticalSpacing
                | CaptionSide
                | Color
                | Direction
                | EmptyCells
                | FontFamily
                | FontFeatureSettings
                | FontKerning
                | FontSize
                | FontStretch
                | FontStyle
                | FontVariantCaps
                | FontVariantEastAsian
                | FontVariantLigatures
                | FontVariantNumeric
                | FontVariantPosition
                | FontVariationSettings
                | FontWeight
                | LetterSpacing
                | LineHeight
                | ListStyleImage
                | ListStylePosition
                | ListStyleType
                | Orphans
                | OverflowWrap
                | Quotes
                | TabSize
                | TextAlign
                | TextIndent
                | TextTransform
                | Visibility
                | WhiteSpace
                | Widows
                | WordBreak
                | WordSpacing
        )
    }

    /// Whether length values of this property may be negative.
    pub fn allows_negative(self) -> bool {
        use PropertyId::*;
        matches!(
            self,
            Bottom
                | Left
                | LetterSpacing
                | MarginBottom
                | MarginLeft
                | MarginRight
                | MarginTop
                | OutlineOffset
                | Right
                | TextIndent
                | Top
                | VerticalAlign
                | WordSpacing
        )
    }

    /// The initial (default) value, for the properties the engine
    /// materializes eagerly. Others fall back to their consumer's default.
    pub fn initial_value(self) -> Option<CssValue> {
        use PropertyId::*;
        let value = match self {
            Display => CssValue::Ident(ValueId::Inline),
            Position => CssValue::Ident(ValueId::Static),
            Float | Clear => CssValue::Ident(ValueId::None),
            Direction => CssValue::Ident(ValueId::Ltr),
            Visibility => CssValue::Ident(ValueId::Visible),
            Overflow => CssValue::Ident(ValueId::Visible),
            FontSize => CssValue::Ident(ValueId::Medium),
            FontStyle | FontVariantCaps | LineHeight => CssValue::Ident(ValueId::Normal),
            FontWeight => CssValue::Ident(ValueId::Normal),
            FontStretch => CssValue::Ident(ValueId::Normal),
            ListStyleType => CssValue::CustomIdent("disc".to_string()),
            ListStylePosition => CssValue::Ident(ValueId::Outside),
            BoxSizing => CssValue::Ident(ValueId::ContentBox),
            ZIndex | Width | Height | FlexBasis | TableLayout => CssValue::Ident(ValueId::Auto),
            MarginTop | MarginRight | MarginBottom | MarginLeft => CssValue::Length(0.0, crate::values::LengthUnit::Px),
            PaddingTop | PaddingRight | PaddingBottom | PaddingLeft => {
                CssValue::Length(0.0, crate::values::LengthUnit::Px)
            }
            FlexGrow => CssValue::Number(0.0),
            FlexShrink => CssValue::Number(1.0),
            FlexDirection => CssValue::Ident(ValueId::Row),
            FlexWrap => CssValue::Ident(ValueId::Nowrap),
            Order => CssValue::Integer(0),
            Orphans | Widows => CssValue::Integer(2),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for pair in PROPERTY_NAMES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn lookup_folds_case() {
        assert_eq!(property_id("color"), PropertyId::Color);
        assert_eq!(property_id("COLOR"), PropertyId::Color);
        assert_eq!(property_id("Border-Top-Width"), PropertyId::BorderTopWidth);
    }

    #[test]
    fn custom_and_unknown() {
        assert_eq!(property_id("--main-color"), PropertyId::Custom);
        assert_eq!(property_id("no-such-property"), PropertyId::Unknown);
        assert_eq!(property_id("-webkit-box-shadow"), PropertyId::Unknown);
        // longer than the lookup buffer
        assert_eq!(property_id("a-property-name-that-goes-on-forever"), PropertyId::Unknown);
    }

    #[test]
    fn vendor_properties_resolve() {
        assert_eq!(
            property_id("-pluto-border-horizontal-spacing"),
            PropertyId::BorderHorizontalSpacing
        );
    }

    #[test]
    fn shorthand_sets() {
        assert!(PropertyId::Margin.is_shorthand());
        assert_eq!(PropertyId::Margin.longhands().len(), 4);
        assert!(PropertyId::Font.is_shorthand());
        assert!(!PropertyId::MarginTop.is_shorthand());
        assert_eq!(
            PropertyId::BorderSpacing.longhands(),
            &[PropertyId::BorderHorizontalSpacing, PropertyId::BorderVerticalSpacing]
        );
    }

    #[test]
    fn inheritance_flags() {
        assert!(PropertyId::Color.is_inherited());
        assert!(PropertyId::FontSize.is_inherited());
        assert!(!PropertyId::MarginTop.is_inherited());
        assert!(!PropertyId::Display.is_inherited());
    }
}
