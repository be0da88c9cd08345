use crate::colors;
use crate::colors::RgbaColor;
use crate::parser::CssParser;
use crate::properties::PropertyId;
use crate::stream::TokenStream;
use crate::tokenizer::{Number, NumericFlag, TokenType};
use crate::values::{AngleUnit, AttrValue, CounterValue, CssValue, LengthUnit, ValueId};

impl CssParser<'_> {
    /// Property-directed longhand parser: one property id, one value.
    /// Returns `None` (and commits nothing) on any mismatch.
    pub(crate) fn parse_longhand(&mut self, id: PropertyId, stream: &mut TokenStream) -> Option<CssValue> {
        use PropertyId::*;

        stream.consume_whitespace();
        let value = match id {
            Color | BackgroundColor | BorderTopColor | BorderRightColor | BorderBottomColor | BorderLeftColor
            | OutlineColor | TextDecorationColor => self.parse_color_value(stream)?,

            BorderTopStyle | BorderRightStyle | BorderBottomStyle | BorderLeftStyle | OutlineStyle => {
                self.parse_border_style(stream)?
            }

            BorderTopWidth | BorderRightWidth | BorderBottomWidth | BorderLeftWidth | OutlineWidth => {
                self.parse_border_width(stream)?
            }

            MarginTop | MarginRight | MarginBottom | MarginLeft | Top | Right | Bottom | Left => self
                .parse_ident_one_of(stream, &[ValueId::Auto])
                .or_else(|| self.parse_length_or_percent(stream, true))?,

            PaddingTop | PaddingRight | PaddingBottom | PaddingLeft => {
                self.parse_length_or_percent(stream, false)?
            }

            Width | Height | FlexBasis => self
                .parse_ident_one_of(
                    stream,
                    &[ValueId::Auto, ValueId::MinContent, ValueId::MaxContent, ValueId::FitContent],
                )
                .or_else(|| self.parse_length_or_percent(stream, false))?,

            MinWidth | MinHeight => self
                .parse_ident_one_of(stream, &[ValueId::Auto, ValueId::MinContent, ValueId::MaxContent])
                .or_else(|| self.parse_length_or_percent(stream, false))?,

            MaxWidth | MaxHeight => self
                .parse_ident_one_of(stream, &[ValueId::None, ValueId::MinContent, ValueId::MaxContent])
                .or_else(|| self.parse_length_or_percent(stream, false))?,

            FontSize => self
                .parse_ident_one_of(
                    stream,
                    &[
                        ValueId::XxSmall,
                        ValueId::XSmall,
                        ValueId::Small,
                        ValueId::Medium,
                        ValueId::Large,
                        ValueId::XLarge,
                        ValueId::XxLarge,
                        ValueId::XxxLarge,
                        ValueId::Smaller,
                        ValueId::Larger,
                    ],
                )
                .or_else(|| self.parse_length_or_percent(stream, false))?,

            LineHeight => self
                .parse_ident_one_of(stream, &[ValueId::Normal])
                .or_else(|| self.parse_number_value(stream, false))
                .or_else(|| self.parse_length_or_percent(stream, false))?,

            LetterSpacing | WordSpacing => self
                .parse_ident_one_of(stream, &[ValueId::Normal])
                .or_else(|| self.parse_length(stream, true))?,

            TextIndent => self.parse_length_or_percent(stream, true)?,
            OutlineOffset => self.parse_length(stream, true)?,
            BorderHorizontalSpacing | BorderVerticalSpacing => self.parse_length(stream, false)?,

            VerticalAlign => self
                .parse_ident_one_of(
                    stream,
                    &[
                        ValueId::Baseline,
                        ValueId::Sub,
                        ValueId::Super,
                        ValueId::Top,
                        ValueId::TextTop,
                        ValueId::Middle,
                        ValueId::Bottom,
                        ValueId::TextBottom,
                    ],
                )
                .or_else(|| self.parse_length_or_percent(stream, true))?,

            Display => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::None,
                    ValueId::Block,
                    ValueId::Inline,
                    ValueId::InlineBlock,
                    ValueId::Flex,
                    ValueId::InlineFlex,
                    ValueId::FlowRoot,
                    ValueId::Contents,
                    ValueId::ListItem,
                    ValueId::Table,
                    ValueId::InlineTable,
                    ValueId::TableRowGroup,
                    ValueId::TableHeaderGroup,
                    ValueId::TableFooterGroup,
                    ValueId::TableRow,
                    ValueId::TableColumnGroup,
                    ValueId::TableColumn,
                    ValueId::TableCell,
                    ValueId::TableCaption,
                ],
            )?,

            Position => self
                .parse_ident_one_of(
                    stream,
                    &[ValueId::Static, ValueId::Relative, ValueId::Absolute, ValueId::Fixed],
                )
                .or_else(|| self.parse_running_position(stream))?,

            Float | Clear => self.parse_ident_one_of(
                stream,
                &[ValueId::None, ValueId::Left, ValueId::Right, ValueId::Both],
            )?,

            Visibility => self.parse_ident_one_of(
                stream,
                &[ValueId::Visible, ValueId::Hidden, ValueId::Collapse],
            )?,

            Overflow => self.parse_ident_one_of(
                stream,
                &[ValueId::Visible, ValueId::Hidden, ValueId::Scroll, ValueId::Auto],
            )?,

            BoxSizing => self.parse_ident_one_of(stream, &[ValueId::ContentBox, ValueId::BorderBox])?,

            Direction => self.parse_ident_one_of(stream, &[ValueId::Ltr, ValueId::Rtl])?,

            UnicodeBidi => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Normal,
                    ValueId::Embed,
                    ValueId::BidiOverride,
                    ValueId::Isolate,
                    ValueId::IsolateOverride,
                ],
            )?,

            TextAlign => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Left,
                    ValueId::Right,
                    ValueId::Center,
                    ValueId::Justify,
                    ValueId::Start,
                    ValueId::End,
                ],
            )?,

            TextTransform => self.parse_ident_one_of(
                stream,
                &[ValueId::None, ValueId::Capitalize, ValueId::Uppercase, ValueId::Lowercase],
            )?,

            WhiteSpace => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Normal,
                    ValueId::Pre,
                    ValueId::Nowrap,
                    ValueId::PreWrap,
                    ValueId::PreLine,
                    ValueId::BreakSpaces,
                ],
            )?,

            WordBreak => self.parse_ident_one_of(
                stream,
                &[ValueId::Normal, ValueId::BreakAll, ValueId::KeepAll, ValueId::BreakWord],
            )?,

            OverflowWrap => {
                self.parse_ident_one_of(stream, &[ValueId::Normal, ValueId::BreakWord])?
            }

            TextOverflow => self.parse_ident_one_of(stream, &[ValueId::Clip, ValueId::Ellipsis])?,

            TextDecorationLine => self.parse_text_decoration_line(stream)?,

            TextDecorationStyle => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Solid,
                    ValueId::Double,
                    ValueId::Dotted,
                    ValueId::Dashed,
                    ValueId::Wavy,
                ],
            )?,

            FontStyle => self.parse_font_style(stream)?,
            FontWeight => self.parse_font_weight(stream)?,
            FontStretch => self.parse_font_stretch(stream)?,
            FontVariantCaps => self.parse_ident_one_of(stream, &[ValueId::Normal, ValueId::SmallCaps])?,

            FontVariantEastAsian | FontVariantLigatures | FontVariantNumeric | FontVariantPosition => {
                // recognized but carried as raw idents
                self.parse_custom_ident_list(stream)?
            }

            FontKerning => self.parse_ident_one_of(stream, &[ValueId::Auto, ValueId::Normal, ValueId::None])?,

            FontFamily => self.parse_font_family(stream)?,
            FontFeatureSettings => self.parse_feature_settings(stream)?,
            FontVariationSettings => self.parse_variation_settings(stream)?,

            ZIndex => self
                .parse_ident_one_of(stream, &[ValueId::Auto])
                .or_else(|| self.parse_integer_value(stream))?,

            Order => self.parse_integer_value(stream)?,
            Orphans | Widows => self.parse_positive_integer(stream)?,

            TabSize => self
                .parse_number_value(stream, false)
                .or_else(|| self.parse_length(stream, false))?,

            BackgroundImage | ListStyleImage => self
                .parse_ident_one_of(stream, &[ValueId::None])
                .or_else(|| self.parse_image_value(stream))?,

            BackgroundRepeat => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Repeat,
                    ValueId::RepeatX,
                    ValueId::RepeatY,
                    ValueId::NoRepeat,
                    ValueId::Space,
                    ValueId::Round,
                ],
            )?,

            BackgroundAttachment => {
                self.parse_ident_one_of(stream, &[ValueId::Scroll, ValueId::Fixed, ValueId::Local])?
            }

            BackgroundOrigin | BackgroundClip => self.parse_ident_one_of(
                stream,
                &[ValueId::BorderBox, ValueId::PaddingBox, ValueId::ContentBox],
            )?,

            BackgroundPosition => self.parse_background_position(stream)?,
            BackgroundSize => self.parse_background_size(stream)?,

            BorderTopLeftRadius | BorderTopRightRadius | BorderBottomRightRadius | BorderBottomLeftRadius => {
                self.parse_radius_pair(stream)?
            }

            BorderCollapse => self.parse_ident_one_of(stream, &[ValueId::Collapse, ValueId::Separate])?,
            CaptionSide => self.parse_ident_one_of(stream, &[ValueId::Top, ValueId::Bottom])?,
            EmptyCells => self.parse_ident_one_of(stream, &[ValueId::Show, ValueId::Hide])?,
            TableLayout => self.parse_ident_one_of(stream, &[ValueId::Auto, ValueId::Fixed])?,

            Content => self.parse_content_value(stream)?,
            Quotes => self.parse_quotes(stream)?,
            CounterIncrement => self.parse_counter_directive(stream, 1)?,
            CounterReset | CounterSet => self.parse_counter_directive(stream, 0)?,

            ListStyleType => self.parse_list_style_type(stream)?,
            ListStylePosition => self.parse_ident_one_of(stream, &[ValueId::Inside, ValueId::Outside])?,

            Page => self
                .parse_ident_one_of(stream, &[ValueId::Auto])
                .or_else(|| self.parse_custom_ident(stream))?,

            PageBreakAfter | PageBreakBefore => self.parse_ident_one_of(
                stream,
                &[ValueId::Auto, ValueId::Always, ValueId::Avoid, ValueId::Left, ValueId::Right],
            )?,

            PageBreakInside => self.parse_ident_one_of(stream, &[ValueId::Auto, ValueId::Avoid])?,

            BreakAfter | BreakBefore => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Auto,
                    ValueId::Avoid,
                    ValueId::AvoidPage,
                    ValueId::Page,
                    ValueId::Left,
                    ValueId::Right,
                ],
            )?,

            BreakInside => {
                self.parse_ident_one_of(stream, &[ValueId::Auto, ValueId::Avoid, ValueId::AvoidPage])?
            }

            Size => self.parse_page_size(stream)?,

            FlexGrow | FlexShrink => self.parse_number_value(stream, false)?,
            FlexDirection => self.parse_ident_one_of(
                stream,
                &[ValueId::Row, ValueId::RowReverse, ValueId::Column, ValueId::ColumnReverse],
            )?,
            FlexWrap => {
                self.parse_ident_one_of(stream, &[ValueId::Nowrap, ValueId::Wrap, ValueId::WrapReverse])?
            }

            JustifyContent | AlignContent => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::FlexStart,
                    ValueId::FlexEnd,
                    ValueId::Center,
                    ValueId::SpaceBetween,
                    ValueId::SpaceAround,
                    ValueId::SpaceEvenly,
                    ValueId::Start,
                    ValueId::End,
                    ValueId::Stretch,
                ],
            )?,

            AlignItems | AlignSelf => self.parse_ident_one_of(
                stream,
                &[
                    ValueId::Auto,
                    ValueId::Stretch,
                    ValueId::FlexStart,
                    ValueId::FlexEnd,
                    ValueId::Center,
                    ValueId::Baseline,
                ],
            )?,

            _ => return None,
        };

        Some(value)
    }

    /// One ident out of an allowed set.
    pub(crate) fn parse_ident_one_of(&mut self, stream: &mut TokenStream, allowed: &[ValueId]) -> Option<CssValue> {
        let TokenType::Ident(name) = stream.peek(0).token_type.clone() else {
            return None;
        };
        let id = ValueId::from_name(&name)?;
        if !allowed.contains(&id) {
            return None;
        }
        stream.consume_including_whitespace();
        Some(CssValue::Ident(id))
    }

    /// Any identifier that is not a wide keyword, as a custom ident.
    pub(crate) fn parse_custom_ident(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let TokenType::Ident(name) = stream.peek(0).token_type.clone() else {
            return None;
        };
        if matches!(name.to_ascii_lowercase().as_str(), "initial" | "inherit" | "unset" | "default") {
            return None;
        }
        stream.consume_including_whitespace();
        Some(CssValue::CustomIdent(name))
    }

    fn parse_custom_ident_list(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let mut values = Vec::new();
        while let Some(value) = self.parse_custom_ident(stream) {
            values.push(value);
        }
        if values.is_empty() {
            return None;
        }
        if values.len() == 1 {
            return values.into_iter().next();
        }
        Some(CssValue::List(values))
    }

    /// A number, or a unitless `calc()`.
    pub(crate) fn parse_number_value(&mut self, stream: &mut TokenStream, allow_negative: bool) -> Option<CssValue> {
        match stream.peek(0).token_type.clone() {
            TokenType::Number { value, .. } => {
                if value < 0.0 && !allow_negative {
                    return None;
                }
                stream.consume_including_whitespace();
                Some(CssValue::Number(value))
            }
            TokenType::Function(_) => {
                let guard = stream.guard();
                if let Some(CssValue::Calc(calc)) = self.parse_calc_function(stream, allow_negative) {
                    if calc.unitless {
                        guard.release();
                        stream.consume_whitespace();
                        return Some(CssValue::Calc(calc));
                    }
                }
                stream.rewind(guard);
                None
            }
            _ => None,
        }
    }

    pub(crate) fn parse_integer_value(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let TokenType::Number { value, flag, .. } = stream.peek(0).token_type.clone() else {
            return None;
        };
        if flag != NumericFlag::Integer {
            return None;
        }
        stream.consume_including_whitespace();
        Some(CssValue::Integer(value as i32))
    }

    fn parse_positive_integer(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let value = self.parse_integer_value(stream)?;
        if value.as_integer().unwrap_or(-1) < 1 {
            return None;
        }
        Some(value)
    }

    /// A length, a quirky unitless zero, or a `calc()`.
    pub(crate) fn parse_length(&mut self, stream: &mut TokenStream, allow_negative: bool) -> Option<CssValue> {
        match stream.peek(0).token_type.clone() {
            TokenType::Dimension { value, unit, .. } => {
                let unit = LengthUnit::from_name(&unit)?;
                if value < 0.0 && !allow_negative {
                    return None;
                }
                stream.consume_including_whitespace();
                Some(CssValue::Length(value, unit))
            }
            TokenType::Number { value, .. } if value == 0.0 => {
                stream.consume_including_whitespace();
                Some(CssValue::Length(0.0, LengthUnit::Px))
            }
            TokenType::Function(_) => {
                let guard = stream.guard();
                if let Some(calc) = self.parse_calc_function(stream, allow_negative) {
                    guard.release();
                    stream.consume_whitespace();
                    return Some(calc);
                }
                stream.rewind(guard);
                None
            }
            _ => None,
        }
    }

    pub(crate) fn parse_length_or_percent(&mut self, stream: &mut TokenStream, allow_negative: bool) -> Option<CssValue> {
        if let TokenType::Percentage { value, .. } = stream.peek(0).token_type.clone() {
            if value < 0.0 && !allow_negative {
                return None;
            }
            stream.consume_including_whitespace();
            return Some(CssValue::Percent(value));
        }
        self.parse_length(stream, allow_negative)
    }

    fn parse_border_style(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        self.parse_ident_one_of(
            stream,
            &[
                ValueId::None,
                ValueId::Hidden,
                ValueId::Dotted,
                ValueId::Dashed,
                ValueId::Solid,
                ValueId::Double,
                ValueId::Groove,
                ValueId::Ridge,
                ValueId::Inset,
                ValueId::Outset,
            ],
        )
    }

    fn parse_border_width(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        self.parse_ident_one_of(stream, &[ValueId::Thin, ValueId::Medium, ValueId::Thick])
            .or_else(|| self.parse_length(stream, false))
    }

    fn parse_running_position(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if !stream.peek(0).is_function_name("running") {
            return None;
        }
        let guard = stream.guard();
        let Some(mut block) = stream.consume_block() else {
            return None;
        };
        block.consume_whitespace();
        let Some(name) = self.parse_custom_ident(&mut block) else {
            stream.rewind(guard);
            return None;
        };
        block.consume_whitespace();
        if !block.at_end() {
            stream.rewind(guard);
            return None;
        }
        guard.release();
        stream.consume_whitespace();
        Some(CssValue::UnaryFunction(ValueId::Running, Box::new(name)))
    }

    fn parse_text_decoration_line(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(none) = self.parse_ident_one_of(stream, &[ValueId::None]) {
            return Some(none);
        }
        let mut lines = Vec::new();
        while let Some(line) = self.parse_ident_one_of(
            stream,
            &[ValueId::Underline, ValueId::Overline, ValueId::LineThrough],
        ) {
            if lines.contains(&line) {
                return None;
            }
            lines.push(line);
        }
        if lines.is_empty() {
            return None;
        }
        if lines.len() == 1 {
            return lines.into_iter().next();
        }
        Some(CssValue::List(lines))
    }

    pub(crate) fn parse_font_style(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(value) = self.parse_ident_one_of(stream, &[ValueId::Normal, ValueId::Italic]) {
            return Some(value);
        }
        let oblique = self.parse_ident_one_of(stream, &[ValueId::Oblique])?;
        if let TokenType::Dimension { value, unit, .. } = stream.peek(0).token_type.clone() {
            if let Some(angle_unit) = AngleUnit::from_name(&unit) {
                stream.consume_including_whitespace();
                return Some(CssValue::pair(oblique, CssValue::Angle(value, angle_unit)));
            }
        }
        Some(oblique)
    }

    pub(crate) fn parse_font_weight(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(value) = self.parse_ident_one_of(
            stream,
            &[ValueId::Normal, ValueId::Bold, ValueId::Bolder, ValueId::Lighter],
        ) {
            return Some(value);
        }
        let TokenType::Number { value, .. } = stream.peek(0).token_type.clone() else {
            return None;
        };
        if !(1.0..=1000.0).contains(&value) {
            return None;
        }
        stream.consume_including_whitespace();
        Some(CssValue::Number(value))
    }

    pub(crate) fn parse_font_stretch(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(value) = self.parse_ident_one_of(
            stream,
            &[
                ValueId::Normal,
                ValueId::UltraCondensed,
                ValueId::ExtraCondensed,
                ValueId::Condensed,
                ValueId::SemiCondensed,
                ValueId::SemiExpanded,
                ValueId::Expanded,
                ValueId::ExtraExpanded,
                ValueId::UltraExpanded,
            ],
        ) {
            return Some(value);
        }
        let TokenType::Percentage { value, .. } = stream.peek(0).token_type.clone() else {
            return None;
        };
        if value < 0.0 {
            return None;
        }
        stream.consume_including_whitespace();
        Some(CssValue::Percent(value))
    }

    pub(crate) fn parse_font_family(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let mut families = Vec::new();

        loop {
            stream.consume_whitespace();
            match stream.peek(0).token_type.clone() {
                TokenType::QuotedString(name) => {
                    stream.consume_including_whitespace();
                    families.push(CssValue::String(name));
                }
                TokenType::Ident(_) => {
                    if let Some(generic) = self.parse_ident_one_of(
                        stream,
                        &[
                            ValueId::Serif,
                            ValueId::SansSerif,
                            ValueId::Monospace,
                            ValueId::Cursive,
                            ValueId::Fantasy,
                        ],
                    ) {
                        families.push(generic);
                    } else {
                        // unquoted family names may span several idents
                        let mut words = Vec::new();
                        while let TokenType::Ident(word) = stream.peek(0).token_type.clone() {
                            stream.consume_including_whitespace();
                            words.push(word);
                        }
                        if words.is_empty() {
                            return None;
                        }
                        families.push(CssValue::String(words.join(" ")));
                    }
                }
                _ => return None,
            }

            if !stream.consume_comma_including_whitespace() {
                break;
            }
        }

        if families.is_empty() {
            return None;
        }
        Some(CssValue::List(families))
    }

    fn parse_feature_settings(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(normal) = self.parse_ident_one_of(stream, &[ValueId::Normal]) {
            return Some(normal);
        }

        let mut features = Vec::new();
        loop {
            stream.consume_whitespace();
            let TokenType::QuotedString(tag) = stream.peek(0).token_type.clone() else {
                return None;
            };
            if tag.len() != 4 || !tag.is_ascii() {
                return None;
            }
            stream.consume_including_whitespace();

            let value = match stream.peek(0).token_type.clone() {
                TokenType::Number { value, flag, .. } if flag == NumericFlag::Integer && value >= 0.0 => {
                    stream.consume_including_whitespace();
                    value as i32
                }
                TokenType::Ident(name) if name.eq_ignore_ascii_case("on") => {
                    stream.consume_including_whitespace();
                    1
                }
                TokenType::Ident(name) if name.eq_ignore_ascii_case("off") => {
                    stream.consume_including_whitespace();
                    0
                }
                _ => 1,
            };
            features.push(CssValue::FontFeature(tag, value));

            if !stream.consume_comma_including_whitespace() {
                break;
            }
        }

        if features.is_empty() {
            return None;
        }
        Some(CssValue::List(features))
    }

    fn parse_variation_settings(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(normal) = self.parse_ident_one_of(stream, &[ValueId::Normal]) {
            return Some(normal);
        }

        let mut variations = Vec::new();
        loop {
            stream.consume_whitespace();
            let TokenType::QuotedString(tag) = stream.peek(0).token_type.clone() else {
                return None;
            };
            if tag.len() != 4 || !tag.is_ascii() {
                return None;
            }
            stream.consume_including_whitespace();

            let TokenType::Number { value, .. } = stream.peek(0).token_type.clone() else {
                return None;
            };
            stream.consume_including_whitespace();
            variations.push(CssValue::FontVariation(tag, value));

            if !stream.consume_comma_including_whitespace() {
                break;
            }
        }

        if variations.is_empty() {
            return None;
        }
        Some(CssValue::List(variations))
    }

    /// `url(...)`, quoted `url("...")`, completed against the sheet base.
    pub(crate) fn parse_url_value(&mut self, stream: &mut TokenStream) -> Option<String> {
        match stream.peek(0).token_type.clone() {
            TokenType::Url(href) => {
                stream.consume_including_whitespace();
                Some(self.complete_url(&href))
            }
            TokenType::Function(name) if name.eq_ignore_ascii_case("url") => {
                let guard = stream.guard();
                let mut block = stream.consume_block()?;
                block.consume_whitespace();
                let TokenType::QuotedString(href) = block.peek(0).token_type.clone() else {
                    stream.rewind(guard);
                    return None;
                };
                block.consume_including_whitespace();
                if !block.at_end() {
                    stream.rewind(guard);
                    return None;
                }
                guard.release();
                stream.consume_whitespace();
                Some(self.complete_url(&href))
            }
            _ => None,
        }
    }

    fn parse_image_value(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        self.parse_url_value(stream).map(CssValue::Image)
    }

    /// Completes a (possibly relative) url against the owning sheet's url.
    pub(crate) fn complete_url(&self, href: &str) -> String {
        if self.source_url.is_empty() {
            return href.to_string();
        }
        match url::Url::parse(&self.source_url).and_then(|base| base.join(href)) {
            Ok(joined) => joined.to_string(),
            Err(_) => href.to_string(),
        }
    }

    /// A color: hash, named/special ident, or color function.
    pub(crate) fn parse_color_value(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        match stream.peek(0).token_type.clone() {
            TokenType::Hash(value, _) => {
                let color = colors::parse_hash_color(&value)?;
                stream.consume_including_whitespace();
                Some(CssValue::Color(color))
            }
            TokenType::Ident(name) => {
                if name.eq_ignore_ascii_case("currentcolor") {
                    stream.consume_including_whitespace();
                    return Some(CssValue::Ident(ValueId::Currentcolor));
                }
                let color = colors::named_color(&name)?;
                stream.consume_including_whitespace();
                Some(CssValue::Color(color))
            }
            TokenType::Function(name) => {
                let guard = stream.guard();
                let mut block = stream.consume_block()?;
                let color = match name.to_ascii_lowercase().as_str() {
                    "rgb" | "rgba" => self.parse_rgb_components(&mut block),
                    "hsl" | "hsla" => self.parse_hsl_components(&mut block),
                    "hwb" => self.parse_hwb_components(&mut block),
                    _ => None,
                };
                match color {
                    Some(color) => {
                        guard.release();
                        stream.consume_whitespace();
                        Some(CssValue::Color(color))
                    }
                    None => {
                        stream.rewind(guard);
                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn parse_rgb_components(&mut self, block: &mut TokenStream) -> Option<RgbaColor> {
        let r = self.parse_color_channel(block)?;
        let legacy = block.consume_comma_including_whitespace();
        let g = self.parse_color_channel(block)?;
        if legacy && !block.consume_comma_including_whitespace() {
            return None;
        }
        let b = self.parse_color_channel(block)?;
        let alpha = self.parse_alpha_component(block, legacy)?;

        block.consume_whitespace();
        if !block.at_end() {
            return None;
        }
        Some(RgbaColor::new(r, g, b, alpha))
    }

    /// One rgb channel: 0..=255 number or percentage.
    fn parse_color_channel(&mut self, block: &mut TokenStream) -> Option<u8> {
        block.consume_whitespace();
        match block.peek(0).token_type.clone() {
            TokenType::Number { value, .. } => {
                block.consume();
                Some(value.clamp(0.0, 255.0).round() as u8)
            }
            TokenType::Percentage { value, .. } => {
                block.consume();
                Some((value.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8)
            }
            _ => None,
        }
    }

    /// Optional alpha: `, a` in the legacy syntax, `/ a` in the modern one.
    /// Returns 255 when absent.
    fn parse_alpha_component(&mut self, block: &mut TokenStream, legacy: bool) -> Option<u8> {
        block.consume_whitespace();
        let has_separator = if legacy {
            block.consume_comma_including_whitespace()
        } else if block.peek(0).is_delim('/') {
            block.consume();
            block.consume_whitespace();
            true
        } else {
            false
        };

        if !has_separator {
            return Some(255);
        }

        match block.peek(0).token_type.clone() {
            TokenType::Number { value, .. } => {
                block.consume();
                Some((value.clamp(0.0, 1.0) * 255.0).round() as u8)
            }
            TokenType::Percentage { value, .. } => {
                block.consume();
                Some((value.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8)
            }
            _ => None,
        }
    }

    fn parse_hue(&mut self, block: &mut TokenStream) -> Option<Number> {
        block.consume_whitespace();
        match block.peek(0).token_type.clone() {
            TokenType::Number { value, .. } => {
                block.consume();
                Some(value)
            }
            TokenType::Dimension { value, unit, .. } => {
                let unit = AngleUnit::from_name(&unit)?;
                block.consume();
                Some(unit.to_degrees(value))
            }
            _ => None,
        }
    }

    fn parse_percent_component(&mut self, block: &mut TokenStream) -> Option<Number> {
        block.consume_whitespace();
        let TokenType::Percentage { value, .. } = block.peek(0).token_type.clone() else {
            return None;
        };
        block.consume();
        Some(value)
    }

    fn parse_hsl_components(&mut self, block: &mut TokenStream) -> Option<RgbaColor> {
        let h = self.parse_hue(block)?;
        let legacy = block.consume_comma_including_whitespace();
        let s = self.parse_percent_component(block)?;
        if legacy && !block.consume_comma_including_whitespace() {
            return None;
        }
        let l = self.parse_percent_component(block)?;
        let alpha = self.parse_alpha_component(block, legacy)?;

        block.consume_whitespace();
        if !block.at_end() {
            return None;
        }
        Some(colors::from_hsl(h, s, l, f32::from(alpha) / 255.0))
    }

    fn parse_hwb_components(&mut self, block: &mut TokenStream) -> Option<RgbaColor> {
        let h = self.parse_hue(block)?;
        let w = self.parse_percent_component(block)?;
        let b = self.parse_percent_component(block)?;
        let alpha = self.parse_alpha_component(block, false)?;

        block.consume_whitespace();
        if !block.at_end() {
            return None;
        }
        Some(colors::from_hwb(h, w, b, f32::from(alpha) / 255.0))
    }

    /// 1-2 values out of {keyword, length, percent} describing a background
    /// position.
    fn parse_background_position(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let first = self.parse_position_component(stream)?;
        let second = self
            .parse_position_component(stream)
            .unwrap_or(CssValue::Ident(ValueId::Center));
        Some(CssValue::pair(first, second))
    }

    fn parse_position_component(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        self.parse_ident_one_of(
            stream,
            &[ValueId::Left, ValueId::Right, ValueId::Top, ValueId::Bottom, ValueId::Center],
        )
        .or_else(|| self.parse_length_or_percent(stream, true))
    }

    pub(crate) fn parse_background_size(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(keyword) = self.parse_ident_one_of(stream, &[ValueId::Cover, ValueId::Contain]) {
            return Some(keyword);
        }
        let first = self
            .parse_ident_one_of(stream, &[ValueId::Auto])
            .or_else(|| self.parse_length_or_percent(stream, false))?;
        let second = self
            .parse_ident_one_of(stream, &[ValueId::Auto])
            .or_else(|| self.parse_length_or_percent(stream, false))
            .unwrap_or(CssValue::Ident(ValueId::Auto));
        Some(CssValue::pair(first, second))
    }

    /// 1-2 length/percent radii for one corner.
    fn parse_radius_pair(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let first = self.parse_length_or_percent(stream, false)?;
        let second = self.parse_length_or_percent(stream, false).unwrap_or_else(|| first.clone());
        Some(CssValue::pair(first, second))
    }

    fn parse_list_style_type(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(none) = self.parse_ident_one_of(stream, &[ValueId::None]) {
            return Some(none);
        }
        if let TokenType::QuotedString(s) = stream.peek(0).token_type.clone() {
            stream.consume_including_whitespace();
            return Some(CssValue::String(s));
        }
        self.parse_custom_ident(stream)
    }

    /// `content`: normal/none or a list of strings, counters, attr() and
    /// quote keywords.
    fn parse_content_value(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(keyword) = self.parse_ident_one_of(stream, &[ValueId::Normal, ValueId::None]) {
            return Some(keyword);
        }

        let mut values = Vec::new();
        loop {
            stream.consume_whitespace();
            let value = match stream.peek(0).token_type.clone() {
                TokenType::Eof => break,
                TokenType::QuotedString(s) => {
                    stream.consume_including_whitespace();
                    CssValue::String(s)
                }
                TokenType::Function(name) if name.eq_ignore_ascii_case("attr") => self.parse_attr_function(stream)?,
                TokenType::Function(name)
                    if name.eq_ignore_ascii_case("counter") || name.eq_ignore_ascii_case("counters") =>
                {
                    self.parse_counter_function(stream)?
                }
                TokenType::Url(_) | TokenType::Function(_) => {
                    let href = self.parse_url_value(stream)?;
                    CssValue::Image(href)
                }
                TokenType::Ident(_) => self.parse_ident_one_of(
                    stream,
                    &[
                        ValueId::OpenQuote,
                        ValueId::CloseQuote,
                        ValueId::NoOpenQuote,
                        ValueId::NoCloseQuote,
                    ],
                )?,
                _ => return None,
            };
            values.push(value);
        }

        if values.is_empty() {
            return None;
        }
        Some(CssValue::List(values))
    }

    /// `attr(name[, fallback])`; the speculative guard rewinds on mismatch.
    pub(crate) fn parse_attr_function(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let guard = stream.guard();
        let Some(mut block) = stream.consume_block() else {
            return None;
        };

        block.consume_whitespace();
        let TokenType::Ident(name) = block.peek(0).token_type.clone() else {
            stream.rewind(guard);
            return None;
        };
        block.consume_including_whitespace();

        let mut fallback = None;
        if block.consume_comma_including_whitespace() {
            if let TokenType::QuotedString(s) = block.peek(0).token_type.clone() {
                block.consume_including_whitespace();
                fallback = Some(CssValue::String(s));
            } else {
                stream.rewind(guard);
                return None;
            }
        }

        block.consume_whitespace();
        if !block.at_end() {
            stream.rewind(guard);
            return None;
        }

        guard.release();
        stream.consume_whitespace();
        Some(CssValue::Attr(Box::new(AttrValue { name, fallback })))
    }

    /// `counter(name[, style])` and `counters(name, separator[, style])`.
    fn parse_counter_function(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        let TokenType::Function(function) = stream.peek(0).token_type.clone() else {
            return None;
        };
        let is_counters = function.eq_ignore_ascii_case("counters");
        let mut block = stream.consume_block()?;

        block.consume_whitespace();
        let TokenType::Ident(identifier) = block.peek(0).token_type.clone() else {
            return None;
        };
        block.consume_including_whitespace();

        let mut separator = String::new();
        if is_counters {
            if !block.consume_comma_including_whitespace() {
                return None;
            }
            let TokenType::QuotedString(s) = block.peek(0).token_type.clone() else {
                return None;
            };
            block.consume_including_whitespace();
            separator = s;
        }

        let mut style = "decimal".to_string();
        if block.consume_comma_including_whitespace() {
            let TokenType::Ident(name) = block.peek(0).token_type.clone() else {
                return None;
            };
            block.consume_including_whitespace();
            style = name;
        }

        block.consume_whitespace();
        if !block.at_end() {
            return None;
        }

        stream.consume_whitespace();
        Some(CssValue::Counter(Box::new(CounterValue {
            identifier,
            style,
            separator,
        })))
    }

    /// `quotes`: none or pairs of open/close strings.
    fn parse_quotes(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(keyword) = self.parse_ident_one_of(stream, &[ValueId::None, ValueId::Auto]) {
            return Some(keyword);
        }

        let mut pairs = Vec::new();
        loop {
            stream.consume_whitespace();
            let TokenType::QuotedString(open) = stream.peek(0).token_type.clone() else {
                break;
            };
            stream.consume_including_whitespace();
            let TokenType::QuotedString(close) = stream.peek(0).token_type.clone() else {
                return None;
            };
            stream.consume_including_whitespace();
            pairs.push(CssValue::pair(CssValue::String(open), CssValue::String(close)));
        }

        if pairs.is_empty() {
            return None;
        }
        Some(CssValue::List(pairs))
    }

    /// `counter-increment`/`-reset`/`-set`: none or (name, delta) pairs.
    /// `default_delta` is 1 for increments, 0 for resets.
    fn parse_counter_directive(&mut self, stream: &mut TokenStream, default_delta: i32) -> Option<CssValue> {
        if let Some(none) = self.parse_ident_one_of(stream, &[ValueId::None]) {
            return Some(none);
        }

        let mut entries = Vec::new();
        loop {
            stream.consume_whitespace();
            if stream.at_end() {
                break;
            }
            let name = self.parse_custom_ident(stream)?;
            let delta = self
                .parse_integer_value(stream)
                .unwrap_or(CssValue::Integer(default_delta));
            entries.push(CssValue::pair(name, delta));
        }

        if entries.is_empty() {
            return None;
        }
        Some(CssValue::List(entries))
    }

    /// `@page` `size`: auto, orientation, named size with optional
    /// orientation, or 1-2 lengths.
    fn parse_page_size(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        if let Some(auto) = self.parse_ident_one_of(stream, &[ValueId::Auto]) {
            return Some(auto);
        }

        if let Some(first) = self.parse_length(stream, false) {
            let second = self.parse_length(stream, false).unwrap_or_else(|| first.clone());
            return Some(CssValue::pair(first, second));
        }

        let names = &[
            ValueId::A3,
            ValueId::A4,
            ValueId::A5,
            ValueId::B4,
            ValueId::B5,
            ValueId::Letter,
            ValueId::Legal,
            ValueId::Ledger,
        ];
        let orientations = &[ValueId::Portrait, ValueId::Landscape];

        if let Some(name) = self.parse_ident_one_of(stream, names) {
            if let Some(orientation) = self.parse_ident_one_of(stream, orientations) {
                return Some(CssValue::pair(name, orientation));
            }
            return Some(name);
        }
        if let Some(orientation) = self.parse_ident_one_of(stream, orientations) {
            if let Some(name) = self.parse_ident_one_of(stream, names) {
                return Some(CssValue::pair(name, orientation));
            }
            return Some(orientation);
        }
        None
    }
}
