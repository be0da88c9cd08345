use crate::parser::CssParser;
use crate::properties::PropertyId;
use crate::stream::TokenStream;
use crate::stylesheet::CssDeclaration;
use crate::tokenizer::TokenType;
use crate::values::{CssValue, LengthUnit, ValueId};

impl CssParser<'_> {
    /// Parses a shorthand into its longhand declarations. A failed
    /// shorthand commits nothing.
    pub(crate) fn parse_shorthand(
        &mut self,
        id: PropertyId,
        stream: &mut TokenStream,
        important: bool,
    ) -> Option<Vec<CssDeclaration>> {
        use PropertyId::*;

        stream.consume_whitespace();
        let declarations = match id {
            Margin | Padding | BorderWidth | BorderStyle | BorderColor => {
                self.parse_four_sides(id, stream, important)?
            }
            BorderRadius => self.parse_border_radius(stream, important)?,
            Border => {
                let mut declarations = self.parse_border_side(BorderTop, stream, important)?;
                // border sets all four sides to the same values
                for side in [BorderRight, BorderBottom, BorderLeft] {
                    for (longhand, declaration) in side.longhands().iter().zip(declarations.clone()) {
                        declarations.push(CssDeclaration::new(*longhand, declaration.value, important));
                    }
                }
                declarations
            }
            BorderTop | BorderRight | BorderBottom | BorderLeft => self.parse_border_side(id, stream, important)?,
            Outline => self.parse_outline(stream, important)?,
            BorderSpacing => self.parse_border_spacing(stream, important)?,
            Background => self.parse_background(stream, important)?,
            Font => self.parse_font(stream, important)?,
            FontVariant => self.parse_font_variant(stream, important)?,
            Flex => self.parse_flex(stream, important)?,
            FlexFlow => self.parse_flex_flow(stream, important)?,
            ListStyle => self.parse_list_style(stream, important)?,
            TextDecoration => self.parse_text_decoration(stream, important)?,
            _ => return None,
        };

        stream.consume_whitespace();
        if !stream.at_end() {
            return None;
        }
        Some(declarations)
    }

    /// The classic 4-tuple: 1 value fans out to all sides, 2 to vertical and
    /// horizontal, 3 to top/horizontal/bottom. Missing sides reuse the
    /// already parsed values (right for left, top for bottom).
    fn parse_four_sides(
        &mut self,
        id: PropertyId,
        stream: &mut TokenStream,
        important: bool,
    ) -> Option<Vec<CssDeclaration>> {
        let longhands = id.longhands();

        let component = |parser: &mut Self, stream: &mut TokenStream| match id {
            PropertyId::Margin => parser
                .parse_ident_one_of(stream, &[ValueId::Auto])
                .or_else(|| parser.parse_length_or_percent(stream, true)),
            PropertyId::Padding => parser.parse_length_or_percent(stream, false),
            PropertyId::BorderWidth => parser.parse_longhand(PropertyId::BorderTopWidth, stream),
            PropertyId::BorderStyle => parser.parse_longhand(PropertyId::BorderTopStyle, stream),
            _ => parser.parse_color_value(stream),
        };

        let top = component(self, stream)?;
        let right = component(self, stream).unwrap_or_else(|| top.clone());
        let bottom = component(self, stream).unwrap_or_else(|| top.clone());
        let left = component(self, stream).unwrap_or_else(|| right.clone());

        Some(vec![
            CssDeclaration::new(longhands[0], top, important),
            CssDeclaration::new(longhands[1], right, important),
            CssDeclaration::new(longhands[2], bottom, important),
            CssDeclaration::new(longhands[3], left, important),
        ])
    }

    /// `border-radius`: up to four horizontal radii, then `/` and up to four
    /// vertical ones. Missing corners mirror (top-left to bottom-right,
    /// top-right to bottom-left).
    fn parse_border_radius(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let horizontal = self.parse_radius_run(stream)?;

        let vertical = if stream.peek(0).is_delim('/') {
            stream.consume_including_whitespace();
            self.parse_radius_run(stream)?
        } else {
            horizontal.clone()
        };

        let longhands = PropertyId::BorderRadius.longhands();
        let declarations = longhands
            .iter()
            .enumerate()
            .map(|(corner, longhand)| {
                let h = horizontal[corner.min(horizontal.len() - 1)].clone();
                let v = vertical[corner.min(vertical.len() - 1)].clone();
                CssDeclaration::new(*longhand, CssValue::pair(h, v), important)
            })
            .collect();
        Some(declarations)
    }

    /// 1-4 radii expanded to the full corner list with mirroring.
    fn parse_radius_run(&mut self, stream: &mut TokenStream) -> Option<Vec<CssValue>> {
        let mut radii = Vec::new();
        while radii.len() < 4 {
            match self.parse_length_or_percent(stream, false) {
                Some(value) => radii.push(value),
                None => break,
            }
        }

        match radii.len() {
            0 => None,
            // order: top-left, top-right, bottom-right, bottom-left
            1 => Some(vec![radii[0].clone(); 4]),
            2 => Some(vec![radii[0].clone(), radii[1].clone(), radii[0].clone(), radii[1].clone()]),
            3 => Some(vec![radii[0].clone(), radii[1].clone(), radii[2].clone(), radii[1].clone()]),
            _ => Some(radii),
        }
    }

    /// `border-top` and friends: width, style, color in any order.
    fn parse_border_side(
        &mut self,
        id: PropertyId,
        stream: &mut TokenStream,
        important: bool,
    ) -> Option<Vec<CssDeclaration>> {
        let longhands = id.longhands();
        let mut width = None;
        let mut style = None;
        let mut color = None;

        while !stream.at_end() {
            if width.is_none() {
                if let Some(value) = self.parse_longhand(longhands[0], stream) {
                    width = Some(value);
                    continue;
                }
            }
            if style.is_none() {
                if let Some(value) = self.parse_longhand(longhands[1], stream) {
                    style = Some(value);
                    continue;
                }
            }
            if color.is_none() {
                if let Some(value) = self.parse_color_value(stream) {
                    color = Some(value);
                    continue;
                }
            }
            break;
        }

        if width.is_none() && style.is_none() && color.is_none() {
            return None;
        }

        Some(vec![
            CssDeclaration::new(longhands[0], width.unwrap_or(CssValue::Ident(ValueId::Medium)), important),
            CssDeclaration::new(longhands[1], style.unwrap_or(CssValue::Ident(ValueId::None)), important),
            CssDeclaration::new(
                longhands[2],
                color.unwrap_or(CssValue::Ident(ValueId::Currentcolor)),
                important,
            ),
        ])
    }

    fn parse_outline(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let mut width = None;
        let mut style = None;
        let mut color = None;

        while !stream.at_end() {
            if width.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::OutlineWidth, stream) {
                    width = Some(value);
                    continue;
                }
            }
            if style.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::OutlineStyle, stream) {
                    style = Some(value);
                    continue;
                }
            }
            if color.is_none() {
                if let Some(value) = self.parse_color_value(stream) {
                    color = Some(value);
                    continue;
                }
            }
            break;
        }

        if width.is_none() && style.is_none() && color.is_none() {
            return None;
        }

        Some(vec![
            CssDeclaration::new(
                PropertyId::OutlineWidth,
                width.unwrap_or(CssValue::Ident(ValueId::Medium)),
                important,
            ),
            CssDeclaration::new(
                PropertyId::OutlineStyle,
                style.unwrap_or(CssValue::Ident(ValueId::None)),
                important,
            ),
            CssDeclaration::new(
                PropertyId::OutlineColor,
                color.unwrap_or(CssValue::Ident(ValueId::Currentcolor)),
                important,
            ),
        ])
    }

    fn parse_border_spacing(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let horizontal = self.parse_length(stream, false)?;
        let vertical = self.parse_length(stream, false).unwrap_or_else(|| horizontal.clone());

        Some(vec![
            CssDeclaration::new(PropertyId::BorderHorizontalSpacing, horizontal, important),
            CssDeclaration::new(PropertyId::BorderVerticalSpacing, vertical, important),
        ])
    }

    /// `background`: the longhand components in any order; position may be
    /// followed by `/ size`; a lone box keyword sets origin and falls
    /// through to clip.
    fn parse_background(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let mut color = None;
        let mut image = None;
        let mut repeat = None;
        let mut attachment = None;
        let mut position = None;
        let mut size = None;
        let mut origin = None;
        let mut clip = None;

        while !stream.at_end() {
            if image.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::BackgroundImage, stream) {
                    image = Some(value);
                    continue;
                }
            }
            if repeat.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::BackgroundRepeat, stream) {
                    repeat = Some(value);
                    continue;
                }
            }
            if attachment.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::BackgroundAttachment, stream) {
                    attachment = Some(value);
                    continue;
                }
            }
            if position.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::BackgroundPosition, stream) {
                    position = Some(value);
                    // optional `/ <size>`
                    if stream.peek(0).is_delim('/') {
                        stream.consume_including_whitespace();
                        size = Some(self.parse_background_size(stream)?);
                    }
                    continue;
                }
            }
            if origin.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::BackgroundOrigin, stream) {
                    origin = Some(value);
                    continue;
                }
            }
            if clip.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::BackgroundClip, stream) {
                    clip = Some(value);
                    continue;
                }
            }
            if color.is_none() {
                if let Some(value) = self.parse_color_value(stream) {
                    color = Some(value);
                    continue;
                }
            }
            break;
        }

        let any = [&color, &image, &repeat, &attachment, &position, &size, &origin, &clip]
            .iter()
            .any(|v| v.is_some());
        if !any {
            return None;
        }

        // origin falls through to clip when clip is absent
        if clip.is_none() {
            clip = origin.clone();
        }

        Some(vec![
            CssDeclaration::new(PropertyId::BackgroundImage, image.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(
                PropertyId::BackgroundPosition,
                position.unwrap_or(CssValue::Initial),
                important,
            ),
            CssDeclaration::new(PropertyId::BackgroundSize, size.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(PropertyId::BackgroundRepeat, repeat.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(
                PropertyId::BackgroundAttachment,
                attachment.unwrap_or(CssValue::Initial),
                important,
            ),
            CssDeclaration::new(PropertyId::BackgroundOrigin, origin.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(PropertyId::BackgroundClip, clip.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(PropertyId::BackgroundColor, color.unwrap_or(CssValue::Initial), important),
        ])
    }

    /// `font`: optional style/variant-caps/weight/stretch in any order
    /// (`normal` is a no-op), then a mandatory size, optional `/
    /// line-height`, mandatory family list. Every other font longhand
    /// resets.
    fn parse_font(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let mut style = None;
        let mut caps = None;
        let mut weight = None;
        let mut stretch = None;

        // up to four leading keywords in any order
        for _ in 0..4 {
            stream.consume_whitespace();
            if self.parse_ident_one_of(stream, &[ValueId::Normal]).is_some() {
                continue;
            }
            if style.is_none() {
                if let Some(value) = self.parse_font_style_keyword(stream) {
                    style = Some(value);
                    continue;
                }
            }
            if caps.is_none() {
                if let Some(value) = self.parse_ident_one_of(stream, &[ValueId::SmallCaps]) {
                    caps = Some(value);
                    continue;
                }
            }
            if weight.is_none() {
                if let Some(value) = self.parse_font_weight(stream) {
                    weight = Some(value);
                    continue;
                }
            }
            if stretch.is_none() {
                if let Some(value) = self.parse_font_stretch_keyword(stream) {
                    stretch = Some(value);
                    continue;
                }
            }
            break;
        }

        let size = self.parse_longhand(PropertyId::FontSize, stream)?;

        let mut line_height = None;
        if stream.peek(0).is_delim('/') {
            stream.consume_including_whitespace();
            line_height = Some(self.parse_longhand(PropertyId::LineHeight, stream)?);
        }

        let family = self.parse_font_family(stream)?;

        Some(vec![
            CssDeclaration::new(PropertyId::FontStyle, style.unwrap_or(CssValue::Ident(ValueId::Normal)), important),
            CssDeclaration::new(
                PropertyId::FontVariantCaps,
                caps.unwrap_or(CssValue::Ident(ValueId::Normal)),
                important,
            ),
            CssDeclaration::new(
                PropertyId::FontWeight,
                weight.unwrap_or(CssValue::Ident(ValueId::Normal)),
                important,
            ),
            CssDeclaration::new(
                PropertyId::FontStretch,
                stretch.unwrap_or(CssValue::Ident(ValueId::Normal)),
                important,
            ),
            CssDeclaration::new(PropertyId::FontSize, size, important),
            CssDeclaration::new(
                PropertyId::LineHeight,
                line_height.unwrap_or(CssValue::Ident(ValueId::Normal)),
                important,
            ),
            CssDeclaration::new(PropertyId::FontFamily, family, important),
            // the remaining variant longhands reset to normal
            CssDeclaration::new(PropertyId::FontVariantEastAsian, CssValue::Ident(ValueId::Normal), important),
            CssDeclaration::new(PropertyId::FontVariantLigatures, CssValue::Ident(ValueId::Normal), important),
            CssDeclaration::new(PropertyId::FontVariantNumeric, CssValue::Ident(ValueId::Normal), important),
            CssDeclaration::new(PropertyId::FontVariantPosition, CssValue::Ident(ValueId::Normal), important),
        ])
    }

    /// In the `font` shorthand only the keyword forms of style/stretch are
    /// allowed (no oblique angles, no percentages).
    fn parse_font_style_keyword(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        self.parse_ident_one_of(stream, &[ValueId::Italic, ValueId::Oblique])
    }

    fn parse_font_stretch_keyword(&mut self, stream: &mut TokenStream) -> Option<CssValue> {
        self.parse_ident_one_of(
            stream,
            &[
                ValueId::UltraCondensed,
                ValueId::ExtraCondensed,
                ValueId::Condensed,
                ValueId::SemiCondensed,
                ValueId::SemiExpanded,
                ValueId::Expanded,
                ValueId::ExtraExpanded,
                ValueId::UltraExpanded,
            ],
        )
    }

    fn parse_font_variant(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let caps = self.parse_ident_one_of(stream, &[ValueId::Normal, ValueId::None, ValueId::SmallCaps])?;
        Some(
            PropertyId::FontVariant
                .longhands()
                .iter()
                .map(|longhand| {
                    let value = if *longhand == PropertyId::FontVariantCaps {
                        caps.clone()
                    } else {
                        CssValue::Ident(ValueId::Normal)
                    };
                    CssDeclaration::new(*longhand, value, important)
                })
                .collect(),
        )
    }

    /// `flex`: `none` expands to `0 0 auto`; otherwise up to two numbers
    /// (grow, shrink) and a basis in any order. A unitless zero basis is
    /// only taken as a basis after both numbers are present.
    fn parse_flex(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        if self.parse_ident_one_of(stream, &[ValueId::None]).is_some() {
            return Some(vec![
                CssDeclaration::new(PropertyId::FlexGrow, CssValue::Number(0.0), important),
                CssDeclaration::new(PropertyId::FlexShrink, CssValue::Number(0.0), important),
                CssDeclaration::new(PropertyId::FlexBasis, CssValue::Ident(ValueId::Auto), important),
            ]);
        }

        let mut grow = None;
        let mut shrink = None;
        let mut basis = None;

        while !stream.at_end() {
            stream.consume_whitespace();

            // a plain number is grow, then shrink; a bare 0 becomes the
            // basis only once both numbers are taken
            if let TokenType::Number { value, .. } = stream.peek(0).token_type.clone() {
                if value >= 0.0 {
                    if grow.is_none() {
                        stream.consume_including_whitespace();
                        grow = Some(CssValue::Number(value));
                        continue;
                    }
                    if shrink.is_none() {
                        stream.consume_including_whitespace();
                        shrink = Some(CssValue::Number(value));
                        continue;
                    }
                    if value == 0.0 && basis.is_none() {
                        stream.consume_including_whitespace();
                        basis = Some(CssValue::Length(0.0, LengthUnit::Px));
                        continue;
                    }
                }
                return None;
            }

            if basis.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::FlexBasis, stream) {
                    basis = Some(value);
                    continue;
                }
            }
            break;
        }

        if grow.is_none() && basis.is_none() {
            return None;
        }

        Some(vec![
            CssDeclaration::new(PropertyId::FlexGrow, grow.unwrap_or(CssValue::Number(1.0)), important),
            CssDeclaration::new(PropertyId::FlexShrink, shrink.unwrap_or(CssValue::Number(1.0)), important),
            CssDeclaration::new(
                PropertyId::FlexBasis,
                basis.unwrap_or(CssValue::Percent(0.0)),
                important,
            ),
        ])
    }

    fn parse_flex_flow(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let mut direction = None;
        let mut wrap = None;

        while !stream.at_end() {
            if direction.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::FlexDirection, stream) {
                    direction = Some(value);
                    continue;
                }
            }
            if wrap.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::FlexWrap, stream) {
                    wrap = Some(value);
                    continue;
                }
            }
            break;
        }

        if direction.is_none() && wrap.is_none() {
            return None;
        }

        Some(vec![
            CssDeclaration::new(
                PropertyId::FlexDirection,
                direction.unwrap_or(CssValue::Ident(ValueId::Row)),
                important,
            ),
            CssDeclaration::new(
                PropertyId::FlexWrap,
                wrap.unwrap_or(CssValue::Ident(ValueId::Nowrap)),
                important,
            ),
        ])
    }

    /// `list-style`: type, position and image in any order. A lone `none`
    /// belongs to the type.
    fn parse_list_style(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let mut list_type = None;
        let mut position = None;
        let mut image = None;
        let mut none_seen = false;

        while !stream.at_end() {
            if self.parse_ident_one_of(stream, &[ValueId::None]).is_some() {
                if none_seen {
                    return None;
                }
                none_seen = true;
                continue;
            }
            if position.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::ListStylePosition, stream) {
                    position = Some(value);
                    continue;
                }
            }
            if image.is_none() {
                if let Some(value) = self.parse_url_value(stream) {
                    image = Some(CssValue::Image(value));
                    continue;
                }
            }
            if list_type.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::ListStyleType, stream) {
                    list_type = Some(value);
                    continue;
                }
            }
            break;
        }

        if none_seen && list_type.is_none() {
            list_type = Some(CssValue::Ident(ValueId::None));
        }

        if list_type.is_none() && position.is_none() && image.is_none() {
            return None;
        }

        Some(vec![
            CssDeclaration::new(PropertyId::ListStyleType, list_type.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(
                PropertyId::ListStylePosition,
                position.unwrap_or(CssValue::Initial),
                important,
            ),
            CssDeclaration::new(PropertyId::ListStyleImage, image.unwrap_or(CssValue::Initial), important),
        ])
    }

    fn parse_text_decoration(&mut self, stream: &mut TokenStream, important: bool) -> Option<Vec<CssDeclaration>> {
        let mut line = None;
        let mut style = None;
        let mut color = None;

        while !stream.at_end() {
            if line.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::TextDecorationLine, stream) {
                    line = Some(value);
                    continue;
                }
            }
            if style.is_none() {
                if let Some(value) = self.parse_longhand(PropertyId::TextDecorationStyle, stream) {
                    style = Some(value);
                    continue;
                }
            }
            if color.is_none() {
                if let Some(value) = self.parse_color_value(stream) {
                    color = Some(value);
                    continue;
                }
            }
            break;
        }

        if line.is_none() && style.is_none() && color.is_none() {
            return None;
        }

        Some(vec![
            CssDeclaration::new(PropertyId::TextDecorationLine, line.unwrap_or(CssValue::Initial), important),
            CssDeclaration::new(
                PropertyId::TextDecorationStyle,
                style.unwrap_or(CssValue::Initial),
                important,
            ),
            CssDeclaration::new(
                PropertyId::TextDecorationColor,
                color.unwrap_or(CssValue::Ident(ValueId::Currentcolor)),
                important,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::TokenStream;
    use crate::tokenizer::tokenize_str;

    fn expand(id: PropertyId, source: &str) -> Option<Vec<CssDeclaration>> {
        let tokens = tokenize_str(source);
        let mut stream = TokenStream::new(&tokens);
        let mut parser = CssParser::test_default();
        parser.parse_shorthand(id, &mut stream, false)
    }

    fn value_of(declarations: &[CssDeclaration], id: PropertyId) -> CssValue {
        declarations.iter().find(|d| d.id == id).unwrap().value.clone()
    }

    #[test]
    fn margin_fanout() {
        let one = expand(PropertyId::Margin, "4px").unwrap();
        assert_eq!(value_of(&one, PropertyId::MarginTop), value_of(&one, PropertyId::MarginLeft));

        let two = expand(PropertyId::Margin, "1px 2px").unwrap();
        assert_eq!(value_of(&two, PropertyId::MarginTop), CssValue::Length(1.0, LengthUnit::Px));
        assert_eq!(value_of(&two, PropertyId::MarginBottom), CssValue::Length(1.0, LengthUnit::Px));
        assert_eq!(value_of(&two, PropertyId::MarginRight), CssValue::Length(2.0, LengthUnit::Px));
        assert_eq!(value_of(&two, PropertyId::MarginLeft), CssValue::Length(2.0, LengthUnit::Px));

        let three = expand(PropertyId::Margin, "1px 2px 3px").unwrap();
        assert_eq!(value_of(&three, PropertyId::MarginBottom), CssValue::Length(3.0, LengthUnit::Px));
        assert_eq!(value_of(&three, PropertyId::MarginLeft), CssValue::Length(2.0, LengthUnit::Px));

        let four = expand(PropertyId::Margin, "1px 2px 3px 4px").unwrap();
        assert_eq!(value_of(&four, PropertyId::MarginLeft), CssValue::Length(4.0, LengthUnit::Px));
    }

    #[test]
    fn margin_accepts_auto() {
        let declarations = expand(PropertyId::Margin, "0 auto").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::MarginRight), CssValue::Ident(ValueId::Auto));
    }

    #[test]
    fn border_side_any_order() {
        let declarations = expand(PropertyId::BorderTop, "solid 2px red").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::BorderTopWidth), CssValue::Length(2.0, LengthUnit::Px));
        assert_eq!(value_of(&declarations, PropertyId::BorderTopStyle), CssValue::Ident(ValueId::Solid));
    }

    #[test]
    fn border_sets_all_sides() {
        let declarations = expand(PropertyId::Border, "1px solid").unwrap();
        assert_eq!(declarations.len(), 12);
        assert_eq!(value_of(&declarations, PropertyId::BorderLeftStyle), CssValue::Ident(ValueId::Solid));
        assert_eq!(
            value_of(&declarations, PropertyId::BorderBottomColor),
            CssValue::Ident(ValueId::Currentcolor)
        );
    }

    #[test]
    fn border_radius_mirrors() {
        let declarations = expand(PropertyId::BorderRadius, "1px 2px").unwrap();
        let tl = value_of(&declarations, PropertyId::BorderTopLeftRadius);
        let br = value_of(&declarations, PropertyId::BorderBottomRightRadius);
        assert_eq!(tl, br);
        let tr = value_of(&declarations, PropertyId::BorderTopRightRadius);
        let bl = value_of(&declarations, PropertyId::BorderBottomLeftRadius);
        assert_eq!(tr, bl);
        assert_ne!(tl, tr);
    }

    #[test]
    fn border_radius_with_vertical_run() {
        let declarations = expand(PropertyId::BorderRadius, "10px / 20px").unwrap();
        let CssValue::Pair(pair) = value_of(&declarations, PropertyId::BorderTopLeftRadius) else {
            panic!("expected a pair");
        };
        assert_eq!(pair.0, CssValue::Length(10.0, LengthUnit::Px));
        assert_eq!(pair.1, CssValue::Length(20.0, LengthUnit::Px));
    }

    #[test]
    fn font_requires_size_and_family() {
        assert!(expand(PropertyId::Font, "italic bold").is_none());

        let declarations = expand(PropertyId::Font, "italic bold 12px/1.5 serif").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::FontStyle), CssValue::Ident(ValueId::Italic));
        assert_eq!(value_of(&declarations, PropertyId::FontWeight), CssValue::Ident(ValueId::Bold));
        assert_eq!(value_of(&declarations, PropertyId::FontSize), CssValue::Length(12.0, LengthUnit::Px));
        assert_eq!(value_of(&declarations, PropertyId::LineHeight), CssValue::Number(1.5));
        // untouched variant longhands reset
        assert_eq!(
            value_of(&declarations, PropertyId::FontVariantLigatures),
            CssValue::Ident(ValueId::Normal)
        );
    }

    #[test]
    fn flex_none_is_0_0_auto() {
        let declarations = expand(PropertyId::Flex, "none").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::FlexGrow), CssValue::Number(0.0));
        assert_eq!(value_of(&declarations, PropertyId::FlexShrink), CssValue::Number(0.0));
        assert_eq!(value_of(&declarations, PropertyId::FlexBasis), CssValue::Ident(ValueId::Auto));
    }

    #[test]
    fn flex_zero_basis_needs_two_numbers() {
        // `flex: 1 1 0` takes the bare zero as the basis
        let declarations = expand(PropertyId::Flex, "1 1 0").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::FlexBasis), CssValue::Length(0.0, LengthUnit::Px));

        // a lone `flex: 1` leaves the basis at 0%
        let declarations = expand(PropertyId::Flex, "1").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::FlexBasis), CssValue::Percent(0.0));
    }

    #[test]
    fn background_origin_falls_through_to_clip() {
        let declarations = expand(PropertyId::Background, "url(bg.png) padding-box").unwrap();
        assert_eq!(
            value_of(&declarations, PropertyId::BackgroundOrigin),
            CssValue::Ident(ValueId::PaddingBox)
        );
        assert_eq!(
            value_of(&declarations, PropertyId::BackgroundClip),
            CssValue::Ident(ValueId::PaddingBox)
        );

        let declarations = expand(PropertyId::Background, "url(bg.png) padding-box content-box").unwrap();
        assert_eq!(
            value_of(&declarations, PropertyId::BackgroundClip),
            CssValue::Ident(ValueId::ContentBox)
        );
    }

    #[test]
    fn background_position_size_pair() {
        let declarations = expand(PropertyId::Background, "red center / cover").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::BackgroundSize), CssValue::Ident(ValueId::Cover));
    }

    #[test]
    fn list_style_none_goes_to_type() {
        let declarations = expand(PropertyId::ListStyle, "none inside").unwrap();
        assert_eq!(value_of(&declarations, PropertyId::ListStyleType), CssValue::Ident(ValueId::None));
        assert_eq!(
            value_of(&declarations, PropertyId::ListStylePosition),
            CssValue::Ident(ValueId::Inside)
        );
    }

    #[test]
    fn failed_shorthand_commits_nothing() {
        assert!(expand(PropertyId::Margin, "4px bogus").is_none());
        assert!(expand(PropertyId::Border, "2px solid red extra").is_none());
    }

    #[test]
    fn border_spacing_one_or_two() {
        let declarations = expand(PropertyId::BorderSpacing, "2px").unwrap();
        assert_eq!(
            value_of(&declarations, PropertyId::BorderHorizontalSpacing),
            value_of(&declarations, PropertyId::BorderVerticalSpacing)
        );
    }
}
