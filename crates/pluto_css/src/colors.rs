use colors_transform::{Color, Hsl};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::Debug;

/// A named CSS color and its packed `0xRRGGBB` value.
pub struct CssColorEntry {
    pub name: &'static str,
    pub value: u32,
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0 = transparent, 255 = solid
    pub a: u8,
}

impl RgbaColor {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        RgbaColor { r, g, b, a }
    }

    #[must_use]
    pub fn transparent() -> Self {
        RgbaColor::new(0, 0, 0, 0)
    }

    fn from_packed_rgb(value: u32) -> Self {
        RgbaColor::new(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
            255,
        )
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        // Solid black
        RgbaColor::new(0, 0, 0, 255)
    }
}

/// Looks up a CSS named color (including `transparent`), ASCII
/// case-insensitively.
pub fn named_color(name: &str) -> Option<RgbaColor> {
    if name.eq_ignore_ascii_case("transparent") {
        return Some(RgbaColor::transparent());
    }

    let lower = name.to_ascii_lowercase();
    CSS_COLORNAMES.get(lower.as_str()).map(|v| RgbaColor::from_packed_rgb(*v))
}

/// Parses the value of a hash token as `#rgb`, `#rgba`, `#rrggbb` or
/// `#rrggbbaa` (the leading `#` is not part of the input).
pub fn parse_hash_color(value: &str) -> Option<RgbaColor> {
    if !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&value[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&value[i..i + 2], 16).ok();

    match value.len() {
        3 => Some(RgbaColor::new(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            255,
        )),
        4 => Some(RgbaColor::new(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            nibble(3)? * 17,
        )),
        6 => Some(RgbaColor::new(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(RgbaColor::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// Converts HSL components (hue in degrees, s/l as 0..=100 percentages) plus
/// an alpha in 0.0..=1.0 to RGBA.
pub fn from_hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> RgbaColor {
    let hue = normalize_hue(hue);
    let hsl = Hsl::from(hue, saturation.clamp(0.0, 100.0), lightness.clamp(0.0, 100.0));
    let rgb = hsl.to_rgb();

    RgbaColor::new(
        rgb.get_red().round() as u8,
        rgb.get_green().round() as u8,
        rgb.get_blue().round() as u8,
        clamp_alpha(alpha),
    )
}

/// Converts HWB components (hue in degrees, whiteness/blackness as 0..=100
/// percentages) plus an alpha in 0.0..=1.0 to RGBA.
pub fn from_hwb(hue: f32, whiteness: f32, blackness: f32, alpha: f32) -> RgbaColor {
    let w = whiteness.clamp(0.0, 100.0) / 100.0;
    let b = blackness.clamp(0.0, 100.0) / 100.0;

    // w + b >= 1 is an achromatic gray
    if w + b >= 1.0 {
        let gray = (w / (w + b) * 255.0).round() as u8;
        return RgbaColor::new(gray, gray, gray, clamp_alpha(alpha));
    }

    let pure = from_hsl(hue, 100.0, 50.0, 1.0);
    let mix = |c: u8| (((f32::from(c) / 255.0) * (1.0 - w - b) + w) * 255.0).round() as u8;

    RgbaColor::new(mix(pure.r), mix(pure.g), mix(pure.b), clamp_alpha(alpha))
}

/// Reduces a hue to `[0, 360)` degrees.
pub fn normalize_hue(hue: f32) -> f32 {
    let hue = hue % 360.0;
    if hue < 0.0 {
        hue + 360.0
    } else {
        hue
    }
}

fn clamp_alpha(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

// Values taken from CSS Color Module Level 4, §6.1 named colors.
const NAMED: &[CssColorEntry] = &[
    CssColorEntry { name: "aliceblue", value: 0xf0f8ff },
    CssColorEntry { name: "antiquewhite", value: 0xfaebd7 },
    CssColorEntry { name: "aqua", value: 0x00ffff },
    CssColorEntry { name: "aquamarine", value: 0x7fffd4 },
    CssColorEntry { name: "azure", value: 0xf0ffff },
    CssColorEntry { name: "beige", value: 0xf5f5dc },
    CssColorEntry { name: "bisque", value: 0xffe4c4 },
    CssColorEntry { name: "black", value: 0x000000 },
    CssColorEntry { name: "blanchedalmond", value: 0xffebcd },
    CssColorEntry { name: "blue", value: 0x0000ff },
    CssColorEntry { name: "blueviolet", value: 0x8a2be2 },
    CssColorEntry { name: "brown", value: 0xa52a2a },
    CssColorEntry { name: "burlywood", value: 0xdeb887 },
    CssColorEntry { name: "cadetblue", value: 0x5f9ea0 },
    CssColorEntry { name: "chartreuse", value: 0x7fff00 },
    CssColorEntry { name: "chocolate", value: 0xd2691e },
    CssColorEntry { name: "coral", value: 0xff7f50 },
    CssColorEntry { name: "cornflowerblue", value: 0x6495ed },
    CssColorEntry { name: "cornsilk", value: 0xfff8dc },
    CssColorEntry { name: "crimson", value: 0xdc143c },
    CssColorEntry { name: "cyan", value: 0x00ffff },
    CssColorEntry { name: "darkblue", value: 0x00008b },
    CssColorEntry { name: "darkcyan", value: 0x008b8b },
    CssColorEntry { name: "darkgoldenrod", value: 0xb8860b },
    CssColorEntry { name: "darkgray", value: 0xa9a9a9 },
    CssColorEntry { name: "darkgreen", value: 0x006400 },
    CssColorEntry { name: "darkgrey", value: 0xa9a9a9 },
    CssColorEntry { name: "darkkhaki", value: 0xbdb76b },
    CssColorEntry { name: "darkmagenta", value: 0x8b008b },
    CssColorEntry { name: "darkolivegreen", value: 0x556b2f },
    CssColorEntry { name: "darkorange", value: 0xff8c00 },
    CssColorEntry { name: "darkorchid", value: 0x9932cc },
    CssColorEntry { name: "darkred", value: 0x8b0000 },
    CssColorEntry { name: "darksalmon", value: 0xe9967a },
    CssColorEntry { name: "darkseagreen", value: 0x8fbc8f },
    CssColorEntry { name: "darkslateblue", value: 0x483d8b },
    CssColorEntry { name: "darkslategray", value: 0x2f4f4f },
    CssColorEntry { name: "darkslategrey", value: 0x2f4f4f },
    CssColorEntry { name: "darkturquoise", value: 0x00ced1 },
    CssColorEntry { name: "darkviolet", value: 0x9400d3 },
    CssColorEntry { name: "deeppink", value: 0xff1493 },
    CssColorEntry { name: "deepskyblue", value: 0x00bfff },
    CssColorEntry { name: "dimgray", value: 0x696969 },
    CssColorEntry { name: "dimgrey", value: 0x696969 },
    CssColorEntry { name: "dodgerblue", value: 0x1e90ff },
    CssColorEntry { name: "firebrick", value: 0xb22222 },
    CssColorEntry { name: "floralwhite", value: 0xfffaf0 },
    CssColorEntry { name: "forestgreen", value: 0x228b22 },
    CssColorEntry { name: "fuchsia", value: 0xff00ff },
    CssColorEntry { name: "gainsboro", value: 0xdcdcdc },
    CssColorEntry { name: "ghostwhite", value: 0xf8f8ff },
    CssColorEntry { name: "gold", value: 0xffd700 },
    CssColorEntry { name: "goldenrod", value: 0xdaa520 },
    CssColorEntry { name: "gray", value: 0x808080 },
    CssColorEntry { name: "green", value: 0x008000 },
    CssColorEntry { name: "greenyellow", value: 0xadff2f },
    CssColorEntry { name: "grey", value: 0x808080 },
    CssColorEntry { name: "honeydew", value: 0xf0fff0 },
    CssColorEntry { name: "hotpink", value: 0xff69b4 },
    CssColorEntry { name: "indianred", value: 0xcd5c5c },
    CssColorEntry { name: "indigo", value: 0x4b0082 },
    CssColorEntry { name: "ivory", value: 0xfffff0 },
    CssColorEntry { name: "khaki", value: 0xf0e68c },
    CssColorEntry { name: "lavender", value: 0xe6e6fa },
    CssColorEntry { name: "lavenderblush", value: 0xfff0f5 },
    CssColorEntry { name: "lawngreen", value: 0x7cfc00 },
    CssColorEntry { name: "lemonchiffon", value: 0xfffacd },
    CssColorEntry { name: "lightblue", value: 0xadd8e6 },
    CssColorEntry { name: "lightcoral", value: 0xf08080 },
    CssColorEntry { name: "lightcyan", value: 0xe0ffff },
    CssColorEntry { name: "lightgoldenrodyellow", value: 0xfafad2 },
    CssColorEntry { name: "lightgray", value: 0xd3d3d3 },
    CssColorEntry { name: "lightgreen", value: 0x90ee90 },
    CssColorEntry { name: "lightgrey", value: 0xd3d3d3 },
    CssColorEntry { name: "lightpink", value: 0xffb6c1 },
    CssColorEntry { name: "lightsalmon", value: 0xffa07a },
    CssColorEntry { name: "lightseagreen", value: 0x20b2aa },
    CssColorEntry { name: "lightskyblue", value: 0x87cefa },
    CssColorEntry { name: "lightslategray", value: 0x778899 },
    CssColorEntry { name: "lightslategrey", value: 0x778899 },
    CssColorEntry { name: "lightsteelblue", value: 0xb0c4de },
    CssColorEntry { name: "lightyellow", value: 0xffffe0 },
    CssColorEntry { name: "lime", value: 0x00ff00 },
    CssColorEntry { name: "limegreen", value: 0x32cd32 },
    CssColorEntry { name: "linen", value: 0xfaf0e6 },
    CssColorEntry { name: "magenta", value: 0xff00ff },
    CssColorEntry { name: "maroon", value: 0x800000 },
    CssColorEntry { name: "mediumaquamarine", value: 0x66cdaa },
    CssColorEntry { name: "mediumblue", value: 0x0000cd },
    CssColorEntry { name: "mediumorchid", value: 0xba55d3 },
    CssColorEntry { name: "mediumpurple", value: 0x9370db },
    CssColorEntry { name: "mediumseagreen", value: 0x3cb371 },
    CssColorEntry { name: "mediumslateblue", value: 0x7b68ee },
    CssColorEntry { name: "mediumspringgreen", value: 0x00fa9a },
    CssColorEntry { name: "mediumturquoise", value: 0x48d1cc },
    CssColorEntry { name: "mediumvioletred", value: 0xc71585 },
    CssColorEntry { name: "midnightblue", value: 0x191970 },
    CssColorEntry { name: "mintcream", value: 0xf5fffa },
    CssColorEntry { name: "mistyrose", value: 0xffe4e1 },
    CssColorEntry { name: "moccasin", value: 0xffe4b5 },
    CssColorEntry { name: "navajowhite", value: 0xffdead },
    CssColorEntry { name: "navy", value: 0x000080 },
    CssColorEntry { name: "oldlace", value: 0xfdf5e6 },
    CssColorEntry { name: "olive", value: 0x808000 },
    CssColorEntry { name: "olivedrab", value: 0x6b8e23 },
    CssColorEntry { name: "orange", value: 0xffa500 },
    CssColorEntry { name: "orangered", value: 0xff4500 },
    CssColorEntry { name: "orchid", value: 0xda70d6 },
    CssColorEntry { name: "palegoldenrod", value: 0xeee8aa },
    CssColorEntry { name: "palegreen", value: 0x98fb98 },
    CssColorEntry { name: "paleturquoise", value: 0xafeeee },
    CssColorEntry { name: "palevioletred", value: 0xdb7093 },
    CssColorEntry { name: "papayawhip", value: 0xffefd5 },
    CssColorEntry { name: "peachpuff", value: 0xffdab9 },
    CssColorEntry { name: "peru", value: 0xcd853f },
    CssColorEntry { name: "pink", value: 0xffc0cb },
    CssColorEntry { name: "plum", value: 0xdda0dd },
    CssColorEntry { name: "powderblue", value: 0xb0e0e6 },
    CssColorEntry { name: "purple", value: 0x800080 },
    CssColorEntry { name: "rebeccapurple", value: 0x663399 },
    CssColorEntry { name: "red", value: 0xff0000 },
    CssColorEntry { name: "rosybrown", value: 0xbc8f8f },
    CssColorEntry { name: "royalblue", value: 0x4169e1 },
    CssColorEntry { name: "saddlebrown", value: 0x8b4513 },
    CssColorEntry { name: "salmon", value: 0xfa8072 },
    CssColorEntry { name: "sandybrown", value: 0xf4a460 },
    CssColorEntry { name: "seagreen", value: 0x2e8b57 },
    CssColorEntry { name: "seashell", value: 0xfff5ee },
    CssColorEntry { name: "sienna", value: 0xa0522d },
    CssColorEntry { name: "silver", value: 0xc0c0c0 },
    CssColorEntry { name: "skyblue", value: 0x87ceeb },
    CssColorEntry { name: "slateblue", value: 0x6a5acd },
    CssColorEntry { name: "slategray", value: 0x708090 },
    CssColorEntry { name: "slategrey", value: 0x708090 },
    CssColorEntry { name: "snow", value: 0xfffafa },
    CssColorEntry { name: "springgreen", value: 0x00ff7f },
    CssColorEntry { name: "steelblue", value: 0x4682b4 },
    CssColorEntry { name: "tan", value: 0xd2b48c },
    CssColorEntry { name: "teal", value: 0x008080 },
    CssColorEntry { name: "thistle", value: 0xd8bfd8 },
    CssColorEntry { name: "tomato", value: 0xff6347 },
    CssColorEntry { name: "turquoise", value: 0x40e0d0 },
    CssColorEntry { name: "violet", value: 0xee82ee },
    CssColorEntry { name: "wheat", value: 0xf5deb3 },
    CssColorEntry { name: "white", value: 0xffffff },
    CssColorEntry { name: "whitesmoke", value: 0xf5f5f5 },
    CssColorEntry { name: "yellow", value: 0xffff00 },
    CssColorEntry { name: "yellowgreen", value: 0x9acd32 },
];

lazy_static! {
    static ref CSS_COLORNAMES: HashMap<&'static str, u32> =
        NAMED.iter().map(|e| (e.name, e.value)).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_lookup() {
        assert_eq!(named_color("red"), Some(RgbaColor::new(255, 0, 0, 255)));
        assert_eq!(named_color("RebeccaPurple"), Some(RgbaColor::new(0x66, 0x33, 0x99, 255)));
        assert_eq!(named_color("transparent"), Some(RgbaColor::transparent()));
        assert_eq!(named_color("notacolor"), None);
    }

    #[test]
    fn hash_forms() {
        assert_eq!(parse_hash_color("f00"), Some(RgbaColor::new(255, 0, 0, 255)));
        assert_eq!(parse_hash_color("f008"), Some(RgbaColor::new(255, 0, 0, 0x88)));
        assert_eq!(parse_hash_color("ff0000"), Some(RgbaColor::new(255, 0, 0, 255)));
        assert_eq!(parse_hash_color("ff000080"), Some(RgbaColor::new(255, 0, 0, 0x80)));
        assert_eq!(parse_hash_color("ff00"), Some(RgbaColor::new(255, 255, 0, 0)));
        assert_eq!(parse_hash_color("xyz"), None);
        assert_eq!(parse_hash_color("ff000"), None);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(from_hsl(0.0, 100.0, 50.0, 1.0), RgbaColor::new(255, 0, 0, 255));
        assert_eq!(from_hsl(120.0, 100.0, 50.0, 1.0), RgbaColor::new(0, 255, 0, 255));
        assert_eq!(from_hsl(240.0, 100.0, 50.0, 1.0), RgbaColor::new(0, 0, 255, 255));
    }

    #[test]
    fn hue_normalization() {
        assert_eq!(normalize_hue(540.0), 180.0);
        assert_eq!(normalize_hue(-90.0), 270.0);
        assert_eq!(from_hsl(360.0, 100.0, 50.0, 1.0), from_hsl(0.0, 100.0, 50.0, 1.0));
    }

    #[test]
    fn hwb_extremes() {
        // full whiteness is white, full blackness is black
        assert_eq!(from_hwb(0.0, 100.0, 0.0, 1.0), RgbaColor::new(255, 255, 255, 255));
        assert_eq!(from_hwb(0.0, 0.0, 100.0, 1.0), RgbaColor::new(0, 0, 0, 255));
        // no white or black keeps the pure hue
        assert_eq!(from_hwb(0.0, 0.0, 0.0, 1.0), RgbaColor::new(255, 0, 0, 255));
    }

    #[test]
    fn alpha_rounding() {
        // 50% alpha rounds to 128
        assert_eq!(from_hsl(0.0, 100.0, 50.0, 0.5).a, 128);
    }
}
