use pluto_interface::fetcher::ResourceFetcher;
use std::collections::HashMap;

/// Font formats the engine can hand to the rasterizer. A `format()` hint
/// outside this set makes the source a no-op.
const SUPPORTED_FORMATS: &[&str] = &["truetype", "opentype", "woff", "woff2"];

/// A single `src` component of an `@font-face`.
#[derive(Clone, Debug, PartialEq)]
pub enum FontSource {
    /// `local(name)`: matches any locally available face with that name
    Local(String),
    /// `url(...)` with an optional `format(...)` hint
    Url { href: String, format: Option<String> },
}

impl FontSource {
    pub fn is_supported(&self) -> bool {
        match self {
            FontSource::Local(_) => true,
            FontSource::Url { format, .. } => format
                .as_ref()
                .map(|f| SUPPORTED_FORMATS.contains(&f.to_ascii_lowercase().as_str()))
                .unwrap_or(true),
        }
    }
}

/// Slope descriptor: normal, italic, or oblique with an angle range in
/// degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontSlope {
    Normal,
    Italic,
    Oblique(f32, f32),
}

impl FontSlope {
    /// Numeric slope range used by selection: normal = 0, italic = 14deg.
    fn range(self) -> (f32, f32) {
        match self {
            FontSlope::Normal => (0.0, 0.0),
            FontSlope::Italic => (14.0, 14.0),
            FontSlope::Oblique(lo, hi) => (lo, hi),
        }
    }
}

/// A parsed `@font-face` rule.
#[derive(Clone, Debug, PartialEq)]
pub struct FontFaceRule {
    pub family: Option<String>,
    pub sources: Vec<FontSource>,
    /// Weight range; single values parse as `[v, v]`
    pub weight: Option<(f32, f32)>,
    /// Stretch range in percent
    pub stretch: Option<(f32, f32)>,
    pub slope: Option<FontSlope>,
    pub unicode_ranges: Vec<(u32, u32)>,
}

impl Default for FontFaceRule {
    fn default() -> Self {
        Self {
            family: None,
            sources: Vec::new(),
            weight: None,
            stretch: None,
            slope: None,
            unicode_ranges: Vec::new(),
        }
    }
}

/// Ranges for weight, stretch and slope a face covers. Requests carry single
/// values; candidates carry these ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSelectionDescription {
    pub weight: (f32, f32),
    pub stretch: (f32, f32),
    pub slope: (f32, f32),
}

impl FontSelectionDescription {
    fn from_rule(rule: &FontFaceRule) -> Self {
        Self {
            weight: rule.weight.unwrap_or((400.0, 400.0)),
            stretch: rule.stretch.unwrap_or((100.0, 100.0)),
            slope: rule.slope.unwrap_or(FontSlope::Normal).range(),
        }
    }

    /// Distance between this description and a request; 0 when every axis
    /// is within range, smaller is better.
    pub fn distance(&self, request: &FontSelectionRequest) -> f32 {
        weight_distance(self.weight, request.weight)
            + axis_distance(self.stretch, request.stretch)
            + axis_distance(self.slope, request.slope)
    }
}

/// A concrete selection request (single values per axis).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSelectionRequest {
    pub weight: f32,
    pub stretch: f32,
    pub slope: f32,
}

impl Default for FontSelectionRequest {
    fn default() -> Self {
        Self {
            weight: 400.0,
            stretch: 100.0,
            slope: 0.0,
        }
    }
}

/// Penalty added to the disfavored direction so it only wins when nothing on
/// the preferred side exists.
const DIRECTION_BIAS: f32 = 1000.0;

/// Weight distance per the CSS font matching rules: requests at or under 400
/// prefer lower weights, requests over 500 prefer higher weights, and the
/// 400..500 band prefers nearby weights on either side.
fn weight_distance(range: (f32, f32), request: f32) -> f32 {
    let (lo, hi) = range;
    if request >= lo && request <= hi {
        return 0.0;
    }

    if request <= 400.0 {
        if hi < request {
            request - hi
        } else {
            (lo - request) + DIRECTION_BIAS
        }
    } else if request > 500.0 {
        if lo > request {
            lo - request
        } else {
            (request - hi) + DIRECTION_BIAS
        }
    } else if lo > request {
        (lo - request).min(DIRECTION_BIAS - 1.0)
    } else {
        request - hi
    }
}

/// Symmetric small distance for stretch and slope.
fn axis_distance(range: (f32, f32), request: f32) -> f32 {
    let (lo, hi) = range;
    if request >= lo && request <= hi {
        0.0
    } else if request < lo {
        lo - request
    } else {
        request - hi
    }
}

/// Maps a `font-stretch` keyword to its percentage.
pub fn stretch_keyword_percent(id: crate::values::ValueId) -> f32 {
    use crate::values::ValueId;
    match id {
        ValueId::UltraCondensed => 50.0,
        ValueId::ExtraCondensed => 62.5,
        ValueId::Condensed => 75.0,
        ValueId::SemiCondensed => 87.5,
        ValueId::SemiExpanded => 112.5,
        ValueId::Expanded => 125.0,
        ValueId::ExtraExpanded => 150.0,
        ValueId::UltraExpanded => 200.0,
        _ => 100.0,
    }
}

/// The cascade's fully materialized font request: what the element wants,
/// before face selection.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDescription {
    pub families: Vec<String>,
    /// Size in px
    pub size: f32,
    pub weight: f32,
    /// Stretch in percent
    pub stretch: f32,
    /// Slope in degrees (0 = normal, 14 = italic)
    pub slope: f32,
    /// `font-variation-settings`: 4-char tag plus value
    pub variations: Vec<(String, f32)>,
}

impl Default for FontDescription {
    fn default() -> Self {
        Self {
            families: Vec::new(),
            size: 16.0,
            weight: 400.0,
            stretch: 100.0,
            slope: 0.0,
            variations: Vec::new(),
        }
    }
}

impl FontDescription {
    pub fn selection_request(&self) -> FontSelectionRequest {
        FontSelectionRequest {
            weight: self.weight,
            stretch: self.stretch,
            slope: self.slope,
        }
    }
}

/// A concrete font handle. Metric queries come from the rasterizer; until a
/// face is loaded they fall back to size-derived defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Font {
    pub description: FontDescription,
    /// Measured x-height in px, when the rasterizer provided one
    pub x_height: Option<f32>,
    /// Measured advance of `0` in px, when known
    pub zero_width: Option<f32>,
}

impl Font {
    pub fn new(description: FontDescription) -> Self {
        Self {
            description,
            x_height: None,
            zero_width: None,
        }
    }

    pub fn size(&self) -> f32 {
        self.description.size
    }

    /// `ex` unit basis: measured x-height or half the size.
    pub fn ex_unit(&self) -> f32 {
        self.x_height.unwrap_or(self.description.size / 2.0)
    }

    /// `ch` unit basis: measured zero advance or half the size.
    pub fn ch_unit(&self) -> f32 {
        self.zero_width.unwrap_or(self.description.size / 2.0)
    }
}

/// Raw bytes of a fetched font source; decoding is the rasterizer's problem.
#[derive(Clone, Debug, PartialEq)]
pub struct FontResource {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// One face inside a segmented set: its sources and the code point ranges it
/// covers (empty = everything).
#[derive(Clone, Debug, PartialEq)]
pub struct FontFace {
    pub sources: Vec<FontSource>,
    pub unicode_ranges: UnicodeRangeList,
    /// Loaded url resources, in source order; populated by `load_sources`
    pub resources: Vec<FontResource>,
}

impl FontFace {
    /// Fetches every supported `url()` source. Fetch failures are silently
    /// skipped; `local()` sources are left to the platform font lookup.
    pub fn load_sources(&mut self, fetcher: &dyn ResourceFetcher) {
        for source in &self.sources {
            if !source.is_supported() {
                continue;
            }
            if let FontSource::Url { href, .. } = source {
                let data = fetcher.fetch_url(href);
                if data.is_failure() || data.bytes.is_empty() {
                    continue;
                }
                self.resources.push(FontResource {
                    data: data.bytes,
                    mime_type: data.mime_type,
                });
            }
        }
    }
}

/// A list of inclusive code point ranges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnicodeRangeList {
    pub ranges: Vec<(u32, u32)>,
}

impl UnicodeRangeList {
    pub fn new(ranges: Vec<(u32, u32)>) -> Self {
        // from > to is invalid and dropped
        Self {
            ranges: ranges.into_iter().filter(|(from, to)| from <= to).collect(),
        }
    }

    /// Empty lists cover every code point.
    pub fn contains(&self, code_point: u32) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|(from, to)| (*from..=*to).contains(&code_point))
    }
}

/// Faces sharing one selection description, segmented by unicode range. The
/// renderer queries per code point which face applies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentedFontFace {
    pub faces: Vec<FontFace>,
}

impl SegmentedFontFace {
    pub fn face_for(&self, code_point: u32) -> Option<&FontFace> {
        self.faces.iter().find(|face| face.unicode_ranges.contains(code_point))
    }
}

/// All `@font-face` rules of a document keyed by family name.
#[derive(Debug, Default)]
pub struct FontFaceCache {
    families: HashMap<String, Vec<(FontSelectionDescription, SegmentedFontFace)>>,
}

impl FontFaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn add_rule(&mut self, rule: &FontFaceRule) {
        let Some(family) = &rule.family else {
            return;
        };
        if rule.sources.is_empty() {
            return;
        }

        let description = FontSelectionDescription::from_rule(rule);
        let face = FontFace {
            sources: rule.sources.clone(),
            unicode_ranges: UnicodeRangeList::new(rule.unicode_ranges.clone()),
            resources: Vec::new(),
        };

        let entry = self.families.entry(family.to_ascii_lowercase()).or_default();
        if let Some((_, segmented)) = entry.iter_mut().find(|(desc, _)| *desc == description) {
            segmented.faces.push(face);
        } else {
            let mut segmented = SegmentedFontFace::default();
            segmented.faces.push(face);
            entry.push((description, segmented));
        }
    }

    /// Picks the face set with the minimal distance to the request; `None`
    /// when the family has no `@font-face` rules at all.
    pub fn select(&self, family: &str, request: &FontSelectionRequest) -> Option<&SegmentedFontFace> {
        let candidates = self.families.get(&family.to_ascii_lowercase())?;

        candidates
            .iter()
            .map(|(description, segmented)| (description.distance(request), segmented))
            .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, segmented)| segmented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(family: &str, weight: (f32, f32)) -> FontFaceRule {
        FontFaceRule {
            family: Some(family.to_string()),
            sources: vec![FontSource::Local(family.to_string())],
            weight: Some(weight),
            ..Default::default()
        }
    }

    #[test]
    fn in_range_request_scores_zero() {
        let description = FontSelectionDescription {
            weight: (300.0, 500.0),
            stretch: (100.0, 100.0),
            slope: (0.0, 0.0),
        };
        let request = FontSelectionRequest {
            weight: 400.0,
            ..Default::default()
        };
        assert_eq!(description.distance(&request), 0.0);
    }

    #[test]
    fn light_request_prefers_lighter_faces() {
        // requesting 300: a 200 face must beat a 400 face
        assert!(weight_distance((200.0, 200.0), 300.0) < weight_distance((400.0, 400.0), 300.0));
    }

    #[test]
    fn heavy_request_prefers_heavier_faces() {
        // requesting 700: an 800 face must beat a 600 face
        assert!(weight_distance((800.0, 800.0), 700.0) < weight_distance((600.0, 600.0), 700.0));
    }

    #[test]
    fn selection_picks_minimum_distance() {
        let mut cache = FontFaceCache::new();
        cache.add_rule(&rule("Body", (300.0, 300.0)));
        cache.add_rule(&rule("Body", (700.0, 700.0)));

        let request = FontSelectionRequest {
            weight: 650.0,
            ..Default::default()
        };
        let selected = cache.select("body", &request).unwrap();
        assert_eq!(
            selected.faces[0].sources,
            vec![FontSource::Local("Body".to_string())]
        );
        // 650 > 500 prefers the heavier face
        let light = FontSelectionDescription {
            weight: (300.0, 300.0),
            stretch: (100.0, 100.0),
            slope: (0.0, 0.0),
        };
        let heavy = FontSelectionDescription {
            weight: (700.0, 700.0),
            stretch: (100.0, 100.0),
            slope: (0.0, 0.0),
        };
        assert!(heavy.distance(&request) < light.distance(&request));
    }

    #[test]
    fn family_lookup_is_case_insensitive() {
        let mut cache = FontFaceCache::new();
        cache.add_rule(&rule("Emphasis", (400.0, 400.0)));
        assert!(cache.select("emphasis", &FontSelectionRequest::default()).is_some());
        assert!(cache.select("other", &FontSelectionRequest::default()).is_none());
    }

    #[test]
    fn unicode_range_segmentation() {
        let list = UnicodeRangeList::new(vec![(0x41, 0x5A)]);
        assert!(list.contains(0x41));
        assert!(!list.contains(0x61));
        // empty list covers everything
        assert!(UnicodeRangeList::default().contains(0x10FFFF));
    }

    #[test]
    fn invalid_ranges_are_dropped() {
        let list = UnicodeRangeList::new(vec![(0x60, 0x41)]);
        assert!(list.ranges.is_empty());
    }

    #[test]
    fn unsupported_format_is_skipped() {
        let source = FontSource::Url {
            href: "font.svg".to_string(),
            format: Some("svg".to_string()),
        };
        assert!(!source.is_supported());

        let source = FontSource::Url {
            href: "font.woff2".to_string(),
            format: Some("woff2".to_string()),
        };
        assert!(source.is_supported());
    }
}
