use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use itertools::Itertools;
use pluto_interface::css::CssOrigin;
use pluto_interface::document::{Document, Element};

use crate::computed::{BoxStyle, Display, FloatMode, PositionMode};
use crate::counter_style::{CounterStyleMap, CounterStyleRule};
use crate::font_face::{stretch_keyword_percent, Font, FontDescription, FontFaceCache};
use crate::matcher::page::{match_page_selector, page_specificity, PageContext};
use crate::matcher::selector::match_selector;
use crate::parser::{reparse_property_value, CssParser};
use crate::properties::PropertyId;
use crate::stylesheet::{
    CssDeclaration, CssRule, CssStylesheet, PageMarginType, PageRule, PseudoType, RuleData, StyleIndex,
};
use crate::values::{CalcUnit, CssValue, LengthUnit, ValueId, VariableData};

/// Document viewport in px; the default is an A4 page at 96 dpi.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 794.0,
            height: 1123.0,
        }
    }
}

/// All style inputs of one document: the indexed rules, the font face
/// cache, the counter style map and the page rules. Stylesheets are added
/// in cascade order (user agent first, authors after).
#[derive(Debug, Default)]
pub struct StyleEngine {
    index: StyleIndex,
    font_faces: FontFaceCache,
    counter_rules: Vec<CounterStyleRule>,
    counter_styles: CounterStyleMap,
    page_rules: Vec<(Arc<PageRule>, u32, CssOrigin)>,
    pub viewport: Viewport,
}

impl StyleEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            counter_styles: CounterStyleMap::new(Some(crate::user_agent_counter_styles())),
            ..Default::default()
        }
    }

    /// A fresh engine with the built-in user agent stylesheet applied.
    pub fn with_defaults<D: Document>(viewport: Viewport, document: &D) -> Self {
        let mut engine = Self::new(viewport);
        engine.add_stylesheet(crate::user_agent_stylesheet(), document);
        engine
    }

    /// Indexes one parsed stylesheet. Media-gated rules (`@media`,
    /// `@import`) are evaluated once, here, against the document.
    pub fn add_stylesheet<D: Document>(&mut self, sheet: &CssStylesheet, document: &D) {
        self.add_rules(&sheet.rules, sheet.origin, document);
        self.counter_styles =
            CounterStyleMap::build(self.counter_rules.clone(), Some(crate::user_agent_counter_styles()));
    }

    fn add_rules<D: Document>(&mut self, rules: &[CssRule], origin: CssOrigin, document: &D) {
        for rule in rules {
            match rule {
                CssRule::Style(style_rule) => self.index.add_style_rule(style_rule, origin),
                CssRule::Media(media) => {
                    if document.supports_media_queries(&media.queries) {
                        self.add_rules(&media.rules, origin, document);
                    }
                }
                CssRule::Import(import) => {
                    if document.supports_media_queries(&import.queries) {
                        self.add_rules(&import.rules, origin, document);
                    }
                }
                CssRule::FontFace(font_face) => self.font_faces.add_rule(font_face),
                CssRule::CounterStyle(counter_style) => self.counter_rules.push(counter_style.clone()),
                CssRule::Page(page) => {
                    let position = self.index.next_position();
                    self.page_rules.push((Arc::clone(page), position, origin));
                }
                CssRule::Namespace(_) => {}
            }
        }
    }

    pub fn font_faces(&self) -> &FontFaceCache {
        &self.font_faces
    }

    pub fn counter_styles(&self) -> &CounterStyleMap {
        &self.counter_styles
    }

    /// Page rules matching a page, in cascade order (specificity, then
    /// position).
    pub fn matching_page_rules(&self, page: &PageContext) -> Vec<Arc<PageRule>> {
        self.page_rules
            .iter()
            .filter_map(|(rule, position, _)| {
                // a page rule without selectors matches every page
                let specificity = if rule.selectors.is_empty() {
                    Some(0)
                } else {
                    rule.selectors
                        .iter()
                        .filter(|selector| match_page_selector(selector, page))
                        .map(page_specificity)
                        .max()
                };
                specificity.map(|specificity| (specificity, *position, Arc::clone(rule)))
            })
            .sorted_by_key(|(specificity, position, _)| (*specificity, *position))
            .map(|(_, _, rule)| rule)
            .collect()
    }

    /// The cascaded style of a page box.
    pub fn page_style(&self, page: &PageContext) -> BoxStyle {
        let mut records: HashMap<RecordKey, PropertyRecord> = HashMap::new();

        for (rule, position, origin) in &self.page_rules {
            let best = if rule.selectors.is_empty() {
                Some(0)
            } else {
                rule.selectors
                    .iter()
                    .filter(|selector| match_page_selector(selector, page))
                    .map(page_specificity)
                    .max()
            };
            let Some(specificity) = best else {
                continue;
            };
            merge_declarations(&mut records, &rule.declarations, specificity, *position, *origin);
        }

        self.apply_page_records(records)
    }

    /// The cascaded style of one margin box of a page.
    pub fn page_margin_style(&self, page: &PageContext, margin_type: PageMarginType) -> BoxStyle {
        let mut records: HashMap<RecordKey, PropertyRecord> = HashMap::new();

        for (rule, position, origin) in &self.page_rules {
            let best = if rule.selectors.is_empty() {
                Some(0)
            } else {
                rule.selectors
                    .iter()
                    .filter(|selector| match_page_selector(selector, page))
                    .map(page_specificity)
                    .max()
            };
            let Some(specificity) = best else {
                continue;
            };
            for margin_rule in &rule.margin_rules {
                if margin_rule.margin_type == margin_type {
                    merge_declarations(&mut records, &margin_rule.declarations, specificity, *position, *origin);
                }
            }
        }

        self.apply_page_records(records)
    }

    fn apply_page_records(&self, records: HashMap<RecordKey, PropertyRecord>) -> BoxStyle {
        let mut style = BoxStyle::new(PseudoType::None);
        for (key, record) in records {
            let RecordKey::Property(id) = key else {
                continue;
            };
            // no element context: pending var() substitutions drop out
            if matches!(record.value, CssValue::VariableReference(..)) {
                continue;
            }
            apply_record(&mut style, id, &record.value, None);
        }

        let font = self.materialize_font(&mut style, None, None);
        let context = self.length_context(&font, None);
        resolve_lengths(&mut style, &context);
        style.font = font;
        style.materialize();
        style
    }

    fn length_context(&self, font: &Font, root: Option<&BoxStyle>) -> LengthContext {
        LengthContext {
            em: font.size(),
            ex: font.ex_unit(),
            ch: font.ch_unit(),
            rem: root.map(|r| r.font.size()).unwrap_or_else(|| font.size()),
            viewport: self.viewport,
        }
    }

    /// Builds the font description from the cascaded font properties and
    /// the parent's font, then selects the concrete font.
    fn materialize_font(&self, style: &mut BoxStyle, parent: Option<&BoxStyle>, root: Option<&BoxStyle>) -> Font {
        let parent_font = parent.map(|p| &p.font).cloned().unwrap_or_default();
        let mut description = FontDescription {
            families: parent_font.description.families.clone(),
            ..parent_font.description.clone()
        };

        if let Some(value) = style.get(PropertyId::FontFamily) {
            let mut families = Vec::new();
            let items: Vec<&CssValue> = match value {
                CssValue::List(values) => values.iter().collect(),
                other => vec![other],
            };
            for item in items {
                match item {
                    CssValue::String(name) => families.push(name.clone()),
                    CssValue::Ident(id) => families.push(id.name().to_string()),
                    CssValue::CustomIdent(name) => families.push(name.clone()),
                    _ => {}
                }
            }
            if !families.is_empty() {
                description.families = families;
            }
        }

        description.size = self.resolve_font_size(style.get(PropertyId::FontSize), &parent_font, root);
        description.weight = resolve_font_weight(style.get(PropertyId::FontWeight), parent_font.description.weight);

        if let Some(value) = style.get(PropertyId::FontStretch) {
            description.stretch = match value {
                CssValue::Percent(p) => *p,
                CssValue::Ident(id) => stretch_keyword_percent(*id),
                _ => description.stretch,
            };
        }

        if let Some(value) = style.get(PropertyId::FontStyle) {
            description.slope = match value {
                CssValue::Ident(ValueId::Normal) => 0.0,
                CssValue::Ident(ValueId::Italic | ValueId::Oblique) => 14.0,
                CssValue::Pair(pair) => pair.1.as_degrees().unwrap_or(14.0),
                _ => description.slope,
            };
        }

        if let Some(CssValue::List(settings)) = style.get(PropertyId::FontVariationSettings) {
            description.variations = settings
                .iter()
                .filter_map(|setting| match setting {
                    CssValue::FontVariation(tag, value) => Some((tag.clone(), *value)),
                    _ => None,
                })
                .collect();
        }

        // rewrite the computed size back so later em-resolution of font-size
        // itself is stable
        style.set(PropertyId::FontSize, CssValue::Length(description.size, LengthUnit::Px));

        Font::new(description)
    }

    /// Font size: keyword ladder on a 16px medium, `smaller`/`larger`
    /// scaling the parent by 1.2, lengths resolved against the parent font.
    fn resolve_font_size(&self, value: Option<&CssValue>, parent_font: &Font, root: Option<&BoxStyle>) -> f32 {
        const MEDIUM: f32 = 16.0;
        let parent_size = parent_font.size();

        let Some(value) = value else {
            return parent_size;
        };

        let parent_context = LengthContext {
            em: parent_size,
            ex: parent_font.ex_unit(),
            ch: parent_font.ch_unit(),
            rem: root.map(|r| r.font.size()).unwrap_or(parent_size),
            viewport: self.viewport,
        };

        match value {
            CssValue::Ident(id) => match id {
                ValueId::XxSmall => MEDIUM * 3.0 / 5.0,
                ValueId::XSmall => MEDIUM * 3.0 / 4.0,
                ValueId::Small => MEDIUM * 8.0 / 9.0,
                ValueId::Medium => MEDIUM,
                ValueId::Large => MEDIUM * 6.0 / 5.0,
                ValueId::XLarge => MEDIUM * 3.0 / 2.0,
                ValueId::XxLarge => MEDIUM * 2.0,
                ValueId::XxxLarge => MEDIUM * 3.0,
                ValueId::Smaller => parent_size / 1.2,
                ValueId::Larger => parent_size * 1.2,
                _ => parent_size,
            },
            CssValue::Length(v, unit) => parent_context.resolve_length(*v, *unit).unwrap_or(parent_size),
            CssValue::Percent(p) => parent_size * p / 100.0,
            CssValue::Calc(calc) => calc
                .evaluate(|v, unit| parent_context.resolve_calc_unit(v, unit, Some(parent_size)))
                .unwrap_or(parent_size),
            _ => parent_size,
        }
        .max(0.0)
    }
}

/// Builds computed styles for elements of one document.
pub struct StyleBuilder<'a, D: Document> {
    engine: &'a StyleEngine,
    document: &'a D,
}

/// Cascade bookkeeping key: a longhand property or a custom property name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum RecordKey {
    Property(PropertyId),
    Custom(String),
}

/// One cascaded declaration candidate.
#[derive(Clone, Debug)]
struct PropertyRecord {
    specificity: u32,
    position: u32,
    origin: CssOrigin,
    important: bool,
    value: CssValue,
}

impl PropertyRecord {
    /// The full cascade-sort key, ascending. `!important` flips the origin
    /// sense.
    fn cascade_key(&self) -> (u8, u8, u32, u32) {
        let origin_rank = if self.important {
            self.origin.important_rank()
        } else {
            self.origin.rank()
        };
        (u8::from(self.important), origin_rank, self.specificity, self.position)
    }
}

/// Merges declarations into the record map: a newcomer wins when its
/// cascade key is not less than the incumbent's.
fn merge_declarations(
    records: &mut HashMap<RecordKey, PropertyRecord>,
    declarations: &[CssDeclaration],
    specificity: u32,
    position: u32,
    origin: CssOrigin,
) {
    for declaration in declarations {
        let key = match declaration.id {
            PropertyId::Custom => RecordKey::Custom(declaration.name.clone()),
            PropertyId::Unknown => continue,
            id => RecordKey::Property(id),
        };
        let record = PropertyRecord {
            specificity,
            position,
            origin,
            important: declaration.important,
            value: declaration.value.clone(),
        };
        match records.get(&key) {
            Some(existing) if record.cascade_key() < existing.cascade_key() => {}
            _ => {
                records.insert(key, record);
            }
        }
    }
}

impl<'a, D: Document> StyleBuilder<'a, D> {
    pub fn new(engine: &'a StyleEngine, document: &'a D) -> Self {
        Self { engine, document }
    }

    /// Builds the computed style of `element` (or one of its
    /// pseudo-elements) against its parent's computed style. `root` is the
    /// root element's style, the `rem` basis.
    pub fn build_style(
        &self,
        element: &D::Element,
        pseudo: PseudoType,
        parent: Option<&BoxStyle>,
        root: Option<&BoxStyle>,
    ) -> BoxStyle {
        let mut records: HashMap<RecordKey, PropertyRecord> = HashMap::new();

        // 1. matched rules from the index buckets
        for data in self.collect_candidates(element) {
            if match_selector(self.document, data.selector(), element, pseudo, None) {
                merge_declarations(
                    &mut records,
                    &data.rule.declarations,
                    data.specificity,
                    data.position,
                    data.origin,
                );
            }
        }

        // 2. presentation attributes and the inline style attribute
        if pseudo == PseudoType::None {
            if let Some(text) = element.presentation_attribute_style() {
                let declarations = CssParser::parse_inline_style(&text);
                merge_declarations(&mut records, &declarations, 0, 0, CssOrigin::PresentationAttribute);
            }
            if let Some(text) = element.inline_style() {
                let declarations = CssParser::parse_inline_style(text);
                merge_declarations(&mut records, &declarations, 0, 0, CssOrigin::Inline);
            }
        }

        let had_declarations = !records.is_empty();

        // 3. custom property map: inherited entries under own declarations
        let mut custom_properties: HashMap<String, VariableData> =
            parent.map(|p| p.custom_properties.clone()).unwrap_or_default();
        for (key, record) in &records {
            if let RecordKey::Custom(name) = key {
                if let CssValue::CustomProperty(_, data) = &record.value {
                    custom_properties.insert(name.clone(), data.clone());
                }
            }
        }

        // 4. substitute pending var() references and re-parse at the same
        // cascade position
        let pending: Vec<(RecordKey, PropertyRecord)> = records
            .iter()
            .filter(|(_, record)| matches!(record.value, CssValue::VariableReference(..)))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        for (key, record) in pending {
            let RecordKey::Property(id) = key else {
                continue;
            };
            let CssValue::VariableReference(data, reparse_id) = &record.value else {
                continue;
            };

            let mut visited = HashSet::new();
            let resolved = crate::functions::var::substitute_variables(&data.tokens, &custom_properties, &mut visited)
                .map(|tokens| reparse_property_value(*reparse_id, &tokens, record.important))
                .and_then(|declarations| {
                    declarations
                        .into_iter()
                        .find(|declaration| declaration.id == id)
                        .map(|declaration| declaration.value)
                });

            match resolved {
                Some(value) => {
                    if let Some(entry) = records.get_mut(&RecordKey::Property(id)) {
                        entry.value = value;
                    }
                }
                None => {
                    // cycles and failed substitutions invalidate the
                    // declaration
                    records.remove(&RecordKey::Property(id));
                }
            }
        }

        // 5. seed inherited properties from the parent, then apply records
        let mut style = BoxStyle::new(pseudo);
        style.custom_properties = custom_properties;
        if let Some(parent) = parent {
            for (id, value) in parent.properties() {
                if id.is_inherited() {
                    style.set(*id, value.clone());
                }
            }
        }

        for (key, record) in &records {
            let RecordKey::Property(id) = key else {
                continue;
            };
            apply_record(&mut style, *id, &record.value, parent);
        }

        // attr() in generated content reads the element now; the value is
        // frozen for the rest of the pass
        if let Some(value) = style.get(PropertyId::Content).cloned() {
            style.set(PropertyId::Content, resolve_attr_values(value, element));
        }

        // 6. default display when nothing applied at all
        style.materialize();
        if !had_declarations {
            let parent_is_flex = parent.map(|p| p.display.is_flex_container()).unwrap_or(false);
            match pseudo {
                PseudoType::None => {
                    style.display = if element.is_root_node() || parent_is_flex {
                        Display::Block
                    } else {
                        Display::Inline
                    };
                }
                PseudoType::Marker => style.display = Display::Inline,
                _ => {}
            }
        }

        // 7. font description and unit resolution
        let font = self.engine.materialize_font(&mut style, parent, root);
        let context = self.engine.length_context(&font, root);
        resolve_lengths(&mut style, &context);
        style.font = font;

        // 8. display and layout fix-ups
        self.apply_fixups(&mut style, element, parent, pseudo);
        style.sync_materialized();
        style
    }

    /// Probes the index buckets that can possibly match the element:
    /// class, attribute, tag, id, universal, then the pseudo bucket.
    fn collect_candidates(&self, element: &D::Element) -> Vec<&'a RuleData> {
        let index = &self.engine.index;
        let mut candidates: Vec<&RuleData> = Vec::new();

        for class in element.class_names() {
            if let Some(bucket) = index.class_rules.get(class) {
                candidates.extend(bucket.iter());
            }
        }

        for (name, _) in element.attributes() {
            if let Some(bucket) = index.attribute_rules.get(name) {
                candidates.extend(bucket.iter());
            }
            let lower = name.to_ascii_lowercase();
            if lower != name {
                if let Some(bucket) = index.attribute_rules.get(&lower) {
                    candidates.extend(bucket.iter());
                }
            }
        }

        let tag = element.tag_name();
        if let Some(bucket) = index.tag_rules.get(tag) {
            candidates.extend(bucket.iter());
        }
        let lower_tag = tag.to_ascii_lowercase();
        if lower_tag != tag {
            if let Some(bucket) = index.tag_rules.get(&lower_tag) {
                candidates.extend(bucket.iter());
            }
        }

        if let Some(id) = element.id() {
            if let Some(bucket) = index.id_rules.get(id) {
                candidates.extend(bucket.iter());
            }
        }

        candidates.extend(index.universal_rules.iter());
        candidates.extend(index.pseudo_rules.iter());
        candidates
    }

    /// The post-cascade fix-ups applied before the style is returned.
    fn apply_fixups(&self, style: &mut BoxStyle, element: &D::Element, parent: Option<&BoxStyle>, pseudo: PseudoType) {
        let parent_is_flex = parent.map(|p| p.display.is_flex_container()).unwrap_or(false);

        // z-index needs a positioned box; an auto override on an
        // absolutely positioned box outside flex adds nothing
        if style.position.is_out_of_flow() && !parent_is_flex {
            if let Some(CssValue::Ident(ValueId::Auto)) = style.get(PropertyId::ZIndex) {
                style.remove(PropertyId::ZIndex);
            }
        }

        if pseudo == PseudoType::FirstLetter {
            style.position = PositionMode::Static;
            style.display = if style.float.is_floating() {
                Display::Block
            } else {
                Display::Inline
            };
            return;
        }

        let blockify = style.float.is_floating()
            || style.position.is_out_of_flow()
            || element.is_root_node()
            || parent_is_flex;
        if blockify {
            style.display = style.display.blockified();
        }

        if style.position.is_out_of_flow() || parent_is_flex {
            style.float = FloatMode::None;
        }
    }
}

/// Replaces `attr()` components with the element's attribute values.
fn resolve_attr_values<E: Element>(value: CssValue, element: &E) -> CssValue {
    match value {
        CssValue::Attr(attr) => crate::functions::attr::resolve_attr(&attr, element),
        CssValue::List(values) => CssValue::List(
            values
                .into_iter()
                .map(|value| resolve_attr_values(value, element))
                .collect(),
        ),
        other => other,
    }
}

/// Writes one cascaded value into the style, resolving the wide keywords
/// against the parent style and the property's initial value.
fn apply_record(style: &mut BoxStyle, id: PropertyId, value: &CssValue, parent: Option<&BoxStyle>) {
    let resolved = match value {
        CssValue::Inherit => parent.and_then(|p| p.get(id).cloned()).or_else(|| id.initial_value()),
        CssValue::Initial => id.initial_value(),
        CssValue::Unset => {
            if id.is_inherited() {
                parent.and_then(|p| p.get(id).cloned()).or_else(|| id.initial_value())
            } else {
                id.initial_value()
            }
        }
        other => Some(other.clone()),
    };

    match resolved {
        Some(value) => style.set(id, value),
        // no explicit initial: fall back to the consumer's default
        None => {
            style.remove(id);
        }
    }
}

/// Resolution context for relative lengths.
#[derive(Clone, Copy, Debug)]
pub struct LengthContext {
    pub em: f32,
    pub ex: f32,
    pub ch: f32,
    pub rem: f32,
    pub viewport: Viewport,
}

impl LengthContext {
    /// A length in the given unit, in px. `None` for percent-like units
    /// that need a layout basis.
    pub fn resolve_length(&self, value: f32, unit: LengthUnit) -> Option<f32> {
        if let Some(factor) = unit.absolute_px_factor() {
            return Some(value * factor);
        }
        let basis = match unit {
            LengthUnit::Em => self.em,
            LengthUnit::Ex => self.ex,
            LengthUnit::Ch => self.ch,
            LengthUnit::Rem => self.rem,
            LengthUnit::Vw => self.viewport.width / 100.0,
            LengthUnit::Vh => self.viewport.height / 100.0,
            LengthUnit::Vmin => self.viewport.width.min(self.viewport.height) / 100.0,
            LengthUnit::Vmax => self.viewport.width.max(self.viewport.height) / 100.0,
            _ => return None,
        };
        Some(value * basis)
    }

    /// Calc literal resolution; percentages resolve only when the caller
    /// supplies a basis.
    pub fn resolve_calc_unit(&self, value: f32, unit: CalcUnit, percent_basis: Option<f32>) -> Option<f32> {
        match unit {
            CalcUnit::None => Some(value),
            CalcUnit::Percent => percent_basis.map(|basis| basis * value / 100.0),
            CalcUnit::Length(unit) => self.resolve_length(value, unit),
            CalcUnit::Angle(unit) => Some(unit.to_degrees(value)),
        }
    }
}

/// Rewrites every relative length in the style to px and evaluates calc
/// expressions. A calc that cannot be evaluated (stack underflow, bad
/// division) degrades to the 0px sentinel; percent-bearing calcs stay
/// untouched for layout.
fn resolve_lengths(style: &mut BoxStyle, context: &LengthContext) {
    for (_, value) in style.properties_mut() {
        resolve_value_lengths(value, context);
    }
}

fn resolve_value_lengths(value: &mut CssValue, context: &LengthContext) {
    match value {
        CssValue::Length(v, unit) => {
            if !unit.is_absolute() {
                if let Some(px) = context.resolve_length(*v, *unit) {
                    *value = CssValue::Length(px, LengthUnit::Px);
                }
            } else if *unit != LengthUnit::Px {
                let px = *v * unit.absolute_px_factor().unwrap_or(1.0);
                *value = CssValue::Length(px, LengthUnit::Px);
            }
        }
        CssValue::Calc(calc) => {
            let has_percent = calc
                .items
                .iter()
                .any(|item| matches!(item, crate::values::CalcItem::Literal { unit: CalcUnit::Percent, .. }));
            if has_percent {
                return;
            }
            let resolved = calc.evaluate(|v, unit| context.resolve_calc_unit(v, unit, None));
            let unitless = calc.unitless;
            *value = match resolved {
                Some(result) if unitless => CssValue::Number(result),
                Some(result) => CssValue::Length(result, LengthUnit::Px),
                // stack underflow or division by zero: the 0px sentinel
                None => CssValue::Length(0.0, LengthUnit::Px),
            };
        }
        CssValue::Pair(pair) => {
            resolve_value_lengths(&mut pair.0, context);
            resolve_value_lengths(&mut pair.1, context);
        }
        CssValue::Rect(rect) => {
            for side in rect.iter_mut() {
                resolve_value_lengths(side, context);
            }
        }
        CssValue::List(values) => {
            for item in values {
                resolve_value_lengths(item, context);
            }
        }
        _ => {}
    }
}

/// `bolder`/`lighter` against the parent weight, per the CSS piecewise
/// table.
fn resolve_font_weight(value: Option<&CssValue>, parent_weight: f32) -> f32 {
    let Some(value) = value else {
        return parent_weight;
    };
    match value {
        CssValue::Number(weight) => *weight,
        CssValue::Ident(ValueId::Normal) => 400.0,
        CssValue::Ident(ValueId::Bold) => 700.0,
        CssValue::Ident(ValueId::Bolder) => {
            if parent_weight < 350.0 {
                400.0
            } else if parent_weight < 550.0 {
                700.0
            } else {
                900.0
            }
        }
        CssValue::Ident(ValueId::Lighter) => {
            if parent_weight < 550.0 {
                100.0
            } else if parent_weight < 750.0 {
                400.0
            } else {
                700.0
            }
        }
        _ => parent_weight,
    }
}
