//! End-to-end scenarios: parse → index → match → cascade → resolve.

mod common;

use common::TestDocument;

use pluto_css::cascade::{StyleBuilder, StyleEngine, Viewport};
use pluto_css::computed::{BoxStyle, Display, FloatMode, PositionMode};
use pluto_css::matcher::page::{PageContext, PageSide};
use pluto_css::parser::CssParser;
use pluto_css::properties::PropertyId;
use pluto_css::stylesheet::{CssRule, CssStylesheet, PageMarginType, PseudoType};
use pluto_css::values::{CssValue, LengthUnit};
use pluto_interface::css::CssOrigin;
use pluto_shared::config::ParserConfig;

fn parse_author(css: &str) -> CssStylesheet {
    CssParser::parse_str(css, ParserConfig::default(), CssOrigin::Author, "test:sheet.css", None)
}

fn parse_origin(css: &str, origin: CssOrigin) -> CssStylesheet {
    CssParser::parse_str(css, ParserConfig::default(), origin, "test:sheet.css", None)
}

/// Engine with only the given author css (no user agent defaults).
fn engine_for(css: &str, doc: &TestDocument) -> StyleEngine {
    let mut engine = StyleEngine::new(Viewport::default());
    let sheet = parse_author(css);
    engine.add_stylesheet(&sheet, &&*doc);
    engine
}

fn build(engine: &StyleEngine, doc: &TestDocument, index: usize, parent: Option<&BoxStyle>) -> BoxStyle {
    let doc_ref = &doc;
    let builder = StyleBuilder::new(engine, doc_ref);
    builder.build_style(&doc.element(index), PseudoType::None, parent, None)
}

#[test]
fn first_of_type_applies_to_first_paragraph_only() {
    // <div class="note"><p>a</p><p>b</p></div>
    let mut doc = TestDocument::new();
    let div = doc.append(None, "div", &[("class", "note")]);
    let p1 = doc.append(Some(div), "p", &[]);
    let p2 = doc.append(Some(div), "p", &[]);

    let engine = engine_for("div.note > p:first-of-type { color: red !important; }", &doc);

    let div_style = build(&engine, &doc, div, None);
    let p1_style = build(&engine, &doc, p1, Some(&div_style));
    let p2_style = build(&engine, &doc, p2, Some(&div_style));

    assert_eq!(
        p1_style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(255, 0, 0, 255)))
    );
    assert_eq!(p2_style.get(PropertyId::Color), None);
}

#[test]
fn selector_specificity_sums_the_whole_chain() {
    let sheet = parse_author("div.note > p:first-of-type { color: red }");
    let CssRule::Style(rule) = &sheet.rules[0] else {
        panic!("expected style rule");
    };
    // tag + class + tag + pseudo-class
    assert_eq!(rule.selectors[0].specificity(), 0x202);
}

#[test]
fn variable_with_calc_resolves_against_own_font() {
    // margin: var(--size) with --size: calc(10px + 2em) and font-size 20px
    let mut doc = TestDocument::new();
    let html = doc.append(None, "html", &[]);
    let p = doc.append(Some(html), "p", &[]);

    let engine = engine_for(
        "p { --size: calc(10px + 2em); font-size: 20px; margin: var(--size); }",
        &doc,
    );

    let html_style = build(&engine, &doc, html, None);
    let p_style = build(&engine, &doc, p, Some(&html_style));

    for id in [
        PropertyId::MarginTop,
        PropertyId::MarginRight,
        PropertyId::MarginBottom,
        PropertyId::MarginLeft,
    ] {
        assert_eq!(p_style.get(id), Some(&CssValue::Length(50.0, LengthUnit::Px)), "{id:?}");
    }
}

#[test]
fn variable_cycle_invalidates_the_declaration() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let engine = engine_for("p { --a: var(--b); --b: var(--a); margin-top: var(--a); }", &doc);
    let style = build(&engine, &doc, p, None);

    assert_eq!(style.get(PropertyId::MarginTop), None);
}

#[test]
fn later_position_wins_at_equal_precedence() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let engine = engine_for("p { color: red } p { color: blue }", &doc);
    let style = build(&engine, &doc, p, None);
    assert_eq!(
        style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(0, 0, 255, 255)))
    );
}

#[test]
fn higher_specificity_beats_position() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[("id", "x")]);

    let engine = engine_for("#x { color: red } p { color: blue }", &doc);
    let style = build(&engine, &doc, p, None);
    assert_eq!(
        style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(255, 0, 0, 255)))
    );
}

#[test]
fn important_flips_origin_order() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let mut engine = StyleEngine::new(Viewport::default());
    let ua = parse_origin("p { color: green !important }", CssOrigin::UserAgent);
    let author = parse_origin("p { color: blue !important } p { color: red }", CssOrigin::Author);
    engine.add_stylesheet(&ua, &&doc);
    engine.add_stylesheet(&author, &&doc);

    let style = build(&engine, &doc, p, None);
    // ua-important outranks author-important, which outranks normal author
    assert_eq!(
        style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(0, 128, 0, 255)))
    );
}

#[test]
fn inline_style_beats_author_rules() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[("style", "color: blue")]);

    let engine = engine_for("p { color: red }", &doc);
    let style = build(&engine, &doc, p, None);
    assert_eq!(
        style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(0, 0, 255, 255)))
    );
}

#[test]
fn presentation_attributes_lose_to_author_rules() {
    let mut doc = TestDocument::new();
    let td = doc.append(None, "td", &[("bgcolor", "red")]);

    // presentation attributes apply, but any author rule overrides
    let engine = engine_for("", &doc);
    let style = build(&engine, &doc, td, None);
    assert_eq!(
        style.get(PropertyId::BackgroundColor),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(255, 0, 0, 255)))
    );

    let engine = engine_for("td { background-color: blue }", &doc);
    let style = build(&engine, &doc, td, None);
    assert_eq!(
        style.get(PropertyId::BackgroundColor),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(0, 0, 255, 255)))
    );
}

#[test]
fn inherited_properties_flow_down() {
    let mut doc = TestDocument::new();
    let div = doc.append(None, "div", &[]);
    let p = doc.append(Some(div), "p", &[]);

    let engine = engine_for("div { color: red; border-top-width: 4px }", &doc);
    let div_style = build(&engine, &doc, div, None);
    let p_style = build(&engine, &doc, p, Some(&div_style));

    // color inherits, border width does not
    assert!(p_style.get(PropertyId::Color).is_some());
    assert_eq!(p_style.get(PropertyId::BorderTopWidth), None);
}

#[test]
fn explicit_inherit_pulls_any_property() {
    let mut doc = TestDocument::new();
    let div = doc.append(None, "div", &[]);
    let p = doc.append(Some(div), "p", &[]);

    let engine = engine_for("div { border-top-width: 4px } p { border-top-width: inherit }", &doc);
    let div_style = build(&engine, &doc, div, None);
    let p_style = build(&engine, &doc, p, Some(&div_style));

    assert_eq!(p_style.get(PropertyId::BorderTopWidth), Some(&CssValue::Length(4.0, LengthUnit::Px)));
}

#[test]
fn not_has_child_span() {
    // <a><b/></a> matches a:not(:has(> span)); <a><span/></a> does not
    let mut doc = TestDocument::new();
    let root = doc.append(None, "root", &[]);
    let a1 = doc.append(Some(root), "a", &[]);
    let _b = doc.append(Some(a1), "b", &[]);
    let a2 = doc.append(Some(root), "a", &[]);
    let _span = doc.append(Some(a2), "span", &[]);

    let engine = engine_for("a:not(:has(> span)) { color: red }", &doc);
    let root_style = build(&engine, &doc, root, None);
    let a1_style = build(&engine, &doc, a1, Some(&root_style));
    let a2_style = build(&engine, &doc, a2, Some(&root_style));

    assert!(a1_style.get(PropertyId::Color).is_some());
    assert!(a2_style.get(PropertyId::Color).is_none());
}

#[test]
fn has_grandchild_needs_descendant_combinator() {
    // :has(> span) must not match a grandchild span
    let mut doc = TestDocument::new();
    let root = doc.append(None, "root", &[]);
    let a = doc.append(Some(root), "a", &[]);
    let div = doc.append(Some(a), "div", &[]);
    let _span = doc.append(Some(div), "span", &[]);

    let engine = engine_for("a:has(> span) { color: red }", &doc);
    let root_style = build(&engine, &doc, root, None);
    let a_style = build(&engine, &doc, a, Some(&root_style));
    assert!(a_style.get(PropertyId::Color).is_none());

    let engine = engine_for("a:has(span) { color: red }", &doc);
    let a_style = build(&engine, &doc, a, Some(&root_style));
    assert!(a_style.get(PropertyId::Color).is_some());
}

#[test]
fn rgba_percent_alpha_rounds() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let engine = engine_for("p { color: rgba(255, 0, 0, 50%) }", &doc);
    let style = build(&engine, &doc, p, None);
    assert_eq!(
        style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(255, 0, 0, 128)))
    );
}

#[test]
fn float_blockifies_display() {
    let mut doc = TestDocument::new();
    let root = doc.append(None, "root", &[]);
    let span = doc.append(Some(root), "span", &[]);

    let engine = engine_for("span { float: left }", &doc);
    let root_style = build(&engine, &doc, root, None);
    let style = build(&engine, &doc, span, Some(&root_style));

    assert_eq!(style.float, FloatMode::Left);
    assert_eq!(style.display, Display::Block);
}

#[test]
fn flex_children_blockify_and_lose_floats() {
    let mut doc = TestDocument::new();
    let root = doc.append(None, "root", &[]);
    let item = doc.append(Some(root), "span", &[]);

    let engine = engine_for("root { display: flex } span { float: left; display: inline-flex }", &doc);
    let root_style = build(&engine, &doc, root, None);
    assert_eq!(root_style.display, Display::Flex);

    let item_style = build(&engine, &doc, item, Some(&root_style));
    assert_eq!(item_style.display, Display::Flex);
    assert_eq!(item_style.float, FloatMode::None);
}

#[test]
fn absolute_position_drops_auto_z_index() {
    let mut doc = TestDocument::new();
    let root = doc.append(None, "root", &[]);
    let div = doc.append(Some(root), "div", &[]);

    let engine = engine_for("div { position: absolute; z-index: auto }", &doc);
    let root_style = build(&engine, &doc, root, None);
    let style = build(&engine, &doc, div, Some(&root_style));

    assert_eq!(style.position, PositionMode::Absolute);
    assert_eq!(style.get(PropertyId::ZIndex), None);
}

#[test]
fn first_letter_resets_position_and_display() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let engine = engine_for("p::first-letter { float: left; position: relative }", &doc);
    let doc_ref = &&doc;
    let builder = StyleBuilder::new(&engine, doc_ref);
    let style = builder.build_style(&doc.element(p), PseudoType::FirstLetter, None, None);

    assert_eq!(style.position, PositionMode::Static);
    assert_eq!(style.display, Display::Block);
}

#[test]
fn pseudo_element_styles_are_separate() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let engine = engine_for("p::before { content: \"x\" } p { color: red }", &doc);
    let doc_ref = &&doc;
    let builder = StyleBuilder::new(&engine, doc_ref);

    let element_style = builder.build_style(&doc.element(p), PseudoType::None, None, None);
    assert!(element_style.get(PropertyId::Content).is_none());

    let before_style = builder.build_style(&doc.element(p), PseudoType::Before, None, None);
    assert_eq!(
        before_style.get(PropertyId::Content),
        Some(&CssValue::List(vec![CssValue::String("x".to_string())]))
    );
}

#[test]
fn media_rules_follow_the_document_media() {
    let mut doc = TestDocument::new();
    let p = doc.append(None, "p", &[]);

    let engine = engine_for(
        "@media print { p { color: red } } @media screen { p { color: blue } }",
        &doc,
    );
    let style = build(&engine, &doc, p, None);
    assert_eq!(
        style.get(PropertyId::Color),
        Some(&CssValue::Color(pluto_css::colors::RgbaColor::new(255, 0, 0, 255)))
    );
}

#[test]
fn relative_units_resolve_to_px() {
    let mut doc = TestDocument::new();
    let html = doc.append(None, "html", &[]);
    let p = doc.append(Some(html), "p", &[]);

    let engine = engine_for("html { font-size: 20px } p { font-size: 2em; margin-top: 1em; width: 50vw }", &doc);
    let html_style = build(&engine, &doc, html, None);
    let p_style = builder_build(&engine, &doc, p, Some(&html_style), Some(&html_style));

    assert_eq!(p_style.font.size(), 40.0);
    assert_eq!(p_style.get(PropertyId::MarginTop), Some(&CssValue::Length(40.0, LengthUnit::Px)));
    // 50vw of the default 794px viewport
    assert_eq!(p_style.get(PropertyId::Width), Some(&CssValue::Length(397.0, LengthUnit::Px)));
}

fn builder_build(
    engine: &StyleEngine,
    doc: &TestDocument,
    index: usize,
    parent: Option<&BoxStyle>,
    root: Option<&BoxStyle>,
) -> BoxStyle {
    let doc_ref = &doc;
    let builder = StyleBuilder::new(engine, doc_ref);
    builder.build_style(&doc.element(index), PseudoType::None, parent, root)
}

#[test]
fn rem_resolves_against_the_root_style() {
    let mut doc = TestDocument::new();
    let html = doc.append(None, "html", &[]);
    let p = doc.append(Some(html), "p", &[]);

    let engine = engine_for("html { font-size: 20px } p { font-size: 10px; margin-top: 2rem }", &doc);
    let html_style = builder_build(&engine, &doc, html, None, None);
    let p_style = builder_build(&engine, &doc, p, Some(&html_style), Some(&html_style));

    assert_eq!(p_style.get(PropertyId::MarginTop), Some(&CssValue::Length(40.0, LengthUnit::Px)));
}

#[test]
fn font_weight_bolder_uses_parent_weight() {
    let mut doc = TestDocument::new();
    let div = doc.append(None, "div", &[]);
    let b = doc.append(Some(div), "b", &[]);

    let engine = engine_for("div { font-weight: 300 } b { font-weight: bolder }", &doc);
    let div_style = build(&engine, &doc, div, None);
    assert_eq!(div_style.font.description.weight, 300.0);

    let b_style = build(&engine, &doc, b, Some(&div_style));
    assert_eq!(b_style.font.description.weight, 400.0);
}

#[test]
fn user_agent_defaults_apply() {
    let mut doc = TestDocument::new();
    let html = doc.append(None, "html", &[]);
    let body = doc.append(Some(html), "body", &[]);
    let h1 = doc.append(Some(body), "h1", &[]);
    let head = doc.append(Some(html), "head", &[]);

    let doc_ref = &doc;
    let engine = StyleEngine::with_defaults(Viewport::default(), &doc_ref);

    let html_style = builder_build(&engine, &doc, html, None, None);
    let body_style = builder_build(&engine, &doc, body, Some(&html_style), Some(&html_style));
    assert_eq!(body_style.display, Display::Block);
    assert_eq!(body_style.get(PropertyId::MarginTop), Some(&CssValue::Length(8.0, LengthUnit::Px)));

    let h1_style = builder_build(&engine, &doc, h1, Some(&body_style), Some(&html_style));
    assert_eq!(h1_style.display, Display::Block);
    // 2em of the 16px default
    assert_eq!(h1_style.font.size(), 32.0);

    let head_style = builder_build(&engine, &doc, head, Some(&html_style), Some(&html_style));
    assert_eq!(head_style.display, Display::None);
}

#[test]
fn page_rules_cascade_by_specificity_and_position() {
    let mut doc = TestDocument::new();
    let _root = doc.append(None, "html", &[]);

    let engine = engine_for(
        "@page { margin-top: 1cm } @page :first { margin-top: 72pt }",
        &doc,
    );

    let first = PageContext::new(None, 0, PageSide::Right, false);
    let style = engine.page_style(&first);
    assert_eq!(style.get(PropertyId::MarginTop), Some(&CssValue::Length(96.0, LengthUnit::Px)));

    let second = PageContext::new(None, 1, PageSide::Left, false);
    let style = engine.page_style(&second);
    let Some(CssValue::Length(px, LengthUnit::Px)) = style.get(PropertyId::MarginTop) else {
        panic!("expected a resolved margin");
    };
    assert!((px - 37.795).abs() < 0.01);
}

#[test]
fn attr_in_content_reads_the_element() {
    let mut doc = TestDocument::new();
    let a = doc.append(None, "a", &[("href", "https://example.com/")]);

    let engine = engine_for("a::after { content: \" (\" attr(href) \")\" }", &doc);
    let doc_ref = &&doc;
    let builder = StyleBuilder::new(&engine, doc_ref);
    let style = builder.build_style(&doc.element(a), PseudoType::After, None, None);

    assert_eq!(
        style.get(PropertyId::Content),
        Some(&CssValue::List(vec![
            CssValue::String(" (".to_string()),
            CssValue::String("https://example.com/".to_string()),
            CssValue::String(")".to_string()),
        ]))
    );
}

#[test]
fn matching_page_rules_order_by_specificity_then_position() {
    let mut doc = TestDocument::new();
    let _root = doc.append(None, "html", &[]);

    let engine = engine_for(
        "@page chapter { margin: 1cm } @page { margin: 2cm } @page :first { margin: 3cm }",
        &doc,
    );

    let page = PageContext::new(Some("chapter"), 0, PageSide::Right, false);
    let matched = engine.matching_page_rules(&page);
    // anonymous first, then :first, then the named rule last (it wins)
    assert_eq!(matched.len(), 3);
    assert!(matched[0].selectors.is_empty());
    assert_eq!(matched[2].selectors[0][0].name, "chapter");
}

#[test]
fn page_margin_boxes_carry_their_content() {
    let mut doc = TestDocument::new();
    let _root = doc.append(None, "html", &[]);

    let engine = engine_for("@page { @bottom-center { content: counter(page) } }", &doc);
    let page = PageContext::new(None, 0, PageSide::Right, false);

    let style = engine.page_margin_style(&page, PageMarginType::BottomCenter);
    assert!(style.get(PropertyId::Content).is_some());

    let style = engine.page_margin_style(&page, PageMarginType::TopCenter);
    assert!(style.get(PropertyId::Content).is_none());
}

#[test]
fn counter_styles_resolve_through_the_engine() {
    let mut doc = TestDocument::new();
    let _root = doc.append(None, "html", &[]);

    let engine = engine_for("@counter-style x { system: numeric; symbols: \"a\" \"b\"; }", &doc);
    let styles = engine.counter_styles();
    assert_eq!(styles.representation("x", 0), "a");
    assert_eq!(styles.representation("x", 1), "b");
    assert_eq!(styles.representation("x", 5), "bab");
    // unknown styles fall back to the user agent's decimal
    assert_eq!(styles.representation("mystery", 12), "12");
    // predefined styles come from the shared map
    assert_eq!(styles.representation("lower-roman", 9), "ix");
}

#[test]
fn font_faces_register_and_select() {
    let mut doc = TestDocument::new();
    let _root = doc.append(None, "html", &[]);

    let engine = engine_for(
        "@font-face { font-family: Body; src: local(Body); font-weight: 700 }",
        &doc,
    );
    let request = pluto_css::font_face::FontSelectionRequest {
        weight: 700.0,
        ..Default::default()
    };
    assert!(engine.font_faces().select("body", &request).is_some());
    assert!(engine.font_faces().select("other", &request).is_none());
}
