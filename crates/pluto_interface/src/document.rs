use crate::media::MediaQueryList;

/// Element interrogation surface consumed by the selector matcher and the
/// cascade.
///
/// Implementations are cheap handles into the document's node storage
/// (think index + document reference); navigation hands back fresh handles
/// and equality compares node identity, not content. The engine never
/// mutates the tree.
pub trait Element: Clone + PartialEq {
    fn parent_element(&self) -> Option<Self>;
    fn first_child_element(&self) -> Option<Self>;
    fn next_sibling_element(&self) -> Option<Self>;
    fn previous_sibling_element(&self) -> Option<Self>;

    fn tag_name(&self) -> &str;
    fn namespace_uri(&self) -> Option<&str>;
    fn id(&self) -> Option<&str>;
    fn class_names(&self) -> Vec<&str>;
    /// All attributes as `(name, value)` pairs.
    fn attributes(&self) -> Vec<(&str, &str)>;
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Attribute value resolved against the document base (think `href`).
    fn get_url_attribute(&self, name: &str) -> Option<String>;
    fn lang(&self) -> Option<&str>;
    fn is_svg_element(&self) -> bool;
    /// Whether attribute values on this element compare case-sensitively.
    fn is_case_sensitive(&self) -> bool;
    fn is_root_node(&self) -> bool;

    /// Raw declaration text of the `style` attribute, if any.
    fn inline_style(&self) -> Option<&str>;
    /// Raw declaration text derived from presentation attributes, if any.
    fn presentation_attribute_style(&self) -> Option<String>;
}

/// Document-level context for matching and cascade.
pub trait Document {
    type Element: Element;

    fn root_element(&self) -> Option<Self::Element>;
    fn is_html_document(&self) -> bool;
    fn base_url(&self) -> Option<&str>;
    /// Evaluates a media query list against the document's media context.
    fn supports_media_queries(&self, queries: &MediaQueryList) -> bool;
}
