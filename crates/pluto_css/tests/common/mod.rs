//! Minimal in-memory DOM implementing the engine's document contract for
//! integration tests.

use pluto_interface::document::{Document, Element};
use pluto_interface::media::{MediaQueryList, MediaType};

pub struct TestDocument {
    nodes: Vec<NodeData>,
    pub base_url: Option<String>,
    pub html: bool,
    /// The media type the document renders to
    pub media: MediaType,
}

struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl TestDocument {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            base_url: None,
            html: true,
            media: MediaType::Print,
        }
    }

    /// Appends an element under `parent` (or as the root) and returns its
    /// index.
    pub fn append(&mut self, parent: Option<usize>, tag: &str, attributes: &[(&str, &str)]) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            attributes: attributes
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    pub fn element(&self, index: usize) -> TestElement<'_> {
        TestElement { doc: self, index }
    }
}

#[derive(Clone, Copy)]
pub struct TestElement<'a> {
    doc: &'a TestDocument,
    index: usize,
}

impl PartialEq for TestElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.index == other.index
    }
}

impl<'a> TestElement<'a> {
    fn data(&self) -> &'a NodeData {
        &self.doc.nodes[self.index]
    }

    fn sibling_offset(&self, delta: isize) -> Option<TestElement<'a>> {
        let parent = self.data().parent?;
        let siblings = &self.doc.nodes[parent].children;
        let my_position = siblings.iter().position(|i| *i == self.index)?;
        let target = my_position.checked_add_signed(delta)?;
        siblings.get(target).map(|index| TestElement {
            doc: self.doc,
            index: *index,
        })
    }
}

impl<'a> Element for TestElement<'a> {
    fn parent_element(&self) -> Option<Self> {
        self.data().parent.map(|index| TestElement { doc: self.doc, index })
    }

    fn first_child_element(&self) -> Option<Self> {
        self.data().children.first().map(|index| TestElement {
            doc: self.doc,
            index: *index,
        })
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling_offset(1)
    }

    fn previous_sibling_element(&self) -> Option<Self> {
        self.sibling_offset(-1)
    }

    fn tag_name(&self) -> &str {
        &self.data().tag
    }

    fn namespace_uri(&self) -> Option<&str> {
        if self.is_svg_element() {
            Some("http://www.w3.org/2000/svg")
        } else {
            Some("http://www.w3.org/1999/xhtml")
        }
    }

    fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    fn class_names(&self) -> Vec<&str> {
        self.attribute("class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.data()
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.data()
            .attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn get_url_attribute(&self, name: &str) -> Option<String> {
        let value = self.attribute(name)?;
        if value.contains("://") {
            return Some(value.to_string());
        }
        match &self.doc.base_url {
            Some(base) => Some(format!("{base}{value}")),
            None => Some(value.to_string()),
        }
    }

    fn lang(&self) -> Option<&str> {
        self.attribute("lang")
    }

    fn is_svg_element(&self) -> bool {
        matches!(self.data().tag.as_str(), "svg" | "circle" | "rect" | "path")
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn is_root_node(&self) -> bool {
        self.data().parent.is_none()
    }

    fn inline_style(&self) -> Option<&str> {
        self.attribute("style")
    }

    fn presentation_attribute_style(&self) -> Option<String> {
        let mut declarations = String::new();
        if let Some(width) = self.attribute("width") {
            declarations.push_str(&format!("width: {width}px;"));
        }
        if let Some(bgcolor) = self.attribute("bgcolor") {
            declarations.push_str(&format!("background-color: {bgcolor};"));
        }
        if declarations.is_empty() {
            None
        } else {
            Some(declarations)
        }
    }
}

impl<'a> Document for &'a TestDocument {
    type Element = TestElement<'a>;

    fn root_element(&self) -> Option<TestElement<'a>> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(TestElement { doc: *self, index: 0 })
        }
    }

    fn is_html_document(&self) -> bool {
        self.html
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn supports_media_queries(&self, queries: &MediaQueryList) -> bool {
        if queries.is_empty() {
            return true;
        }
        queries.queries.iter().any(|query| {
            let type_matches = query.media_type == MediaType::All || query.media_type == self.media;
            // feature terms are accepted as-is for tests
            type_matches != query.negated
        })
    }
}
