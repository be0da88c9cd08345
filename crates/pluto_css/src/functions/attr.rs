use pluto_interface::document::Element;

use crate::values::{AttrValue, CssValue};

/// Resolves an `attr()` value against an element. A missing attribute uses
/// the fallback; without one the result is the empty string.
pub fn resolve_attr<E: Element>(attr: &AttrValue, element: &E) -> CssValue {
    if let Some(value) = element.attribute(&attr.name) {
        return CssValue::String(value.to_string());
    }
    attr.fallback
        .clone()
        .unwrap_or_else(|| CssValue::String(String::new()))
}
