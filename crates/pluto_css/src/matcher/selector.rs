use cow_utils::CowUtils;
use pluto_interface::document::{Document, Element};

use crate::stylesheet::{
    CaseType, Combinator, CompoundSelector, PseudoType, Selector, SelectorMatchType, SimpleSelector,
};

/// Matches a selector against an element.
///
/// Matching starts at the rightmost compound; each part's combinator says how
/// to reach the element for the part on its left. Descendant and
/// indirect-adjacent are "try again" combinators: every ancestor (or earlier
/// sibling) is a fresh starting point for the rest of the chain.
///
/// `pseudo` must name the pseudo-element the caller builds a style for; a
/// selector without a pseudo-element only matches `PseudoType::None`.
/// `scope` carries the anchor element inside `:has()` bodies.
pub fn match_selector<D: Document>(
    document: &D,
    selector: &Selector,
    element: &D::Element,
    pseudo: PseudoType,
    scope: Option<&D::Element>,
) -> bool {
    if selector.pseudo_type() != pseudo {
        return false;
    }
    if selector.parts.is_empty() {
        return false;
    }
    match_complex(document, selector, 0, element, scope)
}

fn match_complex<D: Document>(
    document: &D,
    selector: &Selector,
    index: usize,
    element: &D::Element,
    scope: Option<&D::Element>,
) -> bool {
    let part = &selector.parts[index];
    if !match_compound(document, &part.compound, element, scope) {
        return false;
    }

    if index + 1 == selector.parts.len() {
        // end of the chain; a relative selector still has to reach its
        // anchor through the leading combinator
        return match part.combinator {
            Combinator::None => true,
            Combinator::Descendant => scope.map_or(true, |anchor| is_ancestor(anchor, element)),
            Combinator::Child => {
                scope.map_or(true, |anchor| element.parent_element().as_ref() == Some(anchor))
            }
            Combinator::DirectAdjacent => {
                scope.map_or(true, |anchor| element.previous_sibling_element().as_ref() == Some(anchor))
            }
            Combinator::InDirectAdjacent => scope.map_or(true, |anchor| is_earlier_sibling(anchor, element)),
        };
    }

    match part.combinator {
        Combinator::None => false,
        Combinator::Descendant => {
            // walk up; every ancestor may restart the rest of the chain
            let mut current = element.parent_element();
            while let Some(ancestor) = current {
                if match_complex(document, selector, index + 1, &ancestor, scope) {
                    return true;
                }
                current = ancestor.parent_element();
            }
            false
        }
        Combinator::Child => match element.parent_element() {
            Some(parent) => match_complex(document, selector, index + 1, &parent, scope),
            None => false,
        },
        Combinator::DirectAdjacent => match element.previous_sibling_element() {
            Some(previous) => match_complex(document, selector, index + 1, &previous, scope),
            None => false,
        },
        Combinator::InDirectAdjacent => {
            let mut current = element.previous_sibling_element();
            while let Some(sibling) = current {
                if match_complex(document, selector, index + 1, &sibling, scope) {
                    return true;
                }
                current = sibling.previous_sibling_element();
            }
            false
        }
    }
}

/// Every simple selector of a compound must hold on the same element.
pub fn match_compound<D: Document>(
    document: &D,
    compound: &CompoundSelector,
    element: &D::Element,
    scope: Option<&D::Element>,
) -> bool {
    compound
        .iter()
        .all(|simple| match_simple(document, simple, element, scope))
}

fn match_simple<D: Document>(
    document: &D,
    simple: &SimpleSelector,
    element: &D::Element,
    scope: Option<&D::Element>,
) -> bool {
    match simple.match_type {
        SelectorMatchType::Universal => true,
        SelectorMatchType::Tag => tag_matches(document, &simple.name, element.tag_name()),
        SelectorMatchType::Namespace => {
            // `*` as a prefix matches any namespace; otherwise the resolved
            // uri must agree
            simple.name == "*" || element.namespace_uri() == Some(simple.value.as_str())
        }
        SelectorMatchType::Id => element.id() == Some(simple.value.as_str()),
        SelectorMatchType::Class => element.class_names().contains(&simple.value.as_str()),

        m if m.is_attribute() => match_attribute(document, simple, element),

        SelectorMatchType::PseudoClassIs | SelectorMatchType::PseudoClassWhere => simple
            .sub_selectors
            .iter()
            .any(|sub| match_selector(document, sub, element, PseudoType::None, scope)),
        SelectorMatchType::PseudoClassNot => !simple
            .sub_selectors
            .iter()
            .any(|sub| match_selector(document, sub, element, PseudoType::None, scope)),
        SelectorMatchType::PseudoClassHas => simple
            .sub_selectors
            .iter()
            .any(|sub| match_has(document, sub, element)),

        SelectorMatchType::PseudoClassRoot => element.parent_element().is_none(),
        SelectorMatchType::PseudoClassScope => match scope {
            Some(anchor) => element == anchor,
            None => element.parent_element().is_none(),
        },
        SelectorMatchType::PseudoClassEmpty => element.first_child_element().is_none(),

        SelectorMatchType::PseudoClassFirstChild => element.previous_sibling_element().is_none(),
        SelectorMatchType::PseudoClassLastChild => element.next_sibling_element().is_none(),
        SelectorMatchType::PseudoClassOnlyChild => {
            element.previous_sibling_element().is_none() && element.next_sibling_element().is_none()
        }
        SelectorMatchType::PseudoClassFirstOfType => count_siblings_of_type(document, element, false) == 0,
        SelectorMatchType::PseudoClassLastOfType => count_siblings_of_type(document, element, true) == 0,
        SelectorMatchType::PseudoClassOnlyOfType => {
            count_siblings_of_type(document, element, false) == 0 && count_siblings_of_type(document, element, true) == 0
        }
        SelectorMatchType::PseudoClassNthChild => simple.nth.matches(count_preceding(element) + 1),
        SelectorMatchType::PseudoClassNthLastChild => simple.nth.matches(count_following(element) + 1),
        SelectorMatchType::PseudoClassNthOfType => {
            simple.nth.matches(count_siblings_of_type(document, element, false) + 1)
        }
        SelectorMatchType::PseudoClassNthLastOfType => {
            simple.nth.matches(count_siblings_of_type(document, element, true) + 1)
        }

        SelectorMatchType::PseudoClassLink | SelectorMatchType::PseudoClassAnyLink => {
            tag_matches(document, "a", element.tag_name()) && element.attribute("href").is_some()
        }
        SelectorMatchType::PseudoClassLocalLink => {
            if !tag_matches(document, "a", element.tag_name()) {
                return false;
            }
            let Some(href) = element.get_url_attribute("href") else {
                return false;
            };
            let Some(base) = document.base_url() else {
                return false;
            };
            strip_fragment(&href) == strip_fragment(base)
        }

        SelectorMatchType::PseudoClassEnabled => is_form_control(element) && element.attribute("disabled").is_none(),
        SelectorMatchType::PseudoClassDisabled => is_form_control(element) && element.attribute("disabled").is_some(),
        SelectorMatchType::PseudoClassChecked => element.attribute("checked").is_some(),
        SelectorMatchType::PseudoClassLang => lang_matches(element, &simple.name),

        // dynamic state never applies to paged output
        SelectorMatchType::PseudoClassHover
        | SelectorMatchType::PseudoClassActive
        | SelectorMatchType::PseudoClassFocus => false,

        // validated against the requested pseudo type up front
        m if m.is_pseudo_element() => true,

        // page pseudos never match elements
        _ => false,
    }
}

/// `:has(S)`: runs `S` over the anchor's descendants or following siblings,
/// depending on the body's leading combinator. A child or direct-adjacent
/// lead bounds the search depth to the number of compounds in `S`.
fn match_has<D: Document>(document: &D, sub: &Selector, anchor: &D::Element) -> bool {
    let lead = sub.parts.last().map(|part| part.combinator).unwrap_or(Combinator::Descendant);
    let compounds = sub.parts.len();

    match lead {
        Combinator::Descendant | Combinator::None => any_descendant(anchor, usize::MAX, &mut |candidate| {
            match_selector(document, sub, candidate, PseudoType::None, Some(anchor))
        }),
        Combinator::Child => {
            // depth 0 = direct children; deeper compounds may chain down
            any_descendant(anchor, compounds.saturating_sub(1), &mut |candidate| {
                match_selector(document, sub, candidate, PseudoType::None, Some(anchor))
            })
        }
        Combinator::DirectAdjacent => {
            let mut count = 0;
            let mut current = anchor.next_sibling_element();
            while let Some(sibling) = current {
                if match_selector(document, sub, &sibling, PseudoType::None, Some(anchor)) {
                    return true;
                }
                count += 1;
                if count >= compounds {
                    break;
                }
                current = sibling.next_sibling_element();
            }
            false
        }
        Combinator::InDirectAdjacent => {
            let mut current = anchor.next_sibling_element();
            while let Some(sibling) = current {
                if match_selector(document, sub, &sibling, PseudoType::None, Some(anchor)) {
                    return true;
                }
                current = sibling.next_sibling_element();
            }
            false
        }
    }
}

/// Depth-first walk over descendants up to `max_depth` (0 = children only).
fn any_descendant<E: Element>(element: &E, max_depth: usize, test: &mut dyn FnMut(&E) -> bool) -> bool {
    let mut child = element.first_child_element();
    while let Some(current) = child {
        if test(&current) {
            return true;
        }
        if max_depth > 0 && any_descendant(&current, max_depth - 1, test) {
            return true;
        }
        child = current.next_sibling_element();
    }
    false
}

fn match_attribute<D: Document>(document: &D, simple: &SimpleSelector, element: &D::Element) -> bool {
    let wanted_name = &simple.name;

    // attribute names fold case in HTML documents
    let got_value = if document.is_html_document() {
        element
            .attributes()
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted_name))
            .map(|(_, value)| value.to_string())
    } else {
        element.attribute(wanted_name).map(ToString::to_string)
    };

    let Some(got_value) = got_value else {
        return false;
    };

    if simple.match_type == SelectorMatchType::AttributeHas {
        return true;
    }

    let mut wanted = simple.value.clone();
    let mut got = got_value;
    let insensitive = simple.case_type == CaseType::Insensitive || !element.is_case_sensitive();
    if insensitive {
        wanted = wanted.cow_to_ascii_lowercase().to_string();
        got = got.cow_to_ascii_lowercase().to_string();
    }

    match simple.match_type {
        SelectorMatchType::AttributeEquals => got == wanted,
        SelectorMatchType::AttributeIncludes => got.split_whitespace().any(|word| word == wanted),
        SelectorMatchType::AttributeContains => !wanted.is_empty() && got.contains(&wanted),
        SelectorMatchType::AttributeDashEquals => {
            got == wanted || got.strip_prefix(&wanted).is_some_and(|rest| rest.starts_with('-'))
        }
        SelectorMatchType::AttributeStartsWith => !wanted.is_empty() && got.starts_with(&wanted),
        SelectorMatchType::AttributeEndsWith => !wanted.is_empty() && got.ends_with(&wanted),
        _ => false,
    }
}

fn tag_matches<D: Document>(document: &D, wanted: &str, got: &str) -> bool {
    if wanted == "*" {
        return true;
    }
    if document.is_html_document() {
        wanted.eq_ignore_ascii_case(got)
    } else {
        wanted == got
    }
}

fn lang_matches<E: Element>(element: &E, wanted: &str) -> bool {
    // the language is inherited from the nearest ancestor that declares one
    let mut current = Some(element.clone());
    while let Some(e) = current {
        if let Some(lang) = e.lang() {
            return lang.eq_ignore_ascii_case(wanted)
                || lang
                    .to_ascii_lowercase()
                    .strip_prefix(&wanted.to_ascii_lowercase())
                    .is_some_and(|rest| rest.starts_with('-'));
        }
        current = e.parent_element();
    }
    false
}

fn is_form_control<E: Element>(element: &E) -> bool {
    matches!(
        element.tag_name().to_ascii_lowercase().as_str(),
        "input" | "button" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
    )
}

fn is_ancestor<E: Element>(ancestor: &E, element: &E) -> bool {
    let mut current = element.parent_element();
    while let Some(e) = current {
        if &e == ancestor {
            return true;
        }
        current = e.parent_element();
    }
    false
}

fn is_earlier_sibling<E: Element>(earlier: &E, element: &E) -> bool {
    let mut current = element.previous_sibling_element();
    while let Some(e) = current {
        if &e == earlier {
            return true;
        }
        current = e.previous_sibling_element();
    }
    false
}

fn count_preceding<E: Element>(element: &E) -> i32 {
    let mut count = 0;
    let mut current = element.previous_sibling_element();
    while let Some(e) = current {
        count += 1;
        current = e.previous_sibling_element();
    }
    count
}

fn count_following<E: Element>(element: &E) -> i32 {
    let mut count = 0;
    let mut current = element.next_sibling_element();
    while let Some(e) = current {
        count += 1;
        current = e.next_sibling_element();
    }
    count
}

/// Counts same-tag siblings before (or after, when `following`) the element.
fn count_siblings_of_type<D: Document>(document: &D, element: &D::Element, following: bool) -> i32 {
    let tag = element.tag_name().to_string();
    let mut count = 0;
    let mut current = if following {
        element.next_sibling_element()
    } else {
        element.previous_sibling_element()
    };
    while let Some(e) = current {
        if tag_matches(document, &tag, e.tag_name()) {
            count += 1;
        }
        current = if following {
            e.next_sibling_element()
        } else {
            e.previous_sibling_element()
        };
    }
    count
}

fn strip_fragment(url: &str) -> &str {
    url.split('#').next().unwrap_or(url)
}
