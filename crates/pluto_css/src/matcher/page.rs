use crate::stylesheet::{PageSelector, SelectorMatchType};

/// Which side of the spread a page was assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSide {
    Left,
    Right,
}

/// Everything an `@page` selector can ask about a page.
#[derive(Clone, Debug)]
pub struct PageContext {
    /// Named page (from the `page` property), if any
    pub name: Option<String>,
    /// Zero-based page index
    pub index: u32,
    pub side: PageSide,
    pub blank: bool,
}

impl PageContext {
    pub fn new(name: Option<&str>, index: u32, side: PageSide, blank: bool) -> Self {
        Self {
            name: name.map(ToString::to_string),
            index,
            side,
            blank,
        }
    }
}

/// `@page` selectors are compound-only: every simple predicate must hold.
pub fn match_page_selector(selector: &PageSelector, page: &PageContext) -> bool {
    selector.iter().all(|simple| match simple.match_type {
        SelectorMatchType::PseudoPageName => page.name.as_deref() == Some(simple.name.as_str()),
        SelectorMatchType::PseudoPageFirst => page.index == 0,
        SelectorMatchType::PseudoPageLeft => page.side == PageSide::Left,
        SelectorMatchType::PseudoPageRight => page.side == PageSide::Right,
        SelectorMatchType::PseudoPageBlank => page.blank,
        SelectorMatchType::PseudoPageNth => simple.nth.matches(page.index as i32 + 1),
        _ => false,
    })
}

/// Page selector specificity: name = 0x10000, first/blank = 0x100,
/// left/right/nth = 1.
pub fn page_specificity(selector: &PageSelector) -> u32 {
    selector
        .iter()
        .map(|simple| match simple.match_type {
            SelectorMatchType::PseudoPageName => 0x10000,
            SelectorMatchType::PseudoPageFirst | SelectorMatchType::PseudoPageBlank => 0x100,
            SelectorMatchType::PseudoPageLeft
            | SelectorMatchType::PseudoPageRight
            | SelectorMatchType::PseudoPageNth => 1,
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::{NthPattern, SimpleSelector};

    fn named(name: &str) -> SimpleSelector {
        let mut simple = SimpleSelector::new(SelectorMatchType::PseudoPageName);
        simple.name = name.to_string();
        simple
    }

    #[test]
    fn name_and_first_must_both_hold() {
        let selector = vec![named("chapter"), SimpleSelector::new(SelectorMatchType::PseudoPageFirst)];

        let first = PageContext::new(Some("chapter"), 0, PageSide::Right, false);
        assert!(match_page_selector(&selector, &first));

        let second = PageContext::new(Some("chapter"), 1, PageSide::Left, false);
        assert!(!match_page_selector(&selector, &second));

        let other_name = PageContext::new(Some("index"), 0, PageSide::Right, false);
        assert!(!match_page_selector(&selector, &other_name));
    }

    #[test]
    fn side_and_blank_predicates() {
        let left = vec![SimpleSelector::new(SelectorMatchType::PseudoPageLeft)];
        assert!(match_page_selector(&left, &PageContext::new(None, 3, PageSide::Left, false)));
        assert!(!match_page_selector(&left, &PageContext::new(None, 3, PageSide::Right, false)));

        let blank = vec![SimpleSelector::new(SelectorMatchType::PseudoPageBlank)];
        assert!(match_page_selector(&blank, &PageContext::new(None, 3, PageSide::Left, true)));
    }

    #[test]
    fn nth_counts_one_based() {
        let mut nth = SimpleSelector::new(SelectorMatchType::PseudoPageNth);
        nth.nth = NthPattern::new(2, 0);
        let selector = vec![nth];

        // page index 1 is the second page
        assert!(match_page_selector(&selector, &PageContext::new(None, 1, PageSide::Left, false)));
        assert!(!match_page_selector(&selector, &PageContext::new(None, 2, PageSide::Right, false)));
    }

    #[test]
    fn specificity_scale() {
        let selector = vec![
            named("chapter"),
            SimpleSelector::new(SelectorMatchType::PseudoPageFirst),
            SimpleSelector::new(SelectorMatchType::PseudoPageLeft),
        ];
        assert_eq!(page_specificity(&selector), 0x10101);
    }
}
