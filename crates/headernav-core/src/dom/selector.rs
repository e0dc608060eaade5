//! CSS selector groups for the headless DOM
//!
//! Parsed with scraper's selector grammar and matched by the `selectors`
//! engine, so headless queries agree with `querySelectorAll` on everything
//! except dynamic pseudo-classes (`:hover`, `:focus`), which never match.

use crate::error::NavError;
use scraper::error::SelectorErrorKind;
use scraper::selector::{Parser, Simple};
use selectors::matching::{
    self, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags,
    QuirksMode,
};
use selectors::parser::ParseRelative;
use selectors::{Element, NthIndexCache, SelectorList};

/// A comma-separated selector group, e.g. `#primary-nav a[href], .cta`
#[derive(Debug, Clone)]
pub struct SelectorGroup(SelectorList<Simple>);

impl SelectorGroup {
    /// Parse the whole group; any invalid part rejects it
    pub fn parse(selector: &str) -> Result<Self, NavError> {
        let mut input = cssparser::ParserInput::new(selector);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .map(Self)
            .map_err(|e| NavError::InvalidSelector {
                selector: selector.to_string(),
                message: SelectorErrorKind::from(e).to_string(),
            })
    }

    pub fn matches<E: Element<Impl = Simple>>(&self, element: &E) -> bool {
        let mut nth_index_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        let SelectorGroup(list) = self;
        list.0
            .iter()
            .any(|s| matching::matches_selector(s, 0, None, element, &mut context))
    }
}

/// Check that `selector` is a valid selector group
pub fn validate_selector(selector: &str) -> Result<(), NavError> {
    SelectorGroup::parse(selector).map(|_| ())
}
