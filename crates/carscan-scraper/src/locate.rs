//! Candidate-listing discovery.
//!
//! Tries strategies in priority order (configured container selectors,
//! vehicle data attributes, keyword scan over generic containers) and returns
//! the fragments from the first strategy that finds any.

use std::collections::HashSet;
use std::sync::LazyLock;

use carscan_core::{BrandFilter, RecordSource};
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

static DATA_ATTRIBUTE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[data-vehicle], [data-testid]").expect("valid data attribute selector")
});
static SCAN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div, article, section, li, a").expect("valid keyword scan selector")
});
static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector")
});

const PRICE_HINTS: [&str; 3] = ["₹", "km", "price"];

/// Which locator strategy found a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    Selector,
    DataAttribute,
    KeywordScan,
}

impl From<LocateStrategy> for RecordSource {
    fn from(strategy: LocateStrategy) -> Self {
        match strategy {
            LocateStrategy::Selector => RecordSource::Selector,
            LocateStrategy::DataAttribute => RecordSource::DataAttribute,
            LocateStrategy::KeywordScan => RecordSource::KeywordScan,
        }
    }
}

/// One candidate listing, detached from the parsed page.
///
/// Holds its own markup so it can be kept across `.await` points, which the
/// borrowed `ElementRef` cannot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    html: String,
    text: String,
    strategy: LocateStrategy,
}

impl RawFragment {
    fn from_element(element: ElementRef<'_>, strategy: LocateStrategy) -> Self {
        Self {
            html: element.html(),
            text: visible_text(element),
            strategy,
        }
    }

    /// Builds a fragment from standalone markup.
    #[must_use]
    pub fn from_html(html: &str, strategy: LocateStrategy) -> Self {
        let fragment = Html::parse_fragment(html);
        Self {
            html: html.to_string(),
            text: visible_text(fragment.root_element()),
            strategy,
        }
    }

    /// Visible text, one trimmed text node per line.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn strategy(&self) -> LocateStrategy {
        self.strategy
    }

    /// Trimmed, non-empty text of every element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidSelector`] if `selector` does not parse.
    pub fn select_texts(&self, selector: &str) -> Result<Vec<String>, ExtractError> {
        let parsed = Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.texts_matching(&parsed))
    }

    /// Text of `h1`..`h6` descendants, in document order.
    #[must_use]
    pub fn heading_texts(&self) -> Vec<String> {
        self.texts_matching(&HEADING_SELECTOR)
    }

    fn texts_matching(&self, selector: &Selector) -> Vec<String> {
        let fragment = Html::parse_fragment(&self.html);
        fragment
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds candidate listing fragments in a page.
#[derive(Debug, Clone)]
pub struct ElementLocator {
    container_selectors: Vec<String>,
    brand_keywords: Vec<String>,
    max_fragments: usize,
}

impl ElementLocator {
    #[must_use]
    pub fn new(container_selectors: &[String], brand: &BrandFilter, max_fragments: usize) -> Self {
        Self {
            container_selectors: container_selectors.to_vec(),
            brand_keywords: brand.keywords().to_vec(),
            max_fragments,
        }
    }

    /// Returns up to `max_fragments` candidate fragments, deduplicated by node.
    ///
    /// An empty result is a valid outcome, not an error. The page is parsed
    /// afresh on every call.
    #[must_use]
    pub fn locate(&self, page_html: &str) -> Vec<RawFragment> {
        let document = Html::parse_document(page_html);

        // Strategy 1: configured container selectors
        let fragments = self.by_container_selectors(&document);
        if !fragments.is_empty() {
            return fragments;
        }

        // Strategy 2: vehicle data attributes
        let fragments = self.collect(
            document.select(&DATA_ATTRIBUTE_SELECTOR).filter(|el| {
                el.value().attr("data-vehicle").is_some()
                    || el
                        .value()
                        .attr("data-testid")
                        .is_some_and(|id| id.to_lowercase().contains("car"))
            }),
            LocateStrategy::DataAttribute,
        );
        if !fragments.is_empty() {
            tracing::debug!(count = fragments.len(), "located listings via data attributes");
            return fragments;
        }

        // Strategy 3: keyword scan over generic containers
        let fragments = self.collect(
            document.select(&SCAN_SELECTOR).filter(|el| {
                let text = el.text().collect::<String>().to_lowercase();
                self.has_brand_keyword(&text) && PRICE_HINTS.iter().any(|hint| text.contains(hint))
            }),
            LocateStrategy::KeywordScan,
        );
        if !fragments.is_empty() {
            tracing::debug!(count = fragments.len(), "located listings via keyword scan");
        }
        fragments
    }

    fn by_container_selectors(&self, document: &Html) -> Vec<RawFragment> {
        for selector_str in &self.container_selectors {
            let selector = match Selector::parse(selector_str) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(selector = %selector_str, error = %e, "skipping invalid container selector");
                    continue;
                }
            };

            let relevant = self.collect(
                document.select(&selector).filter(|el| {
                    let text = el.text().collect::<String>().to_lowercase();
                    self.is_relevant(&text)
                }),
                LocateStrategy::Selector,
            );
            if !relevant.is_empty() {
                tracing::debug!(
                    selector = %selector_str,
                    count = relevant.len(),
                    "located listings via container selector"
                );
                return relevant;
            }
        }
        Vec::new()
    }

    fn collect<'a>(
        &self,
        elements: impl Iterator<Item = ElementRef<'a>>,
        strategy: LocateStrategy,
    ) -> Vec<RawFragment> {
        let mut seen = HashSet::new();
        elements
            .filter(|el| seen.insert(el.id()))
            .take(self.max_fragments)
            .map(|el| RawFragment::from_element(el, strategy))
            .collect()
    }

    fn has_brand_keyword(&self, lower_text: &str) -> bool {
        self.brand_keywords
            .iter()
            .any(|k| lower_text.contains(k.as_str()))
    }

    fn is_relevant(&self, lower_text: &str) -> bool {
        self.has_brand_keyword(lower_text) || lower_text.contains('₹') || lower_text.contains("km")
    }
}

#[cfg(test)]
#[path = "locate_test.rs"]
mod tests;
