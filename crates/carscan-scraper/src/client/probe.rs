//! Pre-scrape reachability and content check for a target URL.

use std::sync::LazyLock;

use carscan_core::{BrandFilter, LocationTarget};
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::ScraperError;

use super::ListingClient;

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article[class], div[class]").expect("valid selector"));
static LISTING_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)car|vehicle|listing").expect("valid listing class regex"));

/// Content indicators found in a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageIndicators {
    pub has_brand: bool,
    /// Mentions cars together with buying or selling.
    pub has_listing_terms: bool,
    /// Has an `article`/`div` whose class looks like a listing container.
    pub has_listing_containers: bool,
}

impl PageIndicators {
    #[must_use]
    pub fn any(&self) -> bool {
        self.has_brand || self.has_listing_terms || self.has_listing_containers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub location: String,
    pub url: String,
    pub reachable: bool,
    /// HTTP status of the last response, if one arrived.
    pub status: Option<u16>,
    pub error: Option<String>,
    #[serde(flatten)]
    pub indicators: PageIndicators,
}

impl ProbeReport {
    /// Reachable and carrying at least one car-listing indicator.
    #[must_use]
    pub fn looks_valid(&self) -> bool {
        self.reachable && self.indicators.any()
    }
}

/// Scans a page for brand mentions, listing vocabulary and listing-like containers.
#[must_use]
pub fn inspect_page(html: &str, brand: &BrandFilter) -> PageIndicators {
    let document = Html::parse_document(html);
    let text = document.root_element().text().collect::<String>().to_lowercase();

    let has_listing_containers = document.select(&CONTAINER_SELECTOR).any(|el| {
        el.value()
            .attr("class")
            .is_some_and(|class| LISTING_CLASS_RE.is_match(class))
    });

    PageIndicators {
        has_brand: brand.matches(&text),
        has_listing_terms: text.contains("car") && (text.contains("buy") || text.contains("sell")),
        has_listing_containers,
    }
}

impl ListingClient {
    /// Checks whether `target` is reachable and looks like a listing page.
    ///
    /// Never fails: fetch errors are recorded in the report.
    pub async fn probe(&self, target: &LocationTarget, brand: &BrandFilter) -> ProbeReport {
        let mut report = ProbeReport {
            location: target.name.clone(),
            url: target.url.clone(),
            reachable: false,
            status: None,
            error: None,
            indicators: PageIndicators::default(),
        };

        match self.fetch(&target.url).await {
            Ok(page) => {
                report.reachable = true;
                report.status = Some(page.status);
                report.indicators = inspect_page(&page.body, brand);
                tracing::info!(
                    location = %target.name,
                    url = %target.url,
                    looks_valid = report.looks_valid(),
                    "probed target"
                );
            }
            Err(e) => {
                if let ScraperError::UnexpectedStatus { status, .. } = &e {
                    report.status = Some(*status);
                }
                tracing::warn!(location = %target.name, url = %target.url, error = %e, "target unreachable");
                report.error = Some(e.to_string());
            }
        }

        report
    }
}
