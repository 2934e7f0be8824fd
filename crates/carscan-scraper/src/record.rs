//! Turns one located fragment into a [`ListingRecord`].

use carscan_core::{
    BrandFilter, ListingRecord, RecordSource, SelectorProfile, DISTANCE_NOT_AVAILABLE,
    FUEL_NOT_AVAILABLE, PRICE_NOT_AVAILABLE, TRANSMISSION_NOT_AVAILABLE, YEAR_NOT_AVAILABLE,
};
use chrono::{DateTime, Utc};

use crate::error::ExtractError;
use crate::extract::{
    extract_distance, extract_fuel, extract_price, extract_transmission, extract_year,
};
use crate::locate::RawFragment;

/// Names longer than this are treated as body text, not a title.
const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    brand: BrandFilter,
    name_selectors: Vec<String>,
    price_selectors: Vec<String>,
}

impl RecordBuilder {
    #[must_use]
    pub fn new(profile: &SelectorProfile, brand: BrandFilter) -> Self {
        Self {
            brand,
            name_selectors: profile.names.clone(),
            price_selectors: profile.prices.clone(),
        }
    }

    #[must_use]
    pub fn brand(&self) -> &BrandFilter {
        &self.brand
    }

    /// Builds a record stamped with the current time.
    ///
    /// Returns `None` when the listing belongs to another brand. Extraction
    /// failures come back as an error-tagged record, never as `None`.
    #[must_use]
    pub fn build(&self, fragment: &RawFragment, location: &str) -> Option<ListingRecord> {
        self.build_at(fragment, location, Utc::now())
    }

    #[must_use]
    pub fn build_at(
        &self,
        fragment: &RawFragment,
        location: &str,
        scraped_at: DateTime<Utc>,
    ) -> Option<ListingRecord> {
        match self.try_build(fragment, location, scraped_at) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(location, error = %e, "fragment extraction failed");
                Some(ListingRecord::extraction_failed(
                    &e.to_string(),
                    location,
                    self.brand.brand(),
                    scraped_at,
                ))
            }
        }
    }

    fn try_build(
        &self,
        fragment: &RawFragment,
        location: &str,
        scraped_at: DateTime<Utc>,
    ) -> Result<Option<ListingRecord>, ExtractError> {
        let name = self.extract_name(fragment)?;
        if let Some(name) = &name {
            if !self.brand.matches(name) {
                tracing::debug!(location, name = %name, "skipping listing from another brand");
                return Ok(None);
            }
        }

        let text = fragment.text();
        let price_raw = self.extract_price_raw(fragment)?;

        Ok(Some(ListingRecord {
            name: name.unwrap_or_else(|| self.brand.fallback_name()),
            price_raw: price_raw.unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string()),
            distance_raw: extract_distance(text)
                .map_or_else(|| DISTANCE_NOT_AVAILABLE.to_string(), |d| d.raw),
            year_raw: extract_year(text).map_or_else(|| YEAR_NOT_AVAILABLE.to_string(), |y| y.raw),
            fuel_type: extract_fuel(text)
                .map_or_else(|| FUEL_NOT_AVAILABLE.to_string(), |f| f.to_string()),
            transmission: extract_transmission(text)
                .map_or_else(|| TRANSMISSION_NOT_AVAILABLE.to_string(), |t| t.to_string()),
            location: location.to_string(),
            brand: self.brand.brand().to_string(),
            source: RecordSource::from(fragment.strategy()),
            scraped_at,
        }))
    }

    /// Name selectors first, then the first brand-bearing text line, then any heading.
    fn extract_name(&self, fragment: &RawFragment) -> Result<Option<String>, ExtractError> {
        for selector in &self.name_selectors {
            let first = fragment.select_texts(selector)?.into_iter().next();
            if let Some(name) = first.filter(|n| n.chars().count() < MAX_NAME_CHARS) {
                return Ok(Some(name));
            }
        }

        if let Some(line) = fragment.text().lines().find(|line| self.brand.matches(line)) {
            return Ok(Some(line.to_string()));
        }

        Ok(fragment.heading_texts().into_iter().next())
    }

    fn extract_price_raw(&self, fragment: &RawFragment) -> Result<Option<String>, ExtractError> {
        for selector in &self.price_selectors {
            let Some(text) = fragment.select_texts(selector)?.into_iter().next() else {
                continue;
            };
            if !text.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Some(price) = extract_price(&text) {
                return Ok(Some(price.raw));
            }
            let digits: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == ',')
                .collect();
            return Ok(Some(format!("₹{}", digits.trim_matches(','))));
        }

        Ok(extract_price(fragment.text()).map(|p| p.raw))
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
