//! Cleaning: coercion to numeric and categorical normal forms, error removal,
//! and deduplication.

use std::collections::HashSet;

use carscan_core::{CleanedRecord, FuelType, ListingRecord, Transmission};
use carscan_scraper::extract::{
    extract_bare_number, extract_distance, extract_fuel, extract_model, extract_price,
    extract_transmission, extract_year, normalize_location,
};
use chrono::{Datelike, Utc};
use serde::Serialize;

/// Markers that flag a failed extraction in a record's name.
const ERROR_MARKERS: [&str; 3] = ["error", "failed", "check manually"];

/// Inclusive bounds a coerced value must fall within. Out-of-range values are
/// nulled, not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeFilters {
    pub price_min: f64,
    pub price_max: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    pub year_min: i32,
    pub year_max: i32,
}

impl RangeFilters {
    #[must_use]
    pub fn for_year(current_year: i32) -> Self {
        Self {
            price_min: 50_000.0,
            price_max: 5_000_000.0,
            distance_min: 1.0,
            distance_max: 500_000.0,
            year_min: 1990,
            year_max: current_year,
        }
    }

    /// Bounds with `year_max` set to this calendar year (UTC).
    #[must_use]
    pub fn current() -> Self {
        Self::for_year(Utc::now().year())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input_records: usize,
    pub error_records_removed: usize,
    pub duplicates_removed: usize,
    pub output_records: usize,
    pub price_cleaned: usize,
    pub distance_cleaned: usize,
    pub year_cleaned: usize,
    pub fuel_type_known: usize,
    pub transmission_known: usize,
}

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub records: Vec<CleanedRecord>,
    pub report: CleaningReport,
}

#[must_use]
pub fn coerce_price(raw: &str, filters: &RangeFilters) -> Option<f64> {
    extract_price(raw)
        .map(|p| p.value)
        .or_else(|| extract_bare_number(raw))
        .filter(|v| (filters.price_min..=filters.price_max).contains(v))
}

#[must_use]
pub fn coerce_distance(raw: &str, filters: &RangeFilters) -> Option<f64> {
    extract_distance(raw)
        .map(|d| d.value)
        .or_else(|| extract_bare_number(raw))
        .filter(|v| (filters.distance_min..=filters.distance_max).contains(v))
}

#[must_use]
pub fn coerce_year(raw: &str, filters: &RangeFilters) -> Option<i32> {
    extract_year(raw)
        .map(|y| y.value)
        .filter(|v| (filters.year_min..=filters.year_max).contains(v))
}

/// Derives the cleaned columns for a single record. Raw columns are copied
/// unchanged, so cleaning the output again gives the same result.
#[must_use]
pub fn clean_record(record: &ListingRecord, filters: &RangeFilters) -> CleanedRecord {
    CleanedRecord {
        name: record.name.clone(),
        price_raw: record.price_raw.clone(),
        distance_raw: record.distance_raw.clone(),
        year_raw: record.year_raw.clone(),
        fuel_type: record.fuel_type.clone(),
        transmission: record.transmission.clone(),
        location: record.location.clone(),
        brand: record.brand.clone(),
        source: record.source,
        scraped_at: record.scraped_at,
        price_numeric: coerce_price(&record.price_raw, filters),
        distance_numeric: coerce_distance(&record.distance_raw, filters),
        year_numeric: coerce_year(&record.year_raw, filters),
        fuel_type_clean: extract_fuel(&record.fuel_type).unwrap_or(FuelType::Unknown),
        transmission_clean: extract_transmission(&record.transmission)
            .unwrap_or(Transmission::Unknown),
        location_clean: normalize_location(&record.location),
        model_clean: extract_model(&record.name).to_string(),
    }
}

fn is_error_record(record: &ListingRecord) -> bool {
    if record.source.is_error() {
        return true;
    }
    let name = record.name.to_lowercase();
    ERROR_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Drops error records, deduplicates on `(name, price_raw, location)` keeping
/// the first occurrence, and derives the cleaned columns.
#[must_use]
pub fn clean(records: &[ListingRecord], filters: &RangeFilters) -> CleanOutcome {
    let mut report = CleaningReport {
        input_records: records.len(),
        ..CleaningReport::default()
    };

    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
    let mut cleaned = Vec::with_capacity(records.len());

    for record in records {
        if is_error_record(record) {
            report.error_records_removed += 1;
            continue;
        }
        if !seen.insert((
            record.name.as_str(),
            record.price_raw.as_str(),
            record.location.as_str(),
        )) {
            report.duplicates_removed += 1;
            continue;
        }
        cleaned.push(clean_record(record, filters));
    }

    report.output_records = cleaned.len();
    report.price_cleaned = cleaned.iter().filter(|r| r.price_numeric.is_some()).count();
    report.distance_cleaned = cleaned.iter().filter(|r| r.distance_numeric.is_some()).count();
    report.year_cleaned = cleaned.iter().filter(|r| r.year_numeric.is_some()).count();
    report.fuel_type_known = cleaned
        .iter()
        .filter(|r| r.fuel_type_clean != FuelType::Unknown)
        .count();
    report.transmission_known = cleaned
        .iter()
        .filter(|r| r.transmission_clean != Transmission::Unknown)
        .count();

    tracing::info!(
        input = report.input_records,
        errors_removed = report.error_records_removed,
        duplicates_removed = report.duplicates_removed,
        output = report.output_records,
        "cleaned listing batch"
    );

    CleanOutcome {
        records: cleaned,
        report,
    }
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
