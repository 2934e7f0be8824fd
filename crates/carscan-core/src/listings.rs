use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PRICE_NOT_AVAILABLE: &str = "Price not available";
pub const DISTANCE_NOT_AVAILABLE: &str = "KM not available";
pub const YEAR_NOT_AVAILABLE: &str = "Year not available";
pub const FUEL_NOT_AVAILABLE: &str = "Fuel type not available";
pub const TRANSMISSION_NOT_AVAILABLE: &str = "Transmission not available";

/// Placeholder for raw fields on records built from a failed extraction.
pub const NOT_APPLICABLE: &str = "N/A";
pub const CHECK_MANUALLY: &str = "Check manually";

/// Which strategy produced a record.
///
/// Serialized in kebab-case so CSV output reads `synthetic-fallback` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordSource {
    Selector,
    DataAttribute,
    KeywordScan,
    SyntheticFallback,
    SyntheticSample,
    Error,
}

impl RecordSource {
    /// Synthetic records are placeholders and never count as real data.
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::SyntheticFallback | Self::SyntheticSample)
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    /// Extracted from a live page and not an error.
    #[must_use]
    pub fn is_real(self) -> bool {
        !self.is_synthetic() && !self.is_error()
    }
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordSource::Selector => "selector",
            RecordSource::DataAttribute => "data-attribute",
            RecordSource::KeywordScan => "keyword-scan",
            RecordSource::SyntheticFallback => "synthetic-fallback",
            RecordSource::SyntheticSample => "synthetic-sample",
            RecordSource::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    #[serde(rename = "CNG")]
    Cng,
    Electric,
    Hybrid,
    Unknown,
}

impl FuelType {
    /// Every known fuel. `extract_fuel` matches their lowercase labels in this order.
    pub const KNOWN: [FuelType; 5] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Cng,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Cng => "CNG",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
            FuelType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
    Unknown,
}

impl Transmission {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automatic",
            Transmission::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Transmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single listing as scraped (or synthesized), before any cleaning.
///
/// Raw fields hold the text as found, or one of the `*_NOT_AVAILABLE`
/// sentinels when nothing was extracted. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub name: String,
    pub price_raw: String,
    pub distance_raw: String,
    pub year_raw: String,
    pub fuel_type: String,
    pub transmission: String,
    /// Target name the page was requested for.
    pub location: String,
    pub brand: String,
    pub source: RecordSource,
    pub scraped_at: DateTime<Utc>,
}

impl ListingRecord {
    /// Record standing in for a fragment whose extraction failed.
    #[must_use]
    pub fn extraction_failed(
        description: &str,
        location: &str,
        brand: &str,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: format!("Extraction failed: {description}"),
            price_raw: CHECK_MANUALLY.to_string(),
            distance_raw: NOT_APPLICABLE.to_string(),
            year_raw: NOT_APPLICABLE.to_string(),
            fuel_type: NOT_APPLICABLE.to_string(),
            transmission: NOT_APPLICABLE.to_string(),
            location: location.to_string(),
            brand: brand.to_string(),
            source: RecordSource::Error,
            scraped_at,
        }
    }
}

/// A [`ListingRecord`] plus the derived columns produced by cleaning.
///
/// Kept flat (no `#[serde(flatten)]`) so the `csv` crate can write it.
/// Reading a cleaned CSV back as [`ListingRecord`] ignores the extra columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub name: String,
    pub price_raw: String,
    pub distance_raw: String,
    pub year_raw: String,
    pub fuel_type: String,
    pub transmission: String,
    pub location: String,
    pub brand: String,
    pub source: RecordSource,
    pub scraped_at: DateTime<Utc>,
    pub price_numeric: Option<f64>,
    pub distance_numeric: Option<f64>,
    pub year_numeric: Option<i32>,
    pub fuel_type_clean: FuelType,
    pub transmission_clean: Transmission,
    pub location_clean: String,
    pub model_clean: String,
}

/// Case-insensitive brand scoping for listing names.
///
/// `"Maruti Suzuki"` yields the keywords `maruti` and `suzuki`; a name matches
/// when it contains any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandFilter {
    brand: String,
    keywords: Vec<String>,
}

impl BrandFilter {
    #[must_use]
    pub fn new(brand: &str) -> Self {
        let keywords = brand
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>();
        Self {
            brand: brand.trim().to_string(),
            keywords,
        }
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Name used when a listing carries no recognisable title.
    #[must_use]
    pub fn fallback_name(&self) -> String {
        format!("{} Car", self.brand)
    }
}
