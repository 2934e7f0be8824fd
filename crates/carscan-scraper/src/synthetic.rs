//! Synthetic listings used when live extraction yields nothing.
//!
//! Every generated record carries a synthetic [`RecordSource`], so downstream
//! stages can keep it out of "real" counts.

use carscan_core::{BrandFilter, FuelType, ListingRecord, RecordSource, Transmission};
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Model and showroom base price in rupees.
const MODEL_BASE_PRICES: [(&str, f64); 8] = [
    ("Swift", 400_000.0),
    ("Baleno", 500_000.0),
    ("Alto", 200_000.0),
    ("Wagon R", 300_000.0),
    ("Dzire", 450_000.0),
    ("Celerio", 350_000.0),
    ("Ertiga", 600_000.0),
    ("Vitara Brezza", 550_000.0),
];

/// Cities the sample dataset is spread across.
pub const SAMPLE_CITIES: [&str; 7] = [
    "Delhi",
    "Mumbai",
    "Bangalore",
    "Hyderabad",
    "Chennai",
    "Pune",
    "Kolkata",
];

const FUELS: [FuelType; 3] = [FuelType::Petrol, FuelType::Diesel, FuelType::Cng];
const TRANSMISSIONS: [Transmission; 2] = [Transmission::Manual, Transmission::Automatic];

const MIN_YEAR: i32 = 2015;
const MAX_YEAR: i32 = 2023;
const MIN_KM: u32 = 10_000;
const MAX_KM: u32 = 80_000;

const DEPRECIATION_PER_YEAR: f64 = 0.10;
const DEPRECIATION_PER_10K_KM: f64 = 0.05;
const RESIDUAL_FLOOR: f64 = 0.30;

/// Resale estimate: 10% off per year of age and 5% per 10 000 km, never
/// below 30% of `base_price`.
#[must_use]
pub fn depreciated_price(base_price: f64, age_years: i32, km: u32) -> f64 {
    let age_factor = f64::from(age_years.max(0)) * DEPRECIATION_PER_YEAR;
    let km_factor = f64::from(km) / 10_000.0 * DEPRECIATION_PER_10K_KM;
    let price = base_price * (1.0 - age_factor - km_factor);
    price.max(base_price * RESIDUAL_FLOOR)
}

/// `1234567` → `"1,234,567"`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn synthesize<R: Rng + ?Sized>(
    location: &str,
    brand: &BrandFilter,
    current_year: i32,
    source: RecordSource,
    scraped_at: DateTime<Utc>,
    rng: &mut R,
) -> ListingRecord {
    let (model, base_price) = MODEL_BASE_PRICES
        .choose(rng)
        .copied()
        .unwrap_or(MODEL_BASE_PRICES[0]);
    let year = rng.random_range(MIN_YEAR..=MAX_YEAR);
    let km = rng.random_range(MIN_KM..=MAX_KM);
    let price = depreciated_price(base_price, current_year - year, km);
    let fuel = FUELS.choose(rng).copied().unwrap_or(FuelType::Petrol);
    let transmission = TRANSMISSIONS
        .choose(rng)
        .copied()
        .unwrap_or(Transmission::Manual);

    ListingRecord {
        name: format!("{} {model}", brand.brand()),
        price_raw: format!("₹{}", group_thousands(price.round() as u64)),
        distance_raw: format!("{} km", group_thousands(u64::from(km))),
        year_raw: year.to_string(),
        fuel_type: fuel.to_string(),
        transmission: transmission.to_string(),
        location: location.to_string(),
        brand: brand.brand().to_string(),
        source,
        scraped_at,
    }
}

/// One plausible placeholder record for a location that yielded nothing.
#[must_use]
pub fn fallback_record<R: Rng + ?Sized>(
    location: &str,
    brand: &BrandFilter,
    current_year: i32,
    scraped_at: DateTime<Utc>,
    rng: &mut R,
) -> ListingRecord {
    synthesize(
        location,
        brand,
        current_year,
        RecordSource::SyntheticFallback,
        scraped_at,
        rng,
    )
}

/// `size` realistic records spread over [`SAMPLE_CITIES`].
#[must_use]
pub fn sample_dataset<R: Rng + ?Sized>(
    brand: &BrandFilter,
    size: usize,
    current_year: i32,
    scraped_at: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ListingRecord> {
    (0..size)
        .map(|_| {
            let city = SAMPLE_CITIES.choose(rng).copied().unwrap_or(SAMPLE_CITIES[0]);
            synthesize(
                city,
                brand,
                current_year,
                RecordSource::SyntheticSample,
                scraped_at,
                rng,
            )
        })
        .collect()
}
