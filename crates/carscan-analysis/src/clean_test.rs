use carscan_core::{RecordSource, PRICE_NOT_AVAILABLE};
use chrono::{DateTime, Utc};

use super::*;

fn filters() -> RangeFilters {
    RangeFilters::for_year(2024)
}

fn at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Drops the derived columns so a cleaned batch can be fed back to `clean`.
fn raw_columns(record: &CleanedRecord) -> ListingRecord {
    ListingRecord {
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
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    name: &str,
    price: &str,
    distance: &str,
    year: &str,
    fuel: &str,
    transmission: &str,
    location: &str,
    source: RecordSource,
) -> ListingRecord {
    ListingRecord {
        name: name.to_string(),
        price_raw: price.to_string(),
        distance_raw: distance.to_string(),
        year_raw: year.to_string(),
        fuel_type: fuel.to_string(),
        transmission: transmission.to_string(),
        location: location.to_string(),
        brand: "Maruti Suzuki".to_string(),
        source,
        scraped_at: at(),
    }
}

fn swift(location: &str) -> ListingRecord {
    listing(
        "Maruti Suzuki Swift",
        "₹500,000",
        "30,000 km",
        "2020",
        "Petrol",
        "Manual",
        location,
        RecordSource::Selector,
    )
}

// -- coercion ------------------------------------------------------------

#[test]
fn price_below_range_is_nulled() {
    assert_eq!(coerce_price("₹40,000", &filters()), None);
}

#[test]
fn price_in_range_is_kept() {
    assert_eq!(coerce_price("₹450,000", &filters()), Some(450_000.0));
}

#[test]
fn price_above_range_is_nulled_not_clamped() {
    assert_eq!(coerce_price("₹6 crore", &filters()), None);
}

#[test]
fn price_bare_number_fallback() {
    assert_eq!(coerce_price("325000", &filters()), Some(325_000.0));
}

#[test]
fn price_sentinel_is_null() {
    assert_eq!(coerce_price(PRICE_NOT_AVAILABLE, &filters()), None);
}

#[test]
fn distance_range_bounds() {
    assert_eq!(coerce_distance("0 km", &filters()), None);
    assert_eq!(coerce_distance("1 km", &filters()), Some(1.0));
    assert_eq!(coerce_distance("5,00,000 km", &filters()), Some(500_000.0));
    assert_eq!(coerce_distance("600000 km", &filters()), None);
}

#[test]
fn year_range_bounds() {
    assert_eq!(coerce_year("1989", &filters()), None);
    assert_eq!(coerce_year("1990", &filters()), Some(1990));
    assert_eq!(coerce_year("2024", &filters()), Some(2024));
    assert_eq!(coerce_year("2025", &filters()), None);
}

#[test]
fn year_first_occurrence_wins() {
    assert_eq!(
        coerce_year("Model 2019, Insurance valid till 2025", &filters()),
        Some(2019)
    );
}

// -- categorical closure -------------------------------------------------

#[test]
fn categorical_fields_always_closed() {
    let inputs = [
        ("Petrol", "Manual"),
        ("diesel", "AUTOMATIC"),
        ("Fuel type not available", "Transmission not available"),
        ("N/A", "N/A"),
        ("LPG", "Tiptronic"),
        ("", ""),
    ];
    for (fuel, transmission) in inputs {
        let record = listing(
            "Maruti Suzuki Alto",
            "₹300,000",
            "10,000 km",
            "2019",
            fuel,
            transmission,
            "Delhi",
            RecordSource::Selector,
        );
        let cleaned = clean_record(&record, &filters());
        assert!(
            FuelType::KNOWN.contains(&cleaned.fuel_type_clean)
                || cleaned.fuel_type_clean == FuelType::Unknown
        );
        assert!(matches!(
            cleaned.transmission_clean,
            Transmission::Manual | Transmission::Automatic | Transmission::Unknown
        ));
    }

    let unmapped = clean_record(
        &listing(
            "x",
            "",
            "",
            "",
            "LPG",
            "Tiptronic",
            "Delhi",
            RecordSource::Selector,
        ),
        &filters(),
    );
    assert_eq!(unmapped.fuel_type_clean, FuelType::Unknown);
    assert_eq!(unmapped.transmission_clean, Transmission::Unknown);
}

#[test]
fn location_and_model_are_derived() {
    let cleaned = clean_record(&swift("new delhi"), &filters());
    assert_eq!(cleaned.location_clean, "Delhi");
    assert_eq!(cleaned.model_clean, "Swift");
    assert_eq!(cleaned.location, "new delhi");
}

// -- batch cleaning ------------------------------------------------------

#[test]
fn error_records_are_removed() {
    let records = vec![
        swift("Delhi"),
        ListingRecord::extraction_failed("bad selector", "Delhi", "Maruti Suzuki", at()),
        listing(
            "Parse error placeholder",
            "₹300,000",
            "",
            "",
            "",
            "",
            "Pune",
            RecordSource::Selector,
        ),
    ];
    let outcome = clean(&records, &filters());
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.report.error_records_removed, 2);
}

#[test]
fn duplicates_are_removed_keeping_first() {
    let mut second = swift("Delhi");
    second.year_raw = "2015".to_string();
    let records = vec![swift("Delhi"), second, swift("Mumbai")];
    let outcome = clean(&records, &filters());
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.report.duplicates_removed, 1);
    assert_eq!(outcome.records[0].year_numeric, Some(2020));
}

#[test]
fn report_counts_cleaned_fields() {
    let records = vec![
        swift("Delhi"),
        listing(
            "Maruti Suzuki Car",
            PRICE_NOT_AVAILABLE,
            "KM not available",
            "Year not available",
            "Fuel type not available",
            "Transmission not available",
            "Pune",
            RecordSource::KeywordScan,
        ),
    ];
    let report = clean(&records, &filters()).report;
    assert_eq!(report.input_records, 2);
    assert_eq!(report.output_records, 2);
    assert_eq!(report.price_cleaned, 1);
    assert_eq!(report.distance_cleaned, 1);
    assert_eq!(report.year_cleaned, 1);
    assert_eq!(report.fuel_type_known, 1);
    assert_eq!(report.transmission_known, 1);
}

#[test]
fn cleaning_is_idempotent() {
    let records = vec![
        swift("Delhi"),
        swift("Delhi"),
        listing(
            "Maruti Suzuki Baleno",
            "5.5 lakh",
            "12000 kms",
            "Model 2019, Insurance valid till 2025",
            "cng",
            "amt",
            "bengaluru",
            RecordSource::Selector,
        ),
        listing(
            "Maruti Suzuki Alto",
            "₹40,000",
            "N/A",
            "1985",
            "LPG",
            "",
            "madras",
            RecordSource::DataAttribute,
        ),
    ];
    let first = clean(&records, &filters()).records;
    let raw_again = first.iter().map(raw_columns).collect::<Vec<_>>();
    let second = clean(&raw_again, &filters()).records;
    assert_eq!(first, second);
}

#[test]
#[allow(clippy::cast_precision_loss)]
fn scenario_batch() {
    let records = vec![
        swift("Delhi"),
        swift("Mumbai"),
        swift("Pune"),
        listing(
            "Maruti Suzuki Alto",
            "₹300,000",
            "20,000 km",
            "2019",
            "CNG",
            "Manual",
            "Delhi",
            RecordSource::Selector,
        ),
        ListingRecord::extraction_failed("timeout", "Delhi", "Maruti Suzuki", at()),
    ];
    let outcome = clean(&records, &filters());
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.report.error_records_removed, 1);

    let prices = outcome
        .records
        .iter()
        .filter_map(|r| r.price_numeric)
        .collect::<Vec<_>>();
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    assert!((mean - 450_000.0).abs() < 1e-6);
}
