use super::*;

// -- price ---------------------------------------------------------------

#[test]
fn price_with_rupee_symbol_and_western_grouping() {
    let price = extract_price("Swift VXI ₹450,000 fixed").unwrap();
    assert_eq!(price.raw, "₹450,000");
    assert!((price.value - 450_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_with_indian_grouping() {
    let price = extract_price("₹4,50,000").unwrap();
    assert!((price.value - 450_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_with_rs_prefix() {
    let price = extract_price("Rs. 3,25,000 onwards").unwrap();
    assert_eq!(price.raw, "Rs. 3,25,000");
    assert!((price.value - 325_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_currency_with_lakh_suffix_is_scaled() {
    let price = extract_price("₹4.5 Lakh").unwrap();
    assert!((price.value - 450_000.0).abs() < 1e-6);
}

#[test]
fn price_bare_lakh_pattern() {
    let price = extract_price("Now only 5.25 lakhs!").unwrap();
    assert_eq!(price.raw, "5.25 lakhs");
    assert!((price.value - 525_000.0).abs() < 1e-6);
}

#[test]
fn price_crore_pattern() {
    let price = extract_price("1.2 crore").unwrap();
    assert!((price.value - 12_000_000.0).abs() < 1e-6);
}

#[test]
fn price_labeled_pattern() {
    let price = extract_price("Price: 380000").unwrap();
    assert!((price.value - 380_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_label_requires_colon_on_the_same_line() {
    assert_eq!(
        extract_price("Maruti Suzuki Swift\nPrice\n75,000 km driven"),
        None
    );
    assert_eq!(extract_price("Price\n: 380000"), None);
    assert_eq!(extract_price("Price 380000"), None);
}

#[test]
fn price_label_allows_spaces_and_currency() {
    let price = extract_price("price :  Rs. 4,20,000").unwrap();
    assert!((price.value - 420_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_returns_first_match_not_largest() {
    let price = extract_price("EMI ₹9,999 | ₹5,00,000").unwrap();
    assert!((price.value - 9_999.0).abs() < f64::EPSILON);
}

#[test]
fn price_currency_pattern_wins_over_lakh_elsewhere() {
    let price = extract_price("Was 6 lakh, now ₹5,50,000").unwrap();
    assert!((price.value - 550_000.0).abs() < f64::EPSILON);
}

#[test]
fn price_absent() {
    assert_eq!(extract_price("Call for price"), None);
    assert_eq!(extract_price("Price not available"), None);
}

#[test]
fn price_small_value_is_extracted_unfiltered() {
    // Range filtering happens during cleaning, not extraction.
    let price = extract_price("₹40,000").unwrap();
    assert!((price.value - 40_000.0).abs() < f64::EPSILON);
}

// -- distance ------------------------------------------------------------

#[test]
fn distance_with_km_suffix() {
    let distance = extract_distance("45,000 km driven").unwrap();
    assert_eq!(distance.raw, "45,000 km");
    assert!((distance.value - 45_000.0).abs() < f64::EPSILON);
}

#[test]
fn distance_accepts_kms_and_kilo() {
    assert!((extract_distance("12000 KMs").unwrap().value - 12_000.0).abs() < f64::EPSILON);
    assert!(
        (extract_distance("30,500 kilometres").unwrap().value - 30_500.0).abs() < f64::EPSILON
    );
}

#[test]
fn distance_ignores_fuel_efficiency() {
    assert_eq!(extract_distance("22 kmpl mileage"), None);
}

#[test]
fn distance_first_match_wins() {
    let distance = extract_distance("2019 | 10,000 km | service at 20,000 km").unwrap();
    assert!((distance.value - 10_000.0).abs() < f64::EPSILON);
}

#[test]
fn distance_absent() {
    assert_eq!(extract_distance("KM not available"), None);
}

// -- year ----------------------------------------------------------------

#[test]
fn year_first_occurrence_wins() {
    let year = extract_year("Model 2019, Insurance valid till 2025").unwrap();
    assert_eq!(year.value, 2019);
    assert_eq!(year.raw, "2019");
}

#[test]
fn year_accepts_nineteen_hundreds() {
    assert_eq!(extract_year("Gypsy 1998").unwrap().value, 1998);
}

#[test]
fn year_ignores_longer_numbers() {
    assert_eq!(extract_year("Ref 120190"), None);
}

#[test]
fn year_absent() {
    assert_eq!(extract_year("no year here"), None);
}

// -- categorical ---------------------------------------------------------

#[test]
fn fuel_is_case_insensitive() {
    assert_eq!(extract_fuel("PETROL | Manual"), Some(FuelType::Petrol));
    assert_eq!(extract_fuel("cng kit fitted"), Some(FuelType::Cng));
}

#[test]
fn fuel_table_order_breaks_ties() {
    assert_eq!(extract_fuel("Diesel or Petrol"), Some(FuelType::Petrol));
    assert_eq!(extract_fuel("CNG / Electric"), Some(FuelType::Cng));
}

#[test]
fn every_known_fuel_label_is_detected() {
    for fuel in FuelType::KNOWN {
        assert_eq!(extract_fuel(&format!("2019 | {fuel} | Manual")), Some(fuel));
    }
}

#[test]
fn fuel_absent() {
    assert_eq!(extract_fuel("Fuel type not available"), None);
}

#[test]
fn transmission_variants() {
    assert_eq!(extract_transmission("Automatic"), Some(Transmission::Automatic));
    assert_eq!(extract_transmission("MANUAL"), Some(Transmission::Manual));
    assert_eq!(extract_transmission("AMT"), Some(Transmission::Automatic));
    assert_eq!(extract_transmission("CVT"), Some(Transmission::Automatic));
}

#[test]
fn transmission_table_order_breaks_ties() {
    assert_eq!(
        extract_transmission("manual and automatic variants"),
        Some(Transmission::Automatic)
    );
}

#[test]
fn transmission_absent() {
    assert_eq!(extract_transmission("Transmission not available"), None);
}

// -- model ---------------------------------------------------------------

#[test]
fn model_matches_known_names() {
    assert_eq!(extract_model("Maruti Suzuki Swift VXI"), "Swift");
    assert_eq!(extract_model("2018 Maruti Wagon R LXI"), "Wagon R");
    assert_eq!(extract_model("maruti wagonr"), "Wagon R");
    assert_eq!(extract_model("Vitara Brezza ZDI"), "Vitara Brezza");
    assert_eq!(extract_model("S Cross Zeta"), "S-Cross");
}

#[test]
fn model_list_order_breaks_ties() {
    assert_eq!(extract_model("Swift Dzire VDI"), "Swift");
}

#[test]
fn model_does_not_match_inside_other_words() {
    assert_eq!(extract_model("Owned by a senior citizen"), OTHER_MODEL);
    assert_eq!(extract_model("Anniversary edition"), OTHER_MODEL);
    assert_eq!(extract_model("Maruti Zen Estilo"), "Zen");
    assert_eq!(extract_model("Maruti XL6 Zeta"), "XL6");
    assert_eq!(extract_model("S-Presso VXI"), "S-Presso");
}

#[test]
fn model_unmatched_is_other() {
    assert_eq!(extract_model("Maruti Suzuki Car"), OTHER_MODEL);
}

// -- location ------------------------------------------------------------

#[test]
fn location_aliases_map_to_canonical_names() {
    assert_eq!(normalize_location("new delhi"), "Delhi");
    assert_eq!(normalize_location("  Bengaluru "), "Bangalore");
    assert_eq!(normalize_location("MADRAS"), "Chennai");
    assert_eq!(normalize_location("ncr"), "Delhi NCR");
}

#[test]
fn location_unmatched_is_title_cased() {
    assert_eq!(normalize_location("navi   mumbai"), "Navi Mumbai");
    assert_eq!(normalize_location("LUCKNOW"), "Lucknow");
}

#[test]
fn location_blank_is_unknown() {
    assert_eq!(normalize_location("   "), "Unknown");
}

// -- bare numbers --------------------------------------------------------

#[test]
fn bare_number_forms() {
    assert_eq!(extract_bare_number("450000"), Some(450_000.0));
    assert_eq!(extract_bare_number(" 4,50,000 "), Some(450_000.0));
    assert_eq!(extract_bare_number("₹450000"), Some(450_000.0));
    assert_eq!(extract_bare_number("12345.5"), Some(12_345.5));
}

#[test]
fn bare_number_rejects_mixed_text() {
    assert_eq!(extract_bare_number("about 450000"), None);
    assert_eq!(extract_bare_number("N/A"), None);
}
