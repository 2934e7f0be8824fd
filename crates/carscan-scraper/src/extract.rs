//! Field extractors: pure text-to-value functions shared by the record builder
//! and the cleaning stage.
//!
//! Every extractor returns the first match in document order, never the
//! largest or most plausible one. No match is `None`, never an error.

use std::sync::LazyLock;

use carscan_core::{FuelType, Transmission};
use regex::Regex;

/// Currency-prefixed amount with an optional lakh/crore unit.
static CURRENCY_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:₹|\brs\.?|\binr)\s*((?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d+)?)(?:\s*(lakh|lac|crore|cr)s?\b)?",
    )
    .expect("valid currency price regex")
});
static LAKH_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:lakh|lac)s?\b").expect("valid lakh price regex")
});
static CRORE_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:crore|cr)s?\b").expect("valid crore price regex")
});
static LABELED_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)price[ \t]*:[ \t]*(?:₹|rs\.?)?[ \t]*(\d[\d,]*)")
        .expect("valid labeled price regex")
});
static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3}(?:,\d{2,3})+|\d+)\s*(?:kms?\b|kilo)").expect("valid distance regex")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid year regex"));
static BARE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*₹?\s*(\d[\d,]*(?:\.\d+)?)\s*$").expect("valid bare number regex")
});

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

const TRANSMISSION_KEYWORDS: [(&str, Transmission); 4] = [
    ("automatic", Transmission::Automatic),
    ("manual", Transmission::Manual),
    ("amt", Transmission::Automatic),
    ("cvt", Transmission::Automatic),
];

/// Known model names, matched in this order.
pub const KNOWN_MODELS: [&str; 19] = [
    "Swift",
    "Baleno",
    "Dzire",
    "Alto",
    "Wagon R",
    "Celerio",
    "Ertiga",
    "Vitara Brezza",
    "S-Cross",
    "Ciaz",
    "Ignis",
    "S-Presso",
    "XL6",
    "Omni",
    "Eeco",
    "Gypsy",
    "Zen",
    "Esteem",
    "Versa",
];

pub const OTHER_MODEL: &str = "Other";

const LOCATION_ALIASES: [(&str, &str); 16] = [
    ("delhi", "Delhi"),
    ("new delhi", "Delhi"),
    ("ncr", "Delhi NCR"),
    ("delhi ncr", "Delhi NCR"),
    ("bengaluru", "Bangalore"),
    ("bangalore", "Bangalore"),
    ("madras", "Chennai"),
    ("chennai", "Chennai"),
    ("calcutta", "Kolkata"),
    ("kolkata", "Kolkata"),
    ("bombay", "Mumbai"),
    ("mumbai", "Mumbai"),
    ("hyderabad", "Hyderabad"),
    ("pune", "Pune"),
    ("ahmedabad", "Ahmedabad"),
    ("jaipur", "Jaipur"),
];

/// A matched value together with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub raw: String,
    pub value: T,
}

fn parse_grouped(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse::<f64>().ok()
}

fn unit_multiplier(unit: &str) -> f64 {
    match unit.to_ascii_lowercase().as_str() {
        "lakh" | "lac" => LAKH,
        "crore" | "cr" => CRORE,
        _ => 1.0,
    }
}

/// Extracts the first price in `text`, in rupees.
///
/// Patterns are tried in order: currency-prefixed amount, `<n> lakh`,
/// `<n> crore`, then `price: <n>`. Both `450,000` and `4,50,000` grouping are
/// accepted.
#[must_use]
pub fn extract_price(text: &str) -> Option<Extracted<f64>> {
    if let Some(caps) = CURRENCY_PRICE_RE.captures(text) {
        let base = parse_grouped(&caps[1])?;
        let multiplier = caps.get(2).map_or(1.0, |m| unit_multiplier(m.as_str()));
        return Some(Extracted {
            raw: caps[0].trim().to_string(),
            value: base * multiplier,
        });
    }

    for (pattern, multiplier) in [(&*LAKH_PRICE_RE, LAKH), (&*CRORE_PRICE_RE, CRORE)] {
        if let Some(caps) = pattern.captures(text) {
            let base = parse_grouped(&caps[1])?;
            return Some(Extracted {
                raw: caps[0].trim().to_string(),
                value: base * multiplier,
            });
        }
    }

    LABELED_PRICE_RE.captures(text).and_then(|caps| {
        let value = parse_grouped(caps[1].trim_end_matches(','))?;
        Some(Extracted {
            raw: caps[0].trim().to_string(),
            value,
        })
    })
}

/// Extracts the first odometer reading in kilometres. The raw form is
/// normalized to `"<digits> km"`.
#[must_use]
pub fn extract_distance(text: &str) -> Option<Extracted<f64>> {
    let caps = DISTANCE_RE.captures(text)?;
    let digits = &caps[1];
    Some(Extracted {
        raw: format!("{digits} km"),
        value: parse_grouped(digits)?,
    })
}

/// Extracts the first 19xx/20xx token, wherever it appears.
#[must_use]
pub fn extract_year(text: &str) -> Option<Extracted<i32>> {
    let m = YEAR_RE.find(text)?;
    Some(Extracted {
        raw: m.as_str().to_string(),
        value: m.as_str().parse().ok()?,
    })
}

#[must_use]
pub fn extract_fuel(text: &str) -> Option<FuelType> {
    let lower = text.to_lowercase();
    FuelType::KNOWN
        .into_iter()
        .find(|fuel| lower.contains(&fuel.label().to_ascii_lowercase()))
}

#[must_use]
pub fn extract_transmission(text: &str) -> Option<Transmission> {
    let lower = text.to_lowercase();
    TRANSMISSION_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, transmission)| *transmission)
}

/// Lowercase alphanumerics only, so `"Wagon-R"`, `"wagon r"` and `"WagonR"`
/// compare equal.
fn compact(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// First known model name found in `text`, or `"Other"`.
///
/// A model matches a run of whole words whose concatenation equals the model
/// with punctuation dropped, so `wagonr`, `Wagon R` and `Wagon-R` all match
/// "Wagon R" but `citizen` never matches "Zen".
#[must_use]
pub fn extract_model(text: &str) -> &'static str {
    let words = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>();
    KNOWN_MODELS
        .iter()
        .find(|model| matches_word_run(&words, &compact(model)))
        .copied()
        .unwrap_or(OTHER_MODEL)
}

fn matches_word_run(words: &[String], target: &str) -> bool {
    (0..words.len()).any(|start| {
        let mut joined = String::new();
        for word in &words[start..] {
            joined.push_str(word);
            if joined == target {
                return true;
            }
            if !target.starts_with(joined.as_str()) {
                return false;
            }
        }
        false
    })
}

/// Maps city aliases to a canonical name; anything else is title-cased.
#[must_use]
pub fn normalize_location(raw: &str) -> String {
    let key = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if key.is_empty() {
        return "Unknown".to_string();
    }

    let lower = key.to_lowercase();
    if let Some((_, canonical)) = LOCATION_ALIASES.iter().find(|(alias, _)| *alias == lower) {
        return (*canonical).to_string();
    }

    lower
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A plain number such as `"450000"` or `"4,50,000"`, optionally `₹`-prefixed.
#[must_use]
pub fn extract_bare_number(text: &str) -> Option<f64> {
    BARE_NUMBER_RE
        .captures(text)
        .and_then(|caps| parse_grouped(&caps[1]))
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
