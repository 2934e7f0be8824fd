//! Aggregate summary over a cleaned batch.
//!
//! Statistics are computed over the real records when the batch has any, and
//! over the synthetic records otherwise. Error records never reach this stage
//! because cleaning drops them.

use std::collections::{BTreeMap, HashMap};

use carscan_core::CleanedRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stats::{self, NumericSummary};

/// Upper bounds (inclusive) of the price segments, in rupees.
const BUDGET_MAX: f64 = 300_000.0;
const MID_RANGE_MAX: f64 = 500_000.0;
const PREMIUM_MAX: f64 = 700_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub total: usize,
    pub real: usize,
    pub synthetic: usize,
    /// Statistics below were computed over synthetic records.
    pub sample_data_used: bool,
    /// Records the statistics were computed over.
    pub analyzed: usize,
    /// Analyzed records with price, distance and year all present.
    pub complete: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completeness {
    pub price: f64,
    pub distance: f64,
    pub year: f64,
    /// Mean of the three ratios, as a percentage rounded to two decimals.
    pub quality_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub count: usize,
    pub mean_price: Option<f64>,
    pub mean_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriceSegments {
    /// Up to 3 lakh.
    pub budget: usize,
    /// Above 3 lakh, up to 5 lakh.
    pub mid_range: usize,
    /// Above 5 lakh, up to 7 lakh.
    pub premium: usize,
    /// Above 7 lakh.
    pub luxury: usize,
}

impl PriceSegments {
    fn add(&mut self, price: f64) {
        if price <= BUDGET_MAX {
            self.budget += 1;
        } else if price <= MID_RANGE_MAX {
            self.mid_range += 1;
        } else if price <= PREMIUM_MAX {
            self.premium += 1;
        } else {
            self.luxury += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlations {
    pub price_year: Option<f64>,
    pub price_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub generated_at: DateTime<Utc>,
    pub records: RecordCounts,
    pub completeness: Completeness,
    pub price: NumericSummary,
    pub distance: NumericSummary,
    pub year_range: Option<YearRange>,
    pub by_year: BTreeMap<i32, GroupMeans>,
    pub by_model: BTreeMap<String, GroupMeans>,
    pub by_location: BTreeMap<String, GroupMeans>,
    pub fuel_types: BTreeMap<String, usize>,
    pub transmissions: BTreeMap<String, usize>,
    pub top_locations: Vec<RankedCount>,
    pub top_models: Vec<RankedCount>,
    pub price_segments: PriceSegments,
    pub correlations: Correlations,
}

/// Summarizes a cleaned batch.
///
/// `top_n` caps the ranked location and model lists.
#[must_use]
pub fn summarize(records: &[CleanedRecord], top_n: usize) -> AnalysisSummary {
    summarize_at(records, top_n, Utc::now())
}

/// Like [`summarize`] with an explicit generation timestamp.
#[must_use]
pub fn summarize_at(
    records: &[CleanedRecord],
    top_n: usize,
    generated_at: DateTime<Utc>,
) -> AnalysisSummary {
    let real = records.iter().filter(|r| r.source.is_real()).collect::<Vec<_>>();
    let synthetic = records
        .iter()
        .filter(|r| r.source.is_synthetic())
        .collect::<Vec<_>>();

    let sample_data_used = real.is_empty() && !synthetic.is_empty();
    let analyzed = if real.is_empty() { &synthetic } else { &real };
    if sample_data_used {
        tracing::warn!(
            synthetic = synthetic.len(),
            "no real listings in batch; summarizing synthetic records"
        );
    }

    let prices = analyzed
        .iter()
        .filter_map(|r| r.price_numeric)
        .collect::<Vec<_>>();
    let distances = analyzed
        .iter()
        .filter_map(|r| r.distance_numeric)
        .collect::<Vec<_>>();
    let years = analyzed.iter().filter_map(|r| r.year_numeric).collect::<Vec<_>>();

    let complete = analyzed
        .iter()
        .filter(|r| {
            r.price_numeric.is_some() && r.distance_numeric.is_some() && r.year_numeric.is_some()
        })
        .count();

    let mut price_segments = PriceSegments::default();
    for price in &prices {
        price_segments.add(*price);
    }

    let summary = AnalysisSummary {
        generated_at,
        records: RecordCounts {
            total: records.len(),
            real: real.len(),
            synthetic: synthetic.len(),
            sample_data_used,
            analyzed: analyzed.len(),
            complete,
        },
        completeness: completeness(analyzed.len(), prices.len(), distances.len(), years.len()),
        price: stats::summarize(&prices),
        distance: stats::summarize(&distances),
        year_range: year_range(&years),
        by_year: group_means(analyzed, |r| r.year_numeric),
        by_model: group_means(analyzed, |r| Some(r.model_clean.clone())),
        by_location: group_means(analyzed, |r| Some(r.location_clean.clone())),
        fuel_types: distribution(analyzed, |r| r.fuel_type_clean.label().to_string()),
        transmissions: distribution(analyzed, |r| r.transmission_clean.label().to_string()),
        top_locations: top_counts(analyzed, top_n, |r| r.location_clean.as_str()),
        top_models: top_counts(analyzed, top_n, |r| r.model_clean.as_str()),
        price_segments,
        correlations: Correlations {
            price_year: stats::pearson(&paired(analyzed, |r| {
                r.year_numeric.map(f64::from)
            })),
            price_distance: stats::pearson(&paired(analyzed, |r| r.distance_numeric)),
        },
    };

    tracing::info!(
        total = summary.records.total,
        analyzed = summary.records.analyzed,
        quality_score = summary.completeness.quality_score,
        sample_data_used,
        "summarized listing batch"
    );

    summary
}

#[allow(clippy::cast_precision_loss)]
fn completeness(total: usize, price: usize, distance: usize, year: usize) -> Completeness {
    let ratio = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };
    let (price, distance, year) = (ratio(price), ratio(distance), ratio(year));
    let score = (price + distance + year) / 3.0 * 100.0;
    Completeness {
        price,
        distance,
        year,
        quality_score: (score * 100.0).round() / 100.0,
    }
}

fn year_range(years: &[i32]) -> Option<YearRange> {
    let min = years.iter().min()?;
    let max = years.iter().max()?;
    Some(YearRange {
        min: *min,
        max: *max,
    })
}

fn group_means<K, F>(records: &[&CleanedRecord], key: F) -> BTreeMap<K, GroupMeans>
where
    K: Ord,
    F: Fn(&CleanedRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, (usize, Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in records {
        let Some(k) = key(record) else { continue };
        let entry = groups.entry(k).or_default();
        entry.0 += 1;
        if let Some(price) = record.price_numeric {
            entry.1.push(price);
        }
        if let Some(distance) = record.distance_numeric {
            entry.2.push(distance);
        }
    }

    groups
        .into_iter()
        .map(|(k, (count, prices, distances))| {
            (
                k,
                GroupMeans {
                    count,
                    mean_price: stats::mean(&prices),
                    mean_distance: stats::mean(&distances),
                },
            )
        })
        .collect()
}

fn distribution<F>(records: &[&CleanedRecord], label: F) -> BTreeMap<String, usize>
where
    F: Fn(&CleanedRecord) -> String,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(label(record)).or_insert(0) += 1;
    }
    counts
}

/// Most frequent values, count descending then name ascending.
fn top_counts<'a, F>(records: &[&'a CleanedRecord], n: usize, key: F) -> Vec<RankedCount>
where
    F: Fn(&'a CleanedRecord) -> &'a str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(key(*record)).or_insert(0) += 1;
    }

    let mut ranked = counts
        .into_iter()
        .map(|(name, count)| RankedCount {
            name: name.to_string(),
            count,
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}

/// `(other, price)` pairs where both values are present.
fn paired<F>(records: &[&CleanedRecord], other: F) -> Vec<(f64, f64)>
where
    F: Fn(&CleanedRecord) -> Option<f64>,
{
    records
        .iter()
        .filter_map(|r| Some((other(r)?, r.price_numeric?)))
        .collect()
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
