//! Short human-readable stdout digests for each sub-command.

use carscan_analysis::{AnalysisSummary, CleaningReport, NumericSummary};
use carscan_scraper::{FetchReport, ProbeReport};

/// Formats a rupee amount in lakh, e.g. `4.50L`.
fn lakh(value: f64) -> String {
    format!("{:.2}L", value / 100_000.0)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn render_probe(reports: &[ProbeReport]) -> String {
    let mut out = format!(
        "{:<16}{:<8}{:<7}{:<9}{:<11}{:<7}URL\n",
        "LOCATION", "STATUS", "BRAND", "LISTING", "CONTAINERS", "VALID"
    );
    for report in reports {
        let status = report
            .status
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        out.push_str(&format!(
            "{:<16}{:<8}{:<7}{:<9}{:<11}{:<7}{}\n",
            report.location,
            status,
            yes_no(report.indicators.has_brand),
            yes_no(report.indicators.has_listing_terms),
            yes_no(report.indicators.has_listing_containers),
            yes_no(report.looks_valid()),
            report.url,
        ));
    }
    let valid = reports.iter().filter(|r| r.looks_valid()).count();
    out.push_str(&format!("{valid}/{} targets look valid\n", reports.len()));
    out
}

pub(crate) fn render_fetch(report: &FetchReport) -> String {
    let mut out = format!(
        "{:<16}{:<9}{:<11}{:<10}{:<8}FALLBACK\n",
        "LOCATION", "FETCHED", "FRAGMENTS", "ACCEPTED", "ERRORS"
    );
    for location in &report.locations {
        out.push_str(&format!(
            "{:<16}{:<9}{:<11}{:<10}{:<8}{}\n",
            location.location,
            yes_no(location.fetched),
            location.fragments,
            location.accepted,
            location.errors,
            yes_no(location.fallback_used),
        ));
    }
    out.push_str(&format!(
        "{} records ({} real), {} from synthetic sample\n",
        report.records.len(),
        report.real_count(),
        report.sample_substituted,
    ));
    out
}

pub(crate) fn render_cleaning(report: &CleaningReport) -> String {
    format!(
        "cleaned {} -> {} records ({} error, {} duplicate removed); \
         price {}, distance {}, year {} parsed\n",
        report.input_records,
        report.output_records,
        report.error_records_removed,
        report.duplicates_removed,
        report.price_cleaned,
        report.distance_cleaned,
        report.year_cleaned,
    )
}

pub(crate) fn render_summary(summary: &AnalysisSummary) -> String {
    let counts = &summary.records;
    let mut out = format!(
        "records: {} total, {} real, {} synthetic{}\n",
        counts.total,
        counts.real,
        counts.synthetic,
        if counts.sample_data_used {
            " (statistics use sample data)"
        } else {
            ""
        },
    );
    out.push_str(&format!(
        "quality score: {:.2}%\n",
        summary.completeness.quality_score
    ));

    match &summary.price {
        NumericSummary::NoData => out.push_str("price: no data\n"),
        NumericSummary::Stats {
            mean,
            median,
            min,
            max,
            ..
        } => out.push_str(&format!(
            "price: mean {}, median {}, range {} - {} over {} listings\n",
            lakh(*mean),
            lakh(*median),
            lakh(*min),
            lakh(*max),
            summary.price.count(),
        )),
    }
    if let Some(mean) = summary.distance.mean() {
        out.push_str(&format!(
            "distance: mean {mean:.0} km over {} listings\n",
            summary.distance.count()
        ));
    }
    if let Some(range) = summary.year_range {
        out.push_str(&format!("years: {} - {}\n", range.min, range.max));
    }

    let segments = summary.price_segments;
    out.push_str(&format!(
        "segments: budget {}, mid-range {}, premium {}, luxury {}\n",
        segments.budget, segments.mid_range, segments.premium, segments.luxury,
    ));

    if !summary.top_models.is_empty() {
        let models = summary
            .top_models
            .iter()
            .map(|m| format!("{} ({})", m.name, m.count))
            .collect::<Vec<_>>();
        out.push_str(&format!("top models: {}\n", models.join(", ")));
    }
    if !summary.top_locations.is_empty() {
        let locations = summary
            .top_locations
            .iter()
            .map(|l| format!("{} ({})", l.name, l.count))
            .collect::<Vec<_>>();
        out.push_str(&format!("top locations: {}\n", locations.join(", ")));
    }
    if let Some(r) = summary.correlations.price_year {
        out.push_str(&format!("correlation price~year: {r:.3}\n"));
    }
    if let Some(r) = summary.correlations.price_distance {
        out.push_str(&format!("correlation price~distance: {r:.3}\n"));
    }
    out
}
