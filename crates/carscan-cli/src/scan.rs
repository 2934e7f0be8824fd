//! Sub-command handlers.
//!
//! Fetching, cleaning and summarizing never fail on bad data. Only a bad
//! targets file, an unbuildable HTTP client, or output I/O aborts a command.

use std::path::Path;

use carscan_analysis::{clean, summarize, AnalysisSummary, CleanOutcome, RangeFilters};
use carscan_core::{
    load_targets, AppConfig, BrandFilter, CleanedRecord, ListingRecord, TargetsFile,
};
use carscan_scraper::{FetchPipeline, ListingClient};

use crate::digest;
use crate::store::{
    load_csv_file, output_path, save_csv_file, save_json_file, CLEANED_LISTINGS_FILE,
    CLEANING_REPORT_FILE, RAW_LISTINGS_FILE, SUMMARY_FILE,
};

fn load_targets_file(config: &AppConfig, targets: Option<&Path>) -> anyhow::Result<TargetsFile> {
    let path = targets.unwrap_or(&config.targets_path);
    let file = load_targets(path)?;
    tracing::info!(
        path = %path.display(),
        locations = file.locations.len(),
        "loaded targets"
    );
    Ok(file)
}

/// Probe every target and print a reachability table.
///
/// # Errors
///
/// Returns an error if the targets file cannot be loaded or the HTTP client
/// cannot be built.
pub(crate) async fn run_probe(config: &AppConfig, targets: Option<&Path>) -> anyhow::Result<()> {
    let file = load_targets_file(config, targets)?;
    let client = ListingClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;
    let brand = BrandFilter::new(&config.brand);

    let mut reports = Vec::with_capacity(file.locations.len());
    for target in &file.locations {
        reports.push(client.probe(target, &brand).await);
    }

    print!("{}", digest::render_probe(&reports));
    Ok(())
}

/// Fetch all targets and write the raw listing CSV.
///
/// # Errors
///
/// Returns an error if the targets file cannot be loaded, the HTTP client
/// cannot be built, or the CSV cannot be written.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    targets: Option<&Path>,
) -> anyhow::Result<Vec<ListingRecord>> {
    let file = load_targets_file(config, targets)?;
    let records = scrape(config, &file).await?;
    save_csv_file(&output_path(&config.output_dir, RAW_LISTINGS_FILE), &records)?;
    Ok(records)
}

async fn scrape(config: &AppConfig, file: &TargetsFile) -> anyhow::Result<Vec<ListingRecord>> {
    let pipeline = FetchPipeline::from_config(config, &file.selectors)
        .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;
    let report = pipeline.run(&file.locations).await;
    print!("{}", digest::render_fetch(&report));
    Ok(report.records)
}

fn clean_batch(config: &AppConfig, records: &[ListingRecord]) -> anyhow::Result<CleanOutcome> {
    let outcome = clean(records, &RangeFilters::current());
    save_csv_file(
        &output_path(&config.output_dir, CLEANED_LISTINGS_FILE),
        &outcome.records,
    )?;
    save_json_file(
        &output_path(&config.output_dir, CLEANING_REPORT_FILE),
        &outcome.report,
    )?;
    print!("{}", digest::render_cleaning(&outcome.report));
    Ok(outcome)
}

/// Clean a raw listing CSV and write the cleaned CSV plus a cleaning report.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the outputs cannot be written.
pub(crate) fn run_clean(config: &AppConfig, input: Option<&Path>) -> anyhow::Result<()> {
    let default_input = output_path(&config.output_dir, RAW_LISTINGS_FILE);
    let records: Vec<ListingRecord> = load_csv_file(input.unwrap_or(&default_input))?;
    clean_batch(config, &records)?;
    Ok(())
}

fn analyze_batch(config: &AppConfig, records: &[CleanedRecord]) -> anyhow::Result<AnalysisSummary> {
    let summary = summarize(records, config.top_n);
    save_json_file(&output_path(&config.output_dir, SUMMARY_FILE), &summary)?;
    print!("{}", digest::render_summary(&summary));
    Ok(summary)
}

/// Summarize a cleaned listing CSV and write the JSON summary.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the summary cannot be written.
pub(crate) fn run_analyze(config: &AppConfig, input: Option<&Path>) -> anyhow::Result<()> {
    let default_input = output_path(&config.output_dir, CLEANED_LISTINGS_FILE);
    let records: Vec<CleanedRecord> = load_csv_file(input.unwrap_or(&default_input))?;
    analyze_batch(config, &records)?;
    Ok(())
}

/// Scrape, clean and analyze, writing every intermediate output.
///
/// # Errors
///
/// Same conditions as the individual stages.
pub(crate) async fn run_full(config: &AppConfig, targets: Option<&Path>) -> anyhow::Result<()> {
    let raw = run_scrape(config, targets).await?;
    let cleaned = clean_batch(config, &raw)?;
    analyze_batch(config, &cleaned.records)?;
    println!("outputs written to {}", config.output_dir.display());
    Ok(())
}
