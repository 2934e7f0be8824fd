//! Fetch pipeline: page fetch, locate, build, fallback, repeated per location.
//!
//! Runs strictly in sequence. The only suspension points are the retry
//! backoff inside [`ListingClient`] and the politeness pauses here.

use carscan_core::{AppConfig, BrandFilter, DelayRange, ListingRecord, LocationTarget, SelectorProfile};
use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::client::ListingClient;
use crate::error::ScraperError;
use crate::locate::ElementLocator;
use crate::rate_limit::polite_pause;
use crate::record::RecordBuilder;
use crate::synthetic::{fallback_record, sample_dataset};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub fragment_delay: DelayRange,
    pub location_delay: DelayRange,
    pub max_fragments: usize,
    pub sample_size: usize,
    /// Replace the batch with a synthetic sample when the whole run produced
    /// no real listings.
    pub sample_on_empty: bool,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fragment_delay: config.scraper_fragment_delay,
            location_delay: config.scraper_location_delay,
            max_fragments: config.scraper_max_fragments,
            sample_size: config.sample_size,
            sample_on_empty: config.sample_on_empty,
        }
    }
}

/// Per-location outcome, for logging and the CLI digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationReport {
    pub location: String,
    pub fetched: bool,
    pub fragments: usize,
    pub accepted: usize,
    pub errors: usize,
    pub fallback_used: bool,
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub records: Vec<ListingRecord>,
    pub locations: Vec<LocationReport>,
    /// Size of the synthetic sample that replaced the batch, or 0 when the
    /// batch holds real listings.
    pub sample_substituted: usize,
}

impl FetchReport {
    #[must_use]
    pub fn real_count(&self) -> usize {
        self.records.iter().filter(|r| r.source.is_real()).count()
    }
}

pub struct FetchPipeline {
    client: ListingClient,
    locator: ElementLocator,
    builder: RecordBuilder,
    settings: PipelineSettings,
}

impl FetchPipeline {
    #[must_use]
    pub fn new(
        client: ListingClient,
        selectors: &SelectorProfile,
        brand: BrandFilter,
        settings: PipelineSettings,
    ) -> Self {
        let locator = ElementLocator::new(&selectors.containers, &brand, settings.max_fragments);
        let builder = RecordBuilder::new(selectors, brand);
        Self {
            client,
            locator,
            builder,
            settings,
        }
    }

    /// Builds the pipeline from application config and the targets file's selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, selectors: &SelectorProfile) -> Result<Self, ScraperError> {
        let client = ListingClient::from_config(config)?;
        Ok(Self::new(
            client,
            selectors,
            BrandFilter::new(&config.brand),
            PipelineSettings::from_config(config),
        ))
    }

    /// Fetches and extracts every target, returning the combined batch.
    pub async fn fetch(&self, targets: &[LocationTarget]) -> Vec<ListingRecord> {
        self.run(targets).await.records
    }

    /// Like [`Self::fetch`] but also reports what happened per location.
    ///
    /// Never fails. A location that cannot be fetched or yields no accepted
    /// listing gets one synthetic fallback record. If the batch ends up with
    /// no real listing at all, it is replaced by a synthetic sample dataset,
    /// fallback and error records included.
    pub async fn run(&self, targets: &[LocationTarget]) -> FetchReport {
        let mut records = Vec::new();
        let mut locations = Vec::with_capacity(targets.len());

        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                polite_pause(self.settings.location_delay).await;
            }
            let (location_records, report) = self.fetch_location(target).await;
            records.extend(location_records);
            locations.push(report);
        }

        let real = records.iter().filter(|r| r.source.is_real()).count();
        let mut sample_substituted = 0;
        if real < 1 && self.settings.sample_on_empty {
            tracing::warn!(
                discarded = records.len(),
                sample_size = self.settings.sample_size,
                "no real listings extracted; substituting synthetic sample dataset"
            );
            records = sample_dataset(
                self.builder.brand(),
                self.settings.sample_size,
                Utc::now().year(),
                Utc::now(),
                &mut rand::rng(),
            );
            sample_substituted = records.len();
        }

        tracing::info!(
            locations = targets.len(),
            records = records.len(),
            real,
            sample_substituted,
            "fetch pipeline finished"
        );

        FetchReport {
            records,
            locations,
            sample_substituted,
        }
    }

    async fn fetch_location(&self, target: &LocationTarget) -> (Vec<ListingRecord>, LocationReport) {
        tracing::info!(location = %target.name, url = %target.url, "scraping location");

        let mut records = Vec::new();
        let mut fetched = false;
        let mut fragment_count = 0;

        match self.client.fetch_page(&target.url).await {
            Ok(html) => {
                fetched = true;
                let fragments = self.locator.locate(&html);
                fragment_count = fragments.len();
                tracing::debug!(location = %target.name, fragments = fragment_count, "located candidate listings");

                for (i, fragment) in fragments.iter().enumerate() {
                    if i > 0 {
                        polite_pause(self.settings.fragment_delay).await;
                    }
                    if let Some(record) = self.builder.build(fragment, &target.name) {
                        records.push(record);
                    }
                }
            }
            Err(e) => {
                tracing::error!(location = %target.name, url = %target.url, error = %e, "location failed");
            }
        }

        let errors = records.iter().filter(|r| r.source.is_error()).count();
        let accepted = records.len() - errors;
        let fallback_used = accepted == 0;
        if fallback_used {
            tracing::warn!(location = %target.name, "no listings extracted; using synthetic fallback");
            records.push(fallback_record(
                &target.name,
                self.builder.brand(),
                Utc::now().year(),
                Utc::now(),
                &mut rand::rng(),
            ));
        }

        let report = LocationReport {
            location: target.name.clone(),
            fetched,
            fragments: fragment_count,
            accepted,
            errors,
            fallback_used,
        };
        (records, report)
    }
}
