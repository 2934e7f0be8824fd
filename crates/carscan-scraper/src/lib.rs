pub mod client;
pub mod error;
pub mod extract;
pub mod locate;
pub mod pipeline;
pub mod rate_limit;
pub mod record;
pub mod synthetic;

pub use client::{inspect_page, FetchedPage, ListingClient, PageIndicators, ProbeReport};
pub use error::{ExtractError, ScraperError};
pub use locate::{ElementLocator, LocateStrategy, RawFragment};
pub use pipeline::{FetchPipeline, FetchReport, LocationReport, PipelineSettings};
pub use record::RecordBuilder;
