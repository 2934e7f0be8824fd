pub mod app_config;
pub mod config;
pub mod listings;
pub mod targets;

pub use app_config::{AppConfig, DelayRange, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use listings::{
    BrandFilter, CleanedRecord, FuelType, ListingRecord, RecordSource, Transmission,
    CHECK_MANUALLY, DISTANCE_NOT_AVAILABLE, FUEL_NOT_AVAILABLE, NOT_APPLICABLE, PRICE_NOT_AVAILABLE,
    TRANSMISSION_NOT_AVAILABLE, YEAR_NOT_AVAILABLE,
};
pub use targets::{load_targets, parse_targets, LocationTarget, SelectorProfile, TargetsFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    TargetsFileParse(#[source] serde_yaml::Error),

    #[error("targets validation failed: {0}")]
    Validation(String),
}
