use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Half-open millisecond interval `[min_ms, max_ms)` a randomized delay is
/// drawn from. `min_ms == max_ms` means a fixed delay; `0-0` disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange {
        min_ms: 0,
        max_ms: 0,
    };

    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.max_ms == 0
    }
}

impl std::fmt::Display for DelayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min_ms, self.max_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub targets_path: PathBuf,
    pub output_dir: PathBuf,
    /// Brand every listing is scoped to, e.g. `"Maruti Suzuki"`.
    pub brand: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Total GET attempts per location, including the first one.
    pub scraper_max_attempts: u32,
    pub scraper_retry_delay: DelayRange,
    pub scraper_fragment_delay: DelayRange,
    pub scraper_location_delay: DelayRange,
    pub scraper_max_fragments: usize,
    pub sample_size: usize,
    /// Append a synthetic sample dataset when a run produced no real listings.
    pub sample_on_empty: bool,
    pub top_n: usize,
}
