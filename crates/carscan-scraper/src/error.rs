use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure while extracting fields from a single fragment.
///
/// Never propagated past the record builder; it becomes an error-tagged record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },
}
