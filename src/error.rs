use thiserror::Error;

/// Everything that can go wrong talking to the remote API.
///
/// These never leave [`crate::fetcher::SeriesFetcher`]; they are kept inside
/// [`crate::fetcher::FetchOutcome::Failed`] for diagnostics.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("decode json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("world bank api error: {0}")]
    Api(String),
    #[error("page limit exceeded ({0})")]
    PageLimit(u32),
}

/// Errors that reach the consumer of the pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// No selected country contributed a single usable row.
    #[error("No data available for selected countries/indicator.")]
    NoUsableData { skipped: Vec<String> },
}
