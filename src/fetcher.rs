//! Fail-soft wrapper around a [`RemoteSource`].
//!
//! Whatever goes wrong remotely, callers get a [`FetchOutcome`] back; the
//! error is kept for diagnostics but nothing propagates.

use crate::api::RemoteSource;
use crate::config::default_fetch_window;
use crate::error::FetchError;
use crate::models::{RawTable, YearRange};
use log::{debug, warn};

/// Result of one remote fetch.
///
/// `Empty` and `Failed` mean the same thing downstream ("no data"); they are
/// kept apart so callers can report why.
#[derive(Debug)]
pub enum FetchOutcome {
    Data(RawTable),
    Empty,
    Failed(FetchError),
}

impl FetchOutcome {
    /// True for both `Empty` and `Failed`.
    pub fn is_empty(&self) -> bool {
        match self {
            FetchOutcome::Data(raw) => raw.is_empty(),
            FetchOutcome::Empty | FetchOutcome::Failed(_) => true,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Fetches one (country, indicator) pair over a fixed year window.
#[derive(Debug, Clone)]
pub struct SeriesFetcher<S> {
    source: S,
    window: YearRange,
}

impl<S: RemoteSource> SeriesFetcher<S> {
    /// Fetcher over the default window `1960..=current_year`.
    pub fn new(source: S) -> Self {
        Self::with_window(source, default_fetch_window())
    }

    pub fn with_window(source: S, window: YearRange) -> Self {
        Self { source, window }
    }

    pub fn window(&self) -> YearRange {
        self.window
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Query the remote source. Never fails: see [`FetchOutcome`].
    pub fn fetch(&self, country_code: &str, indicator_code: &str) -> FetchOutcome {
        let YearRange { start, end } = self.window;
        match self.source.query(indicator_code, country_code, start, end) {
            Ok(raw) if raw.is_empty() => {
                debug!("{country_code}/{indicator_code}: remote returned no entries");
                FetchOutcome::Empty
            }
            Ok(raw) => FetchOutcome::Data(raw),
            Err(e) => {
                warn!("{country_code}/{indicator_code}: fetch failed: {e}");
                FetchOutcome::Failed(e)
            }
        }
    }
}
