//! Client and fetch-window settings.
//!
//! Defaults match the public World Bank endpoint; the CLI overrides them from
//! flags.

use crate::models::{MIN_YEAR, YearRange, current_year};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Total request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirects: usize,
    /// Safety cap to avoid pathological jobs.
    pub max_pages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 5,
            max_pages: 1000,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The year window requested from the remote source for every fetch:
/// `1960..=current_year`.
pub fn default_fetch_window() -> YearRange {
    YearRange::new(MIN_YEAR, current_year())
}
