//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! This module focuses on the `country/{code}/indicator/{code}` endpoint and returns
//! the raw entries of one (country, indicator) query as a [`RawTable`]. Pagination is
//! handled automatically.
//!
//! ### Notes
//! - The API sometimes serializes `per_page` as a **string**; we accept both string/number.
//! - A query with no observations comes back as `[meta, null]`; that is an empty table,
//!   not an error.
//! - Network timeouts use a sane default (30s) and can be adjusted through [`ClientConfig`].
//!
//! Typical usage:
//! ```no_run
//! # use wbi_climate::api::{Client, RemoteSource};
//! let client = Client::default();
//! let raw = client.query("EN.ATM.CO2E.PC", "KEN", 2010, 2020)?;
//! println!("{} entries", raw.entries.len());
//! # Ok::<(), wbi_climate::error::FetchError>(())
//! ```
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::models::{DateSpec, Entry, Meta, RawTable};
use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// The remote data source as an opaque capability.
///
/// `Client` talks to the real API; tests substitute stubs.
pub trait RemoteSource {
    /// Fetch every observation of `indicator` for `country` in `start..=end`.
    fn query(
        &self,
        indicator: &str,
        country: &str,
        start: i32,
        end: i32,
    ) -> Result<RawTable, FetchError>;
}

impl<S: RemoteSource + ?Sized> RemoteSource for &S {
    fn query(
        &self,
        indicator: &str,
        country: &str,
        start: i32,
        end: i32,
    ) -> Result<RawTable, FetchError> {
        (**self).query(indicator, country, start, end)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    max_pages: u32,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_config(&ClientConfig::default()).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

const PER_PAGE: u32 = 1000;

// Transient failures (5xx / network errors) are retried; the backoff applies
// between attempts, never after the last one.
const MAX_ATTEMPTS: usize = 3;
const RETRY_BACKOFF_MS: [u64; MAX_ATTEMPTS - 1] = [100, 300];

fn enc(code: &str) -> String {
    percent_encoding::utf8_percent_encode(code.trim(), SAFE).to_string()
}

/// Split one API page into its paging metadata and entries.
///
/// The API returns `[Meta, [Entry, ...]]`, `[Meta, null]` when nothing matches,
/// or a `message` object in position 0 on error.
pub fn parse_page(v: &Value) -> Result<(Meta, Vec<Entry>), FetchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| FetchError::Shape("not a top-level array".into()))?;
    if arr.is_empty() {
        return Err(FetchError::Shape("empty array".into()));
    }

    if arr[0].get("message").is_some() {
        return Err(FetchError::Api(arr[0].to_string()));
    }

    let meta: Meta = serde_json::from_value(arr[0].clone())?;
    let entries: Vec<Entry> = match arr.get(1) {
        Some(Value::Null) | None => vec![],
        Some(list) => serde_json::from_value(list.clone())?,
    };
    Ok((meta, entries))
}

impl Client {
    /// Build a client from explicit settings.
    pub fn with_config(cfg: &ClientConfig) -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .connect_timeout(cfg.connect_timeout)
            .redirect(Policy::limited(cfg.max_redirects))
            .user_agent(concat!("wbi_climate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.clone(),
            max_pages: cfg.max_pages,
            http,
        })
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut last_err: Option<FetchError> = None;
        for attempt in 0..MAX_ATTEMPTS {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    let body = r.text()?;
                    return Ok(serde_json::from_str(&body)?);
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(FetchError::Status {
                        url: url.to_string(),
                        status: r.status().as_u16(),
                    });
                }
                Ok(r) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: r.status().as_u16(),
                    });
                }
                Err(e) => last_err = Some(e.into()),
            }
            let Some(&backoff_ms) = RETRY_BACKOFF_MS.get(attempt) else {
                break;
            };
            debug!("GET {url} failed, retrying in {backoff_ms}ms");
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(last_err.unwrap_or_else(|| FetchError::Shape("no request attempted".into())))
    }
}

impl RemoteSource for Client {
    fn query(
        &self,
        indicator: &str,
        country: &str,
        start: i32,
        end: i32,
    ) -> Result<RawTable, FetchError> {
        let url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page={}&date={}",
            self.base_url,
            enc(country),
            enc(indicator),
            PER_PAGE,
            DateSpec::Range { start, end }.to_query_param()
        );

        // Paginate until we retrieved all pages.
        let mut page = 1u32;
        let mut out: Vec<Entry> = Vec::new();
        loop {
            if page > self.max_pages {
                return Err(FetchError::PageLimit(self.max_pages));
            }
            let page_url = format!("{}&page={}", url, page);
            let v = self.get_json(&page_url)?;
            let (meta, entries) = parse_page(&v)?;
            debug!(
                "GET {page_url}: page {}/{} with {} entries",
                meta.page,
                meta.pages,
                entries.len()
            );
            out.extend(entries);

            if page >= meta.pages {
                break;
            }
            page += 1;
        }

        Ok(RawTable { entries: out })
    }
}
