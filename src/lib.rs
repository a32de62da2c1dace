//! wbi_climate
//!
//! Retrieve World Bank indicator series (CO₂ emissions, population, ...) for one
//! or more countries, normalize them into a uniform `(year, value, country)`
//! shape, merge them and filter by year range. Pairs with the `wbi-climate` CLI.
//!
//! ### Pipeline
//! - [`fetcher::SeriesFetcher`] calls the remote API and never fails: every
//!   problem becomes a [`fetcher::FetchOutcome`]
//! - [`normalize::normalize`] reshapes and coerces raw entries, dropping bad rows
//! - [`cache::FetchCache`] memoizes normalized series per (country, indicator)
//! - [`merge::merge`] combines countries; only "nothing usable at all" is an error
//! - [`filter::filter`] / [`filter::default_range`] restrict the year span
//! - [`stats::summarize`] gives per-country descriptive statistics
//!
//! ### Example
//! ```no_run
//! use wbi_climate::{Client, FetchCache, Pipeline, SeriesFetcher, catalog};
//! use wbi_climate::models::{QueryRequest, YearRange};
//!
//! let cache = FetchCache::new(SeriesFetcher::new(Client::default()));
//! let mut pipeline = Pipeline::new(cache);
//! let result = pipeline.run(&QueryRequest {
//!     countries: vec![catalog::resolve_country("Kenya"), catalog::resolve_country("World")],
//!     indicator: "EN.ATM.CO2E.PC".into(),
//!     year_range: Some(YearRange::new(2010, 2020)),
//! })?;
//! for s in &result.summary {
//!     println!("{}: mean {:.2}", s.country, s.mean);
//! }
//! # Ok::<(), wbi_climate::error::PipelineError>(())
//! ```

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod stats;
pub mod storage;

pub use api::{Client, RemoteSource};
pub use cache::{CacheStore, FetchCache, MemoryStore};
pub use error::{FetchError, PipelineError};
pub use fetcher::{FetchOutcome, SeriesFetcher};
pub use models::{CompositeSeries, FetchKey, IndicatorSeries, Observation, QueryRequest, YearRange};
pub use pipeline::{Pipeline, QueryResult};
