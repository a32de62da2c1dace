//! One query end to end: fetch (through the cache), merge, filter, summarize.
//!
//! Countries are fetched one after another; a slow country blocks the rest.

use crate::api::RemoteSource;
use crate::cache::{CacheStore, FetchCache, MemoryStore};
use crate::error::PipelineError;
use crate::filter::{default_range, filter};
use crate::merge::{Diagnostic, merge};
use crate::models::{CompositeSeries, FetchKey, QueryRequest, YearRange};
use crate::stats::{CountrySummary, summarize};
use log::info;

/// What the presentation layer receives.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Merged rows within `range`, ordered by year.
    pub data: CompositeSeries,
    /// The year range actually applied.
    pub range: YearRange,
    pub summary: Vec<CountrySummary>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct Pipeline<S, B = MemoryStore> {
    cache: FetchCache<S, B>,
}

impl<S: RemoteSource, B: CacheStore> Pipeline<S, B> {
    pub fn new(cache: FetchCache<S, B>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &FetchCache<S, B> {
        &self.cache
    }

    /// Run `req`. The only error is [`PipelineError::NoUsableData`]; a
    /// partial result carries per-country diagnostics instead.
    pub fn run(&mut self, req: &QueryRequest) -> Result<QueryResult, PipelineError> {
        let mut per_country = Vec::with_capacity(req.countries.len());
        for sel in &req.countries {
            let key = FetchKey::new(sel.code.as_str(), req.indicator.as_str());
            per_country.push((sel.name.clone(), self.cache.get_or_fetch(&key)));
        }

        let merged = merge(per_country)?;
        let range = match req.year_range {
            Some(r) => r,
            // merge never returns an empty dataset
            None => default_range(&merged.data).ok_or(PipelineError::NoUsableData {
                skipped: vec![],
            })?,
        };
        let data = filter(&merged.data, range.start, range.end);
        let summary = summarize(&data);
        info!(
            "{}: {} rows for {} countries in {}..={}",
            req.indicator,
            data.len(),
            summary.len(),
            range.start,
            range.end
        );

        Ok(QueryResult {
            data,
            range,
            summary,
            diagnostics: merged.diagnostics,
        })
    }
}
