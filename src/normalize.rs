//! Reshape raw API entries into a canonical [`IndicatorSeries`].
//!
//! Steps:
//! 1. `Empty` / `Failed` fetches give an empty series.
//! 2. Entries are flattened into one row per (country, date) with a column per
//!    indicator id seen in the response.
//! 3. If no row has a column for the expected indicator, the response has
//!    drifted from what we asked for: empty series.
//! 4. `date` becomes `year` (integer) and the indicator column becomes `value`
//!    (f64). Rows that fail coercion are dropped, never defaulted.
//!
//! Sparse series are fine; nothing is interpolated.

use crate::fetcher::FetchOutcome;
use crate::models::{Entry, IndicatorSeries, Observation, RawTable, is_valid_year};
use ahash::{AHashMap, AHashSet};
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// One flattened (country, date) row.
#[derive(Debug)]
struct FlatRow<'a> {
    country: &'a str,
    date: &'a str,
    columns: BTreeMap<&'a str, Option<&'a Value>>,
}

fn country_label(e: &Entry) -> &str {
    if e.countryiso3code.trim().is_empty() {
        e.country.id.as_str()
    } else {
        e.countryiso3code.as_str()
    }
}

fn flatten(raw: &RawTable) -> Vec<FlatRow<'_>> {
    let mut index: AHashMap<(&str, &str), usize> = AHashMap::new();
    let mut rows: Vec<FlatRow<'_>> = Vec::new();
    for e in &raw.entries {
        let key = (country_label(e), e.date.as_str());
        let i = *index.entry(key).or_insert_with(|| {
            rows.push(FlatRow {
                country: key.0,
                date: key.1,
                columns: BTreeMap::new(),
            });
            rows.len() - 1
        });
        // First reading wins; a later duplicate only replaces one that does
        // not coerce (e.g. a leading null).
        let slot = rows[i]
            .columns
            .entry(e.indicator.id.as_str())
            .or_insert(None);
        if (*slot).and_then(coerce_value).is_none() {
            *slot = e.value.as_ref();
        }
    }
    rows
}

/// Coerce a raw JSON value to a finite `f64`.
///
/// Numbers and numeric strings are accepted; null, NaN, infinities and
/// anything else are rejected.
pub fn coerce_value(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// Coerce a raw date string to a year within the valid window.
pub fn coerce_year(s: &str) -> Option<i32> {
    s.trim().parse::<i32>().ok().filter(|y| is_valid_year(*y))
}

/// Normalize one fetch result for `expected_indicator`. Never fails; the
/// result may be empty.
pub fn normalize(raw: &FetchOutcome, expected_indicator: &str) -> IndicatorSeries {
    let table = match raw {
        FetchOutcome::Data(t) => t,
        FetchOutcome::Empty | FetchOutcome::Failed(_) => return IndicatorSeries::empty(),
    };

    let rows = flatten(table);
    if !rows.iter().any(|r| r.columns.contains_key(expected_indicator)) {
        warn!(
            "response has no column for indicator {expected_indicator} ({} rows); treating as empty",
            rows.len()
        );
        return IndicatorSeries::empty();
    }

    let total = rows.len();
    let mut seen: AHashSet<i32> = AHashSet::new();
    let mut out: Vec<Observation> = Vec::with_capacity(total);
    for row in rows {
        let Some(year) = coerce_year(row.date) else {
            continue;
        };
        let Some(value) = row
            .columns
            .get(expected_indicator)
            .copied()
            .flatten()
            .and_then(coerce_value)
        else {
            continue;
        };
        if !seen.insert(year) {
            continue;
        }
        out.push(Observation {
            year,
            value,
            country: row.country.to_string(),
        });
    }
    out.sort_by_key(|o| o.year);

    if out.len() < total {
        debug!(
            "{expected_indicator}: kept {} of {total} rows after coercion",
            out.len()
        );
    }
    IndicatorSeries::new(out)
}
