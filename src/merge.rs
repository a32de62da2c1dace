//! Combine per-country series into one composite dataset.

use crate::error::PipelineError;
use crate::models::{CompositeSeries, IndicatorSeries, Observation, is_valid_year};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a country was left out of the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The normalized series had no rows.
    Empty,
    /// Rows were present but none had a usable year and value.
    NoUsableValues,
}

/// Per-country notice for a partial result. Not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    Skipped { country: String, reason: SkipReason },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Skipped {
                country,
                reason: SkipReason::Empty,
            } => write!(f, "No data for {country}. Skipping."),
            Diagnostic::Skipped {
                country,
                reason: SkipReason::NoUsableValues,
            } => write!(f, "No usable values for {country}. Skipping."),
        }
    }
}

/// Output of a successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub data: CompositeSeries,
    pub diagnostics: Vec<Diagnostic>,
}

/// Merge `(display_name, series)` pairs into one dataset ordered by year.
///
/// Countries without usable rows are skipped with a [`Diagnostic`]; rows keep
/// the concatenation order among equal years. If nothing survives the result
/// is [`PipelineError::NoUsableData`].
pub fn merge<I, N>(per_country: I) -> Result<Merged, PipelineError>
where
    I: IntoIterator<Item = (N, IndicatorSeries)>,
    N: Into<String>,
{
    let mut rows: Vec<Observation> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut skipped = Vec::new();

    for (name, series) in per_country {
        let name: String = name.into();
        if series.is_empty() {
            warn!("no data for {name}; skipping");
            skipped.push(name.clone());
            diagnostics.push(Diagnostic::Skipped {
                country: name,
                reason: SkipReason::Empty,
            });
            continue;
        }

        // Normalization already guarantees this; if rows are dropped here,
        // something upstream let bad data through.
        let total = series.len();
        let usable: Vec<Observation> = series
            .observations
            .into_iter()
            .filter(|o| o.value.is_finite() && is_valid_year(o.year))
            .map(|o| Observation {
                country: name.clone(),
                ..o
            })
            .collect();
        if usable.len() < total {
            warn!(
                "{name}: dropped {} normalized rows with invalid year or value",
                total - usable.len()
            );
        }
        if usable.is_empty() {
            skipped.push(name.clone());
            diagnostics.push(Diagnostic::Skipped {
                country: name,
                reason: SkipReason::NoUsableValues,
            });
            continue;
        }
        rows.extend(usable);
    }

    if rows.is_empty() {
        return Err(PipelineError::NoUsableData { skipped });
    }

    rows.sort_by_key(|o| o.year);
    Ok(Merged {
        data: CompositeSeries::new(rows),
        diagnostics,
    })
}
