use crate::models::CompositeSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics of `value` for one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountrySummary {
    pub country: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Quantile of sorted values with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Compute per-country statistics, ordered by country label.
pub fn summarize(series: &CompositeSeries) -> Vec<CountrySummary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in &series.rows {
        groups.entry(r.country.as_str()).or_default().push(r.value);
    }

    let mut out = Vec::with_capacity(groups.len());
    for (country, mut vals) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let mean = vals.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let ss: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });
        out.push(CountrySummary {
            country: country.to_string(),
            count,
            mean,
            std,
            min: vals[0],
            q25: quantile(&vals, 0.25),
            median: quantile(&vals, 0.5),
            q75: quantile(&vals, 0.75),
            max: vals[count - 1],
        });
    }
    out
}
