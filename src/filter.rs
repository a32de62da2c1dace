use crate::models::{CompositeSeries, YearRange};

/// Keep rows with `start_year <= year <= end_year`.
///
/// An inverted range simply matches nothing.
pub fn filter(series: &CompositeSeries, start_year: i32, end_year: i32) -> CompositeSeries {
    let range = YearRange::new(start_year, end_year);
    CompositeSeries::new(
        series
            .rows
            .iter()
            .filter(|r| range.contains(r.year))
            .cloned()
            .collect(),
    )
}

/// The full span of years present in `series`, or `None` when it is empty.
pub fn default_range(series: &CompositeSeries) -> Option<YearRange> {
    let min = series.rows.iter().map(|r| r.year).min()?;
    let max = series.rows.iter().map(|r| r.year).max()?;
    Some(YearRange::new(min, max))
}
