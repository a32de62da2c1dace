use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Earliest year the World Bank publishes indicator data for.
pub const MIN_YEAR: i32 = 1960;

/// The current calendar year (UTC); upper bound for valid observations.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Whether `year` lies in the valid observation window `[MIN_YEAR, current_year()]`.
pub fn is_valid_year(year: i32) -> bool {
    (MIN_YEAR..=current_year()).contains(&year)
}

/// How to specify dates in API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpec {
    /// Single year like 2020
    Year(i32),
    /// Inclusive range like 2000..=2020
    Range { start: i32, end: i32 },
}

impl DateSpec {
    pub fn to_query_param(&self) -> String {
        match *self {
            DateSpec::Year(y) => y.to_string(),
            DateSpec::Range { start, end } => format!("{}:{}", start, end),
        }
    }
}

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative or oversized value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// Raw entry from the API (position 1 array).
///
/// `value` is kept as untyped JSON: the normalizer decides what coerces to a
/// number and what gets dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub indicator: CodeName,
    pub country: CodeName,
    #[serde(default)]
    pub countryiso3code: String,
    pub date: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(rename = "obs_status", default)]
    pub obs_status: Option<String>,
    #[serde(default)]
    pub decimal: Option<i32>,
}

/// Every entry returned for one remote query, across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub entries: Vec<Entry>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One normalized row: a single (year, value) reading for a country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub value: f64,
    pub country: String,
}

/// Normalized series for one `(country, indicator)` pair.
///
/// Years are unique and values finite; see [`crate::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub observations: Vec<Observation>,
}

impl IndicatorSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }
}

/// Merged multi-country dataset. Rows carry the country display label and are
/// ordered by year ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeSeries {
    pub rows: Vec<Observation>,
}

impl CompositeSeries {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct country labels in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.rows {
            if !out.contains(&r.country.as_str()) {
                out.push(r.country.as_str());
            }
        }
        out
    }
}

/// Cache identity: two fetches with the same key are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FetchKey {
    pub country_code: String,
    pub indicator_code: String,
}

impl FetchKey {
    pub fn new(country_code: impl Into<String>, indicator_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            indicator_code: indicator_code.into(),
        }
    }
}

/// Inclusive year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// A country as the user picked it: display label plus API code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySelection {
    pub name: String,
    pub code: String,
}

impl CountrySelection {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// The caller's intent for one query.
///
/// `year_range: None` means "use the full span present in the merged data".
/// `start <= end` is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub countries: Vec<CountrySelection>,
    pub indicator: String,
    pub year_range: Option<YearRange>,
}
