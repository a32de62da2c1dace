#![allow(dead_code)]

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wbi_climate::models::{CodeName, Entry, RawTable};
use wbi_climate::{FetchError, RemoteSource};

/// Build one raw API entry.
pub fn entry(indicator: &str, iso3: &str, date: &str, value: Value) -> Entry {
    Entry {
        indicator: CodeName {
            id: indicator.into(),
            value: "Dummy indicator".into(),
        },
        country: CodeName {
            id: iso3.chars().take(2).collect(),
            value: "Xland".into(),
        },
        countryiso3code: iso3.into(),
        date: date.into(),
        value: if value.is_null() { None } else { Some(value) },
        unit: None,
        obs_status: None,
        decimal: Some(1),
    }
}

/// Raw table with one entry per `(year, value)` pair.
pub fn table(indicator: &str, iso3: &str, rows: &[(i32, f64)]) -> RawTable {
    RawTable {
        entries: rows
            .iter()
            .map(|(y, v)| entry(indicator, iso3, &y.to_string(), Value::from(*v)))
            .collect(),
    }
}

/// Stub remote source: canned tables per country code, everything else fails.
/// Counts every query.
#[derive(Default)]
pub struct StubSource {
    tables: HashMap<String, RawTable>,
    calls: Cell<usize>,
    log: RefCell<Vec<(String, String, i32, i32)>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, country: &str, table: RawTable) -> Self {
        self.tables.insert(country.into(), table);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// (indicator, country, start, end) of every query so far.
    pub fn queries(&self) -> Vec<(String, String, i32, i32)> {
        self.log.borrow().clone()
    }
}

impl RemoteSource for StubSource {
    fn query(
        &self,
        indicator: &str,
        country: &str,
        start: i32,
        end: i32,
    ) -> Result<RawTable, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.log
            .borrow_mut()
            .push((indicator.into(), country.into(), start, end));
        match self.tables.get(country) {
            Some(t) => Ok(t.clone()),
            None => Err(FetchError::Status {
                url: format!("stub://{country}/{indicator}"),
                status: 503,
            }),
        }
    }
}

/// One API page body: `[meta, entries]`, or `[meta, null]` when `entries` is empty.
pub fn page_body(page: u32, pages: u32, entries: &[Entry]) -> Value {
    let meta = serde_json::json!({
        "page": page,
        "pages": pages,
        "per_page": "1000",
        "total": entries.len(),
    });
    if entries.is_empty() {
        serde_json::json!([meta, null])
    } else {
        serde_json::json!([meta, entries])
    }
}
