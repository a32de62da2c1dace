use std::fs;
use wbi_climate::models::{CompositeSeries, Observation};
use wbi_climate::storage;

fn sample(n: usize) -> CompositeSeries {
    CompositeSeries::new(
        (0..n)
            .map(|i| Observation {
                year: 2000 + i as i32,
                value: 0.25 + i as f64,
                country: "Kenya".into(),
            })
            .collect(),
    )
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("co2.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("country,year,value"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    assert!(csv_txt.contains("Kenya,2000,0.25"));

    let json_path = dir.path().join("co2.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), rows.len());
    assert_eq!(arr[1]["year"], 2001);
    assert_eq!(arr[1]["country"], "Kenya");
}

// A country label like "=HYPERLINK(...)" would run as a formula when the CSV
// is opened in a spreadsheet; such cells get a leading single quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let data = CompositeSeries::new(vec![
        Observation {
            year: 2020,
            value: 1.0,
            country: "=HYPERLINK(\"http://evil\")".into(),
        },
        Observation {
            year: 2020,
            value: 2.0,
            country: "@foo".into(),
        },
    ]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("csv_injection.csv");
    storage::save_csv(&data, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let countries: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect();
    assert_eq!(countries.len(), 2);
    assert!(countries[0].starts_with('\''), "not prefixed: {}", countries[0]);
    assert!(countries[0].contains("=HYPERLINK"));
    assert_eq!(countries[1], "'@foo");
}
