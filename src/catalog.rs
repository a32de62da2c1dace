//! Built-in selection lists for countries/aggregates and climate indicators.

use crate::models::CountrySelection;

/// (display name, API code)
pub const COUNTRIES: &[(&str, &str)] = &[
    ("World", "WLD"),
    ("Kenya", "KEN"),
    ("Uganda", "UGA"),
    ("Tanzania", "TZA"),
    ("United States", "USA"),
    ("South Africa", "ZAF"),
    ("India", "IND"),
    ("China", "CHN"),
    ("Brazil", "BRA"),
    ("Germany", "DEU"),
    ("France", "FRA"),
    ("United Kingdom", "GBR"),
    ("Canada", "CAN"),
    ("Australia", "AUS"),
    ("Japan", "JPN"),
    ("Mexico", "MEX"),
    ("Russia", "RUS"),
    ("Nigeria", "NGA"),
    ("Egypt", "EGY"),
    ("Argentina", "ARG"),
];

/// (display name, indicator id)
pub const INDICATORS: &[(&str, &str)] = &[
    ("CO₂ emissions (metric tons per capita)", "EN.ATM.CO2E.PC"),
    ("CO₂ emissions (kt)", "EN.ATM.CO2E.KT"),
    ("Forest area (% of land area)", "AG.LND.FRST.ZS"),
    ("PM2.5 air pollution (µg/m³)", "EN.ATM.PM25.MC.M3"),
    ("Total greenhouse gas emissions (kt CO₂e)", "EN.ATM.GHGT.KT.CE"),
    ("Renewable energy consumption (% of total)", "EG.FEC.RNEW.ZS"),
    ("Access to electricity (% of population)", "EG.ELC.ACCS.ZS"),
    ("Population, total", "SP.POP.TOTL"),
    ("Agricultural land (% of land area)", "AG.LND.AGRI.ZS"),
    ("Urban population (% of total)", "SP.URB.TOTL.IN.ZS"),
];

pub const DEFAULT_COUNTRIES: &[&str] = &["World", "Kenya"];

fn lookup<'a>(table: &'a [(&'a str, &'a str)], input: &str) -> Option<(&'a str, &'a str)> {
    let input = input.trim();
    table
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(input) || code.eq_ignore_ascii_case(input))
        .copied()
}

/// Resolve a display name or code to a selection.
///
/// Unknown input is passed through as a raw code labelled by itself; the
/// remote source decides whether it exists.
pub fn resolve_country(input: &str) -> CountrySelection {
    match lookup(COUNTRIES, input) {
        Some((name, code)) => CountrySelection::new(name, code),
        None => {
            let raw = input.trim();
            CountrySelection::new(raw, raw.to_ascii_uppercase())
        }
    }
}

/// Resolve an indicator display name or id to its id.
///
/// Unknown ids are upper-cased: the API echoes the canonical id and the
/// normalizer matches it exactly.
pub fn resolve_indicator(input: &str) -> String {
    match lookup(INDICATORS, input) {
        Some((_, code)) => code.to_string(),
        None => input.trim().to_ascii_uppercase(),
    }
}

/// Selections used when the caller does not pick any countries.
pub fn default_countries() -> Vec<CountrySelection> {
    DEFAULT_COUNTRIES.iter().map(|c| resolve_country(c)).collect()
}

/// Display label for a known indicator id.
pub fn indicator_name(code: &str) -> Option<&'static str> {
    INDICATORS
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(name, _)| *name)
}
