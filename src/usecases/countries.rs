use std::{collections::HashSet, fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::country::{fallback_countries, Country};

const COUNTRIES_FALLBACK: &str = "COUNTRIES_FALLBACK";

pub trait CountrySource {
    fn load(&self) -> Result<Vec<Country>>;
}

/// A restcountries-style JSON dump on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCountrySource {
    path: PathBuf,
}

impl JsonFileCountrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    cca2: String,
    #[serde(default)]
    idd: Option<RawIdd>,
    #[serde(default)]
    flag: String,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RawIdd {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    suffixes: Option<Vec<String>>,
}

impl CountrySource for JsonFileCountrySource {
    fn load(&self) -> Result<Vec<Country>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let records: Vec<RawCountry> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        Ok(normalize(records))
    }
}

/// Drops records without dialling info, keeps the first of duplicate codes
/// and sorts by name.
fn normalize(records: Vec<RawCountry>) -> Vec<Country> {
    let mut seen = HashSet::new();
    let mut countries: Vec<Country> = records
        .into_iter()
        .filter_map(|record| {
            let idd = record.idd?;
            let root = idd.root.filter(|root| !root.is_empty())?;
            let suffixes = idd.suffixes?;
            let dial_code = match suffixes.first() {
                Some(suffix) => format!("{root}{suffix}"),
                None => root,
            };

            Some(Country {
                name: record.name.common,
                code: record.cca2,
                dial_code,
                flag: record.flag,
            })
        })
        .filter(|country| seen.insert(country.code.clone()))
        .collect();

    countries.sort_by(|a, b| a.name.cmp(&b.name));
    countries
}

/// Loads the directory, falling back to the built-in list on any failure or
/// when the source yields nothing.
pub fn load_countries(source: Option<&dyn CountrySource>) -> Vec<Country> {
    let Some(source) = source else {
        return fallback_countries();
    };

    match source.load() {
        Ok(countries) if !countries.is_empty() => countries,
        Ok(_) => {
            tracing::warn!(
                code = COUNTRIES_FALLBACK,
                "country directory is empty; using built-in list"
            );
            fallback_countries()
        }
        Err(error) => {
            tracing::warn!(
                code = COUNTRIES_FALLBACK,
                error = ?error,
                "failed to load country directory; using built-in list"
            );
            fallback_countries()
        }
    }
}
