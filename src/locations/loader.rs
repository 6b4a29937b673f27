// 📥 Data Loader - CSV of store locations → StoreTable
// Accepts an http(s) URL or a local path; results cached per (locator, row limit)

use crate::cache::KeyedCache;
use crate::locations::table::StoreTable;
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Parse CSV content, lowercasing headers and keeping at most `nrows` rows
pub fn parse_csv<R: Read>(reader: R, nrows: Option<usize>) -> Result<StoreTable> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        if nrows.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let record = result.context("Failed to parse CSV row")?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(StoreTable::new(columns, rows))
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Fetch and parse without caching. Failures propagate to the caller.
pub fn fetch_table(locator: &str, nrows: Option<usize>) -> Result<StoreTable> {
    if is_remote(locator) {
        let response = reqwest::blocking::get(locator)
            .with_context(|| format!("Failed to fetch {}", locator))?
            .error_for_status()
            .with_context(|| format!("Bad response from {}", locator))?;
        parse_csv(response, nrows)
    } else {
        let file = std::fs::File::open(Path::new(locator))
            .with_context(|| format!("Failed to open CSV file {}", locator))?;
        parse_csv(file, nrows)
    }
}

// ============================================================================
// LOADER (process-lifetime cache)
// ============================================================================

/// Loads tables once per `(locator, nrows)` and reuses them afterwards
#[derive(Debug, Clone)]
pub struct LocationLoader {
    cache: KeyedCache<(String, Option<usize>), Arc<StoreTable>>,
}

impl Default for LocationLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationLoader {
    pub fn new() -> Self {
        Self {
            cache: KeyedCache::unbounded(),
        }
    }

    pub fn load(&mut self, locator: &str, nrows: Option<usize>) -> Result<Arc<StoreTable>> {
        let key = (locator.to_string(), nrows);
        let now = Utc::now();

        if let Some(table) = self.cache.get(&key, now) {
            debug!(locator, "location table served from cache");
            return Ok(table);
        }

        let table = Arc::new(fetch_table(locator, nrows)?);
        info!(locator, rows = table.len(), columns = table.columns.len(), "location table loaded");

        self.cache.insert(key, Arc::clone(&table), now);
        Ok(table)
    }

    pub fn cached_tables(&self) -> usize {
        self.cache.len()
    }
}
