//! Reads the cached watch-list data layout.
//!
//! A data directory holds, per ticker, `<TICKER>_prices.csv` (date, adjusted
//! close, volume) and `<TICKER>_headlines.json` (array of news items). The
//! ticker list is a plain text file with one symbol per line.

use analysis_core::{Headline, PriceObservation, PriceSeries};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::TickerData;

const CLOSE_COLUMNS: &[&str] = &["adj close", "adj_close", "adjclose", "close"];
const VOLUME_COLUMNS: &[&str] = &["volume"];
const DATE_COLUMNS: &[&str] = &["date", "index"];

pub fn prices_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{}_prices.csv", symbol))
}

pub fn headlines_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{}_headlines.json", symbol))
}

/// Upper-cased, de-duplicated tickers in file order; blank lines are skipped.
pub fn parse_tickers(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    contents
        .lines()
        .map(|line| line.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

pub fn read_tickers(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ticker list: {:?}", path))?;
    Ok(parse_tickers(&contents))
}

/// Index of the first header matching a candidate, in candidate priority order.
///
/// A header also matches when it is a candidate followed by `_<suffix>`, which
/// is how flattened multi-ticker downloads name their columns (`Close_AAPL`).
fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|h| h == candidate)
            .or_else(|| {
                let prefix = format!("{}_", candidate);
                headers.iter().position(|h| h.starts_with(&prefix))
            })
    })
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let day = cell.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell?.trim().parse::<f64>().ok()
}

/// Parse a price history CSV into a validated [`PriceSeries`].
pub fn parse_price_csv<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let close_idx = find_column(&headers, CLOSE_COLUMNS)
        .ok_or_else(|| anyhow!("no close column among {:?}", headers))?;
    let volume_idx = find_column(&headers, VOLUME_COLUMNS);
    let date_idx = find_column(&headers, DATE_COLUMNS).unwrap_or(0);

    let mut observations = Vec::new();
    for (line, row) in rdr.records().enumerate() {
        let row = row.with_context(|| format!("Failed to parse CSV row {}", line + 1))?;
        let Some(date) = row.get(date_idx).and_then(parse_date) else {
            tracing::debug!("Dropping CSV row {}: unparseable date {:?}", line + 1, row.get(date_idx));
            continue;
        };

        observations.push(PriceObservation {
            date,
            adjusted_close: parse_number(row.get(close_idx)),
            volume: match volume_idx {
                Some(idx) => parse_number(row.get(idx)),
                None => Some(0.0),
            },
        });
    }

    observations.sort_by_key(|o| o.date);
    Ok(PriceSeries::new(observations)?)
}

pub fn load_price_csv(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    parse_price_csv(file).with_context(|| format!("Failed to load prices from {:?}", path))
}

/// Parse a JSON array of news items. Items that do not fit the headline schema are skipped.
pub fn parse_headlines(raw: &str) -> Result<Vec<Headline>> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(raw).context("headline file is not a JSON array")?;

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<Headline>(item) {
            Ok(headline) => Some(headline),
            Err(e) => {
                tracing::warn!("Skipping malformed headline #{}: {}", i, e);
                None
            }
        })
        .collect())
}

/// Headlines for one ticker. Any failure degrades to an empty list.
pub fn load_headlines(path: &Path) -> Vec<Headline> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("No headlines at {:?}: {}", path, e);
            return Vec::new();
        }
    };

    match parse_headlines(&raw) {
        Ok(headlines) => headlines,
        Err(e) => {
            tracing::warn!("Ignoring headlines in {:?}: {:#}", path, e);
            Vec::new()
        }
    }
}

/// Load everything cached for `symbol`. A missing or unreadable price file leaves `prices` empty.
pub fn load_ticker(data_dir: &Path, symbol: &str) -> TickerData {
    let path = prices_path(data_dir, symbol);
    let prices = if path.exists() {
        match load_price_csv(&path) {
            Ok(series) => Some(series),
            Err(e) => {
                tracing::warn!("Skipping prices for {}: {:#}", symbol, e);
                None
            }
        }
    } else {
        tracing::debug!("No cached prices for {} at {:?}", symbol, path);
        None
    };

    TickerData {
        symbol: symbol.to_string(),
        prices,
        headlines: load_headlines(&headlines_path(data_dir, symbol)),
    }
}

/// Load every ticker in `symbols` from `data_dir`, preserving order.
pub fn load_watchlist(data_dir: &Path, symbols: &[String]) -> Vec<TickerData> {
    symbols.iter().map(|s| load_ticker(data_dir, s)).collect()
}
