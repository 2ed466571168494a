use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Upper bound on rows shown in the ranked table.
pub const MAX_TOP_N: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub tickers_file: PathBuf,   // tickers.txt
    pub data_dir: PathBuf,       // data
    pub top_n: usize,            // 7
    pub parallel: bool,          // true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tickers_file: PathBuf::from("tickers.txt"),
            data_dir: PathBuf::from("data"),
            top_n: 7,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            tickers_file: lookup("WATCHLIST_TICKERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tickers_file),
            data_dir: lookup("WATCHLIST_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            top_n: lookup("WATCHLIST_TOP_N")
                .unwrap_or_else(|| defaults.top_n.to_string())
                .trim()
                .parse()
                .context("WATCHLIST_TOP_N must be a positive integer")?,
            parallel: lookup("WATCHLIST_PARALLEL")
                .unwrap_or_else(|| defaults.parallel.to_string())
                .trim()
                .parse()
                .context("WATCHLIST_PARALLEL must be true or false")?,
        })
    }

    /// Rows to display for a watch-list of `ticker_count` names.
    pub fn effective_top_n(&self, ticker_count: usize) -> usize {
        let upper = MAX_TOP_N.min(ticker_count).max(1);
        self.top_n.clamp(1, upper)
    }
}
