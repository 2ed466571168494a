//! Per-ticker signal assembly for a watch-list.
//!
//! Turns cached price histories and headlines into [`SignalRecord`]s, then
//! hands the full collection to the composite ranker.

use analysis_core::{AnalysisError, Headline, PriceSeries, SentimentScorer, SignalRecord};
use price_features::PriceFeatureExtractor;
use rayon::prelude::*;
use sentiment_analysis::{LexiconScorer, SentimentAggregator};
use signal_ranker::{CompositeRanker, RankedTable};

pub mod config;
pub mod loader;

pub use config::PipelineConfig;

/// Raw inputs for one ticker as delivered by the data layer.
#[derive(Debug, Clone, Default)]
pub struct TickerData {
    pub symbol: String,
    pub prices: Option<PriceSeries>,
    pub headlines: Vec<Headline>,
}

pub struct SignalPipeline<S = LexiconScorer> {
    extractor: PriceFeatureExtractor,
    aggregator: SentimentAggregator<S>,
    ranker: CompositeRanker,
    parallel: bool,
}

impl SignalPipeline<LexiconScorer> {
    pub fn new() -> Self {
        Self::with_scorer(LexiconScorer::new())
    }
}

impl<S: SentimentScorer> SignalPipeline<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self {
            extractor: PriceFeatureExtractor::new(),
            aggregator: SentimentAggregator::with_scorer(scorer),
            ranker: CompositeRanker::new(),
            parallel: true,
        }
    }

    pub fn with_ranker(mut self, ranker: CompositeRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Toggle parallel per-ticker extraction. Output is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Merge price features and headline sentiment for one ticker.
    pub fn build_record(
        &self,
        symbol: &str,
        prices: &PriceSeries,
        headlines: &[Headline],
    ) -> Result<SignalRecord, AnalysisError> {
        let features = self.extractor.extract(prices).map_err(|e| match e {
            AnalysisError::InsufficientData(msg) => {
                AnalysisError::InsufficientData(format!("{}: {}", symbol, msg))
            }
            other => other,
        })?;
        let sentiment = self.aggregator.aggregate(headlines);
        Ok(SignalRecord::new(features, sentiment, headlines.to_vec()))
    }

    fn record_for(&self, ticker: &TickerData) -> Option<(String, SignalRecord)> {
        let Some(prices) = ticker.prices.as_ref() else {
            tracing::debug!("No price history for {}, skipping", ticker.symbol);
            return None;
        };

        match self.build_record(&ticker.symbol, prices, &ticker.headlines) {
            Ok(record) => Some((ticker.symbol.clone(), record)),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", ticker.symbol, e);
                None
            }
        }
    }

    /// Build records for every usable ticker, in input order.
    pub fn build_records(&self, tickers: &[TickerData]) -> Vec<(String, SignalRecord)> {
        let records: Vec<(String, SignalRecord)> = if self.parallel {
            tickers
                .par_iter()
                .filter_map(|t| self.record_for(t))
                .collect()
        } else {
            tickers.iter().filter_map(|t| self.record_for(t)).collect()
        };

        tracing::info!(
            "Built signal records for {} of {} tickers",
            records.len(),
            tickers.len()
        );
        records
    }

    pub fn rank<'a>(
        &self,
        records: &'a [(String, SignalRecord)],
    ) -> Result<RankedTable<'a>, AnalysisError> {
        self.ranker.rank(records.iter().map(|(symbol, record)| (symbol, record)))
    }
}

impl Default for SignalPipeline<LexiconScorer> {
    fn default() -> Self {
        Self::new()
    }
}
