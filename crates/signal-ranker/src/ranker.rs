//! Composite score ranking.

use std::collections::HashSet;

use analysis_core::{adaptive, AnalysisError, SignalRecord};
use serde::Serialize;

use crate::table::{CrossSectionStats, RankedRow, RankedTable};

/// Weights for the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    /// Weight for standardized 5-day momentum
    pub momentum_weight: f64,
    /// Weight for standardized headline sentiment
    pub sentiment_weight: f64,
    /// Penalty for standardized realized volatility (subtracted)
    pub volatility_weight: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            momentum_weight: 0.45,
            sentiment_weight: 0.35,
            volatility_weight: 0.20,
        }
    }
}

impl RankingWeights {
    pub fn score(&self, z_mom5: f64, z_sent: f64, z_vol: f64) -> f64 {
        self.momentum_weight * z_mom5 + self.sentiment_weight * z_sent
            - self.volatility_weight * z_vol
    }
}

/// The fixed set of numeric fields the ranker reads from a record.
///
/// Absent or non-finite values are filled with `0.0` before any statistic is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoringInputs {
    pub momentum_5: f64,
    pub momentum_20: f64,
    pub realized_vol_30: f64,
    pub headline_sentiment: f64,
    pub news_count: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl ScoringInputs {
    pub fn from_record(record: &SignalRecord) -> Self {
        Self {
            momentum_5: finite_or_zero(record.momentum_5),
            momentum_20: finite_or_zero(record.momentum_20),
            realized_vol_30: finite_or_zero(record.realized_vol_30),
            headline_sentiment: finite_or_zero(record.headline_sentiment.unwrap_or(0.0)),
            news_count: record.news_count.map_or(0.0, |n| n as f64),
        }
    }
}

/// Ranks tickers by composite score
pub struct CompositeRanker {
    weights: RankingWeights,
}

impl Default for CompositeRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeRanker {
    /// Create a new ranker with default weights
    pub fn new() -> Self {
        Self {
            weights: RankingWeights::default(),
        }
    }

    /// Create ranker with custom weights
    pub fn with_weights(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Rank `(ticker, record)` pairs by composite score, highest first.
    ///
    /// Equal scores keep their input order. The returned table borrows the
    /// records and the ticker names.
    pub fn rank<'a, K, I>(&self, records: I) -> Result<RankedTable<'a>, AnalysisError>
    where
        K: AsRef<str> + ?Sized + 'a,
        I: IntoIterator<Item = (&'a K, &'a SignalRecord)>,
    {
        let mut seen = HashSet::new();
        let mut entries: Vec<(&'a str, &'a SignalRecord, ScoringInputs)> = Vec::new();

        for (symbol, record) in records {
            let symbol = symbol.as_ref();
            if !seen.insert(symbol) {
                return Err(AnalysisError::InvalidData(format!(
                    "ticker {} appears more than once",
                    symbol
                )));
            }
            entries.push((symbol, record, ScoringInputs::from_record(record)));
        }

        if entries.is_empty() {
            return Err(AnalysisError::EmptyRanking);
        }

        let column = |pick: fn(&ScoringInputs) -> f64| -> Vec<f64> {
            entries.iter().map(|(_, _, inputs)| pick(inputs)).collect()
        };
        let (momentum_stats, z_mom5) =
            adaptive::z_scores(&column(|i: &ScoringInputs| i.momentum_5));
        let (sentiment_stats, z_sent) =
            adaptive::z_scores(&column(|i: &ScoringInputs| i.headline_sentiment));
        let (volatility_stats, z_vol) =
            adaptive::z_scores(&column(|i: &ScoringInputs| i.realized_vol_30));

        let mut rows: Vec<RankedRow<'a>> = entries
            .iter()
            .enumerate()
            .map(|(idx, &(symbol, record, inputs))| RankedRow {
                symbol,
                record,
                inputs,
                z_mom5: z_mom5[idx],
                z_sent: z_sent[idx],
                z_vol: z_vol[idx],
                score: self.weights.score(z_mom5[idx], z_sent[idx], z_vol[idx]),
            })
            .collect();

        // Stable: ties keep input order
        rows.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(RankedTable::new(
            rows,
            CrossSectionStats {
                momentum_5: momentum_stats,
                headline_sentiment: sentiment_stats,
                realized_vol_30: volatility_stats,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn record(momentum_5: f64, sentiment: f64, vol: f64) -> SignalRecord {
        SignalRecord {
            last_price: 100.0,
            momentum_5,
            realized_vol_30: vol,
            headline_sentiment: Some(sentiment),
            news_count: Some(1),
            ..Default::default()
        }
    }

    fn pairs(items: &[(&str, SignalRecord)]) -> Vec<(String, SignalRecord)> {
        items
            .iter()
            .map(|(s, r)| (s.to_string(), r.clone()))
            .collect()
    }

    fn rank(records: &[(String, SignalRecord)]) -> RankedTable<'_> {
        CompositeRanker::new()
            .rank(records.iter().map(|(s, r)| (s, r)))
            .unwrap()
    }

    #[test]
    fn test_two_ticker_scenario() {
        let records = pairs(&[("B", record(-0.10, -0.5, 0.3)), ("A", record(0.10, 0.5, 0.1))]);
        let table = rank(&records);

        let a = &table.rows()[0];
        assert_eq!(a.symbol, "A");
        assert!(a.z_mom5 > 0.0);
        assert!(a.z_sent > 0.0);
        assert!(a.z_vol < 0.0);
        assert!(a.score > table.rows()[1].score);

        assert_relative_eq!(table.stats().momentum_5.mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(table.stats().headline_sentiment.mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(table.stats().realized_vol_30.mean, 0.2, epsilon = 1e-12);

        // Each z is +-1/sqrt(2) with two symmetric tickers
        let half_root = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(a.z_mom5, half_root, epsilon = 1e-9);
        assert_relative_eq!(a.score, half_root, epsilon = 1e-9);
    }

    #[test]
    fn test_scores_non_increasing() {
        let records = pairs(&[
            ("AAPL", record(0.02, 0.1, 0.25)),
            ("MSFT", record(-0.01, 0.4, 0.18)),
            ("NVDA", record(0.08, -0.2, 0.55)),
            ("XOM", record(-0.03, -0.1, 0.22)),
            ("KO", record(0.00, 0.0, 0.12)),
        ]);
        let table = rank(&records);

        assert_eq!(table.len(), 5);
        for pair in table.rows().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_identical_inputs_score_zero_in_input_order() {
        let records = pairs(&[
            ("C", record(0.1, 0.1, 0.1)),
            ("A", record(0.1, 0.1, 0.1)),
            ("B", record(0.1, 0.1, 0.1)),
        ]);
        let table = rank(&records);

        let symbols: Vec<&str> = table.rows().iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["C", "A", "B"]);
        assert!(table.rows().iter().all(|r| r.score == 0.0));
        assert_eq!(table.stats().momentum_5.std_dev, 0.0);
    }

    #[test]
    fn test_ties_keep_input_order_among_others() {
        let records = pairs(&[
            ("LOW", record(-0.2, -0.5, 0.4)),
            ("TIE1", record(0.05, 0.2, 0.2)),
            ("HIGH", record(0.3, 0.6, 0.1)),
            ("TIE2", record(0.05, 0.2, 0.2)),
        ]);
        let table = rank(&records);

        let symbols: Vec<&str> = table.rows().iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["HIGH", "TIE1", "TIE2", "LOW"]);
    }

    #[test]
    fn test_single_ticker_is_neutral() {
        let records = pairs(&[("ONLY", record(0.07, 0.3, 0.5))]);
        let table = rank(&records);

        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.z_mom5, 0.0);
        assert_eq!(row.z_sent, 0.0);
        assert_eq!(row.z_vol, 0.0);
        assert_eq!(row.score, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<(String, SignalRecord)> = Vec::new();
        let result = CompositeRanker::new().rank(records.iter().map(|(s, r)| (s, r)));
        assert!(matches!(result, Err(AnalysisError::EmptyRanking)));
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let a = record(0.1, 0.1, 0.1);
        let b = record(0.2, 0.1, 0.1);
        let result = CompositeRanker::new().rank([("AAPL", &a), ("AAPL", &b)].iter().map(|(s, r)| (*s, *r)));
        assert!(matches!(result, Err(AnalysisError::InvalidData(_))));
    }

    #[test]
    fn test_missing_sentiment_defaults_to_zero() {
        let mut quiet = record(0.0, 0.0, 0.2);
        quiet.headline_sentiment = None;
        quiet.news_count = None;
        quiet.momentum_20 = f64::NAN;

        let inputs = ScoringInputs::from_record(&quiet);
        assert_eq!(inputs.headline_sentiment, 0.0);
        assert_eq!(inputs.news_count, 0.0);
        assert_eq!(inputs.momentum_20, 0.0);

        let records = pairs(&[("QUIET", quiet), ("LOUD", record(0.0, 0.8, 0.2))]);
        let table = rank(&records);
        assert_eq!(table.rows()[0].symbol, "LOUD");
        assert!(table.rows().iter().all(|r| r.score.is_finite()));
    }

    #[test]
    fn test_accepts_btree_map() {
        let mut map = BTreeMap::new();
        map.insert("MSFT".to_string(), record(0.05, 0.0, 0.2));
        map.insert("AAPL".to_string(), record(-0.05, 0.0, 0.2));

        let table = CompositeRanker::new().rank(&map).unwrap();
        assert_eq!(table.rows()[0].symbol, "MSFT");
    }

    #[test]
    fn test_custom_weights() {
        let momentum_only = RankingWeights {
            momentum_weight: 1.0,
            sentiment_weight: 0.0,
            volatility_weight: 0.0,
        };
        let records = pairs(&[
            ("CALM", record(-0.01, 0.9, 0.05)),
            ("FAST", record(0.04, -0.9, 0.9)),
        ]);

        let default_table = rank(&records);
        assert_eq!(default_table.rows()[0].symbol, "CALM");

        let table = CompositeRanker::with_weights(momentum_only)
            .rank(records.iter().map(|(s, r)| (s, r)))
            .unwrap();
        assert_eq!(table.rows()[0].symbol, "FAST");
    }

    #[test]
    fn test_records_are_not_modified() {
        let records = pairs(&[("A", record(0.1, 0.5, 0.1)), ("B", record(-0.1, -0.5, 0.3))]);
        let before = records.clone();
        let _table = rank(&records);
        assert_eq!(records, before);
    }
}
