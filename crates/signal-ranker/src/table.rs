use analysis_core::adaptive::ColumnStats;
use analysis_core::SignalRecord;
use serde::Serialize;

use crate::ranker::ScoringInputs;

/// Cross-sectional statistics used to standardize each scored column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CrossSectionStats {
    pub momentum_5: ColumnStats,
    pub headline_sentiment: ColumnStats,
    pub realized_vol_30: ColumnStats,
}

/// One ticker's position in a ranking pass.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow<'a> {
    pub symbol: &'a str,
    pub record: &'a SignalRecord,
    pub inputs: ScoringInputs,
    pub z_mom5: f64,
    pub z_sent: f64,
    pub z_vol: f64,
    pub score: f64,
}

/// Result of one ranking pass, sorted by descending score.
///
/// Built fresh on every call and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RankedTable<'a> {
    rows: Vec<RankedRow<'a>>,
    stats: CrossSectionStats,
}

impl<'a> RankedTable<'a> {
    pub(crate) fn new(rows: Vec<RankedRow<'a>>, stats: CrossSectionStats) -> Self {
        Self { rows, stats }
    }

    pub fn rows(&self) -> &[RankedRow<'a>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stats(&self) -> &CrossSectionStats {
        &self.stats
    }

    /// Highest-scoring `n` rows (all rows if fewer).
    pub fn top(&self, n: usize) -> &[RankedRow<'a>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn get(&self, symbol: &str) -> Option<&RankedRow<'a>> {
        self.rows.iter().find(|r| r.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Zero-based rank of `symbol`.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.rows.iter().map(|r| r.symbol)
    }
}

#[cfg(test)]
mod tests {
    use crate::CompositeRanker;
    use analysis_core::SignalRecord;

    fn records() -> Vec<(String, SignalRecord)> {
        [("AAPL", 0.03), ("MSFT", 0.01), ("TSLA", -0.04)]
            .iter()
            .map(|&(symbol, momentum_5)| {
                (
                    symbol.to_string(),
                    SignalRecord {
                        last_price: 10.0,
                        momentum_5,
                        realized_vol_30: 0.2,
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_lookup_helpers() {
        let records = records();
        let table = CompositeRanker::new()
            .rank(records.iter().map(|(s, r)| (s, r)))
            .unwrap();

        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(10).len(), 3);
        assert_eq!(table.top(1)[0].symbol, "AAPL");
        assert_eq!(table.position("tsla"), Some(2));
        assert!(table.get("MSFT").is_some());
        assert!(table.get("GOOG").is_none());
        assert_eq!(table.symbols().collect::<Vec<_>>(), vec!["AAPL", "MSFT", "TSLA"]);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_serializes_rows_with_record_fields() {
        let records = records();
        let table = CompositeRanker::new()
            .rank(records.iter().map(|(s, r)| (s, r)))
            .unwrap();

        let json = serde_json::to_value(&table).unwrap();
        let first = &json["rows"][0];
        assert_eq!(first["symbol"], "AAPL");
        assert_eq!(first["record"]["last_price"], 10.0);
        assert!(first["score"].is_number());
        assert!(json["stats"]["momentum_5"]["mean"].is_number());
    }
}
