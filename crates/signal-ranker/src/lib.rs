//! Composite Ranking Module
//!
//! Cross-sectionally standardizes momentum, sentiment and volatility across a
//! watch-list and orders tickers by a weighted composite score.

pub mod ranker;
pub mod table;

pub use ranker::{CompositeRanker, RankingWeights, ScoringInputs};
pub use table::{CrossSectionStats, RankedRow, RankedTable};
