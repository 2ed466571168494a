use analysis_core::{adaptive, Headline, SentimentScorer, SentimentSummary};

pub mod lexicon;
pub use lexicon::LexiconScorer;

/// Averages per-headline compound sentiment using an injected scorer.
pub struct SentimentAggregator<S = LexiconScorer> {
    scorer: S,
}

impl SentimentAggregator<LexiconScorer> {
    pub fn new() -> Self {
        Self::with_scorer(LexiconScorer::new())
    }
}

impl<S: SentimentScorer> SentimentAggregator<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Compound score of one headline, clamped to `[-1, 1]`; non-finite output counts as neutral.
    pub fn score_headline(&self, headline: &Headline) -> f64 {
        let score = self.scorer.compound(&headline.scoring_text());
        if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Mean compound score and number of headlines scored. An empty list is `(0.0, 0)`.
    pub fn aggregate(&self, headlines: &[Headline]) -> SentimentSummary {
        if headlines.is_empty() {
            return SentimentSummary::default();
        }

        let scores: Vec<f64> = headlines.iter().map(|h| self.score_headline(h)).collect();

        SentimentSummary {
            average: adaptive::mean(&scores),
            count: scores.len(),
        }
    }
}

impl Default for SentimentAggregator<LexiconScorer> {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate headline sentiment with the bundled lexicon scorer.
pub fn aggregate_sentiment(headlines: &[Headline]) -> SentimentSummary {
    SentimentAggregator::new().aggregate(headlines)
}
