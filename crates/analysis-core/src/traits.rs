/// Maps free text to a compound polarity in `[-1.0, 1.0]`.
///
/// Implementations must be deterministic for identical input. Any
/// `Fn(&str) -> f64` closure is a scorer, which keeps test doubles cheap.
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn compound(&self, text: &str) -> f64 {
        self(text)
    }
}
