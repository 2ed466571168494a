use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::AnalysisError;

/// One daily row of a price history. A `None` or non-finite field marks the row as missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub adjusted_close: Option<f64>,
    pub volume: Option<f64>,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, adjusted_close: f64, volume: f64) -> Self {
        Self {
            date,
            adjusted_close: Some(adjusted_close),
            volume: Some(volume),
        }
    }

    /// Returns `(adjusted_close, volume)` when both fields are present and finite.
    pub fn usable(&self) -> Option<(f64, f64)> {
        match (self.adjusted_close, self.volume) {
            (Some(close), Some(volume)) if close.is_finite() && volume.is_finite() => {
                Some((close, volume))
            }
            _ => None,
        }
    }
}

/// Daily price history for one ticker, ordered by strictly increasing date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    /// Validates ordering and volume sign. Rows with missing values are kept
    /// here and dropped by the feature extractor.
    pub fn new(observations: Vec<PriceObservation>) -> Result<Self, AnalysisError> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidData(format!(
                    "dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(bad) = observations
            .iter()
            .find(|o| matches!(o.volume, Some(v) if v < 0.0))
        {
            return Err(AnalysisError::InvalidData(format!(
                "negative volume on {}",
                bad.date
            )));
        }

        Ok(Self { observations })
    }

    /// Builds a series of consecutive calendar days starting at `start`.
    pub fn from_closes(
        start: NaiveDate,
        closes: &[f64],
        volume: f64,
    ) -> Result<Self, AnalysisError> {
        let observations = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PriceObservation::new(date, close, volume))
            .collect();
        Self::new(observations)
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Usable `(adjusted_close, volume)` rows in their original order.
    pub fn clean_rows(&self) -> Vec<(f64, f64)> {
        self.observations
            .iter()
            .filter_map(PriceObservation::usable)
            .collect()
    }
}

/// News headline as delivered by the news provider. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "publishedAt", deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Headline {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Title and description joined with ". ", missing parts treated as empty.
    pub fn scoring_text(&self) -> String {
        format!(
            "{}. {}",
            self.title.as_deref().unwrap_or(""),
            self.description.as_deref().unwrap_or("")
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Other(IgnoredAny),
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a
/// bare date. Anything else becomes `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(naive) = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Text(raw)) => parse_timestamp(&raw),
        _ => None,
    })
}

/// Per-ticker features derived from the price history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceFeatures {
    pub last_price: f64,
    pub momentum_5: f64,
    pub momentum_20: f64,
    pub realized_vol_30: f64,
    pub avg_volume: f64,
    pub volume_latest: f64,
}

/// Averaged compound sentiment over a headline list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub average: f64,
    pub count: usize,
}

/// Everything known about one ticker before ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub last_price: f64,
    pub momentum_5: f64,
    pub momentum_20: f64,
    pub realized_vol_30: f64,
    pub avg_volume: f64,
    pub volume_latest: f64,
    #[serde(default)]
    pub headline_sentiment: Option<f64>,
    #[serde(default)]
    pub news_count: Option<usize>,
    #[serde(default)]
    pub headlines: Vec<Headline>,
}

impl SignalRecord {
    pub fn new(price: PriceFeatures, sentiment: SentimentSummary, headlines: Vec<Headline>) -> Self {
        Self {
            headline_sentiment: Some(sentiment.average),
            news_count: Some(sentiment.count),
            headlines,
            ..Self::from_price(price)
        }
    }

    /// Record without any news information.
    pub fn from_price(price: PriceFeatures) -> Self {
        Self {
            last_price: price.last_price,
            momentum_5: price.momentum_5,
            momentum_20: price.momentum_20,
            realized_vol_30: price.realized_vol_30,
            avg_volume: price.avg_volume,
            volume_latest: price.volume_latest,
            headline_sentiment: None,
            news_count: None,
            headlines: Vec::new(),
        }
    }

    pub fn price_features(&self) -> PriceFeatures {
        PriceFeatures {
            last_price: self.last_price,
            momentum_5: self.momentum_5,
            momentum_20: self.momentum_20,
            realized_vol_30: self.realized_vol_30,
            avg_volume: self.avg_volume,
            volume_latest: self.volume_latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let obs = vec![
            PriceObservation::new(day(1), 10.0, 100.0),
            PriceObservation::new(day(1), 11.0, 100.0),
        ];
        assert!(matches!(PriceSeries::new(obs), Err(AnalysisError::InvalidData(_))));
    }

    #[test]
    fn test_series_rejects_negative_volume() {
        let obs = vec![PriceObservation::new(day(1), 10.0, -1.0)];
        assert!(matches!(PriceSeries::new(obs), Err(AnalysisError::InvalidData(_))));
    }

    #[test]
    fn test_clean_rows_drop_missing_and_keep_order() {
        let obs = vec![
            PriceObservation::new(day(1), 10.0, 100.0),
            PriceObservation { date: day(2), adjusted_close: None, volume: Some(5.0) },
            PriceObservation { date: day(3), adjusted_close: Some(f64::NAN), volume: Some(5.0) },
            PriceObservation { date: day(4), adjusted_close: Some(12.0), volume: None },
            PriceObservation::new(day(5), 13.0, 300.0),
        ];
        let series = PriceSeries::new(obs).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.clean_rows(), vec![(10.0, 100.0), (13.0, 300.0)]);
    }

    #[test]
    fn test_scoring_text_handles_missing_fields() {
        let h = Headline::default();
        assert_eq!(h.scoring_text(), ". ");

        let h = Headline {
            title: Some("Shares rally".to_string()),
            description: Some("Record quarter".to_string()),
            ..Default::default()
        };
        assert_eq!(h.scoring_text(), "Shares rally. Record quarter");
    }

    #[test]
    fn test_headline_deserializes_news_schema() {
        let raw = r#"{
            "title": "Apple beats estimates",
            "description": null,
            "source": "Reuters",
            "publishedAt": "2024-03-01T14:30:00Z",
            "url": "https://example.com/a"
        }"#;
        let h: Headline = serde_json::from_str(raw).unwrap();
        assert_eq!(h.title.as_deref(), Some("Apple beats estimates"));
        assert!(h.description.is_none());
        assert_eq!(h.source.as_deref(), Some("Reuters"));
        assert!(h.published_at.is_some());
    }

    #[test]
    fn test_headline_tolerates_loose_timestamps() {
        let raw = r#"[
            {"title": "a", "publishedAt": "2024-01-03T12:00:00"},
            {"title": "b", "publishedAt": "2024-01-03"},
            {"title": "c", "publishedAt": "last tuesday"},
            {"title": "d", "publishedAt": 1704283200}
        ]"#;
        let items: Vec<Headline> = serde_json::from_str(raw).unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(
            items[0].published_at.map(|ts| ts.to_rfc3339()),
            Some("2024-01-03T12:00:00+00:00".to_string())
        );
        assert_eq!(
            items[1].published_at.map(|ts| ts.to_rfc3339()),
            Some("2024-01-03T00:00:00+00:00".to_string())
        );
        assert!(items[2].published_at.is_none());
        assert!(items[3].published_at.is_none());
        assert_eq!(items[3].title.as_deref(), Some("d"));
    }

    #[test]
    fn test_record_merges_sentiment() {
        let price = PriceFeatures { last_price: 98.0, momentum_5: -0.02, ..Default::default() };
        let record = SignalRecord::new(
            price,
            SentimentSummary { average: 0.25, count: 2 },
            vec![Headline::with_title("a"), Headline::with_title("b")],
        );
        assert_eq!(record.headline_sentiment, Some(0.25));
        assert_eq!(record.news_count, Some(2));
        assert_eq!(record.price_features(), price);
    }
}
