//! Price feature extraction: momentum, realized volatility and volume
//! features from one ticker's daily price history.

use analysis_core::{AnalysisError, PriceFeatures, PriceSeries};
use statrs::statistics::Statistics;

/// Trading days per year, used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Short momentum lookback in rows.
pub const SHORT_MOMENTUM_PERIOD: usize = 5;
/// Long momentum lookback in rows.
pub const LONG_MOMENTUM_PERIOD: usize = 20;
/// Rows averaged for `avg_volume`.
pub const VOLUME_WINDOW: usize = 30;

pub struct PriceFeatureExtractor;

impl PriceFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Simple `period`-row returns aligned with `prices`.
    ///
    /// The first `period` entries have no prior value and are `None`, as is
    /// any entry whose prior price is zero.
    fn calculate_returns(&self, prices: &[f64], period: usize) -> Vec<Option<f64>> {
        prices
            .iter()
            .enumerate()
            .map(|(t, &price)| {
                let prior = *prices.get(t.checked_sub(period)?)?;
                if prior == 0.0 {
                    None
                } else {
                    Some(price / prior - 1.0)
                }
            })
            .collect()
    }

    /// Annualized sample standard deviation of the defined daily returns.
    fn calculate_volatility(&self, daily_returns: &[Option<f64>]) -> f64 {
        let defined: Vec<f64> = daily_returns.iter().flatten().copied().collect();
        if defined.len() < 2 {
            return 0.0;
        }

        let vol = defined.std_dev() * TRADING_DAYS_PER_YEAR.sqrt();
        if vol.is_finite() {
            vol
        } else {
            0.0
        }
    }

    /// Most recent `period`-row return, `0.0` unless the series is longer than `period`.
    fn calculate_momentum(&self, prices: &[f64], period: usize) -> f64 {
        if prices.len() <= period {
            return 0.0;
        }
        self.calculate_returns(prices, period)
            .last()
            .copied()
            .flatten()
            .unwrap_or(0.0)
    }

    fn calculate_avg_volume(&self, volumes: &[f64]) -> f64 {
        if volumes.is_empty() {
            return 0.0;
        }
        let start = volumes.len().saturating_sub(VOLUME_WINDOW);
        volumes[start..].mean()
    }

    pub fn extract(&self, series: &PriceSeries) -> Result<PriceFeatures, AnalysisError> {
        let (prices, volumes): (Vec<f64>, Vec<f64>) = series.clean_rows().into_iter().unzip();

        let (Some(&last_price), Some(&volume_latest)) = (prices.last(), volumes.last()) else {
            return Err(AnalysisError::InsufficientData(format!(
                "no usable price rows out of {}",
                series.len()
            )));
        };

        let daily_returns = self.calculate_returns(&prices, 1);

        Ok(PriceFeatures {
            last_price,
            momentum_5: self.calculate_momentum(&prices, SHORT_MOMENTUM_PERIOD),
            momentum_20: self.calculate_momentum(&prices, LONG_MOMENTUM_PERIOD),
            realized_vol_30: self.calculate_volatility(&daily_returns),
            avg_volume: self.calculate_avg_volume(&volumes),
            volume_latest,
        })
    }
}

impl Default for PriceFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract price features with the default extractor.
pub fn compute_price_signals(series: &PriceSeries) -> Result<PriceFeatures, AnalysisError> {
    PriceFeatureExtractor::new().extract(series)
}
