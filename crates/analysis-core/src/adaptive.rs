//! Statistics helpers shared by the feature extractor and the ranker.

use serde::Serialize;

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Mean and sample standard deviation of one cross-sectional column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl ColumnStats {
    /// A column whose values are all identical reports that value as its mean
    /// and a zero deviation, without floating-point residue from summation.
    pub fn of(data: &[f64]) -> Self {
        match data.first() {
            None => Self::default(),
            Some(&first) if data.iter().all(|&x| x == first) => Self {
                mean: first,
                std_dev: 0.0,
            },
            Some(_) => Self {
                mean: mean(data),
                std_dev: std_dev(data),
            },
        }
    }

    /// Divisor used for standardization: `1.0` stands in for a zero deviation.
    pub fn divisor(&self) -> f64 {
        if self.std_dev == 0.0 {
            1.0
        } else {
            self.std_dev
        }
    }

    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.divisor()
    }
}

/// Standardize every value of `data` against the column's own statistics.
pub fn z_scores(data: &[f64]) -> (ColumnStats, Vec<f64>) {
    let stats = ColumnStats::of(data);
    let scores = data.iter().map(|&x| stats.z_score(x)).collect();
    (stats, scores)
}
