//! Statistical summaries of evaluation episodes

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary of a set of captured episode lengths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Mean absolute deviation from the mean
    pub mean_absolute_error: f64,
}

impl EpisodeStats {
    /// Summarize episode lengths; `None` when there are none.
    pub fn from_lengths(lengths: &[usize]) -> Option<Self> {
        if lengths.is_empty() {
            return None;
        }

        let values: Vec<f64> = lengths.iter().map(|&len| len as f64).collect();
        let mean = Statistics::mean(values.iter());
        let mean_absolute_error =
            values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64;

        Some(Self {
            count: values.len(),
            mean,
            std_dev: Statistics::population_std_dev(values.iter()),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            mean_absolute_error,
        })
    }
}

/// One evaluation checkpoint of a learning curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Training episodes completed before this evaluation
    pub episode: u64,
    /// Evaluation episodes run
    pub evaluated: usize,
    /// Evaluation episodes abandoned at the step cap
    pub uncaptured: usize,
    /// Statistics over the captured episodes
    pub stats: Option<EpisodeStats>,
}

impl SeriesPoint {
    pub fn new(episode: u64, lengths: &[usize], uncaptured: usize) -> Self {
        Self {
            episode,
            evaluated: lengths.len() + uncaptured,
            uncaptured,
            stats: EpisodeStats::from_lengths(lengths),
        }
    }

    pub fn mean_length(&self) -> Option<f64> {
        self.stats.map(|stats| stats.mean)
    }
}

/// Labeled series of evaluation checkpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningCurve {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

impl LearningCurve {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn total_uncaptured(&self) -> usize {
        self.points.iter().map(|point| point.uncaptured).sum()
    }

    /// Lowest mean episode length over all checkpoints.
    pub fn best_mean_length(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(SeriesPoint::mean_length)
            .reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_of_known_lengths() {
        let stats = EpisodeStats::from_lengths(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!(stats.count, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        // |2-5| + 3·|4-5| + 2·0 + |7-5| + |9-5| = 12
        assert!((stats.mean_absolute_error - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_lengths_have_no_stats() {
        assert!(EpisodeStats::from_lengths(&[]).is_none());
        let point = SeriesPoint::new(10, &[], 3);
        assert_eq!(point.evaluated, 3);
        assert_eq!(point.mean_length(), None);
    }

    #[test]
    fn test_curve_summaries() {
        let mut curve = LearningCurve::new("test");
        curve.push(SeriesPoint::new(0, &[30, 50], 1));
        curve.push(SeriesPoint::new(10, &[10, 20], 0));
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.total_uncaptured(), 1);
        assert_eq!(curve.best_mean_length(), Some(15.0));
        assert_eq!(curve.last().map(|p| p.episode), Some(10));
    }
}
