//! CSV export of learning curves
//!
//! Every row is one evaluation checkpoint of one labeled curve, so several
//! experiments can share a file and be plotted against the training episode.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{
    Error, Result,
    analysis::{LearningCurve, SeriesPoint},
};

/// A single row in the learning curve CSV export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveRecord<'a> {
    pub label: &'a str,
    pub episode: u64,
    pub mean_length: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean_absolute_error: Option<f64>,
    pub uncaptured: usize,
}

impl<'a> CurveRecord<'a> {
    pub fn new(label: &'a str, point: &SeriesPoint) -> Self {
        let stats = point.stats;
        Self {
            label,
            episode: point.episode,
            mean_length: stats.map(|s| s.mean),
            std_dev: stats.map(|s| s.std_dev),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            mean_absolute_error: stats.map(|s| s.mean_absolute_error),
            uncaptured: point.uncaptured,
        }
    }
}

/// Write `curves` to any writer. Checkpoints without a capture leave the
/// statistic columns empty.
pub fn write_curves<W: Write>(writer: W, curves: &[LearningCurve]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for curve in curves {
        for point in &curve.points {
            csv_writer.serialize(CurveRecord::new(&curve.label, point))?;
        }
    }
    csv_writer.flush().map_err(|source| Error::Io {
        operation: "flush CSV writer".to_string(),
        source,
    })?;
    Ok(())
}

/// Write `curves` to a CSV file at `path`.
///
/// # Examples
///
/// ```no_run
/// use pursuit::{analysis::{LearningCurve, SeriesPoint}, export::write_learning_curves};
///
/// let mut curve = LearningCurve::new("Q-learning");
/// curve.push(SeriesPoint::new(10, &[42, 37], 0));
/// write_learning_curves("curves.csv", &[curve])?;
/// # Ok::<(), pursuit::Error>(())
/// ```
pub fn write_learning_curves<P: AsRef<Path>>(path: P, curves: &[LearningCurve]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create CSV {}", path.display()),
        source,
    })?;
    write_curves(file, curves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_per_point_and_label() {
        let mut first = LearningCurve::new("Q-learning");
        first.push(SeriesPoint::new(10, &[4, 6], 0));
        first.push(SeriesPoint::new(20, &[], 3));
        let mut second = LearningCurve::new("Centralized Q-learning");
        second.push(SeriesPoint::new(10, &[5], 1));

        let mut buffer = Vec::new();
        write_curves(&mut buffer, &[first, second]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "label,episode,mean_length,std_dev,min,max,mean_absolute_error,uncaptured"
        );
        assert_eq!(lines[1], "Q-learning,10,5.0,1.0,4.0,6.0,1.0,0");
        assert_eq!(lines[2], "Q-learning,20,,,,,,3");
        assert_eq!(lines[3], "Centralized Q-learning,10,5.0,0.0,5.0,5.0,0.0,1");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.csv");
        let mut curve = LearningCurve::new("proposed");
        curve.push(SeriesPoint::new(10, &[8], 0));

        write_learning_curves(&path, &[curve]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "proposed");
        assert_eq!(&rows[0][2], "8.0");
    }
}
