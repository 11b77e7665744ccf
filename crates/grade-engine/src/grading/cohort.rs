use serde::{Deserialize, Serialize};
use std::io::Read;

const SCORE_HEADERS: [&str; 5] = ["score", "scores", "total", "total (%)", "percent"];

/// Mean and population standard deviation of a cohort's course totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl CohortStats {
    /// Population statistics (ddof = 0). `None` for an empty sample.
    pub fn from_sample(sample: &[f64]) -> Option<Self> {
        if sample.is_empty() {
            return None;
        }

        let count = sample.len() as f64;
        let mean = sample.iter().sum::<f64>() / count;
        let variance = sample
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / count;

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn is_usable(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite() && self.std_dev >= 0.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CohortError {
    #[error("invalid cohort CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a numeric score")]
    InvalidValue { row: usize, value: String },
    #[error("cohort sample contains no scores")]
    Empty,
}

/// Read a cohort sample from CSV. Uses the score/total column when one is
/// present, otherwise the first column. Blank cells are skipped.
pub fn read_sample<R: Read>(reader: R) -> Result<Vec<f64>, CohortError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let column = {
        let headers = csv_reader.headers()?;
        headers
            .iter()
            .position(|header| SCORE_HEADERS.contains(&normalize_header(header).as_str()))
            .unwrap_or(0)
    };

    let mut scores = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let Some(cell) = record.get(column) else {
            continue;
        };
        if cell.is_empty() {
            continue;
        }

        let score = cell
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
            .ok_or_else(|| CohortError::InvalidValue {
                row: index + 2,
                value: cell.to_string(),
            })?;
        scores.push(score);
    }

    if scores.is_empty() {
        return Err(CohortError::Empty);
    }

    Ok(scores)
}

fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn population_statistics_use_zero_degrees_of_freedom() {
        let stats = CohortStats::from_sample(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .expect("non-empty sample");
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_sample_has_no_statistics() {
        assert!(CohortStats::from_sample(&[]).is_none());
    }

    #[test]
    fn reader_prefers_named_score_column() {
        let csv = "\u{feff}Student,  Total (%) \nasha,72.5\nbo,\nchen,64\n";
        let scores = read_sample(Cursor::new(csv)).expect("sample parses");
        assert_eq!(scores, vec![72.5, 64.0]);
    }

    #[test]
    fn reader_falls_back_to_first_column() {
        let scores = read_sample(Cursor::new("marks\n50\n70\n")).expect("sample parses");
        assert_eq!(scores, vec![50.0, 70.0]);
    }

    #[test]
    fn reader_reports_row_of_bad_value() {
        let error = read_sample(Cursor::new("score\n50\nabsent\n")).expect_err("bad cell");
        match error {
            CohortError::InvalidValue { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "absent");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn reader_rejects_non_finite_scores() {
        for (csv, bad) in [("score\n71\ninf\n", "inf"), ("score\nNaN\n64\n", "NaN")] {
            match read_sample(Cursor::new(csv)) {
                Err(CohortError::InvalidValue { value, .. }) => assert_eq!(value, bad),
                other => panic!("expected invalid value for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn reader_rejects_sample_without_scores() {
        let error = read_sample(Cursor::new("score\n\n")).expect_err("empty sample");
        assert!(matches!(error, CohortError::Empty));
    }
}
