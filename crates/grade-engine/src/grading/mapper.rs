//! Percentage to grade-point mapping under absolute or cohort-relative cutoffs.

use super::cohort::CohortStats;
use super::domain::{GradePoint, PolicyKind};
use super::error::GradingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where relative grading takes its cohort statistics from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortSource {
    Stats { mean: f64, std_dev: f64 },
    Sample(Vec<f64>),
}

impl CohortSource {
    pub fn stats(&self) -> Option<CohortStats> {
        match self {
            CohortSource::Stats { mean, std_dev } => Some(CohortStats {
                mean: *mean,
                std_dev: *std_dev,
            }),
            CohortSource::Sample(sample) => CohortStats::from_sample(sample),
        }
    }
}

/// Grading policy requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradingPolicy {
    #[default]
    Absolute,
    Relative {
        #[serde(default)]
        cohort: Option<CohortSource>,
        /// Letter to multiplier overrides, e.g. `{"A": 1.75}`.
        #[serde(default)]
        multipliers: BTreeMap<String, f64>,
    },
}

/// Absolute cutoff table, evaluated highest grade first with inclusive floors.
pub fn absolute_grade(total_percent: f64) -> GradePoint {
    GradePoint::ordered()
        .into_iter()
        .find(|grade| total_percent >= grade.absolute_floor())
        .unwrap_or(GradePoint::Two)
}

/// Standard-deviation multipliers per letter, indexed highest grade first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers([f64; 8]);

impl Default for Multipliers {
    fn default() -> Self {
        Self([1.5, 1.0, 0.5, 0.0, -0.5, -1.0, -1.5, -3.0])
    }
}

impl Multipliers {
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self, GradingError> {
        let mut multipliers = Self::default();
        for (letter, multiplier) in overrides {
            let grade = GradePoint::from_letter(letter)
                .ok_or_else(|| GradingError::UnknownLetter(letter.clone()))?;
            multipliers.0[grade.rank()] = *multiplier;
        }
        Ok(multipliers)
    }

    pub fn get(&self, grade: GradePoint) -> f64 {
        self.0[grade.rank()]
    }
}

/// Relative cutoffs `mean + multiplier * std_dev` for each grade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeCutoffs {
    stats: CohortStats,
    cutoffs: [f64; 8],
}

impl RelativeCutoffs {
    pub fn new(stats: CohortStats, multipliers: &Multipliers) -> Self {
        let cutoffs = GradePoint::ordered()
            .map(|grade| stats.mean + multipliers.get(grade) * stats.std_dev);
        Self { stats, cutoffs }
    }

    pub fn stats(&self) -> CohortStats {
        self.stats
    }

    pub fn cutoff(&self, grade: GradePoint) -> f64 {
        self.cutoffs[grade.rank()]
    }

    /// Cutoffs highest grade first.
    pub fn entries(&self) -> impl Iterator<Item = (GradePoint, f64)> + '_ {
        GradePoint::ordered()
            .into_iter()
            .map(|grade| (grade, self.cutoff(grade)))
    }

    pub fn grade(&self, total_percent: f64) -> GradePoint {
        self.entries()
            .find(|(_, cutoff)| *cutoff <= total_percent)
            .map(|(grade, _)| grade)
            .unwrap_or(GradePoint::Two)
    }
}

/// Policy resolved against its inputs, ready to map totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeMapper {
    Absolute,
    Relative(RelativeCutoffs),
    /// Relative grading was requested but no usable statistics were supplied.
    AbsoluteFallback,
}

impl GradeMapper {
    pub fn from_policy(policy: &GradingPolicy) -> Result<Self, GradingError> {
        match policy {
            GradingPolicy::Absolute => Ok(Self::Absolute),
            GradingPolicy::Relative {
                cohort,
                multipliers,
            } => {
                let multipliers = Multipliers::with_overrides(multipliers)?;
                let stats = cohort
                    .as_ref()
                    .and_then(CohortSource::stats)
                    .filter(CohortStats::is_usable);

                Ok(match stats {
                    Some(stats) => Self::Relative(RelativeCutoffs::new(stats, &multipliers)),
                    None => {
                        tracing::warn!("relative grading requested without cohort statistics; using absolute cutoffs");
                        Self::AbsoluteFallback
                    }
                })
            }
        }
    }

    pub fn map(&self, total_percent: f64) -> GradePoint {
        match self {
            Self::Absolute | Self::AbsoluteFallback => absolute_grade(total_percent),
            Self::Relative(cutoffs) => cutoffs.grade(total_percent),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Absolute => PolicyKind::Absolute,
            Self::Relative(_) | Self::AbsoluteFallback => PolicyKind::Relative,
        }
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self, Self::AbsoluteFallback)
    }
}

/// Map a total percentage to its grade point and letter.
pub fn map_grade(total_percent: f64, mapper: &GradeMapper) -> (GradePoint, &'static str) {
    let grade = mapper.map(total_percent);
    (grade, grade.letter())
}
