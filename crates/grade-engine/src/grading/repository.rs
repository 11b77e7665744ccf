use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::SemesterResult;

/// Computed semester held in the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
    pub result: SemesterResult,
    pub computed_at: DateTime<Utc>,
}

impl SemesterRecord {
    pub fn semester_id(&self) -> u8 {
        self.result.semester_id
    }
}

/// Session-scoped store of computed semesters keyed by semester number. The
/// grading engine never touches it; the service writes whole snapshots.
pub trait SemesterRepository: Send + Sync {
    /// Insert or overwrite, returning the record that was replaced.
    fn store(&self, record: SemesterRecord) -> Result<Option<SemesterRecord>, RepositoryError>;
    fn fetch(&self, semester_id: u8) -> Result<Option<SemesterRecord>, RepositoryError>;
    /// Every stored semester ordered by semester number.
    fn all(&self) -> Result<Vec<SemesterRecord>, RepositoryError>;
    /// Drop every record, returning how many were removed.
    fn clear(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
