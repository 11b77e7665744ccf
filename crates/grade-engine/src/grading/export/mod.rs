//! Tabular CSV export of computed semesters and its parsing counterpart.

mod reader;
mod writer;

pub use reader::{read_rows, ExportedRow};
pub use writer::{semester_label, write_consolidated, write_semester};

pub(crate) const SEMESTER_HEADER: &str = "Semester";
pub(crate) const COURSE_HEADERS: [&str; 10] = [
    "Course",
    "Units",
    "EC1",
    "EC2",
    "EC3",
    "Total (%)",
    "GP",
    "Grade",
    "Credit Points",
    "Result",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error while writing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid UTF-8")]
    Encoding,
    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}
