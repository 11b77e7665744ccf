use super::super::domain::{CreditUnits, GradePoint, Mark};
use super::ExportError;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Parsed export row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRow {
    pub semester_id: Option<u8>,
    pub course: String,
    pub credit_units: CreditUnits,
    pub marks: [Mark; 3],
    pub total_percent: f64,
    pub grade_point: GradePoint,
    pub letter: String,
    pub credit_points: f64,
    pub passed: bool,
}

/// Parse a single-semester or consolidated export back into rows.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ExportedRow>, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<ExportRecord>().enumerate() {
        let row = index + 2;
        rows.push(record?.into_row(row)?);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ExportRecord {
    #[serde(rename = "Semester", default, deserialize_with = "empty_string_as_none")]
    semester: Option<String>,
    #[serde(rename = "Course")]
    course: String,
    #[serde(rename = "Units")]
    units: u8,
    #[serde(rename = "EC1")]
    ec1: String,
    #[serde(rename = "EC2")]
    ec2: String,
    #[serde(rename = "EC3")]
    ec3: String,
    #[serde(rename = "Total (%)")]
    total_percent: f64,
    #[serde(rename = "GP")]
    grade_point: u8,
    #[serde(rename = "Grade")]
    letter: String,
    #[serde(rename = "Credit Points")]
    credit_points: f64,
    #[serde(rename = "Result")]
    result: String,
}

impl ExportRecord {
    fn into_row(self, row: usize) -> Result<ExportedRow, ExportError> {
        let invalid = |column: &'static str, value: &str| ExportError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        };

        let semester_id = self
            .semester
            .as_deref()
            .map(|label| parse_semester(label).ok_or_else(|| invalid("Semester", label)))
            .transpose()?;
        let credit_units = CreditUnits::try_from(self.units)
            .map_err(|_| invalid("Units", &self.units.to_string()))?;
        let grade_point = GradePoint::try_from(self.grade_point)
            .map_err(|_| invalid("GP", &self.grade_point.to_string()))?;

        let mut marks = [Mark::Pending; 3];
        for (slot, (column, raw)) in [("EC1", &self.ec1), ("EC2", &self.ec2), ("EC3", &self.ec3)]
            .into_iter()
            .enumerate()
        {
            marks[slot] = Mark::parse(raw).ok_or_else(|| invalid(column, raw))?;
        }

        let passed = match self.result.to_ascii_lowercase().as_str() {
            "pass" => true,
            "fail" => false,
            _ => return Err(invalid("Result", &self.result)),
        };

        Ok(ExportedRow {
            semester_id,
            course: self.course,
            credit_units,
            marks,
            total_percent: self.total_percent,
            grade_point,
            letter: self.letter,
            credit_points: self.credit_points,
            passed,
        })
    }
}

fn parse_semester(label: &str) -> Option<u8> {
    let trimmed = label.trim();
    let digits = trimmed
        .strip_prefix("Semester")
        .or_else(|| trimmed.strip_prefix("semester"))
        .unwrap_or(trimmed);
    digits.trim().parse().ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
