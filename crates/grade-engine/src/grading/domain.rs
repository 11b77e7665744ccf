use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an assessment component within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSlot {
    Ec1,
    Ec2,
    Ec3,
}

impl ComponentSlot {
    pub const fn ordered() -> [Self; 3] {
        [Self::Ec1, Self::Ec2, Self::Ec3]
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Ec1 => 0,
            Self::Ec2 => 1,
            Self::Ec3 => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ec1 => "EC1",
            Self::Ec2 => "EC2",
            Self::Ec3 => "EC3",
        }
    }

    /// Conventional assessment carried by the slot.
    pub const fn assessment(self) -> &'static str {
        match self {
            Self::Ec1 => "Assignment",
            Self::Ec2 => "Mid-Exam",
            Self::Ec3 => "Final-Exam",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ec1" | "1" => Some(Self::Ec1),
            "ec2" | "2" => Some(Self::Ec2),
            "ec3" | "3" => Some(Self::Ec3),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mark recorded for a component. Pending components have not been sat yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarkRepr", into = "MarkRepr")]
pub enum Mark {
    Scored(f64),
    Pending,
}

impl Mark {
    pub const PENDING_LABEL: &'static str = "pending";

    pub fn value(self) -> Option<f64> {
        match self {
            Mark::Scored(value) => Some(value),
            Mark::Pending => None,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Mark::Pending)
    }

    /// Amount the mark adds to a course total; pending marks add nothing.
    pub fn contribution(self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::PENDING_LABEL) {
            return Some(Mark::Pending);
        }
        trimmed.parse::<f64>().ok().map(Mark::Scored)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Scored(value) => write!(f, "{value:.2}"),
            Mark::Pending => f.write_str(Self::PENDING_LABEL),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MarkRepr {
    Value(f64),
    Label(String),
    Missing,
}

impl TryFrom<MarkRepr> for Mark {
    type Error = String;

    fn try_from(value: MarkRepr) -> Result<Self, Self::Error> {
        match value {
            MarkRepr::Value(mark) => Ok(Mark::Scored(mark)),
            MarkRepr::Missing => Ok(Mark::Pending),
            MarkRepr::Label(label) => {
                Mark::parse(&label).ok_or_else(|| format!("'{label}' is not a mark or 'pending'"))
            }
        }
    }
}

impl From<Mark> for MarkRepr {
    fn from(value: Mark) -> Self {
        match value {
            Mark::Scored(mark) => MarkRepr::Value(mark),
            Mark::Pending => MarkRepr::Label(Mark::PENDING_LABEL.to_string()),
        }
    }
}

/// One graded assessment. `weight` is the share of the course total (0-100) and
/// scored marks live on the `0..=weight` scale. A component without a weight
/// takes the semester-wide default for its slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub mark: Mark,
}

impl Component {
    pub fn scored(weight: f64, mark: f64) -> Self {
        Self {
            weight: Some(weight),
            mark: Mark::Scored(mark),
        }
    }

    pub fn pending(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            mark: Mark::Pending,
        }
    }

    pub fn unweighted(mark: Mark) -> Self {
        Self { weight: None, mark }
    }
}

/// Credit units a course carries. Only 4 and 5 unit courses exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CreditUnits(u8);

impl CreditUnits {
    pub const FOUR: Self = Self(4);
    pub const FIVE: Self = Self(5);

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CreditUnits {
    type Error = DomainValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 | 5 => Ok(Self(value)),
            other => Err(DomainValueError::CreditUnits(other)),
        }
    }
}

impl From<CreditUnits> for u8 {
    fn from(value: CreditUnits) -> Self {
        value.0
    }
}

/// Grade points on the ten-point scale together with their letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GradePoint {
    Two,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl GradePoint {
    /// Highest grade first, the order cutoffs are evaluated in.
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Ten,
            Self::Nine,
            Self::Eight,
            Self::Seven,
            Self::Six,
            Self::Five,
            Self::Four,
            Self::Two,
        ]
    }

    pub const fn value(self) -> u8 {
        match self {
            Self::Ten => 10,
            Self::Nine => 9,
            Self::Eight => 8,
            Self::Seven => 7,
            Self::Six => 6,
            Self::Five => 5,
            Self::Four => 4,
            Self::Two => 2,
        }
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::Ten => "A",
            Self::Nine => "A-",
            Self::Eight => "B",
            Self::Seven => "B-",
            Self::Six => "C",
            Self::Five => "C-",
            Self::Four => "D",
            Self::Two => "E",
        }
    }

    /// Lowest total percentage that earns this grade under the absolute table.
    pub const fn absolute_floor(self) -> f64 {
        match self {
            Self::Ten => 90.0,
            Self::Nine => 80.0,
            Self::Eight => 70.0,
            Self::Seven => 60.0,
            Self::Six => 50.0,
            Self::Five => 45.0,
            Self::Four => 35.0,
            Self::Two => 0.0,
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        let letter = letter.trim();
        Self::ordered()
            .into_iter()
            .find(|grade| grade.letter().eq_ignore_ascii_case(letter))
    }

    pub(crate) const fn rank(self) -> usize {
        match self {
            Self::Ten => 0,
            Self::Nine => 1,
            Self::Eight => 2,
            Self::Seven => 3,
            Self::Six => 4,
            Self::Five => 5,
            Self::Four => 6,
            Self::Two => 7,
        }
    }
}

impl TryFrom<u8> for GradePoint {
    type Error = DomainValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ordered()
            .into_iter()
            .find(|grade| grade.value() == value)
            .ok_or(DomainValueError::GradePoint(value))
    }
}

impl From<GradePoint> for u8 {
    fn from(value: GradePoint) -> Self {
        value.value()
    }
}

impl fmt::Display for GradePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value(), self.letter())
    }
}

/// Rejected construction of a bounded domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainValueError {
    #[error("credit units must be 4 or 5, got {0}")]
    CreditUnits(u8),
    #[error("{0} is not a grade point (expected one of 10, 9, 8, 7, 6, 5, 4, 2)")]
    GradePoint(u8),
}

/// Top score in the cohort used as the normalization denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassHighest {
    /// Highest course total, on the 0-100 scale.
    Course(f64),
    /// Highest mark per component, each on its `0..=weight` scale.
    PerComponent([f64; 3]),
}

/// How raw marks turn into a course percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    #[default]
    Direct,
    NormalizeByHighest,
}

impl ScoreMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Direct => "Direct Average",
            Self::NormalizeByHighest => "Normalise from Class Highest",
        }
    }
}

/// One enrolled subject within a semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub credit_units: CreditUnits,
    pub components: [Component; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_highest: Option<ClassHighest>,
}

impl Course {
    /// Course with every component pending.
    pub fn new(name: impl Into<String>, credit_units: CreditUnits, weights: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            credit_units,
            components: weights.map(Component::pending),
            class_highest: None,
        }
    }

    /// Course with every component pending and no weights of its own.
    pub fn unweighted(name: impl Into<String>, credit_units: CreditUnits) -> Self {
        Self {
            name: name.into(),
            credit_units,
            components: [Component::unweighted(Mark::Pending); 3],
            class_highest: None,
        }
    }

    /// Fill components without a weight from the semester-wide defaults.
    /// Weights set on the course win.
    pub fn with_default_weights(&self, defaults: Option<&[f64; 3]>) -> Course {
        let mut course = self.clone();
        if let Some(defaults) = defaults {
            for (component, default) in course.components.iter_mut().zip(defaults) {
                component.weight = component.weight.or(Some(*default));
            }
        }
        course
    }

    pub fn with_mark(mut self, slot: ComponentSlot, mark: f64) -> Self {
        self.components[slot.index()].mark = Mark::Scored(mark);
        self
    }

    pub fn with_class_highest(mut self, highest: ClassHighest) -> Self {
        self.class_highest = Some(highest);
        self
    }

    pub fn component(&self, slot: ComponentSlot) -> &Component {
        &self.components[slot.index()]
    }

    pub fn marks(&self) -> [Mark; 3] {
        self.components.map(|component| component.mark)
    }
}

/// Grade outcome for a single course. Rebuilt on every compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    pub course: Course,
    pub total_percent: f64,
    pub grade_point: GradePoint,
    pub letter: String,
    pub credit_points: f64,
    pub passed: bool,
}

/// Which cutoff policy produced the grades of a semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Absolute,
    Relative,
}

impl PolicyKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Absolute => "Absolute",
            Self::Relative => "Relative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPolicy {
    pub kind: PolicyKind,
    /// Set when relative grading was requested without usable cohort statistics.
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterResult {
    pub semester_id: u8,
    pub course_results: Vec<CourseResult>,
    pub sgpa: f64,
    pub total_credit_units: u32,
    pub total_credit_points: f64,
    pub policy: AppliedPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeResult {
    pub semester_ids: Vec<u8>,
    pub cgpa: f64,
    pub total_credit_units: u32,
    pub total_credit_points: f64,
}
