//! Assignment domain model.
//!
//! # Responsibility
//! - Define the canonical assignment record and its wire format.
//! - Validate raw add/edit input before it becomes a record.
//!
//! # Invariants
//! - `id` is stable for the record lifetime and never reused.
//! - `title`, `course` are non-empty after trimming for any record built
//!   from an `AssignmentDraft`.
//! - Unrecognized priority values survive decode and rank below `low`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Due time applied when the caller leaves it blank.
pub const DEFAULT_DUE_TIME: &str = "23:59";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
const DUE_TIME_FORMAT: &str = "%H:%M";

static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));
static DUE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid due time regex"));

/// Opaque assignment identifier.
///
/// Fresh ids are UUID v4 strings. Ids read back from documents are kept
/// verbatim, so older numeric ids keep working.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(String);

impl AssignmentId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssignmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssignmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AssignmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Assignment urgency.
///
/// Serialized as `low|medium|high`. Any other value read from storage is
/// preserved as `Unrecognized` so that a round trip never rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Unrecognized(String),
}

impl Priority {
    /// Parses a wire value. Never fails; unknown input becomes `Unrecognized`.
    pub fn parse(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Sort rank: `high=3`, `medium=2`, `low=1`, anything else `0`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unrecognized(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Canonical assignment record.
///
/// Field names follow the persisted document (`dueDate`, `dueTime`,
/// `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub course: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "due_date_wire")]
    pub due_date: NaiveDate,
    #[serde(with = "due_time_wire", default = "default_due_time")]
    pub due_time: NaiveTime,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Builds a new pending record from validated draft input.
    ///
    /// # Errors
    /// - Returns the first validation failure found in `draft`.
    pub fn from_draft(
        draft: &AssignmentDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AssignmentValidationError> {
        let valid = draft.validate()?;
        Ok(Self {
            id: AssignmentId::generate(),
            title: valid.title,
            course: valid.course,
            description: valid.description,
            due_date: valid.due_date,
            due_time: valid.due_time,
            priority: valid.priority,
            completed: false,
            created_at,
        })
    }

    /// The due date and time as a single wall-clock point.
    pub fn due_instant(&self) -> NaiveDateTime {
        self.due_date.and_time(self.due_time)
    }

    pub fn priority_rank(&self) -> u8 {
        self.priority.rank()
    }

    /// Wire text of `due_date` (`YYYY-MM-DD`).
    pub fn due_date_text(&self) -> String {
        self.due_date.format(DUE_DATE_FORMAT).to_string()
    }

    /// Wire text of `due_time` (`HH:MM`).
    pub fn due_time_text(&self) -> String {
        self.due_time.format(DUE_TIME_FORMAT).to_string()
    }
}

/// Required draft fields, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Course,
    DueDate,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Course => "course",
            Self::DueDate => "due_date",
        }
    }
}

/// Rejection reasons for add/edit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentValidationError {
    MissingField(RequiredField),
    InvalidDueDate(String),
    InvalidDueTime(String),
    UnrecognizedPriority(String),
}

impl AssignmentValidationError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(_) => "please fill in all required fields.".to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for AssignmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field: {}", field.as_str()),
            Self::InvalidDueDate(value) => {
                write!(f, "due date `{value}` must use YYYY-MM-DD")
            }
            Self::InvalidDueTime(value) => write!(f, "due time `{value}` must use HH:MM"),
            Self::UnrecognizedPriority(value) => {
                write!(f, "priority `{value}` must be one of low|medium|high")
            }
        }
    }
}

impl Error for AssignmentValidationError {}

/// Raw add/edit input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDraft {
    pub title: String,
    pub course: String,
    pub description: String,
    pub due_date: String,
    /// `None` or blank falls back to `DEFAULT_DUE_TIME`.
    pub due_time: Option<String>,
    pub priority: Priority,
}

impl AssignmentDraft {
    pub fn new(
        title: impl Into<String>,
        course: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            course: course.into(),
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_time(mut self, due_time: impl Into<String>) -> Self {
        self.due_time = Some(due_time.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Pre-fills a draft from an existing record, as the edit flow does.
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            title: assignment.title.clone(),
            course: assignment.course.clone(),
            description: assignment.description.clone(),
            due_date: assignment.due_date_text(),
            due_time: Some(assignment.due_time_text()),
            priority: assignment.priority.clone(),
        }
    }

    /// Checks the draft without building a record.
    ///
    /// Required fields are checked first, in `title`, `course`, `due_date`
    /// order, before any format check.
    pub fn validate(&self) -> Result<ValidDraft, AssignmentValidationError> {
        let title = self.title.trim();
        let course = self.course.trim();
        let due_date = self.due_date.trim();

        if title.is_empty() {
            return Err(AssignmentValidationError::MissingField(RequiredField::Title));
        }
        if course.is_empty() {
            return Err(AssignmentValidationError::MissingField(RequiredField::Course));
        }
        if due_date.is_empty() {
            return Err(AssignmentValidationError::MissingField(
                RequiredField::DueDate,
            ));
        }
        if !self.priority.is_recognized() {
            return Err(AssignmentValidationError::UnrecognizedPriority(
                self.priority.as_str().to_string(),
            ));
        }

        Ok(ValidDraft {
            title: title.to_string(),
            course: course.to_string(),
            description: self.description.trim().to_string(),
            due_date: parse_due_date(due_date)?,
            due_time: parse_due_time(self.due_time.as_deref())?,
            priority: self.priority.clone(),
        })
    }
}

/// Draft contents after trimming and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub course: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub due_time: NaiveTime,
    pub priority: Priority,
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, AssignmentValidationError> {
    let trimmed = value.trim();
    if !DUE_DATE_RE.is_match(trimmed) {
        return Err(AssignmentValidationError::InvalidDueDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT)
        .map_err(|_| AssignmentValidationError::InvalidDueDate(trimmed.to_string()))
}

/// Parses a strict `HH:MM` time; `None` or blank yields `23:59`.
pub fn parse_due_time(value: Option<&str>) -> Result<NaiveTime, AssignmentValidationError> {
    let trimmed = value.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Ok(default_due_time());
    }
    if !DUE_TIME_RE.is_match(trimmed) {
        return Err(AssignmentValidationError::InvalidDueTime(trimmed.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, DUE_TIME_FORMAT)
        .map_err(|_| AssignmentValidationError::InvalidDueTime(trimmed.to_string()))
}

/// `23:59`, the due time used when none is given.
pub fn default_due_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
}

mod due_date_wire {
    use super::{parse_due_date, DUE_DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(DUE_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_due_date(&raw).map_err(D::Error::custom)
    }
}

mod due_time_wire {
    use super::{parse_due_time, DUE_TIME_FORMAT};
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(DUE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        parse_due_time(raw.as_deref()).map_err(D::Error::custom)
    }
}
