use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One coursework item exactly as the model returned it. Every field is
/// optional; `validation::validate_record` decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RawDeadline {
    pub assignment_name: Option<String>,
    #[schema(value_type = Option<String>, format = "date", example = "2025-10-01")]
    pub due_date: Option<String>,
    #[schema(value_type = Option<String>, example = "Exam")]
    pub assignment_type: Option<AssignmentType>,
}

/// Coursework category. The prompt restricts the model to the six named
/// values, but nothing enforces that on the receiving side: anything else
/// is carried through unchanged as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentType {
    Essay,
    Quiz,
    Exam,
    Project,
    Presentation,
    Other(String),
}

impl From<String> for AssignmentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Essay" => AssignmentType::Essay,
            "Quiz" => AssignmentType::Quiz,
            "Exam" => AssignmentType::Exam,
            "Project" => AssignmentType::Project,
            "Presentation" => AssignmentType::Presentation,
            _ => AssignmentType::Other(value),
        }
    }
}

impl From<AssignmentType> for String {
    fn from(value: AssignmentType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentType::Essay => f.write_str("Essay"),
            AssignmentType::Quiz => f.write_str("Quiz"),
            AssignmentType::Exam => f.write_str("Exam"),
            AssignmentType::Project => f.write_str("Project"),
            AssignmentType::Presentation => f.write_str("Presentation"),
            AssignmentType::Other(label) => f.write_str(label),
        }
    }
}

/// A deadline that passed validation and can become a calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineEvent {
    pub assignment_name: String,
    pub due_date: NaiveDate,
    pub assignment_type: AssignmentType,
}

impl DeadlineEvent {
    /// Event title in the `[course] - name (type)` form the calendar uses.
    pub fn title(&self, course_name: &str) -> String {
        format!(
            "[{}] - {} ({})",
            course_name, self.assignment_name, self.assignment_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_type_known_values() {
        let parsed: AssignmentType = serde_json::from_str(r#""Exam""#).unwrap();
        assert_eq!(parsed, AssignmentType::Exam);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""Exam""#);
    }

    #[test]
    fn test_assignment_type_out_of_set_passes_through() {
        let parsed: AssignmentType = serde_json::from_str(r#""Homework""#).unwrap();
        assert_eq!(parsed, AssignmentType::Other("Homework".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#""Homework""#);
    }

    #[test]
    fn test_raw_deadline_tolerates_missing_and_unknown_keys() {
        let parsed: RawDeadline =
            serde_json::from_str(r#"{"assignment_name":"Essay 1","points":10}"#).unwrap();
        assert_eq!(parsed.assignment_name.as_deref(), Some("Essay 1"));
        assert!(parsed.due_date.is_none());
        assert!(parsed.assignment_type.is_none());
    }

    #[test]
    fn test_title_format() {
        let event = DeadlineEvent {
            assignment_name: "Midterm Examination".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
            assignment_type: AssignmentType::Exam,
        };
        assert_eq!(
            event.title("Intro to Python"),
            "[Intro to Python] - Midterm Examination (Exam)"
        );
    }
}
