use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;
use crate::models::{AssignmentType, DeadlineEvent, RawDeadline};

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex compiles"));

/// Outcome of checking one raw record against the calendar contract.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCheck {
    Valid(DeadlineEvent),
    Invalid { record: RawDeadline, reason: String },
}

pub fn validate_course_name(value: &str) -> Result<&str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::BadRequest("course_name must not be empty".into()))
    } else {
        Ok(trimmed)
    }
}

/// Strips everything but alphanumeric characters, keeping the rest as-is.
/// `"CS 101: Intro!"` becomes `"CS101Intro"`.
pub fn sanitize_course_name(value: &str) -> String {
    value.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// A record is usable when all three keys are present, the name is
/// non-empty, and the due date is a real calendar date written exactly as
/// `YYYY-MM-DD`. Anything else is reported with the reason, never dropped
/// silently.
pub fn validate_record(record: &RawDeadline) -> RecordCheck {
    let invalid = |reason: &str| RecordCheck::Invalid {
        record: record.clone(),
        reason: reason.to_string(),
    };

    let Some(name) = record.assignment_name.as_deref().map(str::trim) else {
        return invalid("missing assignment_name");
    };
    if name.is_empty() {
        return invalid("empty assignment_name");
    }

    let Some(due) = record.due_date.as_deref() else {
        return invalid("missing due_date");
    };
    if !DATE_PATTERN.is_match(due) {
        return invalid("due_date is not in YYYY-MM-DD form");
    }
    let Ok(due_date) = NaiveDate::parse_from_str(due, "%Y-%m-%d") else {
        return invalid("due_date is not a real calendar date");
    };

    let Some(assignment_type) = record.assignment_type.clone() else {
        return invalid("missing assignment_type");
    };

    RecordCheck::Valid(DeadlineEvent {
        assignment_name: name.to_string(),
        due_date,
        assignment_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, due: &str, kind: &str) -> RawDeadline {
        RawDeadline {
            assignment_name: Some(name.to_string()),
            due_date: Some(due.to_string()),
            assignment_type: Some(AssignmentType::from(kind.to_string())),
        }
    }

    #[test]
    fn test_validate_course_name() {
        assert_eq!(validate_course_name(" CS 101 ").unwrap(), "CS 101");
        assert!(validate_course_name("   ").is_err());
    }

    #[test]
    fn test_sanitize_course_name() {
        assert_eq!(sanitize_course_name("CS 101: Intro!"), "CS101Intro");
        assert_eq!(sanitize_course_name("Maths"), "Maths");
        assert_eq!(sanitize_course_name("!!!"), "");
    }

    #[test]
    fn test_validate_record_valid() {
        let checked = validate_record(&record("Essay 1", "2025-09-15", "Essay"));
        let RecordCheck::Valid(event) = checked else {
            panic!("expected valid record");
        };
        assert_eq!(event.assignment_name, "Essay 1");
        assert_eq!(
            event.due_date,
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
        );
        assert_eq!(event.assignment_type, AssignmentType::Essay);
    }

    #[test]
    fn test_validate_record_rejects_impossible_date() {
        let checked = validate_record(&record("A", "2025-13-40", "Quiz"));
        assert!(matches!(
            checked,
            RecordCheck::Invalid { ref reason, .. } if reason.contains("real calendar date")
        ));
    }

    #[test]
    fn test_validate_record_requires_zero_padded_date() {
        let checked = validate_record(&record("A", "2025-1-3", "Quiz"));
        assert!(matches!(
            checked,
            RecordCheck::Invalid { ref reason, .. } if reason.contains("YYYY-MM-DD")
        ));
    }

    #[test]
    fn test_validate_record_missing_fields() {
        let missing_due = RawDeadline {
            assignment_name: Some("A".to_string()),
            due_date: None,
            assignment_type: Some(AssignmentType::Quiz),
        };
        assert!(matches!(
            validate_record(&missing_due),
            RecordCheck::Invalid { ref reason, .. } if reason.contains("due_date")
        ));

        let missing_type = RawDeadline {
            assignment_name: Some("A".to_string()),
            due_date: Some("2025-10-01".to_string()),
            assignment_type: None,
        };
        assert!(matches!(
            validate_record(&missing_type),
            RecordCheck::Invalid { ref reason, .. } if reason.contains("assignment_type")
        ));
    }
}
