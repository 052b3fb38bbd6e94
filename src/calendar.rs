use std::fs;
use std::path::PathBuf;

use chrono::NaiveTime;
use icalendar::{Calendar, Component, Event, EventLike};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::RawDeadline;
use crate::validation::{RecordCheck, sanitize_course_name, validate_record};

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Failed to write calendar file: {0}")]
    Io(#[from] std::io::Error),
}

/// A record that did not survive validation, kept with its reason so the
/// caller can report partial success instead of dropping it silently.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub record: RawDeadline,
    pub reason: String,
}

/// Result of one calendar build. `file` is `None` when nothing was written,
/// either because there were no records or because none survived
/// validation; `skipped` says which and why.
#[derive(Debug, Clone)]
pub struct CalendarOutcome {
    pub file: Option<PathBuf>,
    pub body: Vec<u8>,
    pub scheduled: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl CalendarOutcome {
    fn empty(skipped: Vec<SkippedRecord>) -> Self {
        Self {
            file: None,
            body: Vec::new(),
            scheduled: 0,
            skipped,
        }
    }
}

#[derive(Clone)]
pub struct CalendarBuilder {
    output_dir: PathBuf,
}

impl CalendarBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File name for a course: non-alphanumeric characters removed, then
    /// the `_schedule.ics` suffix.
    pub fn file_name(course_name: &str) -> String {
        format!("{}_schedule.ics", sanitize_course_name(course_name))
    }

    /// Builds one all-day event per valid record and writes the calendar
    /// in a single overwriting write. Records are handled independently: a
    /// malformed one is skipped with its reason, never aborting the batch.
    pub fn build(
        &self,
        course_name: &str,
        records: &[RawDeadline],
    ) -> Result<CalendarOutcome, CalendarError> {
        if records.is_empty() {
            return Ok(CalendarOutcome::empty(Vec::new()));
        }

        fs::create_dir_all(&self.output_dir)?;

        let mut events = Vec::new();
        let mut skipped = Vec::new();
        for record in records {
            match validate_record(record) {
                RecordCheck::Valid(event) => events.push(event),
                RecordCheck::Invalid { record, reason } => {
                    warn!(?record, %reason, "skipping invalid deadline record");
                    skipped.push(SkippedRecord { record, reason });
                }
            }
        }

        if events.is_empty() {
            return Ok(CalendarOutcome::empty(skipped));
        }

        let mut calendar = Calendar::new();
        calendar.name(&format!("{course_name} Deadlines"));

        for (idx, item) in events.iter().enumerate() {
            let mut event = Event::new();
            event.summary(&item.title(course_name));
            event.all_day(item.due_date);
            // Deterministic UID and DTSTAMP so identical runs overwrite the
            // file with byte-identical content.
            event.timestamp(item.due_date.and_time(NaiveTime::MIN).and_utc());
            event.uid(&format!(
                "{}-{}-{}-syllabus-scheduler",
                idx,
                item.due_date.format("%Y%m%d"),
                item.assignment_name.replace(' ', "-")
            ));
            calendar.push(event);
        }

        let body = calendar.to_string().into_bytes();
        let file = self.output_dir.join(Self::file_name(course_name));
        fs::write(&file, &body)?;
        info!(path = %file.display(), events = events.len(), "calendar file written");

        Ok(CalendarOutcome {
            file: Some(file),
            body,
            scheduled: events.len(),
            skipped,
        })
    }
}
