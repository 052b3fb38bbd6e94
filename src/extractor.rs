use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::models::RawDeadline;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model reply contained no text")]
    EmptyReply,
    #[error("Model reply was not a JSON array of deadlines: {reason}")]
    MalformedReply { reason: String, raw: String },
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Extracts coursework deadlines from syllabus text with one Gemini
/// `generateContent` call. The credential is injected here, not read from
/// process-global state.
#[derive(Clone)]
pub struct DeadlineExtractor {
    client: reqwest::Client,
    base_url: Arc<Url>,
    model: String,
    api_key: String,
}

impl DeadlineExtractor {
    pub fn new(base_url: Url, model: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
            model,
            api_key,
        }
    }

    fn endpoint_url(&self) -> Url {
        let mut url = self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .unwrap();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    /// One synchronous call, no streaming, no retry. A well-formed empty
    /// array comes back as `Ok(vec![])`; everything else that can go wrong
    /// has its own `ExtractError` variant.
    pub async fn extract(&self, syllabus_text: &str) -> Result<Vec<RawDeadline>, ExtractError> {
        info!("extracting deadlines from syllabus");

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: build_prompt(syllabus_text),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint_url())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let reply: GenerateResponse = response.json().await?;

        let text = reply.text().ok_or(ExtractError::EmptyReply)?;
        let records = parse_reply(&text)?;
        info!(count = records.len(), "extracted deadline records");
        Ok(records)
    }
}

fn build_prompt(syllabus_text: &str) -> String {
    format!(
        r#"You are an expert academic assistant. Your job is to analyze the following course syllabus text and extract all important deadlines.
The output must be a valid JSON array of objects.

Each object in the array represents a single piece of coursework and must have three keys:
1. "assignment_name": A concise name for the coursework (e.g., "Essay 1", "Midterm Exam").
2. "due_date": The deadline for the assignment in "YYYY-MM-DD" format.
3. "assignment_type": The type of coursework. Choose from: "Essay", "Quiz", "Exam", "Project", "Presentation", "Other".

Syllabus Text:
---
{syllabus_text}
---

Analyze the text carefully. Pay attention to dates, assignment descriptions, and types.
Return ONLY the raw JSON array. Do not include any other text or formatting.
Example:
[
  {{"assignment_name": "Problem Set 1", "due_date": "2025-09-15", "assignment_type": "Project"}},
  {{"assignment_name": "Midterm Examination", "due_date": "2025-10-20", "assignment_type": "Exam"}}
]"#
    )
}

/// Models wrap JSON in Markdown fences despite being told not to.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_reply(raw: &str) -> Result<Vec<RawDeadline>, ExtractError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned).map_err(|err| ExtractError::MalformedReply {
        reason: err.to_string(),
        raw: truncate_for_log(raw),
    })
}

fn truncate_for_log(raw: &str) -> String {
    const LIMIT: usize = 200;
    if raw.len() <= LIMIT {
        return raw.to_string();
    }
    let mut end = LIMIT;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &raw[..end])
}

#[cfg(test)]
mod tests {
    use crate::models::AssignmentType;

    use super::*;

    #[test]
    fn test_build_prompt_embeds_syllabus() {
        let prompt = build_prompt("Essay 1 due on 2025-09-15.");
        assert!(prompt.contains("Essay 1 due on 2025-09-15."));
        assert!(prompt.contains("Return ONLY the raw JSON array"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  [] "), "[]");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn test_parse_reply_plain_and_fenced_agree() {
        let plain = r#"[{"assignment_name":"Quiz 1","due_date":"2025-09-20","assignment_type":"Quiz"}]"#;
        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(parse_reply(plain).unwrap(), parse_reply(&fenced).unwrap());
    }

    #[test]
    fn test_parse_reply_garbage() {
        let err = parse_reply("I could not find any deadlines.").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedReply { .. }));
    }

    #[test]
    fn test_parse_reply_passes_records_through() {
        let records = parse_reply(
            r#"[{"assignment_name":"Final","due_date":"2025-12-10","assignment_type":"Homework"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].assignment_type,
            Some(AssignmentType::Other("Homework".to_string()))
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[1,"},{"text":"2]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.text().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let reply: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(reply.text().is_none());
    }

    #[test]
    fn test_endpoint_url() {
        let extractor = DeadlineExtractor::new(
            Url::parse("https://example.com").unwrap(),
            "gemini-2.0-flash".to_string(),
            "secret".to_string(),
        );
        let url = extractor.endpoint_url();
        assert_eq!(
            url.path(),
            "/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(url.query(), Some("key=secret"));
    }
}
