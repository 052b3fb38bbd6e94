use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    AppState,
    auth::verify_token,
    calendar::{CalendarBuilder, CalendarOutcome},
    error::ApiError,
    models::RawDeadline,
    validation::validate_course_name,
};

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    /// Display name of the course, also the basis of the calendar file name.
    pub course_name: String,
    /// Raw syllabus text, passed to the model verbatim.
    pub syllabus_text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub status: String,
    /// Raw records as extracted, shown even when some fail date validation.
    pub deadlines: Vec<RawDeadline>,
    pub scheduled: usize,
    pub skipped: usize,
    /// Path of the written calendar file; null when nothing was written.
    pub calendar_file: Option<String>,
}

#[utoipa::path(get, path = "/", tag = "schedule")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Syllabus Scheduler API",
        "endpoints": {
            "/schedule": "Extract deadlines from a syllabus and write an .ics calendar",
            "/schedule.ical": "Extract deadlines and download the .ics calendar directly"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "schedule")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "schedule")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Runs the extract-then-build pipeline shared by both schedule endpoints.
async fn run_pipeline(
    state: &AppState,
    request: &ScheduleRequest,
) -> Result<(String, Vec<RawDeadline>, CalendarOutcome), ApiError> {
    let course_name = validate_course_name(&request.course_name)?.to_string();

    let records = state.extractor.extract(&request.syllabus_text).await?;
    if records.is_empty() {
        return Err(ApiError::NotFound(
            "No deadlines found in the syllabus".into(),
        ));
    }

    let outcome = state.builder.build(&course_name, &records)?;
    Ok((course_name, records, outcome))
}

fn status_message(outcome: &CalendarOutcome, total: usize) -> String {
    if outcome.scheduled == total {
        format!("Scheduled {} deadlines", outcome.scheduled)
    } else if outcome.scheduled > 0 {
        format!(
            "Partial success: {} of {} deadlines scheduled",
            outcome.scheduled, total
        )
    } else {
        format!("No deadlines could be scheduled: all {total} records were invalid")
    }
}

#[utoipa::path(
    post,
    path = "/schedule",
    request_body = ScheduleRequest,
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Extracted deadlines and calendar file path", body = ScheduleResponse),
        (status = 400, description = "Empty course name"),
        (status = 401, description = "Invalid authentication token"),
        (status = 404, description = "No deadlines found in the syllabus"),
        (status = 502, description = "Model endpoint failed or returned an unusable reply")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedule"
)]
pub async fn post_schedule(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    axum::extract::Query(query): axum::extract::Query<AuthQuery>,
    Json(request): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let (_, records, outcome) = run_pipeline(&state, &request).await?;

    Ok(Json(ScheduleResponse {
        status: status_message(&outcome, records.len()),
        deadlines: records,
        scheduled: outcome.scheduled,
        skipped: outcome.skipped.len(),
        calendar_file: outcome
            .file
            .map(|path| path.to_string_lossy().into_owned()),
    }))
}

#[utoipa::path(
    post,
    path = "/schedule.ical",
    request_body = ScheduleRequest,
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 400, description = "Empty course name"),
        (status = 401, description = "Invalid authentication token"),
        (status = 404, description = "No deadlines with a valid due date"),
        (status = 502, description = "Model endpoint failed or returned an unusable reply")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedule"
)]
pub async fn post_schedule_ical(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    axum::extract::Query(query): axum::extract::Query<AuthQuery>,
    Json(request): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let (course_name, _, outcome) = run_pipeline(&state, &request).await?;

    if outcome.scheduled == 0 {
        return Err(ApiError::NotFound(
            "No deadlines with a valid due date".into(),
        ));
    }

    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar".to_string()),
            (
                "content-disposition",
                format!(
                    "attachment; filename={}",
                    CalendarBuilder::file_name(&course_name)
                ),
            ),
        ],
        outcome.body,
    ))
}
