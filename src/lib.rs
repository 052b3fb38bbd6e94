pub mod auth;
pub mod calendar;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{healthz_live, healthz_ready, post_schedule, post_schedule_ical, root};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::calendar::CalendarBuilder;
use crate::extractor::DeadlineExtractor;
use crate::openapi::ApiDoc;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub extractor: Arc<DeadlineExtractor>,
    pub builder: Arc<CalendarBuilder>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState {
        settings: settings.clone(),
        extractor: Arc::new(DeadlineExtractor::new(
            settings.gemini_base_url.clone(),
            settings.gemini_model.clone(),
            settings.gemini_api_key.clone(),
        )),
        builder: Arc::new(CalendarBuilder::new(settings.output_dir.clone())),
    };

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Syllabus Scheduler API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/schedule", post(post_schedule))
        .route("/schedule.ical", post(post_schedule_ical))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
