use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    config::SecretStore,
    models::{ModelId, Notice, RunOutcome, ShellState},
    tasks::GenerativeBackend,
    template,
    upload::parse_multipart,
    workflow::{RunRequest, SummaryPipeline},
};

#[derive(Clone)]
pub struct AppState {
    pub shell: ShellState,
    pub pipeline: SummaryPipeline,
}

impl AppState {
    pub fn new(secrets: &SecretStore, backend: Arc<dyn GenerativeBackend>) -> Self {
        let shell = ShellState::from_api_key(secrets.api_key());
        if shell.is_blocked() {
            error!("No Gemini API key configured; the service will only show the administrator notice");
        }

        Self {
            shell,
            pipeline: SummaryPipeline::new(backend),
        }
    }
}

pub fn create_app(app_state: AppState) -> Router {
    build_router(app_state)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/summarize", post(run_summary))
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root(State(state): State<AppState>) -> Html<String> {
    match state.shell {
        ShellState::Blocked => template::render_blocked(),
        ShellState::Ready { .. } => template::render_ready(ModelId::default(), None),
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn run_summary(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let api_key = match &state.shell {
        ShellState::Blocked => {
            warn!("Run action ignored: no API key configured");
            return (StatusCode::SERVICE_UNAVAILABLE, template::render_blocked()).into_response();
        }
        ShellState::Ready { api_key } => api_key.clone(),
    };

    let fields = match multipart {
        Ok(multipart) => parse_multipart(multipart).await,
        Err(rejection) => Err(rejection.body_text()),
    };
    let fields = match fields {
        Ok(fields) => fields,
        Err(message) => {
            warn!("Rejected run form: {}", message);
            return bad_form(ModelId::default(), message);
        }
    };

    let model = match fields.model.as_deref().map(str::parse::<ModelId>) {
        None => ModelId::default(),
        Some(Ok(model)) => model,
        Some(Err(e)) => {
            warn!("Rejected run form: {}", e);
            return bad_form(ModelId::default(), e.to_string());
        }
    };

    info!(
        "Run requested with model {} (file attached: {})",
        model,
        fields.file.is_some()
    );

    let outcome = state
        .pipeline
        .run(RunRequest {
            api_key: Some(api_key),
            model,
            file: fields.file,
        })
        .await;

    template::render_ready(model, Some(&outcome)).into_response()
}

fn bad_form(model: ModelId, message: String) -> Response {
    let outcome = RunOutcome::with_notice(Notice::warning(message));
    (
        StatusCode::BAD_REQUEST,
        template::render_ready(model, Some(&outcome)),
    )
        .into_response()
}
