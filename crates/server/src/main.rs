use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use report_form::{Draft, FormController, SubmitResult};
use sheets::GoogleSheetsGateway;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{AppendOutcome, FieldValidationRequest, FieldValidationResponse},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod render;

use api::{find_form, open_form, submit_report, validate_field, ApiContext};
use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let schema = settings.form_schema();
    info!(
        variant = ?settings.form_variant,
        policy = ?schema.success_policy,
        range = %settings.sheets.target_range(),
        "loaded settings"
    );

    let gateway = Arc::new(GoogleSheetsGateway::new(settings.sheets));
    let state = AppState {
        api: ApiContext::new(schema, gateway),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(new_form))
        .route("/healthz", get(healthz))
        .route("/forms/:form_id", get(show_form).post(submit_form))
        .route("/forms/:form_id/fields/:field", post(http_validate_field))
        .route("/api/reports", post(http_submit_report))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

fn http_error(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
    };
    (status, Json(err))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn new_form(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = open_form(&state.api).await;
    let snapshot = form.snapshot().await;
    Html(render::form_page(form.id(), form.schema(), &snapshot, &[]))
}

async fn show_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> (StatusCode, Html<String>) {
    match find_form(&state.api, &form_id).await {
        Ok(form) => render_form(&form, StatusCode::OK).await,
        Err(_) => (StatusCode::NOT_FOUND, Html(render::not_found_page())),
    }
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Form(draft): Form<Draft>,
) -> (StatusCode, Html<String>) {
    let form = match find_form(&state.api, &form_id).await {
        Ok(form) => form,
        Err(_) => return (StatusCode::NOT_FOUND, Html(render::not_found_page())),
    };

    form.replace_draft(draft).await;
    let status = match form.submit().await {
        SubmitResult::Succeeded(_) | SubmitResult::Closed => StatusCode::OK,
        SubmitResult::Blocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitResult::InFlight => {
            warn!(form_id = %form.id(), "rejected duplicate submit");
            StatusCode::CONFLICT
        }
        SubmitResult::Failed(_) => StatusCode::BAD_GATEWAY,
    };
    render_form(&form, status).await
}

async fn render_form(form: &FormController, status: StatusCode) -> (StatusCode, Html<String>) {
    let notifications = form.take_notifications().await;
    let snapshot = form.snapshot().await;
    if snapshot.is_closed() {
        return (status, Html(render::thank_you_page(&notifications)));
    }
    (
        status,
        Html(render::form_page(
            form.id(),
            form.schema(),
            &snapshot,
            &notifications,
        )),
    )
}

async fn http_validate_field(
    State(state): State<Arc<AppState>>,
    Path((form_id, field)): Path<(String, String)>,
    Json(req): Json<FieldValidationRequest>,
) -> Result<Json<FieldValidationResponse>, HttpError> {
    let response = validate_field(&state.api, &form_id, &field, req.value)
        .await
        .map_err(http_error)?;
    Ok(Json(response))
}

async fn http_submit_report(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<Draft>,
) -> Result<(StatusCode, Json<AppendOutcome>), HttpError> {
    let outcome = submit_report(&state.api, &draft)
        .await
        .map_err(http_error)?;
    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    Ok((status, Json(outcome)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
