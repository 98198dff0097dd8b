mod history;
mod runs;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clipdeck_pipeline::PipelineContext;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_trigger_secret, TriggerAuth};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<PipelineContext>,
}

/// Error body shared by every route: `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: &'static str,
}

impl ApiError {
    /// Logs `error` and returns the generic 500 body.
    pub(super) fn internal(request_id: &str, error: &dyn std::fmt::Display) -> Self {
        tracing::error!(request_id, error = %error, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                ok: false,
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    ok: bool,
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Routes that start a pipeline run and therefore need the trigger secret.
fn trigger_router(auth: TriggerAuth) -> Router<AppState> {
    Router::new()
        .route("/trigger-daily", get(runs::trigger_daily))
        .route("/api/cron/daily", get(runs::trigger_daily))
        .route("/run", post(runs::run_with_options))
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_trigger_secret,
        ))
}

pub fn build_app(state: AppState, auth: TriggerAuth) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/run", get(runs::latest_run))
        .route("/history", get(history::list_history))
        .route("/status", get(history::status));

    Router::new()
        .merge(public_routes)
        .merge(trigger_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        ok: true,
        status: "ok",
    })
}
