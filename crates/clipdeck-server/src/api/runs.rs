use axum::{body::Bytes, extract::State, Extension, Json};
use clipdeck_core::{HistoryRecord, RunResult};
use clipdeck_pipeline::{run_daily, RunOptions};
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct RunResponse {
    ok: bool,
    result: RunResult,
}

#[derive(Debug, Serialize)]
pub(super) struct LatestResponse {
    ok: bool,
    latest: Option<HistoryRecord>,
}

/// `GET /trigger-daily`: one run with default options.
pub(super) async fn trigger_daily(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<RunResponse>, ApiError> {
    tracing::info!(request_id = %req_id.0, "api: daily trigger received");
    execute(&state, RunOptions::default(), &req_id.0).await
}

/// `POST /run`: one run with caller overrides.
///
/// The body is read leniently: a missing or non-JSON body counts as `{}`, and
/// `minViewCount` / `skipPosting` of the wrong type are ignored.
pub(super) async fn run_with_options(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<RunResponse>, ApiError> {
    let options = options_from_body(&body);
    tracing::info!(
        request_id = %req_id.0,
        min_view_count = options.min_view_count,
        skip_posting = options.skip_posting,
        "api: manual run received"
    );
    execute(&state, options, &req_id.0).await
}

/// `GET /run`: the latest recorded run, without starting one.
pub(super) async fn latest_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<LatestResponse>, ApiError> {
    let latest = state
        .ctx
        .history
        .latest()
        .await
        .map_err(|e| ApiError::internal(&req_id.0, &e))?;
    Ok(Json(LatestResponse { ok: true, latest }))
}

async fn execute(
    state: &AppState,
    options: RunOptions,
    request_id: &str,
) -> Result<Json<RunResponse>, ApiError> {
    let result = run_daily(&state.ctx, options)
        .await
        .map_err(|e| ApiError::internal(request_id, &e))?;
    Ok(Json(RunResponse { ok: true, result }))
}

pub(super) fn options_from_body(body: &[u8]) -> RunOptions {
    let payload: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let defaults = RunOptions::default();
    RunOptions {
        min_view_count: payload
            .get("minViewCount")
            .and_then(view_floor)
            .unwrap_or(defaults.min_view_count),
        skip_posting: payload
            .get("skipPosting")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.skip_posting),
        ..defaults
    }
}

/// Any finite, non-negative JSON number, floored.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn view_floor(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.floor() as u64)
    })
}
