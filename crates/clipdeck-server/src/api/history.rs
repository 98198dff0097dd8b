use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use clipdeck_core::{Capabilities, HistoryRecord, DAILY_VIDEO_TARGET, HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

/// Records shown on the status page.
const STATUS_HISTORY_LEN: usize = 10;

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryResponse {
    ok: bool,
    history: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusResponse {
    ok: bool,
    daily_target: usize,
    min_view_count: u64,
    capabilities: Capabilities,
    latest: Option<HistoryRecord>,
    history: Vec<HistoryRecord>,
}

/// Parses `?limit=`, defaulting to the full capacity and clamping to `1..=30`.
pub(super) fn normalize_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(HISTORY_CAPACITY, |n| {
            usize::try_from(n.clamp(1, 30)).unwrap_or(HISTORY_CAPACITY)
        })
}

/// `GET /history`: recent runs, most recent first.
pub(super) async fn list_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = normalize_limit(query.limit.as_deref());
    let history = state
        .ctx
        .history
        .recent(limit)
        .await
        .map_err(|e| ApiError::internal(&req_id.0, &e))?;
    Ok(Json(HistoryResponse { ok: true, history }))
}

/// `GET /status`: configuration checklist plus the latest runs.
pub(super) async fn status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<StatusResponse>, ApiError> {
    let store = &state.ctx.history;
    let latest = store
        .latest()
        .await
        .map_err(|e| ApiError::internal(&req_id.0, &e))?;
    let recent = store
        .recent(STATUS_HISTORY_LEN)
        .await
        .map_err(|e| ApiError::internal(&req_id.0, &e))?;

    Ok(Json(StatusResponse {
        ok: true,
        daily_target: DAILY_VIDEO_TARGET,
        min_view_count: clipdeck_core::DEFAULT_MIN_VIEW_COUNT,
        capabilities: state.ctx.capabilities,
        history: merge_latest(latest.as_ref(), recent),
        latest,
    }))
}

/// `latest` first, then `recent` without repeated ids, capped for display.
pub(super) fn merge_latest(
    latest: Option<&HistoryRecord>,
    recent: Vec<HistoryRecord>,
) -> Vec<HistoryRecord> {
    let mut seen = HashSet::new();
    latest
        .cloned()
        .into_iter()
        .chain(recent)
        .filter(|record| seen.insert(record.id.clone()))
        .take(STATUS_HISTORY_LEN)
        .collect()
}
