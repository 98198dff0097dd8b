use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-secret guard for the pipeline trigger routes.
#[derive(Clone)]
pub struct TriggerAuth {
    secret: Option<Arc<str>>,
}

impl std::fmt::Debug for TriggerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerAuth")
            .field("enabled", &self.enabled())
            .finish()
    }
}

impl TriggerAuth {
    /// With `None`, every caller is let through.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.map(Arc::from),
        }
    }

    #[must_use]
    pub fn from_config(config: &clipdeck_core::AppConfig) -> Self {
        let auth = Self::new(config.daily_trigger_secret.as_deref());
        if !auth.enabled() {
            tracing::warn!(
                "DAILY_TRIGGER_SECRET not set; trigger endpoints accept unauthenticated requests"
            );
        }
        auth
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// The `secret` query parameter wins over the `Authorization` header when
    /// both are present.
    fn allows(&self, query_secret: Option<&str>, headers: &HeaderMap) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };
        let provided = query_secret
            .or_else(|| {
                headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(strip_bearer)
            })
            .unwrap_or_default();
        provided.as_bytes().ct_eq(secret.as_bytes()).into()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretQuery {
    secret: Option<String>,
}

/// Axum middleware that extracts or generates a request ID.
///
/// An incoming `x-request-id` header is reused, otherwise a new `UUIDv4` is
/// generated. The ID is stored as a [`RequestId`] extension and echoed on the
/// response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware rejecting trigger calls that do not carry the shared secret.
pub async fn require_trigger_secret(
    State(auth): State<TriggerAuth>,
    req: Request,
    next: Next,
) -> Response {
    let query = Query::<SecretQuery>::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();

    if auth.allows(query.secret.as_deref(), req.headers()) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected trigger call with missing or wrong secret");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "ok": false, "error": "Unauthorized" })),
    )
        .into_response()
}

/// Drops a leading case-insensitive `Bearer ` and surrounding whitespace.
fn strip_bearer(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim(),
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn strip_bearer_is_case_insensitive() {
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("bearer   abc "), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
    }

    #[test]
    fn open_auth_allows_everything() {
        let auth = TriggerAuth::new(None);
        assert!(!auth.enabled());
        assert!(auth.allows(None, &HeaderMap::new()));
    }

    #[test]
    fn secret_matches_header_or_query() {
        let auth = TriggerAuth::new(Some("s3cret"));
        assert!(auth.allows(None, &headers_with_auth("Bearer s3cret")));
        assert!(auth.allows(Some("s3cret"), &HeaderMap::new()));
        assert!(!auth.allows(None, &HeaderMap::new()));
        assert!(!auth.allows(None, &headers_with_auth("Bearer s3cre")));
        assert!(!auth.allows(None, &headers_with_auth("Bearer s3cret2")));
    }

    #[test]
    fn query_secret_takes_precedence_over_header() {
        let auth = TriggerAuth::new(Some("s3cret"));
        assert!(!auth.allows(Some("wrong"), &headers_with_auth("Bearer s3cret")));
    }

    #[test]
    fn debug_does_not_print_secret() {
        let rendered = format!("{:?}", TriggerAuth::new(Some("s3cret")));
        assert!(!rendered.contains("s3cret"));
    }
}
