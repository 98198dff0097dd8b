//! Minimal Upstash Redis REST client.
//!
//! Upstash accepts a Redis command as a JSON array posted to the database
//! URL and answers `{"result": ...}` or `{"error": "..."}`. A transaction is
//! an array of such arrays posted to `/multi-exec`, answered with one
//! envelope per command.

use std::time::Duration;

use clipdeck_core::AppConfig;
use reqwest::Client;
use serde_json::Value;

use crate::error::HistoryError;

const USER_AGENT: &str = concat!("clipdeck/", env!("CARGO_PKG_VERSION"));

/// Connection to one Upstash database. Built once per process and shared.
pub struct KvClient {
    client: Client,
    url: String,
    token: String,
}

impl KvClient {
    /// # Errors
    ///
    /// Returns [`HistoryError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(url: &str, token: &str, timeout_secs: u64) -> Result<Self, HistoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        })
    }

    /// Builds a client when both Upstash variables are set; `Ok(None)` means
    /// persistence is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, HistoryError> {
        match (
            &config.upstash_redis_rest_url,
            &config.upstash_redis_rest_token,
        ) {
            (Some(url), Some(token)) => Self::new(url, token, config.http_timeout_secs).map(Some),
            _ => Ok(None),
        }
    }

    /// Runs one command and returns its `result`.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Api`] on a non-2xx status or an `"error"` envelope.
    /// - [`HistoryError::Http`] on network failure.
    /// - [`HistoryError::Serialize`] if the body is not JSON.
    pub async fn command(&self, args: &[&str]) -> Result<Value, HistoryError> {
        let body = self.post(&self.url, args).await?;
        Self::unwrap_envelope(body)
    }

    /// Runs commands as one atomic `MULTI`/`EXEC` transaction and returns
    /// each command's result in order.
    ///
    /// # Errors
    ///
    /// Same as [`KvClient::command`]; an error in any single command fails
    /// the whole call.
    pub async fn transaction(&self, commands: &[Vec<String>]) -> Result<Vec<Value>, HistoryError> {
        let url = format!("{}/multi-exec", self.url);
        let body = self.post(&url, commands).await?;
        let Value::Array(envelopes) = body else {
            return Err(HistoryError::Api(format!(
                "expected an array from multi-exec, got: {body}"
            )));
        };
        envelopes.into_iter().map(Self::unwrap_envelope).collect()
    }

    /// `GET key`; `None` when the key does not exist.
    ///
    /// # Errors
    ///
    /// See [`KvClient::command`].
    pub async fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Ok(Some(other.to_string())),
        }
    }

    /// `LRANGE key start stop`, inclusive on both ends.
    ///
    /// Non-string elements are rendered back to JSON text so the caller can
    /// decide whether they are usable.
    ///
    /// # Errors
    ///
    /// See [`KvClient::command`].
    pub async fn lrange(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, HistoryError> {
        let start = start.to_string();
        let stop = stop.to_string();
        match self.command(&["LRANGE", key, &start, &stop]).await? {
            Value::Array(items) => Ok(items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()),
            Value::Null => Ok(Vec::new()),
            other => Err(HistoryError::Api(format!(
                "expected an array from LRANGE, got: {other}"
            ))),
        }
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Value, HistoryError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
                .unwrap_or(text);
            return Err(HistoryError::Api(format!("{} - {message}", status.as_u16())));
        }

        serde_json::from_str(&text).map_err(|source| HistoryError::Serialize {
            context: format!("response from {url}"),
            source,
        })
    }

    /// Extracts `result` from `{"result": ...}`, surfacing `{"error": ...}`.
    fn unwrap_envelope(envelope: Value) -> Result<Value, HistoryError> {
        if let Some(message) = envelope.get("error").and_then(Value::as_str) {
            return Err(HistoryError::Api(message.to_owned()));
        }
        match envelope {
            Value::Object(mut map) => Ok(map.remove("result").unwrap_or(Value::Null)),
            other => Err(HistoryError::Api(format!(
                "unexpected response envelope: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_envelope_returns_result() {
        let value = KvClient::unwrap_envelope(serde_json::json!({ "result": ["a", "b"] })).unwrap();
        assert_eq!(value, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn unwrap_envelope_missing_result_is_null() {
        let value = KvClient::unwrap_envelope(serde_json::json!({})).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn unwrap_envelope_surfaces_error() {
        let err =
            KvClient::unwrap_envelope(serde_json::json!({ "error": "WRONGTYPE" })).unwrap_err();
        assert!(matches!(err, HistoryError::Api(ref m) if m == "WRONGTYPE"));
    }

    #[test]
    fn unwrap_envelope_rejects_non_object() {
        let err = KvClient::unwrap_envelope(serde_json::json!("OK")).unwrap_err();
        assert!(matches!(err, HistoryError::Api(_)));
    }
}
