//! HTTP client for the Apify actor-run API.
//!
//! A search is three calls: start an actor run, long-poll it until it reaches
//! a terminal status, then read the run's default dataset.

use std::time::Duration;

use clipdeck_core::AppConfig;
use reqwest::{Client, Response};

use crate::error::ScraperError;
use crate::types::{ApiResponse, RawVideo, RunData, SearchActorInput, SearchOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Seconds Apify holds a run-status request open before answering.
const WAIT_FOR_FINISH_SECS: u32 = 60;

/// Upper bound on status polls for one run, roughly half an hour of waiting.
pub(crate) const MAX_POLLS: u32 = 30;

const USER_AGENT: &str = concat!("clipdeck/", env!("CARGO_PKG_VERSION"));

/// Client for one configured Apify search actor.
pub struct ApifyClient {
    client: Client,
    token: String,
    actor: String,
    base_url: String,
}

impl ApifyClient {
    /// Creates a client against the public Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, actor: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(token, actor, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom API base, e.g. a mock server.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        token: &str,
        actor: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            token: token.to_owned(),
            actor: actor.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Credential`] when `APIFY_TOKEN` is not set,
    /// otherwise whatever [`ApifyClient::with_base_url`] returns.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let token = config
            .apify_token
            .as_deref()
            .ok_or(ScraperError::Credential)?;
        Self::with_base_url(
            token,
            &config.apify_actor,
            config.http_timeout_secs,
            &config.apify_base_url,
        )
    }

    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Runs the search actor and returns the raw dataset items.
    ///
    /// Items whose reported play count is below `options.min_view_count` are
    /// dropped here; items without a play count are kept for the caller to
    /// judge. A run that finishes without a dataset yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Provider`] for any non-2xx response.
    /// - [`ScraperError::RunFailed`] if the run ends `FAILED`, `ABORTED` or `TIMED-OUT`.
    /// - [`ScraperError::PollLimit`] if the run never reaches a terminal status.
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::Deserialize`] if a response body is not the expected JSON.
    pub async fn fetch_candidates(
        &self,
        options: &SearchOptions,
    ) -> Result<Vec<RawVideo>, ScraperError> {
        let input = Self::actor_input(options);
        tracing::info!(
            actor = %self.actor,
            terms = input.search_terms.len(),
            max_items = input.max_items,
            "apify: starting search run"
        );

        let run = self.start_run(&input).await?;
        tracing::info!(run_id = %run.id, "apify: run started, polling for completion");

        let finished = self.wait_for_run(run).await?;
        let Some(dataset_id) = finished.default_dataset_id.as_deref() else {
            tracing::warn!(run_id = %finished.id, "apify: run finished without a dataset");
            return Ok(Vec::new());
        };

        let items = self.dataset_items(dataset_id, options.dataset_limit()).await?;
        let total = items.len();
        let kept: Vec<RawVideo> = items
            .into_iter()
            .filter(|item| {
                item.reported_play_count()
                    .is_none_or(|views| views >= options.min_view_count)
            })
            .collect();

        tracing::info!(
            run_id = %finished.id,
            total,
            kept = kept.len(),
            "apify: fetched dataset items"
        );
        Ok(kept)
    }

    /// Starts an actor run, letting Apify hold the request up to a minute.
    ///
    /// # Errors
    ///
    /// See [`ApifyClient::fetch_candidates`].
    pub async fn start_run(&self, input: &SearchActorInput) -> Result<RunData, ScraperError> {
        let url = self.run_url();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", WAIT_FOR_FINISH_SECS)])
            .json(input)
            .send()
            .await?;
        let body = Self::success_body(response, &url).await?;
        Self::parse_run(&body, "actor run start")
    }

    /// Polls a run until it reaches a terminal status.
    ///
    /// # Errors
    ///
    /// See [`ApifyClient::fetch_candidates`].
    pub async fn wait_for_run(&self, run: RunData) -> Result<RunData, ScraperError> {
        let mut current = run;
        let mut polls = 0;
        while !current.is_terminal() {
            if polls >= MAX_POLLS {
                return Err(ScraperError::PollLimit {
                    run_id: current.id,
                    status: current.status,
                    polls,
                });
            }
            polls += 1;
            tracing::debug!(
                run_id = %current.id,
                status = %current.status,
                polls,
                "apify: run in progress"
            );

            let url = format!("{}/actor-runs/{}", self.base_url, current.id);
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("waitForFinish", WAIT_FOR_FINISH_SECS)])
                .send()
                .await?;
            let body = Self::success_body(response, &url).await?;
            current = Self::parse_run(&body, "actor run status")?;
        }

        if current.status == "SUCCEEDED" {
            Ok(current)
        } else {
            Err(ScraperError::RunFailed {
                run_id: current.id,
                status: current.status,
            })
        }
    }

    /// Reads up to `limit` items from a dataset.
    ///
    /// Each item is decoded on its own; one that is not an object is skipped
    /// rather than failing the batch.
    ///
    /// # Errors
    ///
    /// See [`ApifyClient::fetch_candidates`].
    pub async fn dataset_items(
        &self,
        dataset_id: &str,
        limit: u32,
    ) -> Result<Vec<RawVideo>, ScraperError> {
        let url = format!("{}/datasets/{dataset_id}/items", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("format", "json"), ("clean", "true")])
            .query(&[("limit", limit)])
            .send()
            .await?;
        let body = Self::success_body(response, &url).await?;

        let values: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
                context: format!("dataset {dataset_id} items"),
                source,
            })?;

        let total = values.len();
        let items: Vec<RawVideo> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if items.len() < total {
            tracing::debug!(
                dataset_id,
                skipped = total - items.len(),
                "apify: skipped undecodable dataset items"
            );
        }
        Ok(items)
    }

    fn actor_input(options: &SearchOptions) -> SearchActorInput {
        let search_terms = if options.search_terms.is_empty() {
            crate::types::DEFAULT_SEARCH_TERMS
                .iter()
                .map(ToString::to_string)
                .collect()
        } else {
            options.search_terms.clone()
        };
        SearchActorInput {
            search_terms,
            search_type: "general",
            max_items: options.actor_max_items(),
            language: "en",
            save_input: false,
        }
    }

    /// Apify addresses actors as `owner~name` in URL paths.
    fn run_url(&self) -> String {
        format!("{}/acts/{}/runs", self.base_url, self.actor.replace('/', "~"))
    }

    async fn success_body(response: Response, url: &str) -> Result<String, ScraperError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ScraperError::Provider {
                status: status.as_u16(),
                url: url.to_owned(),
                message: body,
            })
        }
    }

    fn parse_run(body: &str, context: &str) -> Result<RunData, ScraperError> {
        serde_json::from_str::<ApiResponse<RunData>>(body)
            .map(|envelope| envelope.data)
            .map_err(|source| ScraperError::Deserialize {
                context: context.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
