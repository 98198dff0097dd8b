//! HTTP client for TikTok's content-posting API.

use std::time::Duration;

use clipdeck_core::{AppConfig, Video};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::caption::build_caption;
use crate::error::PublishError;

pub const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com";

const USER_AGENT: &str = concat!("clipdeck/", env!("CARGO_PKG_VERSION"));

/// Posts videos to one TikTok account.
///
/// Each post is three calls: download the source media, upload the bytes to
/// obtain an upload id, then publish that upload with a generated caption.
pub struct TikTokPublisher {
    client: Client,
    access_token: String,
    publisher_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    upload_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PublishRequest<'a> {
    pub(crate) post_info: PostInfo,
    pub(crate) upload_id: &'a str,
    pub(crate) media_type: &'static str,
    pub(crate) publisher_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostInfo {
    pub(crate) description: String,
    pub(crate) privacy_level: &'static str,
}

impl TikTokPublisher {
    /// # Errors
    ///
    /// Returns [`PublishError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        access_token: &str,
        publisher_id: &str,
        timeout_secs: u64,
    ) -> Result<Self, PublishError> {
        Self::with_base_url(access_token, publisher_id, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a publisher against a custom API base, e.g. a mock server.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        access_token: &str,
        publisher_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            publisher_id: publisher_id.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Builds a publisher when both the access token and publisher id are
    /// configured; `Ok(None)` means publishing is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, PublishError> {
        match (&config.tiktok_access_token, &config.tiktok_publisher_id) {
            (Some(token), Some(publisher_id)) => Self::with_base_url(
                token,
                publisher_id,
                config.http_timeout_secs,
                &config.tiktok_api_base_url,
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    /// Fetches the raw media bytes for a video from its source URL.
    ///
    /// # Errors
    ///
    /// - [`PublishError::Download`] on a non-2xx response.
    /// - [`PublishError::Http`] on network failure.
    pub async fn download(&self, video: &Video) -> Result<Vec<u8>, PublishError> {
        let response = self.client.get(&video.video_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Download {
                status: status.as_u16(),
                url: video.video_url.clone(),
            });
        }
        let bytes = response.bytes().await?;
        tracing::debug!(video_id = %video.id, bytes = bytes.len(), "publisher: downloaded media");
        Ok(bytes.to_vec())
    }

    /// Downloads the video and uploads it, returning TikTok's upload id.
    ///
    /// # Errors
    ///
    /// - Any error from [`TikTokPublisher::download`].
    /// - [`PublishError::Upload`] on a non-2xx upload response.
    /// - [`PublishError::MissingUploadId`] if the response carries no upload id.
    pub async fn upload(&self, video: &Video) -> Result<String, PublishError> {
        let media = self.download(video).await?;

        let part = Part::bytes(media)
            .file_name(format!("{}.mp4", video.id))
            .mime_str("video/mp4")?;
        let form = Form::new().part("video", part);

        let response = self
            .client
            .post(format!("{}/v2/post/upload/", self.base_url))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(PublishError::Upload {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_str::<UploadResponse>(&text)
            .ok()
            .and_then(|r| r.data)
            .and_then(|d| d.upload_id)
            .filter(|id| !id.is_empty())
            .ok_or(PublishError::MissingUploadId)
    }

    /// Publishes a finished upload publicly with the video's caption.
    ///
    /// # Errors
    ///
    /// - [`PublishError::Publish`] on a non-2xx response.
    /// - [`PublishError::Http`] on network failure.
    pub async fn publish(&self, video: &Video, upload_id: &str) -> Result<(), PublishError> {
        let body = PublishRequest {
            post_info: PostInfo {
                description: build_caption(video),
                privacy_level: "PUBLIC",
            },
            upload_id,
            media_type: "VIDEO",
            publisher_id: &self.publisher_id,
        };

        let response = self
            .client
            .post(format!("{}/v2/post/publish/", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PublishError::Publish {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
