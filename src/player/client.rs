//! foo_httpcontrol HTTP client
//!
//! foobar2000's `foo_httpcontrol` component exposes the active playlist and
//! player commands over plain HTTP. Two endpoints are used:
//!
//! - `{base}/{template}/?param3=playlist.json` returns the playlist, either
//!   as a JSON-encoded string or as the raw template output
//! - `{base}/{template}/?cmd=QueueItems&param1={index}` queues a playlist
//!   position
//!
//! Positions are zero-based and refer to the playlist the template renders.

use std::time::Duration;

use tracing::{debug, info};

use super::PlayerError;
use crate::catalogue::parse_playlist_body;

/// foo_httpcontrol client
pub struct FoobarClient {
    http_client: reqwest::Client,
    base_url: String,
    template: String,
}

impl FoobarClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8888`).
    pub fn new(
        base_url: impl Into<String>,
        template: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlayerError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| PlayerError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            template: template.into(),
        })
    }

    fn playlist_url(&self) -> String {
        format!("{}/{}/?param3=playlist.json", self.base_url, self.template)
    }

    fn queue_url(&self, index: usize) -> String {
        format!(
            "{}/{}/?cmd=QueueItems&param1={}",
            self.base_url, self.template, index
        )
    }

    /// Download and split the playlist.
    pub async fn fetch_playlist(&self) -> Result<Vec<String>, PlayerError> {
        let body = self.get(&self.playlist_url()).await?;
        let labels = parse_playlist_body(&decode_body(&body));
        info!(tracks = labels.len(), "Playlist loaded");
        Ok(labels)
    }

    /// Ask the player to queue playlist position `index`.
    pub async fn queue_item(&self, index: usize) -> Result<(), PlayerError> {
        self.get(&self.queue_url(index)).await?;
        debug!(index, "Track queued");
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<String, PlayerError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PlayerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlayerError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| PlayerError::Network(e.to_string()))
    }
}

/// Unwrap a JSON string body; anything else is returned as-is.
fn decode_body(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_string())
}
