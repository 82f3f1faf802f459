//! Trait definitions for the media player collaborators.
//!
//! The request engine only needs two things from the player: the playlist
//! labels once at startup, and a way to queue a playlist position. Keeping
//! them behind traits lets tests substitute mocks for the HTTP client.

use async_trait::async_trait;

use super::PlayerError;

/// Source of the session's track labels.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetch the playlist as ordered labels.
    async fn load_catalogue(&self) -> Result<Vec<String>, PlayerError>;
}

/// Queues tracks for playback.
#[async_trait]
pub trait TrackQueue: Send + Sync {
    /// Queue the track at playlist position `index`.
    async fn enqueue(&self, index: usize) -> Result<(), PlayerError>;
}

#[async_trait]
impl PlaylistSource for super::FoobarClient {
    async fn load_catalogue(&self) -> Result<Vec<String>, PlayerError> {
        self.fetch_playlist().await
    }
}

#[async_trait]
impl TrackQueue for super::FoobarClient {
    async fn enqueue(&self, index: usize) -> Result<(), PlayerError> {
        self.queue_item(index).await
    }
}
