//! Media player collaborators.
//!
//! - `traits`: [`PlaylistSource`] and [`TrackQueue`], the seams the request
//!   engine talks through
//! - `client`: [`FoobarClient`], the foobar2000 `foo_httpcontrol` backend

mod client;
pub mod traits;

pub use client::FoobarClient;
pub use traits::{PlaylistSource, TrackQueue};

/// Errors talking to the media player
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlayerError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Player returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
