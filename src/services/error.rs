use crate::domain::playlist::VideoId;
use crate::domain::track::TrackQuery;

/// Statuses worth another attempt when appending to a playlist.
pub const TRANSIENT_STATUSES: [u16; 3] = [409, 500, 503];

/// A failed call to one of the upstream HTTP APIs.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Only status responses can be transient; a transport failure never is.
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Status { status, .. } => TRANSIENT_STATUSES.contains(status),
            UpstreamError::Transport(_) => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Spotify rejected the access token: {0}")]
    Auth(UpstreamError),
    #[error("YouTube authorization failed: {0}")]
    AuthFlow(String),
    #[error("Spotify error: {0}")]
    UpstreamRead(UpstreamError),
    #[error("YouTube search for \"{query}\" failed: {source}")]
    UpstreamSearch {
        query: TrackQuery,
        source: UpstreamError,
    },
    #[error("Failed to create YouTube playlist: {0}")]
    UpstreamWrite(UpstreamError),
    #[error("Failed to add video {video_id} due to unexpected error: {source}")]
    Append {
        video_id: VideoId,
        source: UpstreamError,
    },
}
