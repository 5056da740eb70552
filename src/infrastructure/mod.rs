use async_trait::async_trait;

use crate::domain::playlist::{
    DestinationPlaylist, PlaylistDraft, PlaylistId, SourcePlaylistId, VideoId,
};
use crate::domain::track::TrackQuery;
use crate::services::error::{MigrationError, UpstreamError};

pub mod google_auth;
pub mod spotify;
pub mod youtube;

/// Reads the tracks of a playlist on the source catalog.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn fetch_tracks(
        &self,
        playlist_id: &SourcePlaylistId,
    ) -> Result<Vec<TrackQuery>, MigrationError>;
}

/// Finds the single most relevant video for a free-text query.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn find_best_match(&self, query: &TrackQuery) -> Result<Option<VideoId>, UpstreamError>;
}

#[async_trait]
pub trait PlaylistWriter: Send + Sync {
    async fn create_playlist(
        &self,
        draft: &PlaylistDraft,
    ) -> Result<DestinationPlaylist, UpstreamError>;

    async fn insert_playlist_item(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
    ) -> Result<(), UpstreamError>;
}

/// Turns a non-success response into an [`UpstreamError::Status`].
pub(crate) async fn ensure_success(
    resp: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        status: status.as_u16(),
        body,
    })
}
