use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{PlaylistSource, ensure_success};
use crate::domain::playlist::SourcePlaylistId;
use crate::domain::track::{Track, TrackQuery};
use crate::services::error::{MigrationError, UpstreamError};

#[derive(Deserialize, Default)]
struct PlaylistResponse {
    #[serde(default)]
    tracks: TracksPage,
}

#[derive(Deserialize, Default)]
struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    track: Option<TrackObject>,
}

#[derive(Deserialize)]
struct TrackObject {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<Artist>,
}

#[derive(Deserialize)]
struct Artist {
    name: String,
}

impl PlaylistResponse {
    /// Tracks in playlist order; items whose track was removed are dropped.
    fn into_tracks(self) -> Vec<Track> {
        self.tracks
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(|track| {
                let artists = track.artists.into_iter().map(|a| a.name).collect();
                Track::new(track.name.unwrap_or_default(), artists)
            })
            .collect()
    }
}

/// Reads playlists from the Spotify Web API with a pre-issued bearer token.
pub struct SpotifyClient {
    http: Client,
    api_base: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            access_token: access_token.into(),
        }
    }

    pub async fn get_playlist_tracks(
        &self,
        playlist_id: &SourcePlaylistId,
    ) -> Result<Vec<Track>, MigrationError> {
        let url = format!(
            "{}/playlists/{}",
            self.api_base.trim_end_matches('/'),
            playlist_id.as_str()
        );
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| MigrationError::UpstreamRead(e.into()))?;

        let resp = ensure_success(resp).await.map_err(|e| match e.status() {
            Some(401 | 403) => MigrationError::Auth(e),
            _ => MigrationError::UpstreamRead(e),
        })?;

        let playlist: PlaylistResponse = resp
            .json()
            .await
            .map_err(|e| MigrationError::UpstreamRead(UpstreamError::from(e)))?;

        Ok(playlist.into_tracks())
    }
}

#[async_trait]
impl PlaylistSource for SpotifyClient {
    async fn fetch_tracks(
        &self,
        playlist_id: &SourcePlaylistId,
    ) -> Result<Vec<TrackQuery>, MigrationError> {
        let tracks = self.get_playlist_tracks(playlist_id).await?;
        tracing::info!("Fetched {} tracks from Spotify playlist {playlist_id}", tracks.len());
        Ok(tracks.iter().map(TrackQuery::from).collect())
    }
}
