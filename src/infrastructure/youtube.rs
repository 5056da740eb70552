use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{PlaylistWriter, VideoSearch, ensure_success};
use crate::domain::playlist::{
    DestinationPlaylist, PlaylistDraft, PlaylistId, Privacy, VideoId,
};
use crate::domain::track::TrackQuery;
use crate::services::error::UpstreamError;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

impl SearchResponse {
    fn top_video(self) -> Option<VideoId> {
        self.items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id)
            .map(VideoId::new)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistInsert<'a> {
    snippet: PlaylistSnippet<'a>,
    status: PlaylistStatus,
}

#[derive(Serialize)]
struct PlaylistSnippet<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistStatus {
    privacy_status: Privacy,
}

#[derive(Deserialize)]
struct PlaylistResource {
    id: String,
}

#[derive(Serialize)]
struct PlaylistItemInsert<'a> {
    snippet: PlaylistItemSnippet<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet<'a> {
    playlist_id: &'a str,
    resource_id: ResourceId<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId<'a> {
    kind: &'static str,
    video_id: &'a str,
}

impl<'a> PlaylistItemInsert<'a> {
    fn new(playlist_id: &'a PlaylistId, video_id: &'a VideoId) -> Self {
        Self {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.as_str(),
                resource_id: ResourceId {
                    kind: "youtube#video",
                    video_id: video_id.as_str(),
                },
            },
        }
    }
}

/// Authenticated YouTube Data API session.
pub struct YouTubeClient {
    http: Client,
    api_base: String,
    access_token: String,
}

impl YouTubeClient {
    pub fn new(http: Client, api_base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            access_token: access_token.into(),
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{resource}", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn find_best_match(&self, query: &TrackQuery) -> Result<Option<VideoId>, UpstreamError> {
        let resp = self
            .http
            .get(self.endpoint("search"))
            .bearer_auth(&self.access_token)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query.as_str()),
                ("maxResults", "1"),
            ])
            .send()
            .await?;

        let search: SearchResponse = ensure_success(resp).await?.json().await?;
        Ok(search.top_video())
    }
}

#[async_trait]
impl PlaylistWriter for YouTubeClient {
    async fn create_playlist(
        &self,
        draft: &PlaylistDraft,
    ) -> Result<DestinationPlaylist, UpstreamError> {
        let body = PlaylistInsert {
            snippet: PlaylistSnippet {
                title: &draft.title,
                description: &draft.description,
            },
            status: PlaylistStatus {
                privacy_status: draft.privacy,
            },
        };
        let resp = self
            .http
            .post(self.endpoint("playlists"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet,status")])
            .json(&body)
            .send()
            .await?;

        let created: PlaylistResource = ensure_success(resp).await?.json().await?;
        Ok(DestinationPlaylist {
            id: PlaylistId::new(created.id),
            title: draft.title.clone(),
        })
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
    ) -> Result<(), UpstreamError> {
        let resp = self
            .http
            .post(self.endpoint("playlistItems"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&PlaylistItemInsert::new(playlist_id, video_id))
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }
}
