use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::playlist::{
    DestinationPlaylist, PlaylistDraft, PlaylistId, SourcePlaylistId, VideoId,
};
use crate::domain::track::{Track, TrackQuery};
use crate::infrastructure::{PlaylistSource, PlaylistWriter, VideoSearch};
use crate::services::error::{MigrationError, UpstreamError};
use crate::services::retry::Sleeper;

pub fn status(code: u16) -> UpstreamError {
    UpstreamError::Status {
        status: code,
        body: format!("status {code}"),
    }
}

pub fn query(title: &str) -> TrackQuery {
    TrackQuery::from(&Track::new(title, vec!["Artist".to_string()]))
}

#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub struct FakeSource {
    pub result: Mutex<Option<Result<Vec<TrackQuery>, MigrationError>>>,
}

impl FakeSource {
    pub fn with_tracks(queries: Vec<TrackQuery>) -> Self {
        Self {
            result: Mutex::new(Some(Ok(queries))),
        }
    }

    pub fn failing(code: u16) -> Self {
        Self {
            result: Mutex::new(Some(Err(MigrationError::UpstreamRead(status(code))))),
        }
    }
}

#[async_trait]
impl PlaylistSource for FakeSource {
    async fn fetch_tracks(
        &self,
        _playlist_id: &SourcePlaylistId,
    ) -> Result<Vec<TrackQuery>, MigrationError> {
        self.result
            .lock()
            .unwrap()
            .take()
            .expect("fetch_tracks called more than once")
    }
}

/// In-memory destination. Inserts follow a per-video script of statuses,
/// where `None` is a success; unscripted videos always succeed.
#[derive(Default)]
pub struct FakePlatform {
    matches: HashMap<String, VideoId>,
    failing_searches: HashSet<String>,
    insert_script: Mutex<HashMap<VideoId, VecDeque<Option<u16>>>>,
    create_failure: Option<u16>,
    pub searches: Mutex<Vec<String>>,
    pub inserts: Mutex<Vec<(PlaylistId, VideoId)>>,
    pub created: Mutex<Vec<PlaylistDraft>>,
}

impl FakePlatform {
    pub fn with_match(mut self, query: &TrackQuery, video: &str) -> Self {
        self.matches
            .insert(query.as_str().to_string(), VideoId::new(video));
        self
    }

    pub fn with_failing_search(mut self, query: &TrackQuery) -> Self {
        self.failing_searches.insert(query.as_str().to_string());
        self
    }

    pub fn with_inserts(self, video: &str, script: &[Option<u16>]) -> Self {
        self.insert_script
            .lock()
            .unwrap()
            .insert(VideoId::new(video), script.iter().copied().collect());
        self
    }

    pub fn with_create_failure(mut self, code: u16) -> Self {
        self.create_failure = Some(code);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn insert_count(&self, video: &str) -> usize {
        self.inserts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, v)| v.as_str() == video)
            .count()
    }
}

#[async_trait]
impl VideoSearch for FakePlatform {
    async fn find_best_match(&self, query: &TrackQuery) -> Result<Option<VideoId>, UpstreamError> {
        self.searches.lock().unwrap().push(query.as_str().to_string());
        if self.failing_searches.contains(query.as_str()) {
            return Err(status(403));
        }
        Ok(self.matches.get(query.as_str()).cloned())
    }
}

#[async_trait]
impl PlaylistWriter for FakePlatform {
    async fn create_playlist(
        &self,
        draft: &PlaylistDraft,
    ) -> Result<DestinationPlaylist, UpstreamError> {
        self.created.lock().unwrap().push(draft.clone());
        if let Some(code) = self.create_failure {
            return Err(status(code));
        }
        Ok(DestinationPlaylist {
            id: PlaylistId::new("PLfake"),
            title: draft.title.clone(),
        })
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
    ) -> Result<(), UpstreamError> {
        self.inserts
            .lock()
            .unwrap()
            .push((playlist_id.clone(), video_id.clone()));
        let next = self
            .insert_script
            .lock()
            .unwrap()
            .get_mut(video_id)
            .and_then(|script| script.pop_front())
            .flatten();
        match next {
            Some(code) => Err(status(code)),
            None => Ok(()),
        }
    }
}
