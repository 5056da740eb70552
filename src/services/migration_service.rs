use crate::domain::outcome::MigrationReport;
use crate::domain::playlist::{PlaylistDraft, SourcePlaylistId};
use crate::infrastructure::{PlaylistSource, PlaylistWriter, VideoSearch};
use crate::services::error::MigrationError;
use crate::services::populate::populate;
use crate::services::retry::{RetryPolicy, Sleeper, TokioSleeper};

/// Copies a Spotify playlist into a new YouTube playlist.
pub struct MigrationService<S, D> {
    source: S,
    destination: D,
    sleeper: Box<dyn Sleeper>,
    retry: RetryPolicy,
}

impl<S, D> MigrationService<S, D>
where
    S: PlaylistSource,
    D: VideoSearch + PlaylistWriter,
{
    pub fn new(source: S, destination: D, retry: RetryPolicy) -> Self {
        Self {
            source,
            destination,
            sleeper: Box::new(TokioSleeper),
            retry,
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Reads the source tracks, creates the destination playlist, then fills it.
    pub async fn migrate(
        &self,
        source_id: &SourcePlaylistId,
        draft: &PlaylistDraft,
    ) -> Result<MigrationReport, MigrationError> {
        let queries = self.source.fetch_tracks(source_id).await?;

        let playlist = self
            .destination
            .create_playlist(draft)
            .await
            .map_err(MigrationError::UpstreamWrite)?;
        tracing::info!("Created YouTube playlist: {}", playlist.url());

        let outcomes = populate(
            &self.destination,
            self.sleeper.as_ref(),
            &self.retry,
            &playlist.id,
            &queries,
        )
        .await?;

        Ok(MigrationReport { playlist, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakePlatform, FakeSource, RecordingSleeper, query};
    use std::sync::Arc;

    fn source_id() -> SourcePlaylistId {
        SourcePlaylistId::parse("0plEmZPnuHojzoAqdYDqZ6").unwrap()
    }

    #[tokio::test]
    async fn migrates_tracks_into_new_private_playlist() {
        let (q1, q2) = (query("one"), query("two"));
        let source = FakeSource::with_tracks(vec![q1.clone(), q2.clone()]);
        let platform = FakePlatform::default().with_match(&q1, "v1");
        let service = MigrationService::new(source, platform, RetryPolicy::default())
            .with_sleeper(RecordingSleeper::default());

        let report = service
            .migrate(&source_id(), &PlaylistDraft::new("Alt", None))
            .await
            .unwrap();

        assert_eq!(report.playlist.id.as_str(), "PLfake");
        assert_eq!(report.playlist.title, "Alt");
        assert_eq!(report.outcomes.added(), 1);
        assert_eq!(report.outcomes.no_match(), 1);
        let created = service.destination.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].description, "Created from Spotify tracks");
    }

    #[tokio::test]
    async fn listing_failure_aborts_before_creating_playlist() {
        let service = MigrationService::new(
            FakeSource::failing(500),
            FakePlatform::default(),
            RetryPolicy::default(),
        );

        let err = service
            .migrate(&source_id(), &PlaylistDraft::new("Alt", None))
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::UpstreamRead(_)));
        assert!(service.destination.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn creation_failure_aborts_before_searching() {
        let q1 = query("one");
        let source = FakeSource::with_tracks(vec![q1.clone()]);
        let platform = FakePlatform::default()
            .with_match(&q1, "v1")
            .with_create_failure(403);
        let service = MigrationService::new(source, platform, RetryPolicy::default());

        let err = service
            .migrate(&source_id(), &PlaylistDraft::new("Alt", None))
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::UpstreamWrite(ref e) if e.status() == Some(403)));
        assert!(service.destination.searches().is_empty());
    }

    #[tokio::test]
    async fn retries_use_configured_sleeper() {
        let q1 = query("one");
        let source = FakeSource::with_tracks(vec![q1.clone()]);
        let platform = FakePlatform::default()
            .with_match(&q1, "v1")
            .with_inserts("v1", &[Some(503), Some(503)]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let service = MigrationService::new(source, platform, RetryPolicy::default())
            .with_sleeper(Arc::clone(&sleeper));

        let report = service
            .migrate(&source_id(), &PlaylistDraft::new("Alt", None))
            .await
            .unwrap();

        assert_eq!(report.outcomes.added(), 1);
        assert_eq!(sleeper.waits().len(), 2);
    }
}
