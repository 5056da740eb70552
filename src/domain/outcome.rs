use std::fmt;

use super::playlist::{DestinationPlaylist, VideoId};
use super::track::TrackQuery;

/// What happened to a single source track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Added {
        query: TrackQuery,
        video_id: VideoId,
    },
    NoMatch {
        query: TrackQuery,
    },
    FailedAfterRetries {
        query: TrackQuery,
        video_id: VideoId,
        attempts: u32,
    },
}

impl fmt::Display for AppendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendOutcome::Added { query, video_id } => write!(f, "[added] {query} ({video_id})"),
            AppendOutcome::NoMatch { query } => write!(f, "[no match] {query}"),
            AppendOutcome::FailedAfterRetries {
                query,
                video_id,
                attempts,
            } => write!(f, "[failed x{attempts}] {query} ({video_id})"),
        }
    }
}

/// Ordered outcomes for one populate run.
#[derive(Debug, Default)]
pub struct Outcomes {
    entries: Vec<AppendOutcome>,
}

impl Outcomes {
    pub fn push(&mut self, outcome: AppendOutcome) {
        self.entries.push(outcome);
    }

    pub fn list(&self) -> &[AppendOutcome] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn added(&self) -> usize {
        self.count(|o| matches!(o, AppendOutcome::Added { .. }))
    }

    pub fn no_match(&self) -> usize {
        self.count(|o| matches!(o, AppendOutcome::NoMatch { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AppendOutcome::FailedAfterRetries { .. }))
    }

    fn count(&self, pred: impl Fn(&AppendOutcome) -> bool) -> usize {
        self.entries.iter().filter(|o| pred(o)).count()
    }
}

/// Final result of a completed migration.
#[derive(Debug)]
pub struct MigrationReport {
    pub playlist: DestinationPlaylist,
    pub outcomes: Outcomes,
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" {}: {} added, {} without match, {} failed ({} tracks)",
            self.playlist.title,
            self.playlist.url(),
            self.outcomes.added(),
            self.outcomes.no_match(),
            self.outcomes.failed(),
            self.outcomes.len()
        )
    }
}
