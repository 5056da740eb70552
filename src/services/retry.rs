use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{BackoffBuilder, ExponentialBuilder};

use crate::domain::playlist::{PlaylistId, VideoId};
use crate::infrastructure::PlaylistWriter;
use crate::services::error::UpstreamError;

/// Exponential backoff for playlist appends.
///
/// The wait after a transient failure on attempt `n` is
/// `base * multiplier^n`, clamped to `max_wait` when one is set.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub multiplier: u32,
    pub max_wait: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base: Duration::from_secs(1),
            multiplier: 2,
            max_wait: None,
        }
    }
}

impl RetryPolicy {
    /// Jitter-free schedule yielding `wait_after(1)`, `wait_after(2)`, ...
    /// and ending after `max_attempts - 1` waits.
    fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.wait_after(1))
            .with_factor(self.multiplier as f32)
            .with_max_times(self.max_attempts.max(1) as usize - 1);
        match self.max_wait {
            Some(cap) => builder.with_max_delay(cap),
            None => builder.without_max_delay(),
        }
    }

    pub fn wait_after(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt);
        let wait = self.base.saturating_mul(factor);
        match self.max_wait {
            Some(cap) => wait.min(cap),
            None => wait,
        }
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Terminal state of a single append.
#[derive(Debug)]
pub enum AppendAttempt {
    Succeeded { attempts: u32 },
    FailedAfterRetries { attempts: u32, last_error: UpstreamError },
    FailedFatally { attempt: u32, error: UpstreamError },
}

/// Inserts `video_id` into `playlist_id`, retrying transient failures.
pub async fn append_with_retry<W, S>(
    writer: &W,
    sleeper: &S,
    policy: &RetryPolicy,
    playlist_id: &PlaylistId,
    video_id: &VideoId,
) -> AppendAttempt
where
    W: PlaylistWriter + ?Sized,
    S: Sleeper + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut schedule = policy.backoff().build();
    let mut attempt = 1;
    loop {
        let error = match writer.insert_playlist_item(playlist_id, video_id).await {
            Ok(()) => return AppendAttempt::Succeeded { attempts: attempt },
            Err(e) => e,
        };

        if !error.is_transient() {
            tracing::error!("Failed to add video {video_id} due to unexpected error: {error}");
            return AppendAttempt::FailedFatally { attempt, error };
        }

        let Some(wait) = schedule.next() else {
            tracing::error!("Failed to add video {video_id} after {attempt} attempts: {error}");
            return AppendAttempt::FailedAfterRetries {
                attempts: attempt,
                last_error: error,
            };
        };

        tracing::warn!(
            "Retry {attempt}/{max_attempts}: Temporary error ({}). Retrying in {wait:?}...",
            error.status().unwrap_or_default()
        );
        sleeper.sleep(wait).await;
        attempt += 1;
    }
}
