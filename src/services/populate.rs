use crate::domain::outcome::{AppendOutcome, Outcomes};
use crate::domain::playlist::PlaylistId;
use crate::domain::track::TrackQuery;
use crate::infrastructure::{PlaylistWriter, VideoSearch};
use crate::services::error::MigrationError;
use crate::services::retry::{AppendAttempt, RetryPolicy, Sleeper, append_with_retry};

/// Searches every query and appends the matches to `playlist_id`, in order.
///
/// Tracks without a match and appends that exhaust their retries are recorded
/// and skipped. A search failure or a non-transient append failure aborts the
/// batch, and the outcomes gathered so far are dropped with it.
pub async fn populate<P, S>(
    destination: &P,
    sleeper: &S,
    policy: &RetryPolicy,
    playlist_id: &PlaylistId,
    queries: &[TrackQuery],
) -> Result<Outcomes, MigrationError>
where
    P: VideoSearch + PlaylistWriter + ?Sized,
    S: Sleeper + ?Sized,
{
    let mut outcomes = Outcomes::default();

    for query in queries {
        let video_id = destination
            .find_best_match(query)
            .await
            .map_err(|source| MigrationError::UpstreamSearch {
                query: query.clone(),
                source,
            })?;

        let Some(video_id) = video_id else {
            tracing::warn!("No YouTube result for: {query}");
            outcomes.push(AppendOutcome::NoMatch {
                query: query.clone(),
            });
            continue;
        };

        match append_with_retry(destination, sleeper, policy, playlist_id, &video_id).await {
            AppendAttempt::Succeeded { attempts } => {
                tracing::info!("Added: {query}");
                if attempts > 1 {
                    tracing::debug!("{video_id} needed {attempts} attempts");
                }
                outcomes.push(AppendOutcome::Added {
                    query: query.clone(),
                    video_id,
                });
            }
            AppendAttempt::FailedAfterRetries {
                attempts,
                last_error,
            } => {
                tracing::debug!("Skipping {query}, last error: {last_error}");
                outcomes.push(AppendOutcome::FailedAfterRetries {
                    query: query.clone(),
                    video_id,
                    attempts,
                });
            }
            AppendAttempt::FailedFatally { attempt, error } => {
                tracing::debug!("Aborting batch at {query} on attempt {attempt}");
                return Err(MigrationError::Append {
                    video_id,
                    source: error,
                });
            }
        }
    }

    Ok(outcomes)
}
