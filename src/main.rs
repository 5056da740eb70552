mod config;
mod domain;
mod infrastructure;
mod services;
#[cfg(test)]
mod test_utils;

use tracing_subscriber::EnvFilter;

use config::Config;
use domain::playlist::PlaylistDraft;
use infrastructure::google_auth::{InstalledAppFlow, YOUTUBE_SCOPE};
use infrastructure::spotify::SpotifyClient;
use infrastructure::youtube::YouTubeClient;
use services::migration_service::MigrationService;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let http_client = reqwest::Client::new();

    let flow = InstalledAppFlow::from_client_secrets_file(
        &config.youtube_client_secret_file,
        &[YOUTUBE_SCOPE],
    )?;
    let youtube_token = flow.run_local_server().await?;

    let spotify = SpotifyClient::new(
        http_client.clone(),
        &config.spotify_api_base,
        &config.spotify_access_token,
    );
    let youtube = YouTubeClient::new(http_client, &config.youtube_api_base, youtube_token);
    let service = MigrationService::new(spotify, youtube, config.retry.clone());

    let draft = PlaylistDraft::new(
        &config.youtube_playlist_title,
        Some(config.youtube_playlist_description.clone()),
    );
    let report = service.migrate(&config.spotify_playlist, &draft).await?;

    if report.outcomes.is_empty() {
        tracing::warn!("Spotify playlist {} has no tracks", config.spotify_playlist);
    }
    for outcome in report.outcomes.list() {
        tracing::debug!("{outcome}");
    }
    tracing::info!("Done: {report}");
    Ok(())
}
