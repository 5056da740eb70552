use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::playlist::{DEFAULT_DESCRIPTION, SourcePlaylistId};
use crate::services::retry::RetryPolicy;

const DEFAULT_PLAYLIST_TITLE: &str = "Alt";
const DEFAULT_CLIENT_SECRET_FILE: &str = "client_secret.json";
const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug)]
pub struct Config {
    pub spotify_access_token: String,
    pub spotify_playlist: SourcePlaylistId,
    pub spotify_api_base: String,
    pub youtube_playlist_title: String,
    pub youtube_playlist_description: String,
    pub youtube_client_secret_file: PathBuf,
    pub youtube_api_base: String,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        let playlist = required("SPOTIFY_PLAYLIST")?;
        let spotify_playlist =
            SourcePlaylistId::parse(&playlist).ok_or(ConfigError::Invalid {
                var: "SPOTIFY_PLAYLIST",
                value: playlist.clone(),
            })?;

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: parse_or(&lookup, "RETRY_MAX_ATTEMPTS", defaults.max_attempts)?,
            base: parse_millis(&lookup, "RETRY_BASE_MS")?.unwrap_or(defaults.base),
            multiplier: parse_or(&lookup, "RETRY_MULTIPLIER", defaults.multiplier)?,
            max_wait: parse_millis(&lookup, "RETRY_MAX_WAIT_MS")?.or(defaults.max_wait),
        };
        if retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "RETRY_MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            spotify_access_token: required("SPOTIFY_ACCESS_TOKEN")?,
            spotify_playlist,
            spotify_api_base: or_default("SPOTIFY_API_BASE", DEFAULT_SPOTIFY_API_BASE),
            youtube_playlist_title: or_default("YOUTUBE_PLAYLIST_TITLE", DEFAULT_PLAYLIST_TITLE),
            youtube_playlist_description: or_default(
                "YOUTUBE_PLAYLIST_DESCRIPTION",
                DEFAULT_DESCRIPTION,
            ),
            youtube_client_secret_file: PathBuf::from(or_default(
                "YOUTUBE_CLIENT_SECRET_FILE",
                DEFAULT_CLIENT_SECRET_FILE,
            )),
            youtube_api_base: or_default("YOUTUBE_API_BASE", DEFAULT_YOUTUBE_API_BASE),
            retry,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(None),
    }
}
