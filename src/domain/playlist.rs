use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static SPOTIFY_PLAYLIST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"open\.spotify\.com/(?:[a-z-]+/)?playlist/([a-zA-Z0-9]+)").unwrap()
});

pub const DEFAULT_DESCRIPTION: &str = "Created from Spotify tracks";

/// Identifier of the playlist being read on Spotify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePlaylistId(String);

impl SourcePlaylistId {
    /// Accepts a bare playlist ID or an `open.spotify.com/playlist/<id>` link.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(caps) = SPOTIFY_PLAYLIST_URL_RE.captures(input) {
            return Some(Self(caps.get(1)?.as_str().to_string()));
        }
        Some(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourcePlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Private,
}

/// What gets sent when creating the destination playlist.
#[derive(Debug, Clone)]
pub struct PlaylistDraft {
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
}

impl PlaylistDraft {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            privacy: Privacy::Private,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DestinationPlaylist {
    pub id: PlaylistId,
    pub title: String,
}

impl DestinationPlaylist {
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/playlist?list={}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_id() {
        let id = SourcePlaylistId::parse("0plEmZPnuHojzoAqdYDqZ6").unwrap();
        assert_eq!(id.as_str(), "0plEmZPnuHojzoAqdYDqZ6");
    }

    #[test]
    fn parses_share_link() {
        let id = SourcePlaylistId::parse(
            "https://open.spotify.com/playlist/0plEmZPnuHojzoAqdYDqZ6?si=abc123",
        )
        .unwrap();
        assert_eq!(id.as_str(), "0plEmZPnuHojzoAqdYDqZ6");

        let localized =
            SourcePlaylistId::parse("https://open.spotify.com/intl-de/playlist/37i9dQZF1DX").unwrap();
        assert_eq!(localized.as_str(), "37i9dQZF1DX");
    }

    #[test]
    fn rejects_blank_id() {
        assert!(SourcePlaylistId::parse("   ").is_none());
    }

    #[test]
    fn draft_defaults_to_private_with_fixed_description() {
        let draft = PlaylistDraft::new("Alt", None);
        assert_eq!(draft.description, DEFAULT_DESCRIPTION);
        assert_eq!(draft.privacy, Privacy::Private);
        assert_eq!(serde_json::to_value(draft.privacy).unwrap(), "private");
    }

    #[test]
    fn playlist_url_uses_list_parameter() {
        let playlist = DestinationPlaylist {
            id: PlaylistId::new("PL123"),
            title: "Alt".to_string(),
        };
        assert_eq!(playlist.url(), "https://www.youtube.com/playlist?list=PL123");
    }
}
