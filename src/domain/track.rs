use std::fmt;

/// A track as listed on the source playlist.
#[derive(Debug, Clone)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
}

impl Track {
    pub fn new(title: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            title: title.into(),
            artists,
        }
    }
}

/// Free-text search input derived from a source track.
///
/// Built as `"{title} {artists}"` with the artists joined by `", "`. A track
/// without artists keeps the separating space, so `"Song"` becomes `"Song "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery(String);

impl TrackQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Track> for TrackQuery {
    fn from(track: &Track) -> Self {
        TrackQuery(format!("{} {}", track.title, track.artists.join(", ")))
    }
}

impl fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
