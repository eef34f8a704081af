use std::fmt;

/// A source catalog entry reduced to what a search needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTrack {
    pub title: String,
    pub artists: Vec<String>,
}

/// One page of a source playlist listing. `None` entries are items whose
/// track payload was missing (removed or unavailable tracks).
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<Option<SourceTrack>>,
    pub next_offset: Option<u32>,
}

/// Search string derived from a source track, used verbatim against the
/// destination's search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery(String);

impl TrackQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&SourceTrack> for TrackQuery {
    fn from(track: &SourceTrack) -> Self {
        let artists = track.artists.join(", ");
        let query = format!("{} {}", track.title, artists);
        Self(query.trim_end().to_string())
    }
}

#[cfg(test)]
impl From<&str> for TrackQuery {
    fn from(query: &str) -> Self {
        Self(query.to_string())
    }
}

impl fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
