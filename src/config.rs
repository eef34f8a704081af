use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static SPOTIFY_PLAYLIST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"open\.spotify\.com/(?:[a-z-]+/)?playlist/([a-zA-Z0-9]+)").unwrap()
});

const DEFAULT_TITLE: &str = "Converted Spotify Playlist";
const DEFAULT_DESCRIPTION: &str = "This playlist was converted from Spotify to YouTube";
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub source_playlist_id: String,
    pub playlist_title: String,
    pub playlist_description: String,
    pub request_delay: Duration,
    pub youtube_client_secrets: PathBuf,
    pub youtube_token_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.into())
        };

        let request_delay = match lookup("REQUEST_DELAY_SECS") {
            Some(raw) => parse_delay(&raw)?,
            None => DEFAULT_REQUEST_DELAY,
        };

        Ok(Self {
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            source_playlist_id: parse_playlist_id(&required("SOURCE_PLAYLIST")?),
            playlist_title: optional("PLAYLIST_TITLE", DEFAULT_TITLE),
            playlist_description: optional("PLAYLIST_DESCRIPTION", DEFAULT_DESCRIPTION),
            request_delay,
            youtube_client_secrets: optional("YOUTUBE_CLIENT_SECRETS", "client_secrets.json")
                .into(),
            youtube_token_file: optional("YOUTUBE_TOKEN_FILE", "token.json").into(),
        })
    }
}

/// Reduces a share link such as
/// `https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=...` to its id.
/// Bare ids and `spotify:playlist:` URIs are returned as given.
pub fn parse_playlist_id(input: &str) -> String {
    let input = input.trim();
    SPOTIFY_PLAYLIST_URL_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map_or(input, |id| id.as_str())
        .to_string()
}

fn parse_delay(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "REQUEST_DELAY_SECS",
        reason,
    };
    let secs: f64 = raw.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    Duration::try_from_secs_f64(secs).map_err(|e| invalid(format!("{e}")))
}
