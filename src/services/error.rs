#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid playlist id: {0}")]
    InvalidPlaylistId(String),
    #[error("Spotify API error: {0}")]
    Api(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("YouTube request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("YouTube API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Unexpected YouTube response: {0}")]
    Response(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Cannot read client secrets {path}: {source}")]
    ClientSecrets {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed client secrets: {0}")]
    MalformedSecrets(#[from] serde_json::Error),
    #[error("Invalid client secrets: {0}")]
    InvalidSecrets(String),
    #[error("Token request failed: {0}")]
    TokenRequest(#[from] reqwest::Error),
    #[error("Token endpoint rejected the request ({status}): {body}")]
    TokenRejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Authorization was not granted: {0}")]
    Denied(String),
    #[error("Authorization redirect failed: {0}")]
    Redirect(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("No tracks found in source playlist {0}")]
    NoTracks(String),
    #[error("Failed to create destination playlist: {0}")]
    Provision(#[source] DestinationError),
}
