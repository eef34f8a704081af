use async_trait::async_trait;

use crate::domain::track::TrackPage;
use crate::services::error::SourceError;

/// Paged read access to a playlist on the source catalog.
///
/// Production implementation: `infrastructure::spotify::SpotifyClient`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetches the page starting at `offset` (`None` for the first page).
    async fn fetch_page(
        &self,
        playlist_id: &str,
        offset: Option<u32>,
    ) -> Result<TrackPage, SourceError>;
}
