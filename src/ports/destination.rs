use async_trait::async_trait;

use crate::domain::playlist::PlaylistHandle;
use crate::services::error::DestinationError;

/// Write access to the video platform the playlist is copied to.
///
/// Production implementation: `infrastructure::youtube::YouTubeClient`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaService: Send + Sync {
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<PlaylistHandle, DestinationError>;

    /// Returns item ids in ranking order, at most `limit` of them.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>, DestinationError>;

    async fn append_item(
        &self,
        playlist: &PlaylistHandle,
        item_id: &str,
    ) -> Result<(), DestinationError>;
}
