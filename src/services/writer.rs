use crate::domain::playlist::PlaylistHandle;
use crate::domain::quota::{QuotaCost, QuotaLedger};
use crate::domain::track::TrackQuery;
use crate::ports::destination::MediaService;
use crate::services::error::DestinationError;

/// What happened to a single track on the destination side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { item_id: String },
    NoMatch,
    SearchFailed { reason: String },
    AppendFailed { item_id: String, reason: String },
}

impl AddOutcome {
    /// Quota charged for reaching this outcome. A completed search is billed
    /// even when it matched nothing.
    pub fn cost(&self) -> QuotaCost {
        match self {
            AddOutcome::Added { .. } => QuotaCost::SEARCH + QuotaCost::APPEND_ITEM,
            AddOutcome::NoMatch | AddOutcome::AppendFailed { .. } => QuotaCost::SEARCH,
            AddOutcome::SearchFailed { .. } => QuotaCost::NONE,
        }
    }
}

pub struct DestinationWriter<M> {
    media: M,
    quota: QuotaLedger,
}

impl<M: MediaService> DestinationWriter<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            quota: QuotaLedger::default(),
        }
    }

    pub async fn create_playlist(
        &mut self,
        title: &str,
        description: &str,
    ) -> Result<PlaylistHandle, DestinationError> {
        let playlist = self
            .media
            .create_playlist(title, description)
            .await
            .inspect_err(|e| tracing::error!("Failed to create playlist '{title}': {e}"))?;
        self.quota.charge(QuotaCost::CREATE_PLAYLIST);
        tracing::info!(
            "Playlist created: id={playlist}, quota used: {}",
            QuotaCost::CREATE_PLAYLIST
        );
        Ok(playlist)
    }

    /// Searches for the single best match of `query` and appends it.
    pub async fn search_and_add(
        &mut self,
        query: &TrackQuery,
        playlist: &PlaylistHandle,
    ) -> AddOutcome {
        let items = match self.media.search(query.as_str(), 1).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("Video search for '{query}' failed: {e}");
                return AddOutcome::SearchFailed {
                    reason: e.to_string(),
                };
            }
        };
        self.quota.charge(QuotaCost::SEARCH);
        tracing::info!("Searched for '{query}', quota used: {}", QuotaCost::SEARCH);

        let Some(item_id) = items.into_iter().next() else {
            tracing::warn!("No video found for '{query}'");
            return AddOutcome::NoMatch;
        };

        match self.add_item(&item_id, playlist).await {
            Ok(_) => AddOutcome::Added { item_id },
            Err(e) => AddOutcome::AppendFailed {
                item_id,
                reason: e.to_string(),
            },
        }
    }

    /// Appends `item_id` and returns the quota it cost. Failures are logged
    /// here and leave the ledger untouched.
    pub async fn add_item(
        &mut self,
        item_id: &str,
        playlist: &PlaylistHandle,
    ) -> Result<QuotaCost, DestinationError> {
        match self.media.append_item(playlist, item_id).await {
            Ok(()) => {
                self.quota.charge(QuotaCost::APPEND_ITEM);
                tracing::info!(
                    "Video {item_id} added to playlist {playlist}, quota used: {}",
                    QuotaCost::APPEND_ITEM
                );
                Ok(QuotaCost::APPEND_ITEM)
            }
            Err(e) => {
                tracing::error!("Failed to add video {item_id} to playlist {playlist}: {e}");
                Err(e)
            }
        }
    }

    pub fn total_quota_usage(&self) -> u64 {
        self.quota.total()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::ports::destination::MockMediaService;

    fn playlist() -> PlaylistHandle {
        PlaylistHandle::new("PL123")
    }

    fn http_error() -> DestinationError {
        DestinationError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "quotaExceeded".into(),
        }
    }

    #[tokio::test]
    async fn test_create_playlist_charges_on_success() {
        let mut media = MockMediaService::new();
        media
            .expect_create_playlist()
            .with(eq("Title"), eq("Description"))
            .returning(|_, _| Ok(PlaylistHandle::new("PL123")));

        let mut writer = DestinationWriter::new(media);
        let handle = writer.create_playlist("Title", "Description").await.unwrap();

        assert_eq!(handle, playlist());
        assert_eq!(writer.total_quota_usage(), 50);
    }

    #[tokio::test]
    async fn test_create_playlist_failure_charges_nothing() {
        let mut media = MockMediaService::new();
        media
            .expect_create_playlist()
            .returning(|_, _| Err(http_error()));

        let mut writer = DestinationWriter::new(media);
        assert!(writer.create_playlist("Title", "").await.is_err());
        assert_eq!(writer.total_quota_usage(), 0);
    }

    #[tokio::test]
    async fn test_search_and_add_appends_first_result() {
        let mut media = MockMediaService::new();
        media
            .expect_search()
            .with(eq("Song1 ArtistA"), eq(1))
            .returning(|_, _| Ok(vec!["vid1".to_string()]));
        media
            .expect_append_item()
            .with(eq(playlist()), eq("vid1"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut writer = DestinationWriter::new(media);
        let outcome = writer
            .search_and_add(&TrackQuery::from("Song1 ArtistA"), &playlist())
            .await;

        assert_eq!(
            outcome,
            AddOutcome::Added {
                item_id: "vid1".into()
            }
        );
        assert_eq!(writer.total_quota_usage(), 150);
        assert_eq!(u64::from(outcome.cost().units()), writer.total_quota_usage());
    }

    #[tokio::test]
    async fn test_no_match_charges_search_only() {
        let mut media = MockMediaService::new();
        media.expect_search().returning(|_, _| Ok(Vec::new()));
        media.expect_append_item().never();

        let mut writer = DestinationWriter::new(media);
        let outcome = writer
            .search_and_add(&TrackQuery::from("Song2 ArtistB"), &playlist())
            .await;

        assert_eq!(outcome, AddOutcome::NoMatch);
        assert_eq!(writer.total_quota_usage(), 100);
    }

    #[tokio::test]
    async fn test_search_error_charges_nothing() {
        let mut media = MockMediaService::new();
        media.expect_search().returning(|_, _| Err(http_error()));
        media.expect_append_item().never();

        let mut writer = DestinationWriter::new(media);
        let outcome = writer
            .search_and_add(&TrackQuery::from("Song"), &playlist())
            .await;

        assert!(matches!(outcome, AddOutcome::SearchFailed { .. }));
        assert_eq!(outcome.cost(), QuotaCost::NONE);
        assert_eq!(writer.total_quota_usage(), 0);
    }

    #[tokio::test]
    async fn test_append_failure_keeps_search_charge() {
        let mut media = MockMediaService::new();
        media
            .expect_search()
            .returning(|_, _| Ok(vec!["vid1".to_string()]));
        media
            .expect_append_item()
            .returning(|_, _| Err(http_error()));

        let mut writer = DestinationWriter::new(media);
        let outcome = writer
            .search_and_add(&TrackQuery::from("Song"), &playlist())
            .await;

        assert!(matches!(
            outcome,
            AddOutcome::AppendFailed { ref item_id, .. } if item_id == "vid1"
        ));
        assert_eq!(writer.total_quota_usage(), 100);
    }

    #[tokio::test]
    async fn test_add_item_returns_cost() {
        let mut media = MockMediaService::new();
        media.expect_append_item().returning(|_, _| Ok(()));

        let mut writer = DestinationWriter::new(media);
        let cost = writer.add_item("vid9", &playlist()).await.unwrap();

        assert_eq!(cost, QuotaCost::APPEND_ITEM);
        assert_eq!(writer.total_quota_usage(), 50);
    }
}
