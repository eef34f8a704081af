use crate::domain::track::TrackQuery;
use crate::ports::source::PlaylistSource;

pub struct SourceTrackReader<S> {
    source: S,
}

impl<S: PlaylistSource> SourceTrackReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Reads every page of the playlist and turns each track into a search
    /// query, in playlist order. Entries without a track payload are skipped.
    ///
    /// A failed page ends the read: whatever was collected so far is
    /// returned, so an empty result means "nothing to convert" rather than
    /// "the playlist is empty".
    pub async fn get_playlist_tracks(&self, playlist_id: &str) -> Vec<TrackQuery> {
        let mut queries = Vec::new();
        let mut offset = None;

        loop {
            let page = match self.source.fetch_page(playlist_id, offset).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Failed to fetch playlist tracks: {e}");
                    break;
                }
            };

            queries.extend(page.items.iter().flatten().map(TrackQuery::from));
            tracing::info!("Fetched tracks: {}", queries.len());

            match page.next_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        queries
    }
}
