use async_trait::async_trait;
use rspotify::model::{Page, PlayableItem, PlaylistId};
use rspotify::{ClientCredsSpotify, Credentials, prelude::*};

use crate::domain::track::{SourceTrack, TrackPage};
use crate::ports::source::PlaylistSource;
use crate::services::error::SourceError;

const PAGE_SIZE: u32 = 100;

pub struct SpotifyClient {
    client: ClientCredsSpotify,
}

impl SpotifyClient {
    pub async fn new(client_id: &str, client_secret: &str) -> Result<Self, SourceError> {
        let creds = Credentials::new(client_id, client_secret);
        let client = ClientCredsSpotify::new(creds);
        client
            .request_token()
            .await
            .map_err(|e| SourceError::Api(format!("failed to get Spotify token: {e}")))?;
        tracing::info!("Spotify access token acquired");
        Ok(Self { client })
    }
}

#[async_trait]
impl PlaylistSource for SpotifyClient {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        offset: Option<u32>,
    ) -> Result<TrackPage, SourceError> {
        let id = parse_playlist_id(playlist_id)?;

        let page = self
            .client
            .playlist_items_manual(id, None, None, Some(PAGE_SIZE), offset)
            .await
            .map_err(|e| SourceError::Api(e.to_string()))?;

        let next_offset = next_offset(&page);
        let items = page
            .items
            .into_iter()
            .map(|item| source_track(item.track))
            .collect();

        Ok(TrackPage { items, next_offset })
    }
}

/// Accepts a bare id as well as a `spotify:playlist:<id>` URI.
fn parse_playlist_id(input: &str) -> Result<PlaylistId<'_>, SourceError> {
    PlaylistId::from_id_or_uri(input)
        .map_err(|_| SourceError::InvalidPlaylistId(input.to_string()))
}

fn next_offset<T>(page: &Page<T>) -> Option<u32> {
    page.next.as_ref().map(|_| page.offset + page.limit)
}

fn source_track(item: Option<PlayableItem>) -> Option<SourceTrack> {
    match item {
        Some(PlayableItem::Track(track)) => Some(SourceTrack {
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        }),
        // Episodes have no artists; the title alone is searched.
        Some(PlayableItem::Episode(episode)) => Some(SourceTrack {
            title: episode.name,
            artists: Vec::new(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rspotify::model::PlaylistItem;
    use serde_json::{Value, json};

    use super::*;

    fn playlist_item(track: Value) -> PlaylistItem {
        serde_json::from_value(json!({
            "added_at": null,
            "added_by": null,
            "is_local": false,
            "track": track,
        }))
        .unwrap()
    }

    fn artist(name: &str) -> Value {
        json!({
            "external_urls": {},
            "href": null,
            "id": null,
            "name": name,
            "type": "artist",
            "uri": null,
        })
    }

    fn track_json(name: &str, artists: &[&str]) -> Value {
        json!({
            "album": {
                "album_type": "album",
                "artists": [artist("Queen")],
                "available_markets": [],
                "external_urls": {},
                "href": null,
                "id": null,
                "images": [],
                "name": "Hot Space",
                "release_date": "1982-05-21",
                "release_date_precision": "day",
                "type": "album",
            },
            "artists": artists.iter().map(|a| artist(a)).collect::<Vec<_>>(),
            "available_markets": [],
            "disc_number": 1,
            "duration_ms": 248_000,
            "explicit": false,
            "external_ids": {},
            "external_urls": {},
            "href": null,
            "id": null,
            "is_local": false,
            "name": name,
            "popularity": 70,
            "preview_url": null,
            "track_number": 11,
            "type": "track",
        })
    }

    fn episode_json(name: &str) -> Value {
        json!({
            "audio_preview_url": null,
            "description": "An episode",
            "html_description": "<p>An episode</p>",
            "duration_ms": 1_800_000,
            "explicit": false,
            "external_urls": {},
            "href": "https://api.spotify.com/v1/episodes/512ojhOuo1ktJprKbVcKyQ",
            "id": "512ojhOuo1ktJprKbVcKyQ",
            "images": [],
            "is_externally_hosted": false,
            "is_playable": true,
            "language": "en",
            "languages": ["en"],
            "name": name,
            "release_date": "2024-01-01",
            "release_date_precision": "day",
            "resume_point": null,
            "show": {
                "available_markets": [],
                "copyrights": [],
                "description": "A show",
                "html_description": "<p>A show</p>",
                "explicit": false,
                "external_urls": {},
                "href": "https://api.spotify.com/v1/shows/38bS44xjbVVZ3No3ByF1dJ",
                "id": "38bS44xjbVVZ3No3ByF1dJ",
                "images": [],
                "is_externally_hosted": false,
                "languages": ["en"],
                "media_type": "audio",
                "name": "Some Show",
                "publisher": "Some Publisher",
                "total_episodes": 10,
                "type": "show",
                "uri": "spotify:show:38bS44xjbVVZ3No3ByF1dJ",
            },
            "type": "episode",
            "uri": "spotify:episode:512ojhOuo1ktJprKbVcKyQ",
        })
    }

    fn page(next: Option<&str>, offset: u32, limit: u32) -> Page<PlaylistItem> {
        serde_json::from_value(json!({
            "href": "https://api.spotify.com/v1/playlists/pl/tracks",
            "items": [],
            "limit": limit,
            "next": next,
            "offset": offset,
            "previous": null,
            "total": 250,
        }))
        .unwrap()
    }

    #[test]
    fn test_track_maps_title_and_artists() {
        let item = playlist_item(track_json("Under Pressure", &["Queen", "David Bowie"]));

        assert_eq!(
            source_track(item.track),
            Some(SourceTrack {
                title: "Under Pressure".into(),
                artists: vec!["Queen".into(), "David Bowie".into()],
            })
        );
    }

    #[test]
    fn test_episode_maps_title_only() {
        let item = playlist_item(episode_json("Episode 12"));

        assert_eq!(
            source_track(item.track),
            Some(SourceTrack {
                title: "Episode 12".into(),
                artists: Vec::new(),
            })
        );
    }

    #[test]
    fn test_missing_track_is_absent() {
        let item = playlist_item(Value::Null);
        assert_eq!(source_track(item.track), None);
    }

    #[test]
    fn test_next_offset_follows_next_link() {
        let with_next = page(
            Some("https://api.spotify.com/v1/playlists/pl/tracks?offset=200&limit=100"),
            100,
            100,
        );
        assert_eq!(next_offset(&with_next), Some(200));

        let last = page(None, 200, 100);
        assert_eq!(next_offset(&last), None);
    }

    #[test]
    fn test_playlist_id_accepts_id_and_uri() {
        assert_eq!(
            parse_playlist_id("37i9dQZF1DXcBWIGoYBM5M").unwrap().id(),
            "37i9dQZF1DXcBWIGoYBM5M"
        );
        assert_eq!(
            parse_playlist_id("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M")
                .unwrap()
                .id(),
            "37i9dQZF1DXcBWIGoYBM5M"
        );
        assert!(matches!(
            parse_playlist_id("spotify:track:4iV5W9uYEdYUVa79Axb7Rh"),
            Err(SourceError::InvalidPlaylistId(_))
        ));
    }
}
