use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use crate::domain::playlist::PlaylistHandle;
use crate::ports::destination::MediaService;
use crate::services::error::DestinationError;

const API_BASE_URL: &str = "https://www.googleapis.com";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: VideoId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistResponse {
    id: String,
}

pub struct YouTubeClient {
    http: Client,
    access_token: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(http: Client, access_token: String) -> Self {
        Self::with_base_url(http, access_token, API_BASE_URL)
    }

    pub fn with_base_url(http: Client, access_token: String, base_url: &str) -> Self {
        Self {
            http,
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/youtube/v3/{resource}", self.base_url)
    }
}

async fn check_status(resp: Response) -> Result<Response, DestinationError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(DestinationError::Status { status, body })
}

#[async_trait]
impl MediaService for YouTubeClient {
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<PlaylistHandle, DestinationError> {
        let body = json!({
            "snippet": {
                "title": title,
                "description": description,
            },
            "status": {
                "privacyStatus": "public",
            },
        });

        let resp = self
            .http
            .post(self.url("playlists"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet,status")])
            .json(&body)
            .send()
            .await?;

        let playlist: PlaylistResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| DestinationError::Response(e.to_string()))?;

        Ok(PlaylistHandle::new(playlist.id))
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>, DestinationError> {
        let resp = self
            .http
            .get(self.url("search"))
            .bearer_auth(&self.access_token)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", &limit.to_string()),
            ])
            .send()
            .await?;

        let search: SearchResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| DestinationError::Response(e.to_string()))?;

        Ok(search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn append_item(
        &self,
        playlist: &PlaylistHandle,
        item_id: &str,
    ) -> Result<(), DestinationError> {
        let body = json!({
            "snippet": {
                "playlistId": playlist.as_str(),
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": item_id,
                },
            },
        });

        let resp = self
            .http
            .post(self.url("playlistItems"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?;

        check_status(resp).await?;
        Ok(())
    }
}
