// youtube.rs - YouTube Data API Client
// Thin client for the two endpoints the bot needs: keyword search and batched
// video statistics. The `VideoApi` trait is the seam the query handler talks to.
//
// Used by: main.rs (construction), query.rs (search + statistics)

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::FetchError;

const SEARCH_ENDPOINT: &str = "search";
const VIDEOS_ENDPOINT: &str = "videos";

// ============================================================================
// DOMAIN TYPES
// ============================================================================

/// One video from a search page, in response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<SearchHit>,
    pub next_page_token: Option<String>,
}

/// Statistics entry for one video. `view_count` is `None` when the API
/// hides the count or returns something that is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStatistics {
    pub video_id: String,
    pub view_count: Option<u64>,
}

#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Keyword search restricted to videos. `page_token` of `None` requests the first page.
    async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<SearchPage, FetchError>;

    /// Batched statistics lookup for the given ids, one request.
    async fn statistics(&self, video_ids: &[String]) -> Result<Vec<VideoStatistics>, FetchError>;
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

impl SearchResponse {
    fn into_page(self) -> SearchPage {
        let items = self
            .items
            .into_iter()
            .filter_map(|item| {
                // type=video should guarantee an id, channels/playlists are dropped otherwise
                let video_id = item.id.video_id?;
                Some(SearchHit {
                    video_id,
                    title: item.snippet.map(|s| s.title).unwrap_or_default(),
                })
            })
            .collect();

        SearchPage {
            items,
            next_page_token: self.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

impl VideoItem {
    fn into_statistics(self) -> VideoStatistics {
        let view_count = self
            .statistics
            .and_then(|s| s.view_count)
            .and_then(|count| count.trim().parse::<u64>().ok());

        VideoStatistics { video_id: self.id, view_count }
    }
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn search_request(&self, query: &str, page_token: Option<&str>, max_results: u32) -> RequestBuilder {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        params.push(("key", self.api_key.as_str()));

        self.http
            .get(format!("{}/{}", self.base_url, SEARCH_ENDPOINT))
            .query(&params)
    }

    fn statistics_request(&self, video_ids: &[String]) -> RequestBuilder {
        let ids = video_ids.join(",");
        self.http
            .get(format!("{}/{}", self.base_url, VIDEOS_ENDPOINT))
            .query(&[("part", "statistics"), ("id", ids.as_str()), ("key", self.api_key.as_str())])
    }
}

/// Send a request and decode its JSON body, mapping error statuses to `FetchError::Status`.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder, endpoint: &'static str) -> Result<T, FetchError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("YouTube {} endpoint returned HTTP {}", endpoint, status);
        return Err(FetchError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
}

#[async_trait]
impl VideoApi for YouTubeClient {
    async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<SearchPage, FetchError> {
        debug!("YouTube search q='{}' page_token={:?} max_results={}", query, page_token, max_results);
        let response: SearchResponse =
            send_json(self.search_request(query, page_token, max_results), SEARCH_ENDPOINT).await?;
        let page = response.into_page();
        debug!("YouTube search returned {} videos, next page: {}", page.items.len(), page.next_page_token.is_some());
        Ok(page)
    }

    async fn statistics(&self, video_ids: &[String]) -> Result<Vec<VideoStatistics>, FetchError> {
        debug!("YouTube statistics lookup for {} ids", video_ids.len());
        let response: VideosResponse = send_json(self.statistics_request(video_ids), VIDEOS_ENDPOINT).await?;
        Ok(response.items.into_iter().map(VideoItem::into_statistics).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> YouTubeClient {
        YouTubeClient::new("https://api.example.test/youtube/v3", "secret")
    }

    fn query_map(builder: RequestBuilder) -> (String, HashMap<String, String>) {
        let request = builder.build().unwrap();
        let url = request.url();
        let pairs = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        (url.path().to_string(), pairs)
    }

    #[test]
    fn test_first_page_search_request() {
        let (path, params) = query_map(client().search_request("cats & dogs", None, 3));
        assert_eq!(path, "/youtube/v3/search");
        assert_eq!(params["part"], "snippet");
        assert_eq!(params["type"], "video");
        assert_eq!(params["q"], "cats & dogs");
        assert_eq!(params["maxResults"], "3");
        assert_eq!(params["key"], "secret");
        assert!(!params.contains_key("pageToken"));
    }

    #[test]
    fn test_next_page_search_request_carries_token() {
        let (_, params) = query_map(client().search_request("cats", Some("CAMQAA"), 3));
        assert_eq!(params["pageToken"], "CAMQAA");
    }

    #[test]
    fn test_statistics_request_joins_ids() {
        let ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let (path, params) = query_map(client().statistics_request(&ids));
        assert_eq!(path, "/youtube/v3/videos");
        assert_eq!(params["part"], "statistics");
        assert_eq!(params["id"], "A,B,C");
        assert_eq!(params["key"], "secret");
    }

    #[test]
    fn test_decode_search_response() {
        let body = r#"{
            "kind": "youtube#searchListResponse",
            "nextPageToken": "CAMQAA",
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "A"}, "snippet": {"title": "Cats &amp; Boxes"}},
                {"id": {"kind": "youtube#channel", "channelId": "UC1"}, "snippet": {"title": "A channel"}},
                {"id": {"kind": "youtube#video", "videoId": "B"}, "snippet": {"title": "More cats"}}
            ]
        }"#;
        let page = serde_json::from_str::<SearchResponse>(body).unwrap().into_page();
        assert_eq!(page.next_page_token.as_deref(), Some("CAMQAA"));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0], SearchHit { video_id: "A".into(), title: "Cats &amp; Boxes".into() });
        assert_eq!(page.items[1].video_id, "B");
    }

    #[test]
    fn test_decode_search_response_without_items() {
        let page = serde_json::from_str::<SearchResponse>(r#"{"nextPageToken": ""}"#).unwrap().into_page();
        assert!(page.items.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_decode_statistics_response() {
        let body = r#"{
            "items": [
                {"id": "A", "statistics": {"viewCount": "1024", "likeCount": "3"}},
                {"id": "B", "statistics": {"likeCount": "9"}},
                {"id": "C", "statistics": {"viewCount": "lots"}},
                {"id": "D"}
            ]
        }"#;
        let response: VideosResponse = serde_json::from_str(body).unwrap();
        let stats: Vec<VideoStatistics> = response.items.into_iter().map(VideoItem::into_statistics).collect();
        assert_eq!(stats[0], VideoStatistics { video_id: "A".into(), view_count: Some(1024) });
        assert_eq!(stats[1].view_count, None);
        assert_eq!(stats[2].view_count, None);
        assert_eq!(stats[3].view_count, None);
    }
}
