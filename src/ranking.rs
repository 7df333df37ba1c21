// ranking.rs - View Count Ranking
// Joins search hits with their statistics and orders them by popularity.

use std::collections::HashMap;

use crate::youtube::{SearchHit, VideoStatistics};

/// Number of videos shown per page, and requested per search call.
pub const PAGE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub view_count: u64,
    /// Position in the search response before ranking.
    pub source_index: usize,
}

impl VideoResult {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedPage {
    pub videos: Vec<VideoResult>,
    pub next_page_token: Option<String>,
}

impl RankedPage {
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// Attach view counts to hits by video id. Ids missing from `stats`, or
/// entries without a usable count, rank as zero views.
pub fn join_statistics(hits: Vec<SearchHit>, stats: &[VideoStatistics]) -> Vec<VideoResult> {
    let counts: HashMap<&str, u64> = stats
        .iter()
        .map(|s| (s.video_id.as_str(), s.view_count.unwrap_or(0)))
        .collect();

    hits.into_iter()
        .enumerate()
        .map(|(source_index, hit)| {
            let view_count = counts.get(hit.video_id.as_str()).copied().unwrap_or(0);
            VideoResult {
                video_id: hit.video_id,
                title: hit.title,
                view_count,
                source_index,
            }
        })
        .collect()
}

/// Sort by views, most viewed first, and keep the top `limit`. The sort is
/// stable so equal counts stay in search order.
pub fn rank(mut videos: Vec<VideoResult>, limit: usize) -> Vec<VideoResult> {
    videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    videos.truncate(limit);
    videos
}
