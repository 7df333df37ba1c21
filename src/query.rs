// query.rs - Query Handler
// Turns a user's search text or "more" press into a ranked page of videos.
//
// Flow per request:
// 1. Resolve the user's session (new query resets it, "more" reuses it)
// 2. Search with the session cursor, PAGE_SIZE results
// 3. Look up statistics for the returned ids in one call
// 4. Join by id, rank by views, keep the top PAGE_SIZE
// 5. Store the continuation cursor back into the session
//
// Used by: commands/search.rs (text messages and "More Videos" presses), main.rs (setup)

use std::sync::Arc;

use chrono::Duration;
use log::{debug, error, info, warn};
use serenity::model::id::UserId;
use serenity::prelude::TypeMapKey;
use tokio::sync::OwnedMutexGuard;

use crate::error::FetchError;
use crate::ranking::{join_statistics, rank, RankedPage, PAGE_SIZE};
use crate::session::{PageCursor, SessionStore, UserSession};
use crate::youtube::VideoApi;

/// Outcome of a search or "more" request, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Page(RankedPage),
    NoResults,
    Failed,
    SessionExpired,
    Exhausted,
}

pub struct QueryHandler {
    api: Arc<dyn VideoApi>,
    sessions: SessionStore,
}

// TypeMap key so serenity handlers can reach the shared handler
pub struct QueryHandlerKey;
impl TypeMapKey for QueryHandlerKey {
    type Value = Arc<QueryHandler>;
}

impl QueryHandler {
    pub fn new(api: Arc<dyn VideoApi>, session_ttl: Duration, session_capacity: usize) -> Self {
        Self {
            api,
            sessions: SessionStore::new(session_ttl, session_capacity),
        }
    }

    /// Create or replace the session of `user_id` for a fresh query.
    ///
    /// Waits for any request of the same user still in flight and returns the
    /// session locked, so the caller's first fetch runs before any queued
    /// "more" press.
    pub async fn resolve_query(&self, user_id: UserId, text: &str) -> OwnedMutexGuard<UserSession> {
        let mut session = self.sessions.open(user_id, text).await.lock_owned().await;
        session.reset(text);
        session
    }

    /// Handle a new text query.
    pub async fn search(&self, user_id: UserId, text: &str) -> Reply {
        info!("User {} searched for '{}'", user_id, text);
        let mut session = self.resolve_query(user_id, text).await;
        debug!("{} live search sessions", self.sessions.len().await);
        self.serve(&mut session).await
    }

    /// Handle a "more results" press.
    pub async fn more(&self, user_id: UserId) -> Reply {
        let Some(session) = self.sessions.get(user_id).await else {
            info!("User {} asked for more results without a live session", user_id);
            return Reply::SessionExpired;
        };

        let mut session = session.lock().await;
        if session.cursor == PageCursor::Exhausted {
            return Reply::Exhausted;
        }
        info!("User {} requested the next page for '{}'", user_id, session.query);
        self.serve(&mut session).await
    }

    async fn serve(&self, session: &mut UserSession) -> Reply {
        match self.fetch_ranked_page(session).await {
            Ok(Some(page)) => Reply::Page(page),
            Ok(None) => Reply::NoResults,
            Err(e) => {
                error!("Error fetching videos for user {}: {}", session.user_id, e);
                Reply::Failed
            }
        }
    }

    /// Fetch, join, rank and paginate one page for `session`.
    ///
    /// Returns `Ok(None)` when the search yields nothing, or when the search
    /// endpoint answers with an error status. The cursor only advances when a
    /// page is returned.
    pub async fn fetch_ranked_page(&self, session: &mut UserSession) -> Result<Option<RankedPage>, FetchError> {
        let search = self
            .api
            .search(&session.query, session.cursor.token(), PAGE_SIZE as u32)
            .await;

        let search = match search {
            Ok(page) => page,
            Err(e) if e.is_status() => {
                warn!("Search for '{}' rejected by the API, treating as no results: {}", session.query, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if search.items.is_empty() {
            return Ok(None);
        }

        let ids: Vec<String> = search.items.iter().map(|hit| hit.video_id.clone()).collect();
        let stats = self.api.statistics(&ids).await?;
        if stats.len() < ids.len() {
            warn!("Statistics returned {} entries for {} videos", stats.len(), ids.len());
        }

        let videos = rank(join_statistics(search.items, &stats), PAGE_SIZE);
        let page = RankedPage {
            videos,
            next_page_token: search.next_page_token,
        };

        session.cursor = PageCursor::after(page.next_page_token.clone());
        Ok(Some(page))
    }
}
