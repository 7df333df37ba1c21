// session.rs - Per-User Search Sessions
// Keeps the current query and pagination cursor of every user who searched
// recently. Entries expire after a time-to-live and the store never grows
// past its capacity.
//
// Each session sits behind its own async mutex. Holding that lock across a
// fetch serializes a user's actions, so two quick "more" presses produce two
// consecutive pages instead of the same page twice.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serenity::model::id::UserId;
use tokio::sync::Mutex;

/// Where the next "more" request should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    First,
    Next(String),
    /// The last page had no continuation token.
    Exhausted,
}

impl PageCursor {
    pub fn token(&self) -> Option<&str> {
        match self {
            PageCursor::Next(token) => Some(token.as_str()),
            _ => None,
        }
    }

    pub fn after(next_page_token: Option<String>) -> Self {
        match next_page_token {
            Some(token) => PageCursor::Next(token),
            None => PageCursor::Exhausted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: UserId,
    pub query: String,
    pub cursor: PageCursor,
}

impl UserSession {
    pub fn new(user_id: UserId, query: &str) -> Self {
        Self {
            user_id,
            query: query.to_string(),
            cursor: PageCursor::First,
        }
    }

    /// Start over with a new query.
    pub fn reset(&mut self, query: &str) {
        self.query = query.to_string();
        self.cursor = PageCursor::First;
    }
}

pub type SharedSession = Arc<Mutex<UserSession>>;

struct Slot {
    session: SharedSession,
    last_used: DateTime<Utc>,
}

pub struct SessionStore {
    ttl: Duration,
    capacity: usize,
    slots: Mutex<HashMap<UserId, Slot>>,
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Session handle for `user_id`, created empty if absent or expired.
    /// Callers reset it with the new query after locking it.
    pub async fn open(&self, user_id: UserId, query: &str) -> SharedSession {
        self.open_at(user_id, query, Utc::now()).await
    }

    /// Live session for `user_id`, if any. Refreshes its expiry.
    pub async fn get(&self, user_id: UserId) -> Option<SharedSession> {
        self.get_at(user_id, Utc::now()).await
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub(crate) async fn open_at(&self, user_id: UserId, query: &str, now: DateTime<Utc>) -> SharedSession {
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get_mut(&user_id) {
            if !self.is_expired(slot, now) {
                slot.last_used = now;
                return Arc::clone(&slot.session);
            }
        }

        if !slots.contains_key(&user_id) && slots.len() >= self.capacity {
            self.make_room(&mut slots, now);
        }

        let session = Arc::new(Mutex::new(UserSession::new(user_id, query)));
        slots.insert(
            user_id,
            Slot {
                session: Arc::clone(&session),
                last_used: now,
            },
        );
        session
    }

    pub(crate) async fn get_at(&self, user_id: UserId, now: DateTime<Utc>) -> Option<SharedSession> {
        let mut slots = self.slots.lock().await;

        let slot = slots.get_mut(&user_id)?;
        if !self.is_expired(slot, now) {
            slot.last_used = now;
            return Some(Arc::clone(&slot.session));
        }

        debug!("Session for user {} expired", user_id);
        slots.remove(&user_id);
        None
    }

    fn is_expired(&self, slot: &Slot, now: DateTime<Utc>) -> bool {
        now - slot.last_used >= self.ttl
    }

    /// Drop expired sessions, then the least recently used one if still full.
    fn make_room(&self, slots: &mut HashMap<UserId, Slot>, now: DateTime<Utc>) {
        let before = slots.len();
        slots.retain(|_, slot| now - slot.last_used < self.ttl);
        if before != slots.len() {
            debug!("Purged {} expired sessions", before - slots.len());
        }

        if slots.len() >= self.capacity {
            let oldest = slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(user_id, _)| *user_id);
            if let Some(user_id) = oldest {
                debug!("Session store full, evicting user {}", user_id);
                slots.remove(&user_id);
            }
        }
    }
}
