//! In-memory session store.
//!
//! The [`SessionStore`] is the authoritative holder of all live sessions.
//! Callers receive clones, never references into the map, and all
//! mutations serialize on a single store-wide lock. The lock is only held
//! for the brief mutation itself; generation I/O happens outside it.

use chrono::{DateTime, Utc};
use crisis_sim_core::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One ongoing crisis-scenario conversation.
///
/// Owned exclusively by the store; `step` starts at 1 and increments on
/// each advance, and `last_updated_at` stays `None` until the first
/// advance.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session identifier, generated at creation.
    pub id: Uuid,

    /// Type of crisis (e.g., "earthquake").
    pub crisis_type: String,

    /// Location where the crisis occurs.
    pub location: String,

    /// Number of people affected.
    pub people_count: u32,

    /// Current narrative text.
    pub scenario: String,

    /// Step counter, starting at 1.
    pub step: u32,

    /// Creation time, immutable.
    pub created_at: DateTime<Utc>,

    /// Time of the most recent advance.
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Thread-safe store mapping session identifiers to sessions.
///
/// Uses an in-memory `HashMap` protected by `RwLock`. Mutations
/// (`create`, `update`, `evict_older_than`) are mutually exclusive per
/// store instance, so concurrent tool calls cannot corrupt the mapping,
/// lose updates, or observe torn session fields.
///
/// # Examples
///
/// ```
/// use crisis_sim_engine::SessionStore;
///
/// # async fn example() {
/// let store = SessionStore::new();
///
/// let id = store
///     .create("earthquake", "San Francisco", 5000, "A quake hit.".to_string())
///     .await;
///
/// let session = store.get(id).await.unwrap();
/// assert_eq!(session.step, 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new session and returns its identifier.
    ///
    /// The identifier is a fresh v4 UUID; the session starts at step 1
    /// with `created_at = now`. Never fails.
    pub async fn create(
        &self,
        crisis_type: &str,
        location: &str,
        people_count: u32,
        scenario: String,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            id,
            crisis_type: crisis_type.to_string(),
            location: location.to_string(),
            people_count,
            scenario,
            step: 1,
            created_at: Utc::now(),
            last_updated_at: None,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, session);
        id
    }

    /// Returns a copy of the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if the identifier is unknown or
    /// the session has been evicted.
    pub async fn get(&self, id: Uuid) -> Result<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound {
                session_id: id.to_string(),
            })
    }

    /// Overwrites the session narrative and advances its step.
    ///
    /// Sets `last_updated_at = now` and returns the new step number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if the identifier is unknown.
    pub async fn update(&self, id: Uuid, new_scenario: String) -> Result<u32> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| Error::SessionNotFound {
            session_id: id.to_string(),
        })?;

        session.scenario = new_scenario;
        session.step += 1;
        session.last_updated_at = Some(Utc::now());

        Ok(session.step)
    }

    /// Removes every session older than `max_age` relative to `now`.
    ///
    /// Returns the number of sessions evicted, for observability.
    pub async fn evict_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> usize {
        // Out-of-range max_age degrades to "never evict"
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now.signed_duration_since(s.created_at) <= max_age);
        before - sessions.len()
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Returns `true` if the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();

        let id = store
            .create("earthquake", "San Francisco", 5000, "narrative".to_string())
            .await;

        let session = store.get(id).await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.crisis_type, "earthquake");
        assert_eq!(session.location, "San Francisco");
        assert_eq!(session.people_count, 5000);
        assert_eq!(session.scenario, "narrative");
        assert_eq!(session.step, 1);
        assert!(session.last_updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let store = SessionStore::new();

        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_session_not_found());
    }

    #[tokio::test]
    async fn test_update_advances_step() {
        let store = SessionStore::new();
        let id = store.create("flood", "Houston", 300, "before".to_string()).await;

        let step = store.update(id, "after".to_string()).await.unwrap();
        assert_eq!(step, 2);

        let session = store.get(id).await.unwrap();
        assert_eq!(session.scenario, "after");
        assert_eq!(session.step, 2);
        assert!(session.last_updated_at.is_some());
        assert!(session.last_updated_at.unwrap() >= session.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_session() {
        let store = SessionStore::new();

        let err = store.update(Uuid::new_v4(), "text".to_string()).await.unwrap_err();
        assert!(err.is_session_not_found());
    }

    #[tokio::test]
    async fn test_eviction_removes_only_old_sessions() {
        let store = SessionStore::new();
        let max_age = Duration::from_secs(24 * 60 * 60);

        let id = store.create("flood", "Houston", 300, "text".to_string()).await;

        // Sweep at +1h keeps the session
        let sweep = Utc::now() + chrono::Duration::hours(1);
        assert_eq!(store.evict_older_than(max_age, sweep).await, 0);
        assert!(store.get(id).await.is_ok());

        // Sweep at +25h evicts it
        let sweep = Utc::now() + chrono::Duration::hours(25);
        assert_eq!(store.evict_older_than(max_age, sweep).await, 1);
        let err = store.get(id).await.unwrap_err();
        assert!(err.is_session_not_found());
    }

    #[tokio::test]
    async fn test_eviction_on_empty_store() {
        let store = SessionStore::new();
        let evicted = store
            .evict_older_than(Duration::from_secs(60), Utc::now())
            .await;
        assert_eq!(evicted, 0);
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_distinct_ids() {
        let store = Arc::new(SessionStore::new());
        let mut handles = vec![];

        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create("earthquake", "San Francisco", i, "text".to_string())
                    .await
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().await, 32);
    }
}
