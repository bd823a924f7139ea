//! In-memory expense sheet sessions
//!
//! Each browser session owns one `ExpenseSheet`. Sessions expire after a
//! period of inactivity and are swept on creation and by the background
//! sweeper.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use budgetwise_core::{ExpenseEntry, ExpenseSheet};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

struct Session {
    sheet: ExpenseSheet,
    created_at: Instant,
    last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            sheet: ExpenseSheet::new(),
            created_at: now,
            last_activity: now,
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn view(&self, session_id: &str) -> SessionView {
        SessionView {
            session_id: session_id.to_string(),
            entries: self.sheet.snapshot(),
            created_at_secs_ago: self.created_at.elapsed().as_secs(),
            last_activity_secs_ago: self.last_activity.elapsed().as_secs(),
        }
    }
}

/// A session as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub entries: Vec<ExpenseEntry>,
    pub created_at_secs_ago: u64,
    pub last_activity_secs_ago: u64,
}

pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    timeout: Duration,
    counter: AtomicU64,
}

impl SessionManager {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
            counter: AtomicU64::new(0),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn next_id(&self) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        hasher.update(seq.to_le_bytes());
        let hash = hex::encode(hasher.finalize());
        format!("ses_{}", &hash[..20])
    }

    /// Create a session holding one blank expense row
    pub async fn create(&self) -> SessionView {
        let session_id = self.next_id();
        let session = Session::new();
        let view = session.view(&session_id);

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(self.timeout));
        sessions.insert(session_id, session);

        view
    }

    /// Current state of a live session
    pub async fn get(&self, session_id: &str) -> Option<SessionView> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .filter(|s| !s.is_expired(self.timeout))?;
        session.touch();
        Some(session.view(session_id))
    }

    /// Snapshot of a live session's rows
    pub async fn entries(&self, session_id: &str) -> Option<Vec<ExpenseEntry>> {
        self.with_sheet(session_id, |sheet| sheet.snapshot()).await
    }

    /// Run `f` against a live session's sheet, refreshing its activity time
    pub async fn with_sheet<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut ExpenseSheet) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .filter(|s| !s.is_expired(self.timeout))?;
        session.touch();
        Some(f(&mut session.sheet))
    }

    pub async fn delete(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Drop expired sessions, returning how many were removed
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, "Swept expired sessions");
        }
        removed
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_expired(self.timeout))
            .count()
    }
}
