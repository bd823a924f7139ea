//! Background task that sweeps expired sessions
//!
//! Sessions are also pruned whenever a new one is created; the sweeper keeps
//! memory bounded on a server that sees no new sessions for a while.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::info;

use crate::sessions::SessionManager;

/// Shortest interval between sweeps
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// How often to sweep for a given session timeout
pub fn sweep_interval(timeout: Duration) -> Duration {
    (timeout / 2).max(MIN_SWEEP_INTERVAL)
}

/// Start the session sweeper as a background task
pub fn start_session_sweeper(sessions: Arc<SessionManager>) {
    let every = sweep_interval(sessions.timeout());
    info!("Starting session sweeper: every {}s", every.as_secs());

    tokio::spawn(async move {
        let mut ticker = interval(every);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sessions.sweep().await;
        }
    });
}
