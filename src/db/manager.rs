//! Connection manager for database handle lifecycle.
//!
//! Repeated questions within a session reuse the same handle instead of
//! reconnecting every turn. The cache is keyed on the full connection config
//! and time-boxed; explicit reconfiguration invalidates it immediately.

use std::time::{Duration, Instant};

use crate::config::ConnectionConfig;
use crate::db::DatabaseClient;
use crate::error::Result;
use tracing::debug;

/// How long a cached handle stays valid.
const HANDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct CachedConnection {
    config: ConnectionConfig,
    db: Box<dyn DatabaseClient>,
    opened_at: Instant,
}

/// Manages the active database connection for one interactive session.
pub struct ConnectionManager {
    active: Option<CachedConnection>,
    ttl: Duration,
}

impl ConnectionManager {
    /// Creates a new connection manager with the default TTL.
    pub fn new() -> Self {
        Self {
            active: None,
            ttl: HANDLE_TTL,
        }
    }

    /// Creates a manager with a custom TTL (for tests).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { active: None, ttl }
    }

    /// Returns a handle for the given config, reusing the cached one when the
    /// config is unchanged and the cache has not expired.
    pub async fn handle(&mut self, config: &ConnectionConfig) -> Result<&dyn DatabaseClient> {
        let reusable = self
            .active
            .as_ref()
            .map(|c| c.config == *config && c.opened_at.elapsed() < self.ttl)
            .unwrap_or(false);

        if !reusable {
            if let Some(old) = self.active.take() {
                debug!("Discarding cached database handle");
                let _ = old.db.close().await;
            }

            let db = crate::db::connect(config).await?;
            debug!(connection = %config.display_string(), "Opened database handle");
            self.active = Some(CachedConnection {
                config: config.clone(),
                db,
                opened_at: Instant::now(),
            });
        }

        Ok(self
            .active
            .as_ref()
            .map(|c| c.db.as_ref())
            .expect("connection was just cached"))
    }

    /// Installs an already-open handle (for tests with mock clients).
    pub fn set_active(&mut self, config: ConnectionConfig, db: Box<dyn DatabaseClient>) {
        self.active = Some(CachedConnection {
            config,
            db,
            opened_at: Instant::now(),
        });
    }

    /// Returns true if a handle is currently cached.
    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Closes and drops the cached handle, if any.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.active.take() {
            conn.db.close().await?;
        }
        Ok(())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
