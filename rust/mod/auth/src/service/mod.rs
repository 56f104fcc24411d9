pub mod identity;
pub mod profile;
pub mod schema;
pub mod session;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::info;

use tripmatch_core::ServiceError;
use tripmatch_kv::{KVError, KVStore};
use tripmatch_sql::{SQLError, SQLStore, Value};

use crate::model::SessionEvent;

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Write against a seeded key.
    #[error("read-only: {0}")]
    ReadOnly(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => ServiceError::NotFound(m),
            AuthError::Conflict(m) => ServiceError::Conflict(m),
            AuthError::Validation(m) => ServiceError::Validation(m),
            AuthError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AuthError::ReadOnly(m) => ServiceError::ReadOnly(m),
            AuthError::Storage(m) => ServiceError::Storage(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<SQLError> for AuthError {
    fn from(e: SQLError) -> Self {
        if e.is_constraint() {
            AuthError::Conflict(e.to_string())
        } else {
            AuthError::Storage(e.to_string())
        }
    }
}

impl From<KVError> for AuthError {
    fn from(e: KVError) -> Self {
        match e {
            KVError::ReadOnly(key) => AuthError::ReadOnly(format!("key is read-only: {key}")),
            other => AuthError::Storage(other.to_string()),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "tripmatch-dev-secret-change-me".to_string(),
            access_token_ttl: 86400,
        }
    }
}

/// Capacity of the session event channel. Slow listeners past this many
/// events see `Lagged` and re-check their session.
const EVENT_CAPACITY: usize = 64;

/// Local identity provider and profile store.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) config: AuthConfig,
    pub(crate) events: broadcast::Sender<SessionEvent>,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        config: AuthConfig,
    ) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let service = Self {
            sql,
            kv,
            config,
            events,
        };
        let purged = service.purge_expired_sessions()?;
        if purged > 0 {
            info!("removed {purged} expired sessions");
        }
        Ok(Arc::new(service))
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        // No receivers is fine: nobody is watching sessions right now.
        let _ = self.events.send(event);
    }

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), AuthError> {
        let json = serde_json::to_string(record).map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            cols.push(col);
            placeholders.push(format!("?{}", i + 3));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );
        self.sql.exec(&sql, &params)?;
        Ok(())
    }

    /// First record whose `column` equals `value`, decoded from the `data` column.
    pub(crate) fn find_record<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Option<T>, AuthError> {
        let sql = format!("SELECT data FROM {} WHERE {} = ?1 LIMIT 1", table, column);
        let rows = self.sql.query(&sql, &[Value::from(value)])?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let data = row.require_str("data")?;
        serde_json::from_str(data)
            .map(Some)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use tripmatch_kv::{OverlayKV, RedbStore};
    use tripmatch_sql::SqliteStore;

    use super::{AuthConfig, AuthService};

    /// Service over in-memory SQLite and a throwaway redb file. Keep the
    /// returned dir alive for the duration of the test.
    pub fn service() -> (Arc<AuthService>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(OverlayKV::new(
            RedbStore::open(&dir.path().join("kv.redb")).unwrap(),
        ));
        let svc = AuthService::new(sql, kv, AuthConfig::default()).unwrap();
        (svc, dir)
    }
}
