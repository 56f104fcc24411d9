//! Persistence of saved and liked (user, destination) pairs.

use std::sync::Arc;

use tripmatch_core::now_rfc3339;
use tripmatch_sql::{Row, SQLStore, Value};

use crate::model::{RelationKind, RelationRow};
use crate::service::TravelError;

/// Storage for relation rows. Each call is a single independent write or read.
pub trait RelationStore: Send + Sync {
    /// Fails with `TravelError::Conflict` if the pair already exists.
    fn insert(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<RelationRow, TravelError>;

    /// Returns whether a row was removed.
    fn delete(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<bool, TravelError>;

    /// A user's rows, newest first.
    fn list(&self, kind: RelationKind, user_id: &str) -> Result<Vec<RelationRow>, TravelError>;

    fn contains(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<bool, TravelError>;
}

/// Initialize the relation tables. The composite primary key is what makes
/// a pair unique; nothing checks it before inserting.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), TravelError> {
    for kind in RelationKind::ALL {
        let table = kind.table();
        sql.exec_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                user_id TEXT NOT NULL,
                destination_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, destination_id)
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_user_created
                ON {table}(user_id, created_at);"
        ))?;
    }
    Ok(())
}

/// RelationStore over a SQLStore.
pub struct SqlRelationStore {
    sql: Arc<dyn SQLStore>,
}

impl SqlRelationStore {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, TravelError> {
        init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }
}

fn row_to_relation(row: &Row) -> Result<RelationRow, TravelError> {
    Ok(RelationRow {
        user_id: row.require_str("user_id")?.to_string(),
        destination_id: row.require_str("destination_id")?.to_string(),
        created_at: row.require_str("created_at")?.to_string(),
    })
}

impl RelationStore for SqlRelationStore {
    fn insert(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<RelationRow, TravelError> {
        let row = RelationRow {
            user_id: user_id.to_string(),
            destination_id: destination_id.to_string(),
            created_at: now_rfc3339(),
        };
        let sql = format!(
            "INSERT INTO {} (user_id, destination_id, created_at) VALUES (?1, ?2, ?3)",
            kind.table()
        );
        self.sql
            .exec(
                &sql,
                &[
                    Value::from(user_id),
                    Value::from(destination_id),
                    Value::from(row.created_at.as_str()),
                ],
            )
            .map_err(|e| match TravelError::from(e) {
                TravelError::Conflict(_) => TravelError::Conflict(format!(
                    "destination {destination_id} already {}",
                    kind.as_str()
                )),
                other => other,
            })?;
        Ok(row)
    }

    fn delete(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<bool, TravelError> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = ?1 AND destination_id = ?2",
            kind.table()
        );
        let affected = self
            .sql
            .exec(&sql, &[Value::from(user_id), Value::from(destination_id)])?;
        Ok(affected > 0)
    }

    fn list(&self, kind: RelationKind, user_id: &str) -> Result<Vec<RelationRow>, TravelError> {
        // rowid breaks ties between rows written within the same instant.
        let sql = format!(
            "SELECT user_id, destination_id, created_at FROM {}
             WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            kind.table()
        );
        self.sql
            .query(&sql, &[Value::from(user_id)])?
            .iter()
            .map(row_to_relation)
            .collect()
    }

    fn contains(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<bool, TravelError> {
        let sql = format!(
            "SELECT 1 AS hit FROM {} WHERE user_id = ?1 AND destination_id = ?2",
            kind.table()
        );
        let rows = self
            .sql
            .query(&sql, &[Value::from(user_id), Value::from(destination_id)])?;
        Ok(!rows.is_empty())
    }
}
