use tripmatch_sql::SQLStore;

use crate::service::AuthError;

/// Create the identity and profile tables if they do not exist yet.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), AuthError> {
    sql.exec_batch(
        "CREATE TABLE IF NOT EXISTS identities (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        -- No foreign key to identities: a failed registration may leave an
        -- identity without a profile, never the reverse.
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            nickname TEXT NOT NULL,
            mbti_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;
    Ok(())
}
