use crate::error::KVError;

/// Key-value storage with support for read-only keys.
///
/// Keys are namespaced with `:`: `seed:destinations` for seeded catalog data,
/// `auth:session:{sid}` for identity sessions.
pub trait KVStore: Send + Sync {
    /// `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Fails with `KVError::ReadOnly` for seeded keys.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Deleting an absent key is not an error. Fails with `KVError::ReadOnly`
    /// for seeded keys.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// All entries whose key starts with `prefix`, sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    fn is_readonly(&self, key: &str) -> bool;
}
