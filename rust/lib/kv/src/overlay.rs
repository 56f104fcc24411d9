use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::error::KVError;
use crate::traits::KVStore;

/// Two-layer store. Seeded entries live in an in-memory file layer that
/// shadows the database and cannot be written; everything else goes to `db`.
pub struct OverlayKV<DB: KVStore> {
    file_layer: RwLock<BTreeMap<String, Vec<u8>>>,
    db: DB,
}

impl<DB: KVStore> OverlayKV<DB> {
    pub fn new(db: DB) -> Self {
        Self {
            file_layer: RwLock::new(BTreeMap::new()),
            db,
        }
    }

    /// Add a seeded entry. Called by [`crate::FileLoader`] at startup.
    pub fn insert_file_entry(&self, key: String, value: Vec<u8>) {
        self.file_layer
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    pub fn file_layer_len(&self) -> usize {
        self.files().len()
    }

    // The map holds plain bytes, so a panic mid-insert cannot leave it torn.
    fn files(&self) -> RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.file_layer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn writable(&self, key: &str) -> Result<(), KVError> {
        if self.is_readonly(key) {
            return Err(KVError::ReadOnly(key.to_string()));
        }
        Ok(())
    }
}

impl<DB: KVStore> KVStore for OverlayKV<DB> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        if let Some(value) = self.files().get(key) {
            return Ok(Some(value.clone()));
        }
        self.db.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.writable(key)?;
        self.db.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.writable(key)?;
        self.db.delete(key)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let mut merged: BTreeMap<String, Vec<u8>> = self.db.scan(prefix)?.into_iter().collect();

        let files = self.files();
        for (key, value) in files.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            merged.insert(key.clone(), value.clone());
        }

        Ok(merged.into_iter().collect())
    }

    fn is_readonly(&self, key: &str) -> bool {
        self.files().contains_key(key)
    }
}
