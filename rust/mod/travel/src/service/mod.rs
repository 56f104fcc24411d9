pub mod collection;
pub mod query;

use std::sync::Arc;

use thiserror::Error;

use tripmatch_core::ServiceError;
use tripmatch_kv::KVError;
use tripmatch_sql::SQLError;

use crate::catalog::Catalog;
use crate::relations::RelationStore;

/// Travel service error type.
#[derive(Debug, Error)]
pub enum TravelError {
    #[error("not found: {0}")]
    NotFound(String),

    /// The pair is already stored.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    /// The catalog source could not be parsed or failed validation.
    #[error("catalog: {0}")]
    Catalog(String),

    /// Write against a seeded key.
    #[error("read-only: {0}")]
    ReadOnly(String),

    #[error("storage: {0}")]
    Storage(String),
}

impl From<TravelError> for ServiceError {
    fn from(e: TravelError) -> Self {
        match e {
            TravelError::NotFound(m) => ServiceError::NotFound(m),
            TravelError::Conflict(m) => ServiceError::Conflict(m),
            TravelError::Validation(m) => ServiceError::Validation(m),
            TravelError::Catalog(m) => ServiceError::Internal(m),
            TravelError::ReadOnly(m) => ServiceError::ReadOnly(m),
            TravelError::Storage(m) => ServiceError::Storage(m),
        }
    }
}

impl From<SQLError> for TravelError {
    fn from(e: SQLError) -> Self {
        if e.is_constraint() {
            TravelError::Conflict(e.to_string())
        } else {
            TravelError::Storage(e.to_string())
        }
    }
}

impl From<KVError> for TravelError {
    fn from(e: KVError) -> Self {
        match e {
            KVError::ReadOnly(key) => TravelError::ReadOnly(format!("key is read-only: {key}")),
            other => TravelError::Storage(other.to_string()),
        }
    }
}

/// Configuration for the travel service.
#[derive(Debug, Clone)]
pub struct TravelConfig {
    /// Size of the "popular" list: the first N catalog entries.
    pub popular_limit: usize,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self { popular_limit: 6 }
    }
}

/// Catalog queries plus the per-user saved and liked lists.
pub struct TravelService {
    pub(crate) catalog: Catalog,
    pub(crate) relations: Arc<dyn RelationStore>,
    pub(crate) config: TravelConfig,
}

impl TravelService {
    pub fn new(catalog: Catalog, relations: Arc<dyn RelationStore>, config: TravelConfig) -> Self {
        Self {
            catalog,
            relations,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
