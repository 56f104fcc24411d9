//! Travel module: the destination catalog, its queries, and per-user saved
//! and liked lists.
//!
//! # Usage
//!
//! ```ignore
//! use travel::{TravelModule, service::TravelConfig};
//!
//! let module = TravelModule::new(sql, kv.as_ref(), TravelConfig::default(), auth.authenticator())?;
//! let router = module.routes(); // /destinations/..., /mbti, /me/...
//! ```

pub mod api;
pub mod catalog;
pub mod model;
pub mod relations;
pub mod service;

use std::sync::Arc;

use axum::Router;
use tracing::info;

use tripmatch_core::{Authenticator, Module, ServiceError};
use tripmatch_kv::KVStore;
use tripmatch_sql::SQLStore;

use crate::catalog::Catalog;
use crate::relations::SqlRelationStore;
use crate::service::{TravelConfig, TravelService};

pub struct TravelModule {
    service: Arc<TravelService>,
    auth: Arc<dyn Authenticator>,
}

impl TravelModule {
    /// Load the catalog from `kv` (or the built-in one) and set up the
    /// relation tables in `sql`.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: &dyn KVStore,
        config: TravelConfig,
        auth: Arc<dyn Authenticator>,
    ) -> Result<Self, ServiceError> {
        let catalog = Catalog::load(kv)?;
        let relations = Arc::new(SqlRelationStore::new(sql)?);
        info!(
            "travel catalog ready: {} destinations, {} tags",
            catalog.len(),
            catalog.tags().len()
        );
        let service = Arc::new(TravelService::new(catalog, relations, config));
        Ok(Self { service, auth })
    }

    pub fn service(&self) -> &Arc<TravelService> {
        &self.service
    }
}

impl Module for TravelModule {
    fn name(&self) -> &str {
        "travel"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone(), self.auth.clone())
    }
}
