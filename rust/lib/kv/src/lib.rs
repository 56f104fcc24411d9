//! Key-value storage: a redb-backed store and an overlay that serves seeded
//! files as read-only entries.

pub mod error;
pub mod file_loader;
pub mod overlay;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use file_loader::{FileLoader, SEED_PREFIX};
pub use overlay::OverlayKV;
pub use redb::RedbStore;
pub use traits::KVStore;
