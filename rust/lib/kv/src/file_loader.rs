use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::KVError;
use crate::overlay::OverlayKV;
use crate::traits::KVStore;

/// Key prefix for every seeded file.
pub const SEED_PREFIX: &str = "seed:";

/// Loads seed files into the read-only layer of an [`OverlayKV`].
///
/// Each top-level `*.yaml`, `*.yml` or `*.json` file in the seed directory
/// becomes one entry keyed by its stem:
///
/// ```text
/// seed/
/// ├── destinations.yaml   → seed:destinations
/// └── notes.json          → seed:notes
/// ```
///
/// Subdirectories and other extensions are ignored.
pub struct FileLoader;

impl FileLoader {
    /// Returns the number of entries loaded. A missing directory loads nothing.
    pub fn load<DB: KVStore>(seed_dir: &Path, overlay: &OverlayKV<DB>) -> Result<usize, KVError> {
        if !seed_dir.is_dir() {
            debug!("seed dir {} does not exist, skipping", seed_dir.display());
            return Ok(0);
        }

        let entries = fs::read_dir(seed_dir)
            .map_err(|e| KVError::Seed(format!("{}: {e}", seed_dir.display())))?;

        let mut count = 0;
        for entry in entries {
            let path = entry.map_err(|e| KVError::Seed(e.to_string()))?.path();
            if !path.is_file() || !Self::is_seed_file(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("skipping seed file with non-UTF-8 name: {}", path.display());
                continue;
            };

            let data =
                fs::read(&path).map_err(|e| KVError::Seed(format!("{}: {e}", path.display())))?;
            overlay.insert_file_entry(format!("{SEED_PREFIX}{stem}"), data);
            count += 1;
        }

        debug!("loaded {count} seed entries from {}", seed_dir.display());
        Ok(count)
    }

    fn is_seed_file(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml" | "json")
        )
    }
}
