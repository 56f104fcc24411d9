use std::path::PathBuf;

/// Storage and listener settings shared by the server and the modules.
///
/// The binary fills this from its TOML file and command-line flags; modules
/// only ever ask it for resolved paths.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root directory for everything the service persists or seeds from.
    pub data_dir: Option<PathBuf>,

    /// redb file holding identity sessions.
    /// Defaults to `{data_dir}/data.redb`.
    pub db_path: Option<PathBuf>,

    /// SQLite file holding identities, profiles and saved/liked rows.
    /// Defaults to `{data_dir}/data.sqlite`.
    pub sqlite_path: Option<PathBuf>,

    /// Directory scanned for read-only seed files (the destination catalog).
    /// Defaults to `{data_dir}/seed/`.
    pub seed_dir: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            sqlite_path: None,
            seed_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("data.redb"))
    }

    pub fn resolve_sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("data.sqlite"))
    }

    pub fn resolve_seed_dir(&self) -> PathBuf {
        self.seed_dir
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("seed"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
