use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory searched for named configs: `tripmatchd -c prod` reads
/// `/etc/tripmatch/prod.toml`.
const CONFIG_DIR: &str = "/etc/tripmatch";

/// Server configuration file.
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/tripmatch"
///
/// [jwt]
/// secret = "..."
/// expire_secs = 86400
///
/// [catalog]
/// popular_limit = 6
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            popular_limit: default_popular_limit(),
        }
    }
}

fn default_expire_secs() -> i64 {
    86400
}

fn default_popular_limit() -> usize {
    6
}

impl ServerConfig {
    /// A bare name resolves to `{CONFIG_DIR}/{name}.toml`. Anything with a
    /// `/` or `.` is taken as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&text).map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_name_and_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/tripmatch/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./dev.toml"),
            PathBuf::from("./dev.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/tmp/x"),
            PathBuf::from("/tmp/x")
        );
    }

    #[test]
    fn parse_with_defaults() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/var/lib/tripmatch"

            [jwt]
            secret = "s3cret"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/tripmatch");
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.expire_secs, 86400);
        assert_eq!(config.catalog.popular_limit, 6);
    }

    #[test]
    fn parse_full() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "data"

            [jwt]
            secret = "k"
            expire_secs = 600

            [catalog]
            popular_limit = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.jwt.expire_secs, 600);
        assert_eq!(config.catalog.popular_limit, 3);
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(ServerConfig::parse("[storage]\ndata_dir = \"x\"\n").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.toml");
        std::fs::write(&path, "[storage]\ndata_dir = \"d\"\n[jwt]\nsecret = \"k\"\n").unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "d");

        assert!(ServerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
