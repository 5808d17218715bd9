//! Server configuration and shared handler state

use chirp_core::credentials::PasswordHasher;
use chirp_core::{CoreConfig, JsonStore, Services};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Configuration for the Chirp HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// JSON document holding accounts and posts
    pub db_path: PathBuf,
    /// Directory served under `/app`; must not contain `db_path`
    pub static_root: PathBuf,
    /// Secrets and policies handed to the core
    pub core: CoreConfig,
}

impl ServerConfig {
    pub fn new(core: CoreConfig) -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from("database.json"),
            static_root: PathBuf::from("public"),
            core,
        }
    }

    /// Build from the environment: `JWT_SECRET`, `POLKA_KEY`, `CHIRP_DB`,
    /// `CHIRP_STATIC_ROOT`, `PORT`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(CoreConfig::from_env()?);

        if let Some(port) = std::env::var("PORT").ok().and_then(|s| s.parse().ok()) {
            config.port = port;
        }
        if let Ok(db) = std::env::var("CHIRP_DB") {
            config.db_path = PathBuf::from(db);
        }
        if let Ok(root) = std::env::var("CHIRP_STATIC_ROOT") {
            config.static_root = PathBuf::from(root);
        }

        Ok(config)
    }

    /// Reject a layout where the file server would hand out the document.
    pub fn check(&self) -> chirp_core::Result<()> {
        let db = resolve(&self.db_path);
        let root = resolve(&self.static_root);

        if db.starts_with(&root) {
            return Err(chirp_core::Error::Config(format!(
                "database {:?} lies inside static root {:?}",
                self.db_path, self.static_root
            )));
        }
        Ok(())
    }
}

/// Absolute form of `path`, with symlinks resolved as far as the path exists.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let resolved = absolute
        .parent()
        .zip(absolute.file_name())
        .and_then(|(parent, name)| parent.canonicalize().ok().map(|p| p.join(name)));
    resolved.unwrap_or(absolute)
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub services: Services,
    /// Requests served under `/app` since start or last reset
    pub file_server_hits: Arc<AtomicU64>,
}

impl AppState {
    /// Open the document store and wire up the services.
    pub fn new(config: ServerConfig) -> chirp_core::Result<Self> {
        Self::with_hasher(config, PasswordHasher::default())
    }

    pub fn with_hasher(config: ServerConfig, hasher: PasswordHasher) -> chirp_core::Result<Self> {
        config.check()?;
        let store = Arc::new(JsonStore::open_with_hasher(&config.db_path, hasher)?);
        let services = Services::new(store, &config.core);

        Ok(Self {
            config,
            services,
            file_server_hits: Arc::new(AtomicU64::new(0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(db: PathBuf, static_root: PathBuf) -> ServerConfig {
        let mut config = ServerConfig::new(CoreConfig::new("secret", "key"));
        config.db_path = db;
        config.static_root = static_root;
        config
    }

    #[test]
    fn test_default_layout_keeps_document_unserved() {
        assert!(ServerConfig::new(CoreConfig::new("secret", "key")).check().is_ok());
    }

    #[test]
    fn test_document_inside_static_root_is_rejected() {
        let dir = TempDir::new().unwrap();

        let inside = config(dir.path().join("database.json"), dir.path().to_path_buf());
        assert!(matches!(inside.check(), Err(chirp_core::Error::Config(_))));

        let cwd = config(PathBuf::from("database.json"), PathBuf::from("."));
        assert!(matches!(cwd.check(), Err(chirp_core::Error::Config(_))));

        // Nothing is created when the layout is refused
        assert!(AppState::new(inside).is_err());
        assert!(!dir.path().join("database.json").exists());
    }

    #[test]
    fn test_sibling_static_root_is_accepted() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("public")).unwrap();

        let sibling = config(dir.path().join("database.json"), dir.path().join("public"));
        assert!(sibling.check().is_ok());
    }
}
