//! Configuration management for `issuelens`.
//!
//! Configuration is loaded from YAML with environment overrides:
//! - Workspace config (.issuelens/config.yaml)
//! - `ISSUELENS_*` environment variables (highest precedence)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use issuelens_lib::FileSessionStore;

/// Workspace directory holding config and session caches.
pub const WORKSPACE_DIR: &str = ".issuelens";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory session caches are written to.
    pub cache_dir: PathBuf,

    /// Session cache lifetime in minutes.
    pub session_ttl_minutes: u64,

    /// Session name used when no `--session` flag is given.
    pub default_session: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: Path::new(WORKSPACE_DIR).join("cache"),
            session_ttl_minutes: 10,
            default_session: "default".to_string(),
        }
    }
}

impl Config {
    /// Load config for the current directory, applying env overrides.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read
    /// or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new("."))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load the workspace config file under `root`, without env
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or
    /// parsed.
    pub fn load_from(root: &Path) -> Result<Self> {
        let path = root.join(WORKSPACE_DIR).join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply `ISSUELENS_*` overrides from an environment lookup.
    /// Unparseable values are ignored in favor of the file/default.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("ISSUELENS_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(ttl) = var("ISSUELENS_SESSION_TTL_MINUTES") {
            match ttl.parse::<u64>() {
                Ok(minutes) => self.session_ttl_minutes = minutes,
                Err(_) => tracing::warn!(value = %ttl, "ignoring bad ISSUELENS_SESSION_TTL_MINUTES"),
            }
        }
        if let Some(session) = var("ISSUELENS_SESSION") {
            self.default_session = session;
        }
    }

    /// Session store configured with this config's cache dir and TTL.
    #[must_use]
    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(&self.cache_dir)
            .with_ttl(Duration::from_secs(self.session_ttl_minutes * 60))
    }
}
