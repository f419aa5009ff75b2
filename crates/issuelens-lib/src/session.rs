//! Time-boxed session cache for normalized issue collections.
//!
//! The source system kept expiry checks scattered across call sites;
//! here persistence sits behind one explicit seam. A consumer only
//! ever sees a live collection or nothing: expiry and absence are
//! indistinguishable on load.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{LensError, Result};
use crate::model::Issue;

/// Default cache lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(10 * 60);

/// Persistence seam for normalized issue collections.
pub trait SessionStore {
    /// Load a session's issues; `None` when absent or expired.
    ///
    /// # Errors
    ///
    /// Returns an error only on I/O or parse failure, never for a
    /// missing or expired cache.
    fn load(&self, session: &str) -> Result<Option<Vec<Issue>>>;

    /// Persist a session's issues, stamping the save time.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure.
    fn save(&self, session: &str, issues: &[Issue]) -> Result<()>;

    /// Drop a session's cache. Clearing a missing session is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem failure.
    fn clear(&self, session: &str) -> Result<()>;
}

/// Cache document written per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSession {
    session: String,
    saved_at: DateTime<Utc>,
    issues: Vec<Issue>,
}

/// Metadata about a cached session, for inspection commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session: String,
    pub saved_at: DateTime<Utc>,
    pub issue_count: usize,
    pub expired: bool,
}

/// File-backed [`SessionStore`]: one JSON document per session under a
/// cache directory, written atomically (temp file + rename).
pub struct FileSessionStore {
    dir: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    /// Create a store over `dir` with the default 10-minute TTL.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Override the cache lifetime.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Inspect a session without the expiry gate (expired caches are
    /// still reported, flagged as such).
    ///
    /// # Errors
    ///
    /// Returns an error on I/O or parse failure.
    pub fn describe(&self, session: &str) -> Result<Option<SessionInfo>> {
        let Some(cached) = self.read_document(session)? else {
            return Ok(None);
        };
        Ok(Some(SessionInfo {
            expired: self.is_expired(cached.saved_at, Utc::now()),
            session: cached.session,
            saved_at: cached.saved_at,
            issue_count: cached.issues.len(),
        }))
    }

    fn is_expired(&self, saved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = (now - saved_at).num_milliseconds().max(0) as u128;
        age > self.ttl.as_millis()
    }

    /// Cache file name: sanitized session name plus a short hash of
    /// the full name, so distinct sessions never collide after
    /// sanitization.
    fn cache_path(&self, session: &str) -> PathBuf {
        let sanitized: String = session
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        let digest = Sha256::digest(session.as_bytes());
        let short: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
        self.dir.join(format!("{sanitized}-{short}.json"))
    }

    fn read_document(&self, session: &str) -> Result<Option<CachedSession>> {
        let path = self.cache_path(session);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let cached: CachedSession = serde_json::from_str(&contents)?;
        Ok(Some(cached))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, session: &str) -> Result<Option<Vec<Issue>>> {
        let Some(cached) = self.read_document(session)? else {
            return Ok(None);
        };
        if self.is_expired(cached.saved_at, Utc::now()) {
            tracing::debug!(session, saved_at = %cached.saved_at, "session cache expired");
            let _ = fs::remove_file(self.cache_path(session));
            return Ok(None);
        }
        Ok(Some(cached.issues))
    }

    fn save(&self, session: &str, issues: &[Issue]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| LensError::Storage(format!("cannot create cache dir: {e}")))?;

        let cached = CachedSession {
            session: session.to_string(),
            saved_at: Utc::now(),
            issues: issues.to_vec(),
        };
        let json = serde_json::to_string(&cached)?;

        let path = self.cache_path(session);
        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        drop(file);
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(session, count = issues.len(), "session cache saved");
        Ok(())
    }

    fn clear(&self, session: &str) -> Result<()> {
        let path = self.cache_path(session);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
