//! Session storage
//!
//! Keeps the signed-in [`Session`] between console invocations, the way the
//! browser console keeps it in local storage.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use digesto_core::auth::Session;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Where a session survives between invocations
pub trait SessionStore: Send + Sync {
    /// Load the stored session, if any
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored session
    fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session; clearing an empty store is not an error
    fn clear(&self) -> Result<()>;
}

/// JSON file-backed session store
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// File name used inside the `digesto` config directory
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config_dir>/digesto/session.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ClientError::SessionStore("could not determine the user config directory".to_string())
        })?;
        Ok(Self::new(dir.join("digesto").join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::SessionStore(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::SessionStore(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::SessionStore(e.to_string()))?;
        write_private(&self.path, json.as_bytes()).map_err(|e| {
            ClientError::SessionStore(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session file {} removed", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::SessionStore(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Write `contents` readable by the owner only, since the file holds a
/// bearer token
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemorySessionStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>> {
        self.session
            .lock()
            .map_err(|_| ClientError::SessionStore("session lock poisoned".to_string()))
    }
}
