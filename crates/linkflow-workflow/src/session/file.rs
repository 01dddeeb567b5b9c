/*
[INPUT]:  Slot file path
[OUTPUT]: Session slot persisted across process restarts
[POS]:    Session layer - durable file-backed store
[UPDATE]: When slot format, location, or write strategy change
*/

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use super::store::{Session, SessionStore, StoreError};

const SESSION_FILE_NAME: &str = "session.json";

/// Default slot location: `<data dir>/linkflow/session.json`.
///
/// Falls back to `./.linkflow/session.json` when the platform has no data dir.
pub fn default_session_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("linkflow").join(SESSION_FILE_NAME),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".linkflow")
            .join(SESSION_FILE_NAME),
    }
}

/// Session slot stored as a single JSON file.
///
/// The slot is read once on [`open`](Self::open); afterwards the in-memory
/// view is only replaced after the file write has been committed.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    slot: RwLock<Option<Session>>,
}

impl FileSessionStore {
    /// Open the slot at `path`, restoring any persisted session
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let session = load_slot(&path)?;
        tracing::debug!(
            path = %path.display(),
            restored = session.is_some(),
            "session store opened"
        );
        Ok(Self {
            path,
            slot: RwLock::new(session),
        })
    }

    /// Open the slot at [`default_session_path`]
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, session: Session) -> Result<(), StoreError> {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        write_slot(&self.path, &session)?;
        *guard = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        *guard = None;
        Ok(())
    }
}

fn load_slot(path: &Path) -> Result<Option<Session>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Session>(trimmed) {
        Ok(session) => Ok(Some(session)),
        Err(err) if trimmed.starts_with('{') || trimmed.starts_with('"') => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring corrupt session slot");
            Ok(None)
        }
        Err(_) => {
            // bare token written by older clients
            let created_at = fs::metadata(path)
                .and_then(|meta| meta.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            Ok(Some(Session {
                token: trimmed.to_string(),
                created_at,
            }))
        }
    }
}

fn write_slot(path: &Path, session: &Session) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut temp_file = NamedTempFile::new_in(&parent)?;
    let json = serde_json::to_string(session)?;
    temp_file.write_all(json.as_bytes())?;
    temp_file.flush()?;
    restrict_permissions(temp_file.path())?;
    temp_file.persist(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.get().is_none());

        let session = Session::new("tok-abc");
        store.set(session.clone()).unwrap();
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(), Some(session));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set(Session::new("tok")).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.get().is_none());
        assert!(FileSessionStore::open(&path).unwrap().get().is_none());
    }

    #[test]
    fn test_bare_token_slot_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "mock_token_1700000000000\n").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        let session = store.get().expect("legacy token restored");
        assert_eq!(session.token, "mock_token_1700000000000");
    }

    #[test]
    fn test_corrupt_slot_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{\"token\": ").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.get().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_slot_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::open(&path).unwrap();
        store.set(Session::new("tok")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_default_path_file_name() {
        assert_eq!(
            default_session_path().file_name().and_then(|n| n.to_str()),
            Some(SESSION_FILE_NAME)
        );
    }
}
