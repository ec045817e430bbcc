//! Durable credential persistence.
//!
//! The credential record is three files under the credentials directory:
//!
//! - `token` — the raw bearer token
//! - `user.json` — the serialized [`UserProfile`]
//! - `permissions.json` — the serialized permission list
//!
//! The three are written and cleared as a unit. `load` returns a complete
//! record or nothing: a missing or unparseable file makes the whole record
//! absent, never an error to the caller. The token file is written last and
//! read first, so an interrupted save can never leave a token behind without
//! the profile and permissions it belongs to.
//!
//! Only the session manager drives this store; nothing else touches these
//! files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::api::models::UserProfile;
use crate::auth::permissions::PermissionSet;
use crate::errors::{Error, Result};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";
const PERMISSIONS_FILE: &str = "permissions.json";

/// A complete persisted credential unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub token: String,
    pub user: UserProfile,
    pub permissions: PermissionSet,
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Persist a complete credential record.
    ///
    /// User and permissions are written before the token, which acts as the
    /// commit marker for the unit.
    pub fn save(&self, token: &str, user: &UserProfile, permissions: &PermissionSet) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Storage {
            operation: format!("create credentials directory {}", self.dir.display()),
            source,
        })?;

        let user_json = serde_json::to_vec_pretty(user).map_err(|e| Error::Internal {
            operation: format!("serialize user profile: {e}"),
        })?;
        let permissions_json = serde_json::to_vec_pretty(permissions).map_err(|e| Error::Internal {
            operation: format!("serialize permissions: {e}"),
        })?;

        write_file(&self.path(USER_FILE), &user_json)?;
        write_file(&self.path(PERMISSIONS_FILE), &permissions_json)?;
        write_file(&self.path(TOKEN_FILE), token.as_bytes())?;

        Ok(())
    }

    /// Load the last-saved credential record.
    ///
    /// Returns `None` when no record exists or when any part of it is
    /// missing or corrupt; corruption is a debug-level event, not a fault.
    pub fn load(&self) -> Option<CredentialRecord> {
        let token = read_file(&self.path(TOKEN_FILE))?;
        let token = token.trim().to_string();
        if token.is_empty() {
            debug!("stored token is empty, treating credential record as absent");
            return None;
        }

        let user = match serde_json::from_str(&read_file(&self.path(USER_FILE))?) {
            Ok(user) => user,
            Err(e) => {
                debug!("stored user profile is corrupt ({e}), treating credential record as absent");
                return None;
            }
        };

        let permissions = match serde_json::from_str(&read_file(&self.path(PERMISSIONS_FILE))?) {
            Ok(permissions) => permissions,
            Err(e) => {
                debug!("stored permissions are corrupt ({e}), treating credential record as absent");
                return None;
            }
        };

        Some(CredentialRecord { token, user, permissions })
    }

    /// Remove the persisted record. Idempotent.
    pub fn clear(&self) -> Result<()> {
        // Token first: once it is gone the record is absent regardless of
        // what happens to the other two files.
        for file in [TOKEN_FILE, USER_FILE, PERMISSIONS_FILE] {
            match fs::remove_file(self.path(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(Error::Storage {
                        operation: format!("remove {file}"),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Storage {
        operation: format!("write {}", path.display()),
        source,
    })
}

fn read_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            debug!("could not read {} ({e}), treating credential record as absent", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_user() -> UserProfile {
        UserProfile {
            id: 42,
            email: "ops@example.com".to_string(),
            is_active: true,
            created_at: None,
        }
    }

    fn test_permissions() -> PermissionSet {
        vec!["dashboard.read".to_string(), "users.read".to_string()].into()
    }

    #[test]
    fn save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("tok-123", &test_user(), &test_permissions()).unwrap();

        let record = store.load().expect("record should be present");
        assert_eq!(record.token, "tok-123");
        assert_eq!(record.user, test_user());
        assert!(record.permissions.grants("dashboard.read"));
    }

    #[test]
    fn load_absent_when_never_saved() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("nested"));
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_removes_record_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("tok-123", &test_user(), &test_permissions()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());

        // clearing an already-empty store is a no-op
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn corrupt_user_profile_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("tok-123", &test_user(), &test_permissions()).unwrap();
        fs::write(dir.path().join(USER_FILE), "{not json").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn partial_record_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        // A token with no profile or permissions alongside it must not
        // surface as a session.
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join(TOKEN_FILE), "orphan-token").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn empty_token_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("", &test_user(), &test_permissions()).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("tok-old", &test_user(), &test_permissions()).unwrap();
        let other = UserProfile {
            id: 7,
            email: "other@example.com".to_string(),
            is_active: true,
            created_at: None,
        };
        store.save("tok-new", &other, &PermissionSet::new()).unwrap();

        let record = store.load().unwrap();
        assert_eq!(record.token, "tok-new");
        assert_eq!(record.user.email, "other@example.com");
        assert!(record.permissions.is_empty());
    }
}
