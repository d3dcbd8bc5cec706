//! Flat-file credential store
//!
//! Credentials live in a single TOML file mapping each username to an
//! Argon2id PHC hash:
//!
//! ```toml
//! alice = "$argon2id$v=19$m=19456,t=2,p=1$..."
//! ```
//!
//! The whole file is read on every check and rewritten on every signup.
//! Writers are serialized through a per-store mutex and the new file is
//! renamed into place, so a signup can neither lose a concurrent signup
//! nor leave a half-written store behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::sync::Mutex;

/// username -> password hash
pub type Credentials = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("A username and password is required")]
    MissingFields,
    #[error("Username taken. Please choose a new username")]
    UsernameTaken(String),
    #[error("credential store {path} is unavailable: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },
    #[error("stored hash for {0} is invalid")]
    InvalidHash(String),
    #[error("failed to hash password: {0}")]
    Hashing(String),
    #[error("failed to write credential store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize credential store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl CredentialError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields | Self::UsernameTaken(_))
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store file if none exists.
    /// Returns whether a new file was created.
    pub async fn init(&self) -> Result<bool, CredentialError> {
        let _guard = self.write_lock.lock().await;

        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        self.persist(&Credentials::new()).await?;
        Ok(true)
    }

    /// Read and parse the whole store
    pub async fn load(&self) -> Result<Credentials, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.unavailable(e))?;
        toml::from_str(&raw).map_err(|e| self.unavailable(e))
    }

    pub async fn len(&self) -> Result<usize, CredentialError> {
        Ok(self.load().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, CredentialError> {
        Ok(self.len().await? == 0)
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield `Ok(false)`.
    pub async fn validate(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let credentials = self.load().await?;
        let Some(hash) = credentials.get(username).cloned() else {
            return Ok(false);
        };

        let username = username.to_string();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            verify_password(&password, &hash).map_err(|_| CredentialError::InvalidHash(username))
        })
        .await
        .map_err(|e| CredentialError::Hashing(e.to_string()))?
    }

    /// Register a new user
    pub async fn create(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        if username.is_empty() || password.is_empty() {
            return Err(CredentialError::MissingFields);
        }

        let _guard = self.write_lock.lock().await;

        let mut credentials = self.load().await?;
        if credentials.contains_key(username) {
            return Err(CredentialError::UsernameTaken(username.to_string()));
        }

        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))??;

        credentials.insert(username.to_string(), hash);
        self.persist(&credentials).await?;

        tracing::info!(username, "credential created");
        Ok(())
    }

    async fn persist(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        let serialized = toml::to_string(credentials)?;
        let tmp_path = self.path.with_extension("toml.tmp");
        tokio::fs::write(&tmp_path, serialized).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn unavailable(&self, reason: impl ToString) -> CredentialError {
        CredentialError::StoreUnavailable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

/// Verify a password against a PHC-format hash string.
/// Errors only if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("secret", &first).unwrap());
        assert!(verify_password("secret", &second).unwrap());
        assert!(!verify_password("Secret", &first).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("secret", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_unavailable() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = CredentialStore::new(temp_dir.path().join("users.toml"));

        let result = store.load().await;
        assert!(matches!(
            result,
            Err(CredentialError::StoreUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_unavailable() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("users.toml");
        std::fs::write(&path, "alice = [unterminated").unwrap();

        let store = CredentialStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(CredentialError::StoreUnavailable { .. })
        ));
        // validation surfaces the same failure instead of a silent `false`
        assert!(store.validate("alice", "secret").await.is_err());
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = CredentialStore::new(temp_dir.path().join("nested").join("users.toml"));

        assert!(store.init().await.unwrap());
        assert!(store.is_empty().await.unwrap());
        store.create("alice", "secret").await.unwrap();

        assert!(!store.init().await.unwrap());
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
