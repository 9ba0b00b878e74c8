//! Where the student's access token lives between requests.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Owner read/write only.
#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

#[derive(Debug, thiserror::Error)]
pub enum AuthStorageError {
    #[error("Failed to write token to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to remove token at {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Supplies the bearer credential for authenticated requests.
///
/// A missing token is not an error here: requests simply go out without
/// credentials and the server's answer says what went wrong.
#[async_trait]
pub trait SessionAccessor: Send + Sync {
    async fn get_access_token(&self) -> Option<SecretString>;

    async fn set_access_token(
        &self,
        token: SecretString,
    ) -> Result<(), AuthStorageError>;

    /// Forget the token, e.g. on logout.
    async fn remove_access_token(&self) -> Result<(), AuthStorageError>;
}

#[async_trait]
impl<T: SessionAccessor + ?Sized> SessionAccessor for Arc<T> {
    async fn get_access_token(&self) -> Option<SecretString> {
        (**self).get_access_token().await
    }

    async fn set_access_token(
        &self,
        token: SecretString,
    ) -> Result<(), AuthStorageError> {
        (**self).set_access_token(token).await
    }

    async fn remove_access_token(&self) -> Result<(), AuthStorageError> {
        (**self).remove_access_token().await
    }
}

fn copy_secret(token: &SecretString) -> SecretString {
    SecretString::from(token.expose_secret().to_owned())
}

/// Token held in process memory only.
#[derive(Default)]
pub struct MemoryAuthStorage {
    token: RwLock<Option<SecretString>>,
}

impl MemoryAuthStorage {
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl SessionAccessor for MemoryAuthStorage {
    async fn get_access_token(&self) -> Option<SecretString> {
        self.token.read().await.as_ref().map(copy_secret)
    }

    async fn set_access_token(
        &self,
        token: SecretString,
    ) -> Result<(), AuthStorageError> {
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn remove_access_token(&self) -> Result<(), AuthStorageError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Token persisted in a file so it survives restarts.
///
/// The file holds nothing but the token. A missing or unreadable file means
/// there is no token.
pub struct FileAuthStorage {
    path: PathBuf,
}

impl FileAuthStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionAccessor for FileAuthStorage {
    async fn get_access_token(&self) -> Option<SecretString> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| SecretString::from(token.to_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "couldn't read access token"
                );
                None
            }
        }
    }

    async fn set_access_token(
        &self,
        token: SecretString,
    ) -> Result<(), AuthStorageError> {
        let write = async {
            if let Some(parent) = self.path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let mut options = tokio::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(TOKEN_FILE_MODE);
            let mut file = options.open(&self.path).await?;
            // mode only applies on creation; tighten a file that already existed
            #[cfg(unix)]
            file.set_permissions(std::fs::Permissions::from_mode(TOKEN_FILE_MODE))
                .await?;
            file.write_all(token.expose_secret().as_bytes()).await?;
            file.flush().await
        };
        write.await.map_err(|source| AuthStorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    async fn remove_access_token(&self) -> Result<(), AuthStorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AuthStorageError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
