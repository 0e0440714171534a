//! Bearer token persistence and the global unauthorized hook

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, ApiResult};

/// Fixed key the bearer token is stored under
pub const TOKEN_KEY: &str = "auth_token";

/// Where the single bearer token lives between requests
pub trait TokenStore: Send + Sync {
    /// Current token, if signed in
    fn load(&self) -> Option<String>;

    /// Replace the stored token
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TokenStorage`] if the token cannot be written.
    fn save(&self, token: &str) -> ApiResult<()>;

    /// Forget the token; a missing token is not an error
    fn clear(&self);
}

/// Called once for every `401` response, after the token is cleared
pub trait UnauthorizedHandler: Send + Sync {
    /// React to an expired or rejected session
    fn on_unauthorized(&self);
}

/// Handler that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogUnauthorized;

impl UnauthorizedHandler for LogUnauthorized {
    fn on_unauthorized(&self) {
        tracing::info!("Session rejected by backend");
    }
}

/// In-memory token store
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts signed in
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| ApiError::TokenStorage("token lock poisoned".to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

/// Token store backed by a file named [`TOKEN_KEY`] in a directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token under `dir`; the directory is created on first save
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    /// Full path of the token file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read token");
                None
            },
        }
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| ApiError::TokenStorage(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| ApiError::TokenStorage(e.to_string()))
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {},
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove token");
            },
        }
    }
}
