//! Persistent cart slot.
//!
//! The whole cart is stored as one JSON array under a fixed key and is
//! always read and written in full.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use super::Cart;

/// Storage key the cart is kept under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors reading or writing the persisted cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage backend could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored blob is not a valid cart.
    #[error("corrupt cart data: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backend refused the write.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save access to the single persisted cart.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Read the stored cart. An absent slot is an empty cart.
    async fn load(&self) -> Result<Cart, PersistenceError>;

    /// Replace the stored cart.
    async fn save(&self, cart: &Cart) -> Result<(), PersistenceError>;
}

/// Decode a stored blob. Blank or `null` blobs decode to an empty cart.
fn decode(raw: &str) -> Result<Cart, PersistenceError> {
    if raw.trim().is_empty() {
        return Ok(Cart::default());
    }
    Ok(serde_json::from_str::<Option<Cart>>(raw)?.unwrap_or_default())
}

// =============================================================================
// File-backed repository
// =============================================================================

/// Stores the cart as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written cart.
#[derive(Debug, Clone)]
pub struct FileCartRepository {
    path: PathBuf,
}

impl FileCartRepository {
    /// Create a repository under `dir` using [`CART_STORAGE_KEY`].
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, CART_STORAGE_KEY)
    }

    /// Create a repository under `dir` with a custom key.
    #[must_use]
    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Path of the stored blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CartRepository for FileCartRepository {
    async fn load(&self) -> Result<Cart, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Cart::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let blob = serde_json::to_vec(cart)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

// =============================================================================
// In-memory repository
// =============================================================================

/// Keeps the serialized cart in memory.
///
/// Stores the raw blob rather than a `Cart` so tests can seed corrupt data
/// and inspect exactly what would have been persisted.
#[derive(Debug, Default)]
pub struct MemoryCartRepository {
    blob: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryCartRepository {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `raw`.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// The raw stored blob, if any.
    pub async fn raw(&self) -> Option<String> {
        self.blob.lock().await.clone()
    }

    /// Make subsequent saves fail, as a full or disabled store would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn load(&self) -> Result<Cart, PersistenceError> {
        self.blob
            .lock()
            .await
            .as_deref()
            .map_or_else(|| Ok(Cart::default()), decode)
    }

    async fn save(&self, cart: &Cart) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("quota exceeded".to_string()));
        }
        let blob = serde_json::to_string(cart)?;
        *self.blob.lock().await = Some(blob);
        Ok(())
    }
}
