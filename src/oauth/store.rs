use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CratedigError;
use crate::oauth::token::TokenRecord;

/// Durable home for the one token record. A save replaces the record
/// whole — no caller ever observes a half-written record.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<TokenRecord, CratedigError>;
    async fn save(&self, record: TokenRecord) -> Result<(), CratedigError>;
    async fn clear(&self) -> Result<(), CratedigError>;
}

pub fn store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cratedig")
        .join("tokens.json")
}

/// Token record persisted as a JSON file, fronted by an in-memory copy so
/// reads never hit the disk and writes cannot be observed half-done.
pub struct FileTokenStore {
    path: PathBuf,
    record: RwLock<TokenRecord>,
}

impl FileTokenStore {
    /// Open a store at `path`. An unreadable or corrupt file is treated as
    /// an empty record, not an error.
    pub fn open(path: PathBuf) -> Self {
        let record = std::fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default();
        Self {
            path,
            record: RwLock::new(record),
        }
    }

    pub fn open_default() -> Self {
        Self::open(store_path())
    }

    fn persist(&self, record: &TokenRecord) -> Result<(), CratedigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(record)
            .map_err(|e| CratedigError::StoreError(format!("Failed to serialize record: {e}")))?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<TokenRecord, CratedigError> {
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, record: TokenRecord) -> Result<(), CratedigError> {
        let mut guard = self.record.write().await;
        // Disk first: if the write fails the in-memory record is unchanged
        // and the store stays in its previous stable state.
        self.persist(&record)?;
        *guard = record;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CratedigError> {
        self.save(TokenRecord::default()).await
    }
}

/// In-memory store for tests and embedders that want no disk state.
#[derive(Default)]
pub struct MemoryTokenStore {
    record: RwLock<TokenRecord>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<TokenRecord, CratedigError> {
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, record: TokenRecord) -> Result<(), CratedigError> {
        *self.record.write().await = record;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CratedigError> {
        *self.record.write().await = TokenRecord::default();
        Ok(())
    }
}
