use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StateStorage;
use crate::error::AppResult;

/// Process-local storage. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with a raw blob, bypassing serialization.
    pub async fn insert_raw(&self, key: &str, blob: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, blob: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
