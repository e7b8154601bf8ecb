use async_trait::async_trait;

use crate::error::AppResult;

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use self::redis::RedisStorage;

/// Persistence for opaque state blobs stored under a fixed key.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Returns `None` when nothing has been stored under `key` yet.
    async fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrites whatever was stored under `key`.
    async fn write(&self, key: &str, blob: &str) -> AppResult<()>;

    fn name(&self) -> &'static str;
}
