use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use super::StateStorage;
use crate::error::AppResult;

#[derive(Clone)]
pub struct RedisStorage {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisStorage {
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            namespace: "stickers".to_string(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl StateStorage for RedisStorage {
    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn write(&self, key: &str, blob: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(self.key(key), blob).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
