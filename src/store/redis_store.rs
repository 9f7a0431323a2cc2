use std::sync::Arc;
use std::time;
use redis::{AsyncCommands, RedisResult};
use redis::aio::MultiplexedConnection;
use crate::store::Store;

/// [RedisStore] stores data in redis.
#[derive(Clone)]
pub struct RedisStore {
    pub(crate) inner: Arc<RedisStoreInner>,
}

impl RedisStore {
    /// create from a [redis::Client]
    pub fn from_client<T: ToString>(client: redis::Client, prefix: T) -> Self {
        Self {
            inner: Arc::new(RedisStoreInner {
                client,
                prefix: prefix.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl Store for RedisStore {
    type Error = redis::RedisError;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let redis_key = self.inner.get_key(key);
        let mut conn = self.inner.conn().await?;

        conn.get(redis_key).await
    }

    async fn set(&self, key: &str, value: String, ttl: time::Duration) -> Result<(), Self::Error> {
        let redis_key = self.inner.get_key(key);
        let mut conn = self.inner.conn().await?;

        // SET {key} {value} PX {ttl in milliseconds}
        redis::cmd("SET")
            .arg(&redis_key)
            .arg(value)
            .arg("PX")
            .arg(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
            .query_async(&mut conn)
            .await
    }

    async fn del(&self, key: &str) -> Result<(), Self::Error> {
        let redis_key = self.inner.get_key(key);
        let mut conn = self.inner.conn().await?;

        conn.del(redis_key).await
    }
}

pub(crate) struct RedisStoreInner {
    /// the redis client
    pub client: redis::Client,
    /// the prefix which would prepend to redis-key
    pub prefix: String,
}

impl RedisStoreInner {
    pub fn get_key<T: AsRef<str>>(&self, key: T) -> String {
        format!("{}-{}", &self.prefix, key.as_ref())
    }

    pub async fn conn(&self) -> RedisResult<MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_key() -> anyhow::Result<()> {
        // opening a client does not connect.
        let client = redis::Client::open("redis://127.0.0.1:6379")?;
        let store = RedisStore::from_client(client, "restriction");

        assert_eq!(store.inner.get_key("127.0.0.1"), "restriction-127.0.0.1");

        Ok(())
    }
}
