mod mem_store;
#[allow(unused_imports)]
pub use mem_store::*;

#[cfg(feature = "redis-store")]
pub mod redis_store;

use std::fmt::{Debug, Display};
use std::time;

/// [Store] indicates where quota records live,
/// such as in memory ([MemStore]) in the form of a HashMap
/// or in Redis in the form of key-value pairs.
///
/// All methods are implemented in an async manner.
/// The store is shared by every request, so no method
/// may assume exclusive access to a key.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// [Error] represents a failure to talk to the store.
    /// "Key not found" is not an error, see [Store::get].
    type Error: Debug + Display + Send;

    /// The [get] function returns the payload stored at `key`,
    /// or `None` if the key does not exist (or has expired).
    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// The [set] function stores `value` at `key`, replacing any
    /// previous value. The key expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: time::Duration) -> Result<(), Self::Error>;

    /// The [del] function deletes `key`.
    /// Deleting a missing key is not an error.
    async fn del(&self, key: &str) -> Result<(), Self::Error>;
}
