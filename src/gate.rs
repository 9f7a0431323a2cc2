use chrono::{DateTime, Utc};
use crate::codec::{Codec, JsonCodec};
use crate::config::RestrictionConfig;
use crate::entity::QuotaEntity;
use crate::error::Error;
use crate::store::Store;

/// [Verdict] is the outcome of [RateGate::validate].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Verdict {
    /// whether the request may proceed.
    pub admitted: bool,
    /// the quota record after this decision.
    pub entity: QuotaEntity,
}

impl Verdict {
    fn admit(entity: QuotaEntity) -> Self {
        Self { admitted: true, entity }
    }

    fn reject(entity: QuotaEntity) -> Self {
        Self { admitted: false, entity }
    }
}

/// [RateGate] decides whether a caller may make another request
/// within its current fixed window.
///
/// The gate keeps no state of its own: every call re-reads the
/// record from the [Store], so any number of gates (or processes)
/// can share one store.
///
/// ## Concurrency
/// The sequence get, decide, set is not atomic. Two concurrent calls
/// for the same key may both read `times_remaining = 1` and both be
/// admitted, so a key can exceed its quota under contention.
pub struct RateGate<T: Store, C: Codec = JsonCodec> {
    store: T,
    codec: C,
    config: RestrictionConfig,
}

impl<T: Store> RateGate<T> {
    /// create a new [RateGate] storing records as JSON.
    pub fn new(config: RestrictionConfig, store: T) -> Self {
        Self::with_codec(config, store, JsonCodec)
    }
}

impl<T: Store, C: Codec> RateGate<T, C> {
    /// create a new [RateGate] with a custom [Codec].
    pub fn with_codec(config: RestrictionConfig, store: T, codec: C) -> Self {
        Self { store, codec, config }
    }

    pub fn config(&self) -> &RestrictionConfig {
        &self.config
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Decide whether `key` may make another request now.
    pub async fn validate(&self, key: &str) -> Result<Verdict, Error<T::Error>> {
        self.validate_at(key, Utc::now()).await
    }

    /// Decide whether `key` may make another request at `now`.
    ///
    /// - no record: a new window is created and the request is admitted
    ///   with the full quota remaining.
    /// - expired record (`reset_timestamp <= now`): the key is replaced
    ///   by a new window, as above.
    /// - live record with nothing remaining: rejected, record untouched.
    /// - live record otherwise: `times_remaining` is decremented and admitted.
    ///
    /// Any store or codec failure ends the call with that error.
    pub async fn validate_at(&self, key: &str, now: DateTime<Utc>) -> Result<Verdict, Error<T::Error>> {
        let result = self.decide(key, now).await;

        if self.config.log {
            match &result {
                Ok(verdict) if verdict.admitted => tracing::debug!(
                    key,
                    remaining = verdict.entity.times_remaining,
                    reset = verdict.entity.reset_timestamp,
                    "request admitted"
                ),
                Ok(verdict) => tracing::info!(
                    key,
                    limit = verdict.entity.total_limit,
                    reset = verdict.entity.reset_timestamp,
                    "request rejected, quota exhausted"
                ),
                Err(e) => tracing::warn!(key, error = %e, "restriction check failed"),
            }
        }

        result
    }

    async fn decide(&self, key: &str, now: DateTime<Utc>) -> Result<Verdict, Error<T::Error>> {
        let payload = match self.store.get(key).await.map_err(Error::Store)? {
            None => return self.create_record(key, now).await.map(Verdict::admit),
            Some(payload) => payload,
        };

        let mut record = self.codec.decode(&payload).map_err(Error::Decode)?;

        if record.is_expired_at(now) {
            // delete key and create new if already expired
            self.store.del(key).await.map_err(Error::Store)?;
            if self.config.log {
                tracing::debug!(key, reset = record.reset_timestamp, "window expired");
            }
            return self.create_record(key, now).await.map(Verdict::admit);
        }

        if record.is_exhausted() {
            return Ok(Verdict::reject(record));
        }

        record.times_remaining -= 1;
        self.set_record(key, &record).await?;

        Ok(Verdict::admit(record))
    }

    async fn create_record(&self, key: &str, now: DateTime<Utc>) -> Result<QuotaEntity, Error<T::Error>> {
        let record = QuotaEntity::new(
            self.config.restriction_count,
            now,
            self.config.restriction_time,
        );

        self.set_record(key, &record).await?;

        Ok(record)
    }

    async fn set_record(&self, key: &str, record: &QuotaEntity) -> Result<(), Error<T::Error>> {
        let payload = self.codec.encode(record).map_err(Error::Encode)?;

        self.store
            .set(key, payload, self.config.restriction_time)
            .await
            .map_err(Error::Store)
    }
}
