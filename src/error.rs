use thiserror::Error as ThisError;

/// [Error] is returned by [RateGate::validate](crate::gate::RateGate::validate).
/// No verdict is available when it happens.
#[derive(Debug, ThisError)]
pub enum Error<E> {
    /// The store is unreachable or failed on get/set/del.
    #[error("store communication error: {0}")]
    Store(E),

    /// The stored payload cannot be read back into a quota record.
    #[error("failed to decode the record: {0}")]
    Decode(#[source] CodecError),

    #[error("failed to encode the record: {0}")]
    Encode(#[source] CodecError),
}

/// [CodecError] is raised by a [Codec](crate::codec::Codec).
#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent record: {times_remaining} remaining of {total_limit}")]
    Inconsistent {
        total_limit: i64,
        times_remaining: i64,
    },
}

/// [ConfigError] rejects a [RestrictionConfig](crate::config::RestrictionConfig)
/// before any request is processed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("restriction count must be positive, got {0}")]
    NonPositiveCount(i64),

    #[error("restriction time must be at least one second")]
    NonPositiveTime,

    #[error("restriction time of {0}s is too long")]
    TooLongTime(u64),
}
