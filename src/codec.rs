use crate::entity::QuotaEntity;
use crate::error::CodecError;

/// [Codec] converts a [QuotaEntity] to the payload kept in the
/// [Store](crate::store::Store), and back.
pub trait Codec: Send + Sync {
    fn encode(&self, entity: &QuotaEntity) -> Result<String, CodecError>;

    /// Decoding must never accept a record that breaks
    /// `0 <= times_remaining <= total_limit`.
    fn decode(&self, payload: &str) -> Result<QuotaEntity, CodecError>;
}

/// [JsonCodec] stores the entity as a JSON object, e.g.
/// `{"total_limit":10,"times_remaining":3,"reset_timestamp":1700000000}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, entity: &QuotaEntity) -> Result<String, CodecError> {
        Ok(serde_json::to_string(entity)?)
    }

    fn decode(&self, payload: &str) -> Result<QuotaEntity, CodecError> {
        let entity: QuotaEntity = serde_json::from_str(payload)?;

        if !entity.is_consistent() {
            return Err(CodecError::Inconsistent {
                total_limit: entity.total_limit,
                times_remaining: entity.times_remaining,
            });
        }

        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() -> anyhow::Result<()> {
        let entity = QuotaEntity {
            total_limit: i64::MAX,
            times_remaining: 0,
            reset_timestamp: i64::MIN,
        };

        let payload = JsonCodec.encode(&entity)?;
        assert_eq!(JsonCodec.decode(&payload)?, entity);

        Ok(())
    }

    #[test]
    fn garbage() {
        assert!(matches!(JsonCodec.decode("not a record"), Err(CodecError::Json(_))));
        assert!(matches!(JsonCodec.decode(r#"{"total_limit":1}"#), Err(CodecError::Json(_))));
    }

    #[test]
    fn inconsistent() {
        let result = JsonCodec.decode(r#"{"total_limit":2,"times_remaining":3,"reset_timestamp":0}"#);
        assert!(matches!(result, Err(CodecError::Inconsistent { total_limit: 2, times_remaining: 3 })));

        let result = JsonCodec.decode(r#"{"total_limit":2,"times_remaining":-1,"reset_timestamp":0}"#);
        assert!(matches!(result, Err(CodecError::Inconsistent { .. })));
    }
}
