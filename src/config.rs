use std::time;
use serde::Deserialize;
use crate::error::ConfigError;

/// Longest accepted window: 100 years.
pub const MAX_RESTRICTION_TIME: time::Duration = time::Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// [RestrictionConfig] is fixed once a [RateGate](crate::gate::RateGate) is built.
///
/// It can be deserialized from
/// `{ "restriction_count": 100, "restriction_time_secs": 60, "log": true }`,
/// which runs the same checks as [RestrictionConfig::new].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(try_from = "RawRestrictionConfig")]
pub struct RestrictionConfig {
    /// quota per window.
    pub(crate) restriction_count: i64,
    /// window length, whole seconds.
    pub(crate) restriction_time: time::Duration,
    /// emit a `tracing` event for every decision.
    pub(crate) log: bool,
}

impl RestrictionConfig {
    /// Create a config allowing `count` requests per `time`.
    ///
    /// Sub-second parts of `time` are dropped, since reset times are epoch seconds.
    pub fn new(count: i64, time: time::Duration) -> Result<Self, ConfigError> {
        if count <= 0 {
            return Err(ConfigError::NonPositiveCount(count));
        }

        if time.as_secs() == 0 {
            return Err(ConfigError::NonPositiveTime);
        }

        if time > MAX_RESTRICTION_TIME {
            return Err(ConfigError::TooLongTime(time.as_secs()));
        }

        Ok(Self {
            restriction_count: count,
            restriction_time: time::Duration::from_secs(time.as_secs()),
            log: false,
        })
    }

    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    pub fn restriction_count(&self) -> i64 {
        self.restriction_count
    }

    pub fn restriction_time(&self) -> time::Duration {
        self.restriction_time
    }

    pub fn log(&self) -> bool {
        self.log
    }
}

#[derive(Deserialize)]
struct RawRestrictionConfig {
    restriction_count: i64,
    restriction_time_secs: u64,
    #[serde(default)]
    log: bool,
}

impl TryFrom<RawRestrictionConfig> for RestrictionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawRestrictionConfig) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.restriction_count, time::Duration::from_secs(raw.restriction_time_secs))?
            .with_log(raw.log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert_eq!(
            RestrictionConfig::new(0, time::Duration::from_secs(60)),
            Err(ConfigError::NonPositiveCount(0)),
        );
        assert_eq!(
            RestrictionConfig::new(-3, time::Duration::from_secs(60)),
            Err(ConfigError::NonPositiveCount(-3)),
        );
        assert_eq!(
            RestrictionConfig::new(10, time::Duration::from_millis(999)),
            Err(ConfigError::NonPositiveTime),
        );

        assert_eq!(
            RestrictionConfig::new(10, time::Duration::from_secs(u64::MAX)),
            Err(ConfigError::TooLongTime(u64::MAX)),
        );
        assert_eq!(
            RestrictionConfig::new(10, MAX_RESTRICTION_TIME + time::Duration::from_secs(1)),
            Err(ConfigError::TooLongTime(MAX_RESTRICTION_TIME.as_secs() + 1)),
        );
        assert!(RestrictionConfig::new(10, MAX_RESTRICTION_TIME).is_ok());

        let config = RestrictionConfig::new(10, time::Duration::from_millis(1500)).unwrap();
        assert_eq!(config.restriction_count(), 10);
        assert_eq!(config.restriction_time(), time::Duration::from_secs(1));
        assert!(!config.log());
        assert!(config.with_log(true).log());
    }

    #[test]
    fn deserialize() -> anyhow::Result<()> {
        let config: RestrictionConfig = serde_json::from_str(
            r#"{"restriction_count": 100, "restriction_time_secs": 60, "log": true}"#,
        )?;
        assert_eq!(config, RestrictionConfig::new(100, time::Duration::from_secs(60))?.with_log(true));

        let config: RestrictionConfig = serde_json::from_str(
            r#"{"restriction_count": 1, "restriction_time_secs": 1}"#,
        )?;
        assert!(!config.log());

        let invalid = serde_json::from_str::<RestrictionConfig>(
            r#"{"restriction_count": 0, "restriction_time_secs": 60}"#,
        );
        assert!(invalid.is_err());

        Ok(())
    }
}
