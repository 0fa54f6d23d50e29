use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::WarmupConfig;

/// Minimum accepted growth factor. The generator only needs `> 1.0` to
/// terminate; the product contract rejects anything below 1.1.
pub const MIN_GROWTH_FACTOR: f64 = 1.1;

/// User-correctable configuration errors reported before planning begins.
///
/// Each variant maps to exactly one request field so the caller can highlight
/// the offending input and resubmit without re-entering the rest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("initial batch size must be greater than zero")]
    InvalidBatchSize,
    #[error("growth factor must be at least {MIN_GROWTH_FACTOR}")]
    InvalidGrowthFactor,
    #[error("increment interval must be greater than zero hours")]
    InvalidInterval,
    #[error("maximum batch size must be greater than the initial batch size")]
    InvalidMaxBatch,
    #[error("warmup start date must be in the future")]
    StartTimeNotFuture,
}

impl ValidationError {
    /// Stable machine-readable code used in problem responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBatchSize => "invalid_batch_size",
            Self::InvalidGrowthFactor => "invalid_growth_factor",
            Self::InvalidInterval => "invalid_interval",
            Self::InvalidMaxBatch => "invalid_max_batch",
            Self::StartTimeNotFuture => "start_time_not_future",
        }
    }

    /// Request field the error is attributed to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidBatchSize => "initialBatchSize",
            Self::InvalidGrowthFactor => "incrementFactor",
            Self::InvalidInterval => "incrementInterval",
            Self::InvalidMaxBatch => "maxBatchSize",
            Self::StartTimeNotFuture => "warmupStartDate",
        }
    }
}

/// Gate applied to every warmup configuration before plan generation.
pub struct ScheduleValidator;

impl ScheduleValidator {
    /// Validates a configuration against the provided clock reading.
    ///
    /// Checks run in a fixed order and stop at the first failure. No side
    /// effects; deterministic for a given `now`.
    pub fn validate(config: &WarmupConfig, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if config.initial_batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        // Written with a negated comparison so NaN is rejected as well.
        if !(config.increment_factor >= MIN_GROWTH_FACTOR) {
            return Err(ValidationError::InvalidGrowthFactor);
        }
        if !(config.increment_interval_hours > 0.0) {
            return Err(ValidationError::InvalidInterval);
        }
        if config.max_batch_size <= config.initial_batch_size {
            return Err(ValidationError::InvalidMaxBatch);
        }
        if config.start_at <= now {
            return Err(ValidationError::StartTimeNotFuture);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T08:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn valid_config() -> WarmupConfig {
        WarmupConfig {
            initial_batch_size: 50,
            increment_factor: 2.0,
            increment_interval_hours: 24.0,
            max_batch_size: 10_000,
            start_at: now() + chrono::Duration::days(7),
        }
    }

    #[test]
    fn accepts_a_valid_config() {
        assert_eq!(ScheduleValidator::validate(&valid_config(), now()), Ok(()));
    }

    #[test]
    fn rejects_zero_initial_batch() {
        let config = WarmupConfig {
            initial_batch_size: 0,
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::InvalidBatchSize)
        );
    }

    #[test]
    fn rejects_growth_factor_below_the_floor() {
        let config = WarmupConfig {
            increment_factor: 1.05,
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::InvalidGrowthFactor)
        );
    }

    #[test]
    fn accepts_the_minimum_growth_factor_exactly() {
        let config = WarmupConfig {
            increment_factor: MIN_GROWTH_FACTOR,
            ..valid_config()
        };
        assert_eq!(ScheduleValidator::validate(&config, now()), Ok(()));
    }

    #[test]
    fn rejects_nan_growth_factor() {
        let config = WarmupConfig {
            increment_factor: f64::NAN,
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::InvalidGrowthFactor)
        );
    }

    #[test]
    fn rejects_non_positive_interval() {
        let config = WarmupConfig {
            increment_interval_hours: 0.0,
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::InvalidInterval)
        );
    }

    #[test]
    fn rejects_ceiling_equal_to_initial_batch() {
        // A 100-contact ceiling on a 100-contact initial batch leaves no room
        // to grow, even with an otherwise acceptable growth factor.
        let config = WarmupConfig {
            initial_batch_size: 100,
            increment_factor: MIN_GROWTH_FACTOR,
            increment_interval_hours: 12.0,
            max_batch_size: 100,
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::InvalidMaxBatch)
        );
    }

    #[test]
    fn rejects_start_time_not_in_the_future() {
        let config = WarmupConfig {
            start_at: now(),
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::StartTimeNotFuture)
        );
    }

    #[test]
    fn reports_the_first_failure_when_several_apply() {
        // Both the batch size and the start time are invalid; the batch size
        // check runs first.
        let config = WarmupConfig {
            initial_batch_size: 0,
            start_at: now() - chrono::Duration::days(1),
            ..valid_config()
        };
        assert_eq!(
            ScheduleValidator::validate(&config, now()),
            Err(ValidationError::InvalidBatchSize)
        );
    }

    #[test]
    fn errors_carry_field_attribution() {
        assert_eq!(ValidationError::InvalidMaxBatch.field(), "maxBatchSize");
        assert_eq!(ValidationError::InvalidMaxBatch.code(), "invalid_max_batch");
        assert_eq!(
            ValidationError::InvalidMaxBatch.to_string(),
            "maximum batch size must be greater than the initial batch size"
        );
        assert_eq!(ValidationError::StartTimeNotFuture.field(), "warmupStartDate");
    }
}
