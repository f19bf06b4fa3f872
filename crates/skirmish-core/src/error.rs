//! Configuration errors.
//!
//! Every tunable in the simulation is validated when an entity or a
//! simulation is constructed. A bad value is reported as a [`ConfigError`]
//! and never clamped at runtime: once construction succeeds, a tick cannot
//! fail.
//!
//! Stale references (a disposed target or owner) are not errors. They are
//! resolved to "absent" every tick.

use thiserror::Error;

/// A configuration value rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Mass must be strictly positive; integration divides by it every tick.
    #[error("mass must be > 0, got {0}")]
    NonPositiveMass(f32),

    /// Maximum throttle must be strictly positive; the throttle fraction
    /// divides by it.
    #[error("max_throttle must be > 0, got {0}")]
    NonPositiveMaxThrottle(f32),

    /// A quantity that may be zero but never negative.
    #[error("{field} must be >= 0, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A quantity that must be strictly positive.
    #[error("{field} must be > 0, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// NaN or infinity in a field that feeds the integrator.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A current value above its configured maximum (e.g. fuel > max fuel).
    #[error("{field} ({value}) exceeds its maximum ({max})")]
    ExceedsMaximum {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// The configured maximum.
        max: f32,
    },

    /// An integer range with `low >= high`.
    #[error("{field} range is empty: [{low}, {high})")]
    EmptyRange {
        /// Name of the offending field.
        field: &'static str,
        /// Inclusive lower bound.
        low: i64,
        /// Exclusive upper bound.
        high: i64,
    },

    /// A count or lifetime that must be at least one.
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),

    /// Proximity distances that cannot describe a working fuze.
    #[error("fuze min distance ({min}) must not exceed miss distance ({miss})")]
    FuzeDistances {
        /// `proximity_min_distance`
        min: f32,
        /// `proximity_miss_target_distance`
        miss: f32,
    },

    /// A capability attached to an entity that lacks its prerequisite
    /// (e.g. a fuze without a drive to read fuel from).
    #[error("{capability} requires {requires}")]
    MissingCapability {
        /// The capability being attached.
        capability: &'static str,
        /// The capability it depends on.
        requires: &'static str,
    },
}

/// Result alias for fallible construction.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Rejects negative (and non-finite) values.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Rejects zero, negative and non-finite values.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<()> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_accepts_normal_values() {
        assert!(ensure_finite("x", 0.0).is_ok());
        assert!(ensure_finite("x", -3.5).is_ok());
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(matches!(
            ensure_finite("x", f32::NAN),
            Err(ConfigError::NonFinite { field: "x", .. })
        ));
        assert!(ensure_finite("x", f32::INFINITY).is_err());
    }

    #[test]
    fn non_negative_allows_zero() {
        assert!(ensure_non_negative("fuel", 0.0).is_ok());
        assert_eq!(
            ensure_non_negative("fuel", -1.0),
            Err(ConfigError::Negative {
                field: "fuel",
                value: -1.0
            })
        );
    }

    #[test]
    fn positive_rejects_zero() {
        assert_eq!(
            ensure_positive("dt", 0.0),
            Err(ConfigError::NonPositive {
                field: "dt",
                value: 0.0
            })
        );
    }

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::Negative {
            field: "max_fuel",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "max_fuel must be >= 0, got -2");
        assert_eq!(
            ConfigError::NonPositiveMass(0.0).to_string(),
            "mass must be > 0, got 0"
        );
    }
}
