//! Error types for setup and for the sunrise/sunset payload.
//!
//! [`ConfigError`] is the only error a caller ever has to handle, and only at
//! construction time. [`SunTimesError`] is absorbed inside the crate by
//! falling back to fixed defaults.

/// Invalid configuration detected while building the simulation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and > 0 (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("view_elevation must be within [0, 1] (got {0})")]
    ElevationOutOfRange(f32),

    #[error("world object id must not be empty")]
    EmptyEntityId,

    #[error("duplicate world object id `{0}`")]
    DuplicateEntityId(String),

    #[error("world object `{0}` uses a description action but has no description text")]
    MissingDescription(String),

    #[error("notifications.max_visible must be at least 1")]
    ZeroVisibleNotifications,

    #[error("sunrise ({sunrise} min) must be before sunset ({sunset} min) within one day")]
    InvertedSunWindow { sunrise: f32, sunset: f32 },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to turn a sunrise/sunset payload into local minutes.
#[derive(Debug, thiserror::Error)]
pub enum SunTimesError {
    #[error("request failed: {0}")]
    Fetch(String),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("service returned status `{0}`")]
    Status(String),

    #[error("bad {field} timestamp: {source}")]
    Timestamp {
        field: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("sunset ({sunset} min) is not after sunrise ({sunrise} min)")]
    InvertedWindow { sunrise: f32, sunset: f32 },
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(ensure_positive("speed", 0.0).is_err());
        assert!(ensure_positive("speed", -1.0).is_err());
        assert!(ensure_positive("speed", f64::NAN).is_err());
        assert!(ensure_positive("speed", f64::INFINITY).is_err());
        assert!(ensure_positive("speed", 0.001).is_ok());
    }

    #[test]
    fn error_message_names_the_field() {
        let err = ensure_positive("rotation_speed", -2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "rotation_speed must be finite and > 0 (got -2)"
        );
    }
}
