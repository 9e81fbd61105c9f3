//! Sunrise/sunset window used by the sky model.
//!
//! The times come from a one-off network fetch done by the host. Until it
//! resolves, and whenever it fails, the fixed [`SunTimes::FALLBACK`] window is
//! used so the sky is always computable.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SunTimesError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunTimes {
    /// Minutes since local midnight.
    pub sunrise_minutes: f32,
    pub sunset_minutes: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SunTimesStatus {
    /// Fetch still in flight; the fallback window is in use.
    Pending,
    Fetched,
    /// Fetch failed; the fallback window is in use for the rest of the session.
    Fallback,
}

#[derive(Deserialize)]
struct SunriseSunsetResponse {
    results: SunriseSunsetResults,
    status: String,
}

#[derive(Deserialize)]
struct SunriseSunsetResults {
    sunrise: String,
    sunset: String,
}

impl Default for SunTimes {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl SunTimes {
    /// 06:00 / 18:30 local.
    pub const FALLBACK: SunTimes = SunTimes {
        sunrise_minutes: 360.0,
        sunset_minutes: 1110.0,
    };

    pub fn new(sunrise_minutes: f32, sunset_minutes: f32) -> Result<Self, SunTimesError> {
        if !(sunrise_minutes.is_finite() && sunset_minutes.is_finite())
            || sunset_minutes <= sunrise_minutes
        {
            return Err(SunTimesError::InvertedWindow {
                sunrise: sunrise_minutes,
                sunset: sunset_minutes,
            });
        }
        Ok(Self {
            sunrise_minutes,
            sunset_minutes,
        })
    }

    /// Parse two RFC 3339 timestamps and express them in the given local offset.
    pub fn from_iso(
        sunrise: &str,
        sunset: &str,
        local: &FixedOffset,
    ) -> Result<Self, SunTimesError> {
        let rise = DateTime::parse_from_rfc3339(sunrise).map_err(|source| {
            SunTimesError::Timestamp {
                field: "sunrise",
                source,
            }
        })?;
        let set = DateTime::parse_from_rfc3339(sunset).map_err(|source| {
            SunTimesError::Timestamp {
                field: "sunset",
                source,
            }
        })?;
        Self::new(
            minutes_of_day(&rise.with_timezone(local)),
            minutes_of_day(&set.with_timezone(local)),
        )
    }

    /// Parse a `{"results":{"sunrise":..,"sunset":..},"status":"OK"}` body.
    pub fn parse_response(body: &str, local: &FixedOffset) -> Result<Self, SunTimesError> {
        let response: SunriseSunsetResponse = serde_json::from_str(body)?;
        if response.status != "OK" {
            return Err(SunTimesError::Status(response.status));
        }
        Self::from_iso(&response.results.sunrise, &response.results.sunset, local)
    }

    /// Resolve a finished fetch. Every failure collapses to `fallback`.
    pub fn from_fetch(
        outcome: Result<String, SunTimesError>,
        local: &FixedOffset,
        fallback: SunTimes,
    ) -> (SunTimes, SunTimesStatus) {
        match outcome.and_then(|body| Self::parse_response(&body, local)) {
            Ok(times) => {
                info!(
                    sunrise = times.sunrise_minutes,
                    sunset = times.sunset_minutes,
                    "sun times fetched"
                );
                (times, SunTimesStatus::Fetched)
            }
            Err(err) => {
                warn!("sun times unavailable, using fallback: {err}");
                (fallback, SunTimesStatus::Fallback)
            }
        }
    }
}

pub fn minutes_of_day<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> f32 {
    dt.hour() as f32 * 60.0 + dt.minute() as f32 + dt.second() as f32 / 60.0
}

/// Query string for a sunrise-sunset.org style endpoint.
pub fn request_query(latitude: f64, longitude: f64) -> [(&'static str, String); 3] {
    [
        ("lat", latitude.to_string()),
        ("lng", longitude.to_string()),
        ("formatted", "0".to_string()),
    ]
}
