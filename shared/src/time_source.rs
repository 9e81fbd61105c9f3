use chrono::{Local, NaiveTime, Timelike};

use crate::sun_times::minutes_of_day;

/// Wall clock with an optional fixed time-of-day override for debugging the sky.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSource {
    override_minutes: Option<f32>,
}

impl TimeSource {
    pub fn live() -> Self {
        Self::default()
    }

    pub fn fixed(minutes: f32) -> Self {
        Self {
            override_minutes: Some(minutes.rem_euclid(1440.0)),
        }
    }

    /// `"HH:MM"` or `"HH:MM:SS"`; anything else is ignored and the live clock is used.
    pub fn from_override(value: Option<&str>) -> Self {
        match value.and_then(parse_clock) {
            Some(minutes) => Self::fixed(minutes),
            None => Self::live(),
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.override_minutes.is_some()
    }

    pub fn minutes_of_day(&self) -> f32 {
        self.override_minutes
            .unwrap_or_else(|| minutes_of_day(&Local::now()))
    }

    pub fn clock_label(&self) -> String {
        match self.override_minutes {
            Some(m) => {
                let total = m as u32;
                format!("{:02}:{:02} (debug)", total / 60, total % 60)
            }
            None => Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        }
    }
}

fn parse_clock(value: &str) -> Option<f32> {
    let value = value.trim();
    let time = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()?;
    Some(time.hour() as f32 * 60.0 + time.minute() as f32 + time.second() as f32 / 60.0)
}
