use std::path::PathBuf;

use homeworld_shared::sun_times::request_query;
use homeworld_shared::time_source::TimeSource;
use homeworld_shared::{ConfigError, WorldConfig};
use url::Url;

const DEFAULT_SUN_URL: &str = "https://api.sunrise-sunset.org/json";
const DEFAULT_SAVE_PATH: &str = "homeworld-save.json";

/// Launch options read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchSettings {
    pub config_path: Option<PathBuf>,
    pub debug_time: Option<String>,
    pub save_path: PathBuf,
    pub sun_url: String,
}

impl LaunchSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            config_path: non_empty("HOMEWORLD_CONFIG").map(PathBuf::from),
            debug_time: non_empty("HOMEWORLD_DEBUG_TIME"),
            save_path: non_empty("HOMEWORLD_SAVE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH)),
            sun_url: non_empty("HOMEWORLD_SUN_URL").unwrap_or_else(|| DEFAULT_SUN_URL.to_string()),
        }
    }

    pub fn load_config(&self) -> Result<WorldConfig, ConfigError> {
        match &self.config_path {
            Some(path) => WorldConfig::load_from_path(path),
            None => {
                let config = WorldConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn time_source(&self) -> TimeSource {
        TimeSource::from_override(self.debug_time.as_deref())
    }

    /// Sun endpoint with the location query attached. `None` if the URL is malformed.
    pub fn sun_request_url(&self, latitude: f64, longitude: f64) -> Option<Url> {
        let mut url = Url::parse(&self.sun_url).ok()?;
        url.query_pairs_mut()
            .extend_pairs(request_query(latitude, longitude));
        Some(url)
    }
}
