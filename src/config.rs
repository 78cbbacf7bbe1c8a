//! Loader configuration.
//!
//! Values come from the process environment (after loading `.env` with
//! `dotenvy`) and fall back to the built-in defaults:
//!
//! | variable               | meaning                                   | default            |
//! |------------------------|-------------------------------------------|--------------------|
//! | `PULSE_BASE_URL`       | base URL the three JSON files live under  | Legalpioneer repo  |
//! | `PULSE_TIMEOUT_SECS`   | per-request timeout, `0` = transport default | `10`            |
//! | `PULSE_CACHE_TTL_SECS` | live-payload cache lifetime, `0` = off    | `0`                |
//! | `PULSE_QUARTERLY_SEED` | seed for the synthesized quarterly series | random             |

use std::time::Duration;

use crate::domain::Resource;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/Legalcomplex/Legalpioneer/main/data";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub base_url: String,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    /// `Duration::ZERO` disables caching and request coalescing.
    pub cache_ttl: Duration,
    /// Skip the network entirely and serve fallback data.
    pub offline: bool,
    /// Fixed seed for the synthesized quarterly series (random when `None`).
    pub quarterly_seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            cache_ttl: Duration::ZERO,
            offline: false,
            quarterly_seed: None,
        }
    }
}

impl LoaderConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PULSE_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(AppError::new(2, "PULSE_BASE_URL is set but empty."));
            }
            config.base_url = url.to_string();
        }

        if let Some(secs) = parse_u64(&lookup, "PULSE_TIMEOUT_SECS")? {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(secs) = parse_u64(&lookup, "PULSE_CACHE_TTL_SECS")? {
            config.cache_ttl = Duration::from_secs(secs);
        }

        config.quarterly_seed = parse_u64(&lookup, "PULSE_QUARTERLY_SEED")?;

        Ok(config)
    }

    /// Full URL of a resource.
    pub fn url_for(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.file_name())
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| AppError::new(2, format!("Invalid {key} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_the_public_dataset() {
        let config = LoaderConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(
            config.url_for(Resource::Companies),
            "https://raw.githubusercontent.com/Legalcomplex/Legalpioneer/main/data/legaltech_companies.json"
        );
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = LoaderConfig::from_lookup(lookup_from(&[
            ("PULSE_BASE_URL", "http://127.0.0.1:9000/data/"),
            ("PULSE_TIMEOUT_SECS", "0"),
            ("PULSE_CACHE_TTL_SECS", "30"),
            ("PULSE_QUARTERLY_SEED", "7"),
        ]))
        .unwrap();

        assert_eq!(config.url_for(Resource::Quarterly), "http://127.0.0.1:9000/data/quarterly_metrics.json");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.quarterly_seed, Some(7));
    }

    #[test]
    fn invalid_numbers_are_configuration_errors() {
        let err = LoaderConfig::from_lookup(lookup_from(&[("PULSE_CACHE_TTL_SECS", "soon")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("PULSE_CACHE_TTL_SECS"));
    }
}
