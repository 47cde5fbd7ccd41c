use serde::Deserialize;

use crate::services::reconciler::AvailabilityPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key; the metadata source is disabled when absent
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB for titles and overviews
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Streaming Availability API key; the secondary source is disabled when absent
    #[serde(default)]
    pub streaming_api_key: Option<String>,

    /// Streaming Availability API base URL
    #[serde(default = "default_streaming_api_url")]
    pub streaming_api_url: String,

    /// Two-letter country code used for watch-provider lookups
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// Whether provider offers are gated by the curated availability list
    #[serde(default)]
    pub reconcile_policy: AvailabilityPolicy,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "ko-KR".to_string()
}

fn default_streaming_api_url() -> String {
    "https://streaming-availability.p.rapidapi.com".to_string()
}

fn default_watch_region() -> String {
    "KR".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        // Blank keys in .env files count as missing
        config.tmdb_api_key = config.tmdb_api_key.filter(|k| !k.trim().is_empty());
        config.streaming_api_key = config.streaming_api_key.filter(|k| !k.trim().is_empty());
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_keys() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert!(config.tmdb_api_key.is_none());
        assert!(config.streaming_api_key.is_none());
        assert_eq!(config.tmdb_language, "ko-KR");
        assert_eq!(config.watch_region, "KR");
        assert_eq!(config.reconcile_policy, AvailabilityPolicy::Curated);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_from_env() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "abc"),
            ("STREAMING_API_KEY", "  "),
            ("RECONCILE_POLICY", "upstream"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.tmdb_api_key.as_deref(), Some("abc"));
        assert!(config.streaming_api_key.is_none());
        assert_eq!(config.reconcile_policy, AvailabilityPolicy::Upstream);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
