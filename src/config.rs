use anyhow::{Context, Result};
use espn_fantasy_api::Endpoints;

const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    /// Fallback cookies for requests that don't pass their own.
    pub espn_s2: Option<String>,
    pub swid: Option<String>,
    pub bind: String,
    pub endpoints: Endpoints,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = Endpoints::default();
        Ok(Self {
            api_key: var("API_KEY").context("API_KEY must be set")?,
            espn_s2: var("ESPN_S2"),
            swid: var("SWID"),
            bind: var("LEAGUE_API_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            endpoints: Endpoints {
                fantasy: var("ESPN_FANTASY_URL").unwrap_or(defaults.fantasy),
                news: var("ESPN_NEWS_URL").unwrap_or(defaults.news),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn api_key_is_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("API_KEY", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[("API_KEY", "secret"), ("SWID", "")]).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.endpoints, Endpoints::default());
        assert!(config.espn_s2.is_none());
        assert!(config.swid.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("API_KEY", "secret"),
            ("ESPN_S2", "s2"),
            ("SWID", "{ABC}"),
            ("LEAGUE_API_BIND", "0.0.0.0:9000"),
            ("ESPN_FANTASY_URL", "http://localhost:1234"),
        ])
        .unwrap();
        assert_eq!(config.espn_s2.as_deref(), Some("s2"));
        assert_eq!(config.swid.as_deref(), Some("{ABC}"));
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.endpoints.fantasy, "http://localhost:1234");
        assert_eq!(config.endpoints.news, Endpoints::default().news);
    }
}
