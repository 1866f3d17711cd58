use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub tmdb_access_token: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub tmdb_rps: u32,
    pub tmdb_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let database_url = var("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://movies-collection.db?mode=rwc".to_string());

        // API_READ_ACCESS_TOKEN is the name older deployments used.
        let tmdb_access_token = var("TMDB_ACCESS_TOKEN")
            .or_else(|| var("API_READ_ACCESS_TOKEN"))
            .filter(|token| !token.trim().is_empty())
            .context("TMDB_ACCESS_TOKEN must be set to a TMDB API read access token")?;

        let tmdb_base_url =
            var("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base_url = var("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let tmdb_rps: u32 = match var("TMDB_RPS") {
            Some(s) => s.parse().context("TMDB_RPS")?,
            None => 4,
        };

        let tmdb_timeout_secs: u64 = match var("TMDB_TIMEOUT_SECS") {
            Some(s) => s.parse().context("TMDB_TIMEOUT_SECS")?,
            None => 10,
        };
        anyhow::ensure!(tmdb_timeout_secs > 0, "TMDB_TIMEOUT_SECS must be at least 1");

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            tmdb_access_token,
            tmdb_base_url,
            tmdb_image_base_url,
            tmdb_rps,
            tmdb_timeout: Duration::from_secs(tmdb_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = config_from(&[("TMDB_ACCESS_TOKEN", "secret")]).unwrap();

        assert_eq!(config.addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.database_url, "sqlite://movies-collection.db?mode=rwc");
        assert_eq!(config.tmdb_access_token, "secret");
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.tmdb_rps, 4);
        assert_eq!(config.tmdb_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("TMDB_ACCESS_TOKEN", "   ")]).is_err());
    }

    #[test]
    fn legacy_token_variable_is_accepted() {
        let config = config_from(&[("API_READ_ACCESS_TOKEN", "legacy")]).unwrap();
        assert_eq!(config.tmdb_access_token, "legacy");
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("TMDB_ACCESS_TOKEN", "secret"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TMDB_RPS", "10"),
            ("TMDB_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.tmdb_rps, 10);
        assert_eq!(config.tmdb_timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = config_from(&[("TMDB_ACCESS_TOKEN", "secret"), ("TMDB_TIMEOUT_SECS", "0")])
            .unwrap_err();
        assert!(err.to_string().contains("TMDB_TIMEOUT_SECS"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(config_from(&[("TMDB_ACCESS_TOKEN", "secret"), ("PORT", "http")]).is_err());
    }
}
