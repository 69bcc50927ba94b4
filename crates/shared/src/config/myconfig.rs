use anyhow::{Context, Result, anyhow, ensure};
use std::net::SocketAddr;

/// Process configuration read from environment variables.
///
/// | Variable                      | Default          |
/// |-------------------------------|------------------|
/// | `DATABASE_URL`                | required         |
/// | `RUN_MIGRATIONS`              | `false`          |
/// | `GRPC_ADDR`                   | `0.0.0.0:50051`  |
/// | `METRICS_ADDR`                | `0.0.0.0:8080`   |
/// | `REDIS_URL`                   | cache disabled   |
/// | `CACHE_TTL_SECS`              | `300`            |
/// | `OTEL_EXPORTER_OTLP_ENDPOINT` | export disabled  |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub grpc_addr: SocketAddr,
    pub metrics_addr: SocketAddr,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub otel_endpoint: Option<String>,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url =
            non_empty("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let run_migrations = match non_empty("RUN_MIGRATIONS") {
            Some(value) => value
                .parse::<bool>()
                .with_context(|| format!("RUN_MIGRATIONS must be true or false, got `{value}`"))?,
            None => false,
        };

        let grpc_addr = non_empty("GRPC_ADDR")
            .unwrap_or_else(|| "0.0.0.0:50051".into())
            .parse::<SocketAddr>()
            .context("GRPC_ADDR must be a socket address")?;

        let metrics_addr = non_empty("METRICS_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".into())
            .parse::<SocketAddr>()
            .context("METRICS_ADDR must be a socket address")?;

        let cache_ttl_secs = non_empty("CACHE_TTL_SECS")
            .unwrap_or_else(|| "300".into())
            .parse::<u64>()
            .context("CACHE_TTL_SECS must be a number of seconds")?;
        ensure!(cache_ttl_secs > 0, "CACHE_TTL_SECS must be greater than zero");

        Ok(Self {
            database_url,
            run_migrations,
            grpc_addr,
            metrics_addr,
            redis_url: non_empty("REDIS_URL"),
            cache_ttl_secs,
            otel_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/comments")]).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/comments");
        assert!(!config.run_migrations);
        assert_eq!(config.grpc_addr, "0.0.0.0:50051".parse::<SocketAddr>().unwrap());
        assert_eq!(config.metrics_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.redis_url, None);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.otel_endpoint, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/comments"),
            ("RUN_MIGRATIONS", "true"),
            ("GRPC_ADDR", "127.0.0.1:6000"),
            ("METRICS_ADDR", "127.0.0.1:6001"),
            ("REDIS_URL", "redis://cache:6379/1"),
            ("CACHE_TTL_SECS", "30"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://otel:4317"),
        ])
        .unwrap();

        assert!(config.run_migrations);
        assert_eq!(config.grpc_addr, "127.0.0.1:6000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.metrics_addr, "127.0.0.1:6001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/1"));
        assert_eq!(config.cache_ttl_secs, 30);
        assert_eq!(config.otel_endpoint.as_deref(), Some("http://otel:4317"));
    }

    #[test]
    fn requires_database_url() {
        let err = config_from(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = config_from(&[("DATABASE_URL", "postgres://db"), ("CACHE_TTL_SECS", "soon")])
            .unwrap_err();
        assert!(err.to_string().contains("CACHE_TTL_SECS"));

        let err = config_from(&[("DATABASE_URL", "postgres://db"), ("RUN_MIGRATIONS", "yes")])
            .unwrap_err();
        assert!(err.to_string().contains("RUN_MIGRATIONS"));
    }

    #[test]
    fn rejects_zero_cache_ttl() {
        let err = config_from(&[("DATABASE_URL", "postgres://db"), ("CACHE_TTL_SECS", "0")])
            .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
