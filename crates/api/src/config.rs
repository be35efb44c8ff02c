use std::time::Duration;

use refactorer_intelligence::mock::DEFAULT_LATENCY;
use refactorer_intelligence::OpenAiConfig;

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A variable required by the selected options is not set.
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Which code intelligence backend to wire in.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Deterministic stand-in with an artificial `refactor` latency.
    Mock { latency: Duration },
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiConfig),
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Mock { .. } => "mock",
            BackendConfig::OpenAi(_) => "openai",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Read once at startup; nothing re-reads the environment afterwards.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight background units (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Max concurrently running background units (default: `4`).
    pub lifecycle_workers: usize,
    pub log_format: LogFormat,
    pub backend: BackendConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                        |
    /// | `PORT`                  | `8000`                           |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`          |
    /// | `REQUEST_TIMEOUT_SECS`  | `150`                            |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                             |
    /// | `DATABASE_URL`          | unset (in-memory store)          |
    /// | `INTELLIGENCE_BACKEND`  | `openai` if a key is set, else `mock` |
    /// | `OPENAI_API_KEY`        | unset                            |
    /// | `OPENAI_BASE_URL`       | `https://api.openai.com/v1`      |
    /// | `OPENAI_MODEL`          | `gpt-4`                          |
    /// | `BACKEND_TIMEOUT_SECS`  | `120`, below the request timeout |
    /// | `MOCK_LATENCY_MS`       | `2000`                           |
    /// | `LIFECYCLE_WORKERS`     | `4`                              |
    /// | `LOG_FORMAT`            | `text`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&var, "PORT", 8000)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if let Err(e) = origin.parse::<axum::http::HeaderValue>() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let request_timeout_secs: u64 = parse_or(&var, "REQUEST_TIMEOUT_SECS", 150)?;
        let shutdown_timeout_secs: u64 = parse_or(&var, "SHUTDOWN_TIMEOUT_SECS", 30)?;

        let lifecycle_workers: usize = parse_or(&var, "LIFECYCLE_WORKERS", 4)?;
        if lifecycle_workers == 0 {
            return Err(ConfigError::Invalid {
                var: "LIFECYCLE_WORKERS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(f) if f == "text" => LogFormat::Text,
            Some(f) if f == "json" => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other,
                    reason: "expected 'text' or 'json'".into(),
                })
            }
        };

        let backend = Self::backend_from(&var, request_timeout_secs)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url: var("DATABASE_URL"),
            lifecycle_workers,
            log_format,
            backend,
        })
    }

    /// The backend timeout must be lower than the request timeout.
    fn backend_from<F>(var: &F, request_timeout_secs: u64) -> Result<BackendConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("OPENAI_API_KEY");
        let selected = var("INTELLIGENCE_BACKEND")
            .map(|b| b.to_ascii_lowercase())
            .unwrap_or_else(|| (if api_key.is_some() { "openai" } else { "mock" }).to_string());

        match selected.as_str() {
            "mock" => {
                let default_ms = DEFAULT_LATENCY.as_millis() as u64;
                let latency_ms: u64 = parse_or(var, "MOCK_LATENCY_MS", default_ms)?;
                Ok(BackendConfig::Mock {
                    latency: Duration::from_millis(latency_ms),
                })
            }
            "openai" => {
                let api_key = api_key.ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
                let timeout_secs: u64 = parse_or(var, "BACKEND_TIMEOUT_SECS", 120)?;
                if timeout_secs >= request_timeout_secs {
                    return Err(ConfigError::Invalid {
                        var: "BACKEND_TIMEOUT_SECS",
                        value: timeout_secs.to_string(),
                        reason: format!(
                            "must be lower than REQUEST_TIMEOUT_SECS ({request_timeout_secs})"
                        ),
                    });
                }
                Ok(BackendConfig::OpenAi(OpenAiConfig {
                    api_key,
                    base_url: var("OPENAI_BASE_URL")
                        .unwrap_or_else(|| "https://api.openai.com/v1".into()),
                    model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".into()),
                    timeout: Duration::from_secs(timeout_secs),
                }))
            }
            _ => Err(ConfigError::Invalid {
                var: "INTELLIGENCE_BACKEND",
                value: selected.clone(),
                reason: "expected 'openai' or 'mock'".into(),
            }),
        }
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.request_timeout_secs, 150);
        assert_eq!(config.shutdown_timeout_secs, 30);
        assert_eq!(config.lifecycle_workers, 4);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.database_url.is_none());
        assert_matches!(
            config.backend,
            BackendConfig::Mock { latency } if latency == Duration::from_secs(2)
        );
    }

    #[test]
    fn api_key_selects_openai_by_default() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_matches!(config.backend, BackendConfig::OpenAi(ref openai) => {
            assert_eq!(openai.api_key, "sk-test");
            assert_eq!(openai.base_url, "https://api.openai.com/v1");
            assert_eq!(openai.model, "gpt-4");
            assert_eq!(openai.timeout, Duration::from_secs(120));
        });
    }

    #[test]
    fn default_backend_timeout_is_below_request_timeout() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_matches!(config.backend, BackendConfig::OpenAi(ref openai) => {
            assert!(openai.timeout < Duration::from_secs(config.request_timeout_secs));
        });
    }

    #[test]
    fn backend_timeout_not_below_request_timeout_is_invalid() {
        assert_matches!(
            load(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("REQUEST_TIMEOUT_SECS", "30"),
            ]),
            Err(ConfigError::Invalid { var: "BACKEND_TIMEOUT_SECS", .. })
        );
        assert_matches!(
            load(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("REQUEST_TIMEOUT_SECS", "30"),
                ("BACKEND_TIMEOUT_SECS", "25"),
            ]),
            Ok(_)
        );
    }

    #[test]
    fn explicit_mock_wins_over_api_key() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("INTELLIGENCE_BACKEND", "mock"),
            ("MOCK_LATENCY_MS", "0"),
        ])
        .unwrap();

        assert_matches!(config.backend, BackendConfig::Mock { latency } if latency.is_zero());
    }

    #[test]
    fn openai_without_key_is_missing() {
        assert_matches!(
            load(&[("INTELLIGENCE_BACKEND", "openai")]),
            Err(ConfigError::Missing("OPENAI_API_KEY"))
        );
    }

    #[test]
    fn unknown_backend_is_invalid() {
        assert_matches!(
            load(&[("INTELLIGENCE_BACKEND", "llama")]),
            Err(ConfigError::Invalid { var: "INTELLIGENCE_BACKEND", .. })
        );
    }

    #[test]
    fn bad_port_is_invalid() {
        assert_matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }

    #[test]
    fn zero_workers_is_invalid() {
        assert_matches!(
            load(&[("LIFECYCLE_WORKERS", "0")]),
            Err(ConfigError::Invalid { var: "LIFECYCLE_WORKERS", .. })
        );
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[(
            "CORS_ORIGINS",
            "http://localhost:3000, https://app.example.com ,",
        )])
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn json_log_format_and_database_url() {
        let config = load(&[
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_URL", "postgres://localhost/refactorer"),
        ])
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/refactorer")
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("PORT", "  "), ("DATABASE_URL", "")]).unwrap();
        assert_eq!(config.port, 8000);
        assert!(config.database_url.is_none());
    }
}
