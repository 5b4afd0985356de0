use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
const DEFAULT_BUCKET: &str = "resumes";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required configuration values: {}. Set them in the environment or a .env file.", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Throttling and retry knobs for upstream model calls.
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub max_concurrency: usize,
    pub max_retries: u32,
    pub retry_base: Duration,
    pub request_timeout: Duration,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 2,
            max_retries: 3,
            retry_base: Duration::from_secs_f64(2.0),
            request_timeout: Duration::from_secs_f64(25.0),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if the Azure OpenAI credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure_openai_api_key: String,
    pub azure_openai_endpoint: String,
    pub azure_openai_api_version: String,
    pub azure_openai_deployment_name: String,
    pub ai: AiSettings,
    pub s3_bucket: String,
    /// Custom endpoint (MinIO). `None` talks to AWS directly.
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut require = |key: &str| {
            get(key).unwrap_or_else(|| {
                missing.push(key.to_string());
                String::new()
            })
        };

        let azure_openai_api_key = require("AZURE_OPENAI_API_KEY");
        let azure_openai_endpoint = require("AZURE_OPENAI_ENDPOINT");
        let azure_openai_deployment_name = require("AZURE_OPENAI_DEPLOYMENT_NAME");

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let defaults = AiSettings::default();
        let max_concurrency: usize =
            parse_or(&get, "AI_MAX_CONCURRENCY", defaults.max_concurrency)?;
        if max_concurrency == 0 {
            return Err(invalid("AI_MAX_CONCURRENCY", "0", "must be at least 1"));
        }
        let max_retries: u32 = parse_or(&get, "AI_MAX_RETRIES", defaults.max_retries)?;
        let retry_base = seconds_or(&get, "AI_RETRY_BASE_SECONDS", defaults.retry_base, true)?;
        let request_timeout = seconds_or(
            &get,
            "AI_REQUEST_TIMEOUT_SECONDS",
            defaults.request_timeout,
            false,
        )?;

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Ok(Config {
            azure_openai_api_key,
            azure_openai_endpoint,
            azure_openai_api_version: get("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            azure_openai_deployment_name,
            ai: AiSettings {
                max_concurrency,
                max_retries,
                retry_base,
                request_timeout,
            },
            s3_bucket: get("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            s3_endpoint: get("S3_ENDPOINT"),
            s3_region: get("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            aws_access_key_id: get("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 8000)?,
            allowed_origins,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| invalid(key, &raw, &e.to_string())),
    }
}

fn seconds_or<G>(
    get: &G,
    key: &str,
    default: Duration,
    allow_zero: bool,
) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    let secs: f64 = raw
        .parse()
        .map_err(|e: std::num::ParseFloatError| invalid(key, &raw, &e.to_string()))?;
    if !secs.is_finite() || secs < 0.0 || (!allow_zero && secs == 0.0) {
        let bound = if allow_zero { "non-negative" } else { "positive" };
        return Err(invalid(key, &raw, &format!("must be a {bound} number of seconds")));
    }
    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("AZURE_OPENAI_API_KEY", "secret"),
        ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
        ("AZURE_OPENAI_DEPLOYMENT_NAME", "gpt-4o"),
    ];

    #[test]
    fn test_defaults_applied_when_only_required_set() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.ai, AiSettings::default());
        assert_eq!(config.ai.max_concurrency, 2);
        assert_eq!(config.ai.max_retries, 3);
        assert_eq!(config.ai.retry_base, Duration::from_secs(2));
        assert_eq!(config.ai.request_timeout, Duration::from_secs(25));
        assert_eq!(config.azure_openai_api_version, DEFAULT_API_VERSION);
        assert_eq!(config.s3_bucket, "resumes");
        assert!(config.s3_endpoint.is_none());
        assert_eq!(config.port, 8000);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_all_missing_credentials_reported_together() {
        let err = Config::from_lookup(lookup(&[("AZURE_OPENAI_API_KEY", "secret")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![
                "AZURE_OPENAI_ENDPOINT".to_string(),
                "AZURE_OPENAI_DEPLOYMENT_NAME".to_string(),
            ])
        );
        assert!(err.to_string().contains("AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_DEPLOYMENT_NAME"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("AZURE_OPENAI_API_KEY", "   ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["AZURE_OPENAI_API_KEY".to_string()])
        );
    }

    #[test]
    fn test_ai_overrides_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("AI_MAX_CONCURRENCY", "5"),
            ("AI_MAX_RETRIES", "0"),
            ("AI_RETRY_BASE_SECONDS", "0.5"),
            ("AI_REQUEST_TIMEOUT_SECONDS", "10"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.ai.max_concurrency, 5);
        assert_eq!(config.ai.max_retries, 0);
        assert_eq!(config.ai.retry_base, Duration::from_millis(500));
        assert_eq!(config.ai.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AI_MAX_CONCURRENCY", "0"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "AI_MAX_CONCURRENCY"));
    }

    #[test]
    fn test_unparsable_timeout_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AI_REQUEST_TIMEOUT_SECONDS", "soon"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "AI_REQUEST_TIMEOUT_SECONDS"));
    }

    #[test]
    fn test_zero_timeout_rejected_but_zero_backoff_allowed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AI_RETRY_BASE_SECONDS", "0"));
        assert!(Config::from_lookup(lookup(&pairs)).is_ok());

        pairs.push(("AI_REQUEST_TIMEOUT_SECONDS", "0"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_allowed_origins_split_and_trimmed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ALLOWED_ORIGINS", "https://a.example, ,https://b.example "));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
