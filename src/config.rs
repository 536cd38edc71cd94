//! Environment-driven configuration.
//!
//! Everything upstream-facing (endpoints, keys, model names, timeouts) comes
//! from `MEDILENS_*` variables so deployments never bake credentials into
//! the binary. URLs and model names have workable defaults; the two secrets
//! are required.

use thiserror::Error;

pub const APP_NAME: &str = "MediLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,medilens=debug"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API binds to.
    pub bind_addr: String,
    /// Hosted generative-model API.
    pub model_base_url: String,
    pub model_api_key: String,
    pub vision_model: String,
    pub chat_model: String,
    /// Overpass-style POI service.
    pub overpass_base_url: String,
    /// Form-delivery service.
    pub form_endpoint: String,
    pub form_access_key: String,
    /// Identity provider verification endpoint base.
    pub identity_base_url: String,
    /// Per-request timeout applied to every upstream client.
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary lookup (testable without
    /// mutating the process environment).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| get(var).ok_or(ConfigError::MissingVar(var));
        let or_default =
            |var: &str, default: &str| get(var).unwrap_or_else(|| default.to_string());

        let timeout_raw = or_default("MEDILENS_UPSTREAM_TIMEOUT_SECS", "60");
        let upstream_timeout_secs =
            timeout_raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidVar {
                    var: "MEDILENS_UPSTREAM_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?;
        if upstream_timeout_secs == 0 {
            return Err(ConfigError::InvalidVar {
                var: "MEDILENS_UPSTREAM_TIMEOUT_SECS",
                reason: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            bind_addr: or_default("MEDILENS_BIND_ADDR", "127.0.0.1:8787"),
            model_base_url: or_default(
                "MEDILENS_MODEL_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            model_api_key: required("MEDILENS_MODEL_API_KEY")?,
            vision_model: or_default("MEDILENS_VISION_MODEL", "gemini-2.5-flash"),
            chat_model: or_default("MEDILENS_CHAT_MODEL", "gemini-1.5-flash"),
            overpass_base_url: or_default("MEDILENS_OVERPASS_URL", "https://overpass-api.de"),
            form_endpoint: or_default("MEDILENS_FORM_ENDPOINT", "https://api.web3forms.com/submit"),
            form_access_key: required("MEDILENS_FORM_ACCESS_KEY")?,
            identity_base_url: required("MEDILENS_IDENTITY_URL")?,
            upstream_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MEDILENS_MODEL_API_KEY", "test-model-key"),
            ("MEDILENS_FORM_ACCESS_KEY", "test-form-key"),
            ("MEDILENS_IDENTITY_URL", "https://id.example"),
        ])
    }

    fn lookup<'a>(vars: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| vars.get(var).map(|v| v.to_string())
    }

    #[test]
    fn minimal_env_uses_defaults() {
        let vars = base_vars();
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8787");
        assert_eq!(config.model_base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.vision_model, "gemini-2.5-flash");
        assert_eq!(config.chat_model, "gemini-1.5-flash");
        assert_eq!(config.overpass_base_url, "https://overpass-api.de");
        assert_eq!(config.upstream_timeout_secs, 60);
        assert_eq!(config.model_api_key, "test-model-key");
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let mut vars = base_vars();
        vars.remove("MEDILENS_MODEL_API_KEY");
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("MEDILENS_MODEL_API_KEY")));
    }

    #[test]
    fn overrides_are_honored() {
        let mut vars = base_vars();
        vars.insert("MEDILENS_BIND_ADDR", "0.0.0.0:9000");
        vars.insert("MEDILENS_UPSTREAM_TIMEOUT_SECS", "120");
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.upstream_timeout_secs, 120);
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let mut vars = base_vars();
        vars.insert("MEDILENS_UPSTREAM_TIMEOUT_SECS", "soon");
        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidVar { .. })
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut vars = base_vars();
        vars.insert("MEDILENS_UPSTREAM_TIMEOUT_SECS", "0");
        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::InvalidVar { .. })
        ));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(APP_NAME, "MediLens");
    }
}
