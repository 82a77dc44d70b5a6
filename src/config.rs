//! Runtime configuration read from the environment (and `.env`).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::document::Issuer;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Sessions untouched for this long are dropped
    pub session_idle: Duration,
    pub session_capacity: u64,
    pub static_dir: PathBuf,
    pub issuer: Issuer,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source; unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Issuer::default();
        let text = |name: &str, default: String| lookup(name).unwrap_or(default);

        Ok(Self {
            host: text("HOST", "0.0.0.0".to_string()),
            port: parse_var(&lookup, "PORT", 8080)?,
            session_idle: Duration::from_secs(parse_var(&lookup, "SESSION_IDLE_SECS", 3600)?),
            session_capacity: parse_var(&lookup, "SESSION_CAPACITY", 10_000)?,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_static_dir().to_path_buf()),
            issuer: Issuer {
                name: text("ISSUER_NAME", defaults.name),
                signer: text("ISSUER_SIGNER", defaults.signer),
                signer_title: text("ISSUER_SIGNER_TITLE", defaults.signer_title),
                // `\n` in the variable separates printed lines
                payment_details: lookup("ISSUER_PAYMENT_DETAILS")
                    .map(|value| value.replace("\\n", "\n"))
                    .unwrap_or(defaults.payment_details),
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// The bundled form page.
pub fn default_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_idle, Duration::from_secs(3600));
        assert_eq!(config.session_capacity, 10_000);
        assert_eq!(config.static_dir, default_static_dir());
        assert_eq!(config.issuer, Issuer::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("SESSION_IDLE_SECS", "60"),
            ("ISSUER_NAME", "GULF WIDGETS"),
            ("ISSUER_PAYMENT_DETAILS", "Line one\\nLine two"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.session_idle, Duration::from_secs(60));
        assert_eq!(config.issuer.name, "GULF WIDGETS");
        assert_eq!(config.issuer.payment_details, "Line one\nLine two");
        assert_eq!(config.issuer.signer, "Jobin George");
    }

    #[test]
    fn test_invalid_number() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }
}
