//! Desk configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | AC_SERVER_URL | https://localhost:8443 | Backend base URL |
//! | AC_REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
//! | AC_ACCEPT_INVALID_CERTS | false | Skip TLS certificate checks |
//! | AC_LOG_DIR | (none) | Directory for daily log files |
//! | AC_LOG_LEVEL | info | Default log level when RUST_LOG is unset |
//!
//! A `.env` file in the working directory is read first.

use std::path::{Path, PathBuf};

use ac_client::ClientConfig;
use ac_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use super::logger::LogConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub accept_invalid_certs: bool,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    /// `.env` file that was loaded, if any. Logged once the subscriber is up.
    pub env_file: Option<PathBuf>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            log_dir: None,
            log_level: "info".to_string(),
            env_file: None,
        }
    }
}

impl DeskConfig {
    /// `.env` then process environment
    pub fn from_env() -> Self {
        Self::from_process_env(dotenvy::dotenv().ok())
    }

    /// A specific env file, then process environment
    pub fn from_env_path(path: &Path) -> Self {
        let env_file = dotenvy::from_path(path).ok().map(|()| path.to_path_buf());
        Self::from_process_env(env_file)
    }

    fn from_process_env(env_file: Option<PathBuf>) -> Self {
        Self {
            env_file,
            ..Self::from_lookup(|key| std::env::var(key).ok())
        }
    }

    /// Build from any key lookup; unset or unparsable values fall back to
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            server_url: lookup("AC_SERVER_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.server_url),
            request_timeout_secs: lookup("AC_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            accept_invalid_certs: lookup("AC_ACCEPT_INVALID_CERTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.accept_invalid_certs),
            log_dir: lookup("AC_LOG_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_level: lookup("AC_LOG_LEVEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),
            env_file: None,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.server_url.clone())
            .with_timeout(self.request_timeout_secs)
            .with_accept_invalid_certs(self.accept_invalid_certs)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            ..LogConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DeskConfig::from_lookup(lookup(&[]));
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.server_url, "https://localhost:8443");
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn reads_every_variable() {
        let config = DeskConfig::from_lookup(lookup(&[
            ("AC_SERVER_URL", "https://reports.example.org/"),
            ("AC_REQUEST_TIMEOUT_SECS", "5"),
            ("AC_ACCEPT_INVALID_CERTS", "true"),
            ("AC_LOG_DIR", "/var/log/ac-desk"),
            ("AC_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.accept_invalid_certs);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/ac-desk")));

        let client = config.client_config();
        assert_eq!(client.normalized_base_url(), "https://reports.example.org");
        assert_eq!(client.timeout, 5);
        assert_eq!(config.log_config().level, "debug");
    }

    #[test]
    fn garbage_falls_back() {
        let config = DeskConfig::from_lookup(lookup(&[
            ("AC_REQUEST_TIMEOUT_SECS", "soon"),
            ("AC_ACCEPT_INVALID_CERTS", "yes please"),
            ("AC_SERVER_URL", "  "),
        ]));
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn loaded_env_file_is_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "# desk settings\nAC_DESK_CONFIG_TEST=1\n").unwrap();

        let config = DeskConfig::from_env_path(&path);
        assert_eq!(config.env_file.as_deref(), Some(path.as_path()));

        let missing = DeskConfig::from_env_path(&dir.path().join("absent.env"));
        assert!(missing.env_file.is_none());
    }
}
