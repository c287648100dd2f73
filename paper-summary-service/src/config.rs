use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ConfigError;

pub const API_KEY_SECRET: &str = "GEMINI_API_KEY";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Process settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub secrets_file: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let secrets_file = lookup("SECRETS_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE));

        Self { port, secrets_file }
    }
}

/// Deployment-managed secrets, loaded once from a TOML file of top-level keys.
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    values: toml::Table,
}

impl SecretStore {
    /// A missing file yields an empty store; a broken one is a startup error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("Secrets file {} not found", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let values = raw
            .parse::<toml::Table>()
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded {} secret(s) from {}",
            values.len(),
            path.display()
        );
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|value| value.as_str())
            .filter(|value| !value.trim().is_empty())
    }

    pub fn api_key(&self) -> Option<ApiKey> {
        self.get(API_KEY_SECRET).map(ApiKey::new)
    }
}

/// The provider API key. Never rendered or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn service_config_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.secrets_file, PathBuf::from("secrets.toml"));
    }

    #[test]
    fn service_config_reads_overrides_and_ignores_bad_port() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("PORT", "8501"),
            ("SECRETS_FILE", "/run/secrets/app.toml"),
        ]));
        assert_eq!(config.port, 8501);
        assert_eq!(config.secrets_file, PathBuf::from("/run/secrets/app.toml"));

        let config = ServiceConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn missing_secrets_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::load(&dir.path().join("absent.toml")).unwrap();
        assert!(store.api_key().is_none());
    }

    #[test]
    fn reads_api_key_from_secrets_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY = \"abc123\"").unwrap();

        let store = SecretStore::load(file.path()).unwrap();
        assert_eq!(store.api_key().unwrap().expose(), "abc123");
    }

    #[test]
    fn empty_or_non_string_key_counts_as_absent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY = \"  \"\nOTHER = 5").unwrap();

        let store = SecretStore::load(file.path()).unwrap();
        assert!(store.api_key().is_none());
        assert!(store.get("OTHER").is_none());
    }

    #[test]
    fn malformed_secrets_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY = ").unwrap();

        let err = SecretStore::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert!(!format!("{:?}", key).contains("super-secret"));
    }
}
