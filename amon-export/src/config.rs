use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::{collections::BTreeMap, fs, io::ErrorKind, path::PathBuf};

use crate::assemble::CompanyPrefixes;
use crate::sinks::Encoding;

/// Environment variables with this prefix configure the back-office
/// connection.
pub const ENV_PREFIX: &str = "OOOP_";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("OOOP_PORT must be an integer port, got '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Postgres,
    Fixture,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ErpConfig {
    pub backend: BackendKind,
    pub fixture_path: Option<PathBuf>,
    pub source_timezone: String,
    pub max_connections: u32,
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Postgres,
            fixture_path: None,
            source_timezone: "Europe/Madrid".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub url: String,
    pub encoding: Encoding,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            encoding: Encoding::Form,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartnersConfig {
    pub company_prefixes: CompanyPrefixes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub erp: ErpConfig,
    pub transport: TransportConfig,
    pub partners: PartnersConfig,
    pub metrics: Option<MetricsConfig>,
    #[serde(skip)]
    pub connection: ConnectionSettings,
}

impl AppConfig {
    /// Reads `AMON_CONFIG` (default `amon-export.toml`) when it exists,
    /// then overlays the `OOOP_*` connection variables.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("AMON_CONFIG").unwrap_or_else(|_| "amon-export.toml".to_string());
        let mut cfg = match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path, "no config file, using defaults");
                AppConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        cfg.connection = ConnectionSettings::from_vars(env::vars())?;
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Back-office connection settings taken from the environment.
///
/// Keys are the variable names without [`ENV_PREFIX`], lower-cased.
/// Values are kept verbatim, except `port`, which must be an integer.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub port: Option<u16>,
    values: BTreeMap<String, String>,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("port", &self.port)
            .field("keys", &self.keys())
            .finish()
    }
}

impl ConnectionSettings {
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut settings = ConnectionSettings::default();
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_lowercase();
            if key == "port" {
                let port = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(value.clone()))?;
                settings.port = Some(port);
            } else if !key.is_empty() {
                settings.values.insert(key, value);
            }
        }
        Ok(settings)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Host name, taken from `host` or else from the legacy `uri` setting
    /// (`http://erp.example:8069` style).
    pub fn host(&self) -> Option<&str> {
        if let Some(host) = self.get("host") {
            return Some(host);
        }
        let uri = self.get("uri")?;
        let rest = uri.split_once("://").map_or(uri, |(_, rest)| rest);
        let host = rest.split(['/', ':']).next().unwrap_or(rest);
        (!host.is_empty()).then_some(host)
    }

    /// PostgreSQL options; unset values fall back to the usual `PG*`
    /// environment defaults.
    pub fn pg_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new();
        if let Some(host) = self.host() {
            options = options.host(host);
        }
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if let Some(user) = self.get("user") {
            options = options.username(user);
        }
        if let Some(password) = self.get("pwd").or_else(|| self.get("password")) {
            options = options.password(password);
        }
        if let Some(database) = self.get("dbname").or_else(|| self.get("database")) {
            options = options.database(database);
        }
        options
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
    fn prefixed_variables_are_lowercased_and_port_is_numeric() {
        let settings = ConnectionSettings::from_vars(vars(&[
            ("OOOP_DBNAME", "erp"),
            ("OOOP_USER", "admin"),
            ("OOOP_PORT", "5432"),
            ("OOOP_Debug", "True"),
            ("PATH", "/usr/bin"),
        ]))
        .unwrap();

        assert_eq!(settings.port, Some(5432));
        assert_eq!(settings.get("dbname"), Some("erp"));
        assert_eq!(settings.get("user"), Some("admin"));
        assert_eq!(settings.get("debug"), Some("True"));
        assert_eq!(settings.keys(), vec!["dbname", "debug", "user"]);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = ConnectionSettings::from_vars(vars(&[("OOOP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(v) if v == "eighty"));
    }

    #[test]
    fn host_falls_back_to_uri() {
        let settings =
            ConnectionSettings::from_vars(vars(&[("OOOP_URI", "http://erp.example:8069/xmlrpc")]))
                .unwrap();
        assert_eq!(settings.host(), Some("erp.example"));

        let settings = ConnectionSettings::from_vars(vars(&[
            ("OOOP_URI", "http://erp.example"),
            ("OOOP_HOST", "db.internal"),
        ]))
        .unwrap();
        assert_eq!(settings.host(), Some("db.internal"));
    }

    #[test]
    fn debug_output_hides_values() {
        let settings = ConnectionSettings::from_vars(vars(&[("OOOP_PWD", "secret")])).unwrap();
        let rendered = format!("{settings:?}");
        assert!(rendered.contains("pwd"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn toml_sections_override_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [erp]
            backend = "fixture"
            fixture_path = "snapshot.json"

            [transport]
            url = "https://receiver.example/amon"
            encoding = "json"

            [partners]
            company_prefixes = "AB"

            [metrics]
            bind_addr = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.erp.backend, BackendKind::Fixture);
        assert_eq!(cfg.erp.source_timezone, "Europe/Madrid");
        assert_eq!(cfg.transport.encoding, Encoding::Json);
        assert!(cfg.partners.company_prefixes.contains('b'));
        assert!(!cfg.partners.company_prefixes.contains('C'));
        assert_eq!(cfg.metrics.unwrap().bind_addr, "127.0.0.1:9100");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.erp.backend, BackendKind::Postgres);
        assert_eq!(cfg.transport.url, "http://localhost:5000");
        assert_eq!(cfg.transport.encoding, Encoding::Form);
        assert_eq!(cfg.partners.company_prefixes, CompanyPrefixes::default());
        assert!(cfg.metrics.is_none());
    }
}
