//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or an explicit path) and applies env
//! overrides on top. Payment credentials and the database URI come from the
//! environment only and are never read from TOML.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::database::DbDriver;
use crate::error::AppError;
use crate::logger;
use crate::payment;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

pub const ENV_LOG_LEVEL: &str = "STOREFRONT_LOG_LEVEL";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Older deployments name the connection URI this way.
pub const ENV_DATABASE_URL_LEGACY: &str = "MONGO_URI";

/// Payment client configuration. The mode stays a raw string here and is
/// resolved by [`payment::configure`].
#[derive(Clone)]
pub struct PaymentConfig {
    /// `PAYPAL_MODE`, else `[payment] mode`.
    pub mode: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Replaces the mode-derived API host when set (`[payment] api_base`).
    pub api_base: Option<String>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

// Secret stays out of logs.
impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Database probe configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub driver: DbDriver,
    /// Connection URI from `DATABASE_URL` (or `MONGO_URI`). `None` when unset.
    pub uri: Option<String>,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub payment: PaymentConfig,
    pub database: DatabaseConfig,
}

/// Values read from the process environment.
///
/// Tests build this directly instead of mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub log_level: Option<String>,
    pub payment_mode: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub database_url: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup(ENV_LOG_LEVEL),
            payment_mode: lookup(payment::ENV_MODE),
            client_id: lookup(payment::ENV_CLIENT_ID),
            client_secret: lookup(payment::ENV_CLIENT_SECRET),
            database_url: lookup(ENV_DATABASE_URL).or_else(|| lookup(ENV_DATABASE_URL_LEGACY)),
        }
    }
}

// ── raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    storefront: RawStorefront,
    #[serde(default)]
    payment: RawPayment,
    #[serde(default)]
    database: RawDatabase,
}

#[derive(Deserialize)]
struct RawStorefront {
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawStorefront {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawPayment {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    api_base: Option<String>,
    #[serde(default = "default_payment_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawPayment {
    fn default() -> Self {
        Self {
            mode: None,
            api_base: None,
            timeout_seconds: default_payment_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawDatabase {
    #[serde(default = "default_db_driver")]
    driver: String,
}

impl Default for RawDatabase {
    fn default() -> Self {
        Self { driver: default_db_driver() }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_payment_timeout_seconds() -> u64 { 30 }
fn default_db_driver() -> String { "postgres".to_string() }

// ── loading ───────────────────────────────────────────────────────────────────

/// Load config from `config_path`, or `config/default.toml`, then apply env
/// overrides. When no path is given and the default file is absent, the
/// built-in defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = EnvOverrides::from_env();
    match config_path {
        Some(path) => load_from(Path::new(path), &overrides),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_from(default, &overrides)
            } else {
                resolve(RawConfig::default(), &overrides)
            }
        }
    }
}

/// Load from an explicit file with the given overrides.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let raw: RawConfig = toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;
    resolve(raw, overrides)
}

/// Parse a TOML document and resolve it against `overrides`.
pub fn parse_str(text: &str, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let raw: RawConfig =
        toml::from_str(text).map_err(|e| AppError::Config(format!("parse error: {e}")))?;
    resolve(raw, overrides)
}

fn resolve(raw: RawConfig, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let driver = DbDriver::from_name(&raw.database.driver).ok_or_else(|| {
        AppError::Config(format!("unknown database driver: '{}'", raw.database.driver))
    })?;

    let log_level = overrides
        .log_level
        .clone()
        .unwrap_or(raw.storefront.log_level);
    logger::parse_level(&log_level)?;

    Ok(Config {
        log_level,
        payment: PaymentConfig {
            // Env mode beats the file.
            mode: overrides.payment_mode.clone().or(raw.payment.mode),
            client_id: overrides.client_id.clone(),
            client_secret: overrides.client_secret.clone(),
            api_base: raw.payment.api_base,
            timeout_seconds: raw.payment.timeout_seconds,
        },
        database: DatabaseConfig {
            driver,
            uri: overrides.database_url.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_TOML: &str = r#"
[storefront]
log_level = "debug"

[payment]
mode = "live"
api_base = "http://127.0.0.1:9999"
timeout_seconds = 5

[database]
driver = "stub"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = parse_str("", &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.payment.mode.is_none());
        assert_eq!(cfg.payment.timeout_seconds, 30);
        assert!(cfg.payment.api_base.is_none());
        assert_eq!(cfg.database.driver, DbDriver::Postgres);
        assert!(cfg.database.uri.is_none());
    }

    #[test]
    fn file_values_are_read() {
        let f = write_toml(FULL_TOML);
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.payment.mode.as_deref(), Some("live"));
        assert_eq!(cfg.payment.api_base.as_deref(), Some("http://127.0.0.1:9999"));
        assert_eq!(cfg.payment.timeout_seconds, 5);
        assert_eq!(cfg.database.driver, DbDriver::Stub);
    }

    #[test]
    fn env_overrides_file() {
        let f = write_toml(FULL_TOML);
        let overrides = EnvOverrides {
            log_level: Some("warn".into()),
            payment_mode: Some("sandbox".into()),
            ..Default::default()
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.payment.mode.as_deref(), Some("sandbox"));
    }

    #[test]
    fn credentials_land_in_their_own_fields() {
        let overrides = EnvOverrides::from_lookup(|key| match key {
            "PAYPAL_MODE" => Some("live".into()),
            "PAYPAL_CLIENT_ID" => Some("id-123".into()),
            "PAYPAL_CLIENT_SECRET" => Some("secret-456".into()),
            "DATABASE_URL" => Some("postgres://localhost/shop".into()),
            _ => None,
        });
        let cfg = parse_str("", &overrides).unwrap();
        assert_eq!(cfg.payment.mode.as_deref(), Some("live"));
        assert_eq!(cfg.payment.client_id.as_deref(), Some("id-123"));
        assert_eq!(cfg.payment.client_secret.as_deref(), Some("secret-456"));
        assert_eq!(cfg.database.uri.as_deref(), Some("postgres://localhost/shop"));
    }

    #[test]
    fn credentials_are_not_read_from_toml() {
        let toml = r#"
[payment]
client_id = "from-file"
client_secret = "from-file"
"#;
        let cfg = parse_str(toml, &EnvOverrides::default()).unwrap();
        assert!(cfg.payment.client_id.is_none());
        assert!(cfg.payment.client_secret.is_none());
    }

    #[test]
    fn legacy_uri_variable_is_accepted() {
        let overrides = EnvOverrides::from_lookup(|key| match key {
            "MONGO_URI" => Some("postgres://legacy/shop".into()),
            _ => None,
        });
        assert_eq!(overrides.database_url.as_deref(), Some("postgres://legacy/shop"));
    }

    #[test]
    fn database_url_wins_over_legacy_name() {
        let overrides = EnvOverrides::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://current/shop".into()),
            "MONGO_URI" => Some("postgres://legacy/shop".into()),
            _ => None,
        });
        assert_eq!(overrides.database_url.as_deref(), Some("postgres://current/shop"));
    }

    #[test]
    fn invalid_log_level_errors() {
        let err = parse_str("[storefront]\nlog_level = \"loud\"\n", &EnvOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("unrecognised log level"));

        let overrides = EnvOverrides { log_level: Some("verbose".into()), ..Default::default() };
        assert!(parse_str("", &overrides).is_err());
    }

    #[test]
    fn debug_hides_client_secret() {
        let overrides = EnvOverrides { client_secret: Some("hunter2".into()), ..Default::default() };
        let cfg = parse_str("", &overrides).unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }

    #[test]
    fn unknown_driver_errors() {
        let err = parse_str("[database]\ndriver = \"oracle\"\n", &EnvOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("unknown database driver"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &EnvOverrides::default());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn malformed_toml_errors() {
        let f = write_toml("[storefront\nlog_level = ");
        let msg = load_from(f.path(), &EnvOverrides::default()).unwrap_err().to_string();
        assert!(msg.contains("parse error"));
    }
}
