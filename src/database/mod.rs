//! Database connectivity probe.
//!
//! [`probe`] makes exactly one connection attempt and reports the outcome
//! through the log. Failures are logged and returned as
//! [`ProbeOutcome::Failed`]; they never propagate or panic.
//!
//! `DbConnector` is an enum over backends, following the same dispatch style
//! as the rest of the crate: new backend = new module + new variant.

pub mod postgres;
pub mod stub;

use reqwest::Url;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("no connection URI configured")]
    MissingUri,
    #[error("connection failed: {0}")]
    Connect(String),
}

/// Backend selected by `[database] driver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    Postgres,
    Stub,
}

impl DbDriver {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "stub" => Some(Self::Stub),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DbConnector {
    Postgres(postgres::PostgresConnector),
    Stub(stub::StubConnector),
}

impl DbConnector {
    pub fn for_driver(driver: DbDriver) -> Self {
        match driver {
            DbDriver::Postgres => Self::Postgres(postgres::PostgresConnector),
            DbDriver::Stub => Self::Stub(stub::StubConnector::succeeding()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Stub(_) => "stub",
        }
    }

    pub async fn connect(&self, uri: &str) -> Result<(), DbError> {
        match self {
            Self::Postgres(c) => c.connect(uri).await,
            Self::Stub(c) => c.connect(uri).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Connected,
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Attempt a single connection to `uri` and log the result.
pub async fn probe(connector: &DbConnector, uri: Option<&str>) -> ProbeOutcome {
    let uri = uri.filter(|u| !u.is_empty());

    info!(
        driver = connector.name(),
        uri = %uri.map(redact_uri).unwrap_or_else(|| "<unset>".to_string()),
        "trying to connect"
    );

    let result = match uri {
        Some(uri) => connector.connect(uri).await,
        None => Err(DbError::MissingUri),
    };

    match result {
        Ok(()) => {
            info!(driver = connector.name(), "connected to database");
            ProbeOutcome::Connected
        }
        Err(e) => {
            error!(driver = connector.name(), error = %e, "database connection error");
            ProbeOutcome::Failed(e.to_string())
        }
    }
}

/// Query parameters that carry secrets in libpq-style URIs.
const SECRET_PARAMS: &[&str] = &["password", "sslpassword"];

/// Mask passwords in a connection URI for logging, both in the userinfo and
/// in `?password=` style query parameters.
pub fn redact_uri(uri: &str) -> String {
    let Ok(mut url) = Url::parse(uri) else {
        return "<invalid uri>".to_string();
    };

    if url.password().is_some() {
        // Only fails for URIs without a host, which carry no password.
        let _ = url.set_password(Some("***"));
    }

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if pairs.iter().any(|(k, _)| is_secret_param(k)) {
        let masked = pairs.into_iter().map(|(k, v)| {
            let v = if is_secret_param(&k) { "***".to_string() } else { v };
            (k, v)
        });
        url.query_pairs_mut().clear().extend_pairs(masked);
    }

    url.to_string()
}

fn is_secret_param(key: &str) -> bool {
    SECRET_PARAMS.iter().any(|p| key.eq_ignore_ascii_case(p))
}
