//! Payment processor client.
//!
//! [`configure`] turns the resolved [`PaymentConfig`] into a [`PaymentClient`]
//! handle that the rest of the server shares. Configuration does no I/O and
//! no validation: credentials are carried as given and only checked when the
//! handle first needs an access token.

mod token;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::PaymentConfig;

use token::{CachedToken, TokenResponse};

pub const ENV_MODE: &str = "PAYPAL_MODE";
pub const ENV_CLIENT_ID: &str = "PAYPAL_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "PAYPAL_CLIENT_SECRET";

const SANDBOX_API_BASE: &str = "https://api.sandbox.paypal.com";
const LIVE_API_BASE: &str = "https://api.paypal.com";
const TOKEN_PATH: &str = "/v1/oauth2/token";

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("request failed: {0}")]
    Request(String),
    #[error("token request rejected ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("unexpected token response: {0}")]
    Decode(String),
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Which payment environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMode {
    #[default]
    Sandbox,
    Live,
}

impl PaymentMode {
    /// Resolve a raw mode string. Anything other than `live` is sandbox;
    /// unrecognised values are logged.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Sandbox,
            Some(v) if v.eq_ignore_ascii_case("live") => Self::Live,
            Some(v) if v.eq_ignore_ascii_case("sandbox") => Self::Sandbox,
            Some(other) => {
                warn!(mode = %other, "unrecognised payment mode, using sandbox");
                Self::Sandbox
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

    pub fn api_base(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_API_BASE,
            Self::Live => LIVE_API_BASE,
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three values handed to the payment client.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PaymentSettings {
    pub mode: PaymentMode,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

// Secret stays out of logs and panic messages.
impl fmt::Debug for PaymentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentSettings")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Configured payment client. Cheap to clone; clones share the HTTP client
/// and the token cache.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: Client,
    settings: PaymentSettings,
    api_base: String,
    token: Arc<Mutex<Option<CachedToken>>>,
}

/// Build the process-wide payment client from config. The mode string is
/// resolved here, after the logger is up, so a bad value is reported.
pub fn configure(config: &PaymentConfig) -> Result<PaymentClient, PaymentError> {
    let settings = PaymentSettings {
        mode: PaymentMode::resolve(config.mode.as_deref()),
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
    };
    let client = PaymentClient::new(settings, config.api_base.clone(), config.timeout_seconds)?;

    info!(
        mode = %client.mode(),
        api_base = %client.api_base(),
        client_id_set = config.client_id.is_some(),
        client_secret_set = config.client_secret.is_some(),
        "payment client configured"
    );

    Ok(client)
}

impl PaymentClient {
    /// `api_base` replaces the mode-derived host when given.
    pub fn new(
        settings: PaymentSettings,
        api_base: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, PaymentError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| PaymentError::Request(format!("failed to build HTTP client: {e}")))?;

        let api_base = api_base
            .unwrap_or_else(|| settings.mode.api_base().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            settings,
            api_base,
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn settings(&self) -> &PaymentSettings {
        &self.settings
    }

    pub fn mode(&self) -> PaymentMode {
        self.settings.mode
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Bearer token for API calls, fetched on first use and reused until
    /// shortly before it expires.
    pub async fn access_token(&self) -> Result<String, PaymentError> {
        let mut slot = self.token.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.is_fresh(Instant::now()) {
                return Ok(cached.access_token.clone());
            }
            debug!("cached payment token near expiry, refreshing");
        }

        let fresh = self.fetch_token().await?;
        let access_token = fresh.access_token.clone();
        *slot = Some(fresh);
        Ok(access_token)
    }

    /// Authorised request to `path` on the payment API.
    pub async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, PaymentError> {
        let token = self.access_token().await?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    async fn fetch_token(&self) -> Result<CachedToken, PaymentError> {
        let client_id = present(self.settings.client_id.as_deref())
            .ok_or(PaymentError::MissingCredential(ENV_CLIENT_ID))?;
        let client_secret = present(self.settings.client_secret.as_deref())
            .ok_or(PaymentError::MissingCredential(ENV_CLIENT_SECRET))?;

        debug!(mode = %self.mode(), "requesting payment access token");

        let resp = self
            .http
            .post(self.url(TOKEN_PATH))
            .basic_auth(client_id, Some(client_secret))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "payment token request rejected");
            return Err(PaymentError::Auth { status: status.as_u16(), body });
        }

        let parsed: TokenResponse = resp
            .json()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))?;

        debug!(expires_in = parsed.expires_in, "payment access token issued");
        Ok(CachedToken::issued_at(parsed, Instant::now()))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
