//! OAuth2 client-credentials token wire type and cache entry.

use std::time::{Duration, Instant};

use serde::Deserialize;

/// Tokens are refreshed this long before the server-side expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on how long a token is trusted, whatever `expires_in` says.
const MAX_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Clone)]
pub(super) struct CachedToken {
    pub access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    pub fn issued_at(resp: TokenResponse, now: Instant) -> Self {
        Self {
            access_token: resp.access_token,
            expires_at: now + Duration::from_secs(resp.expires_in).min(MAX_LIFETIME),
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
