use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds shaved off the provider-reported lifetime; absorbs clock skew
/// and request flight time.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// The sole persisted entity. Field names are stable across versions —
/// this is the only state carried across process restarts.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TokenRecord {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub pending_state: Option<String>,
}

impl TokenRecord {
    /// True when the access token cannot be used as-is and a refresh must
    /// run first. An access token without a recorded expiry counts as
    /// expired.
    pub fn is_expired(&self) -> bool {
        match (self.access_token.as_ref(), self.expires_at) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(_), Some(expires)) => Utc::now() >= expires,
        }
    }

    /// True iff the record holds an access or refresh token. Expiry is
    /// resolved lazily by the dispatcher, never here.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }
}

/// Raw token response from the provider's token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Build the record to persist. A response that omits `refresh_token`
    /// carries `prior_refresh` forward — rotation is optional on the
    /// provider side.
    pub fn into_record(self, prior_refresh: Option<String>) -> TokenRecord {
        let expires_at = self
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs - EXPIRY_MARGIN_SECS));
        TokenRecord {
            access_token: Some(self.access_token),
            refresh_token: self.refresh_token.or(prior_refresh),
            expires_at,
            pending_state: None,
        }
    }
}
