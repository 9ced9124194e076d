use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ProviderConfig;
use crate::error::CratedigError;
use crate::oauth::state::generate_state;
use crate::oauth::store::TokenStore;
use crate::oauth::token::{TokenRecord, TokenResponse};

/// Owns the token lifecycle: authorization hand-off, callback exchange,
/// refresh, and the predicates the rest of the crate gates on.
pub struct OAuthSession {
    provider: ProviderConfig,
    store: Arc<dyn TokenStore>,
    http: reqwest::Client,
    // At most one refresh exchange in flight; waiters share the winner's
    // outcome instead of re-triggering.
    refresh_guard: Mutex<()>,
}

impl OAuthSession {
    pub fn new(provider: ProviderConfig, store: Arc<dyn TokenStore>) -> Self {
        Self {
            provider,
            store,
            http: reqwest::Client::new(),
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }

    /// True iff the store holds an access or refresh token. Expiry does not
    /// matter here; the dispatcher resolves it lazily.
    pub async fn is_authenticated(&self) -> Result<bool, CratedigError> {
        Ok(self.store.load().await?.is_authenticated())
    }

    /// Wipe all credential material (logout/reset).
    pub async fn clear(&self) -> Result<(), CratedigError> {
        self.store.clear().await
    }

    /// Mint a state nonce, persist it as the pending authorization, and
    /// return the provider authorization URL control is handed to.
    pub async fn begin_authorization(&self) -> Result<String, CratedigError> {
        let state = generate_state();
        let mut record = self.store.load().await?;
        record.pending_state = Some(state.clone());
        self.store.save(record).await?;

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code&state={}",
            self.provider.authorization_endpoint,
            urlencode(&self.provider.client_id),
            urlencode(&self.provider.redirect_uri),
            urlencode(&self.provider.scope),
            state,
        ))
    }

    /// Validate the returned state against the pending one, then exchange
    /// the authorization code for tokens and persist them.
    pub async fn complete_authorization(
        &self,
        code: &str,
        returned_state: &str,
    ) -> Result<TokenRecord, CratedigError> {
        let mut record = self.store.load().await?;
        let pending = record.pending_state.take();
        // A state value is usable at most once: clear it before anything
        // else, on the mismatch path as much as the match path.
        self.store.save(record).await?;

        if pending.as_deref() != Some(returned_state) {
            return Err(CratedigError::CsrfMismatch);
        }

        let resp = self
            .http
            .post(&self.provider.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.provider.redirect_uri.as_str()),
                ("client_id", self.provider.client_id.as_str()),
                ("client_secret", self.provider.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CratedigError::TokenExchangeFailed(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CratedigError::TokenExchangeFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let token_resp: TokenResponse = resp.json().await.map_err(|e| {
            CratedigError::TokenExchangeFailed(format!("unparseable response: {e}"))
        })?;

        let new_record = token_resp.into_record(None);
        self.store.save(new_record.clone()).await?;
        Ok(new_record)
    }

    /// Current access token, refreshing first when missing or expired.
    pub async fn access_token(&self) -> Result<String, CratedigError> {
        let record = self.store.load().await?;
        if let Some(token) = record.access_token.clone() {
            if !record.is_expired() {
                return Ok(token);
            }
        }
        self.refresh(record.access_token.as_deref()).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// `stale` is the access token the caller found unusable. If the store
    /// holds a different, unexpired token by the time the guard is
    /// acquired, a concurrent caller already refreshed — that token is
    /// returned and no second exchange runs.
    pub async fn refresh(&self, stale: Option<&str>) -> Result<String, CratedigError> {
        let _guard = self.refresh_guard.lock().await;

        let record = self.store.load().await?;
        if let Some(token) = record.access_token.clone() {
            if !record.is_expired() && stale != Some(token.as_str()) {
                tracing::debug!("token already refreshed by a concurrent caller");
                return Ok(token);
            }
        }

        let refresh_tok = record
            .refresh_token
            .clone()
            .ok_or(CratedigError::NoRefreshToken)?;

        tracing::debug!("exchanging refresh token");
        let token_resp = match self.exchange_refresh(&refresh_tok).await {
            Ok(resp) => resp,
            Err(e) => {
                // The provider rejected the refresh token. Any remnant
                // credential would send every later call back through this
                // same failing path, so the record is wiped whole.
                self.store.clear().await?;
                return Err(e);
            }
        };

        let access = token_resp.access_token.clone();
        let new_record = token_resp.into_record(Some(refresh_tok));
        self.store.save(new_record).await?;
        Ok(access)
    }

    async fn exchange_refresh(&self, refresh_token: &str) -> Result<TokenResponse, CratedigError> {
        let resp = self
            .http
            .post(&self.provider.token_endpoint)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.provider.client_id.as_str()),
                ("client_secret", self.provider.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CratedigError::RefreshFailed(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CratedigError::RefreshFailed(format!("HTTP {status}: {body}")));
        }

        resp.json()
            .await
            .map_err(|e| CratedigError::RefreshFailed(format!("unparseable response: {e}")))
    }
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::store::MemoryTokenStore;
    use chrono::{Duration, Utc};

    fn session_with_store() -> (OAuthSession, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        let provider = ProviderConfig {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            ..Default::default()
        };
        let session = OAuthSession::new(provider, store.clone() as Arc<dyn TokenStore>);
        (session, store)
    }

    #[test]
    fn urlencode_reserved_chars() {
        assert_eq!(urlencode("a b"), "a%20b");
        assert_eq!(urlencode("http://x/y"), "http%3A%2F%2Fx%2Fy");
        assert_eq!(urlencode("plain-safe_chars.~"), "plain-safe_chars.~");
    }

    #[tokio::test]
    async fn begin_authorization_persists_state_and_builds_url() {
        let (session, store) = session_with_store();
        let url = session.begin_authorization().await.unwrap();

        let record = store.load().await.unwrap();
        let state = record.pending_state.expect("pending_state must be set");

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains(&format!("state={state}")));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
        assert!(url.contains("scope=user-read-private"));
    }

    #[tokio::test]
    async fn begin_authorization_replaces_prior_state() {
        let (session, store) = session_with_store();
        session.begin_authorization().await.unwrap();
        let first = store.load().await.unwrap().pending_state.unwrap();
        session.begin_authorization().await.unwrap();
        let second = store.load().await.unwrap().pending_state.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn callback_state_mismatch_fails_before_network() {
        // The configured token endpoint is unreachable; a mismatch must
        // fail locally without ever attempting the exchange.
        let (session, store) = session_with_store();
        store
            .save(TokenRecord {
                access_token: Some("keep-me".into()),
                refresh_token: Some("keep-me-too".into()),
                pending_state: Some("expected".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = session
            .complete_authorization("code123", "attacker")
            .await
            .unwrap_err();
        assert!(matches!(err, CratedigError::CsrfMismatch));

        let record = store.load().await.unwrap();
        assert!(record.pending_state.is_none(), "state must be consumed");
        assert_eq!(record.access_token.as_deref(), Some("keep-me"));
        assert_eq!(record.refresh_token.as_deref(), Some("keep-me-too"));
    }

    #[tokio::test]
    async fn callback_without_pending_state_fails() {
        let (session, _store) = session_with_store();
        let err = session
            .complete_authorization("code123", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, CratedigError::CsrfMismatch));
    }

    #[tokio::test]
    async fn is_authenticated_reflects_store() {
        let (session, store) = session_with_store();
        assert!(!session.is_authenticated().await.unwrap());

        store
            .save(TokenRecord {
                refresh_token: Some("r".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(session.is_authenticated().await.unwrap());

        session.clear().await.unwrap();
        assert!(!session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn access_token_returns_fresh_token_without_refresh() {
        let (session, store) = session_with_store();
        store
            .save(TokenRecord {
                access_token: Some("fresh".into()),
                expires_at: Some(Utc::now() + Duration::minutes(10)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(session.access_token().await.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_is_terminal() {
        let (session, store) = session_with_store();
        store
            .save(TokenRecord {
                access_token: Some("expired".into()),
                expires_at: Some(Utc::now() - Duration::minutes(10)),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = session.refresh(None).await.unwrap_err();
        assert!(matches!(err, CratedigError::NoRefreshToken));
        // NoRefreshToken is not a provider rejection; the record survives.
        let record = store.load().await.unwrap();
        assert_eq!(record.access_token.as_deref(), Some("expired"));
    }
}
