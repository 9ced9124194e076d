use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};

use crate::error::CratedigError;
use crate::oauth::OAuthSession;

/// An opaque outbound HTTP description. The dispatcher attaches the bearer
/// credential; everything else passes through untouched.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The sole entry point for privileged API calls: pre-flight expiry check,
/// on-demand refresh, one retry on 401, and a uniform terminal error when
/// recovery is impossible.
pub struct Dispatcher {
    session: Arc<OAuthSession>,
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new(session: Arc<OAuthSession>) -> Self {
        Self {
            session,
            client: reqwest::Client::new(),
        }
    }

    pub fn session(&self) -> &Arc<OAuthSession> {
        &self.session
    }

    /// Issue `request` with a valid bearer token attached.
    ///
    /// A 401 is absorbed: one refresh-and-retry cycle, then
    /// `AuthRequired`. Every other response, success or application error,
    /// is returned to the caller unmodified.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<reqwest::Response, CratedigError> {
        // Pre-flight: a missing or expired token is refreshed before the
        // request goes out at all.
        let token = match self.session.access_token().await {
            Ok(token) => token,
            Err(e) => return Err(self.auth_required(e).await),
        };

        let response = self.issue(&request, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // The provider invalidated the token mid-flight. Retry budget is
        // exactly one: a single refresh, a single reissue.
        tracing::debug!(url = %request.url, "unauthorized response, refreshing and retrying once");
        let token = match self.session.refresh(Some(&token)).await {
            Ok(token) => token,
            Err(e) => return Err(self.auth_required(e).await),
        };

        let retry = self.issue(&request, &token).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            // Refresh succeeded yet the provider still rejects the token;
            // the credentials are useless. Leave the record in the stable
            // Unauthenticated state rather than half-valid.
            self.session.clear().await?;
            let cause = CratedigError::RequestFailed(
                "request unauthorized after a fresh token".to_string(),
            );
            return Err(self.auth_required(cause).await);
        }

        Ok(retry)
    }

    async fn issue(
        &self,
        request: &ApiRequest,
        token: &str,
    ) -> Result<reqwest::Response, CratedigError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                CratedigError::RequestFailed(format!("invalid header name '{key}': {e}"))
            })?;
            let val = HeaderValue::from_str(value).map_err(|e| {
                CratedigError::RequestFailed(format!("invalid header value for '{key}': {e}"))
            })?;
            headers.insert(name, val);
        }

        let mut req = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(headers)
            .bearer_auth(token);
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        req.send()
            .await
            .map_err(|e| CratedigError::RequestFailed(e.to_string()))
    }

    /// Terminal authentication failure. A fresh authorization is initiated
    /// as a side effect so the caller need not special-case "never
    /// authenticated" against "expired and unrefreshable".
    async fn auth_required(&self, cause: CratedigError) -> CratedigError {
        tracing::warn!("authentication required: {cause}");
        let authorize_url = match self.session.begin_authorization().await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("could not initiate re-authorization: {e}");
                None
            }
        };
        CratedigError::AuthRequired { authorize_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::oauth::{MemoryTokenStore, TokenStore};

    fn dispatcher_with_store() -> (Dispatcher, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        let provider = ProviderConfig {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            ..Default::default()
        };
        let session = OAuthSession::new(provider, store.clone() as Arc<dyn TokenStore>);
        (Dispatcher::new(Arc::new(session)), store)
    }

    #[test]
    fn request_builders() {
        let req = ApiRequest::get("https://api.example.com/v1/me");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url, "https://api.example.com/v1/me");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());

        let req = ApiRequest::post("https://api.example.com/v1/playlists")
            .header("X-Request-Id", "42")
            .json(serde_json::json!({"name": "Crate Digs"}));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.headers, vec![("X-Request-Id".to_string(), "42".to_string())]);
        assert_eq!(req.body.unwrap()["name"], "Crate Digs");
    }

    #[tokio::test]
    async fn dispatch_on_empty_store_is_auth_required() {
        let (dispatcher, store) = dispatcher_with_store();
        let err = dispatcher
            .dispatch(ApiRequest::get("https://api.example.com/v1/me"))
            .await
            .unwrap_err();

        assert!(matches!(err, CratedigError::AuthRequired { .. }));
        // The fallback re-authorization minted and stored a fresh state.
        let url = err.authorize_url().expect("authorize url should be carried");
        assert!(url.contains("response_type=code"));
        let record = store.load().await.unwrap();
        assert!(record.pending_state.is_some());
    }
}
