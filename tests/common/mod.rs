use std::sync::Arc;

use chrono::{Duration, Utc};
use cratedig::config::ProviderConfig;
use cratedig::oauth::{MemoryTokenStore, OAuthSession, TokenRecord, TokenStore};
use cratedig::Dispatcher;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Provider config with every endpoint pointed at the mock server.
#[allow(dead_code)]
pub fn mock_provider(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
        authorization_endpoint: format!("{}/authorize", server.uri()),
        token_endpoint: format!("{}/api/token", server.uri()),
        api_base_url: format!("{}/v1", server.uri()),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn session_with(server: &MockServer) -> (Arc<OAuthSession>, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let session = Arc::new(OAuthSession::new(
        mock_provider(server),
        store.clone() as Arc<dyn TokenStore>,
    ));
    (session, store)
}

#[allow(dead_code)]
pub fn dispatcher_with(server: &MockServer) -> (Dispatcher, Arc<MemoryTokenStore>) {
    let (session, store) = session_with(server);
    (Dispatcher::new(session), store)
}

/// A record whose access token expired an hour ago.
#[allow(dead_code)]
pub fn expired_record(access: &str, refresh: &str) -> TokenRecord {
    TokenRecord {
        access_token: Some(access.into()),
        refresh_token: Some(refresh.into()),
        expires_at: Some(Utc::now() - Duration::hours(1)),
        pending_state: None,
    }
}

/// A record good for another ten minutes.
#[allow(dead_code)]
pub fn fresh_record(access: &str, refresh: &str) -> TokenRecord {
    TokenRecord {
        access_token: Some(access.into()),
        refresh_token: Some(refresh.into()),
        expires_at: Some(Utc::now() + Duration::minutes(10)),
        pending_state: None,
    }
}

/// Token endpoint success body.
#[allow(dead_code)]
pub fn token_json(access: &str, refresh: Option<&str>, expires_in: i64) -> serde_json::Value {
    let mut body = serde_json::json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": expires_in,
    });
    if let Some(r) = refresh {
        body["refresh_token"] = serde_json::json!(r);
    }
    body
}

/// Mount a token-endpoint mock for `grant_type=authorization_code`.
#[allow(dead_code)]
pub async fn mount_code_exchange(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

/// Mount a token-endpoint mock for `grant_type=refresh_token`.
#[allow(dead_code)]
pub async fn mount_refresh(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}
