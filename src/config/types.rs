use serde::{Deserialize, Serialize};

fn default_authorization_endpoint() -> String {
    "https://accounts.spotify.com/authorize".to_string()
}

fn default_token_endpoint() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_redirect_uri() -> String {
    "http://127.0.0.1:8888/callback".to_string()
}

fn default_scope() -> String {
    "user-read-private user-read-email playlist-read-private \
     playlist-modify-public playlist-modify-private user-top-read"
        .to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CratedigConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// OAuth2 provider coordinates. Endpoint defaults point at the public
/// Spotify service; only the client credentials are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, rename = "clientId")]
    pub client_id: String,
    #[serde(default, rename = "clientSecret")]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri", rename = "redirectUri")]
    pub redirect_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_authorization_endpoint", rename = "authorizationEndpoint")]
    pub authorization_endpoint: String,
    #[serde(default = "default_token_endpoint", rename = "tokenEndpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_api_base_url", rename = "apiBaseUrl")]
    pub api_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            scope: default_scope(),
            authorization_endpoint: default_authorization_endpoint(),
            token_endpoint: default_token_endpoint(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl ProviderConfig {
    /// The loopback port the provider redirects back to, parsed from the
    /// redirect URI.
    pub fn redirect_port(&self) -> Option<u16> {
        let rest = self
            .redirect_uri
            .strip_prefix("http://")
            .or_else(|| self.redirect_uri.strip_prefix("https://"))?;
        let authority = rest.split('/').next()?;
        let port = authority.rsplit(':').next()?;
        port.parse().ok()
    }
}
