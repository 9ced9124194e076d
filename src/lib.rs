pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod oauth;

pub use api::MusicClient;
pub use config::{load_config, CratedigConfig, ProviderConfig};
pub use dispatch::{ApiRequest, Dispatcher};
pub use error::CratedigError;
pub use oauth::{FileTokenStore, MemoryTokenStore, OAuthSession, TokenRecord, TokenStore};

use std::sync::Arc;

/// Build an authenticated API client from the merged configuration and the
/// default on-disk token store.
pub fn client_from_config() -> Result<MusicClient, CratedigError> {
    let config = config::load_config(None)?;
    config::require_credentials(&config)?;
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::open_default());
    let session = Arc::new(OAuthSession::new(config.provider, store));
    Ok(MusicClient::new(Dispatcher::new(session)))
}
