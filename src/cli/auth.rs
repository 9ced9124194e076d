use std::sync::Arc;
use std::time::Duration;

use crate::config::{load_config, require_credentials};
use crate::error::CratedigError;
use crate::oauth::{listen_for_callback, FileTokenStore, OAuthSession, TokenStore};

use super::output::{print_profile, resolve_output_mode};

/// Run the full browser authorization flow.
pub async fn run_auth(timeout: Duration) -> Result<(), CratedigError> {
    let config = load_config(None)?;
    require_credentials(&config)?;
    let port = config
        .provider
        .redirect_port()
        .ok_or_else(|| CratedigError::ConfigError {
            path: std::path::PathBuf::from("<config>"),
            detail: "redirectUri must name an explicit loopback port".to_string(),
        })?;

    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::open_default());
    let session = OAuthSession::new(config.provider, store);

    // 1. Mint the state and build the authorization URL
    let auth_url = session.begin_authorization().await?;

    // 2. Hand control to the provider via the user's browser
    if webbrowser::open(&auth_url).is_err() {
        tracing::warn!("Could not open browser automatically. Please visit:\n{auth_url}");
    }

    // 3. Wait for the redirect, then finish the exchange
    println!("Waiting for the provider redirect on 127.0.0.1:{port}...");
    let params = listen_for_callback(port, timeout).await?;
    let record = session
        .complete_authorization(&params.code, &params.state)
        .await?;

    println!("Authentication successful");
    if let Some(expires) = record.expires_at {
        println!("Token expires: {expires}");
    }
    Ok(())
}

pub async fn run_logout() -> Result<(), CratedigError> {
    let store = FileTokenStore::open_default();
    store.clear().await?;
    println!("Signed out; stored tokens removed");
    Ok(())
}

/// Report whether stored credentials exist. No network I/O — expiry is
/// resolved lazily when a request actually goes out.
pub async fn run_status(json: bool) -> Result<(), CratedigError> {
    let store = FileTokenStore::open_default();
    let record = store.load().await?;

    if json {
        let status = serde_json::json!({
            "authenticated": record.is_authenticated(),
            "expiresAt": record.expires_at,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_default()
        );
        return Ok(());
    }

    if record.is_authenticated() {
        println!("Authenticated");
        match record.expires_at {
            Some(expires) => println!("Access token expires: {expires}"),
            None => println!("Access token will be refreshed on first use"),
        }
    } else {
        println!("Not authenticated. Run: cratedig auth");
    }
    Ok(())
}

pub async fn run_whoami(json: bool) -> Result<(), CratedigError> {
    let client = crate::client_from_config()?;
    let user = client.current_user().await?;
    print_profile(&user, resolve_output_mode(json));
    Ok(())
}
