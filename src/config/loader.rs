use std::path::{Path, PathBuf};

use crate::error::CratedigError;

use super::env::expand_provider_config;
use super::types::CratedigConfig;

/// Discover config files in precedence order (highest first).
///
/// Precedence:
/// 1. `--config` CLI flag
/// 2. `CRATEDIG_CONFIG` env var
/// 3. `./config/cratedig.json` (project-level)
/// 4. `~/.cratedig/config.json` (home-level)
pub fn discover_config_files(cli_config: Option<&str>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(path) = cli_config {
        let p = PathBuf::from(path);
        if p.exists() {
            files.push(p);
        }
    }

    if let Ok(env_path) = std::env::var("CRATEDIG_CONFIG") {
        let p = PathBuf::from(&env_path);
        if p.exists() && !files.contains(&p) {
            files.push(p);
        }
    }

    let project_config = PathBuf::from("./config/cratedig.json");
    if project_config.exists() && !files.contains(&project_config) {
        files.push(project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".cratedig").join("config.json");
        if home_config.exists() && !files.contains(&home_config) {
            files.push(home_config);
        }
    }

    files
}

/// Load the highest-precedence config file (or defaults when none exists),
/// apply `CRATEDIG_*` env overrides, and expand `${VAR}` references.
pub fn load_config(cli_config: Option<&str>) -> Result<CratedigConfig, CratedigError> {
    let mut config = match discover_config_files(cli_config).first() {
        Some(path) => read_config_file(path)?,
        None => CratedigConfig::default(),
    };

    // Direct env overrides beat file contents.
    if let Ok(id) = std::env::var("CRATEDIG_CLIENT_ID") {
        if !id.is_empty() {
            config.provider.client_id = id;
        }
    }
    if let Ok(secret) = std::env::var("CRATEDIG_CLIENT_SECRET") {
        if !secret.is_empty() {
            config.provider.client_secret = secret;
        }
    }
    if let Ok(uri) = std::env::var("CRATEDIG_REDIRECT_URI") {
        if !uri.is_empty() {
            config.provider.redirect_uri = uri;
        }
    }

    expand_provider_config(&mut config.provider)?;
    Ok(config)
}

/// Fail when the loaded config carries no client credentials. Commands
/// that never talk to the provider (e.g. `config show`) skip this.
pub fn require_credentials(config: &CratedigConfig) -> Result<(), CratedigError> {
    if config.provider.client_id.is_empty() || config.provider.client_secret.is_empty() {
        return Err(CratedigError::ConfigError {
            path: discover_config_files(None)
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from("~/.cratedig/config.json")),
            detail: "clientId and clientSecret are required; set them in the config file \
                     or via CRATEDIG_CLIENT_ID / CRATEDIG_CLIENT_SECRET"
                .to_string(),
        });
    }
    Ok(())
}

fn read_config_file(path: &Path) -> Result<CratedigConfig, CratedigError> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| CratedigError::ConfigError {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
