use crate::config::{discover_config_files, load_config};
use crate::error::CratedigError;

/// Display the effective configuration with the client secret redacted.
pub async fn run_config_show() -> Result<(), CratedigError> {
    let files = discover_config_files(None);
    let mut config = load_config(None)?;

    if !config.provider.client_secret.is_empty() {
        config.provider.client_secret = "<redacted>".to_string();
    }

    match files.first() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none found, using defaults)"),
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_default()
    );
    Ok(())
}
