use crate::error::CratedigError;

use super::types::ProviderConfig;

/// Expand `${VAR}` and `${VAR:-fallback}` references in a string.
///
/// An unset variable without a fallback is an error; an empty variable
/// takes the fallback when one is given.
pub fn expand_env_vars(input: &str) -> Result<String, CratedigError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            env_error(&format!("Unclosed variable reference: ${{{after}"))
        })?;
        let expr = &after[..end];

        if let Some((name, fallback)) = expr.split_once(":-") {
            match std::env::var(name) {
                Ok(val) if !val.is_empty() => result.push_str(&val),
                _ => result.push_str(fallback),
            }
        } else {
            let val = std::env::var(expr).map_err(|_| {
                env_error(&format!("Environment variable '{expr}' is not set"))
            })?;
            result.push_str(&val);
        }

        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Expand environment variables in every string field of a ProviderConfig.
pub fn expand_provider_config(config: &mut ProviderConfig) -> Result<(), CratedigError> {
    config.client_id = expand_env_vars(&config.client_id)?;
    config.client_secret = expand_env_vars(&config.client_secret)?;
    config.redirect_uri = expand_env_vars(&config.redirect_uri)?;
    config.scope = expand_env_vars(&config.scope)?;
    config.authorization_endpoint = expand_env_vars(&config.authorization_endpoint)?;
    config.token_endpoint = expand_env_vars(&config.token_endpoint)?;
    config.api_base_url = expand_env_vars(&config.api_base_url)?;
    Ok(())
}

fn env_error(detail: &str) -> CratedigError {
    CratedigError::ConfigError {
        path: std::path::PathBuf::from("<env>"),
        detail: detail.to_string(),
    }
}
