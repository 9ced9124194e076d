use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CratedigError {
    #[error("Returned state does not match the pending authorization")]
    CsrfMismatch,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Authentication required. Run: cratedig auth")]
    AuthRequired { authorize_url: Option<String> },

    #[error("Error in config {}: {detail}", path.display())]
    ConfigError { path: PathBuf, detail: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected response: {0}")]
    MalformedResponse(String),

    #[error("Token store error: {0}")]
    StoreError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CratedigError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CratedigError::CsrfMismatch => "csrf_mismatch",
            CratedigError::TokenExchangeFailed(_) => "token_exchange_failed",
            CratedigError::RefreshFailed(_) => "refresh_failed",
            CratedigError::NoRefreshToken => "no_refresh_token",
            CratedigError::AuthRequired { .. } => "auth_required",
            CratedigError::ConfigError { .. } => "config_error",
            CratedigError::RequestFailed(_) => "request_failed",
            CratedigError::MalformedResponse(_) => "malformed_response",
            CratedigError::StoreError(_) => "store_error",
            CratedigError::IoError(_) => "io_error",
        }
    }

    /// The freshly minted authorization URL, when re-authorization was
    /// triggered as part of this failure.
    pub fn authorize_url(&self) -> Option<&str> {
        match self {
            CratedigError::AuthRequired { authorize_url } => authorize_url.as_deref(),
            _ => None,
        }
    }

    /// Produce a structured JSON error object for `--json` output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        if let Some(url) = self.authorize_url() {
            obj.insert("authorizeUrl".into(), serde_json::Value::String(url.to_string()));
        }
        serde_json::json!({ "error": obj })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_csrf_mismatch() {
        let err = CratedigError::CsrfMismatch;
        assert_eq!(
            err.to_string(),
            "Returned state does not match the pending authorization"
        );
    }

    #[test]
    fn display_token_exchange_failed() {
        let err = CratedigError::TokenExchangeFailed("HTTP 400: invalid_grant".into());
        assert_eq!(
            err.to_string(),
            "Token exchange failed: HTTP 400: invalid_grant"
        );
    }

    #[test]
    fn display_no_refresh_token() {
        let err = CratedigError::NoRefreshToken;
        assert_eq!(err.to_string(), "No refresh token available");
    }

    #[test]
    fn display_auth_required() {
        let err = CratedigError::AuthRequired {
            authorize_url: None,
        };
        assert_eq!(err.to_string(), "Authentication required. Run: cratedig auth");
    }

    #[test]
    fn display_config_error() {
        let err = CratedigError::ConfigError {
            path: PathBuf::from("/home/user/.cratedig/config.json"),
            detail: "invalid JSON".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error in config /home/user/.cratedig/config.json: invalid JSON"
        );
    }

    #[test]
    fn error_code_mapping_all_variants() {
        assert_eq!(CratedigError::CsrfMismatch.code(), "csrf_mismatch");
        assert_eq!(
            CratedigError::TokenExchangeFailed("x".into()).code(),
            "token_exchange_failed"
        );
        assert_eq!(
            CratedigError::RefreshFailed("x".into()).code(),
            "refresh_failed"
        );
        assert_eq!(CratedigError::NoRefreshToken.code(), "no_refresh_token");
        assert_eq!(
            CratedigError::AuthRequired {
                authorize_url: None
            }
            .code(),
            "auth_required"
        );
        assert_eq!(
            CratedigError::ConfigError {
                path: PathBuf::from("/a"),
                detail: "d".into()
            }
            .code(),
            "config_error"
        );
        assert_eq!(
            CratedigError::RequestFailed("e".into()).code(),
            "request_failed"
        );
        assert_eq!(
            CratedigError::MalformedResponse("e".into()).code(),
            "malformed_response"
        );
        assert_eq!(CratedigError::StoreError("e".into()).code(), "store_error");
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test");
        assert_eq!(CratedigError::IoError(io_err).code(), "io_error");
    }

    #[test]
    fn authorize_url_accessor() {
        let err = CratedigError::AuthRequired {
            authorize_url: Some("https://accounts.example.com/authorize?x=1".into()),
        };
        assert_eq!(
            err.authorize_url(),
            Some("https://accounts.example.com/authorize?x=1")
        );
        assert_eq!(CratedigError::CsrfMismatch.authorize_url(), None);
    }

    #[test]
    fn error_to_json_structure() {
        let err = CratedigError::AuthRequired {
            authorize_url: Some("https://accounts.example.com/authorize".into()),
        };
        let json = err.to_json();
        let error_obj = json.get("error").expect("should have error key");
        assert_eq!(error_obj["code"], "auth_required");
        assert_eq!(
            error_obj["authorizeUrl"],
            "https://accounts.example.com/authorize"
        );
        assert!(error_obj["message"].as_str().unwrap().contains("cratedig auth"));
    }

    #[test]
    fn error_to_json_without_url() {
        let err = CratedigError::RefreshFailed("HTTP 400".into());
        let json = err.to_json();
        let error_obj = json.get("error").unwrap();
        assert_eq!(error_obj["code"], "refresh_failed");
        assert!(error_obj.get("authorizeUrl").is_none());
    }
}
