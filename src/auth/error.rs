// Authentication Error Types
// Error taxonomy for the OAuth2 login flow, session codec and user directory

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    // Provider-reported errors
    #[error("OAuth2 provider returned an error: {0}")]
    ProviderError(String),

    #[error("Authorization code missing from callback")]
    MissingCode,

    #[error("OAuth2 code exchange failed: {0}")]
    CodeExchangeFailed(String),

    #[error("Failed to retrieve user info: {0}")]
    UserInfoFailed(String),

    // Session codec errors
    #[error("Malformed session payload: {0}")]
    DecodeError(String),

    // Directory errors
    #[error("Directory error: {0}")]
    DirectoryError(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Network/HTTP errors
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Provider communication timeout")]
    Timeout,
}

// Conversion from reqwest errors
impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::HttpError(err.to_string())
        }
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::JsonError(err.to_string())
    }
}

impl AuthError {
    /// HTTP status code mapping for error responses
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::ProviderError(_)
            | AuthError::MissingCode
            | AuthError::DecodeError(_)
            | AuthError::DirectoryError(_) => 400,

            AuthError::CodeExchangeFailed(_)
            | AuthError::UserInfoFailed(_)
            | AuthError::HttpError(_) => 502,

            AuthError::ConfigError(_) | AuthError::JsonError(_) => 500,

            AuthError::Timeout => 504,
        }
    }

    /// Coarse error code carried on the callback redirect.
    ///
    /// Only these codes ever reach the browser; provider detail stays in the
    /// server logs.
    pub fn redirect_code(&self) -> &'static str {
        match self {
            AuthError::ProviderError(_) => "oauth_error",
            AuthError::MissingCode => "no_code",
            _ => "auth_failed",
        }
    }
}
