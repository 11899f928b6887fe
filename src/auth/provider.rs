/// Google OAuth2 provider client
///
/// Implements the authorization-code flow against Google: authorization URL
/// generation, code-for-token exchange and userinfo retrieval. Tokens are
/// treated as opaque; the ID token is carried but never decoded or verified.
use crate::auth::error::AuthError;
use serde::{Deserialize, Serialize};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// User profile as issued by the provider's userinfo endpoint.
///
/// Fields are mapped verbatim; a field the provider omits stays absent and is
/// dropped again on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

/// Token set returned by the token endpoint.
///
/// Opaque to this crate except for `expires_in`, which feeds session expiry.
/// Unknown response fields are ignored; nothing beyond the structural parse
/// is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds, relative to issuance
    pub expires_in: u64,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

/// Token endpoint request body (form-encoded)
#[derive(Debug, Serialize)]
struct TokenRequest {
    code: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    grant_type: String,
}

/// Configuration for the Google client
///
/// Endpoint overrides exist so tests can point the client at a local mock
/// provider; production use leaves them unset.
#[derive(Debug, Clone)]
pub struct GoogleClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: Option<String>,
    pub token_url: Option<String>,
    pub userinfo_url: Option<String>,
}

impl From<&crate::config::Config> for GoogleClientConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            auth_url: None,
            token_url: None,
            userinfo_url: None,
        }
    }
}

/// Google OAuth2 client
pub struct GoogleAuthClient {
    config: GoogleClientConfig,
    http_client: reqwest::Client,
}

impl GoogleAuthClient {
    pub fn new(config: GoogleClientConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Generate the authorization URL the browser is sent to for login.
    ///
    /// `access_type=offline` and `prompt=consent` ask Google for a refresh
    /// token on every consent round trip.
    pub fn authorization_url(&self) -> Result<String, AuthError> {
        let auth_url = self.config.auth_url.as_deref().unwrap_or(GOOGLE_AUTH_URL);

        let mut url = url::Url::parse(auth_url)
            .map_err(|e| AuthError::ConfigError(format!("Invalid auth URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            query.append_pair("response_type", "code");
            query.append_pair("scope", "openid email profile");
            query.append_pair("access_type", "offline");
            query.append_pair("prompt", "consent");
        }

        Ok(url.to_string())
    }

    /// Exchange an authorization code for a token set.
    ///
    /// Codes are single-use, so a non-success status is fatal for the login
    /// attempt; the error carries the provider's status text.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        let token_url = self.config.token_url.as_deref().unwrap_or(GOOGLE_TOKEN_URL);

        let token_request = TokenRequest {
            code: code.to_string(),
            client_id: self.config.client_id.clone(),
            client_secret: self.config.client_secret.clone(),
            redirect_uri: self.config.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
        };

        let response = self
            .http_client
            .post(token_url)
            .form(&token_request)
            .send()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AuthError::CodeExchangeFailed(
                status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string(),
            ));
        }

        let tokens: TokenSet = response
            .json()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(format!("invalid token response: {}", e)))?;

        Ok(tokens)
    }

    /// Fetch the user profile with a bearer access token.
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        let userinfo_url = self
            .config
            .userinfo_url
            .as_deref()
            .unwrap_or(GOOGLE_USERINFO_URL);

        let response = self
            .http_client
            .get(userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfoFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AuthError::UserInfoFailed(
                status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string(),
            ));
        }

        let profile: UserProfile = response
            .json()
            .await
            .map_err(|e| AuthError::UserInfoFailed(format!("invalid userinfo response: {}", e)))?;

        Ok(profile)
    }
}
