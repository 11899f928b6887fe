// Session model and codec
// The session is owned by the browser. The server only builds a transient
// instance to embed in the callback redirect; it keeps no copy afterwards.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::provider::{TokenSet, UserProfile};

/// Client storage slot holding the serialized session
pub const SESSION_STORAGE_KEY: &str = "google_auth_session";

/// One login's worth of state: profile, tokens and an absolute expiry.
///
/// The full token set rides along, including any ID token, and transits the
/// callback redirect as a query parameter. That exposes tokens to browser
/// history, referrers and server logs; the shape is kept for compatibility
/// with existing clients (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub tokens: TokenSet,
    /// Absolute expiry, milliseconds since the Unix epoch
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

impl Session {
    /// Build a session expiring `tokens.expires_in` seconds from now.
    pub fn new(user: UserProfile, tokens: TokenSet) -> Self {
        let expires_at = Utc::now().timestamp_millis() + tokens.expires_in as i64 * 1000;
        Self {
            user,
            tokens,
            expires_at,
        }
    }

    /// Expiry is lazy: readers must treat an expired session as absent.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp_millis()
    }

    /// Serialize to the client-storage form (plain JSON).
    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string(self).map_err(|e| AuthError::DecodeError(e.to_string()))
    }

    /// Deserialize from the client-storage form.
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        serde_json::from_str(raw).map_err(|e| AuthError::DecodeError(e.to_string()))
    }

    /// Serialize to the transport form: percent-encoded JSON.
    ///
    /// The callback redirect applies ordinary query-pair encoding on top of
    /// this, so the wire value is encoded twice; [`Session::decode`] is the
    /// inverse of this step only, applied after the query layer has decoded
    /// once.
    pub fn encode(&self) -> Result<String, AuthError> {
        Ok(urlencoding::encode(&self.to_json()?).into_owned())
    }

    /// Deserialize from the transport form.
    pub fn decode(raw: &str) -> Result<Self, AuthError> {
        let json = urlencoding::decode(raw).map_err(|e| AuthError::DecodeError(e.to_string()))?;
        Self::from_json(&json)
    }
}
