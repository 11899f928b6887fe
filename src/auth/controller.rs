// Client Auth Controller
// Browser-side state owner for the login flow, expressed over a Platform
// capability so the state machine runs (and tests) without a browser.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::error::AuthError;
use super::directory::UpsertUser;
use super::provider::UserProfile;
use super::session::{SESSION_STORAGE_KEY, Session};

/// Host environment capability: storage, URL inspection and navigation.
///
/// A browser runtime maps these onto `localStorage`, `location` and
/// `history`; tests use an in-memory implementation.
pub trait Platform: Send + Sync {
    fn read_storage(&self, key: &str) -> Option<String>;
    fn write_storage(&self, key: &str, value: &str);
    fn remove_storage(&self, key: &str);

    /// Full current URL including the query string
    fn current_url(&self) -> String;

    /// History-replace to `url` without navigating
    fn rewrite_url(&self, url: &str);

    /// Full-page navigation
    fn navigate(&self, url: &str);

    /// Full-page reload
    fn reload(&self);
}

impl<P: Platform + ?Sized> Platform for Arc<P> {
    fn read_storage(&self, key: &str) -> Option<String> {
        (**self).read_storage(key)
    }
    fn write_storage(&self, key: &str, value: &str) {
        (**self).write_storage(key, value)
    }
    fn remove_storage(&self, key: &str) {
        (**self).remove_storage(key)
    }
    fn current_url(&self) -> String {
        (**self).current_url()
    }
    fn rewrite_url(&self, url: &str) {
        (**self).rewrite_url(url)
    }
    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }
    fn reload(&self) {
        (**self).reload()
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Parses a query string into a map of key-value pairs
fn parse_query_string(query: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str(query).unwrap_or_default()
}

/// Owns authentication state on the client: reconciles stored sessions with
/// inbound callback payloads and exposes login/logout to the UI.
pub struct AuthController<P: Platform> {
    platform: P,
    http: reqwest::Client,
    /// Provider authorization URL used by `login()`
    auth_url: String,
    /// Origin of the same-origin API (directory endpoints)
    api_base: String,
    status: AuthStatus,
    user: Option<UserProfile>,
}

impl<P: Platform> AuthController<P> {
    pub fn new(platform: P, auth_url: String, api_base: String) -> Self {
        Self {
            platform,
            // No timeout: the directory is diagnostic and a slow upsert is
            // tolerated rather than cancelled
            http: reqwest::Client::new(),
            auth_url,
            api_base: api_base.trim_end_matches('/').to_string(),
            status: AuthStatus::Initializing,
            user: None,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status == AuthStatus::Initializing
    }

    /// Run the mount sequence once: stored-session check, then callback-URL
    /// check. Both run every time; when both find a session the freshly
    /// decoded callback payload wins.
    pub async fn initialize(&mut self) {
        match self.read_stored_session() {
            Some(session) => {
                self.user = Some(session.user);
                self.status = AuthStatus::Authenticated;
            }
            None => {
                self.status = AuthStatus::Unauthenticated;
            }
        }

        self.handle_callback_url().await;
    }

    /// Navigate to the provider's authorization URL. Full-page navigation;
    /// nothing here awaits the result.
    pub fn login(&self) {
        self.platform.navigate(&self.auth_url);
    }

    /// Best-effort server-side clear, then local teardown and a full reload.
    pub async fn logout(&mut self) {
        if let Err(e) = self
            .http
            .delete(format!("{}/api/auth/user", self.api_base))
            .send()
            .await
        {
            warn!("failed to clear directory record: {}", e);
        }

        self.platform.remove_storage(SESSION_STORAGE_KEY);
        self.user = None;
        self.status = AuthStatus::Unauthenticated;
        self.platform.reload();
    }

    /// Re-read client storage and reconcile state with whatever is there now.
    pub fn refresh_session(&mut self) {
        match self.read_stored_session() {
            Some(session) => {
                self.user = Some(session.user);
                self.status = AuthStatus::Authenticated;
            }
            None => {
                self.user = None;
                self.status = AuthStatus::Unauthenticated;
            }
        }
    }

    /// Stored session, if present and unexpired. An expired session is
    /// removed on read (lazy expiry; nothing sweeps storage).
    fn read_stored_session(&self) -> Option<Session> {
        let raw = self.platform.read_storage(SESSION_STORAGE_KEY)?;
        match Session::from_json(&raw) {
            Ok(session) if session.is_expired() => {
                debug!("stored session expired, removing");
                self.platform.remove_storage(SESSION_STORAGE_KEY);
                None
            }
            Ok(session) => Some(session),
            Err(e) => {
                warn!("ignoring unreadable stored session: {}", e);
                None
            }
        }
    }

    /// Inspect the current URL for an inbound callback payload or error.
    async fn handle_callback_url(&mut self) {
        let current = self.platform.current_url();
        let Ok(url) = url::Url::parse(&current) else {
            debug!("current URL not parseable, skipping callback check");
            return;
        };

        let query = parse_query_string(url.query().unwrap_or(""));

        if query.get("auth_success").map(String::as_str) == Some("true") {
            if let Some(raw) = query.get("session") {
                match self.accept_callback_session(raw) {
                    Ok(()) => self.strip_query(&url),
                    Err(e) => error!("error processing auth callback: {}", e),
                }
            }
        }

        if let Some(provider_error) = query.get("error") {
            error!("auth error: {}", provider_error);
            self.strip_query(&url);
        }
    }

    /// Decode, persist and adopt a callback session, then kick off the
    /// directory upsert.
    fn accept_callback_session(&mut self, raw: &str) -> Result<(), AuthError> {
        let session = Session::decode(raw)?;

        self.platform
            .write_storage(SESSION_STORAGE_KEY, &session.to_json()?);
        self.user = Some(session.user.clone());
        self.status = AuthStatus::Authenticated;

        self.spawn_directory_upsert(session.user);
        Ok(())
    }

    /// Fire-and-forget upsert into the server-side directory. Failures are
    /// logged, never surfaced: the directory is not authoritative and a stale
    /// record is tolerated. No timeout, no retry.
    fn spawn_directory_upsert(&self, user: UserProfile) {
        let http = self.http.clone();
        let endpoint = format!("{}/api/auth/user", self.api_base);

        tokio::spawn(async move {
            let body = UpsertUser {
                email: Some(user.email),
                name: Some(user.name),
                picture: user.picture,
                google_id: Some(user.id),
            };

            match http.post(&endpoint).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("directory upsert completed");
                }
                Ok(response) => {
                    warn!("directory upsert rejected: {}", response.status());
                }
                Err(e) => {
                    warn!("directory upsert failed: {}", e);
                }
            }
        });
    }

    /// History-replace to the bare origin + path, dropping the query.
    fn strip_query(&self, url: &url::Url) {
        let clean = format!("{}{}", url.origin().ascii_serialization(), url.path());
        self.platform.rewrite_url(&clean);
    }
}
