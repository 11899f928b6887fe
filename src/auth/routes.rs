/// Authentication Routes
///
/// HTTP route handlers for the OAuth2 login flow: the provider callback and
/// the single-record user directory. The callback always answers with a
/// redirect to `/`; detailed failures stay in the logs and only coarse error
/// codes reach the browser.
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::directory::{CURRENT_USER_KEY, DirectoryRecord, DirectoryStore, UpsertUser};
use crate::auth::error::AuthError;
use crate::auth::provider::GoogleAuthClient;
use crate::auth::session::Session;

/// Shared state for the auth routes
pub struct AuthState {
    pub google: GoogleAuthClient,
    pub directory: Arc<dyn DirectoryStore>,
}

/// OAuth2 callback parameters
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code from provider
    code: Option<String>,

    /// Error from provider
    error: Option<String>,
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Redirect target for a failed login attempt
fn error_redirect(err: &AuthError) -> Redirect {
    Redirect::temporary(&format!("/?error={}", err.redirect_code()))
}

/// Run the exchange-then-fetch sequence and produce the success redirect
/// target. Any failure aborts the whole attempt; no partial session is ever
/// emitted.
async fn complete_login(google: &GoogleAuthClient, code: &str) -> Result<String, AuthError> {
    let tokens = google.exchange_code(code).await?;
    let user = google.fetch_user_info(&tokens.access_token).await?;
    let session = Session::new(user, tokens);

    // The session payload is percent-encoded by the codec and again by the
    // query layer; clients undo both layers in turn.
    let encoded = session.encode()?;
    Ok(format!(
        "/?auth_success=true&session={}",
        urlencoding::encode(&encoded)
    ))
}

/// GET /api/auth/callback/google
///
/// Invoked by the provider's redirect with either `code` or `error`.
async fn google_callback(
    State(state): State<Arc<AuthState>>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    if let Some(provider_error) = params.error {
        warn!("OAuth error from provider: {}", provider_error);
        return error_redirect(&AuthError::ProviderError(provider_error));
    }

    let Some(code) = params.code else {
        warn!("no authorization code in callback");
        return error_redirect(&AuthError::MissingCode);
    };

    match complete_login(&state.google, &code).await {
        Ok(target) => {
            info!("login completed, relaying session to client");
            Redirect::temporary(&target)
        }
        Err(e) => {
            error!("OAuth callback failed: {}", e);
            error_redirect(&e)
        }
    }
}

/// Response body for a successful directory upsert
#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub message: String,
    pub user: DirectoryRecord,
    pub timestamp: DateTime<Utc>,
}

/// Response body for the current-user query
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub current_user: Option<DirectoryRecord>,
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_time: Option<DateTime<Utc>>,
}

/// Response body for directory deletion
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Required-field check; empty strings count as missing.
fn required(field: &Option<String>) -> Option<String> {
    field.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

/// POST /api/auth/user — overwrite the single directory slot
async fn upsert_user(
    State(state): State<Arc<AuthState>>,
    Json(body): Json<UpsertUser>,
) -> Response {
    let (Some(email), Some(name), Some(google_id)) = (
        required(&body.email),
        required(&body.name),
        required(&body.google_id),
    ) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: email, name, googleId",
        );
    };

    let record = DirectoryRecord::new(email, name, body.picture.clone(), google_id);

    match state.directory.put(CURRENT_USER_KEY, record.clone()).await {
        Ok(()) => {
            info!("directory record updated for {}", record.email);
            Json(UpsertResponse {
                message: "User login processed successfully".to_string(),
                user: record,
                timestamp: Utc::now(),
            })
            .into_response()
        }
        Err(e) => {
            error!("directory upsert failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// GET /api/auth/user — return the current record and a login flag
async fn current_user(State(state): State<Arc<AuthState>>) -> Response {
    match state.directory.get(CURRENT_USER_KEY).await {
        Ok(record) => {
            let login_time = record.as_ref().map(|r| r.login_time);
            Json(CurrentUserResponse {
                is_logged_in: record.is_some(),
                current_user: record,
                login_time,
            })
            .into_response()
        }
        Err(e) => {
            error!("directory lookup failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// DELETE /api/auth/user — clear the directory slot
async fn clear_user(State(state): State<Arc<AuthState>>) -> Response {
    match state.directory.delete(CURRENT_USER_KEY).await {
        Ok(()) => Json(MessageResponse {
            message: "User logged out successfully".to_string(),
        })
        .into_response(),
        Err(e) => {
            error!("directory clear failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Create the authentication router with all routes
pub fn create_auth_router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/auth/callback/google", get(google_callback))
        .route(
            "/api/auth/user",
            get(current_user).post(upsert_user).delete(clear_user),
        )
        .with_state(state)
}
