#![allow(dead_code)]
/// Shared test fixtures: a mock identity provider and an app server bound to
/// an ephemeral port. The mock replaces Google's token and userinfo
/// endpoints so the whole callback flow runs against localhost.
use authrelay::auth::directory::MemoryDirectory;
use authrelay::auth::provider::{GoogleAuthClient, GoogleClientConfig};
use authrelay::auth::routes::AuthState;
use authrelay::build_router;
use axum::{
    Form, Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Canned values served by the mock provider
pub const ACCESS_TOKEN: &str = "t1";
pub const USER_ID: &str = "g1";
pub const USER_EMAIL: &str = "a@x.com";

/// Mock identity provider
pub struct MockGoogle {
    pub port: u16,
}

impl MockGoogle {
    /// Start the mock provider on a random available port
    pub async fn start() -> anyhow::Result<Self> {
        let app = Router::new()
            .route("/token", post(handle_token))
            .route("/userinfo", get(handle_userinfo))
            .route("/broken/token", post(handle_broken))
            .route("/broken/userinfo", get(handle_broken));

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock provider failed to start");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(Self { port })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Client config pointing the app at this mock's endpoints
    pub fn client_config(&self) -> GoogleClientConfig {
        GoogleClientConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: "http://127.0.0.1/api/auth/callback/google".to_string(),
            auth_url: None,
            token_url: Some(self.url("/token")),
            userinfo_url: Some(self.url("/userinfo")),
        }
    }

    /// Same config with a token endpoint that always fails
    pub fn client_config_broken_token(&self) -> GoogleClientConfig {
        GoogleClientConfig {
            token_url: Some(self.url("/broken/token")),
            ..self.client_config()
        }
    }

    /// Same config with a userinfo endpoint that always fails
    pub fn client_config_broken_userinfo(&self) -> GoogleClientConfig {
        GoogleClientConfig {
            userinfo_url: Some(self.url("/broken/userinfo")),
            ..self.client_config()
        }
    }
}

async fn handle_token(Form(params): Form<HashMap<String, String>>) -> Response {
    if params.get("grant_type").map(String::as_str) != Some("authorization_code")
        || !params.contains_key("code")
        || !params.contains_key("client_id")
        || !params.contains_key("redirect_uri")
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_request"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "openid email profile"
    }))
    .into_response()
}

async fn handle_userinfo(headers: HeaderMap) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let expected = format!("Bearer {}", ACCESS_TOKEN);
    if bearer != Some(expected.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({
        "id": USER_ID,
        "email": USER_EMAIL,
        "name": "A",
        "picture": "http://p",
        "given_name": "A",
        "family_name": "X"
    }))
    .into_response()
}

async fn handle_broken() -> StatusCode {
    StatusCode::BAD_GATEWAY
}

/// The application under test, served on an ephemeral port
pub struct TestApp {
    pub port: u16,
}

impl TestApp {
    /// Serve the real router with the given provider client config
    pub async fn start(google: GoogleClientConfig) -> anyhow::Result<Self> {
        let state = Arc::new(AuthState {
            google: GoogleAuthClient::new(google)?,
            directory: Arc::new(MemoryDirectory::default()),
        });
        let app = build_router(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test app failed to start");
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(Self { port })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

/// Client that surfaces redirects instead of following them
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build test client")
}
