/// Callback endpoint integration tests: the four terminal outcomes of
/// `GET /api/auth/callback/google`, observed via the redirect Location.
mod common;

use authrelay::auth::session::Session;
use chrono::Utc;
use common::{MockGoogle, TestApp, no_redirect_client};
use std::collections::HashMap;

/// Location header of a redirect response
async fn callback_location(app: &TestApp, query: &str) -> String {
    let client = no_redirect_client();
    let response = client
        .get(app.url(&format!("/api/auth/callback/google{}", query)))
        .send()
        .await
        .expect("callback request failed");

    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );

    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("redirect without Location")
        .to_str()
        .expect("non-utf8 Location")
        .to_string()
}

/// Parse the query of a `/?...` redirect target
fn parse_target(location: &str) -> HashMap<String, String> {
    let url = url::Url::parse(&format!("http://localhost{}", location)).expect("bad Location");
    assert_eq!(url.path(), "/");
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[tokio::test]
async fn valid_code_redirects_with_session() {
    let mock = MockGoogle::start().await.unwrap();
    let app = TestApp::start(mock.client_config()).await.unwrap();

    let before = Utc::now().timestamp_millis();
    let location = callback_location(&app, "?code=abc123").await;
    let after = Utc::now().timestamp_millis();

    let params = parse_target(&location);
    assert_eq!(params.get("auth_success").map(String::as_str), Some("true"));

    // The query layer decoded once; the codec undoes the inner encoding
    let session = Session::decode(params.get("session").expect("no session param")).unwrap();

    assert_eq!(session.user.id, common::USER_ID);
    assert_eq!(session.user.email, common::USER_EMAIL);
    assert_eq!(session.user.picture.as_deref(), Some("http://p"));
    assert_eq!(session.tokens.access_token, common::ACCESS_TOKEN);
    assert_eq!(session.tokens.token_type, "Bearer");
    assert_eq!(session.tokens.expires_in, 3600);
    assert_eq!(session.tokens.scope, "openid email profile");
    assert!(session.expires_at >= before + 3_600_000);
    assert!(session.expires_at <= after + 3_600_000);

    // Transport round trip is lossless
    let reencoded = session.encode().unwrap();
    assert_eq!(Session::decode(&reencoded).unwrap(), session);
}

#[tokio::test]
async fn provider_error_redirects_oauth_error() {
    let mock = MockGoogle::start().await.unwrap();
    let app = TestApp::start(mock.client_config()).await.unwrap();

    // The error's content never influences the outcome
    let location = callback_location(&app, "?error=access_denied").await;
    assert_eq!(location, "/?error=oauth_error");

    let location = callback_location(&app, "?error=server_error").await;
    assert_eq!(location, "/?error=oauth_error");
}

#[tokio::test]
async fn missing_code_redirects_no_code() {
    let mock = MockGoogle::start().await.unwrap();
    let app = TestApp::start(mock.client_config()).await.unwrap();

    let location = callback_location(&app, "").await;
    assert_eq!(location, "/?error=no_code");
}

#[tokio::test]
async fn error_wins_over_code() {
    let mock = MockGoogle::start().await.unwrap();
    let app = TestApp::start(mock.client_config()).await.unwrap();

    let location = callback_location(&app, "?code=abc123&error=access_denied").await;
    assert_eq!(location, "/?error=oauth_error");
}

#[tokio::test]
async fn failed_exchange_redirects_auth_failed() {
    let mock = MockGoogle::start().await.unwrap();
    let app = TestApp::start(mock.client_config_broken_token()).await.unwrap();

    let location = callback_location(&app, "?code=abc123").await;
    assert_eq!(location, "/?error=auth_failed");
}

#[tokio::test]
async fn failed_userinfo_redirects_auth_failed_without_partial_session() {
    let mock = MockGoogle::start().await.unwrap();
    let app = TestApp::start(mock.client_config_broken_userinfo())
        .await
        .unwrap();

    let location = callback_location(&app, "?code=abc123").await;
    assert_eq!(location, "/?error=auth_failed");

    // Even though the exchange succeeded, nothing of the session leaks
    assert!(!location.contains("session"));
    assert!(!location.contains("auth_success"));
}
