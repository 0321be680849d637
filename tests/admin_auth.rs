mod support;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};

use folio::application::auth::{AdminAccountError, AdminAuthError};
use support::*;

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn dashboard_redirects_anonymous_visitors_to_login() {
    let app = test_app().await;

    let response = send(&app.admin, get("/")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn datastar_requests_without_session_get_unauthorized() {
    let app = test_app().await;

    let response = send(&app.admin, as_datastar(get("/skills"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_form_sets_hardened_session_cookie() {
    let app = test_app().await;

    let body = format!("email={}&password=correct+horse+battery", ADMIN_EMAIL);
    let response = send(&app.admin, form_post("/login", &body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie")
        .to_string();
    assert!(cookie.starts_with("folio_admin_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(!cookie.contains("Secure"));

    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .expect("cookie value");

    let dashboard = send(&app.admin, with_session(get("/"), &token)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let html = body_text(dashboard).await;
    assert!(html.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn login_rejects_wrong_password_and_missing_fields() {
    let app = test_app().await;

    let wrong = send(
        &app.admin,
        form_post("/login", "email=admin%40example.com&password=nope"),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let html = body_text(wrong).await;
    assert!(html.contains("Invalid credentials"));
    assert!(html.contains("admin@example.com"));

    let missing = send(&app.admin, form_post("/login", "email=&password=")).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(missing)
            .await
            .contains("Email and password are required")
    );
}

#[tokio::test]
async fn login_email_lookup_ignores_case() {
    let app = test_app().await;

    let issued = app
        .auth
        .login("  ADMIN@Example.com ", ADMIN_PASSWORD)
        .await
        .expect("case-insensitive login");
    assert_eq!(issued.email, ADMIN_EMAIL);
}

#[tokio::test]
async fn repeated_failures_are_throttled() {
    let app = test_app().await;

    for _ in 0..3 {
        let response = send(
            &app.admin,
            form_post("/login", "email=admin%40example.com&password=wrong"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = send(
        &app.admin,
        form_post("/login", "email=admin%40example.com&password=correct+horse+battery"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Attempts inside the window survive pruning.
    assert_eq!(app.auth.prune_login_attempts(), 0);
    let response = send(
        &app.admin,
        form_post("/login", "email=admin%40example.com&password=correct+horse+battery"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn forged_and_expired_tokens_are_rejected() {
    let app = test_app().await;
    let token = sign_in(&app).await;

    let mut forged = token.clone();
    forged.pop();
    forged.push(if token.ends_with('A') { 'B' } else { 'A' });
    assert!(matches!(
        app.auth.authenticate(&forged).await,
        Err(AdminAuthError::Invalid)
    ));
    assert!(matches!(
        app.auth.authenticate("not-a-token").await,
        Err(AdminAuthError::Invalid)
    ));

    app.store.admins.expire_all_sessions();
    assert!(matches!(
        app.auth.authenticate(&token).await,
        Err(AdminAuthError::Expired)
    ));

    let response = send(&app.admin, with_session(get("/"), &token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    assert_eq!(app.auth.purge_expired().await.unwrap(), 1);
    assert_eq!(app.store.admins.session_count(), 0);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = test_app().await;
    let token = sign_in(&app).await;

    let response = send(&app.admin, with_session(form_post("/logout", ""), &token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let after = send(&app.admin, with_session(get("/"), &token)).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.store.admins.session_count(), 0);
}

#[tokio::test]
async fn bearer_token_authenticates_like_the_cookie() {
    let app = test_app().await;
    let token = sign_in(&app).await;

    let request = Request::get("/skills")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app.admin, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn json_login_returns_session_token() {
    let app = test_app().await;

    let response = send(
        &app.admin,
        json_post(
            "/api/admin-login",
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["email"], json!(ADMIN_EMAIL));
    let token = body["sessionToken"].as_str().expect("token");
    assert!(app.auth.authenticate(token).await.is_ok());
}

#[tokio::test]
async fn json_login_reports_errors() {
    let app = test_app().await;

    let invalid = send(
        &app.admin,
        json_post(
            "/api/admin-login",
            json!({ "email": ADMIN_EMAIL, "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(invalid).await).unwrap();
    assert_eq!(body["error"], json!("Invalid credentials"));

    let malformed = Request::post("/api/admin-login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app.admin, malformed).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn changing_password_revokes_existing_sessions() {
    let app = test_app().await;
    let token = sign_in(&app).await;

    let revoked = app
        .auth
        .change_password(ADMIN_EMAIL, "another long password")
        .await
        .expect("password changed");
    assert_eq!(revoked, 1);
    assert!(app.auth.authenticate(&token).await.is_err());
    assert!(
        app.auth
            .login(ADMIN_EMAIL, "another long password")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn admin_accounts_are_validated() {
    let app = test_app().await;

    assert!(matches!(
        app.auth.create_admin("ADMIN@example.com", "long enough pw").await,
        Err(AdminAccountError::Duplicate(_))
    ));
    assert!(matches!(
        app.auth.create_admin("someone@example.com", "short").await,
        Err(AdminAccountError::PasswordTooShort { min: 8 })
    ));
    assert!(matches!(
        app.auth.create_admin("not-an-email", "long enough pw").await,
        Err(AdminAccountError::InvalidEmail(_))
    ));
    assert!(matches!(
        app.auth.change_password("ghost@example.com", "long enough pw").await,
        Err(AdminAccountError::NotFound(_))
    ));
}

#[tokio::test]
async fn login_page_redirects_signed_in_admins() {
    let app = test_app().await;

    let anonymous = send(&app.admin, get("/login")).await;
    assert_eq!(anonymous.status(), StatusCode::OK);

    let token = sign_in(&app).await;
    let signed_in = send(&app.admin, with_session(get("/login"), &token)).await;
    assert_eq!(signed_in.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&signed_in), Some("/"));
}

#[tokio::test]
async fn throttled_json_login_reports_remaining_wait() {
    let app = test_app().await;

    for _ in 0..3 {
        send(
            &app.admin,
            json_post(
                "/api/admin-login",
                json!({ "email": ADMIN_EMAIL, "password": "nope" }),
            ),
        )
        .await;
    }

    let response = send(
        &app.admin,
        json_post(
            "/api/admin-login",
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let seconds: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .expect("retry-after seconds");
    assert!((1..60).contains(&seconds), "retry-after was {seconds}");
}
