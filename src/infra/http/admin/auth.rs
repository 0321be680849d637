use axum::{
    Form,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::info;

use crate::{
    application::{
        auth::{AdminAuthError, IssuedSession, LoginError},
        error::HttpError,
    },
    presentation::{
        admin::views::{AdminLoginTemplate, AdminLoginView},
        views::render_template_response,
    },
};

use super::super::{is_datastar_request, repo_error_to_http};
use super::AdminState;

pub const SESSION_COOKIE: &str = "folio_admin_session";
const LOGIN_PATH: &str = "/login";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct AdminLoginForm {
    email: String,
    password: String,
}

/// Session token from the cookie, or from an `Authorization: Bearer` header.
pub(super) fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn session_cookie(issued: &IssuedSession, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl_seconds))
        .build()
}

fn cleared_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

fn login_page(state: &AdminState, email: String, error: Option<String>, status: StatusCode) -> Response {
    let view = AdminLoginView {
        site_title: state.site_title.clone(),
        email,
        error,
    };
    render_template_response(AdminLoginTemplate { view }, status)
}

pub(super) async fn admin_login_page(
    State(state): State<AdminState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = session_token(&jar, &headers)
        && state.auth.authenticate(&token).await.is_ok()
    {
        return Redirect::to("/").into_response();
    }

    login_page(&state, String::new(), None, StatusCode::OK)
}

pub(super) async fn admin_login_submit(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    match state.auth.login(&form.email, &form.password).await {
        Ok(issued) => {
            let ttl_seconds = i64::try_from(state.auth.session_ttl().as_secs()).unwrap_or(i64::MAX);
            let jar = jar.add(session_cookie(&issued, ttl_seconds, state.cookie_secure));
            (jar, Redirect::to("/")).into_response()
        }
        Err(LoginError::MissingCredentials) => login_page(
            &state,
            form.email,
            Some(LoginError::MissingCredentials.to_string()),
            StatusCode::BAD_REQUEST,
        ),
        Err(LoginError::InvalidCredentials) => login_page(
            &state,
            form.email,
            Some(LoginError::InvalidCredentials.to_string()),
            StatusCode::UNAUTHORIZED,
        ),
        Err(LoginError::Throttled { retry_after }) => login_page(
            &state,
            form.email,
            Some(format!(
                "Too many login attempts. Try again in {} seconds.",
                retry_after.as_secs().max(1)
            )),
            StatusCode::TOO_MANY_REQUESTS,
        ),
        Err(LoginError::Repo(err)) => {
            repo_error_to_http("infra::http::admin_login_submit", err).into_response()
        }
        Err(err @ LoginError::Hash(_)) => HttpError::from_error(
            "infra::http::admin_login_submit",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Sign in failed",
            &err,
        )
        .into_response(),
    }
}

pub(super) async fn admin_logout(
    State(state): State<AdminState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = session_token(&jar, &headers)
        && let Err(err) = state.auth.logout(&token).await
    {
        return repo_error_to_http("infra::http::admin_logout", err).into_response();
    }

    info!(target = "folio::auth", "admin signed out");
    (jar.remove(cleared_cookie()), Redirect::to(LOGIN_PATH)).into_response()
}

/// Rejects requests without a live admin session. The principal is handed to
/// handlers through request extensions and copied onto the response for logging.
pub(super) async fn require_admin(
    State(state): State<AdminState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let datastar = is_datastar_request(request.headers());
    let token = session_token(&jar, request.headers());

    let result = match token {
        Some(token) => state.auth.authenticate(&token).await,
        None => Err(AdminAuthError::Missing),
    };

    match result {
        Ok(principal) => {
            request.extensions_mut().insert(principal.clone());
            let mut response = next.run(request).await;
            response.extensions_mut().insert(principal);
            response
        }
        Err(AdminAuthError::Repo(err)) => {
            repo_error_to_http("infra::http::require_admin", err).into_response()
        }
        Err(err) if datastar => HttpError::from_error(
            "infra::http::require_admin",
            StatusCode::UNAUTHORIZED,
            "Session expired, sign in again",
            &err,
        )
        .into_response(),
        Err(_) => (jar.remove(cleared_cookie()), Redirect::to(LOGIN_PATH)).into_response(),
    }
}
