//! JSON login endpoint for scripted clients.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{auth::LoginError, error::ErrorReport};

use super::AdminState;

const SOURCE: &str = "infra::http::admin::api_admin_login";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct AdminLoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminLoginResponse {
    success: bool,
    session_token: String,
    user: AdminLoginUser,
}

#[derive(Debug, Serialize)]
struct AdminLoginUser {
    id: Uuid,
    email: String,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub(super) async fn api_admin_login(
    State(state): State<AdminState>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let mut response = error_response(StatusCode::BAD_REQUEST, "Invalid request body");
            ErrorReport::from_error(SOURCE, StatusCode::BAD_REQUEST, &rejection)
                .attach(&mut response);
            return response;
        }
    };

    match state.auth.login(&request.email, &request.password).await {
        Ok(issued) => Json(AdminLoginResponse {
            success: true,
            session_token: issued.token,
            user: AdminLoginUser {
                id: issued.user_id,
                email: issued.email,
            },
        })
        .into_response(),
        Err(err @ (LoginError::MissingCredentials | LoginError::InvalidCredentials)) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(LoginError::Throttled { retry_after }) => {
            let mut response =
                error_response(StatusCode::TOO_MANY_REQUESTS, "Too many login attempts");
            let seconds = retry_after.as_secs().max(1).to_string();
            if let Ok(value) = HeaderValue::from_str(&seconds) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
        Err(err) => {
            let mut response =
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}
