use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    application::auth::AdminPrincipal,
    presentation::{admin::views as admin_views, views::render_template_response},
};

use super::AdminState;

pub(super) async fn admin_dashboard(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    let chrome = state.chrome.load("/", &principal);

    let content = match state.dashboard.overview(&principal).await {
        Ok(view) => view,
        Err(err) => return err.into_response(),
    };

    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminDashboardTemplate { view }, StatusCode::OK)
}
