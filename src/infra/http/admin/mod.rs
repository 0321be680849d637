mod api;
mod auth;
mod content;
mod dashboard;
mod health;
mod selectors;
mod shared;
mod singleton;
mod state;

pub use auth::SESSION_COOKIE;
pub use state::AdminState;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::entities::{
    BlogRecord, EducationRecord, ExperienceRecord, HeroContentRecord, ProfileRecord,
    ProjectRecord, SkillRecord,
};

use super::middleware::{log_responses, set_request_context};
use content::AdminCollection;
use singleton::AdminSingleton;

pub fn build_admin_router(state: AdminState) -> Router {
    let guarded = Router::new().route("/", get(dashboard::admin_dashboard));
    let guarded = singleton_routes::<HeroContentRecord>(guarded);
    let guarded = singleton_routes::<ProfileRecord>(guarded);
    let guarded = collection_routes::<SkillRecord>(guarded);
    let guarded = collection_routes::<ProjectRecord>(guarded);
    let guarded = collection_routes::<ExperienceRecord>(guarded);
    let guarded = collection_routes::<EducationRecord>(guarded);
    let guarded = collection_routes::<BlogRecord>(guarded)
        .route("/blog/{id}/publish", post(content::admin_blog_publish))
        .route("/blog/{id}/unpublish", post(content::admin_blog_unpublish))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route(
            "/login",
            get(auth::admin_login_page).post(auth::admin_login_submit),
        )
        .route("/logout", post(auth::admin_logout))
        .route("/api/admin-login", post(api::api_admin_login))
        .route("/_health/db", get(health::admin_health))
        .merge(guarded)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

fn collection_routes<E: AdminCollection>(router: Router<AdminState>) -> Router<AdminState> {
    let path = E::KIND.admin_path();
    router
        .route(
            path,
            get(content::admin_collection::<E>).post(content::admin_collection_create::<E>),
        )
        .route(
            &format!("{path}/new"),
            get(content::admin_collection_new::<E>),
        )
        .route(
            &format!("{path}/{{id}}/edit"),
            get(content::admin_collection_edit::<E>),
        )
        .route(
            &format!("{path}/{{id}}"),
            post(content::admin_collection_update::<E>),
        )
        .route(
            &format!("{path}/{{id}}/delete"),
            post(content::admin_collection_delete::<E>),
        )
}

fn singleton_routes<E: AdminSingleton>(router: Router<AdminState>) -> Router<AdminState> {
    router.route(
        E::KIND.admin_path(),
        get(singleton::admin_singleton::<E>).post(singleton::admin_singleton_save::<E>),
    )
}
