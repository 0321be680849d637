use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::{portfolio::PortfolioService, repos::HealthRepo},
    presentation::views::{
        BlogIndexTemplate, BlogPostTemplate, IndexTemplate, LayoutContext,
        render_not_found_response, render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub portfolio: Arc<PortfolioService>,
    pub health: Arc<dyn HealthRepo>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_index))
        .route("/blog/{id}", get(blog_post))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// Missing or malformed values fall back to the first page.
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.portfolio.chrome();

    match state.portfolio.home().await {
        Ok(content) => {
            let canonical = canonical_url(&chrome.meta.canonical, "/");
            let view = LayoutContext::new(chrome.with_canonical(canonical), content);
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => err.into_response(),
    }
}

async fn blog_index(State(state): State<HttpState>, Query(query): Query<PageQuery>) -> Response {
    let chrome = state.portfolio.chrome();
    let page = query.page();

    match state.portfolio.blog_page(page).await {
        Ok(content) => {
            let path = if page > 1 {
                format!("/blog?page={page}")
            } else {
                "/blog".to_string()
            };
            let canonical = canonical_url(&chrome.meta.canonical, &path);
            let chrome = chrome.with_title("Blog").with_canonical(canonical);
            render_template_response(
                BlogIndexTemplate {
                    view: LayoutContext::new(chrome, content),
                },
                StatusCode::OK,
            )
        }
        Err(err) => err.into_response(),
    }
}

async fn blog_post(State(state): State<HttpState>, Path(raw_id): Path<String>) -> Response {
    let chrome = state.portfolio.chrome();

    let Ok(id) = Uuid::parse_str(&raw_id) else {
        return render_not_found_response(chrome);
    };

    match state.portfolio.blog_post(id).await {
        Ok(Some(content)) => {
            let canonical = canonical_url(&chrome.meta.canonical, &format!("/blog/{id}"));
            let chrome = chrome.with_title(&content.title).with_canonical(canonical);
            render_template_response(
                BlogPostTemplate {
                    view: LayoutContext::new(chrome, content),
                },
                StatusCode::OK,
            )
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => err.into_response(),
    }
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.portfolio.chrome())
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let root = normalize_public_site_url(base);
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root
    } else {
        format!("{root}{trimmed}")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_joins_without_double_slashes() {
        assert_eq!(
            canonical_url("https://example.com/", "/blog"),
            "https://example.com/blog"
        );
        assert_eq!(canonical_url("https://example.com", "/"), "https://example.com/");
    }

    #[test]
    fn page_query_falls_back_to_first_page() {
        let query = |raw: Option<&str>| PageQuery {
            page: raw.map(str::to_string),
        };
        assert_eq!(query(None).page(), 1);
        assert_eq!(query(Some("abc")).page(), 1);
        assert_eq!(query(Some("0")).page(), 1);
        assert_eq!(query(Some("3")).page(), 3);
    }
}
