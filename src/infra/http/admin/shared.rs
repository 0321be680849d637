use askama::{Error as AskamaError, Template};
use axum::response::{IntoResponse, Response};
use datastar::prelude::ElementPatchMode;
use std::time::Duration;
use tracing::error;
use uuid::Uuid;

use super::selectors::TOAST_STACK;
use crate::{
    application::{error::HttpError, stream::StreamBuilder},
    presentation::{admin::views as admin_views, views::TemplateRenderError},
};

#[derive(Clone)]
pub(super) struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub text: String,
    pub ttl: Duration,
}

#[derive(Clone, Copy)]
pub(super) enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn as_variant(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(6000);

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::Success,
            text: text.into(),
            ttl: DEFAULT_TOAST_TTL,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::Error,
            text: text.into(),
            ttl: DEFAULT_TOAST_TTL,
        }
    }
}

pub(super) fn push_toasts(stream: &mut StreamBuilder, toasts: &[Toast]) -> Result<(), HttpError> {
    let view_items = toasts
        .iter()
        .map(|toast| admin_views::AdminToastItem {
            id: toast.id.to_string(),
            kind: toast.kind.as_variant(),
            text: toast.text.clone(),
            ttl_ms: u64::try_from(toast.ttl.as_millis()).unwrap_or(u64::MAX),
        })
        .collect::<Vec<_>>();

    let template = admin_views::AdminToastStackTemplate { toasts: view_items };

    let html = template.render().map_err(|err| {
        template_render_http_error(
            "infra::http::admin::push_toasts",
            "Template rendering failed",
            err,
        )
    })?;

    stream.push_patch(html, TOAST_STACK, ElementPatchMode::Replace);
    Ok(())
}

/// Patches followed by toasts, sent as one response.
pub(super) struct PatchesWithToasts<'a> {
    pub patches: Vec<(String, String)>,
    pub toasts: &'a [Toast],
}

pub(super) fn stream_patches(params: PatchesWithToasts<'_>) -> Response {
    let PatchesWithToasts { patches, toasts } = params;

    let mut stream = StreamBuilder::new();
    for (selector, html) in patches {
        stream.push_patch(html, &selector, ElementPatchMode::Replace);
    }

    if !toasts.is_empty()
        && let Err(err) = push_toasts(&mut stream, toasts)
    {
        return err.into_response();
    }

    stream.into_response()
}

/// Toast-only reply for a failed Datastar action. The failure is logged here
/// because the response itself is a 200 stream.
pub(super) fn stream_failure(
    source: &'static str,
    message: String,
    detail: &dyn std::fmt::Display,
) -> Response {
    error!(
        target = "folio::http::admin",
        source = source,
        detail = %detail,
        "{message}"
    );
    stream_patches(PatchesWithToasts {
        patches: Vec::new(),
        toasts: &[Toast::error(message)],
    })
}

pub(super) fn render_fragment<T: Template>(
    template: T,
    source: &'static str,
) -> Result<String, HttpError> {
    template
        .render()
        .map_err(|err| template_render_http_error(source, "Template rendering failed", err))
}

pub(super) fn template_render_http_error(
    source: &'static str,
    message: &'static str,
    err: AskamaError,
) -> HttpError {
    HttpError::from(TemplateRenderError::new(source, message, err))
}
