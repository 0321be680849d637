use axum::{
    Extension, Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use time::OffsetDateTime;

use crate::{
    application::{
        admin::content::{AdminContentError, AdminSingletonService, failure_message, success_message},
        auth::AdminPrincipal,
    },
    domain::{
        entities::{HeroContentRecord, ProfileRecord},
        types::AuditAction,
        validation::{FieldErrors, FormFields},
    },
    presentation::{
        admin::{
            editors::{AdminEditable, EditorMode, draft_fields, editor_view},
            views::{
                self as admin_views, AdminSingletonPageView, AdminSingletonPanelTemplate,
                AdminSingletonView,
            },
        },
        views::render_template_response,
    },
    util::timezone,
};

use super::super::is_datastar_request;
use super::AdminState;
use super::content::admin_content_error;
use super::selectors::PANEL;
use super::shared::{PatchesWithToasts, Toast, render_fragment, stream_failure, stream_patches};

/// Single-row content edited in place.
pub(super) trait AdminSingleton: AdminEditable {
    const DESCRIPTION: &'static str;

    fn service(state: &AdminState) -> &AdminSingletonService<Self>;

    fn updated_at(&self) -> OffsetDateTime;
}

impl AdminSingleton for HeroContentRecord {
    const DESCRIPTION: &'static str = "The headline block at the top of the public site.";

    fn service(state: &AdminState) -> &AdminSingletonService<Self> {
        &state.hero
    }

    fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}

impl AdminSingleton for ProfileRecord {
    const DESCRIPTION: &'static str = "Name, headline, about text and resume link.";

    fn service(state: &AdminState) -> &AdminSingletonService<Self> {
        &state.profile
    }

    fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}

fn panel_view<E: AdminSingleton>(
    state: &AdminState,
    record: Option<&E>,
    values: &FormFields,
    errors: &FieldErrors,
) -> AdminSingletonView {
    AdminSingletonView {
        last_saved: record
            .map(|record| timezone::format_timestamp(record.updated_at(), state.timezone)),
        editor: editor_view::<E>(EditorMode::Singleton, values, errors),
    }
}

fn singleton_page<E: AdminSingleton>(
    state: &AdminState,
    principal: &AdminPrincipal,
    content: AdminSingletonView,
    status: StatusCode,
    source: &'static str,
) -> Response {
    let kind = E::KIND;
    let chrome = state.chrome.load(kind.admin_path(), principal);

    let panel_html = match render_fragment(AdminSingletonPanelTemplate { content }, source) {
        Ok(html) => html,
        Err(err) => return err.into_response(),
    };

    let content = AdminSingletonPageView {
        heading: kind.plural_label(),
        description: E::DESCRIPTION,
        panel_html,
    };
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminSingletonTemplate { view }, status)
}

pub(super) async fn admin_singleton<E: AdminSingleton>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_singleton";

    let record = match E::service(&state).load().await {
        Ok(record) => record,
        Err(err) => return admin_content_error(SOURCE, err).into_response(),
    };

    let values = record
        .as_ref()
        .map(|record| draft_fields(&record.to_draft()))
        .unwrap_or_default();
    let content = panel_view::<E>(&state, record.as_ref(), &values, &FieldErrors::default());
    singleton_page::<E>(&state, &principal, content, StatusCode::OK, SOURCE)
}

pub(super) async fn admin_singleton_save<E: AdminSingleton>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_singleton_save";
    let kind = E::KIND;
    let datastar = is_datastar_request(&headers);
    let fields: FormFields = pairs.into_iter().collect();

    match E::service(&state).save(&principal.email, &fields).await {
        Ok(record) if datastar => {
            let values = draft_fields(&record.to_draft());
            let content =
                panel_view::<E>(&state, Some(&record), &values, &FieldErrors::default());
            match render_fragment(AdminSingletonPanelTemplate { content }, SOURCE) {
                Ok(html) => stream_patches(PatchesWithToasts {
                    patches: vec![(PANEL.to_string(), html)],
                    toasts: &[Toast::success(success_message(kind, AuditAction::Save))],
                }),
                Err(err) => err.into_response(),
            }
        }
        Ok(_) => Redirect::to(kind.admin_path()).into_response(),
        Err(AdminContentError::Validation(errors)) => {
            let previous = match E::service(&state).load().await {
                Ok(record) => record,
                Err(err) => return admin_content_error(SOURCE, err).into_response(),
            };
            let content = panel_view::<E>(&state, previous.as_ref(), &fields, &errors);

            if !datastar {
                return singleton_page::<E>(
                    &state,
                    &principal,
                    content,
                    StatusCode::UNPROCESSABLE_ENTITY,
                    SOURCE,
                );
            }
            match render_fragment(AdminSingletonPanelTemplate { content }, SOURCE) {
                Ok(html) => stream_patches(PatchesWithToasts {
                    patches: vec![(PANEL.to_string(), html)],
                    toasts: &[Toast::error(failure_message(kind, AuditAction::Save))],
                }),
                Err(err) => err.into_response(),
            }
        }
        Err(err) if datastar => {
            stream_failure(SOURCE, failure_message(kind, AuditAction::Save), &err)
        }
        Err(err) => admin_content_error(SOURCE, err).into_response(),
    }
}
