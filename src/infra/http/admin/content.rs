//! Handlers shared by every list-style editor (skills, projects, experience,
//! education, blog). Each kind plugs in through [`AdminCollection`].

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::{
    application::{
        admin::content::{
            AdminContentError, AdminContentService, failure_message, success_message,
        },
        auth::AdminPrincipal,
        error::HttpError,
    },
    domain::{
        entities::{
            BlogRecord, ContentRecord, EducationRecord, ExperienceRecord, ProjectRecord,
            SkillRecord,
        },
        types::AuditAction,
        validation::{FieldErrors, FormFields},
    },
    presentation::{
        admin::{
            editors::{AdminListable, EditorMode, collection_view, draft_fields, editor_view},
            views::{
                self as admin_views, AdminCollectionPageView, AdminCollectionPanelTemplate,
                AdminEditorTemplate, AdminEditorView,
            },
        },
        views::render_template_response,
    },
};

use super::super::{is_datastar_request, repo_error_to_http};
use super::AdminState;
use super::selectors::{EDITOR, collection_panel};
use super::shared::{PatchesWithToasts, Toast, render_fragment, stream_failure, stream_patches};

/// A list-style content kind with an admin service in [`AdminState`].
pub(super) trait AdminCollection: AdminListable {
    fn service(state: &AdminState) -> &AdminContentService<Self>;
}

impl AdminCollection for SkillRecord {
    fn service(state: &AdminState) -> &AdminContentService<Self> {
        &state.skills
    }
}

impl AdminCollection for ProjectRecord {
    fn service(state: &AdminState) -> &AdminContentService<Self> {
        &state.projects
    }
}

impl AdminCollection for ExperienceRecord {
    fn service(state: &AdminState) -> &AdminContentService<Self> {
        &state.experience
    }
}

impl AdminCollection for EducationRecord {
    fn service(state: &AdminState) -> &AdminContentService<Self> {
        &state.education
    }
}

impl AdminCollection for BlogRecord {
    fn service(state: &AdminState) -> &AdminContentService<Self> {
        &state.blogs
    }
}

pub(super) fn admin_content_error(source: &'static str, err: AdminContentError) -> HttpError {
    match err {
        AdminContentError::Validation(errors) => HttpError::new(
            source,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid input",
            errors.to_string(),
        ),
        AdminContentError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "record not found",
        ),
        AdminContentError::Repo(err) => repo_error_to_http(source, err),
    }
}

async fn render_panel<E: AdminCollection>(
    state: &AdminState,
    source: &'static str,
) -> Result<String, HttpError> {
    let records = E::service(state)
        .list()
        .await
        .map_err(|err| admin_content_error(source, err))?;
    let content = collection_view(&records, state.timezone);
    render_fragment(AdminCollectionPanelTemplate { content }, source)
}

fn render_editor(editor: Option<AdminEditorView>, source: &'static str) -> Result<String, HttpError> {
    render_fragment(AdminEditorTemplate { editor }, source)
}

/// Full page, optionally with an editor already open.
async fn collection_page<E: AdminCollection>(
    state: &AdminState,
    principal: &AdminPrincipal,
    editor: Option<AdminEditorView>,
    status: StatusCode,
    source: &'static str,
) -> Response {
    let kind = E::KIND;
    let chrome = state.chrome.load(kind.admin_path(), principal);

    let panel_html = match render_panel::<E>(state, source).await {
        Ok(html) => html,
        Err(err) => return err.into_response(),
    };
    let editor_html = match render_editor(editor, source) {
        Ok(html) => html,
        Err(err) => return err.into_response(),
    };

    let content = AdminCollectionPageView {
        kind_slug: kind.as_str(),
        heading: kind.plural_label(),
        new_href: format!("{}/new", kind.admin_path()),
        add_label: format!("Add {}", kind.label()),
        panel_html,
        editor_html,
    };
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminCollectionTemplate { view }, status)
}

/// Close the editor, refresh the list and toast.
async fn stream_refresh<E: AdminCollection>(
    state: &AdminState,
    close_editor: bool,
    toast: Toast,
    source: &'static str,
) -> Response {
    let mut patches = Vec::new();
    if close_editor {
        match render_editor(None, source) {
            Ok(html) => patches.push((EDITOR.to_string(), html)),
            Err(err) => return err.into_response(),
        }
    }
    match render_panel::<E>(state, source).await {
        Ok(html) => patches.push((collection_panel(E::KIND), html)),
        Err(err) => return err.into_response(),
    }

    stream_patches(PatchesWithToasts {
        patches,
        toasts: &[toast],
    })
}

fn form_fields(pairs: Vec<(String, String)>) -> FormFields {
    pairs.into_iter().collect()
}

pub(super) async fn admin_collection<E: AdminCollection>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    collection_page::<E>(
        &state,
        &principal,
        None,
        StatusCode::OK,
        "infra::http::admin_collection",
    )
    .await
}

pub(super) async fn admin_collection_new<E: AdminCollection>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    headers: HeaderMap,
) -> Response {
    const SOURCE: &str = "infra::http::admin_collection_new";
    let editor = editor_view::<E>(
        EditorMode::New,
        &FormFields::default(),
        &FieldErrors::default(),
    );

    if !is_datastar_request(&headers) {
        return collection_page::<E>(&state, &principal, Some(editor), StatusCode::OK, SOURCE)
            .await;
    }

    match render_editor(Some(editor), SOURCE) {
        Ok(html) => stream_patches(PatchesWithToasts {
            patches: vec![(EDITOR.to_string(), html)],
            toasts: &[],
        }),
        Err(err) => err.into_response(),
    }
}

pub(super) async fn admin_collection_edit<E: AdminCollection>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    const SOURCE: &str = "infra::http::admin_collection_edit";
    let datastar = is_datastar_request(&headers);

    let record = match E::service(&state).find(id).await {
        Ok(Some(record)) => record,
        Ok(None) if datastar => {
            return stream_patches(PatchesWithToasts {
                patches: Vec::new(),
                toasts: &[Toast::error(format!("{} not found", E::KIND.label()))],
            });
        }
        Ok(None) => return Redirect::to(E::KIND.admin_path()).into_response(),
        Err(err) => return admin_content_error(SOURCE, err).into_response(),
    };

    let values = draft_fields(&record.to_draft());
    let editor = editor_view::<E>(EditorMode::Edit(id), &values, &FieldErrors::default());

    if !datastar {
        return collection_page::<E>(&state, &principal, Some(editor), StatusCode::OK, SOURCE)
            .await;
    }

    match render_editor(Some(editor), SOURCE) {
        Ok(html) => stream_patches(PatchesWithToasts {
            patches: vec![(EDITOR.to_string(), html)],
            toasts: &[],
        }),
        Err(err) => err.into_response(),
    }
}

pub(super) async fn admin_collection_create<E: AdminCollection>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_collection_create";
    let fields = form_fields(pairs);
    let result = E::service(&state).create(&principal.email, &fields).await;
    submit_outcome::<E>(
        &state,
        &principal,
        &headers,
        EditorMode::New,
        AuditAction::Create,
        &fields,
        result.map(|_| ()),
        SOURCE,
    )
    .await
}

pub(super) async fn admin_collection_update<E: AdminCollection>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_collection_update";
    let fields = form_fields(pairs);
    let result = E::service(&state)
        .update(&principal.email, id, &fields)
        .await;
    submit_outcome::<E>(
        &state,
        &principal,
        &headers,
        EditorMode::Edit(id),
        AuditAction::Update,
        &fields,
        result.map(|_| ()),
        SOURCE,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn submit_outcome<E: AdminCollection>(
    state: &AdminState,
    principal: &AdminPrincipal,
    headers: &HeaderMap,
    mode: EditorMode,
    action: AuditAction,
    fields: &FormFields,
    result: Result<(), AdminContentError>,
    source: &'static str,
) -> Response {
    let kind = E::KIND;
    let datastar = is_datastar_request(headers);

    match result {
        Ok(()) if datastar => {
            stream_refresh::<E>(
                state,
                true,
                Toast::success(success_message(kind, action)),
                source,
            )
            .await
        }
        Ok(()) => Redirect::to(kind.admin_path()).into_response(),
        Err(AdminContentError::Validation(errors)) => {
            let editor = editor_view::<E>(mode, fields, &errors);
            if !datastar {
                return collection_page::<E>(
                    state,
                    principal,
                    Some(editor),
                    StatusCode::UNPROCESSABLE_ENTITY,
                    source,
                )
                .await;
            }
            match render_editor(Some(editor), source) {
                Ok(html) => stream_patches(PatchesWithToasts {
                    patches: vec![(EDITOR.to_string(), html)],
                    toasts: &[Toast::error(failure_message(kind, action))],
                }),
                Err(err) => err.into_response(),
            }
        }
        Err(err) if datastar => stream_failure(source, failure_message(kind, action), &err),
        Err(err) => admin_content_error(source, err).into_response(),
    }
}

pub(super) async fn admin_collection_delete<E: AdminCollection>(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    const SOURCE: &str = "infra::http::admin_collection_delete";
    let kind = E::KIND;
    let datastar = is_datastar_request(&headers);

    match E::service(&state).delete(&principal.email, id).await {
        Ok(()) if datastar => {
            stream_refresh::<E>(
                &state,
                false,
                Toast::success(success_message(kind, AuditAction::Delete)),
                SOURCE,
            )
            .await
        }
        Ok(()) => Redirect::to(kind.admin_path()).into_response(),
        Err(err) if datastar => {
            stream_failure(SOURCE, failure_message(kind, AuditAction::Delete), &err)
        }
        Err(err) => admin_content_error(SOURCE, err).into_response(),
    }
}

pub(super) async fn admin_blog_publish(
    state: State<AdminState>,
    principal: Extension<AdminPrincipal>,
    id: Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    set_blog_published(state, principal, id, headers, true).await
}

pub(super) async fn admin_blog_unpublish(
    state: State<AdminState>,
    principal: Extension<AdminPrincipal>,
    id: Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    set_blog_published(state, principal, id, headers, false).await
}

async fn set_blog_published(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    published: bool,
) -> Response {
    const SOURCE: &str = "infra::http::admin_blog_set_published";
    let kind = BlogRecord::KIND;
    let action = if published {
        AuditAction::Publish
    } else {
        AuditAction::Unpublish
    };
    let datastar = is_datastar_request(&headers);

    match state
        .blog_status
        .set_published(&principal.email, id, published)
        .await
    {
        Ok(_) if datastar => {
            stream_refresh::<BlogRecord>(
                &state,
                false,
                Toast::success(success_message(kind, action)),
                SOURCE,
            )
            .await
        }
        Ok(_) => Redirect::to(kind.admin_path()).into_response(),
        Err(err) if datastar => stream_failure(SOURCE, failure_message(kind, action), &err),
        Err(err) => admin_content_error(SOURCE, err).into_response(),
    }
}
