//! Form layouts and list rows for each editable content kind.

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::views::{
    AdminCollectionView, AdminEditorView, AdminFieldKind, AdminFieldView, AdminRowActionView,
    AdminRowView,
};
use crate::domain::entities::{
    BlogRecord, ContentRecord, EducationRecord, ExperienceRecord, HeroContentRecord,
    ProfileRecord, ProjectRecord, SkillRecord,
};
use crate::domain::validation::{FieldErrors, FormFields};
use crate::util::timezone;

/// One input on an editor form.
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: AdminFieldKind,
    pub required: bool,
    pub hint: Option<&'static str>,
}

const fn field(name: &'static str, label: &'static str, kind: AdminFieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
        hint: None,
    }
}

const fn optional(name: &'static str, label: &'static str, kind: AdminFieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: false,
        hint: None,
    }
}

/// Content that has an admin form.
pub trait AdminEditable: ContentRecord {
    const FIELDS: &'static [FieldSpec];
}

/// Content shown as rows in an admin list.
pub trait AdminListable: AdminEditable {
    fn row(&self, tz: Tz) -> AdminRowView;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit(Uuid),
    Singleton,
}

/// Flatten a draft into form values: lists joined with `, `, booleans as `on`.
pub fn draft_fields<D: Serialize>(draft: &D) -> FormFields {
    let Ok(Value::Object(map)) = serde_json::to_value(draft) else {
        return FormFields::default();
    };

    map.into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::Bool(true) => "on".to_string(),
                Value::Bool(false) => return None,
                Value::String(text) => text,
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect()
}

pub fn editor_view<E: AdminEditable>(
    mode: EditorMode,
    values: &FormFields,
    errors: &FieldErrors,
) -> AdminEditorView {
    let kind = E::KIND;
    let path = kind.admin_path();

    let (heading, form_action, submit_label, cancel_href) = match mode {
        EditorMode::New => (
            format!("Add {}", kind.label()),
            path.to_string(),
            "Create",
            Some(path.to_string()),
        ),
        EditorMode::Edit(id) => (
            format!("Edit {}", kind.label()),
            format!("{path}/{id}"),
            "Save changes",
            Some(path.to_string()),
        ),
        EditorMode::Singleton => (kind.label().to_string(), path.to_string(), "Save", None),
    };

    let fields = E::FIELDS
        .iter()
        .map(|field| AdminFieldView {
            name: field.name,
            label: field.label,
            kind: field.kind,
            value: values.get(field.name).to_string(),
            required: field.required,
            hint: field.hint,
            error: errors.message_for(field.name),
        })
        .collect();

    AdminEditorView {
        kind_slug: kind.as_str(),
        heading,
        form_action,
        submit_label,
        cancel_href,
        fields,
        error_count: errors.len(),
    }
}

pub fn collection_view<E: AdminListable>(records: &[E], tz: Tz) -> AdminCollectionView {
    let kind = E::KIND;
    AdminCollectionView {
        kind_slug: kind.as_str(),
        heading: kind.plural_label(),
        new_href: format!("{}/new", kind.admin_path()),
        add_label: format!("Add {}", kind.label()),
        rows: records.iter().map(|record| record.row(tz)).collect(),
        empty_message: format!(
            "No {} yet. Add the first one.",
            kind.plural_label().to_lowercase()
        ),
    }
}

fn base_row<E: ContentRecord>(record: &E, title: String, subtitle: Option<String>) -> AdminRowView {
    let path = E::KIND.admin_path();
    let id = record.id();
    AdminRowView {
        id: id.to_string(),
        title,
        subtitle,
        details: Vec::new(),
        status_label: None,
        edit_href: format!("{path}/{id}/edit"),
        actions: vec![AdminRowActionView {
            label: "Delete",
            action: format!("{path}/{id}/delete"),
            is_danger: true,
            confirm: Some(format!(
                "Delete this {}?",
                E::KIND.label().to_lowercase()
            )),
        }],
    }
}

impl AdminEditable for HeroContentRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Name", AdminFieldKind::Text),
        field("title", "Title", AdminFieldKind::Text),
        field("description", "Description", AdminFieldKind::TextArea),
    ];
}

impl AdminEditable for ProfileRecord {
    const FIELDS: &'static [FieldSpec] = &[
        optional("full_name", "Full name", AdminFieldKind::Text),
        optional("headline", "Headline", AdminFieldKind::Text),
        optional("about_text", "About text", AdminFieldKind::TextArea),
        optional("cta_button_text", "Call-to-action button text", AdminFieldKind::Text),
        optional("resume_button_text", "Resume button text", AdminFieldKind::Text),
        optional("resume_url", "Resume URL", AdminFieldKind::Url),
    ];
}

impl AdminEditable for SkillRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Skill name", AdminFieldKind::Text),
        FieldSpec {
            hint: Some("Icon identifier, e.g. FaRust"),
            ..field("icon", "Icon name", AdminFieldKind::Text)
        },
    ];
}

impl AdminListable for SkillRecord {
    fn row(&self, _tz: Tz) -> AdminRowView {
        base_row(self, self.name.clone(), Some(self.icon.clone()))
    }
}

impl AdminEditable for ProjectRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("title", "Title", AdminFieldKind::Text),
        field("description", "Description", AdminFieldKind::TextArea),
        optional("image_url", "Image URL", AdminFieldKind::Url),
        optional("github_url", "GitHub URL", AdminFieldKind::Url),
        optional("live_url", "Live URL", AdminFieldKind::Url),
        FieldSpec {
            hint: Some("Comma-separated, e.g. Rust, axum, Postgres"),
            ..field("technologies", "Technologies", AdminFieldKind::Text)
        },
    ];
}

impl AdminListable for ProjectRecord {
    fn row(&self, _tz: Tz) -> AdminRowView {
        let mut row = base_row(self, self.title.clone(), Some(self.description.clone()));
        row.details = self.technologies.clone();
        row
    }
}

impl AdminEditable for ExperienceRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("company", "Company", AdminFieldKind::Text),
        field("position", "Position", AdminFieldKind::Text),
        field("duration", "Duration", AdminFieldKind::Text),
        field("description", "Description", AdminFieldKind::TextArea),
    ];
}

impl AdminListable for ExperienceRecord {
    fn row(&self, _tz: Tz) -> AdminRowView {
        let mut row = base_row(
            self,
            format!("{} at {}", self.position, self.company),
            Some(self.description.clone()),
        );
        row.details = vec![self.duration.clone()];
        row
    }
}

impl AdminEditable for EducationRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("institution", "Institution", AdminFieldKind::Text),
        field("degree", "Degree", AdminFieldKind::Text),
        field("duration", "Duration", AdminFieldKind::Text),
        field("description", "Description", AdminFieldKind::TextArea),
    ];
}

impl AdminListable for EducationRecord {
    fn row(&self, _tz: Tz) -> AdminRowView {
        let mut row = base_row(
            self,
            self.degree.clone(),
            Some(self.institution.clone()),
        );
        row.details = vec![self.duration.clone()];
        row
    }
}

impl AdminEditable for BlogRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("title", "Title", AdminFieldKind::Text),
        field("excerpt", "Excerpt", AdminFieldKind::TextArea),
        FieldSpec {
            hint: Some("Markdown"),
            ..field("content", "Content", AdminFieldKind::TextArea)
        },
        optional("image_url", "Image URL", AdminFieldKind::Url),
        optional("published", "Published", AdminFieldKind::Checkbox),
    ];
}

impl AdminListable for BlogRecord {
    fn row(&self, tz: Tz) -> AdminRowView {
        let path = Self::KIND.admin_path();
        let mut row = base_row(self, self.title.clone(), Some(self.excerpt.clone()));
        row.details = vec![timezone::format_long_date(self.created_at, tz)];
        row.status_label = Some(if self.published { "Published" } else { "Draft" });

        let toggle = if self.published {
            AdminRowActionView {
                label: "Unpublish",
                action: format!("{path}/{}/unpublish", self.id),
                is_danger: false,
                confirm: None,
            }
        } else {
            AdminRowActionView {
                label: "Publish",
                action: format!("{path}/{}/publish", self.id),
                is_danger: false,
                confirm: None,
            }
        };
        row.actions.insert(0, toggle);
        row
    }
}
