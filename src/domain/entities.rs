//! Persisted records and the validated drafts that create or replace them.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::types::ContentKind;
use super::validation::{FieldErrors, FormFields, Validator};

/// A row the admin edits through a form.
pub trait ContentRecord: Clone + Send + Sync + 'static {
    type Draft: ContentDraft;

    const KIND: ContentKind;

    fn id(&self) -> Uuid;

    /// Current values, used to pre-fill the editor.
    fn to_draft(&self) -> Self::Draft;
}

/// Validated editor input for one content kind.
pub trait ContentDraft: Clone + Send + Sync + Serialize + 'static {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroContentRecord {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroContentDraft {
    pub name: String,
    pub title: String,
    pub description: String,
}

impl ContentDraft for HeroContentDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            name: v.required("name", "Name is required"),
            title: v.required("title", "Title is required"),
            description: v.required("description", "Description is required"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for HeroContentRecord {
    type Draft = HeroContentDraft;
    const KIND: ContentKind = ContentKind::Hero;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> HeroContentDraft {
        HeroContentDraft {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub about_text: Option<String>,
    pub cta_button_text: Option<String>,
    pub resume_button_text: Option<String>,
    pub resume_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileDraft {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub about_text: Option<String>,
    pub cta_button_text: Option<String>,
    pub resume_button_text: Option<String>,
    pub resume_url: Option<String>,
}

impl ContentDraft for ProfileDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            full_name: v.optional("full_name"),
            headline: v.optional("headline"),
            about_text: v.optional("about_text"),
            cta_button_text: v.optional("cta_button_text"),
            resume_button_text: v.optional("resume_button_text"),
            resume_url: v.optional_url("resume_url"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for ProfileRecord {
    type Draft = ProfileDraft;
    const KIND: ContentKind = ContentKind::Profile;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> ProfileDraft {
        ProfileDraft {
            full_name: self.full_name.clone(),
            headline: self.headline.clone(),
            about_text: self.about_text.clone(),
            cta_button_text: self.cta_button_text.clone(),
            resume_button_text: self.resume_button_text.clone(),
            resume_url: self.resume_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRecord {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillDraft {
    pub name: String,
    pub icon: String,
}

impl ContentDraft for SkillDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            name: v.required("name", "Skill name is required"),
            icon: v.required("icon", "Icon name is required"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for SkillRecord {
    type Draft = SkillDraft;
    const KIND: ContentKind = ContentKind::Skill;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> SkillDraft {
        SkillDraft {
            name: self.name.clone(),
            icon: self.icon.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub technologies: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub technologies: Vec<String>,
}

impl ContentDraft for ProjectDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            title: v.required("title", "Title is required"),
            description: v.required("description", "Description is required"),
            image_url: v.optional_url("image_url"),
            github_url: v.optional_url("github_url"),
            live_url: v.optional_url("live_url"),
            technologies: v.list("technologies", "At least one technology is required"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for ProjectRecord {
    type Draft = ProjectDraft;
    const KIND: ContentKind = ContentKind::Project;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            technologies: self.technologies.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceRecord {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceDraft {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
}

impl ContentDraft for ExperienceDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            company: v.required("company", "Company is required"),
            position: v.required("position", "Position is required"),
            duration: v.required("duration", "Duration is required"),
            description: v.required("description", "Description is required"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for ExperienceRecord {
    type Draft = ExperienceDraft;
    const KIND: ContentKind = ContentKind::Experience;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> ExperienceDraft {
        ExperienceDraft {
            company: self.company.clone(),
            position: self.position.clone(),
            duration: self.duration.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationRecord {
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub duration: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationDraft {
    pub institution: String,
    pub degree: String,
    pub duration: String,
    pub description: String,
}

impl ContentDraft for EducationDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            institution: v.required("institution", "Institution is required"),
            degree: v.required("degree", "Degree is required"),
            duration: v.required("duration", "Duration is required"),
            description: v.required("description", "Description is required"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for EducationRecord {
    type Draft = EducationDraft;
    const KIND: ContentKind = ContentKind::Education;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> EducationDraft {
        EducationDraft {
            institution: self.institution.clone(),
            degree: self.degree.clone(),
            duration: self.duration.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRecord {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    /// Markdown source.
    pub content: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub published: bool,
}

impl ContentDraft for BlogDraft {
    fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut v = Validator::new(fields);
        let draft = Self {
            title: v.required("title", "Title is required"),
            excerpt: v.required("excerpt", "Excerpt is required"),
            content: v.required("content", "Content is required"),
            image_url: v.optional_url("image_url"),
            published: v.flag("published"),
        };
        v.finish(draft)
    }
}

impl ContentRecord for BlogRecord {
    type Draft = BlogDraft;
    const KIND: ContentKind = ContentKind::Blog;

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_draft(&self) -> BlogDraft {
        BlogDraft {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            published: self.published,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminUserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct AdminSessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Email of the owning admin, joined at lookup.
    pub email: String,
    pub token_hash: Vec<u8>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub last_seen_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub payload_text: Option<String>,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn project_draft_splits_technologies() {
        let draft = ProjectDraft::parse(&fields(&[
            ("title", " Folio "),
            ("description", "Portfolio server"),
            ("technologies", "Rust, axum, sqlx"),
            ("github_url", ""),
        ]))
        .expect("valid project");

        assert_eq!(draft.title, "Folio");
        assert_eq!(draft.technologies, vec!["Rust", "axum", "sqlx"]);
        assert_eq!(draft.github_url, None);
    }

    #[test]
    fn project_draft_reports_every_missing_field() {
        let errors = ProjectDraft::parse(&fields(&[("technologies", " , ")]))
            .expect_err("empty project fails");

        assert_eq!(errors.message_for("title"), Some("Title is required"));
        assert_eq!(
            errors.message_for("description"),
            Some("Description is required")
        );
        assert_eq!(
            errors.message_for("technologies"),
            Some("At least one technology is required")
        );
    }

    #[test]
    fn skill_draft_uses_skill_messages() {
        let errors = SkillDraft::parse(&FormFields::default()).expect_err("empty skill fails");
        assert_eq!(errors.message_for("name"), Some("Skill name is required"));
        assert_eq!(errors.message_for("icon"), Some("Icon name is required"));
    }

    #[test]
    fn blog_draft_reads_published_checkbox() {
        let draft = BlogDraft::parse(&fields(&[
            ("title", "Hello"),
            ("excerpt", "First post"),
            ("content", "# Hello"),
            ("published", "on"),
        ]))
        .expect("valid blog");
        assert!(draft.published);

        let draft = BlogDraft::parse(&fields(&[
            ("title", "Hello"),
            ("excerpt", "First post"),
            ("content", "# Hello"),
        ]))
        .expect("valid blog");
        assert!(!draft.published);
    }

    #[test]
    fn profile_draft_allows_blank_fields_but_checks_resume_url() {
        let draft = ProfileDraft::parse(&FormFields::default()).expect("empty profile is valid");
        assert_eq!(draft, ProfileDraft::default());

        let errors = ProfileDraft::parse(&fields(&[("resume_url", "not a url")]))
            .expect_err("bad resume url");
        assert!(errors.message_for("resume_url").is_some());
    }

    #[test]
    fn record_round_trips_into_editor_draft() {
        let now = OffsetDateTime::now_utc();
        let record = ExperienceRecord {
            id: Uuid::new_v4(),
            company: "Acme".into(),
            position: "Engineer".into(),
            duration: "2020 - 2024".into(),
            description: "Built things".into(),
            created_at: now,
            updated_at: now,
        };

        let draft = record.to_draft();
        assert_eq!(draft.company, "Acme");
        assert_eq!(ExperienceRecord::KIND, ContentKind::Experience);
    }
}
