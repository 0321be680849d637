use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder, postgres::PgRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{ContentRepo, RepoError},
    domain::entities::{
        BlogDraft, BlogRecord, ContentRecord, EducationDraft, EducationRecord, ExperienceDraft,
        ExperienceRecord, HeroContentDraft, HeroContentRecord, ProfileDraft, ProfileRecord,
        ProjectDraft, ProjectRecord, SkillDraft, SkillRecord,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

/// A bound value for one editable column.
pub enum Column {
    Text(String),
    OptionalText(Option<String>),
    TextList(Vec<String>),
    Flag(bool),
}

impl Column {
    fn push_bind(self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Column::Text(value) => {
                qb.push_bind(value);
            }
            Column::OptionalText(value) => {
                qb.push_bind(value);
            }
            Column::TextList(value) => {
                qb.push_bind(value);
            }
            Column::Flag(value) => {
                qb.push_bind(value);
            }
        }
    }
}

/// Table mapping for a content kind. `COLUMNS` and `values` line up by position.
pub trait ContentTable: ContentRecord {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Self>;

    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str = "created_at DESC, id DESC";

    fn values(draft: &Self::Draft) -> Vec<Column>;
}

pub(super) fn select_sql<E: ContentTable>() -> String {
    format!(
        "SELECT id, {}, created_at, updated_at FROM {}",
        E::COLUMNS.join(", "),
        E::TABLE
    )
}

pub(super) fn returning_sql<E: ContentTable>() -> String {
    format!(" RETURNING id, {}, created_at, updated_at", E::COLUMNS.join(", "))
}

pub(super) fn insert_query<E: ContentTable>(draft: &E::Draft) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        E::TABLE,
        E::COLUMNS.join(", ")
    ));
    for (index, value) in E::values(draft).into_iter().enumerate() {
        if index > 0 {
            qb.push(", ");
        }
        value.push_bind(&mut qb);
    }
    qb.push(")");
    qb.push(returning_sql::<E>());
    qb
}

pub(super) fn update_query<E: ContentTable>(
    id: Uuid,
    draft: &E::Draft,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));
    for (column, value) in E::COLUMNS.iter().zip(E::values(draft)) {
        qb.push(*column);
        qb.push(" = ");
        value.push_bind(&mut qb);
        qb.push(", ");
    }
    qb.push("updated_at = now() WHERE id = ");
    qb.push_bind(id);
    qb.push(returning_sql::<E>());
    qb
}

#[async_trait]
impl<E: ContentTable> ContentRepo<E> for PostgresRepositories {
    async fn list(&self) -> Result<Vec<E>, RepoError> {
        let sql = format!("{} ORDER BY {}", select_sql::<E>(), E::ORDER_BY);
        let rows = sqlx::query_as::<_, E::Row>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, RepoError> {
        let sql = format!("{} WHERE id = $1", select_sql::<E>());
        let row = sqlx::query_as::<_, E::Row>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, draft: &E::Draft) -> Result<E, RepoError> {
        let mut qb = insert_query::<E>(draft);
        let row = qb
            .build_query_as::<E::Row>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: Uuid, draft: &E::Draft) -> Result<E, RepoError> {
        let mut qb = update_query::<E>(id, draft);
        let row = qb
            .build_query_as::<E::Row>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        row.map(Into::into).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let total: i64 = sqlx::query_scalar(&sql)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(total)
    }
}

#[derive(FromRow)]
pub struct HeroContentRow {
    id: Uuid,
    name: String,
    title: String,
    description: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<HeroContentRow> for HeroContentRecord {
    fn from(row: HeroContentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for HeroContentRecord {
    type Row = HeroContentRow;
    const TABLE: &'static str = "hero_content";
    const COLUMNS: &'static [&'static str] = &["name", "title", "description"];

    fn values(draft: &HeroContentDraft) -> Vec<Column> {
        vec![
            Column::Text(draft.name.clone()),
            Column::Text(draft.title.clone()),
            Column::Text(draft.description.clone()),
        ]
    }
}

#[derive(FromRow)]
pub struct ProfileRow {
    id: Uuid,
    full_name: Option<String>,
    headline: Option<String>,
    about_text: Option<String>,
    cta_button_text: Option<String>,
    resume_button_text: Option<String>,
    resume_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            headline: row.headline,
            about_text: row.about_text,
            cta_button_text: row.cta_button_text,
            resume_button_text: row.resume_button_text,
            resume_url: row.resume_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for ProfileRecord {
    type Row = ProfileRow;
    const TABLE: &'static str = "profile";
    const COLUMNS: &'static [&'static str] = &[
        "full_name",
        "headline",
        "about_text",
        "cta_button_text",
        "resume_button_text",
        "resume_url",
    ];

    fn values(draft: &ProfileDraft) -> Vec<Column> {
        vec![
            Column::OptionalText(draft.full_name.clone()),
            Column::OptionalText(draft.headline.clone()),
            Column::OptionalText(draft.about_text.clone()),
            Column::OptionalText(draft.cta_button_text.clone()),
            Column::OptionalText(draft.resume_button_text.clone()),
            Column::OptionalText(draft.resume_url.clone()),
        ]
    }
}

#[derive(FromRow)]
pub struct SkillRow {
    id: Uuid,
    name: String,
    icon: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<SkillRow> for SkillRecord {
    fn from(row: SkillRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for SkillRecord {
    type Row = SkillRow;
    const TABLE: &'static str = "skills";
    const COLUMNS: &'static [&'static str] = &["name", "icon"];
    const ORDER_BY: &'static str = "created_at ASC, id ASC";

    fn values(draft: &SkillDraft) -> Vec<Column> {
        vec![
            Column::Text(draft.name.clone()),
            Column::Text(draft.icon.clone()),
        ]
    }
}

#[derive(FromRow)]
pub struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    image_url: Option<String>,
    github_url: Option<String>,
    live_url: Option<String>,
    technologies: Vec<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            github_url: row.github_url,
            live_url: row.live_url,
            technologies: row.technologies,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for ProjectRecord {
    type Row = ProjectRow;
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "description",
        "image_url",
        "github_url",
        "live_url",
        "technologies",
    ];

    fn values(draft: &ProjectDraft) -> Vec<Column> {
        vec![
            Column::Text(draft.title.clone()),
            Column::Text(draft.description.clone()),
            Column::OptionalText(draft.image_url.clone()),
            Column::OptionalText(draft.github_url.clone()),
            Column::OptionalText(draft.live_url.clone()),
            Column::TextList(draft.technologies.clone()),
        ]
    }
}

#[derive(FromRow)]
pub struct ExperienceRow {
    id: Uuid,
    company: String,
    position: String,
    duration: String,
    description: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ExperienceRow> for ExperienceRecord {
    fn from(row: ExperienceRow) -> Self {
        Self {
            id: row.id,
            company: row.company,
            position: row.position,
            duration: row.duration,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for ExperienceRecord {
    type Row = ExperienceRow;
    const TABLE: &'static str = "experience";
    const COLUMNS: &'static [&'static str] = &["company", "position", "duration", "description"];

    fn values(draft: &ExperienceDraft) -> Vec<Column> {
        vec![
            Column::Text(draft.company.clone()),
            Column::Text(draft.position.clone()),
            Column::Text(draft.duration.clone()),
            Column::Text(draft.description.clone()),
        ]
    }
}

#[derive(FromRow)]
pub struct EducationRow {
    id: Uuid,
    institution: String,
    degree: String,
    duration: String,
    description: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<EducationRow> for EducationRecord {
    fn from(row: EducationRow) -> Self {
        Self {
            id: row.id,
            institution: row.institution,
            degree: row.degree,
            duration: row.duration,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for EducationRecord {
    type Row = EducationRow;
    const TABLE: &'static str = "education";
    const COLUMNS: &'static [&'static str] = &["institution", "degree", "duration", "description"];

    fn values(draft: &EducationDraft) -> Vec<Column> {
        vec![
            Column::Text(draft.institution.clone()),
            Column::Text(draft.degree.clone()),
            Column::Text(draft.duration.clone()),
            Column::Text(draft.description.clone()),
        ]
    }
}

#[derive(FromRow)]
pub struct BlogRow {
    id: Uuid,
    title: String,
    excerpt: String,
    content: String,
    image_url: Option<String>,
    published: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BlogRow> for BlogRecord {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            image_url: row.image_url,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ContentTable for BlogRecord {
    type Row = BlogRow;
    const TABLE: &'static str = "blogs";
    const COLUMNS: &'static [&'static str] =
        &["title", "excerpt", "content", "image_url", "published"];

    fn values(draft: &BlogDraft) -> Vec<Column> {
        vec![
            Column::Text(draft.title.clone()),
            Column::Text(draft.excerpt.clone()),
            Column::Text(draft.content.clone()),
            Column::OptionalText(draft.image_url.clone()),
            Column::Flag(draft.published),
        ]
    }
}
