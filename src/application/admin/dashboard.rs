use axum::http::StatusCode;
use chrono_tz::Tz;

use crate::application::{
    admin::{
        audit::AdminAuditService,
        content::{AdminBlogService, AdminContentError, AdminContentService, AdminSingletonService},
    },
    auth::AdminPrincipal,
    error::HttpError,
    repos::RepoError,
};
use crate::domain::entities::{
    BlogRecord, EducationRecord, ExperienceRecord, HeroContentRecord, ProfileRecord,
    ProjectRecord, SkillRecord,
};
use crate::presentation::admin::views::{
    AdminActivityView, AdminDashboardPanelView, AdminDashboardView, AdminMetricView,
};
use crate::util::timezone;

const SOURCE: &str = "application::admin::dashboard::AdminDashboardService";
const CONTENT_FAILURE_MESSAGE: &str = "Failed to compute content dashboard metrics";
const BLOG_FAILURE_MESSAGE: &str = "Failed to compute blog dashboard metrics";
const PROFILE_FAILURE_MESSAGE: &str = "Failed to load profile dashboard metrics";
const ACTIVITY_FAILURE_MESSAGE: &str = "Failed to load recent admin activity";
const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// Services the dashboard reads from.
#[derive(Clone)]
pub struct DashboardSources {
    pub hero: AdminSingletonService<HeroContentRecord>,
    pub profile: AdminSingletonService<ProfileRecord>,
    pub skills: AdminContentService<SkillRecord>,
    pub projects: AdminContentService<ProjectRecord>,
    pub experience: AdminContentService<ExperienceRecord>,
    pub education: AdminContentService<EducationRecord>,
    pub blogs: AdminContentService<BlogRecord>,
    pub blog_status: AdminBlogService,
    pub audit: AdminAuditService,
}

#[derive(Clone)]
pub struct AdminDashboardService {
    sources: DashboardSources,
    timezone: Tz,
}

impl AdminDashboardService {
    pub fn new(sources: DashboardSources, timezone: Tz) -> Self {
        Self { sources, timezone }
    }

    pub async fn overview(&self, principal: &AdminPrincipal) -> Result<AdminDashboardView, HttpError> {
        let (content_panel, blog_panel, profile_panel, recent_activity) = tokio::try_join!(
            self.collect_content_panel(),
            self.collect_blog_panel(),
            self.collect_profile_panel(),
            self.collect_recent_activity(),
        )?;

        Ok(AdminDashboardView {
            title: "Dashboard".to_string(),
            greeting: format!("Signed in as {}", principal.email),
            panels: vec![content_panel, blog_panel, profile_panel],
            recent_activity,
            empty_message: "No content has been created yet.".to_string(),
        })
    }

    async fn collect_content_panel(&self) -> Result<AdminDashboardPanelView, HttpError> {
        let s = &self.sources;
        let (skills, projects, experience, education, blogs) = tokio::try_join!(
            s.skills.count(),
            s.projects.count(),
            s.experience.count(),
            s.education.count(),
            s.blogs.count(),
        )
        .map_err(|err| repo_failure(CONTENT_FAILURE_MESSAGE, err))?;

        Ok(AdminDashboardPanelView {
            title: "Content".to_string(),
            caption: "Rows per portfolio section".to_string(),
            metrics: vec![
                metric("Skills", skills, None),
                metric("Projects", projects, None),
                metric("Experience", experience, None),
                metric("Education", education, None),
                metric("Blog posts", blogs, None),
            ],
            empty_message: "Nothing to count yet.".to_string(),
        })
    }

    async fn collect_blog_panel(&self) -> Result<AdminDashboardPanelView, HttpError> {
        let total = self
            .sources
            .blogs
            .count()
            .await
            .map_err(|err| repo_failure(BLOG_FAILURE_MESSAGE, err))?;
        let counts = self
            .sources
            .blog_status
            .status_counts(total)
            .await
            .map_err(|err| repo_failure(BLOG_FAILURE_MESSAGE, err))?;

        Ok(AdminDashboardPanelView {
            title: "Blog".to_string(),
            caption: "Publication status".to_string(),
            metrics: vec![
                metric("Published", counts.published, None),
                metric("Drafts", counts.drafts, None),
            ],
            empty_message: "No blog posts yet.".to_string(),
        })
    }

    async fn collect_profile_panel(&self) -> Result<AdminDashboardPanelView, HttpError> {
        let (hero, profile) = tokio::try_join!(self.sources.hero.load(), self.sources.profile.load())
            .map_err(|err| content_failure(PROFILE_FAILURE_MESSAGE, err))?;

        Ok(AdminDashboardPanelView {
            title: "Profile".to_string(),
            caption: "Single-record sections".to_string(),
            metrics: vec![
                configured_metric("Hero", hero.is_some()),
                configured_metric("About", profile.is_some()),
            ],
            empty_message: String::new(),
        })
    }

    async fn collect_recent_activity(&self) -> Result<Vec<AdminActivityView>, HttpError> {
        let records = self
            .sources
            .audit
            .list_recent(RECENT_ACTIVITY_LIMIT)
            .await
            .map_err(|err| repo_failure(ACTIVITY_FAILURE_MESSAGE, err))?;

        Ok(records
            .into_iter()
            .map(|record| AdminActivityView {
                actor: record.actor,
                action: record.action,
                entity_type: record.entity_type,
                entity_id: record.entity_id,
                occurred_at: timezone::format_timestamp(record.created_at, self.timezone),
            })
            .collect())
    }
}

fn metric(label: &str, value: u64, hint: Option<&str>) -> AdminMetricView {
    AdminMetricView {
        label: label.to_string(),
        value,
        hint: hint.map(str::to_string),
    }
}

fn configured_metric(label: &str, configured: bool) -> AdminMetricView {
    if configured {
        metric(label, 1, Some("Configured"))
    } else {
        metric(label, 0, Some("Not set"))
    }
}

fn repo_failure(message: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        message,
        err.to_string(),
    )
}

fn content_failure(message: &'static str, err: AdminContentError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        message,
        err.to_string(),
    )
}
