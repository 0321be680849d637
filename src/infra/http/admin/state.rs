use std::sync::Arc;

use chrono_tz::Tz;

use crate::application::admin::{
    chrome::AdminChromeService,
    content::{AdminBlogService, AdminContentService, AdminSingletonService},
    dashboard::AdminDashboardService,
};
use crate::application::auth::AdminAuthService;
use crate::application::repos::HealthRepo;
use crate::domain::entities::{
    BlogRecord, EducationRecord, ExperienceRecord, HeroContentRecord, ProfileRecord,
    ProjectRecord, SkillRecord,
};

#[derive(Clone)]
pub struct AdminState {
    pub auth: Arc<AdminAuthService>,
    pub chrome: Arc<AdminChromeService>,
    pub dashboard: Arc<AdminDashboardService>,
    pub hero: AdminSingletonService<HeroContentRecord>,
    pub profile: AdminSingletonService<ProfileRecord>,
    pub skills: AdminContentService<SkillRecord>,
    pub projects: AdminContentService<ProjectRecord>,
    pub experience: AdminContentService<ExperienceRecord>,
    pub education: AdminContentService<EducationRecord>,
    pub blogs: AdminContentService<BlogRecord>,
    pub blog_status: AdminBlogService,
    pub health: Arc<dyn HealthRepo>,
    pub timezone: Tz,
    pub cookie_secure: bool,
    pub site_title: String,
}
