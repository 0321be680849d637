#![allow(dead_code)]

use std::{
    num::NonZeroU32,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use folio::{
    application::{
        admin::{
            audit::AdminAuditService,
            chrome::AdminChromeService,
            content::{AdminBlogService, AdminContentService, AdminSingletonService},
            dashboard::{AdminDashboardService, DashboardSources},
        },
        auth::AdminAuthService,
        portfolio::{PortfolioService, PortfolioSources},
        rate_limit::LoginRateLimiter,
        repos::{
            AdminSessionsRepo, AdminUsersRepo, AuditRepo, BlogsRepo, ContentRepo,
            CreateSessionParams, HealthRepo, RepoError, SingletonRepo,
        },
    },
    config::{SiteSettings, SocialLinkSettings},
    domain::entities::{
        AdminSessionRecord, AdminUserRecord, AuditLogRecord, BlogDraft, BlogRecord,
        ContentRecord, EducationDraft, EducationRecord, ExperienceDraft, ExperienceRecord,
        HeroContentDraft, HeroContentRecord, ProfileDraft, ProfileRecord, ProjectDraft,
        ProjectRecord, SkillDraft, SkillRecord,
    },
    infra::http::{AdminState, HttpState, SESSION_COOKIE, build_admin_router, build_router},
};
use http_body_util::BodyExt;
use time::{OffsetDateTime, macros::datetime};
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

static CLOCK: AtomicI64 = AtomicI64::new(0);

/// Strictly increasing timestamps so ordering assertions are deterministic.
fn tick() -> OffsetDateTime {
    datetime!(2026-01-01 00:00 UTC) + time::Duration::seconds(CLOCK.fetch_add(1, Ordering::SeqCst))
}

/// Builds a record from a draft the way the database would.
pub trait Stored: ContentRecord {
    const OLDEST_FIRST: bool = false;

    fn materialize(id: Uuid, draft: &Self::Draft, created_at: OffsetDateTime) -> Self;

    fn created_at(&self) -> OffsetDateTime;
}

impl Stored for HeroContentRecord {
    fn materialize(id: Uuid, draft: &HeroContentDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Stored for ProfileRecord {
    fn materialize(id: Uuid, draft: &ProfileDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            full_name: draft.full_name.clone(),
            headline: draft.headline.clone(),
            about_text: draft.about_text.clone(),
            cta_button_text: draft.cta_button_text.clone(),
            resume_button_text: draft.resume_button_text.clone(),
            resume_url: draft.resume_url.clone(),
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Stored for SkillRecord {
    const OLDEST_FIRST: bool = true;

    fn materialize(id: Uuid, draft: &SkillDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            icon: draft.icon.clone(),
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Stored for ProjectRecord {
    fn materialize(id: Uuid, draft: &ProjectDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            github_url: draft.github_url.clone(),
            live_url: draft.live_url.clone(),
            technologies: draft.technologies.clone(),
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Stored for ExperienceRecord {
    fn materialize(id: Uuid, draft: &ExperienceDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            company: draft.company.clone(),
            position: draft.position.clone(),
            duration: draft.duration.clone(),
            description: draft.description.clone(),
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Stored for EducationRecord {
    fn materialize(id: Uuid, draft: &EducationDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            institution: draft.institution.clone(),
            degree: draft.degree.clone(),
            duration: draft.duration.clone(),
            description: draft.description.clone(),
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Stored for BlogRecord {
    fn materialize(id: Uuid, draft: &BlogDraft, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            excerpt: draft.excerpt.clone(),
            content: draft.content.clone(),
            image_url: draft.image_url.clone(),
            published: draft.published,
            created_at,
            updated_at: created_at,
        }
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// One content table held in memory.
pub struct MemoryTable<E> {
    rows: Mutex<Vec<E>>,
}

impl<E> Default for MemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Stored> MemoryTable<E> {
    pub fn snapshot(&self) -> Vec<E> {
        self.rows.lock().unwrap().clone()
    }

    fn sorted(&self) -> Vec<E> {
        let mut rows = self.snapshot();
        rows.sort_by_key(|row| row.created_at());
        if !E::OLDEST_FIRST {
            rows.reverse();
        }
        rows
    }

    fn replace(&self, id: Uuid, draft: &E::Draft) -> Result<E, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(RepoError::NotFound)?;
        *row = E::materialize(id, draft, row.created_at());
        Ok(row.clone())
    }
}

#[async_trait]
impl<E: Stored> ContentRepo<E> for MemoryTable<E> {
    async fn list(&self) -> Result<Vec<E>, RepoError> {
        Ok(self.sorted())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, RepoError> {
        Ok(self.snapshot().into_iter().find(|row| row.id() == id))
    }

    async fn insert(&self, draft: &E::Draft) -> Result<E, RepoError> {
        let record = E::materialize(Uuid::new_v4(), draft, tick());
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: &E::Draft) -> Result<E, RepoError> {
        self.replace(id, draft)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl<E: Stored> SingletonRepo<E> for MemoryTable<E> {
    async fn load(&self) -> Result<Option<E>, RepoError> {
        let mut rows = self.snapshot();
        rows.sort_by_key(|row| row.created_at());
        Ok(rows.into_iter().next())
    }

    async fn save(&self, draft: &E::Draft) -> Result<E, RepoError> {
        match SingletonRepo::load(self).await? {
            Some(existing) => self.replace(existing.id(), draft),
            None => ContentRepo::insert(self, draft).await,
        }
    }
}

#[async_trait]
impl BlogsRepo for MemoryTable<BlogRecord> {
    async fn set_published(&self, id: Uuid, published: bool) -> Result<BlogRecord, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepoError::NotFound)?;
        row.published = published;
        Ok(row.clone())
    }

    async fn list_published(&self, limit: u32, offset: u64) -> Result<Vec<BlogRecord>, RepoError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|row| row.published)
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        Ok(self.snapshot().iter().filter(|row| row.published).count() as u64)
    }

    async fn find_published(&self, id: Uuid) -> Result<Option<BlogRecord>, RepoError> {
        Ok(self
            .snapshot()
            .into_iter()
            .find(|row| row.id == id && row.published))
    }
}

#[derive(Default)]
pub struct MemoryAdmins {
    users: Mutex<Vec<AdminUserRecord>>,
    sessions: Mutex<Vec<CreateSessionParams>>,
}

impl MemoryAdmins {
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Push every session's expiry into the past.
    pub fn expire_all_sessions(&self) {
        let past = OffsetDateTime::now_utc() - time::Duration::minutes(1);
        for session in self.sessions.lock().unwrap().iter_mut() {
            session.expires_at = past;
        }
    }
}

#[async_trait]
impl AdminUsersRepo for MemoryAdmins {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUserRecord>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminUserRecord, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.email.eq_ignore_ascii_case(email)) {
            return Err(RepoError::Duplicate {
                constraint: "admin_users_email_key".to_string(),
            });
        }
        let record = AdminUserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: tick(),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepoError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(RepoError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn list_admins(&self) -> Result<Vec<AdminUserRecord>, RepoError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

#[async_trait]
impl AdminSessionsRepo for MemoryAdmins {
    async fn create_session(&self, params: CreateSessionParams) -> Result<(), RepoError> {
        self.sessions.lock().unwrap().push(params);
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<AdminSessionRecord>, RepoError> {
        let session = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|session| session.id == id)
            .cloned();
        let Some(session) = session else {
            return Ok(None);
        };
        let Some(user) = AdminUsersRepo::find_by_id(self, session.user_id).await? else {
            return Ok(None);
        };
        Ok(Some(AdminSessionRecord {
            id: session.id,
            user_id: session.user_id,
            email: user.email,
            token_hash: session.token_hash,
            created_at: session.created_at,
            expires_at: session.expires_at,
            last_seen_at: None,
        }))
    }

    async fn touch_session(&self, _id: Uuid, _seen_at: OffsetDateTime) -> Result<(), RepoError> {
        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|session| session.id != id);
        if sessions.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|session| session.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|session| session.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryAudit {
    entries: Mutex<Vec<AuditLogRecord>>,
}

impl MemoryAudit {
    pub fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.action.clone())
            .collect()
    }
}

#[async_trait]
impl AuditRepo for MemoryAudit {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        self.entries.lock().unwrap().push(record);
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit as usize).cloned().collect())
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthRepo for AlwaysHealthy {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub hero: Arc<MemoryTable<HeroContentRecord>>,
    pub profile: Arc<MemoryTable<ProfileRecord>>,
    pub skills: Arc<MemoryTable<SkillRecord>>,
    pub projects: Arc<MemoryTable<ProjectRecord>>,
    pub experience: Arc<MemoryTable<ExperienceRecord>>,
    pub education: Arc<MemoryTable<EducationRecord>>,
    pub blogs: Arc<MemoryTable<BlogRecord>>,
    pub admins: Arc<MemoryAdmins>,
    pub audit: Arc<MemoryAudit>,
}

pub struct TestApp {
    pub public: Router,
    pub admin: Router,
    pub store: MemoryStore,
    pub auth: Arc<AdminAuthService>,
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        title: "Jane Doe".to_string(),
        public_url: "http://localhost:3000/".to_string(),
        timezone: chrono_tz::UTC,
        blog_page_size: NonZeroU32::new(2).unwrap(),
        contact_email: Some("jane@example.com".to_string()),
        contact_phone: None,
        contact_location: Some("Berlin".to_string()),
        social_links: vec![SocialLinkSettings {
            name: "GitHub".to_string(),
            url: "https://github.com/janedoe".to_string(),
            handle: Some("@janedoe".to_string()),
        }],
    }
}

pub async fn test_app() -> TestApp {
    let store = MemoryStore::default();
    let site = site_settings();

    let audit = AdminAuditService::new(store.audit.clone());
    let hero = AdminSingletonService::<HeroContentRecord>::new(store.hero.clone(), audit.clone());
    let profile = AdminSingletonService::<ProfileRecord>::new(store.profile.clone(), audit.clone());
    let skills = AdminContentService::<SkillRecord>::new(store.skills.clone(), audit.clone());
    let projects = AdminContentService::<ProjectRecord>::new(store.projects.clone(), audit.clone());
    let experience =
        AdminContentService::<ExperienceRecord>::new(store.experience.clone(), audit.clone());
    let education =
        AdminContentService::<EducationRecord>::new(store.education.clone(), audit.clone());
    let blogs = AdminContentService::<BlogRecord>::new(store.blogs.clone(), audit.clone());
    let blog_status = AdminBlogService::new(store.blogs.clone(), audit.clone());

    let dashboard = AdminDashboardService::new(
        DashboardSources {
            hero: hero.clone(),
            profile: profile.clone(),
            skills: skills.clone(),
            projects: projects.clone(),
            experience: experience.clone(),
            education: education.clone(),
            blogs: blogs.clone(),
            blog_status: blog_status.clone(),
            audit,
        },
        site.timezone,
    );

    let portfolio = PortfolioService::new(
        PortfolioSources {
            hero: store.hero.clone(),
            profile: store.profile.clone(),
            skills: store.skills.clone(),
            projects: store.projects.clone(),
            experience: store.experience.clone(),
            education: store.education.clone(),
            blogs: store.blogs.clone(),
        },
        site.clone(),
    );

    let auth = Arc::new(AdminAuthService::new(
        store.admins.clone(),
        store.admins.clone(),
        LoginRateLimiter::new(Duration::from_secs(60), 3),
        Duration::from_secs(3600),
        4,
    ));
    auth.create_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("seed admin");

    let health: Arc<dyn HealthRepo> = Arc::new(AlwaysHealthy);

    let public = build_router(HttpState {
        portfolio: Arc::new(portfolio),
        health: health.clone(),
    });

    let admin = build_admin_router(AdminState {
        auth: auth.clone(),
        chrome: Arc::new(AdminChromeService::new(
            site.title.clone(),
            site.public_url.clone(),
        )),
        dashboard: Arc::new(dashboard),
        hero,
        profile,
        skills,
        projects,
        experience,
        education,
        blogs,
        blog_status,
        health,
        timezone: site.timezone,
        cookie_secure: false,
        site_title: site.title.clone(),
    });

    TestApp {
        public,
        admin,
        store,
        auth,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_session(mut request: Request<Body>, token: &str) -> Request<Body> {
    let cookie = format!("{SESSION_COOKIE}={token}");
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

pub fn as_datastar(mut request: Request<Body>) -> Request<Body> {
    request
        .headers_mut()
        .insert("datastar-request", "true".parse().unwrap());
    request
}

/// Sign in through the service and return the raw session token.
pub async fn sign_in(app: &TestApp) -> String {
    app.auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("seeded admin signs in")
        .token
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
