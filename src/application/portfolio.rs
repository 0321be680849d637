//! Read side of the public portfolio site.

use std::sync::Arc;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::application::error::HttpError;
use crate::application::markdown::MarkdownRenderer;
use crate::application::repos::{BlogsRepo, ContentRepo, RepoError, SingletonRepo};
use crate::config::SiteSettings;
use crate::domain::entities::{
    BlogRecord, EducationRecord, ExperienceRecord, HeroContentRecord, ProfileRecord,
    ProjectRecord, SkillRecord,
};
use crate::presentation::views::{
    AboutView, BlogCardView, BlogIndexView, BlogPostView, BrandView, ContactView, FooterView,
    HeroView, HomeView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
    ProjectView, SkillView, SocialLinkView, TimelineEntryView, paragraphs, phone_href,
};
use crate::util::timezone;

const SOURCE: &str = "application::portfolio::PortfolioService";
const LATEST_POSTS_ON_HOME: u32 = 3;
const DEFAULT_RESUME_BUTTON: &str = "Resume";

const SECTION_LINKS: &[(&str, &str)] = &[
    ("About", "/#about"),
    ("Skills", "/#skills"),
    ("Projects", "/#projects"),
    ("Experience", "/#experience"),
    ("Education", "/#education"),
    ("Blog", "/blog"),
    ("Contact", "/#contact"),
];

/// Repositories backing the public pages.
#[derive(Clone)]
pub struct PortfolioSources {
    pub hero: Arc<dyn SingletonRepo<HeroContentRecord>>,
    pub profile: Arc<dyn SingletonRepo<ProfileRecord>>,
    pub skills: Arc<dyn ContentRepo<SkillRecord>>,
    pub projects: Arc<dyn ContentRepo<ProjectRecord>>,
    pub experience: Arc<dyn ContentRepo<ExperienceRecord>>,
    pub education: Arc<dyn ContentRepo<EducationRecord>>,
    pub blogs: Arc<dyn BlogsRepo>,
}

#[derive(Clone)]
pub struct PortfolioService {
    sources: PortfolioSources,
    site: SiteSettings,
    renderer: Arc<MarkdownRenderer>,
}

impl PortfolioService {
    pub fn new(sources: PortfolioSources, site: SiteSettings) -> Self {
        Self {
            sources,
            site,
            renderer: Arc::new(MarkdownRenderer::new()),
        }
    }

    pub fn chrome(&self) -> LayoutChrome {
        let year = timezone::current_year(self.site.timezone);
        LayoutChrome {
            brand: BrandView {
                title: self.site.title.clone(),
                href: "/".to_string(),
            },
            navigation: NavigationView {
                entries: SECTION_LINKS
                    .iter()
                    .map(|(label, href)| NavigationLinkView {
                        label: (*label).to_string(),
                        href: (*href).to_string(),
                    })
                    .collect(),
            },
            footer: FooterView {
                copy: format!("© {year} {}", self.site.title),
            },
            meta: PageMetaView {
                title: self.site.title.clone(),
                description: format!("{} portfolio", self.site.title),
                canonical: self.site.public_url.clone(),
            },
        }
    }

    pub async fn home(&self) -> Result<HomeView, HttpError> {
        let s = &self.sources;
        let (hero, profile, skills, projects, experience, education, latest) = tokio::try_join!(
            async { s.hero.load().await.map_err(|e| repo_failure("load_hero", e)) },
            async { s.profile.load().await.map_err(|e| repo_failure("load_profile", e)) },
            async { s.skills.list().await.map_err(|e| repo_failure("list_skills", e)) },
            async { s.projects.list().await.map_err(|e| repo_failure("list_projects", e)) },
            async {
                s.experience
                    .list()
                    .await
                    .map_err(|e| repo_failure("list_experience", e))
            },
            async {
                s.education
                    .list()
                    .await
                    .map_err(|e| repo_failure("list_education", e))
            },
            async {
                s.blogs
                    .list_published(LATEST_POSTS_ON_HOME, 0)
                    .await
                    .map_err(|e| repo_failure("list_published", e))
            },
        )?;

        Ok(HomeView {
            hero: self.hero_view(hero),
            about: profile.map(about_view),
            skills: skills
                .into_iter()
                .map(|skill| SkillView {
                    name: skill.name,
                    icon: skill.icon,
                })
                .collect(),
            projects: projects.into_iter().map(project_view).collect(),
            experience: experience
                .into_iter()
                .map(|row| TimelineEntryView {
                    heading: row.company,
                    subheading: row.position,
                    duration: row.duration,
                    description: row.description,
                })
                .collect(),
            education: education
                .into_iter()
                .map(|row| TimelineEntryView {
                    heading: row.institution,
                    subheading: row.degree,
                    duration: row.duration,
                    description: row.description,
                })
                .collect(),
            latest_posts: latest.iter().map(|post| self.blog_card(post)).collect(),
            contact: self.contact_view(),
        })
    }

    /// One page of published posts. `page` is 1-based; pages past the end are empty.
    pub async fn blog_page(&self, page: u32) -> Result<BlogIndexView, HttpError> {
        let page = page.max(1);
        let page_size = self.site.blog_page_size.get();
        let offset = u64::from(page - 1) * u64::from(page_size);

        let (posts, total) = tokio::try_join!(
            async {
                self.sources
                    .blogs
                    .list_published(page_size, offset)
                    .await
                    .map_err(|e| repo_failure("list_published", e))
            },
            async {
                self.sources
                    .blogs
                    .count_published()
                    .await
                    .map_err(|e| repo_failure("count_published", e))
            },
        )?;

        let total_pages = total.div_ceil(u64::from(page_size)).max(1);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

        Ok(BlogIndexView {
            posts: posts.iter().map(|post| self.blog_card(post)).collect(),
            page,
            total_pages,
            previous_href: (page > 1).then(|| blog_page_href(page - 1)),
            next_href: (page < total_pages).then(|| blog_page_href(page + 1)),
        })
    }

    /// A published post, or `None` for unknown and draft ids.
    pub async fn blog_post(&self, id: Uuid) -> Result<Option<BlogPostView>, HttpError> {
        let record = self
            .sources
            .blogs
            .find_published(id)
            .await
            .map_err(|e| repo_failure("find_published", e))?;

        Ok(record.map(|post| BlogPostView {
            content_html: self.renderer.render(&post.content),
            published: timezone::format_long_date(post.created_at, self.site.timezone),
            iso_date: timezone::iso_date(post.created_at, self.site.timezone),
            title: post.title,
            excerpt: post.excerpt,
            image_url: post.image_url,
        }))
    }

    fn hero_view(&self, hero: Option<HeroContentRecord>) -> HeroView {
        match hero {
            Some(hero) => HeroView {
                name: hero.name,
                title: hero.title,
                description: hero.description,
            },
            None => HeroView {
                name: self.site.title.clone(),
                title: String::new(),
                description: String::new(),
            },
        }
    }

    fn blog_card(&self, post: &BlogRecord) -> BlogCardView {
        BlogCardView {
            href: format!("/blog/{}", post.id),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            published: timezone::format_long_date(post.created_at, self.site.timezone),
            iso_date: timezone::iso_date(post.created_at, self.site.timezone),
        }
    }

    fn contact_view(&self) -> ContactView {
        ContactView {
            email_href: self
                .site
                .contact_email
                .as_ref()
                .map(|email| format!("mailto:{email}")),
            email: self.site.contact_email.clone(),
            phone_href: self.site.contact_phone.as_deref().and_then(phone_href),
            phone: self.site.contact_phone.clone(),
            location: self.site.contact_location.clone(),
            socials: self
                .site
                .social_links
                .iter()
                .map(|link| SocialLinkView {
                    name: link.name.clone(),
                    href: link.url.clone(),
                    handle: link.handle.clone(),
                })
                .collect(),
        }
    }
}

fn about_view(profile: ProfileRecord) -> AboutView {
    AboutView {
        full_name: profile.full_name,
        headline: profile.headline,
        paragraphs: profile
            .about_text
            .as_deref()
            .map(paragraphs)
            .unwrap_or_default(),
        cta_button_text: profile.cta_button_text,
        resume_button_text: profile
            .resume_button_text
            .unwrap_or_else(|| DEFAULT_RESUME_BUTTON.to_string()),
        resume_url: profile.resume_url,
    }
}

fn project_view(project: ProjectRecord) -> ProjectView {
    ProjectView {
        title: project.title,
        description: project.description,
        image_url: project.image_url,
        github_url: project.github_url,
        live_url: project.live_url,
        technologies: project.technologies,
    }
}

fn blog_page_href(page: u32) -> String {
    if page <= 1 {
        "/blog".to_string()
    } else {
        format!("/blog?page={page}")
    }
}

fn repo_failure(operation: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load portfolio content",
        format!("{operation} failed: {err}"),
    )
}
