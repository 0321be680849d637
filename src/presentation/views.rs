use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_title(self, title: &str) -> Self {
        let meta = PageMetaView {
            title: format!("{title} · {}", self.brand.title),
            ..self.meta
        };
        Self { meta, ..self }
    }

    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }
}

#[derive(Clone)]
pub struct HeroView {
    pub name: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AboutView {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub paragraphs: Vec<String>,
    pub cta_button_text: Option<String>,
    pub resume_button_text: String,
    pub resume_url: Option<String>,
}

#[derive(Clone)]
pub struct SkillView {
    pub name: String,
    pub icon: String,
}

#[derive(Clone)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub technologies: Vec<String>,
}

/// Experience or education row.
#[derive(Clone)]
pub struct TimelineEntryView {
    pub heading: String,
    pub subheading: String,
    pub duration: String,
    pub description: String,
}

#[derive(Clone)]
pub struct BlogCardView {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub published: String,
    pub iso_date: String,
}

#[derive(Clone)]
pub struct SocialLinkView {
    pub name: String,
    pub href: String,
    pub handle: Option<String>,
}

#[derive(Clone, Default)]
pub struct ContactView {
    pub email: Option<String>,
    pub email_href: Option<String>,
    pub phone: Option<String>,
    pub phone_href: Option<String>,
    pub location: Option<String>,
    pub socials: Vec<SocialLinkView>,
}

impl ContactView {
    pub fn has_details(&self) -> bool {
        self.email.is_some()
            || self.phone.is_some()
            || self.location.is_some()
            || !self.socials.is_empty()
    }
}

pub struct HomeView {
    pub hero: HeroView,
    pub about: Option<AboutView>,
    pub skills: Vec<SkillView>,
    pub projects: Vec<ProjectView>,
    pub experience: Vec<TimelineEntryView>,
    pub education: Vec<TimelineEntryView>,
    pub latest_posts: Vec<BlogCardView>,
    pub contact: ContactView,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeView>,
}

pub struct BlogIndexView {
    pub posts: Vec<BlogCardView>,
    pub page: u32,
    pub total_pages: u32,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

impl BlogIndexView {
    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }
}

#[derive(Template)]
#[template(path = "blog_index.html")]
pub struct BlogIndexTemplate {
    pub view: LayoutContext<BlogIndexView>,
}

pub struct BlogPostView {
    pub title: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub published: String,
    pub iso_date: String,
    pub content_html: String,
}

#[derive(Template)]
#[template(path = "blog_post.html")]
pub struct BlogPostTemplate {
    pub view: LayoutContext<BlogPostView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage."
                .to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

/// Split free text into paragraphs on blank lines.
pub fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// `tel:` target keeping digits and a leading `+`.
pub fn phone_href(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    let mut href = String::from("tel:");
    if trimmed.starts_with('+') {
        href.push('+');
    }
    href.extend(trimmed.chars().filter(char::is_ascii_digit));
    (href.len() > "tel:".len() + usize::from(trimmed.starts_with('+'))).then_some(href)
}
