use crate::application::auth::AdminPrincipal;
use crate::domain::types::ContentKind;
use crate::presentation::admin::views::{
    AdminBrandView, AdminChrome, AdminMetaView, AdminNavigationItemView, AdminNavigationView,
};

const NAV_KINDS: [ContentKind; 7] = [
    ContentKind::Hero,
    ContentKind::Profile,
    ContentKind::Skill,
    ContentKind::Project,
    ContentKind::Experience,
    ContentKind::Education,
    ContentKind::Blog,
];

/// Builds the admin layout frame: brand, navigation and page meta.
#[derive(Clone)]
pub struct AdminChromeService {
    site_title: String,
    public_url: String,
}

impl AdminChromeService {
    pub fn new(site_title: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
            public_url: public_url.into(),
        }
    }

    pub fn load(&self, active_path: &str, principal: &AdminPrincipal) -> AdminChrome {
        let brand = AdminBrandView {
            title: format!("{} Admin", self.site_title),
        };

        let mut items = vec![nav_item("/", "Dashboard", active_path)];
        items.extend(
            NAV_KINDS
                .iter()
                .map(|kind| nav_item(kind.admin_path(), kind.plural_label(), active_path)),
        );
        items.push(AdminNavigationItemView {
            label: "View site".to_string(),
            href: self.public_url.clone(),
            is_active: false,
            open_in_new_tab: true,
        });

        let navigation = AdminNavigationView { items };

        let active_label = navigation
            .items
            .iter()
            .find(|item| item.is_active)
            .map(|item| item.label.as_str())
            .unwrap_or("Dashboard");

        let meta = AdminMetaView {
            title: format!("{} · {}", brand.title, active_label),
            description: "Portfolio content management".to_string(),
        };

        AdminChrome {
            brand,
            navigation,
            meta,
            account_email: principal.email.clone(),
        }
    }
}

fn nav_item(href: &str, label: &str, active_path: &str) -> AdminNavigationItemView {
    AdminNavigationItemView {
        label: label.to_string(),
        href: href.to_string(),
        is_active: href == active_path,
        open_in_new_tab: false,
    }
}
