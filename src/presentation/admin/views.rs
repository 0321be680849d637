use askama::Template;

#[derive(Clone)]
pub struct AdminBrandView {
    pub title: String,
}

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
    pub open_in_new_tab: bool,
}

#[derive(Clone)]
pub struct AdminNavigationView {
    pub items: Vec<AdminNavigationItemView>,
}

#[derive(Clone)]
pub struct AdminMetaView {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub brand: AdminBrandView,
    pub navigation: AdminNavigationView,
    pub meta: AdminMetaView,
    pub account_email: String,
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: asset_version(),
            content,
        }
    }
}

fn asset_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Clone)]
pub struct AdminMetricView {
    pub label: String,
    pub value: u64,
    pub hint: Option<String>,
}

#[derive(Clone)]
pub struct AdminDashboardPanelView {
    pub title: String,
    pub caption: String,
    pub metrics: Vec<AdminMetricView>,
    pub empty_message: String,
}

impl AdminDashboardPanelView {
    pub fn has_metrics(&self) -> bool {
        !self.metrics.is_empty()
    }
}

#[derive(Clone)]
pub struct AdminActivityView {
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub occurred_at: String,
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub title: String,
    pub greeting: String,
    pub panels: Vec<AdminDashboardPanelView>,
    pub recent_activity: Vec<AdminActivityView>,
    pub empty_message: String,
}

impl AdminDashboardView {
    pub fn has_activity(&self) -> bool {
        !self.recent_activity.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}

#[derive(Clone)]
pub struct AdminToastItem {
    pub id: String,
    pub kind: &'static str,
    pub text: String,
    pub ttl_ms: u64,
}

#[derive(Template)]
#[template(path = "admin/toast_stack.html")]
pub struct AdminToastStackTemplate {
    pub toasts: Vec<AdminToastItem>,
}

pub struct AdminLoginView {
    pub site_title: String,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub view: AdminLoginView,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AdminFieldKind {
    Text,
    TextArea,
    Url,
    Checkbox,
}

#[derive(Clone)]
pub struct AdminFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: AdminFieldKind,
    pub value: String,
    pub required: bool,
    pub hint: Option<&'static str>,
    pub error: Option<&'static str>,
}

impl AdminFieldView {
    pub fn is_textarea(&self) -> bool {
        self.kind == AdminFieldKind::TextArea
    }

    pub fn is_checkbox(&self) -> bool {
        self.kind == AdminFieldKind::Checkbox
    }

    pub fn input_type(&self) -> &'static str {
        match self.kind {
            AdminFieldKind::Url => "url",
            _ => "text",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.value.as_str(), "on" | "true")
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct AdminEditorView {
    pub kind_slug: &'static str,
    pub heading: String,
    pub form_action: String,
    pub submit_label: &'static str,
    pub cancel_href: Option<String>,
    pub fields: Vec<AdminFieldView>,
    pub error_count: usize,
}

impl AdminEditorView {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct AdminEditorTemplate {
    pub editor: Option<AdminEditorView>,
}

#[derive(Clone)]
pub struct AdminRowActionView {
    pub label: &'static str,
    pub action: String,
    pub is_danger: bool,
    pub confirm: Option<String>,
}

#[derive(Clone)]
pub struct AdminRowView {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub details: Vec<String>,
    pub status_label: Option<&'static str>,
    pub edit_href: String,
    pub actions: Vec<AdminRowActionView>,
}

#[derive(Clone)]
pub struct AdminCollectionView {
    pub kind_slug: &'static str,
    pub heading: &'static str,
    pub new_href: String,
    pub add_label: String,
    pub rows: Vec<AdminRowView>,
    pub empty_message: String,
}

impl AdminCollectionView {
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// Full page around pre-rendered list and editor fragments.
#[derive(Clone)]
pub struct AdminCollectionPageView {
    pub kind_slug: &'static str,
    pub heading: &'static str,
    pub new_href: String,
    pub add_label: String,
    pub panel_html: String,
    pub editor_html: String,
}

#[derive(Template)]
#[template(path = "admin/collection.html")]
pub struct AdminCollectionTemplate {
    pub view: AdminLayout<AdminCollectionPageView>,
}

#[derive(Template)]
#[template(path = "admin/collection_panel.html")]
pub struct AdminCollectionPanelTemplate {
    pub content: AdminCollectionView,
}

#[derive(Clone)]
pub struct AdminSingletonView {
    pub last_saved: Option<String>,
    pub editor: AdminEditorView,
}

#[derive(Template)]
#[template(path = "admin/singleton_panel.html")]
pub struct AdminSingletonPanelTemplate {
    pub content: AdminSingletonView,
}

#[derive(Clone)]
pub struct AdminSingletonPageView {
    pub heading: &'static str,
    pub description: &'static str,
    pub panel_html: String,
}

#[derive(Template)]
#[template(path = "admin/singleton.html")]
pub struct AdminSingletonTemplate {
    pub view: AdminLayout<AdminSingletonPageView>,
}
