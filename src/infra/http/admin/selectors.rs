//! Shared CSS selectors used by admin Datastar responses.

use crate::domain::types::ContentKind;

pub const PANEL: &str = "[data-role=\"panel\"]";
pub const EDITOR: &str = "[data-role=\"editor\"]";
pub const TOAST_STACK: &str = "[data-admin-toast=\"stack\"]";

/// List panel of one collection kind, e.g. `[data-admin-panel="skill"]`.
pub fn collection_panel(kind: ContentKind) -> String {
    format!("[data-admin-panel=\"{}\"]", kind.as_str())
}
