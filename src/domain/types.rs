//! Shared enumerations for portfolio content.

use std::fmt::{Display, Formatter};

/// Every table the admin can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Hero,
    Profile,
    Skill,
    Project,
    Experience,
    Education,
    Blog,
}

impl ContentKind {
    pub const ALL: [ContentKind; 7] = [
        ContentKind::Hero,
        ContentKind::Profile,
        ContentKind::Skill,
        ContentKind::Project,
        ContentKind::Experience,
        ContentKind::Education,
        ContentKind::Blog,
    ];

    /// Identifier used in audit records and selectors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Profile => "profile",
            Self::Skill => "skill",
            Self::Project => "project",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Blog => "blog",
        }
    }

    /// Singular label used in toasts ("Skill added successfully").
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero content",
            Self::Profile => "Profile",
            Self::Skill => "Skill",
            Self::Project => "Project",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Blog => "Blog",
        }
    }

    /// Heading shown on the admin page for this kind.
    pub fn plural_label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Profile => "About",
            Self::Skill => "Skills",
            Self::Project => "Projects",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Blog => "Blog",
        }
    }

    pub fn admin_path(self) -> &'static str {
        match self {
            Self::Hero => "/hero",
            Self::Profile => "/about",
            Self::Skill => "/skills",
            Self::Project => "/projects",
            Self::Experience => "/experience",
            Self::Education => "/education",
            Self::Blog => "/blog",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Publish,
    Unpublish,
    Save,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Save => "save",
        }
    }

    /// Audit action key such as `skill.create`.
    pub fn key(self, kind: ContentKind) -> String {
        format!("{}.{}", kind.as_str(), self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_paths_are_unique() {
        let mut paths: Vec<_> = ContentKind::ALL.iter().map(|k| k.admin_path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), ContentKind::ALL.len());
    }

    #[test]
    fn audit_keys_join_kind_and_action() {
        assert_eq!(AuditAction::Create.key(ContentKind::Skill), "skill.create");
        assert_eq!(AuditAction::Unpublish.key(ContentKind::Blog), "blog.unpublish");
    }
}
