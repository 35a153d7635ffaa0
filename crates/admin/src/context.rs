//! Per-request context handed to visibility predicates and contributors.
//!
//! A request carries the acting user, the interface language, and a
//! reference to the assembled [`AdminSite`] so contributors can reverse
//! URLs, translate labels, and consult permission policies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::{PagePermission, UserPagePermissions};
use crate::site::AdminSite;

fn default_true() -> bool {
    true
}

/// A page-scoped permission grant.
///
/// `path` lists the page IDs from the tree root down to `page_id`
/// inclusive; the grant covers that page and all of its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGrant {
    pub page_id: i64,
    pub path: Vec<i64>,
    pub permission: PagePermission,
}

/// The acting user for the current request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// User ID (Uuid::nil() for anonymous).
    pub id: Uuid,
    #[serde(default)]
    pub username: String,
    /// Whether the user is authenticated.
    #[serde(default)]
    pub authenticated: bool,
    /// Inactive users hold no permissions at all.
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// False for accounts that authenticate externally (no local password).
    #[serde(default)]
    pub has_usable_password: bool,
    /// Model permission codenames, e.g. "portico_core.add_collection".
    #[serde(default)]
    pub permissions: HashSet<String>,
    /// Page tree permission grants.
    #[serde(default)]
    pub page_grants: Vec<PageGrant>,
}

impl UserContext {
    /// Create context for anonymous user.
    pub fn anonymous() -> Self {
        Self {
            id: Uuid::nil(),
            username: String::new(),
            authenticated: false,
            is_active: true,
            is_superuser: false,
            has_usable_password: false,
            permissions: HashSet::new(),
            page_grants: Vec::new(),
        }
    }

    /// Create context for an authenticated user with a local password.
    pub fn authenticated(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            authenticated: true,
            has_usable_password: true,
            ..Self::anonymous()
        }
    }

    /// Check if the user holds a model permission codename.
    ///
    /// Active superusers hold every permission.
    pub fn has_permission(&self, codename: &str) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_superuser || self.permissions.contains(codename)
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// A page row as seen by the listing and explorer views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: i64,
    pub title: String,
    /// Title of the latest draft, shown in the admin when it differs.
    #[serde(default)]
    pub draft_title: Option<String>,
    /// Page IDs from the tree root down to this page inclusive.
    #[serde(default)]
    pub path: Vec<i64>,
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub has_unpublished_changes: bool,
    /// Public URL when the page is routable.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub owner: Option<Uuid>,
    #[serde(default = "default_true")]
    pub previewable: bool,
    #[serde(default)]
    pub has_children: bool,
    /// User holding the edit lock, if any.
    #[serde(default)]
    pub locked_by: Option<Uuid>,
}

impl PageRecord {
    /// The tree root is the only page at depth one.
    pub fn is_root(&self) -> bool {
        self.path.len() <= 1
    }

    /// Title shown in admin listings: the draft title when present.
    pub fn admin_display_title(&self) -> &str {
        self.draft_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }

    /// Whether the page is locked against edits by `user`.
    pub fn locked_for(&self, user: &UserContext) -> bool {
        self.locked_by.is_some_and(|holder| holder != user.id)
    }
}

/// Context for a single admin request.
#[derive(Clone, Copy)]
pub struct AdminRequest<'a> {
    pub user: &'a UserContext,
    pub language: &'a str,
    pub site: &'a AdminSite,
}

impl<'a> AdminRequest<'a> {
    /// Create a request in the site's default language.
    pub fn new(site: &'a AdminSite, user: &'a UserContext) -> Self {
        Self {
            user,
            language: &site.config().default_language,
            site,
        }
    }

    /// Switch the interface language for this request.
    pub fn with_language(mut self, language: &'a str) -> Self {
        self.language = language;
        self
    }

    /// Translate a message ID into the request language.
    pub fn gettext(&self, msgid: &str) -> String {
        self.site.translator().gettext(msgid, self.language)
    }

    /// Translate a template and substitute `{name}` placeholders.
    pub fn format(&self, msgid: &str, args: &[(&str, &str)]) -> String {
        crate::i18n::interpolate(&self.gettext(msgid), args)
    }

    /// Page tree permissions of the acting user.
    pub fn page_permissions(&self) -> UserPagePermissions<'a> {
        UserPagePermissions::new(self.user)
    }
}

impl std::fmt::Debug for AdminRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRequest")
            .field("user", &self.user.id)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_user_has_no_permissions() {
        let user = UserContext::anonymous();
        assert!(!user.authenticated);
        assert!(!user.has_permission("portico_core.add_collection"));
    }

    #[test]
    fn inactive_superuser_has_nothing() {
        let mut user = UserContext::authenticated(Uuid::now_v7(), "admin");
        user.is_superuser = true;
        assert!(user.has_permission("anything"));
        user.is_active = false;
        assert!(!user.has_permission("anything"));
    }

    #[test]
    fn user_deserializes_with_defaults() {
        let user: UserContext = serde_json::from_str(
            r#"{"id": "00000000-0000-0000-0000-000000000000", "permissions": ["a.b"]}"#,
        )
        .unwrap();
        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert!(user.has_permission("a.b"));
    }

    #[test]
    fn display_title_prefers_draft() {
        let page: PageRecord = serde_json::from_str(
            r#"{"id": 3, "title": "Live", "draft_title": "Draft", "path": [1, 3]}"#,
        )
        .unwrap();
        assert_eq!(page.admin_display_title(), "Draft");
        assert!(!page.is_root());
        assert!(page.previewable);
    }

    #[test]
    fn lock_held_by_someone_else() {
        let owner = Uuid::now_v7();
        let other = UserContext::authenticated(Uuid::now_v7(), "other");
        let holder = UserContext::authenticated(owner, "holder");
        let page = PageRecord {
            id: 2,
            title: "Locked".to_string(),
            draft_title: None,
            path: vec![1, 2],
            live: true,
            has_unpublished_changes: false,
            url: None,
            owner: None,
            previewable: true,
            has_children: false,
            locked_by: Some(owner),
        };
        assert!(page.locked_for(&other));
        assert!(!page.locked_for(&holder));
    }
}
