//! Capability checks behind menu visibility and listing buttons.
//!
//! Two flavours of check exist: model-wide permissions ("may this user add
//! collections?") evaluated by a [`PermissionPolicy`], and page tree
//! permissions evaluated per user ([`UserPagePermissions`]) or per page
//! ([`PagePermissionTester`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::context::{PageRecord, UserContext};

/// Page tree permission types a grant can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePermission {
    Add,
    Edit,
    Publish,
    BulkDelete,
    Lock,
    Unlock,
}

/// A permission definition contributed through `register_permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    pub app_label: String,
    pub codename: String,
    /// Human-readable description.
    pub name: String,
}

impl PermissionDefinition {
    /// The dotted form stored on users, e.g. "portico_admin.access_admin".
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.app_label, self.codename)
    }
}

/// Policy answering whether a user may perform actions on a resource type.
pub trait PermissionPolicy: Send + Sync {
    /// Check a single action.
    fn user_has_permission(&self, user: &UserContext, action: &str) -> bool;

    /// Check whether any of the given actions is permitted.
    fn user_has_any_permission(&self, user: &UserContext, actions: &[&str]) -> bool {
        actions
            .iter()
            .any(|action| self.user_has_permission(user, action))
    }
}

/// Policy backed by model permission codenames: `{app_label}.{action}_{model}`.
#[derive(Debug, Clone)]
pub struct ModelPermissionPolicy {
    app_label: String,
    model: String,
}

impl ModelPermissionPolicy {
    pub fn new(app_label: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            model: model.into(),
        }
    }

    /// Codename checked for `action`.
    pub fn codename(&self, action: &str) -> String {
        format!("{}.{}_{}", self.app_label, action, self.model)
    }
}

impl PermissionPolicy for ModelPermissionPolicy {
    fn user_has_permission(&self, user: &UserContext, action: &str) -> bool {
        user.has_permission(&self.codename(action))
    }
}

/// Page tree permissions of one user, independent of any particular page.
#[derive(Debug, Clone, Copy)]
pub struct UserPagePermissions<'a> {
    user: &'a UserContext,
}

impl<'a> UserPagePermissions<'a> {
    pub fn new(user: &'a UserContext) -> Self {
        Self { user }
    }

    fn holds(&self, permission: PagePermission) -> bool {
        self.user.is_active
            && (self.user.is_superuser
                || self.user.page_grants.iter().any(|g| g.permission == permission))
    }

    /// Whether the user holds any page permission anywhere in the tree.
    pub fn has_any_page_permission(&self) -> bool {
        self.user.is_active && (self.user.is_superuser || !self.user.page_grants.is_empty())
    }

    pub fn can_edit_pages(&self) -> bool {
        self.holds(PagePermission::Edit)
    }

    pub fn can_publish_pages(&self) -> bool {
        self.holds(PagePermission::Publish)
    }

    pub fn can_remove_locks(&self) -> bool {
        self.holds(PagePermission::Unlock)
    }

    /// Whether the explorer would show the user at least one page.
    pub fn explorable_pages_exist(&self) -> bool {
        self.has_any_page_permission()
    }

    /// The page the explorer opens on: the deepest common ancestor of all
    /// granted pages, or the tree root for superusers. A grant with an empty
    /// path covers the whole tree.
    pub fn explorable_root(&self, root_page_id: i64) -> Option<i64> {
        if !self.user.is_active {
            return None;
        }
        if self.user.is_superuser {
            return Some(root_page_id);
        }

        let mut grants = self.user.page_grants.iter();
        let first = grants.next()?;
        let mut common: &[i64] = &first.path;
        for grant in grants {
            let shared = common
                .iter()
                .zip(grant.path.iter())
                .take_while(|(a, b)| a == b)
                .count();
            common = &common[..shared];
        }
        Some(common.last().copied().unwrap_or(root_page_id))
    }

    /// Permission tester for a single page.
    pub fn for_page(&self, page: &'a PageRecord) -> PagePermissionTester<'a> {
        PagePermissionTester::new(self.user, page)
    }
}

/// Capability object consulted by page listing button contributors.
pub trait PagePermissions {
    fn can_edit(&self) -> bool;
    fn can_add_subpage(&self) -> bool;
    fn can_move(&self) -> bool;
    fn can_copy(&self) -> bool;
    fn can_delete(&self) -> bool;
    fn can_unpublish(&self) -> bool;
    fn can_view_revisions(&self) -> bool;
}

/// Evaluates a user's page grants against one page.
///
/// A grant applies when the granted page is the page itself or one of its
/// ancestors.
#[derive(Debug, Clone)]
pub struct PagePermissionTester<'a> {
    user: &'a UserContext,
    page: &'a PageRecord,
    held: HashSet<PagePermission>,
}

impl<'a> PagePermissionTester<'a> {
    pub fn new(user: &'a UserContext, page: &'a PageRecord) -> Self {
        let held = if user.is_active {
            user.page_grants
                .iter()
                .filter(|g| page.path.contains(&g.page_id) || g.page_id == page.id)
                .map(|g| g.permission)
                .collect()
        } else {
            HashSet::new()
        };
        Self { user, page, held }
    }

    fn has(&self, permission: PagePermission) -> bool {
        self.held.contains(&permission)
    }

    fn is_owner(&self) -> bool {
        self.user.authenticated && self.page.owner == Some(self.user.id)
    }
}

impl PagePermissions for PagePermissionTester<'_> {
    fn can_edit(&self) -> bool {
        if !self.user.is_active || self.page.is_root() {
            return false;
        }
        self.user.is_superuser
            || self.has(PagePermission::Edit)
            || (self.has(PagePermission::Add) && self.is_owner())
    }

    fn can_add_subpage(&self) -> bool {
        self.user.is_active && (self.user.is_superuser || self.has(PagePermission::Add))
    }

    fn can_move(&self) -> bool {
        self.can_delete() && !self.page.locked_for(self.user)
    }

    fn can_copy(&self) -> bool {
        !self.page.is_root()
    }

    fn can_delete(&self) -> bool {
        if !self.user.is_active || self.page.is_root() {
            return false;
        }
        if self.user.is_superuser || self.has(PagePermission::BulkDelete) {
            return true;
        }
        // Without bulk delete, only childless pages the user can edit, and
        // live pages only when the user could also unpublish them.
        self.can_edit()
            && !self.page.has_children
            && (!self.page.live || self.has(PagePermission::Publish))
    }

    fn can_unpublish(&self) -> bool {
        if !self.user.is_active || !self.page.live || self.page.is_root() {
            return false;
        }
        if self.page.locked_for(self.user) {
            return false;
        }
        self.user.is_superuser || self.has(PagePermission::Publish)
    }

    fn can_view_revisions(&self) -> bool {
        !self.page.is_root()
    }
}
