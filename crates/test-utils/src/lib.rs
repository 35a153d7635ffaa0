//! Portico test utilities.
//!
//! Fixtures for integration testing: users with model permissions and page
//! grants, page records, assembled sites, and audit entry data.

use portico_admin::context::PageGrant;
use portico_admin::permissions::PagePermission;
use portico_admin::{AdminSite, Config, PageRecord, UserContext};
use uuid::Uuid;

/// ID of the page tree root in every fixture.
pub const ROOT_PAGE_ID: i64 = 1;

/// Create an authenticated test user holding model permissions.
pub fn test_user(permissions: &[&str]) -> UserContext {
    let mut user = UserContext::authenticated(Uuid::now_v7(), "editor");
    user.permissions = permissions.iter().map(|s| s.to_string()).collect();
    user
}

/// Create an anonymous test user.
pub fn anonymous_user() -> UserContext {
    UserContext::anonymous()
}

/// Create an active superuser.
pub fn superuser() -> UserContext {
    let mut user = UserContext::authenticated(Uuid::now_v7(), "admin");
    user.is_superuser = true;
    user
}

/// Create a user holding the given grants on one page.
pub fn user_with_grants(page: &PageRecord, permissions: &[PagePermission]) -> UserContext {
    let mut user = test_user(&[]);
    user.page_grants = permissions.iter().map(|p| grant(page, *p)).collect();
    user
}

/// A grant on `page` and everything below it.
pub fn grant(page: &PageRecord, permission: PagePermission) -> PageGrant {
    PageGrant {
        page_id: page.id,
        path: page.path.clone(),
        permission,
    }
}

/// Create a draft page directly below the root.
pub fn test_page(id: i64, title: &str) -> TestPage {
    TestPage {
        record: PageRecord {
            id,
            title: title.to_string(),
            draft_title: None,
            path: vec![ROOT_PAGE_ID, id],
            live: false,
            has_unpublished_changes: false,
            url: None,
            owner: None,
            previewable: true,
            has_children: false,
            locked_by: None,
        },
    }
}

/// A page record builder for test fixtures.
#[derive(Debug, Clone)]
pub struct TestPage {
    record: PageRecord,
}

impl TestPage {
    /// Place the page below `parent`.
    pub fn child_of(mut self, parent: &PageRecord) -> Self {
        self.record.path = parent.path.clone();
        self.record.path.push(self.record.id);
        self
    }

    /// The tree root itself.
    pub fn root(mut self) -> Self {
        self.record.path = vec![self.record.id];
        self
    }

    /// Published at `url`.
    pub fn live(mut self, url: &str) -> Self {
        self.record.live = true;
        self.record.url = Some(url.to_string());
        self
    }

    /// Has a draft newer than the live version.
    pub fn with_draft(mut self, draft_title: &str) -> Self {
        self.record.has_unpublished_changes = true;
        self.record.draft_title = Some(draft_title.to_string());
        self
    }

    pub fn not_previewable(mut self) -> Self {
        self.record.previewable = false;
        self
    }

    pub fn owned_by(mut self, user: &UserContext) -> Self {
        self.record.owner = Some(user.id);
        self
    }

    pub fn locked_by(mut self, user: &UserContext) -> Self {
        self.record.locked_by = Some(user.id);
        self
    }

    pub fn with_children(mut self) -> Self {
        self.record.has_children = true;
        self
    }

    pub fn build(self) -> PageRecord {
        self.record
    }
}

/// Configuration used by the test sites.
pub fn test_config() -> Config {
    Config {
        root_page_id: ROOT_PAGE_ID,
        ..Config::default()
    }
}

/// Create a site holding the core contributions.
pub fn test_site() -> AdminSite {
    site_with(test_config())
}

/// Create a site from a custom configuration.
pub fn site_with(config: Config) -> AdminSite {
    match AdminSite::build(config) {
        Ok(site) => site,
        Err(e) => panic!("test site failed to build: {e}"),
    }
}

/// Audit entry data in the shapes the core formatters read.
pub mod audit {
    use serde_json::{Value, json};

    /// Data of a revert or schedule entry.
    pub fn revision(id: i64, created: &str, go_live_at: Option<&str>) -> Value {
        let mut revision = json!({ "id": id, "created": created });
        if let (Some(go_live_at), Some(obj)) = (go_live_at, revision.as_object_mut()) {
            obj.insert("go_live_at".to_string(), json!(go_live_at));
        }
        json!({ "revision": revision })
    }

    /// Data of a copy or move entry.
    pub fn moved(source: &str, destination: &str) -> Value {
        json!({
            "source": { "title": source },
            "destination": { "title": destination }
        })
    }

    /// Data of a workflow entry. `next` is serialized as null when absent.
    pub fn workflow(workflow: &str, task: &str, next: Option<&str>) -> Value {
        json!({
            "workflow": {
                "title": workflow,
                "task": { "title": task },
                "next": next.map(|title| json!({ "title": title }))
            }
        })
    }
}

/// Assertion helpers for rendered output.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}
