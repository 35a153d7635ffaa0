//! Entries on the account settings page.

use std::sync::Arc;

use serde::Serialize;

use crate::context::AdminRequest;

/// One link on the account settings page, already translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountMenuItem {
    pub url: String,
    pub label: String,
    pub help_text: String,
}

impl AccountMenuItem {
    pub fn new(
        url: impl Into<String>,
        label: impl Into<String>,
        help_text: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            help_text: help_text.into(),
        }
    }
}

/// Contributes at most one account entry for the request.
pub type AccountMenuHook = Arc<dyn Fn(&AdminRequest<'_>) -> Option<AccountMenuItem> + Send + Sync>;

/// Entries for the request, in registration order.
pub fn account_menu_items(request: &AdminRequest<'_>) -> Vec<AccountMenuItem> {
    request
        .site
        .registry()
        .account_items()
        .iter()
        .filter_map(|hook| hook(request))
        .collect()
}
