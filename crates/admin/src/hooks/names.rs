//! Extension point names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Every extension point name the admin recognises.
pub const KNOWN_HOOKS: &[&str] = &[
    "register_admin_menu_item",
    "register_settings_menu_item",
    "register_reports_menu_item",
    "register_admin_search_area",
    "register_page_listing_buttons",
    "register_page_listing_more_buttons",
    "register_account_menu_item",
    "register_permissions",
    "register_admin_urls",
    "register_icons",
    "register_rich_text_features",
    "register_log_actions",
];

/// A named extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookName {
    RegisterAdminMenuItem,
    RegisterSettingsMenuItem,
    RegisterReportsMenuItem,
    RegisterAdminSearchArea,
    RegisterPageListingButtons,
    RegisterPageListingMoreButtons,
    RegisterAccountMenuItem,
    RegisterPermissions,
    RegisterAdminUrls,
    RegisterIcons,
    RegisterRichTextFeatures,
    RegisterLogActions,
}

impl HookName {
    /// All extension points, in the order of [`KNOWN_HOOKS`].
    pub const ALL: [HookName; 12] = [
        HookName::RegisterAdminMenuItem,
        HookName::RegisterSettingsMenuItem,
        HookName::RegisterReportsMenuItem,
        HookName::RegisterAdminSearchArea,
        HookName::RegisterPageListingButtons,
        HookName::RegisterPageListingMoreButtons,
        HookName::RegisterAccountMenuItem,
        HookName::RegisterPermissions,
        HookName::RegisterAdminUrls,
        HookName::RegisterIcons,
        HookName::RegisterRichTextFeatures,
        HookName::RegisterLogActions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookName::RegisterAdminMenuItem => "register_admin_menu_item",
            HookName::RegisterSettingsMenuItem => "register_settings_menu_item",
            HookName::RegisterReportsMenuItem => "register_reports_menu_item",
            HookName::RegisterAdminSearchArea => "register_admin_search_area",
            HookName::RegisterPageListingButtons => "register_page_listing_buttons",
            HookName::RegisterPageListingMoreButtons => "register_page_listing_more_buttons",
            HookName::RegisterAccountMenuItem => "register_account_menu_item",
            HookName::RegisterPermissions => "register_permissions",
            HookName::RegisterAdminUrls => "register_admin_urls",
            HookName::RegisterIcons => "register_icons",
            HookName::RegisterRichTextFeatures => "register_rich_text_features",
            HookName::RegisterLogActions => "register_log_actions",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookName {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookName::ALL
            .into_iter()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| AdminError::unknown_hook(s, KNOWN_HOOKS))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn names_match_known_hooks() {
        let names: Vec<_> = HookName::ALL.iter().map(|h| h.as_str()).collect();
        assert_eq!(names, KNOWN_HOOKS);
    }

    #[test]
    fn parse_round_trips() {
        for hook in HookName::ALL {
            assert_eq!(hook.as_str().parse::<HookName>().unwrap(), hook);
        }
    }

    #[test]
    fn parse_unknown() {
        let err = "register_nothing".parse::<HookName>().unwrap_err();
        assert!(err.to_string().contains("register_admin_menu_item"));
    }

    #[test]
    fn serde_uses_hook_names() {
        let json = serde_json::to_string(&HookName::RegisterIcons).unwrap();
        assert_eq!(json, "\"register_icons\"");
    }
}
