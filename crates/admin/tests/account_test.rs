#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Account settings page tests.

use portico_admin::Config;
use portico_admin::account::{AccountMenuItem, account_menu_items};
use portico_admin::permissions::PagePermission;
use portico_test_utils::{site_with, superuser, test_config, test_page, test_site, test_user, user_with_grants};

fn labels(items: &[AccountMenuItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

#[test]
fn test_default_entries_for_plain_user() {
    let site = test_site();
    let user = test_user(&[]);

    let items = account_menu_items(&site.request(&user));
    assert_eq!(
        labels(&items),
        vec!["Set profile picture", "Change email", "Change password", "Change name"]
    );
    assert_eq!(items[0].url, "/admin/account/change_avatar/");
    assert_eq!(items[0].help_text, "Change your profile picture.");
    assert_eq!(items[3].url, "/admin/account/change_name/");
}

#[test]
fn test_every_entry_offered() {
    let config = Config {
        admin_languages: vec!["en".to_string(), "fr".to_string()],
        admin_time_zones: vec!["UTC".to_string(), "Europe/Paris".to_string()],
        ..test_config()
    };
    let site = site_with(config);
    let user = superuser();

    let items = account_menu_items(&site.request(&user));
    assert_eq!(
        labels(&items),
        vec![
            "Set profile picture",
            "Change email",
            "Change password",
            "Notification preferences",
            "Language preferences",
            "Current Time Zone",
            "Change name",
        ]
    );
}

#[test]
fn test_single_time_zone_not_offered() {
    let config = Config {
        admin_time_zones: vec!["UTC".to_string()],
        ..test_config()
    };
    let site = site_with(config);
    let user = test_user(&[]);

    let items = account_menu_items(&site.request(&user));
    assert!(!labels(&items).contains(&"Current Time Zone"));
    assert!(!labels(&items).contains(&"Language preferences"));
}

#[test]
fn test_management_flags() {
    let config = Config {
        email_management_enabled: false,
        password_management_enabled: false,
        ..test_config()
    };
    let site = site_with(config);
    let user = test_user(&[]);

    let items = account_menu_items(&site.request(&user));
    assert_eq!(labels(&items), vec!["Set profile picture", "Change name"]);
}

#[test]
fn test_external_accounts_cannot_change_password() {
    let site = test_site();
    let mut user = test_user(&[]);
    user.has_usable_password = false;

    let items = account_menu_items(&site.request(&user));
    assert!(!labels(&items).contains(&"Change password"));
    assert!(labels(&items).contains(&"Change email"));
}

#[test]
fn test_notifications_need_edit_or_publish() {
    let site = test_site();
    let page = test_page(5, "Blog").build();

    let editor = user_with_grants(&page, &[PagePermission::Edit]);
    let items = account_menu_items(&site.request(&editor));
    assert!(labels(&items).contains(&"Notification preferences"));

    let publisher = user_with_grants(&page, &[PagePermission::Publish]);
    let items = account_menu_items(&site.request(&publisher));
    assert!(labels(&items).contains(&"Notification preferences"));

    let adder = user_with_grants(&page, &[PagePermission::Add]);
    let items = account_menu_items(&site.request(&adder));
    assert!(!labels(&items).contains(&"Notification preferences"));
}

#[test]
fn test_entries_translated() {
    let site = test_site();
    site.translator().load_catalog(
        "nl",
        [
            ("Change name".to_string(), "Naam wijzigen".to_string()),
            (
                "Change your first and last name on your account.".to_string(),
                "Wijzig je voor- en achternaam.".to_string(),
            ),
        ]
        .into_iter()
        .collect(),
    );
    let user = test_user(&[]);

    let items = account_menu_items(&site.request(&user).with_language("nl"));
    let name = items.last().unwrap();
    assert_eq!(name.label, "Naam wijzigen");
    assert_eq!(name.help_text, "Wijzig je voor- en achternaam.");
    assert_eq!(name.url, "/admin/account/change_name/");
}

#[test]
fn test_custom_base_url() {
    let config = Config {
        admin_base_url: "/cms".to_string(),
        ..test_config()
    };
    let site = site_with(config);
    let user = test_user(&[]);

    let items = account_menu_items(&site.request(&user));
    assert_eq!(items[0].url, "/cms/account/change_avatar/");
}
