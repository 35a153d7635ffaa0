#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Hook registry tests.

use portico_admin::menu::{MenuItem, MenuKind};
use portico_admin::permissions::PermissionDefinition;
use portico_admin::urls::ViewSet;
use portico_admin::{AdminError, AdminSite, HookName};
use portico_test_utils::{superuser, test_config, test_site, test_user};

#[test]
fn test_core_contribution_counts() {
    let site = test_site();
    let registry = site.registry();

    let expected = [
        (HookName::RegisterAdminMenuItem, 3),
        (HookName::RegisterSettingsMenuItem, 2),
        (HookName::RegisterReportsMenuItem, 4),
        (HookName::RegisterAdminSearchArea, 1),
        (HookName::RegisterPageListingButtons, 1),
        (HookName::RegisterPageListingMoreButtons, 1),
        (HookName::RegisterAccountMenuItem, 7),
        (HookName::RegisterPermissions, 1),
        (HookName::RegisterAdminUrls, 2),
        (HookName::RegisterIcons, 78),
        (HookName::RegisterLogActions, 21),
    ];
    for (hook, count) in expected {
        assert_eq!(registry.contribution_count(hook), count, "{hook}");
    }
    assert!(registry.contribution_count(HookName::RegisterRichTextFeatures) > 0);
    assert_eq!(registry.summary().len(), HookName::ALL.len());
}

#[test]
fn test_hook_names_parse() {
    assert_eq!(
        "register_page_listing_more_buttons".parse::<HookName>().unwrap(),
        HookName::RegisterPageListingMoreButtons
    );
    let err = "register_snippet_chooser".parse::<HookName>().unwrap_err();
    assert!(matches!(err, AdminError::UnknownHook { .. }));
}

#[test]
fn test_access_admin_permission() {
    let site = test_site();
    let permissions = site.registry().permissions();

    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].qualified(), "portico_admin.access_admin");
    assert_eq!(permissions[0].name, "Can access admin");
}

#[test]
fn test_contributions_extend_core() {
    let site = AdminSite::builder(test_config())
        .viewset(ViewSet::model("snippets", "snippets"))
        .contribute(|registry, ctx| {
            registry.register_menu_item(
                MenuKind::Admin,
                MenuItem::link("Snippets", ctx.reverse("snippets:index")?)
                    .icon("snippet")
                    .order(500)
                    .shown_when(|request| request.user.has_permission("acme.view_snippet")),
            );
            registry.register_permissions([PermissionDefinition {
                app_label: "acme".to_string(),
                codename: "view_snippet".to_string(),
                name: "Can view snippets".to_string(),
            }]);
            Ok(())
        })
        .build()
        .unwrap();
    let registry = site.registry();

    assert_eq!(registry.contribution_count(HookName::RegisterAdminMenuItem), 4);
    assert_eq!(registry.contribution_count(HookName::RegisterAdminUrls), 3);
    assert_eq!(registry.permissions().len(), 2);
    assert_eq!(
        site.urls().reverse("snippets:edit", &["9"]).unwrap(),
        "/admin/snippets/9/"
    );

    let allowed = test_user(&["acme.view_snippet"]);
    let menu = portico_admin::menu::render_menu(&site.request(&allowed), MenuKind::Admin);
    let snippets = menu.iter().find(|item| item.name == "snippets").unwrap();
    assert_eq!(snippets.url.as_deref(), Some("/admin/snippets/"));
    assert_eq!(snippets.order, 500);

    let denied = test_user(&[]);
    let menu = portico_admin::menu::render_menu(&site.request(&denied), MenuKind::Admin);
    assert!(menu.iter().all(|item| item.name != "snippets"));
}

#[test]
fn test_contributor_errors_abort_build() {
    let result = AdminSite::builder(test_config())
        .contribute(|registry, ctx| {
            registry.register_menu_item(
                MenuKind::Admin,
                MenuItem::link("Missing", ctx.reverse("missing:index")?),
            );
            Ok(())
        })
        .build();
    assert!(result.is_err());
}

#[test]
fn test_site_clones_share_registry() {
    let site = test_site();
    let clone = site.clone();
    let user = superuser();

    assert_eq!(
        site.render_menu_html(&site.request(&user), MenuKind::Admin).unwrap(),
        clone.render_menu_html(&clone.request(&user), MenuKind::Admin).unwrap()
    );
}
