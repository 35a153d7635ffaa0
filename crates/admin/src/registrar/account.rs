//! Core entries on the account settings page.

use super::RegistrarContext;
use crate::account::AccountMenuItem;
use crate::context::AdminRequest;
use crate::error::AdminResult;
use crate::hooks::AdminRegistry;

/// One account entry: route, label, help text, and when it is offered.
struct AccountEntry {
    route: &'static str,
    label: &'static str,
    help_text: &'static str,
    offered: fn(&AdminRequest<'_>) -> bool,
}

fn always(_: &AdminRequest<'_>) -> bool {
    true
}

const ENTRIES: &[AccountEntry] = &[
    AccountEntry {
        route: "account:change_avatar",
        label: "Set profile picture",
        help_text: "Change your profile picture.",
        offered: always,
    },
    AccountEntry {
        route: "account:change_email",
        label: "Change email",
        help_text: "Change the email address linked to your account.",
        offered: |request| request.site.config().email_management_enabled,
    },
    AccountEntry {
        route: "account:change_password",
        label: "Change password",
        help_text: "Change the password you use to log in.",
        offered: |request| {
            request.site.config().password_management_enabled && request.user.has_usable_password
        },
    },
    AccountEntry {
        route: "account:notification_preferences",
        label: "Notification preferences",
        help_text: "Choose which email notifications to receive.",
        offered: |request| {
            let perms = request.page_permissions();
            perms.can_edit_pages() || perms.can_publish_pages()
        },
    },
    AccountEntry {
        route: "account:language_preferences",
        label: "Language preferences",
        help_text: "Choose the language you want to use here.",
        offered: |request| request.site.config().admin_languages.len() > 1,
    },
    AccountEntry {
        route: "account:current_time_zone",
        label: "Current Time Zone",
        help_text: "Choose your current time zone.",
        offered: |request| request.site.config().admin_time_zones.len() > 1,
    },
    AccountEntry {
        route: "account:change_name",
        label: "Change name",
        help_text: "Change your first and last name on your account.",
        offered: always,
    },
];

pub(super) fn register(registry: &mut AdminRegistry, ctx: &RegistrarContext<'_>) -> AdminResult<()> {
    for entry in ENTRIES {
        let url = ctx.reverse(entry.route)?;
        let (label, help_text, offered) = (entry.label, entry.help_text, entry.offered);
        registry.register_account_menu_item(move |request| {
            offered(request).then(|| {
                AccountMenuItem::new(url.clone(), request.gettext(label), request.gettext(help_text))
            })
        });
    }
    Ok(())
}
