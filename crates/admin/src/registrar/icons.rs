//! The core SVG icon set.

use crate::hooks::AdminRegistry;

/// Icon file names shipped with the admin.
pub const CORE_ICONS: &[&str] = &[
    "arrow-down-big.svg",
    "arrow-down.svg",
    "arrow-left.svg",
    "arrow-right.svg",
    "arrow-up-big.svg",
    "arrow-up.svg",
    "arrows-up-down.svg",
    "bin.svg",
    "bold.svg",
    "chain-broken.svg",
    "clipboard-list.svg",
    "code.svg",
    "cog.svg",
    "cogs.svg",
    "collapse-down.svg",
    "collapse-up.svg",
    "cross.svg",
    "date.svg",
    "doc-empty-inverse.svg",
    "doc-empty.svg",
    "doc-full-inverse.svg",
    "doc-full.svg",
    "download.svg",
    "edit.svg",
    "failure.svg",
    "folder-inverse.svg",
    "folder-open-1.svg",
    "folder-open-inverse.svg",
    "folder.svg",
    "form.svg",
    "grip.svg",
    "group.svg",
    "help.svg",
    "home.svg",
    "horizontalrule.svg",
    "image.svg",
    "italic.svg",
    "link.svg",
    "list-ol.svg",
    "list-ul.svg",
    "lock-open.svg",
    "lock.svg",
    "logout.svg",
    "mail.svg",
    "media.svg",
    "no-view.svg",
    "openquote.svg",
    "order-down.svg",
    "order-up.svg",
    "order.svg",
    "password.svg",
    "pick.svg",
    "pilcrow.svg",
    "placeholder.svg",
    "plus-inverse.svg",
    "plus.svg",
    "radio-empty.svg",
    "radio-full.svg",
    "redirect.svg",
    "repeat.svg",
    "search.svg",
    "site.svg",
    "snippet.svg",
    "spinner.svg",
    "success.svg",
    "table.svg",
    "tag.svg",
    "tick-inverse.svg",
    "tick.svg",
    "time.svg",
    "title.svg",
    "undo.svg",
    "uni52.svg",
    "user.svg",
    "view.svg",
    "portico-inverse.svg",
    "portico.svg",
    "warning.svg",
];

pub(super) fn register(registry: &mut AdminRegistry) {
    registry.register_icons(CORE_ICONS.iter().copied());
}
