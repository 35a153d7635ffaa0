//! Core page listing buttons and the "More" dropdown.

use crate::buttons::{Button, ButtonContext, page_listing_more_buttons};
use crate::hooks::AdminRegistry;
use crate::urls::append_querystring;

/// Classes of the highlighted "Add child page" button on the parent row.
const PARENT_ADD_CLASSES: [&str; 6] = ["button", "button-small", "bicolor", "icon", "white", "icon-plus"];

pub(super) fn register(registry: &mut AdminRegistry) {
    registry.register_page_listing_buttons(listing_buttons);
    registry.register_page_listing_more_buttons(more_buttons);
}

fn listing_buttons(ctx: &ButtonContext<'_>) -> Vec<Button> {
    let request = ctx.request;
    let page = ctx.page;
    let mut buttons = Vec::new();

    if ctx.perms.can_edit()
        && let Some(url) = ctx.page_url("pages:edit")
    {
        buttons.push(
            Button::page_listing(request.gettext("Edit"), url)
                .attr("aria-label", ctx.titled("Edit '{title}'"))
                .priority(10),
        );
    }

    if page.has_unpublished_changes
        && page.previewable
        && let Some(url) = ctx.page_url("pages:view_draft")
    {
        buttons.push(
            Button::page_listing(request.gettext("View draft"), url)
                .attr("aria-label", ctx.titled("Preview draft version of '{title}'"))
                .new_tab()
                .priority(20),
        );
    }

    if page.live
        && let Some(url) = page.url.as_deref().filter(|url| !url.is_empty())
    {
        buttons.push(
            Button::page_listing(request.gettext("View live"), url)
                .attr("aria-label", ctx.titled("View live version of '{title}'"))
                .new_tab()
                .priority(30),
        );
    }

    if ctx.perms.can_add_subpage()
        && let Some(url) = ctx.page_url("pages:add_subpage")
    {
        let label = request.gettext("Add child page");
        let button = if ctx.is_parent {
            Button::new(label, url).classes(PARENT_ADD_CLASSES)
        } else {
            Button::page_listing(label, url)
        };
        buttons.push(
            button
                .attr("aria-label", ctx.titled("Add a child page to '{title}'"))
                .priority(40),
        );
    }

    let more = page_listing_more_buttons(ctx);
    if !more.is_empty() {
        buttons.push(
            Button::dropdown(request.gettext("More"), more)
                .new_tab()
                .attr("title", ctx.titled("View more options for '{title}'"))
                .priority(50),
        );
    }

    buttons
}

fn more_buttons(ctx: &ButtonContext<'_>) -> Vec<Button> {
    let request = ctx.request;
    let next = ctx.next_url_query();
    let with_next = |url: String| append_querystring(&url, next.as_deref());
    let mut buttons = Vec::new();

    if ctx.perms.can_move()
        && let Some(url) = ctx.page_url("pages:move")
    {
        buttons.push(
            Button::new(request.gettext("Move"), url)
                .attr("title", ctx.titled("Move page '{title}'"))
                .priority(10),
        );
    }
    if ctx.perms.can_copy()
        && let Some(url) = ctx.page_url("pages:copy")
    {
        buttons.push(
            Button::new(request.gettext("Copy"), with_next(url))
                .attr("title", ctx.titled("Copy page '{title}'"))
                .priority(20),
        );
    }
    if ctx.perms.can_delete()
        && let Some(url) = ctx.page_url("pages:delete")
    {
        buttons.push(
            Button::new(request.gettext("Delete"), with_next(url))
                .attr("title", ctx.titled("Delete page '{title}'"))
                .priority(30),
        );
    }
    if ctx.perms.can_unpublish()
        && let Some(url) = ctx.page_url("pages:unpublish")
    {
        buttons.push(
            Button::new(request.gettext("Unpublish"), with_next(url))
                .attr("title", ctx.titled("Unpublish page '{title}'"))
                .priority(40),
        );
    }
    if ctx.perms.can_view_revisions() {
        if let Some(url) = ctx.page_url("pages:revisions_index") {
            buttons.push(
                Button::new(request.gettext("Revisions"), url)
                    .attr("title", ctx.titled("View revision history for '{title}'"))
                    .priority(50),
            );
        }
        if let Some(url) = ctx.page_url("pages:history") {
            buttons.push(
                Button::new(request.gettext("History"), url)
                    .attr("title", ctx.titled("View page history for '{title}'"))
                    .priority(50),
            );
        }
    }

    buttons
}
