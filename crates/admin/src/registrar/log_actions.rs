//! Core and workflow audit log actions.

use crate::error::AdminResult;
use crate::hooks::AdminRegistry;
use crate::log_actions::{Formatter, LogMessage, messages};

/// Actions described by the same message every time: (code, label, message).
const STATIC_ACTIONS: &[(&str, &str, &str)] = &[
    ("portico.create", "Create", "Created"),
    ("portico.edit", "Save draft", "Draft saved"),
    ("portico.delete", "Delete", "Deleted"),
    ("portico.publish", "Publish", "Published"),
    ("portico.unpublish", "Unpublish", "Unpublished"),
    ("portico.lock", "Lock", "Locked"),
    ("portico.unlock", "Unlock", "Unlocked"),
    ("portico.moderation.approve", "Approve", "Approved"),
    ("portico.moderation.reject", "Reject", "Rejected"),
];

/// Actions whose message depends on the entry data: (code, label, formatter).
const FORMATTED_ACTIONS: &[(&str, &str, Formatter)] = &[
    ("portico.revert", "Revert", messages::revert),
    ("portico.schedule.revert", "Schedule revert", messages::schedule_revert),
    ("portico.copy", "Copy", messages::copy),
    ("portico.move", "Move", messages::move_page),
    ("portico.schedule.publish", "Schedule publication", messages::schedule_publish),
    ("portico.schedule.cancel", "Unschedule publication", messages::unschedule_publish),
    ("portico.view_restriction.create", "Add view restrictions", messages::add_view_restriction),
    ("portico.view_restriction.edit", "Update view restrictions", messages::edit_view_restriction),
    ("portico.view_restriction.delete", "Remove view restrictions", messages::delete_view_restriction),
    ("portico.workflow.start", "Workflow: start", messages::workflow_start),
    ("portico.workflow.approve", "Workflow: approve task", messages::workflow_approve),
    ("portico.workflow.reject", "Workflow: reject task", messages::workflow_reject),
];

pub(super) fn register(registry: &mut AdminRegistry) -> AdminResult<()> {
    let actions = registry.log_actions_mut();
    for (code, label, message) in STATIC_ACTIONS {
        actions.register(*code, *label, *message)?;
    }
    for (code, label, formatter) in FORMATTED_ACTIONS {
        actions.register(*code, *label, LogMessage::Formatted(*formatter))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registers_every_action_once() {
        let mut registry = AdminRegistry::new("icons");
        register(&mut registry).unwrap();
        assert_eq!(registry.log_actions().len(), 21);
        assert!(register(&mut registry).is_err());
    }

    #[test]
    fn workflow_messages_formatted() {
        let mut registry = AdminRegistry::new("icons");
        register(&mut registry).unwrap();
        let message = registry
            .log_actions()
            .format_message(
                "portico.workflow.reject",
                &json!({"workflow": {"task": {"title": "Review"}}}),
            )
            .unwrap();
        assert_eq!(message.render(str::to_string), "Rejected at 'Review'. Workflow complete");
    }
}
