//! Message formatters for the core audit log actions.
//!
//! Each formatter reads the fields it needs from the entry's JSON data and
//! returns a detailed message, or the generic one when any field is missing.

use serde_json::Value;

use super::FormattedMessage;

/// Value at `path`; JSON null counts as missing.
fn field<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let value = path.iter().try_fold(data, |value, key| value.get(*key))?;
    (!value.is_null()).then_some(value)
}

/// Text of the value at `path`. Strings are used as is; other scalars are
/// rendered as JSON.
fn text(data: &Value, path: &[&str]) -> Option<String> {
    field(data, path).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn detailed(template: &'static str, args: Vec<(&'static str, String)>) -> FormattedMessage {
    FormattedMessage::Detailed { template, args }
}

fn generic(label: &str) -> FormattedMessage {
    FormattedMessage::Generic(label.to_string())
}

pub fn revert(data: &Value) -> FormattedMessage {
    let message = || {
        Some(detailed(
            "Reverted to previous revision with id {revision_id} from {created_at}",
            vec![
                ("revision_id", text(data, &["revision", "id"])?),
                ("created_at", text(data, &["revision", "created"])?),
            ],
        ))
    };
    message().unwrap_or_else(|| generic("Reverted to previous revision"))
}

pub fn schedule_revert(data: &Value) -> FormattedMessage {
    let message = || {
        Some(detailed(
            "Scheduled revision {revision_id} from {created_at} for publishing at {go_live_at}.",
            vec![
                ("revision_id", text(data, &["revision", "id"])?),
                ("created_at", text(data, &["revision", "created"])?),
                ("go_live_at", text(data, &["revision", "go_live_at"])?),
            ],
        ))
    };
    message().unwrap_or_else(|| generic("Revision scheduled for publishing"))
}

pub fn copy(data: &Value) -> FormattedMessage {
    text(data, &["source", "title"])
        .map(|title| detailed("Copied from {title}", vec![("title", title)]))
        .unwrap_or_else(|| generic("Copied"))
}

pub fn move_page(data: &Value) -> FormattedMessage {
    let message = || {
        Some(detailed(
            "Moved from '{old_parent}' to '{new_parent}'",
            vec![
                ("old_parent", text(data, &["source", "title"])?),
                ("new_parent", text(data, &["destination", "title"])?),
            ],
        ))
    };
    message().unwrap_or_else(|| generic("Moved"))
}

/// Shared shape of the schedule and unschedule messages.
fn scheduling(
    data: &Value,
    with_live_version: &'static str,
    without_live_version: &'static str,
) -> Option<FormattedMessage> {
    let has_live_version = truthy(field(data, &["revision", "has_live_version"])?);
    let go_live_at = text(data, &["revision", "go_live_at"])?;
    if has_live_version {
        Some(detailed(
            with_live_version,
            vec![
                ("revision_id", text(data, &["revision", "id"])?),
                ("created_at", text(data, &["revision", "created"])?),
                ("go_live_at", go_live_at),
            ],
        ))
    } else {
        Some(detailed(without_live_version, vec![("go_live_at", go_live_at)]))
    }
}

pub fn schedule_publish(data: &Value) -> FormattedMessage {
    scheduling(
        data,
        "Revision {revision_id} from {created_at} scheduled for publishing at {go_live_at}.",
        "Page scheduled for publishing at {go_live_at}",
    )
    .unwrap_or_else(|| generic("Page scheduled for publishing"))
}

pub fn unschedule_publish(data: &Value) -> FormattedMessage {
    scheduling(
        data,
        "Revision {revision_id} from {created_at} unscheduled from publishing at {go_live_at}.",
        "Page unscheduled for publishing at {go_live_at}",
    )
    .unwrap_or_else(|| generic("Page unscheduled from publishing"))
}

fn restriction(data: &Value, template: &'static str, fallback: &str) -> FormattedMessage {
    text(data, &["restriction", "title"])
        .map(|title| detailed(template, vec![("restriction", title)]))
        .unwrap_or_else(|| generic(fallback))
}

pub fn add_view_restriction(data: &Value) -> FormattedMessage {
    restriction(
        data,
        "Added the '{restriction}' view restriction",
        "Added view restriction",
    )
}

pub fn edit_view_restriction(data: &Value) -> FormattedMessage {
    restriction(
        data,
        "Updated the view restriction to '{restriction}'",
        "Updated view restriction",
    )
}

pub fn delete_view_restriction(data: &Value) -> FormattedMessage {
    restriction(
        data,
        "Removed the view restriction to '{restriction}'",
        "Removed view restriction",
    )
}

pub fn workflow_start(data: &Value) -> FormattedMessage {
    let message = || {
        Some(detailed(
            "'{workflow}' started. Next step '{task}'",
            vec![
                ("workflow", text(data, &["workflow", "title"])?),
                ("task", text(data, &["workflow", "next", "title"])?),
            ],
        ))
    };
    message().unwrap_or_else(|| generic("Workflow started"))
}

pub fn workflow_approve(data: &Value) -> FormattedMessage {
    let message = || {
        // `next` must be present; null or empty means the workflow finished.
        let next = data.get("workflow")?.get("next")?;
        let task = text(data, &["workflow", "task", "title"])?;
        if truthy(next) {
            Some(detailed(
                "Approved at '{task}'. Next step '{next_task}'",
                vec![("task", task), ("next_task", text(next, &["title"])?)],
            ))
        } else {
            Some(detailed(
                "Approved at '{task}'. '{workflow}' complete",
                vec![
                    ("task", task),
                    ("workflow", text(data, &["workflow", "title"])?),
                ],
            ))
        }
    };
    message().unwrap_or_else(|| generic("Workflow task approved"))
}

pub fn workflow_reject(data: &Value) -> FormattedMessage {
    text(data, &["workflow", "task", "title"])
        .map(|task| detailed("Rejected at '{task}'. Workflow complete", vec![("task", task)]))
        .unwrap_or_else(|| generic("Workflow task rejected. Workflow complete"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(message: FormattedMessage) -> String {
        message.render(|s| s.to_string())
    }

    #[test]
    fn revert_detailed_and_generic() {
        let data = json!({"revision": {"id": 12, "created": "1 Jan 2021"}});
        assert_eq!(
            rendered(revert(&data)),
            "Reverted to previous revision with id 12 from 1 Jan 2021"
        );
        assert_eq!(
            rendered(revert(&json!({"revision": {"id": 12}}))),
            "Reverted to previous revision"
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let data = json!({"source": {"title": null}});
        assert_eq!(rendered(copy(&data)), "Copied");
    }

    #[test]
    fn move_needs_both_parents() {
        let data = json!({"source": {"title": "A"}, "destination": {"title": "B"}});
        assert_eq!(rendered(move_page(&data)), "Moved from 'A' to 'B'");
        let data = json!({"source": {"title": "A"}});
        assert_eq!(rendered(move_page(&data)), "Moved");
    }

    #[test]
    fn schedule_publish_branches() {
        let live = json!({"revision": {"id": 4, "created": "c", "go_live_at": "g", "has_live_version": true}});
        assert_eq!(
            rendered(schedule_publish(&live)),
            "Revision 4 from c scheduled for publishing at g."
        );
        let draft = json!({"revision": {"go_live_at": "g", "has_live_version": false}});
        assert_eq!(
            rendered(schedule_publish(&draft)),
            "Page scheduled for publishing at g"
        );
        let missing = json!({"revision": {"go_live_at": "g"}});
        assert_eq!(
            rendered(schedule_publish(&missing)),
            "Page scheduled for publishing"
        );
        assert_eq!(
            rendered(unschedule_publish(&draft)),
            "Page unscheduled for publishing at g"
        );
    }

    #[test]
    fn workflow_approve_branches() {
        let next = json!({"workflow": {"title": "W", "task": {"title": "T1"}, "next": {"title": "T2"}}});
        assert_eq!(
            rendered(workflow_approve(&next)),
            "Approved at 'T1'. Next step 'T2'"
        );
        let done = json!({"workflow": {"title": "W", "task": {"title": "T1"}, "next": null}});
        assert_eq!(
            rendered(workflow_approve(&done)),
            "Approved at 'T1'. 'W' complete"
        );
        let missing = json!({"workflow": {"title": "W", "task": {"title": "T1"}}});
        assert_eq!(rendered(workflow_approve(&missing)), "Workflow task approved");
    }

    #[test]
    fn workflow_start_with_null_next() {
        let data = json!({"workflow": {"title": "W", "next": null}});
        assert_eq!(rendered(workflow_start(&data)), "Workflow started");
    }

    #[test]
    fn non_object_data() {
        assert_eq!(rendered(workflow_reject(&json!("oops"))), "Workflow task rejected. Workflow complete");
        assert_eq!(rendered(add_view_restriction(&json!(null))), "Added view restriction");
    }
}
