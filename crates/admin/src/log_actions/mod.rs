//! Audit log actions and their human-readable messages.
//!
//! Every action code maps to a label and either a fixed past-tense message
//! or a formatter over the entry's JSON data. Formatters never fail: when
//! the data lacks a field they fall back to a generic message.

pub mod messages;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AdminError, AdminResult};
use crate::i18n::interpolate;

/// A formatter from entry data to a message.
pub type Formatter = fn(&Value) -> FormattedMessage;

/// A message ready for translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormattedMessage {
    /// A template with `{name}` placeholders and their values.
    Detailed {
        template: &'static str,
        args: Vec<(&'static str, String)>,
    },
    /// A plain message without details.
    Generic(String),
}

impl FormattedMessage {
    pub fn is_detailed(&self) -> bool {
        matches!(self, FormattedMessage::Detailed { .. })
    }

    /// Translate the template (or message) and substitute its arguments.
    pub fn render<F>(&self, translate: F) -> String
    where
        F: Fn(&str) -> String,
    {
        match self {
            FormattedMessage::Detailed { template, args } => {
                let args: Vec<(&str, &str)> = args
                    .iter()
                    .map(|(name, value)| (*name, value.as_str()))
                    .collect();
                interpolate(&translate(template), &args)
            }
            FormattedMessage::Generic(message) => translate(message),
        }
    }
}

/// How an action's entries are described.
#[derive(Debug, Clone)]
pub enum LogMessage {
    /// The same past-tense message for every entry.
    Static(String),
    Formatted(Formatter),
}

impl From<&str> for LogMessage {
    fn from(message: &str) -> Self {
        LogMessage::Static(message.to_string())
    }
}

impl From<Formatter> for LogMessage {
    fn from(formatter: Formatter) -> Self {
        LogMessage::Formatted(formatter)
    }
}

/// A registered audit log action.
#[derive(Debug, Clone)]
pub struct LogAction {
    pub code: String,
    /// Untranslated label shown in filters.
    pub label: String,
    pub message: LogMessage,
}

impl LogAction {
    pub fn format(&self, data: &Value) -> FormattedMessage {
        match &self.message {
            LogMessage::Static(message) => FormattedMessage::Generic(message.clone()),
            LogMessage::Formatted(formatter) => formatter(data),
        }
    }
}

/// An audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// An entry stamped with the current time.
    pub fn new(action: impl Into<String>, data: Value, user_id: Option<Uuid>) -> Self {
        Self {
            action: action.into(),
            data,
            user_id,
            timestamp: Utc::now(),
        }
    }
}

/// Registered actions keyed by action code.
#[derive(Debug, Clone, Default)]
pub struct LogActionRegistry {
    actions: Vec<LogAction>,
    index: HashMap<String, usize>,
}

impl LogActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Action codes are unique.
    pub fn register(
        &mut self,
        code: impl Into<String>,
        label: impl Into<String>,
        message: impl Into<LogMessage>,
    ) -> AdminResult<()> {
        let code = code.into();
        if self.index.contains_key(&code) {
            return Err(AdminError::DuplicateAction { code });
        }
        debug!(action = %code, "registered log action");
        self.index.insert(code.clone(), self.actions.len());
        self.actions.push(LogAction {
            code,
            label: label.into(),
            message: message.into(),
        });
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&LogAction> {
        self.index.get(code).and_then(|&i| self.actions.get(i))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Untranslated label of an action.
    pub fn label(&self, code: &str) -> Option<&str> {
        self.get(code).map(|action| action.label.as_str())
    }

    pub fn format_message(&self, code: &str, data: &Value) -> Option<FormattedMessage> {
        self.get(code).map(|action| action.format(data))
    }

    /// (code, label) pairs sorted by label, for filter drop-downs.
    pub fn choices(&self) -> Vec<(&str, &str)> {
        let mut choices: Vec<(&str, &str)> = self
            .actions
            .iter()
            .map(|action| (action.code.as_str(), action.label.as_str()))
            .collect();
        choices.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        choices
    }

    /// Human-readable message for an entry in the request language.
    ///
    /// Unknown actions are described as "Unknown {action}".
    pub fn describe<F>(&self, entry: &LogEntry, translate: F) -> String
    where
        F: Fn(&str) -> String,
    {
        match self.format_message(&entry.action, &entry.data) {
            Some(message) => message.render(translate),
            None => interpolate(&translate("Unknown {action}"), &[("action", &entry.action)]),
        }
    }

    /// Actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LogAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
