//! Admin registry error types.
//!
//! Visibility checks and audit message formatting never produce errors;
//! these cover startup problems only (bad routes, duplicate registrations,
//! unreadable catalogs).

use thiserror::Error;

/// Errors raised while assembling or querying the admin registries.
#[derive(Debug, Error)]
pub enum AdminError {
    /// URL reversal was asked for a route name that was never registered.
    #[error("no route named '{name}'")]
    UnknownRoute { name: String },

    /// URL reversal was given the wrong number of arguments.
    #[error("route '{name}' expects {expected} argument(s), got {given}")]
    RouteArguments {
        name: String,
        expected: usize,
        given: usize,
    },

    /// Two routes were registered under the same name.
    #[error("route '{name}' is already registered")]
    DuplicateRoute { name: String },

    /// Two log actions were registered under the same action code.
    #[error("log action '{code}' is already registered")]
    DuplicateAction { code: String },

    /// A hook name string did not match any known extension point.
    #[error("unknown hook '{hook}'. Valid hooks: {valid_hooks}")]
    UnknownHook { hook: String, valid_hooks: String },

    /// A rich text feature was referenced but never registered.
    #[error("rich text feature '{feature}' has no {what} registered")]
    MissingFeature { feature: String, what: String },

    /// A translation catalog could not be read.
    #[error("failed to load translation catalog '{path}': {details}")]
    Catalog { path: String, details: String },

    /// A menu template failed to render.
    #[error("failed to render template '{template}': {details}")]
    Template { template: String, details: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdminError {
    /// Create an unknown hook error listing the valid names.
    pub fn unknown_hook(hook: impl Into<String>, valid: &[&str]) -> Self {
        Self::UnknownHook {
            hook: hook.into(),
            valid_hooks: valid.join(", "),
        }
    }

    /// Create a missing feature error.
    pub fn missing_feature(feature: impl Into<String>, what: impl Into<String>) -> Self {
        Self::MissingFeature {
            feature: feature.into(),
            what: what.into(),
        }
    }
}

/// Result type alias using AdminError.
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_hook_lists_valid_names() {
        let err = AdminError::unknown_hook("register_nothing", &["a", "b"]);
        assert_eq!(
            err.to_string(),
            "unknown hook 'register_nothing'. Valid hooks: a, b"
        );
    }

    #[test]
    fn route_argument_message() {
        let err = AdminError::RouteArguments {
            name: "pages:edit".to_string(),
            expected: 1,
            given: 0,
        };
        assert!(err.to_string().contains("expects 1 argument(s), got 0"));
    }
}
