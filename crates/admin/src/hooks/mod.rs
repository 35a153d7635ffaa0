//! Named extension points and the registry that collects contributions.
//!
//! Contributions are registered once at startup through ordinary calls on
//! [`AdminRegistry`]; the assembled registry is then owned by the
//! [`AdminSite`](crate::site::AdminSite) and read per request.

mod names;
mod registry;

pub use names::{HookName, KNOWN_HOOKS};
pub use registry::AdminRegistry;
