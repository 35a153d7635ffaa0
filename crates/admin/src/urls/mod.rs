//! Named admin routes and URL reversal.
//!
//! Routes are registered under names such as `"pages:edit"` with path
//! patterns such as `"/pages/:id/edit/"`, relative to the admin base URL.
//! View sets contribute groups of routes through `register_admin_urls`.

mod resolver;
mod viewsets;

pub use resolver::{RouteDefinition, RouteMatch, UrlResolver, append_querystring};
pub use viewsets::{ViewSet, ViewSetRegistry};
