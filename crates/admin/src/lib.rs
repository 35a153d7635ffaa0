//! Portico admin extension registry.
//!
//! Menus, search areas, page listing buttons, account entries, permissions,
//! admin URLs, icons, rich text features and audit log actions are
//! registered into an [`AdminRegistry`] at startup and read per request
//! through an [`AdminSite`].

pub mod account;
pub mod buttons;
pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod html;
pub mod i18n;
pub mod icons;
pub mod log_actions;
pub mod menu;
pub mod permissions;
pub mod registrar;
pub mod rich_text;
pub mod search;
pub mod site;
pub mod urls;

pub use config::Config;
pub use context::{AdminRequest, PageRecord, UserContext};
pub use error::{AdminError, AdminResult};
pub use hooks::{AdminRegistry, HookName};
pub use site::{AdminSite, AdminSiteBuilder};
