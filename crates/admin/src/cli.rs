//! Subcommands of the `portico` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use portico_admin::account::account_menu_items;
use portico_admin::buttons::{ButtonContext, page_listing_buttons};
use portico_admin::log_actions::LogEntry;
use portico_admin::menu::{MenuKind, render_menu};
use portico_admin::rich_text::{ContentState, EditorBackend};
use portico_admin::search::render_search_areas;
use portico_admin::{AdminRequest, AdminSite, PageRecord, UserContext};

/// Inspect the Portico admin registries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Contribution counts per extension point.
    Hooks,

    /// Resolve a menu for a user.
    Menu {
        #[arg(long, value_enum, default_value_t = MenuArg::Admin)]
        menu: MenuArg,
        #[command(flatten)]
        who: RequestArgs,
        /// Render HTML instead of JSON.
        #[arg(long)]
        html: bool,
    },

    /// Search areas offered to a user.
    Search {
        #[command(flatten)]
        who: RequestArgs,
        /// Query carried over to each area.
        #[arg(long)]
        query: Option<String>,
    },

    /// Listing buttons for one page row.
    Buttons {
        #[command(flatten)]
        who: RequestArgs,
        /// Page record JSON file.
        #[arg(long)]
        page: PathBuf,
        /// Treat the row as the parent page above the listing.
        #[arg(long)]
        parent: bool,
        /// URL to return to after destructive actions.
        #[arg(long)]
        next: Option<String>,
        /// Render HTML instead of JSON.
        #[arg(long)]
        html: bool,
    },

    /// Account settings entries for a user.
    Account {
        #[command(flatten)]
        who: RequestArgs,
    },

    /// Registered icon paths.
    Icons,

    /// Editor plugins for the enabled rich text features.
    Features {
        #[arg(long, value_enum, default_value_t = BackendArg::Draftail)]
        backend: BackendArg,
        /// Comma-separated feature list (default: the configured defaults).
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Describe an audit log entry.
    LogMessage {
        /// Action code, e.g. "portico.copy".
        action: String,
        /// Entry data as JSON.
        #[arg(long, default_value = "{}")]
        data: String,
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Convert between stored HTML and contentstate JSON.
    Convert {
        #[arg(long, value_enum)]
        to: ConvertTarget,
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,
        /// Input file (default: stdin).
        input: Option<PathBuf>,
    },

    /// Clean editor HTML against the enabled features' whitelist.
    Clean {
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,
        /// Input file (default: stdin).
        input: Option<PathBuf>,
    },
}

/// Who is asking, and in which language.
#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// User JSON file (default: anonymous).
    #[arg(long)]
    user: Option<PathBuf>,
    #[arg(long)]
    language: Option<String>,
}

impl RequestArgs {
    fn request<'a>(&'a self, site: &'a AdminSite, user: &'a UserContext) -> AdminRequest<'a> {
        let request = site.request(user);
        match &self.language {
            Some(language) => request.with_language(language),
            None => request,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum MenuArg {
    Admin,
    Settings,
    Reports,
}

impl From<MenuArg> for MenuKind {
    fn from(menu: MenuArg) -> Self {
        match menu {
            MenuArg::Admin => MenuKind::Admin,
            MenuArg::Settings => MenuKind::Settings,
            MenuArg::Reports => MenuKind::Reports,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BackendArg {
    Hallo,
    Draftail,
}

impl From<BackendArg> for EditorBackend {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Hallo => EditorBackend::Hallo,
            BackendArg::Draftail => EditorBackend::Draftail,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ConvertTarget {
    /// Stored HTML -> contentstate JSON.
    Contentstate,
    /// Contentstate JSON -> stored HTML.
    Html,
}

/// Run a subcommand against the assembled site.
pub fn run(command: Command, site: &AdminSite) -> Result<()> {
    match command {
        Command::Hooks => {
            let summary: Vec<Value> = site
                .registry()
                .summary()
                .into_iter()
                .map(|(hook, count)| json!({ "hook": hook, "contributions": count }))
                .collect();
            print_json(&summary)
        }
        Command::Menu { menu, who, html } => {
            let user = load_user(who.user.as_deref())?;
            let request = who.request(site, &user);
            let items = render_menu(&request, menu.into());
            if html {
                println!("{}", site.renderer().render_menu(&items)?);
                Ok(())
            } else {
                print_json(&items)
            }
        }
        Command::Search { who, query } => {
            let user = load_user(who.user.as_deref())?;
            let request = who.request(site, &user);
            print_json(&render_search_areas(&request, query.as_deref()))
        }
        Command::Buttons {
            who,
            page,
            parent,
            next,
            html,
        } => {
            let user = load_user(who.user.as_deref())?;
            let page: PageRecord = read_json(&page)?;
            let request = who.request(site, &user);
            let perms = request.page_permissions().for_page(&page);
            let ctx = ButtonContext::new(&request, &page, &perms)
                .parent(parent)
                .next_url(next.as_deref());
            let buttons = page_listing_buttons(&ctx);
            debug!(page = page.id, buttons = buttons.len(), "collected listing buttons");
            if html {
                for button in &buttons {
                    println!("{}", button.to_html());
                }
                Ok(())
            } else {
                print_json(&buttons)
            }
        }
        Command::Account { who } => {
            let user = load_user(who.user.as_deref())?;
            let request = who.request(site, &user);
            print_json(&account_menu_items(&request))
        }
        Command::Icons => print_json(&site.registry().icons().paths()),
        Command::Features {
            backend,
            features,
            language,
        } => {
            let registry = site.registry().features();
            let features = features.unwrap_or_else(|| registry.default_features().to_vec());
            match EditorBackend::from(backend) {
                EditorBackend::Draftail => print_json(&registry.draftail_options(&features, |msgid| {
                    site.translator().gettext(msgid, &language)
                })),
                EditorBackend::Hallo => {
                    print_json(&registry.editor_plugins(EditorBackend::Hallo, &features))
                }
            }
        }
        Command::LogMessage {
            action,
            data,
            language,
        } => {
            let data: Value = serde_json::from_str(&data).context("--data is not valid JSON")?;
            let actions = site.registry().log_actions();
            if !actions.contains(&action) {
                bail!("unknown log action '{action}'");
            }
            let entry = LogEntry::new(action, data, None);
            println!(
                "{}",
                actions.describe(&entry, |msgid| site.translator().gettext(msgid, &language))
            );
            Ok(())
        }
        Command::Convert {
            to,
            features,
            input,
        } => {
            let registry = site.registry().features();
            let features = features.unwrap_or_else(|| registry.default_features().to_vec());
            let converter = registry.contentstate_converter(&features);
            let source = read_input(input.as_deref())?;
            match to {
                ConvertTarget::Contentstate => print_json(&converter.from_storage(&source)),
                ConvertTarget::Html => {
                    let state: ContentState =
                        serde_json::from_str(&source).context("input is not contentstate JSON")?;
                    println!("{}", converter.to_storage(&state));
                    Ok(())
                }
            }
        }
        Command::Clean { features, input } => {
            let registry = site.registry().features();
            let features = features.unwrap_or_else(|| registry.default_features().to_vec());
            let source = read_input(input.as_deref())?;
            println!("{}", registry.editor_html_whitelist(&features).clean(&source));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_user(path: Option<&Path>) -> Result<UserContext> {
    match path {
        Some(path) => read_json(path),
        None => Ok(UserContext::anonymous()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin"),
    }
}
