use anyhow::Result;
use clap::{Parser, Subcommand};
use hero_browser::commands::{
    favorites_clear_command, favorites_list_command, favorites_toggle_command, info_command,
    init_command, list_command, search_command, show_command, summary_command,
};
use hero_browser::init_tracing;

/// Browse, search, and favorite heroes from a hero catalog backend.
///
/// This CLI is a thin wrapper around `hero-core` (exposed in code as `hero_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(name = "hero-browser", version, about = "Hero catalog browser", long_about = None)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a workspace: writes `.heroes/config.json` and creates the favorites database.
    Init {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional workspace name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Backend server URL (default http://localhost:3000).
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Show configuration and favorites status for a workspace.
    Info {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List one page of heroes, as the home screen would for an address query.
    List {
        #[arg(long, default_value = ".")]
        root: String,

        /// Address query, e.g. `?page=2&tab=heroes`.
        #[arg(long)]
        query: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show a single hero by id or slug.
    Show {
        #[arg(long, default_value = ".")]
        root: String,

        /// Hero id or slug (e.g. `clark-kent`).
        id_or_slug: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Search heroes by name and/or minimum strength.
    Search {
        #[arg(long, default_value = ".")]
        root: String,

        /// Address query, e.g. `?q=bat&strength=7`.
        #[arg(long)]
        query: Option<String>,

        /// Name filter (overrides `q` from the query).
        #[arg(long)]
        name: Option<String>,

        /// Strength filter (overrides `strength` from the query).
        #[arg(long)]
        strength: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show catalog statistics.
    Summary {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Manage locally stored favorites.
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorites in the order they were added.
    List {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Add a hero to favorites, or remove it if already there.
    Toggle {
        #[arg(long, default_value = ".")]
        root: String,

        /// Hero id or slug.
        id_or_slug: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Remove every favorite.
    Clear {
        #[arg(long, default_value = ".")]
        root: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Init { root, name, api_url } => init_command(&root, name, api_url)?,
        Command::Info { root, json } => info_command(&root, json)?,
        Command::List { root, query, json } => list_command(&root, query.as_deref(), json).await?,
        Command::Show { root, id_or_slug, json } => show_command(&root, &id_or_slug, json).await?,
        Command::Search { root, query, name, strength, json } => {
            search_command(&root, query.as_deref(), name.as_deref(), strength.as_deref(), json)
                .await?
        }
        Command::Summary { root, json } => summary_command(&root, json).await?,
        Command::Favorites { command } => match command {
            FavoritesCommand::List { root, json } => favorites_list_command(&root, json)?,
            FavoritesCommand::Toggle { root, id_or_slug, json } => {
                favorites_toggle_command(&root, &id_or_slug, json).await?
            }
            FavoritesCommand::Clear { root } => favorites_clear_command(&root)?,
        },
    }

    Ok(())
}
