mod cmd;
mod output;
mod root;
mod terminal;

use clap::{Parser, Subcommand};
use cmd::settings::SettingsSubcommand;
use cmd::Context;
use shortcut_core::paths::DEFAULT_API_URL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shortcut",
    about = "Search Shortcut stories, cut branches for them, commit and open pull requests",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .git)
    #[arg(long, global = true, env = "SHORTCUT_ROOT")]
    root: Option<PathBuf>,

    /// Settings file (default: ~/.shortcut/settings.yaml)
    #[arg(long, global = true, env = "SHORTCUT_SETTINGS")]
    settings: Option<PathBuf>,

    /// Shortcut API base URL
    #[arg(long, global = true, env = "SHORTCUT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Print URLs instead of opening a browser
    #[arg(long, global = true, env = "SHORTCUT_NO_BROWSER")]
    no_browser: bool,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search stories, then view one or create a branch for it
    Search {
        /// Search query (prompted for when omitted)
        query: Option<String>,
    },

    /// List your stories in a workflow state
    Stories,

    /// Create a story through a series of prompts
    Create,

    /// Create a branch for a story from the base branch
    Branch { id: u64 },

    /// Commit all changes with a message naming the branch's story, then push
    Commit,

    /// Amend the last commit with all changes and force-push
    RedoCommit,

    /// Open a GitHub pull request page for the current branch
    Pr,

    /// Open a story in the browser
    Open { id: u64 },

    /// Print a story's details
    Show { id: u64 },

    /// Set the branch new story branches start from (this project only)
    BaseBranch {
        /// Branch name (prompted for when omitted)
        name: Option<String>,
    },

    /// Set the Shortcut API token
    Token {
        /// Token value (prompted for when omitted)
        value: Option<String>,
    },

    /// Inspect and change settings
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context {
        root: root::resolve_root(cli.root.as_deref()),
        settings_path: cli.settings,
        api_url: cli.api_url,
        json: cli.json,
        no_browser: cli.no_browser,
    };

    let result = match cli.command {
        Commands::Search { query } => cmd::story::search(&ctx, query.as_deref()),
        Commands::Stories => cmd::story::stories(&ctx),
        Commands::Create => cmd::story::create(&ctx),
        Commands::Branch { id } => cmd::story::branch(&ctx, id),
        Commands::Commit => cmd::git::commit(&ctx),
        Commands::RedoCommit => cmd::git::redo_commit(&ctx),
        Commands::Pr => cmd::git::pull_request(&ctx),
        Commands::Open { id } => cmd::story::open(&ctx, id),
        Commands::Show { id } => cmd::story::show(&ctx, id),
        Commands::BaseBranch { name } => cmd::settings::base_branch(&ctx, name.as_deref()),
        Commands::Token { value } => cmd::settings::token(&ctx, value.as_deref()),
        Commands::Settings { subcommand } => cmd::settings::run(&ctx, subcommand),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
