//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::asset::AssetKind;

/// engine-admin - Status and lifecycle administration for engine installations.
#[derive(Debug, Parser)]
#[command(name = "engine-admin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides <root>/engine-admin.yml)
    #[arg(short, long, global = true, env = "ENGINE_ADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Installation root (overrides current directory)
    #[arg(short, long, global = true, env = "ENGINE_ADMIN_ROOT")]
    pub root: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the status of every asset (default if no command specified)
    Status(StatusArgs),

    /// Refresh status whenever it goes stale
    Watch(WatchArgs),

    /// Inspect, create and migrate the backend database
    #[command(subcommand)]
    Db(DbCommand),

    /// Show and change stored connections
    #[command(subcommand)]
    Connection(ConnectionCommand),

    /// Start a webserver asset
    Start(StartArgs),

    /// Open an asset's URL or folder
    Browse(BrowseArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Print a JSON report
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `watch` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (overrides auto_refresh_timeout)
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Stop after this many refreshes
    #[arg(long)]
    pub cycles: Option<u32>,
}

/// Database subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum DbCommand {
    /// Show the database status
    Status,

    /// Show the installed schema version
    Version,

    /// Create the database and its schema
    Create(DbCreateArgs),

    /// Run pending migration scripts
    Update(DbUpdateArgs),
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct DbCreateArgs {
    /// Collation for the new database (overrides database_collation)
    #[arg(long)]
    pub collation: Option<String>,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct DbUpdateArgs {
    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Connection subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConnectionCommand {
    /// Show stored connections
    Show(ConnectionShowArgs),

    /// Store the backend database connection
    SetDatabase(SetDatabaseArgs),

    /// Store the backend API connection
    SetApi(SetWebserverArgs),

    /// Store the web application connection
    SetWebapp(SetWebserverArgs),

    /// Store the backend API key
    SetApiKey(SetApiKeyArgs),
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectionShowArgs {
    /// Show passwords and API keys
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetDatabaseArgs {
    /// Full connection string; other flags override its values
    pub connection_string: Option<String>,

    /// Start from the local or remote preset
    #[arg(long, value_enum)]
    pub preset: Option<HostPreset>,

    #[arg(long)]
    pub server: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Connect timeout in seconds
    #[arg(long)]
    pub timeout: Option<u32>,

    /// Use integrated security instead of credentials
    #[arg(long)]
    pub trusted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HostPreset {
    Local,
    Remote,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetWebserverArgs {
    /// Full connection string; other flags override its values
    pub connection_string: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetApiKeyArgs {
    /// The key; prompted for when omitted
    pub key: Option<String>,
}

/// Arguments for the `start` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StartArgs {
    #[arg(value_enum)]
    pub target: StartTarget,
}

/// Assets that run under a webserver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StartTarget {
    Backend,
    Webapp,
}

impl From<StartTarget> for AssetKind {
    fn from(target: StartTarget) -> Self {
        match target {
            StartTarget::Backend => AssetKind::Backend,
            StartTarget::Webapp => AssetKind::WebApp,
        }
    }
}

/// Arguments for the `browse` command.
#[derive(Debug, Clone, clap::Args)]
pub struct BrowseArgs {
    #[arg(value_enum)]
    pub asset: BrowseAsset,
}

/// Assets that can be browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowseAsset {
    Backend,
    RemoteBackend,
    Webapp,
    Tests,
    Examples,
}

impl From<BrowseAsset> for AssetKind {
    fn from(asset: BrowseAsset) -> Self {
        match asset {
            BrowseAsset::Backend => AssetKind::Backend,
            BrowseAsset::RemoteBackend => AssetKind::RemoteBackend,
            BrowseAsset::Webapp => AssetKind::WebApp,
            BrowseAsset::Tests => AssetKind::Tests,
            BrowseAsset::Examples => AssetKind::Examples,
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
