use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::scheduler::DEFAULT_REFRESH_INTERVAL_MS;

/// Command-line interface for the `universal-skills` application.
///
/// With no subcommand the MCP server is started, using the top-level serve flags.
#[derive(Debug, Parser)]
#[command(
    name = "universal-skills",
    version,
    about = "MCP server and CLI tool for discovering and installing skills",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Available `universal-skills` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Runs as an MCP server over stdio.
    #[command(alias = "mcp")]
    Serve(ServeArgs),
    /// Resolves skills once and prints them (debug).
    #[command(alias = "list-skills")]
    List {
        /// Additional skill directories, searched after the standard locations.
        #[arg(
            long = "skill-dir",
            value_name = "DIR",
            env = "UNIVERSAL_SKILLS_SKILL_DIR",
            value_delimiter = ':'
        )]
        skill_dirs: Vec<PathBuf>,
        /// Prints JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Installs a skill from a GitHub or GitLab repository.
    Install(InstallArgs),
}

/// Flags for the MCP server.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Additional skill directories, searched after the standard locations (repeatable).
    #[arg(
        long = "skill-dir",
        value_name = "DIR",
        env = "UNIVERSAL_SKILLS_SKILL_DIR",
        value_delimiter = ':'
    )]
    pub skill_dirs: Vec<PathBuf>,
    /// Milliseconds between scheduled re-scans of the skill locations.
    #[arg(
        long,
        value_name = "MILLIS",
        env = "UNIVERSAL_SKILLS_REFRESH_MS",
        default_value_t = DEFAULT_REFRESH_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub refresh_interval_ms: u64,
}

/// Flags for `install`. Anything left out is prompted for.
#[derive(Debug, Clone, Args)]
pub struct InstallArgs {
    /// Repository URL (https or ssh, GitHub or GitLab).
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,
    /// Subdirectory within the repository that holds the skill.
    #[arg(long, value_name = "PATH")]
    pub repo_dir: Option<String>,
    /// Local installation directory (default: ~/.claude/skills).
    #[arg(long, value_name = "PATH", env = "UNIVERSAL_SKILLS_INSTALL_DIR")]
    pub local_dir: Option<String>,
    /// Replaces an existing skill without asking.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}
