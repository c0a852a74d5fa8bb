//! prune - clean up local branches of merged or closed pull requests

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::cleanup::{CleanupOptions, run_cleanup};
use cli::style::Stylize;
use pr_cleanup::error::{Error, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prune",
    version,
    about = "Clean up local branches of merged or closed pull requests",
    args_conflicts_with_subcommands = true
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pull request to clean up: number, URL, or head branch
    #[arg(value_name = "NUMBER | URL | BRANCH")]
    selector: Option<String>,

    /// Clean up all merged pull requests
    #[arg(long)]
    all: bool,

    /// Both --exclude-closed and --exclude-behind
    #[arg(long)]
    strict: bool,

    /// Exclude branches of closed pull requests
    #[arg(long)]
    exclude_closed: bool,

    /// Exclude branches that are behind their remote
    #[arg(long)]
    exclude_behind: bool,

    /// Skip deletion confirmation
    #[arg(long)]
    yes: bool,

    /// Remote to look up pull requests for (default: origin)
    #[arg(long)]
    remote: Option<String>,

    /// Path to the repository
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check authentication with GitHub or GitLab
    Auth {
        #[command(subcommand)]
        platform: AuthPlatform,
    },
}

#[derive(Subcommand)]
enum AuthPlatform {
    /// Check the GitHub token (GITHUB_TOKEN or gh CLI)
    Github {
        /// GitHub Enterprise host
        #[arg(long)]
        host: Option<String>,
    },
    /// Check the GitLab token (GITLAB_TOKEN or glab CLI)
    Gitlab {
        /// Self-hosted GitLab host
        #[arg(long)]
        host: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Auth { platform }) => match platform {
            AuthPlatform::Github { host } => cli::auth::run_github_auth(host.as_deref()).await,
            AuthPlatform::Gitlab { host } => cli::auth::run_gitlab_auth(host.as_deref()).await,
        },
        None => {
            let options = CleanupOptions {
                selector: cli.selector,
                all: cli.all,
                strict: cli.strict,
                exclude_closed: cli.exclude_closed,
                exclude_behind: cli.exclude_behind,
                yes: cli.yes,
            };
            run_cleanup(&cli.path, cli.remote.as_deref(), options).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
