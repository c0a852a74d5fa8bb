//! Shared command context for CLI commands
//!
//! Extracts the setup every cleanup run needs.

use pr_cleanup::config::{Config, load_config};
use pr_cleanup::error::{Error, Result};
use pr_cleanup::git::{GitCli, LocalRepository, select_remote};
use pr_cleanup::platform::{PlatformService, create_platform_service, parse_repo_info};
use std::path::Path;
use tracing::debug;

/// Shared context for commands that talk to the repository and platform
///
/// This struct encapsulates:
/// - Opening the git repository
/// - Loading user configuration
/// - Selecting and validating the remote
/// - Detecting the platform and creating the service
pub struct CommandContext {
    /// The git repository
    pub repo: GitCli,
    /// User configuration
    pub config: Config,
    /// Platform service (GitHub/GitLab)
    pub platform: Box<dyn PlatformService>,
    /// Selected remote name
    pub remote_name: String,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// An explicit `remote` overrides the configured one.
    pub async fn new(path: &Path, remote: Option<&str>) -> Result<Self> {
        let repo = GitCli::open(path).await?;
        let config = load_config()?;

        let remotes = repo.remotes().await?;
        let requested = remote.or(config.remote.as_deref());
        let remote_name = select_remote(&remotes, requested)?;

        // Detect platform from remote URL
        let remote_info = remotes
            .iter()
            .find(|r| r.name == remote_name)
            .ok_or_else(|| Error::RemoteNotFound(remote_name.clone()))?;

        let platform_config = parse_repo_info(&remote_info.url)?;
        debug!(
            root = %repo.root().display(),
            remote = %remote_name,
            platform = ?platform_config.platform,
            "resolved repository"
        );

        let platform = create_platform_service(&platform_config).await?;

        Ok(Self {
            repo,
            config,
            platform,
            remote_name,
        })
    }
}
