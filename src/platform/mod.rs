//! Platform services for GitHub and GitLab
//!
//! Provides a unified interface for looking up finished PRs/MRs.

mod detection;
mod factory;
mod github;
mod gitlab;

pub use detection::{detect_platform, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{PlatformConfig, PullRequest};
use async_trait::async_trait;

/// Platform service trait for PR/MR lookups
///
/// This trait abstracts GitHub and GitLab, allowing the same cleanup
/// logic to work with either platform (and with mocks in tests).
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Find the most recent merged or closed PR whose head branch is `head_branch`
    ///
    /// The returned PR carries its title, head commit and commit history.
    /// `Ok(None)` means no such PR exists; it is not an error.
    async fn find_closed_pr(&self, head_branch: &str) -> Result<Option<PullRequest>>;

    /// Get a PR by number, in any state
    ///
    /// `Ok(None)` means the number does not exist in this repository.
    async fn get_pr(&self, number: u64) -> Result<Option<PullRequest>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
