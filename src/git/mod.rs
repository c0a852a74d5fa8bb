//! Local git repository access
//!
//! The cleanup engine only needs three things from the repository: the
//! local branches with their upstreams, the remotes, and branch deletion.

mod client;
mod remote;

pub use client::{GitCli, parse_branch_listing};
pub use remote::select_remote;

use crate::error::Result;
use crate::types::{GitRemote, LocalBranch};
use async_trait::async_trait;

/// Local repository operations used by cleanup
#[async_trait]
pub trait LocalRepository: Send + Sync {
    /// All local branches, with upstream info where configured
    async fn local_branches(&self) -> Result<Vec<LocalBranch>>;

    /// Force-delete a local branch
    async fn delete_local_branch(&self, name: &str) -> Result<()>;

    /// Configured remotes
    async fn remotes(&self) -> Result<Vec<GitRemote>>;
}
