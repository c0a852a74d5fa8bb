//! Cleanup engine for merged and closed PR branches
//!
//! Three-phase pattern, like a merge or submit run:
//! 1. Gather - list tracked branches and fetch their PRs (effectful, paced)
//! 2. Plan - match branches to PRs by commit ancestry (pure, testable)
//! 3. Execute - delete the confirmed branches (effectful)

mod execute;
mod inventory;
mod lookup;
mod policy;
mod resolve;
mod selector;
mod throttle;

pub use execute::delete_candidates;
pub use inventory::{CommitIndex, tracked_branches};
pub use lookup::{
    EstimatedDuration, LookupOptions, estimate_duration, fetch_pull_requests,
    fetch_selected_pull_request,
};
pub use policy::FilterPolicy;
pub use resolve::{Candidate, CleanupPlan, resolve_candidates};
pub use selector::{PrSelector, Selection};
pub use throttle::{RetryPolicy, Throttle};

use crate::error::Result;
use crate::git::LocalRepository;
use crate::platform::PlatformService;
use crate::types::LocalBranch;
use async_trait::async_trait;

/// Progress callback for lookups and deletions
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called once with the number of tracked branches about to be looked up
    async fn on_inventory(&self, tracked: usize);

    /// Called before the PR lookup for a branch (`index` is zero-based)
    async fn on_lookup(&self, branch: &LocalBranch, index: usize, total: usize);

    /// Called after a branch was deleted
    async fn on_deleted(&self, branch: &str);
}

/// Progress callback that ignores everything
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_inventory(&self, _tracked: usize) {}

    async fn on_lookup(&self, _branch: &LocalBranch, _index: usize, _total: usize) {}

    async fn on_deleted(&self, _branch: &str) {}
}

/// Run the gather and plan phases for a selection
///
/// Lists local branches once, keeps the tracked ones, looks up PRs and
/// returns the resolved plan. An empty plan means there is nothing to clean up.
pub async fn build_cleanup_plan(
    selection: &Selection,
    repo: &dyn LocalRepository,
    platform: &dyn PlatformService,
    policy: FilterPolicy,
    options: &LookupOptions,
    progress: &dyn ProgressCallback,
) -> Result<CleanupPlan> {
    let branches = tracked_branches(repo.local_branches().await?);
    progress.on_inventory(branches.len()).await;
    if branches.is_empty() {
        return Ok(CleanupPlan::default());
    }

    let prs = match selection {
        Selection::All => fetch_pull_requests(&branches, platform, options, progress).await?,
        Selection::Single(selector) => {
            vec![fetch_selected_pull_request(selector, platform, options).await?]
        }
    };

    let index = CommitIndex::build(&branches);
    Ok(resolve_candidates(&index, &prs, policy))
}
