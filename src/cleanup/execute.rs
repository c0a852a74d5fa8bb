//! Branch deletion - effectful operations
//!
//! Takes a `CleanupPlan` (created by the pure resolver) and deletes the
//! local branches it names, in branch-name order.

use crate::cleanup::ProgressCallback;
use crate::cleanup::resolve::CleanupPlan;
use crate::error::{Error, Result};
use crate::git::LocalRepository;
use tracing::debug;

/// Delete every candidate branch (EFFECTFUL)
///
/// Stops at the first failure. Branches deleted before it stay deleted;
/// the error records how many there were.
///
/// # Returns
/// The number of branches deleted
pub async fn delete_candidates(
    plan: &CleanupPlan,
    repo: &dyn LocalRepository,
    progress: &dyn ProgressCallback,
) -> Result<usize> {
    let mut deleted = 0;

    for candidate in plan.iter() {
        let name = candidate.branch.name.as_str();
        if let Err(e) = repo.delete_local_branch(name).await {
            debug!(branch = name, deleted, error = %e, "branch deletion failed");
            return Err(Error::Deletion {
                branch: name.to_string(),
                deleted,
                message: e.to_string(),
            });
        }
        deleted += 1;
        progress.on_deleted(name).await;
    }

    debug!(deleted, "deleted branches");
    Ok(deleted)
}
