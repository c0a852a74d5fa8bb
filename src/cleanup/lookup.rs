//! PR lookups for tracked branches (effectful)
//!
//! Lookups run one branch at a time. Parallel requests would burn through
//! the platform's rate limit unpredictably, so pacing is done here with a
//! [`Throttle`] instead.

use crate::cleanup::ProgressCallback;
use crate::cleanup::selector::PrSelector;
use crate::cleanup::throttle::{RetryPolicy, Throttle};
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{LocalBranch, PullRequest};
use std::time::Duration;
use tracing::debug;

/// Pacing and retry settings for lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// Pause after each successful lookup
    pub interval: Duration,
    /// Retry policy for rate-limited lookups
    pub retry: RetryPolicy,
}

impl LookupOptions {
    /// No pacing and no retries
    pub const fn unthrottled() -> Self {
        Self {
            interval: Duration::ZERO,
            retry: RetryPolicy::none(),
        }
    }
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        }
    }
}

/// Rough duration of a lookup run, for progress messages only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatedDuration {
    /// Ten branches or fewer
    Negligible,
    /// Up to thirty branches
    Short,
    /// Up to sixty branches
    Medium,
    /// More than sixty branches
    Long,
}

impl EstimatedDuration {
    /// Hint appended to the progress label
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Negligible => "",
            Self::Short => "This might take a few seconds...",
            Self::Medium => "This might take a minute...",
            Self::Long => "This might take a few minutes...",
        }
    }
}

/// Classify how long looking up `branch_count` branches may take
pub const fn estimate_duration(branch_count: usize) -> EstimatedDuration {
    if branch_count > 60 {
        EstimatedDuration::Long
    } else if branch_count > 30 {
        EstimatedDuration::Medium
    } else if branch_count > 10 {
        EstimatedDuration::Short
    } else {
        EstimatedDuration::Negligible
    }
}

/// Fetch the merged or closed PR of each tracked branch (EFFECTFUL)
///
/// Branches without a PR are skipped. Any other failure aborts the whole
/// run and no partial result is returned.
///
/// # Arguments
/// * `branches` - Tracked branches; lookups use `upstream.branch`
/// * `platform` - Platform service for API calls
/// * `options` - Pacing and retry settings
/// * `progress` - Progress callback for status updates
pub async fn fetch_pull_requests(
    branches: &[LocalBranch],
    platform: &dyn PlatformService,
    options: &LookupOptions,
    progress: &dyn ProgressCallback,
) -> Result<Vec<PullRequest>> {
    let mut throttle = Throttle::new(options.interval);
    let mut prs = Vec::new();

    for (index, branch) in branches.iter().enumerate() {
        throttle.acquire().await;
        progress.on_lookup(branch, index, branches.len()).await;

        let head = branch.upstream.branch.as_str();
        let found = options
            .retry
            .run(|| platform.find_closed_pr(head))
            .await?;

        match found {
            Some(pr) => {
                debug!(branch = %branch.name, pr_number = pr.number, "branch has finished PR");
                throttle.consume();
                prs.push(pr);
            }
            None => {
                debug!(branch = %branch.name, upstream = head, "no finished PR for branch");
            }
        }
    }

    Ok(prs)
}

/// Fetch the single PR named on the command line
///
/// Fails with [`Error::PullRequestNotFound`] when it does not exist or
/// is still open.
///
/// Rate-limited requests are retried with `options.retry`.
pub async fn fetch_selected_pull_request(
    selector: &PrSelector,
    platform: &dyn PlatformService,
    options: &LookupOptions,
) -> Result<PullRequest> {
    let found = match selector {
        PrSelector::Number(number) => options.retry.run(|| platform.get_pr(*number)).await?,
        PrSelector::Branch(name) => options.retry.run(|| platform.find_closed_pr(name)).await?,
    };

    match found {
        Some(pr) if pr.state.is_finished() => Ok(pr),
        Some(pr) => {
            debug!(pr_number = pr.number, state = %pr.state, "selected PR is not finished");
            Err(Error::PullRequestNotFound(selector.to_string()))
        }
        None => Err(Error::PullRequestNotFound(selector.to_string())),
    }
}
