//! pr-cleanup: delete local branches whose pull requests are done
//!
//! Local branches that track an upstream are matched against the merged
//! or closed PRs (GitHub) / MRs (GitLab) of those upstreams. A branch
//! whose head commit is part of such a PR has nothing the PR lacks and can
//! be deleted.

pub mod auth;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod types;
