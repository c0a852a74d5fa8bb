//! Core types for pr-cleanup

use serde::{Deserialize, Serialize};

/// Remote branch a local branch follows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Upstream {
    /// Remote name (e.g., "origin"), empty when the branch tracks nothing
    pub remote: String,
    /// Branch name on the remote, without `refs/heads/`
    pub branch: String,
}

impl Upstream {
    /// Whether this branch tracks a remote at all
    pub const fn is_tracked(&self) -> bool {
        !self.remote.is_empty()
    }
}

/// A local git branch with its upstream tracking info
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LocalBranch {
    /// Branch name (short form)
    pub name: String,
    /// Commit the branch points to (hex)
    pub head: String,
    /// Tracking info
    pub upstream: Upstream,
}

impl LocalBranch {
    /// Identity of this branch within a single run
    pub fn key(&self) -> BranchKey {
        BranchKey {
            name: self.name.clone(),
            head: self.head.clone(),
        }
    }
}

/// Value identity of a local branch: name plus the commit it points to
///
/// Ordered by name first so maps keyed by it iterate alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchKey {
    /// Branch name
    pub name: String,
    /// Head commit (hex)
    pub head: String,
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is still open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl PrState {
    /// Merged or closed; the only states a branch can be cleaned up for
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Merged | Self::Closed)
    }
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// A pull request / merge request snapshot, fetched once per branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR/MR number
    pub number: u64,
    /// PR/MR title
    pub title: String,
    /// Current state
    pub state: PrState,
    /// Head commit of the PR (hex)
    pub head_oid: String,
    /// Commits of the PR in PR order (oldest first, ends with the head)
    pub commits: Vec<String>,
    /// Web URL for the PR/MR
    pub html_url: String,
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user, organization, or GitLab group path)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com/gitlab.com)
    pub host: Option<String>,
}
