//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;
mod mock_repo;
mod temp_repo;

pub use mock_platform::MockPlatformService;
pub use mock_repo::MockRepository;
pub use temp_repo::TempGitRepo;

use pr_cleanup::types::{LocalBranch, Platform, PlatformConfig, PrState, PullRequest, Upstream};

/// GitHub config for owner `test`, repo `repo`
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        platform: Platform::GitHub,
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Local branch tracking `origin/<name>`
pub fn tracked(name: &str, head: &str) -> LocalBranch {
    LocalBranch {
        name: name.to_string(),
        head: head.to_string(),
        upstream: Upstream {
            remote: "origin".to_string(),
            branch: name.to_string(),
        },
    }
}

/// Local branch with no upstream
pub fn untracked(name: &str, head: &str) -> LocalBranch {
    LocalBranch {
        name: name.to_string(),
        head: head.to_string(),
        upstream: Upstream::default(),
    }
}

/// PR whose head is the last of `commits`
pub fn make_pr(number: u64, state: PrState, commits: &[&str]) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        state,
        head_oid: commits.last().map(ToString::to_string).unwrap_or_default(),
        commits: commits.iter().map(ToString::to_string).collect(),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}
