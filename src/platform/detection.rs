//! Platform detection from git remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::env;
use std::sync::LazyLock;

// git@host:owner/repo(.git)
static SSH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ssh://)?[^@/]+@(?P<host>[^:/]+)(?::\d+)?[:/](?P<path>.+?)(?:\.git)?/*$")
        .expect("valid regex")
});

// https://host/owner/repo(.git)
static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/(?P<path>.+?)(?:\.git)?/*$")
        .expect("valid regex")
});

fn split_host_path(url: &str) -> Option<(String, String)> {
    let caps = HTTPS_URL
        .captures(url)
        .or_else(|| SSH_URL.captures(url))?;
    let host = caps.name("host")?.as_str().to_lowercase();
    let path = caps.name("path")?.as_str().trim_matches('/').to_string();
    Some((host, path))
}

fn host_from_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Detect which platform a remote URL points to
///
/// Returns `None` for hosts that are neither GitHub nor GitLab. Custom
/// hosts are recognized by name or via `GH_HOST` / `GITLAB_HOST`.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let (host, _) = split_host_path(url)?;

    if host == "github.com" || host_from_env("GH_HOST").is_some_and(|h| h == host) {
        return Some(Platform::GitHub);
    }
    if host == "gitlab.com" || host_from_env("GITLAB_HOST").is_some_and(|h| h == host) {
        return Some(Platform::GitLab);
    }
    if host.contains("github") {
        return Some(Platform::GitHub);
    }
    if host.contains("gitlab") {
        return Some(Platform::GitLab);
    }
    None
}

/// Parse owner, repo and host out of a remote URL
///
/// GitLab paths may be nested (`group/subgroup/repo`); everything before
/// the last segment becomes the owner.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let platform = detect_platform(url).ok_or(Error::NoSupportedRemotes)?;
    let (host, path) = split_host_path(url).ok_or(Error::NoSupportedRemotes)?;

    let (owner, repo) = path
        .rsplit_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
        .ok_or_else(|| Error::Platform(format!("cannot parse repository from '{url}'")))?;

    if platform == Platform::GitHub && owner.contains('/') {
        return Err(Error::Platform(format!(
            "cannot parse repository from '{url}'"
        )));
    }

    let default_host = match platform {
        Platform::GitHub => "github.com",
        Platform::GitLab => "gitlab.com",
    };

    Ok(PlatformConfig {
        platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (host != default_host).then_some(host),
    })
}
