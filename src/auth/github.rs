//! GitHub token discovery

use super::{AuthSource, token_from_cli, token_from_env};
use crate::error::{Error, Result};
use octocrab::Octocrab;
use tracing::debug;

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// Custom host, if any
    pub host: Option<String>,
}

/// Find a GitHub token: `GITHUB_TOKEN` / `GH_TOKEN`, then `gh auth token`
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = token_from_env(&["GITHUB_TOKEN", "GH_TOKEN"]) {
        debug!("using GitHub token from environment");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host: host.map(ToString::to_string),
        });
    }

    if let Some(token) = token_from_cli("gh", host).await {
        debug!("using GitHub token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
            host: host.map(ToString::to_string),
        });
    }

    Err(Error::Auth(
        "no GitHub token found. Set GITHUB_TOKEN or run 'gh auth login'.".to_string(),
    ))
}

/// Verify the token works; returns the authenticated login
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let mut builder = Octocrab::builder().personal_token(config.token.clone());
    if let Some(ref host) = config.host {
        builder = builder
            .base_uri(format!("https://{host}/api/v3"))
            .map_err(|e| Error::Auth(e.to_string()))?;
    }
    let client = builder.build().map_err(|e| Error::Auth(e.to_string()))?;

    let user = client
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("GitHub rejected the token: {e}")))?;
    Ok(user.login)
}
