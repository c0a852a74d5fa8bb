//! GitLab token discovery

use super::{AuthSource, token_from_cli, token_from_env};
use crate::error::{Error, Result};
use serde::Deserialize;
use tracing::debug;

/// Resolved GitLab credentials
#[derive(Debug, Clone)]
pub struct GitLabAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// Host (defaults to gitlab.com)
    pub host: String,
}

/// Find a GitLab token: `GITLAB_TOKEN` / `GL_TOKEN`, then `glab auth token`
pub async fn get_gitlab_auth(host: Option<&str>) -> Result<GitLabAuthConfig> {
    let host_name = host.unwrap_or("gitlab.com").to_string();

    if let Some(token) = token_from_env(&["GITLAB_TOKEN", "GL_TOKEN"]) {
        debug!("using GitLab token from environment");
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host: host_name,
        });
    }

    if let Some(token) = token_from_cli("glab", host).await {
        debug!("using GitLab token from glab CLI");
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::Cli,
            host: host_name,
        });
    }

    Err(Error::Auth(
        "no GitLab token found. Set GITLAB_TOKEN or run 'glab auth login'.".to_string(),
    ))
}

/// Verify the token works; returns the authenticated username
pub async fn test_gitlab_auth(config: &GitLabAuthConfig) -> Result<String> {
    #[derive(Deserialize)]
    struct User {
        username: String,
    }

    let user: User = reqwest::Client::new()
        .get(format!("https://{}/api/v4/user", config.host))
        .header("PRIVATE-TOKEN", &config.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("GitLab rejected the token: {e}")))?
        .json()
        .await?;
    Ok(user.username)
}
