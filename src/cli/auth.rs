//! Auth command - check platform credentials

use crate::cli::style::{Stylize, check};
use anstream::println;
use pr_cleanup::auth::{
    AuthSource, get_github_auth, get_gitlab_auth, test_github_auth, test_gitlab_auth,
};
use pr_cleanup::error::Result;

const fn describe_source(source: AuthSource) -> &'static str {
    match source {
        AuthSource::Cli => "CLI",
        AuthSource::EnvVar => "environment",
    }
}

/// Verify GitHub authentication
pub async fn run_github_auth(host: Option<&str>) -> Result<()> {
    let auth = get_github_auth(host).await?;
    let login = test_github_auth(&auth).await?;
    println!(
        "{} Authenticated to GitHub as {} {}",
        check(),
        login.accent(),
        format!("(token from {})", describe_source(auth.source)).muted()
    );
    Ok(())
}

/// Verify GitLab authentication
pub async fn run_gitlab_auth(host: Option<&str>) -> Result<()> {
    let auth = get_gitlab_auth(host).await?;
    let username = test_gitlab_auth(&auth).await?;
    println!(
        "{} Authenticated to {} as {} {}",
        check(),
        auth.host.emphasis(),
        username.accent(),
        format!("(token from {})", describe_source(auth.source)).muted()
    );
    Ok(())
}
