//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Platform, PlatformConfig, PrState, PullRequest};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    api_base: String,
    config: PlatformConfig,
    project_path: String,
}

#[derive(Deserialize)]
struct MergeRequest {
    iid: u64,
    title: String,
    state: String, // "opened", "closed", "merged", "locked"
    web_url: String,
    sha: Option<String>,
}

#[derive(Deserialize)]
struct MrCommit {
    id: String,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Commits requested per page
const COMMITS_PER_PAGE: &str = "100";

fn parse_state(state: &str) -> PrState {
    match state {
        "merged" => PrState::Merged,
        "closed" => PrState::Closed,
        _ => PrState::Open,
    }
}

/// Turn non-success responses into errors, keeping 429 distinct
fn check_status(response: Response) -> Result<Response> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited(format!(
            "GitLab returned {} for {}",
            response.status(),
            response.url()
        )));
    }
    response
        .error_for_status()
        .map_err(|e| Error::GitLabApi(e.to_string()))
}

impl GitLabService {
    /// Create a new GitLab service
    pub fn new(token: String, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let host = host.unwrap_or_else(|| "gitlab.com".to_string());
        let api_base = format!("https://{host}/api/v4");
        let config_host = if host == "gitlab.com" {
            None
        } else {
            Some(host)
        };
        Self::build(token, owner, repo, config_host, api_base)
    }

    /// Create a service that talks to an arbitrary API base (used for tests)
    pub fn with_api_base(token: String, owner: String, repo: String, api_base: &str) -> Result<Self> {
        Self::build(
            token,
            owner,
            repo,
            None,
            api_base.trim_end_matches('/').to_string(),
        )
    }

    fn build(
        token: String,
        owner: String,
        repo: String,
        host: Option<String>,
        api_base: String,
    ) -> Result<Self> {
        let project_path = format!("{owner}/{repo}");

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            api_base,
            config: PlatformConfig {
                platform: Platform::GitLab,
                owner,
                repo,
                host,
            },
            project_path,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }

    /// Fetch all commits of an MR, oldest first
    ///
    /// GitLab lists MR commits newest first and paginates via `x-next-page`.
    async fn list_mr_commits(&self, iid: u64) -> Result<Vec<String>> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}/commits",
            self.encoded_project(),
            iid
        ));

        let mut commits = Vec::new();
        let mut page = "1".to_string();
        loop {
            let response = self
                .client
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[("per_page", COMMITS_PER_PAGE), ("page", page.as_str())])
                .send()
                .await?;
            let response = check_status(response)?;

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string);

            let batch: Vec<MrCommit> = response.json().await?;
            commits.extend(batch.into_iter().map(|c| c.id));

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        commits.reverse();
        debug!(mr_iid = iid, count = commits.len(), "listed MR commits");
        Ok(commits)
    }

    async fn complete_mr(&self, mr: MergeRequest) -> Result<PullRequest> {
        let commits = self.list_mr_commits(mr.iid).await?;
        let head_oid = mr
            .sha
            .or_else(|| commits.last().cloned())
            .unwrap_or_default();

        Ok(PullRequest {
            number: mr.iid,
            title: mr.title,
            state: parse_state(&mr.state),
            head_oid,
            commits,
            html_url: mr.web_url,
        })
    }
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn find_closed_pr(&self, head_branch: &str) -> Result<Option<PullRequest>> {
        debug!(head_branch, "finding merged or closed MR");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[
                ("source_branch", head_branch),
                ("order_by", "created_at"),
                ("sort", "desc"),
            ])
            .send()
            .await?;
        let mrs: Vec<MergeRequest> = check_status(response)?.json().await?;

        let Some(mr) = mrs
            .into_iter()
            .find(|mr| parse_state(&mr.state).is_finished())
        else {
            debug!(head_branch, "no merged or closed MR found");
            return Ok(None);
        };

        let pr = self.complete_mr(mr).await?;
        debug!(mr_iid = pr.number, state = %pr.state, "found MR");
        Ok(Some(pr))
    }

    async fn get_pr(&self, number: u64) -> Result<Option<PullRequest>> {
        debug!(mr_iid = number, "getting MR");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}",
            self.encoded_project(),
            number
        ));

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(mr_iid = number, "MR not found");
            return Ok(None);
        }

        let mr: MergeRequest = check_status(response)?.json().await?;
        Ok(Some(self.complete_mr(mr).await?))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
