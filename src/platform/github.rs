//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Platform, PlatformConfig, PrState, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Commits requested per GraphQL page (GitHub's maximum)
const COMMITS_PAGE_SIZE: u32 = 100;

const PR_FIELDS: &str = r"
    number
    title
    url
    state
    headRefOid
    commits(first: $pageSize) {
        pageInfo { hasNextPage endCursor }
        nodes { commit { oid } }
    }
";

// GraphQL response types

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: String,
    #[serde(default)]
    path: Option<Vec<serde_json::Value>>,
}

impl GraphQlError {
    /// `NOT_FOUND` on a `pullRequest` field: the PR number does not exist
    ///
    /// A `NOT_FOUND` on `repository` means the repository itself is
    /// missing or invisible to the token, which is a real failure.
    fn is_missing_pull_request(&self) -> bool {
        self.kind.as_deref() == Some("NOT_FOUND")
            && self
                .path
                .as_ref()
                .and_then(|path| path.last())
                .and_then(serde_json::Value::as_str)
                == Some("pullRequest")
    }
}

#[derive(Deserialize)]
struct RepositoryData<T> {
    repository: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestsByHead {
    pull_requests: Connection<GraphQlPullRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestByNumber {
    pull_request: Option<GraphQlPullRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestCommitsPage {
    pull_request: Option<CommitsOnly>,
}

#[derive(Deserialize)]
struct CommitsOnly {
    commits: CommitConnection,
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitConnection {
    page_info: PageInfo,
    nodes: Vec<CommitNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct CommitNode {
    commit: CommitOid,
}

#[derive(Deserialize)]
struct CommitOid {
    oid: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    title: String,
    url: String,
    state: String,
    head_ref_oid: String,
    commits: CommitConnection,
}

fn parse_state(state: &str) -> PrState {
    match state {
        "MERGED" => PrState::Merged,
        "CLOSED" => PrState::Closed,
        _ => PrState::Open,
    }
}

/// GitHub service using octocrab's GraphQL client
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// For GitHub Enterprise hosts the GraphQL endpoint lives under `/api`.
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let base_uri = host.as_ref().map(|h| format!("https://{h}/api"));
        Self::build(token, owner, repo, host, base_uri.as_deref())
    }

    /// Create a service that talks to an arbitrary API base (used for tests)
    pub fn with_base_uri(token: &str, owner: String, repo: String, base_uri: &str) -> Result<Self> {
        Self::build(token, owner, repo, None, Some(base_uri))
    }

    fn build(
        token: &str,
        owner: String,
        repo: String,
        host: Option<String>,
        base_uri: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(base_uri) = base_uri {
            builder = builder
                .base_uri(base_uri)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
        })
    }

    /// Run a GraphQL query and unwrap the `repository` object
    ///
    /// A missing `pullRequest` maps to `Ok(None)`, `RATE_LIMITED` errors to
    /// [`Error::RateLimited`]. Every other error, including a missing
    /// repository, is [`Error::GitHubApi`].
    async fn query_repository<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<T>> {
        let response: GraphQlResponse<RepositoryData<T>> = self
            .client
            .graphql(&serde_json::json!({ "query": query, "variables": variables }))
            .await
            .map_err(map_octocrab_error)?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            if errors
                .iter()
                .any(|e| e.kind.as_deref() == Some("RATE_LIMITED"))
            {
                let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
                return Err(Error::RateLimited(messages.join(", ")));
            }
            if errors.iter().all(GraphQlError::is_missing_pull_request) {
                debug!("GraphQL query returned NOT_FOUND for pullRequest");
                return Ok(None);
            }
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let data = response
            .data
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))?;
        Ok(data.repository)
    }

    /// Convert a GraphQL PR, following commit pagination to the end
    async fn complete_pr(&self, pr: GraphQlPullRequest) -> Result<PullRequest> {
        let mut commits: Vec<String> = pr.commits.nodes.into_iter().map(|n| n.commit.oid).collect();
        let mut page_info = pr.commits.page_info;

        while page_info.has_next_page {
            let Some(cursor) = page_info.end_cursor.take() else {
                break;
            };
            debug!(pr_number = pr.number, %cursor, "fetching next commit page");
            let page: Option<PullRequestCommitsPage> = self
                .query_repository(
                    r"
                    query PullRequestCommits($owner: String!, $repo: String!, $number: Int!, $pageSize: Int!, $cursor: String!) {
                        repository(owner: $owner, name: $repo) {
                            pullRequest(number: $number) {
                                commits(first: $pageSize, after: $cursor) {
                                    pageInfo { hasNextPage endCursor }
                                    nodes { commit { oid } }
                                }
                            }
                        }
                    }
                    ",
                    serde_json::json!({
                        "owner": self.config.owner,
                        "repo": self.config.repo,
                        "number": pr.number,
                        "pageSize": COMMITS_PAGE_SIZE,
                        "cursor": cursor,
                    }),
                )
                .await?;

            let Some(connection) = page.and_then(|p| p.pull_request).map(|p| p.commits) else {
                break;
            };
            commits.extend(connection.nodes.into_iter().map(|n| n.commit.oid));
            page_info = connection.page_info;
        }

        Ok(PullRequest {
            number: pr.number,
            title: pr.title,
            state: parse_state(&pr.state),
            head_oid: pr.head_ref_oid,
            commits,
            html_url: pr.url,
        })
    }
}

/// Classify octocrab failures, surfacing rate limiting separately
fn map_octocrab_error(e: octocrab::Error) -> Error {
    if let octocrab::Error::GitHub { source, .. } = &e {
        let status = source.status_code.as_u16();
        let message = source.message.to_lowercase();
        if status == 429 || (status == 403 && message.contains("rate limit")) {
            return Error::RateLimited(source.message.clone());
        }
    }
    Error::GitHubApi(e.to_string())
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn find_closed_pr(&self, head_branch: &str) -> Result<Option<PullRequest>> {
        debug!(head_branch, "finding merged or closed PR");
        let query = format!(
            r"
            query ClosedPullRequestForBranch($owner: String!, $repo: String!, $head: String!, $pageSize: Int!) {{
                repository(owner: $owner, name: $repo) {{
                    pullRequests(headRefName: $head, states: [MERGED, CLOSED], first: 1, orderBy: {{field: CREATED_AT, direction: DESC}}) {{
                        nodes {{ {PR_FIELDS} }}
                    }}
                }}
            }}
            "
        );

        let repository: Option<PullRequestsByHead> = self
            .query_repository(
                &query,
                serde_json::json!({
                    "owner": self.config.owner,
                    "repo": self.config.repo,
                    "head": head_branch,
                    "pageSize": COMMITS_PAGE_SIZE,
                }),
            )
            .await?;

        let Some(pr) = repository.and_then(|r| r.pull_requests.nodes.into_iter().next()) else {
            debug!(head_branch, "no merged or closed PR found");
            return Ok(None);
        };

        let pr = self.complete_pr(pr).await?;
        debug!(pr_number = pr.number, state = %pr.state, commits = pr.commits.len(), "found PR");
        Ok(Some(pr))
    }

    async fn get_pr(&self, number: u64) -> Result<Option<PullRequest>> {
        debug!(pr_number = number, "getting PR");
        let query = format!(
            r"
            query PullRequestByNumber($owner: String!, $repo: String!, $number: Int!, $pageSize: Int!) {{
                repository(owner: $owner, name: $repo) {{
                    pullRequest(number: $number) {{ {PR_FIELDS} }}
                }}
            }}
            "
        );

        let repository: Option<PullRequestByNumber> = self
            .query_repository(
                &query,
                serde_json::json!({
                    "owner": self.config.owner,
                    "repo": self.config.repo,
                    "number": number,
                    "pageSize": COMMITS_PAGE_SIZE,
                }),
            )
            .await?;

        match repository.and_then(|r| r.pull_request) {
            Some(pr) => Ok(Some(self.complete_pr(pr).await?)),
            None => Ok(None),
        }
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
