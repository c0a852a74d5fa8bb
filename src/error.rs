//! Error types for pr-cleanup

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or deleting branches
#[derive(Error, Debug)]
pub enum Error {
    /// Selector and `--all` were both given, or neither was
    #[error("Invalid arguments: {0}")]
    InvalidSelection(String),

    /// A selected pull request could not be found (or is still open)
    #[error("no merged or closed pull request found for {0}")]
    PullRequestNotFound(String),

    /// Local git command failed
    #[error("git error: {0}")]
    Git(String),

    /// Deleting a branch failed; earlier deletions were kept
    #[error("failed to delete branch '{branch}' after deleting {deleted} branch(es): {message}")]
    Deletion {
        /// Branch whose deletion failed
        branch: String,
        /// Number of branches deleted before the failure
        deleted: usize,
        /// Message from git
        message: String,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitLab API error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Generic platform error
    #[error("{0}")]
    Platform(String),

    /// The platform refused a request because of rate limiting
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed or no token was found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// No remote points at a supported platform
    #[error("no supported remotes found (GitHub or GitLab)")]
    NoSupportedRemotes,

    /// Requested remote does not exist
    #[error("remote '{0}' not found")]
    RemoteNotFound(String),

    /// Interrupted by the user
    #[error("cancelled")]
    Cancelled,

    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Octocrab error
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything that should not happen
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether retrying the same request later might succeed
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
