//! Mock platform service for testing

use async_trait::async_trait;
use pr_cleanup::error::{Error, Result};
use pr_cleanup::platform::PlatformService;
use pr_cleanup::types::{PlatformConfig, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Instant;

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses per branch and per PR number
/// - Call tracking (with timestamps) for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    find_pr_responses: Mutex<HashMap<String, PullRequest>>,
    get_pr_responses: Mutex<HashMap<u64, PullRequest>>,
    // Call tracking
    find_pr_calls: Mutex<Vec<(String, Instant)>>,
    get_pr_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_find_pr: Mutex<HashMap<String, String>>,
    error_on_all_find_pr: Mutex<Option<String>>,
    rate_limited_calls: Mutex<u32>,
    rate_limited_get_pr_calls: Mutex<u32>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            find_pr_responses: Mutex::new(HashMap::new()),
            get_pr_responses: Mutex::new(HashMap::new()),
            find_pr_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            error_on_find_pr: Mutex::new(HashMap::new()),
            error_on_all_find_pr: Mutex::new(None),
            rate_limited_calls: Mutex::new(0),
            rate_limited_get_pr_calls: Mutex::new(0),
        }
    }

    // === Response setup ===

    /// Set the PR returned by `find_closed_pr` for a head branch
    pub fn set_find_pr_response(&self, branch: &str, pr: PullRequest) {
        self.find_pr_responses
            .lock()
            .unwrap()
            .insert(branch.to_string(), pr);
    }

    /// Set the PR returned by `get_pr`
    pub fn set_get_pr_response(&self, pr: PullRequest) {
        self.get_pr_responses.lock().unwrap().insert(pr.number, pr);
    }

    // === Error injection methods ===

    /// Make every `find_closed_pr` call fail
    pub fn fail_find_pr(&self, msg: &str) {
        *self.error_on_all_find_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `find_closed_pr` fail for one branch
    pub fn fail_find_pr_for(&self, branch: &str, msg: &str) {
        self.error_on_find_pr
            .lock()
            .unwrap()
            .insert(branch.to_string(), msg.to_string());
    }

    /// Make the next `count` `find_closed_pr` calls report rate limiting
    pub fn rate_limit_next(&self, count: u32) {
        *self.rate_limited_calls.lock().unwrap() = count;
    }

    /// Make the next `count` `get_pr` calls report rate limiting
    pub fn rate_limit_next_get_pr(&self, count: u32) {
        *self.rate_limited_get_pr_calls.lock().unwrap() = count;
    }

    // === Call verification methods ===

    /// Branches `find_closed_pr` was called with, in order
    pub fn get_find_pr_calls(&self) -> Vec<String> {
        self.find_pr_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(branch, _)| branch.clone())
            .collect()
    }

    /// When each `find_closed_pr` call happened
    pub fn get_find_pr_call_times(&self) -> Vec<Instant> {
        self.find_pr_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    /// PR numbers `get_pr` was called with
    pub fn get_get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn find_closed_pr(&self, head_branch: &str) -> Result<Option<PullRequest>> {
        self.find_pr_calls
            .lock()
            .unwrap()
            .push((head_branch.to_string(), Instant::now()));

        {
            let mut remaining = self.rate_limited_calls.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::RateLimited("API rate limit exceeded".to_string()));
            }
        }

        if let Some(msg) = self.error_on_all_find_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        if let Some(msg) = self.error_on_find_pr.lock().unwrap().get(head_branch) {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.find_pr_responses.lock().unwrap();
        Ok(responses.get(head_branch).cloned())
    }

    async fn get_pr(&self, number: u64) -> Result<Option<PullRequest>> {
        self.get_pr_calls.lock().unwrap().push(number);

        {
            let mut remaining = self.rate_limited_get_pr_calls.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::RateLimited("API rate limit exceeded".to_string()));
            }
        }

        let responses = self.get_pr_responses.lock().unwrap();
        Ok(responses.get(&number).cloned())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
