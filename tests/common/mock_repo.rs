//! Mock local repository for testing

use async_trait::async_trait;
use pr_cleanup::error::{Error, Result};
use pr_cleanup::git::LocalRepository;
use pr_cleanup::types::{GitRemote, LocalBranch};
use std::sync::Mutex;

/// In-memory repository with deletion tracking and failure injection
pub struct MockRepository {
    branches: Mutex<Vec<LocalBranch>>,
    remotes: Vec<GitRemote>,
    delete_calls: Mutex<Vec<String>>,
    list_calls: Mutex<usize>,
    fail_delete_of: Mutex<Option<String>>,
}

impl MockRepository {
    /// Repository holding `branches` and an `origin` remote on GitHub
    pub fn new(branches: Vec<LocalBranch>) -> Self {
        Self {
            branches: Mutex::new(branches),
            remotes: vec![GitRemote {
                name: "origin".to_string(),
                url: "git@github.com:test/repo.git".to_string(),
            }],
            delete_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
            fail_delete_of: Mutex::new(None),
        }
    }

    /// Make deleting `branch` fail
    pub fn fail_delete(&self, branch: &str) {
        *self.fail_delete_of.lock().unwrap() = Some(branch.to_string());
    }

    /// Branches deletion was attempted for, in order
    pub fn get_delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// How many times the branch list was read
    pub fn get_list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    /// Names of the branches still present
    pub fn branch_names(&self) -> Vec<String> {
        self.branches
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.name.clone())
            .collect()
    }
}

#[async_trait]
impl LocalRepository for MockRepository {
    async fn local_branches(&self) -> Result<Vec<LocalBranch>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self.branches.lock().unwrap().clone())
    }

    async fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(name.to_string());

        if self.fail_delete_of.lock().unwrap().as_deref() == Some(name) {
            return Err(Error::Git(format!("cannot delete branch '{name}'")));
        }

        self.branches.lock().unwrap().retain(|b| b.name != name);
        Ok(())
    }

    async fn remotes(&self) -> Result<Vec<GitRemote>> {
        Ok(self.remotes.clone())
    }
}
