//! Throwaway git repositories for tests that drive the real `git` binary

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A git repository in a temporary directory with one commit on `main`
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Initialise the repository with an `origin` remote on GitHub
    pub fn new() -> Self {
        let repo = Self {
            dir: TempDir::new().expect("create temp dir"),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit("initial");
        repo.git(&["remote", "add", "origin", "git@github.com:test/repo.git"]);
        repo
    }

    /// Path of the working tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git and return trimmed stdout, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.dir.path())
            .args(args)
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Create an empty commit on the current branch, returning its id
    pub fn commit(&self, message: &str) -> String {
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
        self.head()
    }

    /// Current HEAD commit id
    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    /// Create `name` at HEAD without switching to it
    pub fn branch(&self, name: &str) {
        self.git(&["branch", name]);
    }

    /// Make `name` track `<remote>/<remote_branch>`
    pub fn set_upstream(&self, name: &str, remote: &str, remote_branch: &str) {
        self.git(&["config", &format!("branch.{name}.remote"), remote]);
        self.git(&[
            "config",
            &format!("branch.{name}.merge"),
            &format!("refs/heads/{remote_branch}"),
        ]);
    }

    /// Local branch names
    pub fn branches(&self) -> Vec<String> {
        self.git(&["for-each-ref", "--format=%(refname:short)", "refs/heads"])
            .lines()
            .map(ToString::to_string)
            .collect()
    }
}
