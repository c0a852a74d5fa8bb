//! `git` command-line backed repository

use super::LocalRepository;
use crate::error::{Error, Result};
use crate::types::{GitRemote, LocalBranch, Upstream};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

const BRANCH_FORMAT: &str =
    "%(refname)%09%(objectname)%09%(upstream:remotename)%09%(upstream:remoteref)";

/// Repository driven through the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Open the repository containing `path`
    pub async fn open(path: &Path) -> Result<Self> {
        let probe = Self {
            root: path.to_path_buf(),
        };
        let toplevel = probe.run(&["rev-parse", "--show-toplevel"]).await?;
        Ok(Self {
            root: PathBuf::from(toplevel.trim()),
        })
    }

    /// Root of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, root = %self.root.display(), "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `git for-each-ref` output produced with the tab-separated branch format
///
/// Lines that are not local branch refs are ignored.
pub fn parse_branch_listing(output: &str) -> Vec<LocalBranch> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let refname = fields.next()?;
            let head = fields.next()?.trim();
            let remote = fields.next().unwrap_or_default().trim();
            let remote_ref = fields.next().unwrap_or_default().trim();

            let name = refname.strip_prefix("refs/heads/")?;
            if name.is_empty() || head.is_empty() {
                return None;
            }

            Some(LocalBranch {
                name: name.to_string(),
                head: head.to_string(),
                upstream: Upstream {
                    remote: remote.to_string(),
                    branch: remote_ref
                        .strip_prefix("refs/heads/")
                        .unwrap_or(remote_ref)
                        .to_string(),
                },
            })
        })
        .collect()
}

#[async_trait]
impl LocalRepository for GitCli {
    async fn local_branches(&self) -> Result<Vec<LocalBranch>> {
        let format = format!("--format={BRANCH_FORMAT}");
        let output = self
            .run(&["for-each-ref", &format, "refs/heads"])
            .await?;
        let branches = parse_branch_listing(&output);
        debug!(count = branches.len(), "listed local branches");
        Ok(branches)
    }

    async fn delete_local_branch(&self, name: &str) -> Result<()> {
        debug!(branch = name, "deleting local branch");
        self.run(&["branch", "-D", name]).await?;
        Ok(())
    }

    async fn remotes(&self) -> Result<Vec<GitRemote>> {
        let output = self.run(&["remote", "-v"]).await?;
        let mut remotes: Vec<GitRemote> = Vec::new();
        for line in output.lines() {
            let mut parts = line.split_whitespace();
            let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
                continue;
            };
            if remotes.iter().any(|r| r.name == name) {
                continue;
            }
            remotes.push(GitRemote {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
        Ok(remotes)
    }
}
