//! Branch inventory and commit index

use crate::types::LocalBranch;
use std::collections::HashMap;

/// Keep only branches that track an upstream remote
///
/// Branches without an upstream have nothing to correlate with a PR.
pub fn tracked_branches(branches: Vec<LocalBranch>) -> Vec<LocalBranch> {
    branches
        .into_iter()
        .filter(|b| b.upstream.is_tracked())
        .collect()
}

/// Branches grouped by the commit they point to
#[derive(Debug, Default)]
pub struct CommitIndex<'a> {
    by_commit: HashMap<&'a str, Vec<&'a LocalBranch>>,
}

impl<'a> CommitIndex<'a> {
    /// Build the index from an inventory
    pub fn build(branches: &'a [LocalBranch]) -> Self {
        let mut by_commit: HashMap<&'a str, Vec<&'a LocalBranch>> = HashMap::new();
        for branch in branches {
            by_commit.entry(branch.head.as_str()).or_default().push(branch);
        }
        Self { by_commit }
    }

    /// Branches whose head is `commit`
    pub fn branches_at(&self, commit: &str) -> &[&'a LocalBranch] {
        self.by_commit
            .get(commit)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct head commits
    pub fn len(&self) -> usize {
        self.by_commit.len()
    }

    /// Whether the index holds no branches
    pub fn is_empty(&self) -> bool {
        self.by_commit.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Upstream;

    fn branch(name: &str, head: &str, remote: &str) -> LocalBranch {
        LocalBranch {
            name: name.to_string(),
            head: head.to_string(),
            upstream: Upstream {
                remote: remote.to_string(),
                branch: name.to_string(),
            },
        }
    }

    #[test]
    fn test_untracked_branches_dropped() {
        let branches = vec![
            branch("feat-a", "c1", "origin"),
            branch("scratch", "c2", ""),
        ];
        let tracked = tracked_branches(branches);
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].name, "feat-a");
    }

    #[test]
    fn test_index_groups_shared_heads() {
        let branches = vec![
            branch("a", "c1", "origin"),
            branch("b", "c1", "origin"),
            branch("c", "c2", "origin"),
        ];
        let index = CommitIndex::build(&branches);

        assert_eq!(index.len(), 2);
        assert_eq!(index.branches_at("c1").len(), 2);
        assert_eq!(index.branches_at("c2")[0].name, "c");
        assert!(index.branches_at("missing").is_empty());
    }
}
