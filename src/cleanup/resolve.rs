//! Candidate resolution - pure matching of branches to finished PRs
//!
//! No I/O happens here. A branch is a candidate for a PR when its head
//! commit is one of the PR's commits: the branch then has nothing the PR
//! does not already contain. With `up_to_date_only` the head must be the
//! PR's head commit exactly.

use crate::cleanup::inventory::CommitIndex;
use crate::cleanup::policy::FilterPolicy;
use crate::types::{BranchKey, LocalBranch, PrState, PullRequest};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// A branch that can be deleted, with the PR that justifies it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The local branch
    pub branch: LocalBranch,
    /// The merged or closed PR it belongs to
    pub pr: PullRequest,
    /// Branch head differs from the PR head (it is behind the PR)
    pub behind: bool,
}

impl Candidate {
    fn new(branch: &LocalBranch, pr: &PullRequest) -> Self {
        Self {
            branch: branch.clone(),
            pr: pr.clone(),
            behind: branch.head != pr.head_oid,
        }
    }

    /// Rank used when one branch matches several PRs
    ///
    /// Up-to-date beats behind, merged beats closed, newer (higher
    /// number) beats older.
    fn rank(&self) -> (bool, bool, u64) {
        (!self.behind, self.pr.state == PrState::Merged, self.pr.number)
    }

    fn outranks(&self, other: &Self) -> bool {
        self.rank().cmp(&other.rank()) == Ordering::Greater
    }
}

/// Deletion candidates keyed by branch identity, in branch-name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    candidates: BTreeMap<BranchKey, Candidate>,
}

impl CleanupPlan {
    /// Whether there is nothing to clean up
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of candidate branches
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates in branch-name order
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    /// Candidate for a branch name, if any
    pub fn get(&self, branch_name: &str) -> Option<&Candidate> {
        self.candidates.values().find(|c| c.branch.name == branch_name)
    }

    /// Candidate branch names in order
    pub fn branch_names(&self) -> Vec<&str> {
        self.candidates.keys().map(|k| k.name.as_str()).collect()
    }

    /// Whether any candidate is behind its PR
    pub fn has_behind(&self) -> bool {
        self.candidates.values().any(|c| c.behind)
    }

    fn record(&mut self, branch: &LocalBranch, pr: &PullRequest) {
        let candidate = Candidate::new(branch, pr);
        match self.candidates.entry(branch.key()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if candidate.outranks(slot.get()) {
                    slot.insert(candidate);
                }
            }
        }
    }
}

/// Create the cleanup plan (PURE - no I/O, easily testable)
///
/// # Arguments
/// * `index` - Tracked branches grouped by head commit
/// * `prs` - PRs fetched for those branches
/// * `policy` - Which states and ancestry relations qualify
#[must_use]
pub fn resolve_candidates(
    index: &CommitIndex<'_>,
    prs: &[PullRequest],
    policy: FilterPolicy,
) -> CleanupPlan {
    let mut plan = CleanupPlan::default();

    for pr in prs.iter().filter(|pr| policy.accepts_state(pr.state)) {
        if policy.up_to_date_only {
            for branch in index.branches_at(&pr.head_oid) {
                plan.record(branch, pr);
            }
        } else {
            for commit in &pr.commits {
                for branch in index.branches_at(commit) {
                    plan.record(branch, pr);
                }
            }
        }
    }

    plan
}
