//! Filter policy derived from command-line flags

use crate::types::PrState;

/// Which matches qualify for deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    /// Ignore closed (unmerged) PRs
    pub merged_only: bool,
    /// Require the branch head to equal the PR head
    pub up_to_date_only: bool,
}

impl FilterPolicy {
    /// Build the policy from flags; `strict` implies both restrictions
    pub const fn from_flags(strict: bool, exclude_closed: bool, exclude_behind: bool) -> Self {
        Self {
            merged_only: strict || exclude_closed,
            up_to_date_only: strict || exclude_behind,
        }
    }

    /// Whether PRs in `state` can produce candidates
    pub const fn accepts_state(self, state: PrState) -> bool {
        match state {
            PrState::Merged => true,
            PrState::Closed => !self.merged_only,
            PrState::Open => false,
        }
    }

    /// Human-readable description of the accepted PR states
    pub const fn describe(self) -> &'static str {
        if self.merged_only {
            "merged"
        } else {
            "merged or closed"
        }
    }
}
