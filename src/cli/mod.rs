//! Command-line front end

pub mod auth;
pub mod cleanup;
pub mod context;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use pr_cleanup::cleanup::{ProgressCallback, estimate_duration};
use pr_cleanup::types::LocalBranch;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use style::{Stylize, check, spinner_style};

/// Spinner-backed progress reporting
pub struct CliProgress {
    bar: ProgressBar,
    label: Mutex<String>,
    // Relabel with the tracked branch count once the inventory is known
    count_branches: bool,
}

/// Label shown while looking up PRs for every tracked branch
pub fn lookup_label(tracked: usize) -> String {
    let hint = estimate_duration(tracked).hint();
    format!("Loading PRs for {tracked} local branches with upstreams. {hint}")
        .trim_end()
        .to_string()
}

impl CliProgress {
    /// Start a spinner with a fixed label
    pub fn spinner(label: impl Into<String>) -> Self {
        Self::start(label.into(), false)
    }

    /// Start a spinner for a lookup over all tracked branches
    pub fn branch_lookup() -> Self {
        Self::start("Listing local branches...".to_string(), true)
    }

    fn start(label: String, count_branches: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.set_message(label.clone());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self {
            bar,
            label: Mutex::new(label),
            count_branches,
        }
    }

    fn label(&self) -> String {
        self.label
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_inventory(&self, tracked: usize) {
        if !self.count_branches {
            return;
        }
        let label = lookup_label(tracked);
        self.bar.set_message(label.clone());
        *self.label.lock().unwrap_or_else(PoisonError::into_inner) = label;
    }

    async fn on_lookup(&self, branch: &LocalBranch, index: usize, total: usize) {
        self.bar.set_message(format!(
            "{} {} {}",
            self.label(),
            branch.name.accent(),
            format!("({}/{total})", index + 1).muted()
        ));
    }

    async fn on_deleted(&self, branch: &str) {
        self.bar
            .println(format!("{} Deleted {}", check(), branch.accent()));
    }
}
