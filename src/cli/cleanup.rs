//! Cleanup command - delete branches of merged or closed PRs

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, warning};
use anstream::println;
use dialoguer::Confirm;
use pr_cleanup::cleanup::{
    Candidate, CleanupPlan, FilterPolicy, Selection, build_cleanup_plan, delete_candidates,
};
use pr_cleanup::error::{Error, Result};
use pr_cleanup::types::PrState;
use std::io::IsTerminal;
use std::path::Path;
use supports_hyperlinks::Stream;
use terminal_link::Link;
use tracing::debug;

/// Options for the cleanup command
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CleanupOptions {
    /// PR number, URL or branch
    pub selector: Option<String>,
    /// Clean up every tracked branch
    pub all: bool,
    /// Both `exclude_closed` and `exclude_behind`
    pub strict: bool,
    /// Ignore closed PRs
    pub exclude_closed: bool,
    /// Ignore branches behind their PR
    pub exclude_behind: bool,
    /// Skip the confirmation prompt
    pub yes: bool,
}

/// Run the cleanup command
pub async fn run_cleanup(
    path: &Path,
    remote: Option<&str>,
    options: CleanupOptions,
) -> Result<()> {
    // Validate before touching the repository
    let selection = Selection::from_args(options.selector.as_deref(), options.all)?;
    let policy =
        FilterPolicy::from_flags(options.strict, options.exclude_closed, options.exclude_behind);

    // =========================================================================
    // Phase 1: GATHER
    // =========================================================================

    let ctx = CommandContext::new(path, remote).await?;
    debug!(remote = %ctx.remote_name, ?policy, "starting cleanup");

    let progress = match &selection {
        Selection::All => CliProgress::branch_lookup(),
        Selection::Single(selector) => {
            CliProgress::spinner(format!("Loading pull request {selector}..."))
        }
    };

    // =========================================================================
    // Phase 2: PLAN
    // =========================================================================

    let lookup_options = ctx.config.lookup.to_options();
    let plan = build_cleanup_plan(
        &selection,
        &ctx.repo,
        ctx.platform.as_ref(),
        policy,
        &lookup_options,
        &progress,
    )
    .await;
    progress.finish();
    let plan = plan?;

    if plan.is_empty() {
        println!("{} No branches to be cleaned up!", check());
        return Ok(());
    }

    print_plan(&plan, policy);

    // =========================================================================
    // Phase 3: EXECUTE
    // =========================================================================

    if !confirm_deletion(&plan, policy, options.yes)? {
        println!("Not deleting any branches.");
        return Ok(());
    }

    let progress = CliProgress::spinner("Deleting branches...");
    let deleted = delete_candidates(&plan, &ctx.repo, &progress).await;
    progress.finish();
    let deleted = deleted?;
    println!("Deleted {} branches.", deleted.accent());

    Ok(())
}

fn confirm_deletion(plan: &CleanupPlan, policy: FilterPolicy, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Ok(false);
    }

    Confirm::new()
        .with_prompt(format!(
            "Delete all {} {} branches?",
            plan.len(),
            policy.describe()
        ))
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))
}

/// One table row with its visible (uncolored) widths
struct Row {
    branch: String,
    status: String,
    status_width: usize,
    pull_request: String,
}

fn status_cell(candidate: &Candidate) -> (String, usize) {
    let state = candidate.pr.state.to_string();
    let plain_width = state.chars().count() + 2;
    let styled = if candidate.behind {
        format!("{} {}", warning(), state.warn())
    } else if candidate.pr.state == PrState::Merged {
        format!("{} {}", check(), state.success())
    } else {
        format!("{} {}", check(), state.error())
    };
    (styled, plain_width)
}

fn pr_cell(candidate: &Candidate, hyperlinks: bool) -> String {
    let number = format!("#{}", candidate.pr.number);
    let number = if hyperlinks && !candidate.pr.html_url.is_empty() {
        Link::new(&number, &candidate.pr.html_url).to_string()
    } else {
        number
    };
    format!("{} {}", number.muted(), candidate.pr.title)
}

fn table_rows(plan: &CleanupPlan, hyperlinks: bool) -> Vec<Row> {
    plan.iter()
        .map(|candidate| {
            let (status, status_width) = status_cell(candidate);
            Row {
                branch: candidate.branch.name.clone(),
                status,
                status_width,
                pull_request: pr_cell(candidate, hyperlinks),
            }
        })
        .collect()
}

/// Print the candidate table
fn print_plan(plan: &CleanupPlan, policy: FilterPolicy) {
    let hyperlinks = supports_hyperlinks::on(Stream::Stdout);
    let rows = table_rows(plan, hyperlinks);

    let branch_width = rows
        .iter()
        .map(|r| r.branch.chars().count())
        .chain(std::iter::once("Branch".len()))
        .max()
        .unwrap_or_default();
    let status_width = rows
        .iter()
        .map(|r| r.status_width)
        .chain(std::iter::once("Status".len()))
        .max()
        .unwrap_or_default();

    println!();
    println!("The following branches can be cleaned up:");
    println!();
    println!(
        "{}  {}  {}",
        format!("{:branch_width$}", "Branch").emphasis(),
        format!("{:status_width$}", "Status").emphasis(),
        "Pull Request".emphasis()
    );
    for row in &rows {
        let padding = " ".repeat(status_width - row.status_width);
        println!(
            "{:branch_width$}  {}{}  {}",
            row.branch, row.status, padding, row.pull_request
        );
    }

    if !policy.up_to_date_only && plan.has_behind() {
        println!();
        println!(
            "{} indicates that a local branch is behind its remote.",
            warning()
        );
    }
    println!();
}
