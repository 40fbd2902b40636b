use std::sync::Arc;

use shared::RepoSlug;

use crate::api::IssueSource;

pub mod activity;
pub(crate) mod common;
pub mod payload;
pub mod sweep;

pub use activity::{ActivityReactor, ReactionOutcome};
pub use payload::{CommentEvent, EventError};
pub use sweep::{BatchProcessor, ItemOutcome, RunBudget, SkipReason, SweepReport, SweepSettings};

#[derive(Clone)]
pub struct Context {
    pub github: Arc<dyn IssueSource>,
    pub repo: RepoSlug,
    pub label: String,
    /// Log writes instead of issuing them.
    pub dry_run: bool,
}

impl Context {
    pub fn new(
        github: Arc<dyn IssueSource>,
        repo: RepoSlug,
        label: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            github,
            repo,
            label: label.into(),
            dry_run,
        }
    }
}
