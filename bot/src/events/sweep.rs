use std::fmt;

use tracing::{error, info, instrument, warn};

use shared::{github::CommentMetadata, ItemMetadata};

use crate::{
    api::ITEMS_PER_PAGE,
    config::Config,
    messages::CloseMessage,
    staleness::{self, Staleness, COMMENTS_PER_PAGE},
};

use super::Context;

/// Operations consumed by a sweep, checked against the per-run ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBudget {
    used: u32,
    ceiling: u32,
}

impl RunBudget {
    pub fn new(ceiling: u32) -> Self {
        Self { used: 0, ceiling }
    }

    pub fn charge(&mut self, operations: u32) {
        self.used = self.used.saturating_add(operations);
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.ceiling
    }
}

#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub operations_per_run: u32,
    pub days_before_close: u32,
    pub close_message: Option<CloseMessage>,
}

impl From<&Config> for SweepSettings {
    fn from(config: &Config) -> Self {
        Self {
            operations_per_run: config.operations_per_run,
            days_before_close: config.days_before_close,
            close_message: config.close_message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Closed,
    Locked,
    MissingLabel(String),
    RecentlyActive { days_inactive: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Closed => write!(f, "it is closed"),
            SkipReason::Locked => write!(f, "it is locked"),
            SkipReason::MissingLabel(label) => write!(f, "it does not have the {label} label"),
            SkipReason::RecentlyActive { days_inactive } => write!(
                f,
                "it has been updated in the last {days_inactive:.2} days"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Skipped(SkipReason),
    Closed { days_inactive: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub pages: u32,
    pub items_seen: u32,
    pub closed: u32,
    pub skipped: u32,
    pub operations: u32,
    pub budget_exhausted: bool,
}

/// Walks the open, labeled items page by page and closes the inactive ones.
///
/// Pages are processed strictly one after another. The budget is only checked
/// between pages, so a page that was started is always finished.
pub struct BatchProcessor {
    context: Context,
    settings: SweepSettings,
}

impl BatchProcessor {
    pub fn new(context: Context, settings: SweepSettings) -> Self {
        Self { context, settings }
    }

    #[instrument(skip(self), fields(repo = %self.context.repo, label = self.context.label))]
    pub async fn run(&self) -> anyhow::Result<SweepReport> {
        let mut budget = RunBudget::new(self.settings.operations_per_run);
        let mut report = SweepReport::default();
        let mut page = 1;

        loop {
            let items = self.fetch_items(page, &mut budget).await;
            report.pages += 1;

            if items.is_empty() {
                info!("No more items found to process. Exiting.");
                break;
            }

            for item in &items {
                report.items_seen += 1;
                match self.process_item(item, &mut budget).await? {
                    ItemOutcome::Closed { .. } => report.closed += 1,
                    ItemOutcome::Skipped(_) => report.skipped += 1,
                }
            }

            if budget.is_exhausted() {
                warn!(
                    "Reached max number of operations to process ({} of {}). Exiting.",
                    budget.used(),
                    self.settings.operations_per_run
                );
                report.budget_exhausted = true;
                break;
            }

            page += 1;
        }

        report.operations = budget.used();
        Ok(report)
    }

    /// A failed listing reads as an empty page, which ends the sweep.
    async fn fetch_items(&self, page: u32, budget: &mut RunBudget) -> Vec<ItemMetadata> {
        budget.charge(1);
        match self
            .context
            .github
            .list_labeled_items(&self.context.repo, &self.context.label, page, ITEMS_PER_PAGE)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to get items for page {page}: {e:#}");
                Vec::new()
            }
        }
    }

    fn skip_reason(&self, item: &ItemMetadata) -> Option<SkipReason> {
        if item.is_closed() {
            return Some(SkipReason::Closed);
        }
        if item.locked {
            return Some(SkipReason::Locked);
        }
        // The listing filters by label, but the label may have been removed since
        if !item.has_label(&self.context.label) {
            return Some(SkipReason::MissingLabel(self.context.label.clone()));
        }
        None
    }

    async fn last_comments(&self, item: &ItemMetadata, budget: &mut RunBudget) -> Vec<CommentMetadata> {
        let Some(page) = staleness::last_comment_page(item.comments) else {
            return Vec::new();
        };

        budget.charge(1);
        match self
            .context
            .github
            .list_comments(&item.repo_info, page, COMMENTS_PER_PAGE)
            .await
        {
            Ok(comments) => comments,
            Err(e) => {
                error!("Failed to get comments for {item}: {e:#}");
                Vec::new()
            }
        }
    }

    async fn evaluate(&self, item: &ItemMetadata, budget: &mut RunBudget) -> Staleness {
        let comments = self.last_comments(item, budget).await;
        let active_at = staleness::effective_activity_time(item.updated_at, &comments);
        Staleness::evaluate(active_at, chrono::Utc::now(), self.settings.days_before_close)
    }

    #[instrument(skip_all, fields(item = item.repo_info.full_id))]
    async fn process_item(
        &self,
        item: &ItemMetadata,
        budget: &mut RunBudget,
    ) -> anyhow::Result<ItemOutcome> {
        info!("Found {item}");

        if let Some(reason) = self.skip_reason(item) {
            info!("Skipping {item} because {reason}");
            return Ok(ItemOutcome::Skipped(reason));
        }

        let staleness = self.evaluate(item, budget).await;
        if !staleness.stale {
            let reason = SkipReason::RecentlyActive {
                days_inactive: staleness.days_inactive,
            };
            info!("Skipping {item} because {reason}");
            return Ok(ItemOutcome::Skipped(reason));
        }

        if let Some(message) = &self.settings.close_message {
            let text = message.render(item, &self.context.label, staleness.days_inactive);
            self.context.reply(&item.repo_info, &text).await?;
            budget.charge(1);
            info!("Added comment to {item}");
        }

        self.context.close(&item.repo_info).await?;
        self.context.remove_label(&item.repo_info).await?;
        budget.charge(2);

        info!(
            "Closed {item} and removed {} label because it has not been updated in the last {:.2} days",
            self.context.label, staleness.days_inactive
        );

        Ok(ItemOutcome::Closed {
            days_inactive: staleness.days_inactive,
        })
    }
}
