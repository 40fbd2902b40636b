use tracing::{info, instrument};

use super::{CommentEvent, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// The commenter is privileged, the label stays.
    Ignored,
    LabelRemoved,
    /// The item didn't carry the label.
    LabelAbsent,
}

/// Treats a new comment from anyone but an owner or collaborator as a sign
/// of life and strips the stale label from the item.
pub struct ActivityReactor {
    context: Context,
}

impl ActivityReactor {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    #[instrument(skip_all, fields(number = event.number, commenter = event.commenter.login))]
    pub async fn react(&self, event: &CommentEvent) -> anyhow::Result<ReactionOutcome> {
        if event.commenter.is_privileged() {
            info!(
                "Not removing label, comment is from {}",
                format!("{:?}", event.commenter.contributor_type).to_lowercase()
            );
            return Ok(ReactionOutcome::Ignored);
        }

        let item = self.context.repo.item(event.number);
        if !self.context.remove_label(&item).await? {
            info!(
                "The {} label was not on #{}, nothing to remove",
                self.context.label, event.number
            );
            return Ok(ReactionOutcome::LabelAbsent);
        }

        info!(
            "Removed the {} label on #{} due to comment activity",
            self.context.label, event.number
        );
        Ok(ReactionOutcome::LabelRemoved)
    }
}
