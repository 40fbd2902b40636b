use anyhow::Context as _;
use tracing::info;

use shared::RepoInfo;

use super::Context;

impl Context {
    pub async fn reply(&self, item: &RepoInfo, text: &str) -> anyhow::Result<()> {
        if self.dry_run {
            info!("[dry-run] Would comment on #{}", item.number);
            return Ok(());
        }

        self.github
            .reply(item, text)
            .await
            .with_context(|| format!("Failed to comment on {}", item.full_id))
    }

    pub async fn close(&self, item: &RepoInfo) -> anyhow::Result<()> {
        if self.dry_run {
            info!("[dry-run] Would close #{}", item.number);
            return Ok(());
        }

        self.github
            .close(item)
            .await
            .with_context(|| format!("Failed to close {}", item.full_id))
    }

    /// Removes the configured label. A label that is already gone is not an error.
    pub async fn remove_label(&self, item: &RepoInfo) -> anyhow::Result<bool> {
        if self.dry_run {
            info!("[dry-run] Would remove {} label from #{}", self.label, item.number);
            return Ok(true);
        }

        self.github
            .remove_label(item, &self.label)
            .await
            .with_context(|| format!("Failed to remove {} label from {}", self.label, item.full_id))
    }
}
