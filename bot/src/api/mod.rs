use octocrab::models::IssueState;
use tracing::{info, instrument};

pub use shared::github::*;
pub use shared::*;

#[cfg(test)]
pub(crate) mod fake;

/// Page size used when listing labeled items.
pub const ITEMS_PER_PAGE: u8 = 100;

/// The slice of the issue tracker API the reaper talks to.
///
/// Every method is a single request, so callers can charge exactly one
/// operation per call against the run budget.
#[async_trait::async_trait]
pub trait IssueSource: Send + Sync {
    async fn list_labeled_items(
        &self,
        repo: &RepoSlug,
        label: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<ItemMetadata>>;

    async fn list_comments(
        &self,
        item: &RepoInfo,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<CommentMetadata>>;

    async fn reply(&self, item: &RepoInfo, text: &str) -> anyhow::Result<()>;

    async fn close(&self, item: &RepoInfo) -> anyhow::Result<()>;

    /// Returns `false` when the label wasn't on the item.
    async fn remove_label(&self, item: &RepoInfo, label: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct GithubClient {
    octocrab: octocrab::Octocrab,
}

impl GithubClient {
    pub fn new(github_token: String) -> anyhow::Result<Self> {
        let octocrab = octocrab::Octocrab::builder()
            .personal_token(github_token)
            .build()?;

        Ok(Self { octocrab })
    }
}

#[async_trait::async_trait]
impl IssueSource for GithubClient {
    #[instrument(skip(self))]
    async fn list_labeled_items(
        &self,
        repo: &RepoSlug,
        label: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<ItemMetadata>> {
        let labels = [label.to_string()];
        let items = self
            .octocrab
            .issues(&repo.owner, &repo.repo)
            .list()
            .state(octocrab::params::State::Open)
            .labels(&labels)
            .per_page(per_page)
            .page(page)
            .send()
            .await?
            .take_items()
            .into_iter()
            .map(|issue| ItemMetadata::from_issue(repo, issue))
            .collect();

        Ok(items)
    }

    #[instrument(skip(self, item), fields(item = item.full_id))]
    async fn list_comments(
        &self,
        item: &RepoInfo,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<CommentMetadata>> {
        let comments = self
            .octocrab
            .issues(&item.owner, &item.repo)
            .list_comments(item.number)
            .per_page(per_page)
            .page(page)
            .send()
            .await?
            .take_items()
            .into_iter()
            .map(|comment| CommentMetadata::from_comment(item.number, comment))
            .collect();

        Ok(comments)
    }

    #[instrument(skip(self, item, text), fields(item = item.full_id))]
    async fn reply(&self, item: &RepoInfo, text: &str) -> anyhow::Result<()> {
        self.octocrab
            .issues(&item.owner, &item.repo)
            .create_comment(item.number, text)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(item = item.full_id))]
    async fn close(&self, item: &RepoInfo) -> anyhow::Result<()> {
        self.octocrab
            .issues(&item.owner, &item.repo)
            .update(item.number)
            .state(IssueState::Closed)
            .send()
            .await?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(item = item.full_id))]
    async fn remove_label(&self, item: &RepoInfo, label: &str) -> anyhow::Result<bool> {
        let result = self
            .octocrab
            .issues(&item.owner, &item.repo)
            .remove_label(item.number, label)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                info!("Label {label} is not present on {}", item.full_id);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
