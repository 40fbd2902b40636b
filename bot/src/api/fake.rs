use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::Duration;
use octocrab::models::AuthorAssociation;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListItems { page: u32 },
    ListComments { number: u64, page: u32 },
    Reply { number: u64, text: String },
    Close { number: u64 },
    RemoveLabel { number: u64, label: String },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::Reply { .. } | Call::Close { .. } | Call::RemoveLabel { .. }
        )
    }

    pub fn number(&self) -> Option<u64> {
        match self {
            Call::ListItems { .. } => None,
            Call::ListComments { number, .. }
            | Call::Reply { number, .. }
            | Call::Close { number }
            | Call::RemoveLabel { number, .. } => Some(*number),
        }
    }
}

#[derive(Default)]
struct State {
    items: BTreeMap<u64, ItemMetadata>,
    comments: BTreeMap<u64, Vec<CommentMetadata>>,
    calls: Vec<Call>,
}

/// In-memory tracker that applies writes to its own items, so a second sweep
/// sees the effects of the first one.
#[derive(Default)]
pub struct FakeTracker {
    state: Mutex<State>,
    fail_listing: bool,
    fail_comments: bool,
    fail_writes: bool,
}

pub fn repo() -> RepoSlug {
    RepoSlug::new("owner", "repo")
}

pub fn item(number: u64, days_since_update: i64) -> ItemMetadata {
    ItemMetadata {
        repo_info: repo().item(number),
        kind: ItemKind::Issue,
        state: ItemState::Open,
        locked: false,
        labels: BTreeSet::from(["stale".to_string()]),
        updated_at: chrono::Utc::now() - Duration::days(days_since_update),
        comments: 0,
    }
}

pub fn comment(number: u64, days_ago: i64) -> CommentMetadata {
    CommentMetadata {
        item: number,
        author: User::new("someone".to_string(), AuthorAssociation::None),
        created_at: chrono::Utc::now() - Duration::days(days_ago),
    }
}

impl FakeTracker {
    pub fn new(items: impl IntoIterator<Item = ItemMetadata>) -> Self {
        let tracker = Self::default();
        {
            let mut state = tracker.state.lock().unwrap();
            for item in items {
                state.items.insert(item.number(), item);
            }
        }
        tracker
    }

    pub fn with_comments(self, number: u64, comments: Vec<CommentMetadata>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(item) = state.items.get_mut(&number) {
                item.comments = comments.len() as u32;
            }
            state.comments.insert(number, comments);
        }
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_comments(mut self) -> Self {
        self.fail_comments = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes_for(&self, number: u64) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.is_write() && call.number() == Some(number))
            .collect()
    }

    pub fn listed_pages(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ListItems { page } => Some(page),
                _ => None,
            })
            .collect()
    }

    pub fn item(&self, number: u64) -> Option<ItemMetadata> {
        self.state.lock().unwrap().items.get(&number).cloned()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        let write = call.is_write();
        self.state.lock().unwrap().calls.push(call);
        if write && self.fail_writes {
            anyhow::bail!("write rejected");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IssueSource for FakeTracker {
    async fn list_labeled_items(
        &self,
        _repo: &RepoSlug,
        label: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<ItemMetadata>> {
        self.record(Call::ListItems { page })?;
        if self.fail_listing {
            anyhow::bail!("listing unavailable");
        }

        let state = self.state.lock().unwrap();
        let per_page = per_page as usize;
        Ok(state
            .items
            .values()
            .filter(|item| !item.is_closed() && item.has_label(label))
            .skip((page.saturating_sub(1)) as usize * per_page)
            .take(per_page)
            .cloned()
            .collect())
    }

    async fn list_comments(
        &self,
        item: &RepoInfo,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<CommentMetadata>> {
        self.record(Call::ListComments {
            number: item.number,
            page,
        })?;
        if self.fail_comments {
            anyhow::bail!("comments unavailable");
        }

        let state = self.state.lock().unwrap();
        let per_page = per_page as usize;
        Ok(state
            .comments
            .get(&item.number)
            .map(|comments| {
                comments
                    .iter()
                    .skip((page.saturating_sub(1)) as usize * per_page)
                    .take(per_page)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn reply(&self, item: &RepoInfo, text: &str) -> anyhow::Result<()> {
        self.record(Call::Reply {
            number: item.number,
            text: text.to_string(),
        })
    }

    async fn close(&self, item: &RepoInfo) -> anyhow::Result<()> {
        self.record(Call::Close {
            number: item.number,
        })?;
        if let Some(item) = self.state.lock().unwrap().items.get_mut(&item.number) {
            item.state = ItemState::Closed;
        }
        Ok(())
    }

    async fn remove_label(&self, item: &RepoInfo, label: &str) -> anyhow::Result<bool> {
        self.record(Call::RemoveLabel {
            number: item.number,
            label: label.to_string(),
        })?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .get_mut(&item.number)
            .map(|item| item.labels.remove(label))
            .unwrap_or(false))
    }
}
