use std::collections::BTreeSet;
use std::fmt;

use crate::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ItemKind {
    #[strum(serialize = "issue")]
    Issue,
    #[strum(serialize = "pr")]
    PullRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

/// `owner/repo` pair the run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses the `owner/repo` form used by `GITHUB_REPOSITORY`.
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self::new(owner, repo))
    }

    pub fn item(&self, number: u64) -> RepoInfo {
        RepoInfo::new(&self.owner, &self.repo, number)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub full_id: String,
}

impl RepoInfo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        let owner = owner.into();
        let repo = repo.into();
        let full_id = format!("{}/{}/{}", owner, repo, number);
        Self {
            owner,
            repo,
            number,
            full_id,
        }
    }
}

/// Snapshot of an issue or pull request as returned by the label listing.
///
/// Labels are normalized to plain names when the snapshot is built, so nothing
/// downstream has to care how the tracker encoded them.
#[derive(Debug, Clone)]
pub struct ItemMetadata {
    pub repo_info: RepoInfo,
    pub kind: ItemKind,
    pub state: ItemState,
    pub locked: bool,
    pub labels: BTreeSet<String>,
    pub updated_at: Timestamp,
    pub comments: u32,
}

impl ItemMetadata {
    pub fn number(&self) -> u64 {
        self.repo_info.number
    }

    pub fn is_closed(&self) -> bool {
        self.state == ItemState::Closed
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

impl fmt::Display for ItemMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.repo_info.number)
    }
}

#[cfg(test)]
mod tests {
    use super::RepoSlug;

    #[test]
    fn parse_repository_slug() {
        let slug = RepoSlug::parse("octo-org/octo-repo").unwrap();
        assert_eq!(slug.owner, "octo-org");
        assert_eq!(slug.repo, "octo-repo");
        assert_eq!(slug.item(7).full_id, "octo-org/octo-repo/7");
    }

    #[test]
    fn reject_malformed_slug() {
        for slug in ["", "owner", "/repo", "owner/", "a/b/c"] {
            assert!(RepoSlug::parse(slug).is_none(), "{slug} should not parse");
        }
    }
}
