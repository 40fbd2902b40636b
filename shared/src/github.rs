use octocrab::models::{
    issues::{Comment, Issue},
    AuthorAssociation, IssueState,
};

use crate::{ItemKind, ItemMetadata, ItemState, RepoSlug, Timestamp};

#[derive(Debug, Clone)]
pub struct User {
    pub login: String,
    pub contributor_type: AuthorAssociation,
}

impl User {
    pub fn new(login: String, contributor_type: AuthorAssociation) -> Self {
        Self {
            login,
            contributor_type,
        }
    }

    /// Owners and collaborators usually apply the stale label themselves while
    /// commenting on why, so their comments don't count as activity.
    pub fn is_privileged(&self) -> bool {
        self.contributor_type == AuthorAssociation::Owner
            || self.contributor_type == AuthorAssociation::Collaborator
    }
}

/// Maps the `author_association` string of a webhook payload.
/// Unknown values are treated as `NONE`.
pub fn parse_author_association(value: &str) -> AuthorAssociation {
    match value.trim().to_ascii_uppercase().as_str() {
        "OWNER" => AuthorAssociation::Owner,
        "COLLABORATOR" => AuthorAssociation::Collaborator,
        "MEMBER" => AuthorAssociation::Member,
        "CONTRIBUTOR" => AuthorAssociation::Contributor,
        "FIRST_TIME_CONTRIBUTOR" => AuthorAssociation::FirstTimeContributor,
        "FIRST_TIMER" => AuthorAssociation::FirstTimer,
        "MANNEQUIN" => AuthorAssociation::Mannequin,
        _ => AuthorAssociation::None,
    }
}

#[derive(Debug, Clone)]
pub struct CommentMetadata {
    /// Number of the issue or pull request the comment belongs to.
    pub item: u64,
    pub author: User,
    pub created_at: Timestamp,
}

impl CommentMetadata {
    pub fn from_comment(item: u64, comment: Comment) -> Self {
        Self {
            item,
            author: User::new(comment.user.login, comment.author_association),
            created_at: comment.created_at,
        }
    }
}

impl ItemMetadata {
    pub fn from_issue(repo: &RepoSlug, issue: Issue) -> Self {
        let kind = if issue.pull_request.is_some() {
            ItemKind::PullRequest
        } else {
            ItemKind::Issue
        };
        // Anything we don't recognize as open is never touched
        let state = match issue.state {
            IssueState::Open => ItemState::Open,
            _ => ItemState::Closed,
        };

        Self {
            repo_info: repo.item(issue.number),
            kind,
            state,
            locked: issue.locked,
            labels: issue.labels.into_iter().map(|label| label.name).collect(),
            updated_at: issue.updated_at,
            comments: issue.comments,
        }
    }
}
