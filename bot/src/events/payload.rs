use std::path::Path;

use serde::Deserialize;

use shared::github::{parse_author_association, User};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("failed to read event payload {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not determine issue number from event")]
    MissingItemNumber,
}

#[derive(Deserialize)]
struct Payload {
    issue: Option<Numbered>,
    pull_request: Option<Numbered>,
    comment: Option<PayloadComment>,
}

#[derive(Deserialize)]
struct Numbered {
    number: Option<u64>,
}

#[derive(Deserialize)]
struct PayloadComment {
    user: Option<PayloadUser>,
    author_association: Option<String>,
}

#[derive(Deserialize)]
struct PayloadUser {
    login: String,
}

/// The comment that triggered an activity reaction.
#[derive(Debug, Clone)]
pub struct CommentEvent {
    pub number: u64,
    pub commenter: User,
}

impl CommentEvent {
    pub fn from_file(path: &Path) -> Result<Self, EventError> {
        let payload = std::fs::read_to_string(path).map_err(|source| EventError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_payload(&payload)
    }

    pub fn from_payload(payload: &str) -> Result<Self, EventError> {
        let payload: Payload = serde_json::from_str(payload)?;

        let number = payload
            .issue
            .and_then(|issue| issue.number)
            .or_else(|| payload.pull_request.and_then(|pr| pr.number))
            .ok_or(EventError::MissingItemNumber)?;

        let (login, association) = match payload.comment {
            Some(comment) => (
                comment.user.map(|user| user.login).unwrap_or_default(),
                comment.author_association.unwrap_or_default(),
            ),
            None => Default::default(),
        };

        Ok(Self {
            number,
            commenter: User::new(login, parse_author_association(&association)),
        })
    }
}
