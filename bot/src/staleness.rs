use shared::{github::CommentMetadata, Timestamp};

/// Page size used when fetching the last page of an item's comments.
pub const COMMENTS_PER_PAGE: u8 = 30;

const MILLISECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Page that holds the most recent comment, or `None` when there is nothing to fetch.
///
/// Assumes comments come back oldest first and that `comments` is still
/// accurate when the page is requested.
pub fn last_comment_page(comments: u32) -> Option<u32> {
    if comments == 0 {
        return None;
    }
    Some((comments - 1) / COMMENTS_PER_PAGE as u32 + 1)
}

/// Latest of the item's own update time and the newest comment we saw.
pub fn effective_activity_time(updated_at: Timestamp, comments: &[CommentMetadata]) -> Timestamp {
    comments
        .iter()
        .map(|comment| comment.created_at)
        .max()
        .map_or(updated_at, |latest| latest.max(updated_at))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staleness {
    pub active_at: Timestamp,
    pub days_inactive: f64,
    pub stale: bool,
}

impl Staleness {
    /// Reaching the threshold exactly counts as stale.
    pub fn evaluate(active_at: Timestamp, now: Timestamp, days_before_close: u32) -> Self {
        let days_inactive = (now - active_at).num_milliseconds() as f64 / MILLISECONDS_PER_DAY;
        Self {
            active_at,
            days_inactive,
            stale: days_inactive >= days_before_close as f64,
        }
    }
}
