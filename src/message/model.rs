use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{thread, user};

use super::Id;

/// A single entry within a thread.
///
/// Both the human-authored row and its echoed counterpart carry the author's
/// `user_id`; only `is_user` tells them apart. Within a thread, messages are
/// presented ordered by `created_at` ascending.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub id: Id,
    pub thread_id: thread::Id,
    pub user_id: user::Sub,
    pub is_user: bool,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Trims the payload; `None` means there is nothing worth persisting.
pub fn sanitize(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
