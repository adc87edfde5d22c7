use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::user;

use super::Id;

/// A named conversation container owned by one user.
///
/// `updated_at` advances whenever a message lands in the thread; the thread
/// set is always presented ordered by it, most recently active first.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Thread {
    pub id: Id,
    pub user_id: user::Sub,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Default title for a thread created at the given local time,
    /// e.g. `"Jan 5, 3:45 PM"`.
    pub fn title_at(at: DateTime<Local>) -> String {
        at.format("%b %-d, %-I:%M %p").to_string()
    }
}
