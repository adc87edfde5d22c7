use chrono::{DateTime, Utc};

use crate::message::model::Message;
use crate::thread;
use crate::thread::model::Thread;

/// The session-local view of the remote store.
///
/// Threads stay ordered by `updated_at` descending and messages by
/// `created_at` ascending; [`super::service::ChatService`] installs fetched
/// collections wholesale and appends server-returned rows on writes, so the
/// orderings hold as long as the remote store honours them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub threads: Vec<Thread>,
    pub messages: Vec<Message>,
    /// At most one thread is displayed at a time; `None` until the first
    /// fetch selects one or a thread is created.
    pub active_thread: Option<thread::Id>,
    /// Status of the most recent thread-list fetch.
    pub is_loading: bool,
    /// Single-slot error message, overwritten by the latest failure.
    pub error: Option<String>,

    // Monotonic token for in-flight thread-list fetches; only the latest
    // invocation's result may be installed.
    pub(crate) thread_epoch: u64,
}

impl ChatState {
    /// Optimistic local counterpart of the remote timestamp touch. Re-sorts
    /// so the list stays most-recently-updated-first until the next fetch.
    pub(crate) fn touch_thread(&mut self, id: &thread::Id, at: DateTime<Utc>) {
        if let Some(thread) = self.threads.iter_mut().find(|t| &t.id == id) {
            thread.updated_at = at;
        }

        self.threads
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }
}
